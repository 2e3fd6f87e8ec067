//! Biometric verification capability.
//!
//! A [`Verifier`] answers one question: does this submitted sample match this
//! stored template? It sees nothing else, in particular no other voter's data.
//!
//! The matching method is modular. The registry only requires *that* a sample be
//! checked, not *how*; fingerprint, face, iris and composite (AND / OR)
//! verifiers all plug in behind the same trait and are selected through
//! [`VerifierConfig`].

pub mod biometric;
pub mod composite;
pub mod config;
pub mod error;
pub mod method;
pub mod permissive;

pub use biometric::{FaceVerifier, FingerprintVerifier, IrisVerifier};
pub use composite::{CompositePolicy, CompositeVerifier};
pub use config::{build_verifier, VerifierConfig};
pub use error::VerificationError;
pub use method::Verifier;
pub use permissive::PermissiveVerifier;
