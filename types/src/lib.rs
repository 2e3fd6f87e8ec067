//! Fundamental types for biovote.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! voter identity, biometric credentials (stored templates and submitted samples),
//! timestamps and the clock abstraction.

pub mod credential;
pub mod error;
pub mod time;
pub mod voter;

pub use credential::{BiometricSample, BiometricTemplate, Modality};
pub use error::TypesError;
pub use time::{Clock, SystemClock, Timestamp};
pub use voter::{VoterId, VoterName};
