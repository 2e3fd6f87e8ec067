//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (the biometric sensor behind a verifier, the clock) are
//! abstracted behind traits. This crate provides test-friendly implementations
//! that:
//! - Return deterministic, scripted values
//! - Can be controlled programmatically
//! - Never touch hardware or the wall clock
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod verifier;

pub use clock::NullClock;
pub use verifier::{NullOutcome, NullVerifier};
