//! The verifier capability trait.

use biovote_types::{BiometricSample, BiometricTemplate, Modality};

use crate::error::VerificationError;

/// A pluggable biometric verifier.
///
/// Implementations might include:
/// - Template matchers for a single sensor (fingerprint, face, iris)
/// - Multi-factor combinations of other verifiers
/// - Adapters around external sensor SDKs or matching services
///
/// `verify` must not mutate its inputs and may block (e.g. on sensor
/// hardware); callers are expected to bound it with a timeout.
pub trait Verifier: Send + Sync {
    /// Human-readable name of this verifier.
    fn name(&self) -> &str;

    /// Whether this verifier can evaluate templates of the given modality.
    fn supports(&self, modality: Modality) -> bool;

    /// Compare `sample` against `stored`.
    ///
    /// Returns `Ok(false)` for a well-formed sample that does not match, and
    /// an error when either input cannot be evaluated.
    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError>;
}
