//! Verifier that accepts every well-formed sample.

use biovote_types::{BiometricSample, BiometricTemplate, Modality};

use crate::error::VerificationError;
use crate::method::Verifier;

/// Accepts any non-empty sample whose modality matches the template.
///
/// For demonstrations and dry runs where no sensor is attached. Inputs are still
/// validated, so empty or mismatched readings fail the same way they would
/// against a real verifier.
#[derive(Debug)]
pub struct PermissiveVerifier {
    _private: (),
}

impl PermissiveVerifier {
    pub fn new() -> Self {
        tracing::warn!("permissive verifier in use: every well-formed sample will match");
        Self { _private: () }
    }
}

impl Default for PermissiveVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for PermissiveVerifier {
    fn name(&self) -> &str {
        "permissive"
    }

    fn supports(&self, _modality: Modality) -> bool {
        true
    }

    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        if stored.modality() != sample.modality() {
            return Err(VerificationError::ModalityMismatch {
                expected: stored.modality(),
                actual: sample.modality(),
            });
        }
        if stored.is_empty() || sample.is_empty() {
            return Err(VerificationError::invalid("empty credential"));
        }
        Ok(true)
    }
}
