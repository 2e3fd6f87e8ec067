use biovote_types::Modality;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The template or sample could not be evaluated at all. Distinct from a
    /// successful evaluation that found no match.
    #[error("invalid credential input: {reason}")]
    InvalidCredentialInput { reason: String },

    #[error("modality mismatch: expected {expected}, got {actual}")]
    ModalityMismatch { expected: Modality, actual: Modality },

    #[error("composite verifier has no members")]
    EmptyComposite,
}

impl VerificationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCredentialInput {
            reason: reason.into(),
        }
    }

    /// Whether the error describes malformed input rather than a misconfigured verifier.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentialInput { .. } | Self::ModalityMismatch { .. }
        )
    }
}
