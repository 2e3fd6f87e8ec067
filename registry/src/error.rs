use biovote_types::VoterId;
use biovote_verification::VerificationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why an authentication attempt did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    /// The verifier evaluated the sample and it did not match.
    NoMatch,
    /// The verifier (or the wait for the voter's lock) exceeded the deadline.
    TimedOut,
    /// The verifier task panicked or could not be scheduled.
    VerifierAborted,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthFailure::NoMatch => "sample did not match",
            AuthFailure::TimedOut => "verifier timed out",
            AuthFailure::VerifierAborted => "verifier aborted",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("voter {0} is already registered")]
    DuplicateId(VoterId),

    #[error("voter {0} not found")]
    VoterNotFound(VoterId),

    #[error("invalid credential input: {0}")]
    InvalidCredentialInput(String),

    #[error("authentication failed for voter {id}: {reason}")]
    AuthenticationFailed { id: VoterId, reason: AuthFailure },

    #[error("voter {0} has already voted")]
    AlreadyVoted(VoterId),
}

impl RegistryError {
    /// Whether the same request may succeed if attempted again.
    ///
    /// Only authentication failures qualify; an unknown voter, a duplicate
    /// registration or a vote already cast will not change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistryError::AuthenticationFailed { .. })
    }

    /// The voter the error concerns, if any.
    pub fn voter(&self) -> Option<VoterId> {
        match self {
            RegistryError::DuplicateId(id)
            | RegistryError::VoterNotFound(id)
            | RegistryError::AlreadyVoted(id)
            | RegistryError::AuthenticationFailed { id, .. } => Some(*id),
            RegistryError::InvalidCredentialInput(_) => None,
        }
    }
}

impl From<VerificationError> for RegistryError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::InvalidCredentialInput { reason } => {
                RegistryError::InvalidCredentialInput(reason)
            }
            other => RegistryError::InvalidCredentialInput(other.to_string()),
        }
    }
}
