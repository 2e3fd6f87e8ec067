//! Audit events emitted by the registry.
//!
//! Events carry identities and reasons, never credential bytes. They accumulate
//! until drained with [`crate::VotingRegistry::drain_events`].

use biovote_types::{Timestamp, VoterId, VoterName};
use serde::Serialize;

use crate::error::{AuthFailure, RegistryError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    VoterRegistered {
        voter: VoterId,
        name: VoterName,
        at: Timestamp,
    },
    DuplicateRejected {
        voter: VoterId,
    },
    AuthenticationSucceeded {
        voter: VoterId,
    },
    AuthenticationFailed {
        voter: VoterId,
        reason: AuthFailure,
    },
    VoteRecorded {
        voter: VoterId,
        at: Timestamp,
    },
    VoteRejected {
        voter: VoterId,
        reason: RejectionReason,
    },
    /// `authenticate_voter` refused before any match was attempted.
    AuthenticationRejected {
        voter: VoterId,
        reason: RejectionReason,
    },
}

/// Why `record_vote` refused a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NotFound,
    InvalidCredential,
    AuthenticationFailed,
    AlreadyVoted,
}

impl RejectionReason {
    /// The reason for a refused authentication or vote. `DuplicateId` only
    /// comes out of registration and has none.
    pub(crate) fn of(err: &RegistryError) -> Option<Self> {
        match err {
            RegistryError::VoterNotFound(_) => Some(RejectionReason::NotFound),
            RegistryError::InvalidCredentialInput(_) => Some(RejectionReason::InvalidCredential),
            RegistryError::AuthenticationFailed { .. } => {
                Some(RejectionReason::AuthenticationFailed)
            }
            RegistryError::AlreadyVoted(_) => Some(RejectionReason::AlreadyVoted),
            RegistryError::DuplicateId(_) => None,
        }
    }
}

impl RegistryEvent {
    /// The voter the event concerns.
    pub fn voter(&self) -> VoterId {
        match self {
            RegistryEvent::VoterRegistered { voter, .. }
            | RegistryEvent::DuplicateRejected { voter }
            | RegistryEvent::AuthenticationSucceeded { voter }
            | RegistryEvent::AuthenticationFailed { voter, .. }
            | RegistryEvent::VoteRecorded { voter, .. }
            | RegistryEvent::VoteRejected { voter, .. }
            | RegistryEvent::AuthenticationRejected { voter, .. } => *voter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let event = RegistryEvent::VoteRejected {
            voter: VoterId::new(3),
            reason: RejectionReason::AlreadyVoted,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "vote_rejected", "voter": 3, "reason": "already_voted" })
        );

        let event = RegistryEvent::AuthenticationFailed {
            voter: VoterId::new(4),
            reason: AuthFailure::TimedOut,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "authentication_failed", "voter": 4, "reason": "timed_out" })
        );
    }

    #[test]
    fn registration_event_carries_name_not_credential() {
        let event = RegistryEvent::VoterRegistered {
            voter: VoterId::new(1),
            name: VoterName::new("Alice").unwrap(),
            at: Timestamp::new(1_700_000_000),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "voter_registered", "voter": 1, "name": "Alice", "at": 1_700_000_000u64 })
        );
    }

    #[test]
    fn rejection_reason_follows_error_kind() {
        let id = VoterId::new(1);
        assert_eq!(
            RejectionReason::of(&RegistryError::VoterNotFound(id)),
            Some(RejectionReason::NotFound)
        );
        assert_eq!(
            RejectionReason::of(&RegistryError::InvalidCredentialInput("empty".into())),
            Some(RejectionReason::InvalidCredential)
        );
        assert_eq!(
            RejectionReason::of(&RegistryError::AuthenticationFailed {
                id,
                reason: AuthFailure::NoMatch
            }),
            Some(RejectionReason::AuthenticationFailed)
        );
        assert_eq!(
            RejectionReason::of(&RegistryError::AlreadyVoted(id)),
            Some(RejectionReason::AlreadyVoted)
        );
    }

    #[test]
    fn duplicate_id_has_no_rejection_reason() {
        assert_eq!(
            RejectionReason::of(&RegistryError::DuplicateId(VoterId::new(1))),
            None
        );
    }

    #[test]
    fn every_event_names_its_voter() {
        let id = VoterId::new(8);
        assert_eq!(RegistryEvent::DuplicateRejected { voter: id }.voter(), id);
        assert_eq!(
            RegistryEvent::VoteRecorded {
                voter: id,
                at: Timestamp::EPOCH
            }
            .voter(),
            id
        );
    }
}
