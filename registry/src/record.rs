//! A single voter's record.

use biovote_types::{BiometricSample, BiometricTemplate, Modality, Timestamp, VoterId, VoterName};
use biovote_verification::{VerificationError, Verifier};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// One voter: identity, stored credential and voting status.
///
/// The credential is owned exclusively by the record. No method returns it;
/// only match decisions leave the record.
#[derive(Debug)]
pub struct VoterRecord {
    id: VoterId,
    name: VoterName,
    credential: BiometricTemplate,
    has_voted: bool,
    registered_at: Timestamp,
    voted_at: Option<Timestamp>,
}

/// Read-only view of a record, safe to hand to any caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSummary {
    pub id: VoterId,
    pub name: VoterName,
    pub has_voted: bool,
    pub registered_at: Timestamp,
    pub voted_at: Option<Timestamp>,
}

impl VoterRecord {
    pub fn new(
        id: VoterId,
        name: VoterName,
        credential: BiometricTemplate,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            credential,
            has_voted: false,
            registered_at,
            voted_at: None,
        }
    }

    pub fn id(&self) -> VoterId {
        self.id
    }

    pub fn name(&self) -> &VoterName {
        &self.name
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub fn registered_at(&self) -> Timestamp {
        self.registered_at
    }

    pub fn voted_at(&self) -> Option<Timestamp> {
        self.voted_at
    }

    /// Modality of the stored credential.
    pub fn modality(&self) -> Modality {
        self.credential.modality()
    }

    /// Check `sample` against this record's stored credential. Does not change
    /// the record.
    pub fn authenticate(
        &self,
        verifier: &dyn Verifier,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        verifier.verify(&self.credential, sample)
    }

    /// The Registered -> Voted transition. Happens at most once.
    pub fn cast_vote(&mut self, now: Timestamp) -> Result<(), RegistryError> {
        if self.has_voted {
            return Err(RegistryError::AlreadyVoted(self.id));
        }
        self.has_voted = true;
        self.voted_at = Some(now);
        Ok(())
    }

    pub fn summary(&self) -> VoterSummary {
        VoterSummary {
            id: self.id,
            name: self.name.clone(),
            has_voted: self.has_voted,
            registered_at: self.registered_at,
            voted_at: self.voted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biovote_verification::FingerprintVerifier;

    fn alice() -> VoterRecord {
        VoterRecord::new(
            VoterId::new(1),
            VoterName::new("Alice").unwrap(),
            BiometricTemplate::new(Modality::Fingerprint, b"fingerprint_data_1".to_vec()).unwrap(),
            Timestamp::new(100),
        )
    }

    #[test]
    fn new_record_has_not_voted() {
        let record = alice();
        assert!(!record.has_voted());
        assert_eq!(record.voted_at(), None);
        assert_eq!(record.registered_at(), Timestamp::new(100));
    }

    #[test]
    fn cast_vote_succeeds_once() {
        let mut record = alice();
        assert!(record.cast_vote(Timestamp::new(200)).is_ok());
        assert!(record.has_voted());
        assert_eq!(record.voted_at(), Some(Timestamp::new(200)));

        let err = record.cast_vote(Timestamp::new(300)).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyVoted(VoterId::new(1)));
        // The first vote's timestamp is kept.
        assert_eq!(record.voted_at(), Some(Timestamp::new(200)));
    }

    #[test]
    fn authenticate_does_not_mutate() {
        let record = alice();
        let verifier = FingerprintVerifier::new();
        let good = BiometricSample::new(Modality::Fingerprint, b"fingerprint_data_1".to_vec());
        let bad = BiometricSample::new(Modality::Fingerprint, b"fingerprint_data_2".to_vec());
        assert_eq!(record.authenticate(&verifier, &good), Ok(true));
        assert_eq!(record.authenticate(&verifier, &bad), Ok(false));
        assert!(!record.has_voted());
    }

    #[test]
    fn summary_mirrors_state() {
        let mut record = alice();
        record.cast_vote(Timestamp::new(5)).unwrap();
        let summary = record.summary();
        assert_eq!(summary.id, VoterId::new(1));
        assert_eq!(summary.name.as_str(), "Alice");
        assert!(summary.has_voted);
        assert_eq!(summary.voted_at, Some(Timestamp::new(5)));
    }

    #[test]
    fn debug_does_not_leak_credential() {
        let rendered = format!("{:?}", alice());
        assert!(!rendered.contains("fingerprint_data_1"));
    }
}
