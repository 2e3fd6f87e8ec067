//! Scripted sessions against a registry: the built-in demo and roll files.

use std::fmt;
use std::io::{self, Write};

use biovote_registry::{RegistryError, RegistryEvent, Turnout, VotingRegistry};
use biovote_types::{BiometricSample, BiometricTemplate, Modality, VoterId, VoterName};
use serde::Serialize;

use crate::roll::{Roll, RollError};

/// Which registry operation an [`Outcome`] reports on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Register,
    Authenticate,
    Vote,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Register => "register",
            Step::Authenticate => "authenticate",
            Step::Vote => "vote",
        })
    }
}

/// Result of one step, flattened for printing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub voter: VoterId,
    pub step: Step,
    pub accepted: bool,
    pub detail: String,
}

impl Outcome {
    fn from_result(voter: VoterId, step: Step, result: Result<(), RegistryError>) -> Self {
        match result {
            Ok(()) => Self {
                voter,
                step,
                accepted: true,
                detail: "ok".into(),
            },
            Err(err) => Self {
                voter,
                step,
                accepted: false,
                detail: err.to_string(),
            },
        }
    }

    fn from_auth(voter: VoterId, result: Result<bool, RegistryError>) -> Self {
        match result {
            Ok(true) => Self::from_result(voter, Step::Authenticate, Ok(())),
            Ok(false) => Self {
                voter,
                step: Step::Authenticate,
                accepted: false,
                detail: "sample did not match".into(),
            },
            Err(err) => Self::from_result(voter, Step::Authenticate, Err(err)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.accepted { "accepted" } else { "rejected" };
        write!(
            f,
            "voter {} {} {verdict}: {}",
            self.voter, self.step, self.detail
        )
    }
}

/// Everything a session produced, in order.
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub outcomes: Vec<Outcome>,
    pub events: Vec<RegistryEvent>,
    pub turnout: Turnout,
}

impl SessionReport {
    pub fn accepted(&self, step: Step) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.step == step && o.accepted)
            .count()
    }

    pub fn rejected(&self, step: Step) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.step == step && !o.accepted)
            .count()
    }

    /// One line per outcome, then the turnout.
    pub fn write_human(&self, out: &mut impl Write) -> io::Result<()> {
        for outcome in &self.outcomes {
            writeln!(out, "{outcome}")?;
        }
        writeln!(
            out,
            "turnout: {} of {} voted, {} remaining",
            self.turnout.voted,
            self.turnout.registered,
            self.turnout.remaining()
        )
    }

    /// One JSON object per event, then the turnout.
    pub fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        for event in &self.events {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
        }
        serde_json::to_writer(&mut *out, &serde_json::json!({ "turnout": self.turnout }))?;
        writeln!(out)
    }
}

/// Register Alice and Bob, let each authenticate and vote, then try a second
/// ballot for Alice and one for an unregistered id.
pub async fn run_demo(registry: &VotingRegistry) -> anyhow::Result<SessionReport> {
    let alice = VoterId::new(1);
    let bob = VoterId::new(2);
    let stranger = VoterId::new(99);
    let alice_capture: &[u8] = b"fingerprint_data_1";
    let bob_capture: &[u8] = b"fingerprint_data_2";

    let mut outcomes = Vec::new();

    for (id, name, capture) in [(alice, "Alice", alice_capture), (bob, "Bob", bob_capture)] {
        let credential = BiometricTemplate::new(Modality::Fingerprint, capture.to_vec())?;
        let result = registry
            .register(id, VoterName::new(name)?, credential)
            .await;
        outcomes.push(Outcome::from_result(id, Step::Register, result));
    }

    let ballot = |capture: &[u8]| BiometricSample::new(Modality::Fingerprint, capture.to_vec());

    for (id, capture) in [(alice, alice_capture), (bob, bob_capture)] {
        let auth = registry.authenticate_voter(id, ballot(capture)).await;
        outcomes.push(Outcome::from_auth(id, auth));
        let vote = registry.record_vote(id, ballot(capture)).await;
        outcomes.push(Outcome::from_result(id, Step::Vote, vote));
    }

    let again = registry.record_vote(alice, ballot(alice_capture)).await;
    outcomes.push(Outcome::from_result(alice, Step::Vote, again));

    let unknown = registry.record_vote(stranger, ballot(&b"unknown_fingerprint"[..])).await;
    outcomes.push(Outcome::from_result(stranger, Step::Vote, unknown));

    Ok(SessionReport {
        outcomes,
        events: registry.drain_events(),
        turnout: registry.turnout().await,
    })
}

/// Register every voter on the roll, then replay every ballot in order.
///
/// Entries that cannot be decoded abort before the registry is touched.
pub async fn run_roll(registry: &VotingRegistry, roll: &Roll) -> Result<SessionReport, RollError> {
    let mut enrollments = Vec::with_capacity(roll.voters.len());
    for voter in &roll.voters {
        enrollments.push((voter.id, voter.name.clone(), voter.credential()?));
    }
    let mut ballots = Vec::with_capacity(roll.ballots.len());
    for ballot in &roll.ballots {
        ballots.push((ballot.id, ballot.sample()?));
    }
    tracing::info!(
        voters = enrollments.len(),
        ballots = ballots.len(),
        "roll loaded"
    );

    let mut outcomes = Vec::with_capacity(enrollments.len() + ballots.len());
    for (id, name, credential) in enrollments {
        let result = registry.register(id, name, credential).await;
        outcomes.push(Outcome::from_result(id, Step::Register, result));
    }
    for (id, sample) in ballots {
        let result = registry.record_vote(id, sample).await;
        outcomes.push(Outcome::from_result(id, Step::Vote, result));
    }

    Ok(SessionReport {
        outcomes,
        events: registry.drain_events(),
        turnout: registry.turnout().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use biovote_registry::RejectionReason;
    use biovote_verification::FingerprintVerifier;
    use std::sync::Arc;

    fn registry() -> VotingRegistry {
        VotingRegistry::new(Arc::new(FingerprintVerifier::new()))
    }

    #[tokio::test]
    async fn demo_records_two_votes_and_rejects_the_rest() {
        let registry = registry();
        let report = run_demo(&registry).await.unwrap();

        assert_eq!(report.accepted(Step::Register), 2);
        assert_eq!(report.accepted(Step::Authenticate), 2);
        assert_eq!(report.accepted(Step::Vote), 2);
        assert_eq!(report.rejected(Step::Vote), 2);
        assert_eq!(
            report.turnout,
            Turnout {
                registered: 2,
                voted: 2
            }
        );

        let rejections: Vec<_> = report
            .events
            .iter()
            .filter_map(|e| match e {
                RegistryEvent::VoteRejected { voter, reason } => Some((*voter, *reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            rejections,
            vec![
                (VoterId::new(1), RejectionReason::AlreadyVoted),
                (VoterId::new(99), RejectionReason::NotFound),
            ]
        );
    }

    #[tokio::test]
    async fn demo_outcome_details_name_the_error() {
        let report = run_demo(&registry()).await.unwrap();
        let last_two: Vec<_> = report.outcomes.iter().rev().take(2).collect();
        assert!(last_two[0].detail.contains("99"));
        assert!(!last_two[1].accepted);
    }

    #[tokio::test]
    async fn roll_replays_ballots_in_order() {
        let roll = Roll::from_toml_str(
            r#"
            [[voters]]
            id = 1
            name = "Alice"
            modality = "fingerprint"
            template = "66696e6765727072696e745f646174615f31"

            [[voters]]
            id = 1
            name = "Alice again"
            modality = "fingerprint"
            template = "66696e6765727072696e745f646174615f32"

            [[ballots]]
            id = 1
            modality = "fingerprint"
            sample = "66696e6765727072696e745f646174615f32"

            [[ballots]]
            id = 1
            modality = "fingerprint"
            sample = "66696e6765727072696e745f646174615f31"

            [[ballots]]
            id = 1
            modality = "fingerprint"
            sample = "66696e6765727072696e745f646174615f31"
            "#,
        )
        .unwrap();

        let registry = registry();
        let report = run_roll(&registry, &roll).await.unwrap();

        let accepted: Vec<_> = report.outcomes.iter().map(|o| o.accepted).collect();
        assert_eq!(accepted, vec![true, false, false, true, false]);
        assert_eq!(report.turnout.voted, 1);
        assert_eq!(report.turnout.registered, 1);
    }

    #[tokio::test]
    async fn undecodable_roll_touches_nothing() {
        let roll = Roll::from_toml_str(
            r#"
            [[voters]]
            id = 1
            name = "Alice"
            modality = "fingerprint"
            template = "66696e6765727072696e745f646174615f31"

            [[ballots]]
            id = 1
            modality = "fingerprint"
            sample = "zz"
            "#,
        )
        .unwrap();

        let registry = registry();
        let err = run_roll(&registry, &roll).await.unwrap_err();
        assert!(matches!(err, RollError::Hex { field: "sample", .. }));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn json_output_is_one_object_per_line() {
        let report = run_demo(&registry()).await.unwrap();
        let mut buf = Vec::new();
        report.write_json(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), report.events.len() + 1);
        for line in &lines {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "voter_registered");
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["turnout"]["voted"], 2);
    }

    #[tokio::test]
    async fn human_output_ends_with_turnout() {
        let report = run_demo(&registry()).await.unwrap();
        let mut buf = Vec::new();
        report.write_human(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), report.outcomes.len() + 1);
        assert!(text.ends_with("turnout: 2 of 2 voted, 0 remaining\n"));
    }
}
