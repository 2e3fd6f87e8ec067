//! The voting registry: registration, authentication and exactly-once vote
//! recording.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use biovote_types::{BiometricSample, BiometricTemplate, Clock, SystemClock, VoterId, VoterName};
use biovote_utils::StatsCounter;
use biovote_verification::{build_verifier, Verifier};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock, Semaphore};
use tokio::time::{timeout_at, Instant};

use crate::config::{ConfigError, RegistryConfig};
use crate::error::{AuthFailure, RegistryError};
use crate::events::{RegistryEvent, RejectionReason};
use crate::record::{VoterRecord, VoterSummary};

/// Counter names reported by [`VotingRegistry::stats`].
pub mod counters {
    pub const REGISTRATIONS: &str = "registrations";
    pub const DUPLICATE_REJECTIONS: &str = "duplicate_rejections";
    pub const AUTH_ATTEMPTS: &str = "auth_attempts";
    pub const AUTH_FAILURES: &str = "auth_failures";
    pub const VERIFIER_TIMEOUTS: &str = "verifier_timeouts";
    pub const INVALID_INPUTS: &str = "invalid_inputs";
    pub const NOT_FOUND: &str = "not_found";
    pub const VOTES_RECORDED: &str = "votes_recorded";
    pub const ALREADY_VOTED: &str = "already_voted";

    pub const ALL: &[&str] = &[
        REGISTRATIONS,
        DUPLICATE_REJECTIONS,
        AUTH_ATTEMPTS,
        AUTH_FAILURES,
        VERIFIER_TIMEOUTS,
        INVALID_INPUTS,
        NOT_FOUND,
        VOTES_RECORDED,
        ALREADY_VOTED,
    ];
}

/// Registered versus voted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Turnout {
    pub registered: usize,
    pub voted: usize,
}

impl Turnout {
    pub fn remaining(&self) -> usize {
        self.registered - self.voted
    }
}

/// Holds every voter record and coordinates authentication and voting.
///
/// Each record sits behind its own lock. Authentication and vote recording for
/// one voter are serialized on that lock; different voters proceed in parallel.
/// The verifier runs on the blocking pool under a deadline, and a global
/// semaphore caps how many verifier calls are in flight.
///
/// A verifier call that outlives its deadline keeps running detached and holds
/// the voter's lock until it returns. Later calls for the same voter wait for
/// the lock within their own deadline, so a wedged sensor surfaces as
/// [`AuthFailure::TimedOut`] rather than a hang.
pub struct VotingRegistry {
    verifier: Arc<dyn Verifier>,
    clock: Arc<dyn Clock>,
    verify_timeout: Duration,
    voters: RwLock<HashMap<VoterId, Arc<Mutex<VoterRecord>>>>,
    permits: Arc<Semaphore>,
    events: std::sync::Mutex<Vec<RegistryEvent>>,
    stats: StatsCounter,
}

impl VotingRegistry {
    /// Registry with the given verifier and default settings.
    pub fn new(verifier: Arc<dyn Verifier>) -> Self {
        Self::with_config(verifier, &RegistryConfig::default())
    }

    /// Registry with the given verifier; timeouts and limits come from `config`.
    /// The `verifier` section of `config` is ignored.
    pub fn with_config(verifier: Arc<dyn Verifier>, config: &RegistryConfig) -> Self {
        Self {
            verifier,
            clock: Arc::new(SystemClock),
            verify_timeout: config.verify_timeout(),
            voters: RwLock::new(HashMap::new()),
            permits: Arc::new(Semaphore::new(config.max_concurrent_verifications.max(1))),
            events: std::sync::Mutex::new(Vec::new()),
            stats: StatsCounter::new(counters::ALL),
        }
    }

    /// Validate `config` and build the registry with the verifier it selects.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let verifier =
            build_verifier(&config.verifier).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self::with_config(verifier, config))
    }

    /// Replace the clock used to stamp registrations and votes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn verifier_name(&self) -> &str {
        self.verifier.name()
    }

    pub fn verify_timeout(&self) -> Duration {
        self.verify_timeout
    }

    // ── Registration ───────────────────────────────────────────────────

    /// Add a voter.
    ///
    /// Fails with [`RegistryError::DuplicateId`] if `id` is taken, leaving the
    /// existing record untouched, and with
    /// [`RegistryError::InvalidCredentialInput`] if the configured verifier cannot
    /// evaluate the credential's modality.
    pub async fn register(
        &self,
        id: VoterId,
        name: VoterName,
        credential: BiometricTemplate,
    ) -> Result<(), RegistryError> {
        let modality = credential.modality();
        if !self.verifier.supports(modality) {
            self.stats.increment(counters::INVALID_INPUTS);
            tracing::warn!(voter = %id, %modality, "registration rejected: unsupported modality");
            return Err(RegistryError::InvalidCredentialInput(format!(
                "verifier {} cannot evaluate {modality} templates",
                self.verifier.name()
            )));
        }

        let registered_at = {
            let mut voters = self.voters.write().await;
            match voters.entry(id) {
                Entry::Occupied(_) => None,
                Entry::Vacant(slot) => {
                    let now = self.clock.now();
                    let record = VoterRecord::new(id, name.clone(), credential, now);
                    slot.insert(Arc::new(Mutex::new(record)));
                    Some(now)
                }
            }
        };

        match registered_at {
            None => {
                self.stats.increment(counters::DUPLICATE_REJECTIONS);
                self.push_event(RegistryEvent::DuplicateRejected { voter: id });
                tracing::warn!(voter = %id, "registration rejected: duplicate id");
                Err(RegistryError::DuplicateId(id))
            }
            Some(now) => {
                self.stats.increment(counters::REGISTRATIONS);
                tracing::info!(voter = %id, %name, %modality, "voter registered");
                self.push_event(RegistryEvent::VoterRegistered {
                    voter: id,
                    name,
                    at: now,
                });
                Ok(())
            }
        }
    }

    // ── Authentication ─────────────────────────────────────────────────

    /// Check `sample` against voter `id`'s stored credential, within the
    /// configured timeout.
    pub async fn authenticate_voter(
        &self,
        id: VoterId,
        sample: BiometricSample,
    ) -> Result<bool, RegistryError> {
        self.authenticate_voter_within(id, sample, self.verify_timeout)
            .await
    }

    /// Check `sample` against voter `id`'s stored credential.
    ///
    /// `Ok(false)` means the verifier evaluated the sample and it did not match.
    /// An unknown voter is [`RegistryError::VoterNotFound`], never `Ok(false)`.
    /// Exceeding `timeout` is [`RegistryError::AuthenticationFailed`]; a
    /// timeout too large to represent waits indefinitely.
    pub async fn authenticate_voter_within(
        &self,
        id: VoterId,
        sample: BiometricSample,
        timeout: Duration,
    ) -> Result<bool, RegistryError> {
        let result = self.try_authenticate(id, sample, timeout).await;
        if let Err(err) = &result {
            // Failed matches, timeouts and aborts already left an
            // AuthenticationFailed event.
            if let Some(reason @ (RejectionReason::NotFound | RejectionReason::InvalidCredential)) =
                RejectionReason::of(err)
            {
                self.push_event(RegistryEvent::AuthenticationRejected { voter: id, reason });
            }
        }
        result
    }

    async fn try_authenticate(
        &self,
        id: VoterId,
        sample: BiometricSample,
        timeout: Duration,
    ) -> Result<bool, RegistryError> {
        let deadline = deadline_after(timeout);
        let record = self.lookup(id).await?;
        let (_guard, matched) = self.verify_locked(id, record, sample, deadline).await?;
        if matched {
            tracing::debug!(voter = %id, "voter authenticated");
            self.push_event(RegistryEvent::AuthenticationSucceeded { voter: id });
        } else {
            self.note_auth_failure(id, AuthFailure::NoMatch);
        }
        Ok(matched)
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Authenticate voter `id` and record their vote, within the configured
    /// timeout.
    pub async fn record_vote(
        &self,
        id: VoterId,
        sample: BiometricSample,
    ) -> Result<(), RegistryError> {
        self.record_vote_within(id, sample, self.verify_timeout).await
    }

    /// Authenticate voter `id` and record their vote.
    ///
    /// Authentication is re-run here, under the voter's lock, and the vote is
    /// cast before the lock is released. Concurrent calls for one voter
    /// therefore see each other's effect: at most one succeeds.
    ///
    /// Authentication comes first, so a caller without a matching sample learns
    /// nothing about whether the voter has already voted.
    pub async fn record_vote_within(
        &self,
        id: VoterId,
        sample: BiometricSample,
        timeout: Duration,
    ) -> Result<(), RegistryError> {
        let result = self.try_record_vote(id, sample, timeout).await;
        if let Some(reason) = result.as_ref().err().and_then(RejectionReason::of) {
            self.push_event(RegistryEvent::VoteRejected { voter: id, reason });
        }
        result
    }

    async fn try_record_vote(
        &self,
        id: VoterId,
        sample: BiometricSample,
        timeout: Duration,
    ) -> Result<(), RegistryError> {
        let deadline = deadline_after(timeout);
        let record = self.lookup(id).await?;
        let (mut guard, matched) = self.verify_locked(id, record, sample, deadline).await?;
        if !matched {
            self.note_auth_failure(id, AuthFailure::NoMatch);
            return Err(RegistryError::AuthenticationFailed {
                id,
                reason: AuthFailure::NoMatch,
            });
        }
        self.push_event(RegistryEvent::AuthenticationSucceeded { voter: id });

        let now = self.clock.now();
        match guard.cast_vote(now) {
            Ok(()) => {
                drop(guard);
                self.stats.increment(counters::VOTES_RECORDED);
                tracing::info!(voter = %id, "vote recorded");
                self.push_event(RegistryEvent::VoteRecorded { voter: id, at: now });
                Ok(())
            }
            Err(err) => {
                drop(guard);
                self.stats.increment(counters::ALREADY_VOTED);
                tracing::warn!(voter = %id, "vote rejected: already voted");
                Err(err)
            }
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Public view of one voter.
    pub async fn voter(&self, id: VoterId) -> Option<VoterSummary> {
        let record = self.voters.read().await.get(&id).cloned()?;
        let summary = record.lock().await.summary();
        Some(summary)
    }

    /// Public view of every voter, ordered by id.
    pub async fn voters(&self) -> Vec<VoterSummary> {
        let records: Vec<_> = self.voters.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            summaries.push(record.lock().await.summary());
        }
        summaries.sort_by_key(|s| s.id);
        summaries
    }

    pub async fn len(&self) -> usize {
        self.voters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.voters.read().await.is_empty()
    }

    pub async fn turnout(&self) -> Turnout {
        let records: Vec<_> = self.voters.read().await.values().cloned().collect();
        let mut turnout = Turnout {
            registered: records.len(),
            voted: 0,
        };
        for record in records {
            if record.lock().await.has_voted() {
                turnout.voted += 1;
            }
        }
        turnout
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Internals ──────────────────────────────────────────────────────

    async fn lookup(&self, id: VoterId) -> Result<Arc<Mutex<VoterRecord>>, RegistryError> {
        let found = self.voters.read().await.get(&id).cloned();
        found.ok_or_else(|| {
            self.stats.increment(counters::NOT_FOUND);
            tracing::warn!(voter = %id, "voter not found");
            RegistryError::VoterNotFound(id)
        })
    }

    /// Lock the record and run the verifier against it, all before `deadline`.
    ///
    /// On success the lock is handed back so the caller can act on the result
    /// atomically.
    async fn verify_locked(
        &self,
        id: VoterId,
        record: Arc<Mutex<VoterRecord>>,
        sample: BiometricSample,
        deadline: Instant,
    ) -> Result<(OwnedMutexGuard<VoterRecord>, bool), RegistryError> {
        self.stats.increment(counters::AUTH_ATTEMPTS);

        let Ok(guard) = timeout_at(deadline, record.lock_owned()).await else {
            return Err(self.auth_failed(id, AuthFailure::TimedOut));
        };
        let permit = match timeout_at(deadline, Arc::clone(&self.permits).acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_closed)) => return Err(self.auth_failed(id, AuthFailure::VerifierAborted)),
            Err(_elapsed) => return Err(self.auth_failed(id, AuthFailure::TimedOut)),
        };

        let verifier = Arc::clone(&self.verifier);
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let outcome = guard.authenticate(verifier.as_ref(), &sample);
            (guard, outcome)
        });

        match timeout_at(deadline, task).await {
            Err(_elapsed) => Err(self.auth_failed(id, AuthFailure::TimedOut)),
            Ok(Err(join_error)) => {
                tracing::error!(voter = %id, error = %join_error, "verifier task failed");
                Err(self.auth_failed(id, AuthFailure::VerifierAborted))
            }
            Ok(Ok((_guard, Err(e)))) => {
                self.stats.increment(counters::INVALID_INPUTS);
                tracing::warn!(voter = %id, error = %e, "credential could not be evaluated");
                Err(e.into())
            }
            Ok(Ok((guard, Ok(matched)))) => Ok((guard, matched)),
        }
    }

    fn note_auth_failure(&self, id: VoterId, reason: AuthFailure) {
        self.stats.increment(counters::AUTH_FAILURES);
        if reason == AuthFailure::TimedOut {
            self.stats.increment(counters::VERIFIER_TIMEOUTS);
        }
        tracing::warn!(voter = %id, %reason, "authentication failed");
        self.push_event(RegistryEvent::AuthenticationFailed { voter: id, reason });
    }

    fn auth_failed(&self, id: VoterId, reason: AuthFailure) -> RegistryError {
        self.note_auth_failure(id, reason);
        RegistryError::AuthenticationFailed { id, reason }
    }

    fn push_event(&self, event: RegistryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Deadline `timeout` from now. Timeouts past what `Instant` can represent
/// become a deadline decades away, matching `tokio::time::timeout`.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
