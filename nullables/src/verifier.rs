//! Nullable verifier: scripted match decisions.

use biovote_types::{BiometricSample, BiometricTemplate, Modality};
use biovote_verification::{VerificationError, Verifier};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// What a [`NullVerifier`] does on one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullOutcome {
    Match,
    NoMatch,
    /// Fail with `InvalidCredentialInput`.
    Invalid,
    /// Panic inside `verify`, as a faulty sensor driver might.
    Panic,
}

/// A verifier that ignores its inputs and replays scripted outcomes.
///
/// Outcomes are consumed in order; once the script is exhausted every call
/// returns the fallback. An optional delay makes each call block, for timeout
/// tests. Supports every modality.
pub struct NullVerifier {
    script: Mutex<VecDeque<NullOutcome>>,
    fallback: NullOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl NullVerifier {
    pub fn scripted(outcomes: Vec<NullOutcome>, fallback: NullOutcome) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call matches.
    pub fn matching() -> Self {
        Self::scripted(Vec::new(), NullOutcome::Match)
    }

    /// Every call is a no-match.
    pub fn rejecting() -> Self {
        Self::scripted(Vec::new(), NullOutcome::NoMatch)
    }

    /// Every call panics.
    pub fn panicking() -> Self {
        Self::scripted(Vec::new(), NullOutcome::Panic)
    }

    /// Block for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `verify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Verifier for NullVerifier {
    fn name(&self) -> &str {
        "null-verifier"
    }

    fn supports(&self, _modality: Modality) -> bool {
        true
    }

    fn verify(
        &self,
        _stored: &BiometricTemplate,
        _sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match outcome {
            NullOutcome::Match => Ok(true),
            NullOutcome::NoMatch => Ok(false),
            NullOutcome::Invalid => Err(VerificationError::InvalidCredentialInput {
                reason: "scripted invalid input".into(),
            }),
            NullOutcome::Panic => panic!("scripted verifier panic"),
        }
    }
}
