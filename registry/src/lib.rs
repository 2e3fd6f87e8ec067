//! Voter registry and vote coordinator.
//!
//! The registry owns every [`VoterRecord`] and is the only way to change one.
//! Recording a vote is a single atomic step per voter: look up the record, lock
//! it, re-run biometric authentication against the stored template, then flip
//! `has_voted`. Authentication is never cached between calls.
//!
//! Every operation returns a discriminated [`RegistryError`] so callers can tell
//! an unknown voter from a failed match, a retryable authentication failure from
//! a terminal already-voted rejection.

pub mod config;
pub mod error;
pub mod events;
pub mod record;
pub mod registry;

pub use config::{ConfigError, RegistryConfig};
pub use error::{AuthFailure, RegistryError};
pub use events::{RegistryEvent, RejectionReason};
pub use record::{VoterRecord, VoterSummary};
pub use registry::{counters, Turnout, VotingRegistry};
