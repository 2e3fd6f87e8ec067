//! Configuration-driven verifier selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::biometric::{FaceVerifier, FingerprintVerifier, IrisVerifier};
use crate::composite::{CompositePolicy, CompositeVerifier};
use crate::error::VerificationError;
use crate::method::Verifier;
use crate::permissive::PermissiveVerifier;

/// Which verifier to build, as written in a TOML `[verifier]` table.
///
/// ```toml
/// [verifier]
/// kind = "composite"
/// policy = "any"
/// members = [{ kind = "fingerprint" }, { kind = "face", min_sample_len = 64 }]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VerifierConfig {
    Fingerprint {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_sample_len: Option<usize>,
    },
    Face {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_sample_len: Option<usize>,
    },
    Iris {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_sample_len: Option<usize>,
    },
    Permissive,
    Composite {
        policy: CompositePolicy,
        members: Vec<VerifierConfig>,
    },
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig::Fingerprint {
            min_sample_len: None,
        }
    }
}

/// Build the verifier described by `config`.
pub fn build_verifier(config: &VerifierConfig) -> Result<Arc<dyn Verifier>, VerificationError> {
    let verifier: Arc<dyn Verifier> = match config {
        VerifierConfig::Fingerprint { min_sample_len } => Arc::new(match min_sample_len {
            Some(len) => FingerprintVerifier::with_min_sample_len(*len),
            None => FingerprintVerifier::new(),
        }),
        VerifierConfig::Face { min_sample_len } => Arc::new(match min_sample_len {
            Some(len) => FaceVerifier::with_min_sample_len(*len),
            None => FaceVerifier::new(),
        }),
        VerifierConfig::Iris { min_sample_len } => Arc::new(match min_sample_len {
            Some(len) => IrisVerifier::with_min_sample_len(*len),
            None => IrisVerifier::new(),
        }),
        VerifierConfig::Permissive => Arc::new(PermissiveVerifier::new()),
        VerifierConfig::Composite { policy, members } => {
            let members = members
                .iter()
                .map(build_verifier)
                .collect::<Result<Vec<_>, _>>()?;
            Arc::new(CompositeVerifier::new(*policy, members)?)
        }
    };
    tracing::debug!(verifier = verifier.name(), "verifier built");
    Ok(verifier)
}
