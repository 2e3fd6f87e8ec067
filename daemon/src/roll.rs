//! Voter roll files.
//!
//! ```toml
//! [[voters]]
//! id = 1
//! name = "Alice"
//! modality = "fingerprint"
//! template = "66696e6765727072696e745f646174615f31"
//!
//! [[ballots]]
//! id = 1
//! modality = "fingerprint"
//! sample = "66696e6765727072696e745f646174615f31"
//! ```
//!
//! Credential bytes are hex-encoded.

use std::path::{Path, PathBuf};

use biovote_types::{BiometricSample, BiometricTemplate, Modality, TypesError, VoterId, VoterName};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollError {
    #[error("failed to read roll {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roll: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("voter {id}: {field} is not valid hex: {source}")]
    Hex {
        id: VoterId,
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("voter {id}: {source}")]
    Template {
        id: VoterId,
        #[source]
        source: TypesError,
    },
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Roll {
    #[serde(default)]
    pub voters: Vec<RollVoter>,
    #[serde(default)]
    pub ballots: Vec<RollBallot>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RollVoter {
    pub id: VoterId,
    pub name: VoterName,
    pub modality: Modality,
    template: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RollBallot {
    pub id: VoterId,
    pub modality: Modality,
    sample: String,
}

impl Roll {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RollError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RollError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RollError> {
        Ok(toml::from_str(s)?)
    }
}

impl RollVoter {
    /// Decode the enrollment capture.
    pub fn credential(&self) -> Result<BiometricTemplate, RollError> {
        let bytes = hex::decode(self.template.trim()).map_err(|source| RollError::Hex {
            id: self.id,
            field: "template",
            source,
        })?;
        BiometricTemplate::new(self.modality, bytes).map_err(|source| RollError::Template {
            id: self.id,
            source,
        })
    }
}

impl RollBallot {
    /// Decode the submitted reading. An empty sample decodes fine; the verifier
    /// decides what to make of it.
    pub fn sample(&self) -> Result<BiometricSample, RollError> {
        let bytes = hex::decode(self.sample.trim()).map_err(|source| RollError::Hex {
            id: self.id,
            field: "sample",
            source,
        })?;
        Ok(BiometricSample::new(self.modality, bytes))
    }
}
