//! Biometric credential types.
//!
//! A [`BiometricTemplate`] is the reference data captured at registration. A
//! [`BiometricSample`] is a fresh reading presented at authentication time.
//! Both are opaque byte strings tagged with the [`Modality`] that produced them.
//!
//! Neither type implements `Serialize`, and `Debug` output is redacted. Bytes are
//! zeroized on drop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TypesError;

/// The kind of sensor that produced a template or sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Fingerprint,
    Face,
    Iris,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Fingerprint, Modality::Face, Modality::Iris];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Fingerprint => "fingerprint",
            Modality::Face => "face",
            Modality::Iris => "iris",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fingerprint" => Ok(Modality::Fingerprint),
            "face" => Ok(Modality::Face),
            "iris" => Ok(Modality::Iris),
            other => Err(TypesError::UnknownModality(other.to_string())),
        }
    }
}

/// Reference biometric data captured at registration.
///
/// Write-once: there is no way to mutate the bytes after construction, and the
/// type intentionally does not implement `Clone` so that a registry can hold the
/// only copy.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BiometricTemplate {
    #[zeroize(skip)]
    modality: Modality,
    bytes: Vec<u8>,
}

impl BiometricTemplate {
    /// Capture a template. Empty templates are rejected.
    pub fn new(modality: Modality, bytes: impl Into<Vec<u8>>) -> Result<Self, TypesError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TypesError::EmptyTemplate(modality.as_str()));
        }
        Ok(Self { modality, bytes })
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Raw template bytes, for verifier implementations only.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for BiometricTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiometricTemplate")
            .field("modality", &self.modality)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// A biometric reading submitted for authentication.
///
/// Unlike a template, a sample is not validated on construction: an empty or
/// truncated reading is a legitimate input that verifiers must reject with an
/// explicit error rather than a silent no-match.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BiometricSample {
    #[zeroize(skip)]
    modality: Modality,
    bytes: Vec<u8>,
}

impl BiometricSample {
    pub fn new(modality: Modality, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            modality,
            bytes: bytes.into(),
        }
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for BiometricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiometricSample")
            .field("modality", &self.modality)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_template_rejected() {
        let err = BiometricTemplate::new(Modality::Iris, Vec::new()).unwrap_err();
        assert_eq!(err, TypesError::EmptyTemplate("iris"));
    }

    #[test]
    fn debug_output_is_redacted() {
        let template = BiometricTemplate::new(Modality::Fingerprint, b"secret-ridges".to_vec()).unwrap();
        let sample = BiometricSample::new(Modality::Fingerprint, b"secret-ridges".to_vec());
        let t = format!("{template:?}");
        let s = format!("{sample:?}");
        assert!(!t.contains("secret"));
        assert!(!s.contains("secret"));
        assert!(t.contains("len: 13"));
    }

    #[test]
    fn empty_sample_is_constructible() {
        let sample = BiometricSample::new(Modality::Face, Vec::new());
        assert!(sample.is_empty());
        assert_eq!(sample.modality(), Modality::Face);
    }

    #[test]
    fn modality_parses_case_insensitively() {
        assert_eq!("Fingerprint".parse::<Modality>().unwrap(), Modality::Fingerprint);
        assert_eq!(" IRIS".parse::<Modality>().unwrap(), Modality::Iris);
        assert!("palm".parse::<Modality>().is_err());
    }
}
