//! Single-modality template verifiers.
//!
//! Feature extraction and fuzzy matching are the sensor vendor's business. These
//! verifiers treat the enrollment capture as canonical: a sample matches when its
//! modality-bound digest equals the template's, compared in constant time.

use biovote_crypto::{constant_time_eq, credential_digest};
use biovote_types::{BiometricSample, BiometricTemplate, Modality};

use crate::error::VerificationError;
use crate::method::Verifier;

/// Shortest fingerprint reading accepted, in bytes.
pub const MIN_FINGERPRINT_SAMPLE_LEN: usize = 16;
/// Shortest face reading accepted, in bytes.
pub const MIN_FACE_SAMPLE_LEN: usize = 32;
/// Shortest iris reading accepted, in bytes.
pub const MIN_IRIS_SAMPLE_LEN: usize = 32;

/// Input validation and digest comparison shared by the single-modality verifiers.
#[derive(Clone, Copy, Debug)]
struct TemplateMatcher {
    modality: Modality,
    min_sample_len: usize,
}

impl TemplateMatcher {
    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        if stored.modality() != self.modality {
            return Err(VerificationError::ModalityMismatch {
                expected: self.modality,
                actual: stored.modality(),
            });
        }
        if sample.modality() != self.modality {
            return Err(VerificationError::ModalityMismatch {
                expected: self.modality,
                actual: sample.modality(),
            });
        }
        if stored.is_empty() {
            return Err(VerificationError::invalid(format!(
                "stored {} template is empty",
                self.modality
            )));
        }
        if sample.is_empty() {
            return Err(VerificationError::invalid(format!(
                "{} sample is empty",
                self.modality
            )));
        }
        if sample.len() < self.min_sample_len {
            return Err(VerificationError::invalid(format!(
                "{} sample too short: {} bytes, need at least {}",
                self.modality,
                sample.len(),
                self.min_sample_len
            )));
        }

        let expected = credential_digest(self.modality, stored.as_bytes());
        let presented = credential_digest(self.modality, sample.as_bytes());
        let matched = constant_time_eq(&expected, &presented);
        tracing::debug!(modality = %self.modality, matched, "biometric sample evaluated");
        Ok(matched)
    }
}

/// Fingerprint verifier.
#[derive(Clone, Copy, Debug)]
pub struct FingerprintVerifier {
    matcher: TemplateMatcher,
}

impl FingerprintVerifier {
    pub fn new() -> Self {
        Self::with_min_sample_len(MIN_FINGERPRINT_SAMPLE_LEN)
    }

    pub fn with_min_sample_len(min_sample_len: usize) -> Self {
        Self {
            matcher: TemplateMatcher {
                modality: Modality::Fingerprint,
                min_sample_len,
            },
        }
    }
}

impl Default for FingerprintVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for FingerprintVerifier {
    fn name(&self) -> &str {
        "fingerprint"
    }

    fn supports(&self, modality: Modality) -> bool {
        modality == Modality::Fingerprint
    }

    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        self.matcher.verify(stored, sample)
    }
}

/// Face verifier.
#[derive(Clone, Copy, Debug)]
pub struct FaceVerifier {
    matcher: TemplateMatcher,
}

impl FaceVerifier {
    pub fn new() -> Self {
        Self::with_min_sample_len(MIN_FACE_SAMPLE_LEN)
    }

    pub fn with_min_sample_len(min_sample_len: usize) -> Self {
        Self {
            matcher: TemplateMatcher {
                modality: Modality::Face,
                min_sample_len,
            },
        }
    }
}

impl Default for FaceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for FaceVerifier {
    fn name(&self) -> &str {
        "face"
    }

    fn supports(&self, modality: Modality) -> bool {
        modality == Modality::Face
    }

    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        self.matcher.verify(stored, sample)
    }
}

/// Iris verifier.
#[derive(Clone, Copy, Debug)]
pub struct IrisVerifier {
    matcher: TemplateMatcher,
}

impl IrisVerifier {
    pub fn new() -> Self {
        Self::with_min_sample_len(MIN_IRIS_SAMPLE_LEN)
    }

    pub fn with_min_sample_len(min_sample_len: usize) -> Self {
        Self {
            matcher: TemplateMatcher {
                modality: Modality::Iris,
                min_sample_len,
            },
        }
    }
}

impl Default for IrisVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for IrisVerifier {
    fn name(&self) -> &str {
        "iris"
    }

    fn supports(&self, modality: Modality) -> bool {
        modality == Modality::Iris
    }

    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        self.matcher.verify(stored, sample)
    }
}
