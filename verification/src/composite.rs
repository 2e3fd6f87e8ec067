//! Multi-factor verifier combining other verifiers with AND / OR semantics.

use std::sync::Arc;

use biovote_types::{BiometricSample, BiometricTemplate, Modality};
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;
use crate::method::Verifier;

/// How member decisions are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositePolicy {
    /// Every applicable member must match.
    All,
    /// At least one applicable member must match.
    Any,
}

/// Combines member verifiers under a [`CompositePolicy`].
///
/// Only members that support the stored template's modality take part. Evaluation
/// short-circuits: `All` stops at the first no-match, `Any` at the first match.
/// A member error aborts evaluation and is returned as-is.
pub struct CompositeVerifier {
    policy: CompositePolicy,
    members: Vec<Arc<dyn Verifier>>,
    name: String,
}

impl CompositeVerifier {
    pub fn new(
        policy: CompositePolicy,
        members: Vec<Arc<dyn Verifier>>,
    ) -> Result<Self, VerificationError> {
        if members.is_empty() {
            return Err(VerificationError::EmptyComposite);
        }
        let joined = members
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(match policy {
                CompositePolicy::All => "+",
                CompositePolicy::Any => "|",
            });
        Ok(Self {
            policy,
            members,
            name: format!("composite({joined})"),
        })
    }

    pub fn policy(&self) -> CompositePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Verifier for CompositeVerifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, modality: Modality) -> bool {
        self.members.iter().any(|m| m.supports(modality))
    }

    fn verify(
        &self,
        stored: &BiometricTemplate,
        sample: &BiometricSample,
    ) -> Result<bool, VerificationError> {
        let modality = stored.modality();
        let mut applicable = self.members.iter().filter(|m| m.supports(modality)).peekable();
        if applicable.peek().is_none() {
            return Err(VerificationError::InvalidCredentialInput {
                reason: format!("no member of {} accepts {modality} templates", self.name),
            });
        }

        match self.policy {
            CompositePolicy::All => {
                for member in applicable {
                    if !member.verify(stored, sample)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            CompositePolicy::Any => {
                for member in applicable {
                    if member.verify(stored, sample)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biometric::{FaceVerifier, FingerprintVerifier};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Member with a fixed decision that counts how often it is asked.
    struct Fixed {
        decision: bool,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(decision: bool) -> Arc<Self> {
            Arc::new(Self {
                decision,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Verifier for Fixed {
        fn name(&self) -> &str {
            if self.decision {
                "yes"
            } else {
                "no"
            }
        }

        fn supports(&self, modality: Modality) -> bool {
            modality == Modality::Fingerprint
        }

        fn verify(
            &self,
            _stored: &BiometricTemplate,
            _sample: &BiometricSample,
        ) -> Result<bool, VerificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.decision)
        }
    }

    fn template() -> BiometricTemplate {
        BiometricTemplate::new(Modality::Fingerprint, b"fingerprint_data_1".to_vec()).unwrap()
    }

    fn sample() -> BiometricSample {
        BiometricSample::new(Modality::Fingerprint, b"fingerprint_data_1".to_vec())
    }

    #[test]
    fn empty_composite_rejected() {
        let err = CompositeVerifier::new(CompositePolicy::All, Vec::new()).err();
        assert_eq!(err, Some(VerificationError::EmptyComposite));
    }

    #[test]
    fn all_requires_every_member() {
        let yes = Fixed::new(true);
        let no = Fixed::new(false);
        let members: Vec<Arc<dyn Verifier>> = vec![yes.clone(), no.clone()];
        let v = CompositeVerifier::new(CompositePolicy::All, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(false));

        let members: Vec<Arc<dyn Verifier>> = vec![yes.clone(), yes.clone()];
        let v = CompositeVerifier::new(CompositePolicy::All, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(true));
    }

    #[test]
    fn all_short_circuits_on_first_no_match() {
        let no = Fixed::new(false);
        let yes = Fixed::new(true);
        let members: Vec<Arc<dyn Verifier>> = vec![no.clone(), yes.clone()];
        let v = CompositeVerifier::new(CompositePolicy::All, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(false));
        assert_eq!(no.calls.load(Ordering::SeqCst), 1);
        assert_eq!(yes.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn any_short_circuits_on_first_match() {
        let no = Fixed::new(false);
        let yes = Fixed::new(true);
        let later = Fixed::new(false);
        let members: Vec<Arc<dyn Verifier>> = vec![no.clone(), yes.clone(), later.clone()];
        let v = CompositeVerifier::new(CompositePolicy::Any, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(true));
        assert_eq!(later.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn any_with_no_matches_is_false() {
        let members: Vec<Arc<dyn Verifier>> = vec![Fixed::new(false), Fixed::new(false)];
        let v = CompositeVerifier::new(CompositePolicy::Any, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(false));
    }

    #[test]
    fn non_applicable_members_are_skipped() {
        let members: Vec<Arc<dyn Verifier>> =
            vec![Arc::new(FingerprintVerifier::new()), Arc::new(FaceVerifier::new())];
        let v = CompositeVerifier::new(CompositePolicy::All, members).unwrap();
        assert_eq!(v.verify(&template(), &sample()), Ok(true));
        assert!(v.supports(Modality::Face));
        assert!(!v.supports(Modality::Iris));
    }

    #[test]
    fn unsupported_template_is_invalid_input() {
        let members: Vec<Arc<dyn Verifier>> = vec![Arc::new(FaceVerifier::new())];
        let v = CompositeVerifier::new(CompositePolicy::Any, members).unwrap();
        let err = v.verify(&template(), &sample()).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidCredentialInput { .. }));
    }

    #[test]
    fn member_errors_propagate() {
        let members: Vec<Arc<dyn Verifier>> = vec![Arc::new(FingerprintVerifier::new())];
        let v = CompositeVerifier::new(CompositePolicy::Any, members).unwrap();
        let empty = BiometricSample::new(Modality::Fingerprint, Vec::new());
        assert!(v.verify(&template(), &empty).is_err());
    }

    #[test]
    fn name_lists_members() {
        let members: Vec<Arc<dyn Verifier>> =
            vec![Arc::new(FingerprintVerifier::new()), Arc::new(FaceVerifier::new())];
        let v = CompositeVerifier::new(CompositePolicy::All, members).unwrap();
        assert_eq!(v.name(), "composite(fingerprint+face)");
    }
}
