//! Voter identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Unique identifier of a registered voter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(u64);

impl VoterId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VoterId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for VoterId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidVoterId(s.to_string()))
    }
}

/// A voter's display name.
///
/// Always non-empty after trimming and at most [`VoterName::MAX_LEN`] characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterName(String);

impl VoterName {
    /// Longest accepted display name, in characters.
    pub const MAX_LEN: usize = 128;

    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::InvalidName("name is empty".into()));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(TypesError::InvalidName(format!(
                "name exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VoterName {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VoterName> for String {
    fn from(name: VoterName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voter_id_parses_and_displays() {
        let id: VoterId = " 42 ".parse().unwrap();
        assert_eq!(id, VoterId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn voter_id_rejects_garbage() {
        let err = "alice".parse::<VoterId>().unwrap_err();
        assert!(matches!(err, TypesError::InvalidVoterId(_)));
    }

    #[test]
    fn name_is_trimmed() {
        let name = VoterName::new("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(VoterName::new("   ").is_err());
        assert!(VoterName::new("").is_err());
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "x".repeat(VoterName::MAX_LEN + 1);
        assert!(VoterName::new(long).is_err());
        let max = "x".repeat(VoterName::MAX_LEN);
        assert!(VoterName::new(max).is_ok());
    }
}
