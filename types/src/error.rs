//! Validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid voter id: {0}")]
    InvalidVoterId(String),

    #[error("invalid voter name: {0}")]
    InvalidName(String),

    #[error("empty {0} template")]
    EmptyTemplate(&'static str),

    #[error("unknown biometric modality: {0}")]
    UnknownModality(String),
}
