//! Cryptographic primitives for biovote.
//!
//! - **Blake2b** digests of credential bytes, domain-separated by modality
//! - Constant-time comparison of digests so match timing does not leak how many
//!   leading bytes agreed

pub mod compare;
pub mod hash;

pub use compare::constant_time_eq;
pub use hash::{blake2b_256, blake2b_256_multi, credential_digest};
