//! Blake2b hashing for credential digests.

use biovote_types::Modality;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Domain prefix mixed into every credential digest.
const CREDENTIAL_DOMAIN: &[u8] = b"biovote/credential/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Digest of a credential's bytes, bound to the modality that captured them.
///
/// The same bytes captured as a fingerprint and as a face image produce
/// different digests.
pub fn credential_digest(modality: Modality, bytes: &[u8]) -> [u8; 32] {
    let len = (bytes.len() as u64).to_le_bytes();
    blake2b_256_multi(&[
        CREDENTIAL_DOMAIN,
        modality.as_str().as_bytes(),
        &len,
        bytes,
    ])
}
