//! Content fingerprinting.
//!
//! Content fingerprints are computed using SHA-256 with domain separation:
//! ```text
//! ContentHash(content) = H(0x01 || len(content) as u64be || content)
//! ```

use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::Hash;

/// Domain separator for content hashing. Must differ from the key and
/// contract-address domains in identity.rs.
const DOMAIN_CONTENT: u8 = 0x01;

/// Compute the content fingerprint of the given bytes.
///
/// # Example
/// ```
/// use aufs_crypto::content_hash;
///
/// let hash = content_hash(b"Hello, AuFS!");
/// assert_eq!(hash.0.len(), 32);
/// ```
pub fn content_hash(content: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([DOMAIN_CONTENT]);
    hasher.update((content.len() as u64).to_be_bytes());
    hasher.update(content);
    Hash(hasher.finalize().into())
}

/// Parse a 32-byte hash from hex, with or without a `0x` prefix.
///
/// This is the format external tooling uses for `bytes32` content ids.
///
/// # Example
/// ```
/// use aufs_crypto::hash_from_string;
///
/// let cid = "0x6b18e70d5beb530a13e867a82444ac6b064697ab59818a868d32c3dea33d507c";
/// let hash = hash_from_string(cid).unwrap();
/// assert_eq!(hash.to_string(), cid);
/// ```
pub fn hash_from_string(s: &str) -> Result<Hash, CryptoError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
    Ok(Hash(arr))
}
