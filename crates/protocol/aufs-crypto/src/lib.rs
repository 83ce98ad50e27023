//! Identity and content-fingerprint primitives for the AuFS rights registry.
//!
//! This crate provides the small set of cryptographic building blocks the
//! registry relies on:
//!
//! - **Content fingerprints**: SHA-256 with domain separation ([`content_hash`])
//! - **Principals**: 20-byte address-like identities, derived from Ed25519 keys
//! - **Contract addresses**: deterministic addresses for deployed registries
//!
//! # Example
//!
//! ```
//! use aufs_crypto::{
//!     content_hash, generate_identity, principal_from_public_key, principal_from_string,
//! };
//!
//! let (_, public_key) = generate_identity();
//! let principal = principal_from_public_key(&public_key);
//! let text = principal.to_string();
//! assert!(text.starts_with("0x"));
//! assert_eq!(principal_from_string(&text).unwrap(), principal);
//!
//! let fingerprint = content_hash(b"movie1.mp4 bytes");
//! assert_eq!(fingerprint.0.len(), 32);
//! ```

mod error;
mod hash;
mod identity;
mod serde_impl;

pub use error::CryptoError;
pub use hash::{content_hash, hash_from_string};
pub use identity::{
    contract_address, generate_identity, principal_from_public_key, principal_from_string,
    principal_to_string,
};

use ed25519_dalek::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte SHA-256 hash.
///
/// Used as the fixed-size content fingerprint bound to leaf paths.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Create a Hash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({}...)", hex::encode(&self.0[..8]))
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for Hash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hash_from_string(s)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An Ed25519 private key (32 bytes).
///
/// Implements Zeroize + ZeroizeOnDrop to clear key material from memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Create a PrivateKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the private key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn from_signing_key(key: &SigningKey) -> Self {
        Self(key.to_bytes())
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        let signing_key = SigningKey::from_bytes(&self.0);
        PublicKey(signing_key.verifying_key().to_bytes())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// An Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create a PublicKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({}...)", hex::encode(&self.0[..8]))
    }
}

/// An address-like principal identifier (20 bytes).
///
/// A principal is both an account on the value ledger and an administrative
/// actor in the registry namespace. Textual form is `0x` + 40 lowercase hex
/// characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal(pub [u8; 20]);

impl Principal {
    /// The all-zero principal, used as the mint/burn counterparty.
    pub const ZERO: Principal = Principal([0u8; 20]);

    /// Create a Principal from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the principal.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero principal.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Principal({})", principal_to_string(self))
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&principal_to_string(self))
    }
}

impl std::str::FromStr for Principal {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        principal_from_string(s)
    }
}

impl AsRef<[u8]> for Principal {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Seconds since Unix epoch.
pub type Timestamp = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_display() {
        let hash = content_hash(b"test");
        let s = format!("{}", hash);
        assert_eq!(s.len(), 66);
        assert!(s.starts_with("0x"));
    }

    #[test]
    fn test_principal_display() {
        let (_, public_key) = generate_identity();
        let principal = principal_from_public_key(&public_key);
        let s = format!("{}", principal);
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42);
        assert_eq!(s, s.to_lowercase());
    }

    #[test]
    fn test_zero_principal() {
        assert!(Principal::ZERO.is_zero());
        assert_eq!(
            Principal::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_private_key_debug_redacted() {
        let (private_key, _) = generate_identity();
        let debug = format!("{:?}", private_key);
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_private_key_derives_public_key() {
        let (private_key, public_key) = generate_identity();
        assert_eq!(private_key.public_key(), public_key);
    }
}
