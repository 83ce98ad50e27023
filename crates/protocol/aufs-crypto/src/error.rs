//! Error types for aufs-crypto

use thiserror::Error;

/// Errors that can occur when parsing identities and fingerprints
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Missing `0x` prefix on a principal string
    #[error("Invalid principal prefix: expected '0x', got '{0}'")]
    InvalidPrincipalPrefix(String),

    /// Invalid hex encoding
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Decoded bytes have the wrong length
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
