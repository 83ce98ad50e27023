//! Error types for the payload codec.

use thiserror::Error;

/// Errors that can occur when encoding a payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// CBOR encoding failed
    #[error("CBOR encoding failed: {0}")]
    Cbor(String),

    /// Payload exceeds maximum allowed size
    #[error("payload too large: {size} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge {
        /// Actual size of the payload
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

impl From<ciborium::ser::Error<std::io::Error>> for EncodeError {
    fn from(err: ciborium::ser::Error<std::io::Error>) -> Self {
        EncodeError::Cbor(err.to_string())
    }
}

/// Errors that can occur when decoding a payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Payload exceeds maximum allowed size
    #[error("payload too large: {size} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge {
        /// Actual size of the payload
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Payload is empty
    #[error("payload is empty")]
    Empty,

    /// Failed to decode CBOR payload
    #[error("payload decode failed: {0}")]
    PayloadDecodeFailed(String),

    /// Bytes remained after the encoded value
    #[error("trailing bytes after payload: {0}")]
    TrailingBytes(usize),
}

impl From<ciborium::de::Error<std::io::Error>> for DecodeError {
    fn from(err: ciborium::de::Error<std::io::Error>) -> Self {
        DecodeError::PayloadDecodeFailed(err.to_string())
    }
}
