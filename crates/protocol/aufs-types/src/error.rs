//! Error types for the AuFS registry.
//!
//! This module defines the stable error codes surfaced to callers and the
//! parse errors raised by the domain types in this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes.
///
/// Every rejection an operation can produce maps to exactly one code so that
/// callers can distinguish failure kinds without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Access Errors (0x0001 - 0x00FF)
    // =========================================================================
    /// Caller lacks the delegated capability or owner role
    Unauthorized = 0x0001,
    /// Resource-level capability check failed
    Forbidden = 0x0002,

    // =========================================================================
    // Payment Errors (0x0100 - 0x01FF)
    // =========================================================================
    /// Purchase amount below the required price
    InsufficientPayment = 0x0100,
    /// Withdrawal exceeds accrued taxes
    InsufficientFunds = 0x0101,
    /// Token balance too low for the transfer
    InsufficientBalance = 0x0102,
    /// Payload transfer sent to an address with no receiver hook
    NoReceiver = 0x0103,
    /// Arithmetic overflow in a balance or accumulator
    AmountOverflow = 0x0104,

    // =========================================================================
    // Validation Errors (0x0200 - 0x02FF)
    // =========================================================================
    /// Purchase payload malformed or undecodable
    InvalidPayload = 0x0200,
    /// Path malformed or outside the mount
    InvalidPath = 0x0201,
    /// Price outside the permitted bounds
    InvalidPrice = 0x0202,
    /// Zero address used as a transfer party
    InvalidAddress = 0x0203,
    /// Deployment parameters rejected
    InvalidConfig = 0x0204,

    // =========================================================================
    // Storage Errors (0x0300 - 0x03FF)
    // =========================================================================
    /// Persistent storage failure
    StorageFailure = 0x0300,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error
    InternalError = 0xFFFF,
}

impl ErrorCode {
    /// Returns true if this is an access error (0x0001-0x00FF)
    pub fn is_access_error(&self) -> bool {
        let code = *self as u16;
        (0x0001..=0x00FF).contains(&code)
    }

    /// Returns true if this is a payment error (0x0100-0x01FF)
    pub fn is_payment_error(&self) -> bool {
        let code = *self as u16;
        (0x0100..=0x01FF).contains(&code)
    }

    /// Returns true if this is a validation error (0x0200-0x02FF)
    pub fn is_validation_error(&self) -> bool {
        let code = *self as u16;
        (0x0200..=0x02FF).contains(&code)
    }

    /// Returns true if this is a storage error (0x0300-0x03FF)
    pub fn is_storage_error(&self) -> bool {
        let code = *self as u16;
        (0x0300..=0x03FF).contains(&code)
    }

    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Unauthorized => Some("Ask the path administrator to delegate the capability with 'aufs delegate'."),
            Self::Forbidden => Some("The beneficiary needs an active grant with the set_uri capability. See 'aufs authorize' or 'aufs buy'."),
            Self::InsufficientPayment => Some("Pay at least the listed price. Use 'aufs price' to look it up."),
            Self::InsufficientFunds => Some("Withdraw no more than the accrued taxes. Use 'aufs taxes' to check."),
            Self::InsufficientBalance => Some("Check your balance with 'aufs balance'."),
            Self::NoReceiver => Some("Payload transfers can only be sent to the registry address."),
            Self::AmountOverflow => Some("The amount is too large to be booked."),
            Self::InvalidPayload => Some("The purchase order could not be decoded. Check path, beneficiary and duration."),
            Self::InvalidPath => Some("Paths are absolute, slash-separated and may not contain '.', '..' or empty segments."),
            Self::InvalidPrice => Some("The default price must lie between MIN_PRICE and MAX_PRICE."),
            Self::InvalidAddress => Some("The zero address cannot send or receive tokens."),
            Self::InvalidConfig => Some("Check the [registry] and [token] sections of the configuration file."),
            Self::StorageFailure => Some("Check the database path and permissions."),
            Self::InternalError => Some("An internal error occurred. Please report this issue."),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        if self.is_access_error() {
            "Access"
        } else if self.is_payment_error() {
            "Payment"
        } else if self.is_validation_error() {
            "Validation"
        } else if self.is_storage_error() {
            "Storage"
        } else {
            "Internal"
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::Forbidden => write!(f, "FORBIDDEN"),
            ErrorCode::InsufficientPayment => write!(f, "INSUFFICIENT_PAYMENT"),
            ErrorCode::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            ErrorCode::InsufficientBalance => write!(f, "INSUFFICIENT_BALANCE"),
            ErrorCode::NoReceiver => write!(f, "NO_RECEIVER"),
            ErrorCode::AmountOverflow => write!(f, "AMOUNT_OVERFLOW"),
            ErrorCode::InvalidPayload => write!(f, "INVALID_PAYLOAD"),
            ErrorCode::InvalidPath => write!(f, "INVALID_PATH"),
            ErrorCode::InvalidPrice => write!(f, "INVALID_PRICE"),
            ErrorCode::InvalidAddress => write!(f, "INVALID_ADDRESS"),
            ErrorCode::InvalidConfig => write!(f, "INVALID_CONFIG"),
            ErrorCode::StorageFailure => write!(f, "STORAGE_FAILURE"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Errors raised while validating a registry path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Path is empty
    #[error("path is empty")]
    Empty,

    /// Path does not start with '/'
    #[error("path must be absolute: {0}")]
    NotAbsolute(String),

    /// Path contains '//'
    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),

    /// Path contains '.' or '..'
    #[error("path contains a relative segment: {0}")]
    RelativeSegment(String),

    /// Path contains a control character
    #[error("path contains a control character")]
    ControlCharacter,

    /// Path exceeds the byte limit
    #[error("path too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },

    /// Path exceeds the depth limit below the mount
    #[error("path too deep: {depth} segments below the mount (max {max})")]
    TooDeep { depth: usize, max: usize },

    /// Path lies outside the registry mount
    #[error("path {path} is outside mount {mount}")]
    OutsideMount { path: String, mount: String },
}

/// Errors raised while parsing attribute, capability or domain strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unknown path attribute
    #[error("unknown path attribute: {0}")]
    UnknownAttr(String),

    /// Unknown capability name
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// Malformed domain scheme
    #[error("invalid scheme: {0}")]
    InvalidScheme(String),

    /// Malformed domain label
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
}
