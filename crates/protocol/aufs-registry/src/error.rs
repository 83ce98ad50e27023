//! Error types for registry operations.
//!
//! Every rejection is surfaced as a distinct variant so callers can tell
//! an access failure from a payment failure without parsing messages.

use aufs_crypto::Principal;
use aufs_econ::EconError;
use aufs_ledger::LedgerError;
use aufs_store::StoreError;
use aufs_types::{Amount, ErrorCode, ParseError, PathError};
use aufs_wire::DecodeError;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    // =========================================================================
    // Access Errors
    // =========================================================================
    /// Caller lacks the delegated capability or owner role.
    #[error("unauthorized: {caller} cannot {action}")]
    Unauthorized { caller: Principal, action: String },

    /// Resource-level capability check failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    // =========================================================================
    // Payment Errors
    // =========================================================================
    /// Purchase amount below the required price.
    #[error("paid price is too low: required {required}, paid {paid}")]
    InsufficientPayment { required: Amount, paid: Amount },

    /// Withdrawal exceeds accrued taxes.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: Amount, requested: Amount },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Purchase payload malformed or undecodable.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Path malformed or too deep.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Price outside the permitted bounds.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Deployment parameters rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Economics error.
    #[error("econ error: {0}")]
    Econ(EconError),
}

impl RegistryError {
    /// Create an unauthorized error.
    pub fn unauthorized(caller: Principal, action: impl Into<String>) -> Self {
        RegistryError::Unauthorized {
            caller,
            action: action.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        RegistryError::Forbidden(msg.into())
    }

    /// Create an invalid payload error.
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        RegistryError::InvalidPayload(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        RegistryError::InvalidConfig(msg.into())
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            Self::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            Self::InvalidPayload(_) => ErrorCode::InvalidPayload,
            Self::InvalidPath(_) => ErrorCode::InvalidPath,
            Self::InvalidPrice(_) => ErrorCode::InvalidPrice,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,

            // Wrapped errors - delegate to inner type
            Self::Ledger(e) => e.error_code(),
            Self::Store(_) => ErrorCode::StorageFailure,
            Self::Econ(EconError::Overflow { .. }) => ErrorCode::AmountOverflow,
            Self::Econ(_) => ErrorCode::InternalError,
        }
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        self.error_code().suggestion()
    }
}

impl From<EconError> for RegistryError {
    fn from(e: EconError) -> Self {
        match e {
            EconError::PriceTooLow { .. } | EconError::PriceTooHigh { .. } => {
                RegistryError::InvalidPrice(e.to_string())
            }
            EconError::InsufficientPayment { required, paid } => {
                RegistryError::InsufficientPayment { required, paid }
            }
            EconError::InsufficientFunds {
                available,
                requested,
            } => RegistryError::InsufficientFunds {
                available,
                requested,
            },
            other => RegistryError::Econ(other),
        }
    }
}

impl From<DecodeError> for RegistryError {
    fn from(e: DecodeError) -> Self {
        RegistryError::InvalidPayload(e.to_string())
    }
}

impl From<ParseError> for RegistryError {
    fn from(e: ParseError) -> Self {
        RegistryError::InvalidConfig(e.to_string())
    }
}
