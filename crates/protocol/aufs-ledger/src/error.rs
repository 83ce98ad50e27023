//! Error types for the token ledger.

use aufs_crypto::Principal;
use aufs_store::StoreError;
use aufs_types::{Amount, ErrorCode};
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while moving value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// Sender balance is below the transfer amount.
    #[error("transfer amount exceeds balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Amount,
        requested: Amount,
    },

    /// The zero principal cannot send or receive.
    #[error("transfer to or from the zero address")]
    ZeroAddress,

    /// A payload transfer targeted an address with no receiver hook.
    #[error("no transfer receiver at {0}")]
    NoReceiver(Principal),

    /// A balance or the supply would exceed the amount range.
    #[error("amount overflow: {current} + {amount}")]
    Overflow { current: Amount, amount: Amount },

    /// Storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            Self::ZeroAddress => ErrorCode::InvalidAddress,
            Self::NoReceiver(_) => ErrorCode::NoReceiver,
            Self::Overflow { .. } => ErrorCode::AmountOverflow,
            Self::Store(_) => ErrorCode::StorageFailure,
        }
    }
}
