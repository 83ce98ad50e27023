//! Economic error types for the AuFS registry.
//!
//! This module defines the `EconError` enum used by the pricing and tax
//! functions in this crate.

use aufs_types::Amount;
use thiserror::Error;

/// Errors that can occur during economic calculations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EconError {
    // =========================================================================
    // Price Validation Errors
    // =========================================================================
    /// Price is below the minimum allowed
    #[error("price {price} is below minimum {min}")]
    PriceTooLow {
        /// The submitted price
        price: Amount,
        /// Minimum allowed price
        min: Amount,
    },

    /// Price exceeds the maximum allowed
    #[error("price {price} exceeds maximum {max}")]
    PriceTooHigh {
        /// The submitted price
        price: Amount,
        /// Maximum allowed price
        max: Amount,
    },

    // =========================================================================
    // Payment Errors
    // =========================================================================
    /// Paid amount is below the required price
    #[error("paid price is too low: required {required}, paid {paid}")]
    InsufficientPayment {
        /// Price the buyer had to pay
        required: Amount,
        /// Amount actually transferred
        paid: Amount,
    },

    // =========================================================================
    // Tax Ledger Errors
    // =========================================================================
    /// Withdrawal exceeds the accrued total
    #[error("insufficient taxes: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Accrued taxes
        available: Amount,
        /// Requested withdrawal
        requested: Amount,
    },

    /// Accrual would overflow the accumulator
    #[error("tax accumulator overflow: {current} + {amount}")]
    Overflow {
        /// Current accumulator value
        current: Amount,
        /// Amount being added
        amount: Amount,
    },
}

/// Result type for economic operations.
pub type EconResult<T> = std::result::Result<T, EconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EconError::PriceTooLow { price: 0, min: 1 };
        assert!(err.to_string().contains("below minimum"));

        let err = EconError::InsufficientPayment {
            required: 1000,
            paid: 999,
        };
        assert!(err.to_string().starts_with("paid price is too low"));

        let err = EconError::InsufficientFunds {
            available: 10,
            requested: 11,
        };
        assert!(err.to_string().contains("requested 11"));
    }
}
