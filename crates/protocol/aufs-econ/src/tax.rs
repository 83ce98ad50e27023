//! Tax ledger arithmetic.
//!
//! The tax ledger is a single accumulator. It grows by the full paid amount
//! of each purchase and shrinks only through owner withdrawals. Both
//! directions use checked arithmetic, so the accumulator never wraps and
//! never goes negative.

use aufs_types::Amount;

use crate::error::{EconError, EconResult};

/// Add a purchase's proceeds to the accumulator.
///
/// # Example
/// ```
/// use aufs_econ::accrue_tax;
///
/// assert_eq!(accrue_tax(1000, 250).unwrap(), 1250);
/// assert!(accrue_tax(u64::MAX, 1).is_err());
/// ```
pub fn accrue_tax(current: Amount, amount: Amount) -> EconResult<Amount> {
    current
        .checked_add(amount)
        .ok_or(EconError::Overflow { current, amount })
}

/// Remove a withdrawal from the accumulator.
///
/// # Errors
/// `InsufficientFunds` when `amount > available`.
pub fn withdraw_tax(available: Amount, amount: Amount) -> EconResult<Amount> {
    available
        .checked_sub(amount)
        .ok_or(EconError::InsufficientFunds {
            available,
            requested: amount,
        })
}
