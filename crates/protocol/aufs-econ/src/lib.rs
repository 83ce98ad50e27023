//! Pricing and tax arithmetic for the AuFS rights registry.
//!
//! This crate holds the pure economic rules the registry applies:
//!
//! - **Price Validation**: the global default price must stay within
//!   `MIN_PRICE..=MAX_PRICE`
//! - **Price Resolution**: a seller's override wins over the default
//! - **Payment Check**: a purchase must pay at least the resolved price
//! - **Tax Accrual**: proceeds are added to and withdrawn from one
//!   accumulator with checked arithmetic
//!
//! # Example
//!
//! ```
//! use aufs_econ::{accrue_tax, check_payment, resolve_price, validate_price, withdraw_tax};
//!
//! assert!(validate_price(100).is_ok());
//!
//! let required = resolve_price(None, 1000);
//! let excess = check_payment(required, 1200).unwrap();
//! assert_eq!(excess, 200);
//!
//! // The full paid amount is booked, excess included
//! let taxes = accrue_tax(0, 1200).unwrap();
//! assert_eq!(withdraw_tax(taxes, 1200).unwrap(), 0);
//! ```

pub mod error;
pub mod price;
pub mod tax;

pub use error::{EconError, EconResult};
pub use price::{check_payment, resolve_price, validate_price};
pub use tax::{accrue_tax, withdraw_tax};
