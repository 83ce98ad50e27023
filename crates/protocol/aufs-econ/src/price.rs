//! Price validation and resolution.

use aufs_types::{Amount, MAX_PRICE, MIN_PRICE};

use crate::error::{EconError, EconResult};

/// Validate that a default price is within registry bounds.
///
/// # Arguments
/// * `price` - The price to validate (in token base units)
///
/// # Returns
/// * `Ok(())` if the price is valid
/// * `Err(EconError::PriceTooLow)` if price < MIN_PRICE
/// * `Err(EconError::PriceTooHigh)` if price > MAX_PRICE
///
/// # Example
/// ```
/// use aufs_econ::validate_price;
///
/// assert!(validate_price(100).is_ok());
/// assert!(validate_price(0).is_err());
/// ```
pub fn validate_price(price: Amount) -> EconResult<()> {
    if price < MIN_PRICE {
        return Err(EconError::PriceTooLow {
            price,
            min: MIN_PRICE,
        });
    }
    if price > MAX_PRICE {
        return Err(EconError::PriceTooHigh {
            price,
            max: MAX_PRICE,
        });
    }
    Ok(())
}

/// Resolve the effective price of a seller.
///
/// A seller's own override wins; otherwise the global default applies.
///
/// # Example
/// ```
/// use aufs_econ::resolve_price;
///
/// assert_eq!(resolve_price(None, 200), 200);
/// assert_eq!(resolve_price(Some(1000), 200), 1000);
/// assert_eq!(resolve_price(Some(0), 200), 0);
/// ```
pub fn resolve_price(user_price: Option<Amount>, default_price: Amount) -> Amount {
    user_price.unwrap_or(default_price)
}

/// Check that a payment covers the required price.
///
/// # Returns
/// The excess over the required price, which the registry keeps.
pub fn check_payment(required: Amount, paid: Amount) -> EconResult<Amount> {
    if paid < required {
        return Err(EconError::InsufficientPayment { required, paid });
    }
    Ok(paid - required)
}
