//! Price queries and updates.

use aufs_crypto::Principal;
use aufs_types::Amount;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, PriceOutput, ReceiptOutput, Render};

/// Execute the price command.
///
/// With `path`, quotes the seller owning that path; otherwise quotes
/// `principal` or the caller.
pub fn price(
    ctx: &RegistryContext,
    format: OutputFormat,
    principal: Option<Principal>,
    path: Option<&str>,
) -> CliResult<String> {
    let (seller, path) = match path {
        Some(path) => (
            ctx.host.path_owner(path)?,
            Some(ctx.host.resolve_path(path)?.to_string()),
        ),
        None => (ctx.principal_or_caller(principal)?, None),
    };

    let output = PriceOutput {
        default_price: ctx.host.default_price()?,
        principal: seller,
        price: ctx.host.price(&seller)?,
        path,
    };
    Ok(output.render(format))
}

/// Execute the set-default-price command.
pub fn set_default_price(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    price: Amount,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let receipt = ctx.host.set_default_price(caller, price)?;
    Ok(ReceiptOutput::new(format!("Default price set to {}", price), receipt).render(format))
}

/// Execute the set-user-price command.
///
/// `price` of `None` clears the caller's override.
pub fn set_user_price(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    price: Option<Amount>,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let (action, receipt) = match price {
        Some(price) => (
            format!("Price set to {}", price),
            ctx.host.set_user_price(caller, price)?,
        ),
        None => ("Price override cleared".to_string(), ctx.host.clear_user_price(caller)?),
    };
    Ok(ReceiptOutput::new(action, receipt).render(format))
}
