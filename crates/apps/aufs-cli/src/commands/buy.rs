//! Buy a time-bounded grant.

use aufs_crypto::Principal;
use aufs_types::Amount;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, ReceiptOutput, Render};

/// Execute the buy command.
///
/// Pays `amount` (or the owning seller's current price) to the registry
/// with a purchase order for `beneficiary`, defaulting to the caller.
pub fn buy(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    path: &str,
    amount: Option<Amount>,
    beneficiary: Option<Principal>,
    duration_secs: u32,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let beneficiary = beneficiary.unwrap_or(caller);
    let amount = match amount {
        Some(amount) => amount,
        None => {
            let seller = ctx.host.path_owner(path)?;
            ctx.host.price(&seller)?
        }
    };

    let full_path = ctx.host.resolve_path(path)?;
    let receipt = ctx
        .host
        .buy(caller, full_path.as_str(), beneficiary, duration_secs, amount)?;

    let action = format!(
        "Bought {}s on {} for {} (paid {})",
        duration_secs, full_path, beneficiary, amount
    );
    Ok(ReceiptOutput::new(action, receipt).render(format))
}
