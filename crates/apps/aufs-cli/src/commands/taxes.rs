//! Accrued proceeds.

use aufs_crypto::Principal;
use aufs_types::Amount;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, ReceiptOutput, Render, TaxesOutput};

/// Execute the taxes command.
pub fn taxes(ctx: &RegistryContext, format: OutputFormat) -> CliResult<String> {
    let registry = ctx.host.registry().address();
    let output = TaxesOutput {
        registry,
        total_taxes: ctx.host.total_taxes()?,
        registry_balance: ctx.host.balance_of(&registry)?,
    };
    Ok(output.render(format))
}

/// Execute the withdraw-tax command.
pub fn withdraw_tax(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    amount: Amount,
    to: Option<Principal>,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let to = to.unwrap_or(caller);
    let receipt = ctx.host.withdraw_tax(caller, to, amount)?;
    Ok(ReceiptOutput::new(format!("Withdrew {} to {}", amount, to), receipt).render(format))
}
