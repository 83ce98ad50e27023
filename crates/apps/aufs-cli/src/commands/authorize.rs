//! Grant or revoke capabilities on a path.

use aufs_crypto::Principal;
use aufs_types::Capabilities;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, ReceiptOutput, Render};

/// Execute the authorize command.
pub fn authorize(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    path: &str,
    capabilities: Capabilities,
    beneficiary: Option<Principal>,
    duration: Option<u64>,
    revoke: bool,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let full_path = ctx.host.resolve_path(path)?;

    let (action, receipt) = if revoke {
        let beneficiary = ctx.principal_or_caller(beneficiary)?;
        let receipt = ctx.host.revoke_authorization(caller, beneficiary, path)?;
        (format!("Revoked {} on {}", beneficiary, full_path), receipt)
    } else if beneficiary.is_none() && duration.is_none() {
        let receipt = ctx.host.set_authorization(caller, path, capabilities)?;
        (format!("Authorized {} on {}", capabilities, full_path), receipt)
    } else {
        let beneficiary = ctx.principal_or_caller(beneficiary)?;
        let receipt =
            ctx.host
                .authorize_for(caller, beneficiary, path, capabilities, duration)?;
        (
            format!("Authorized {} on {} for {}", capabilities, full_path, beneficiary),
            receipt,
        )
    };

    Ok(ReceiptOutput::new(action, receipt).render(format))
}
