//! Grant or remove a path attribute.

use aufs_crypto::Principal;
use aufs_types::PathAttr;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, ReceiptOutput, Render};

/// Execute the delegate command.
///
/// Without a grantee the caller claims the attribute for itself.
pub fn delegate(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    path: &str,
    attr: PathAttr,
    to: Option<Principal>,
    remove: bool,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let receipt = match to {
        Some(grantee) => ctx.host.delegate(caller, grantee, path, attr, remove)?,
        None => ctx.host.set_delegate(caller, path, attr, remove)?,
    };

    let verb = if remove { "Removed" } else { "Delegated" };
    let action = format!("{} {} on {}", verb, attr, ctx.host.resolve_path(path)?);
    Ok(ReceiptOutput::new(action, receipt).render(format))
}
