//! Bind a content fingerprint to a path.

use std::path::Path;

use aufs_crypto::{content_hash, Hash, Principal};

use crate::context::RegistryContext;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ReceiptOutput, Render};

/// Execute the set-uri command.
///
/// The fingerprint is either given directly or computed from `file`.
pub fn set_uri(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    path: &str,
    fingerprint: Option<Hash>,
    file: Option<&Path>,
    beneficiary: Option<Principal>,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let beneficiary = beneficiary.unwrap_or(caller);

    let fingerprint = match (fingerprint, file) {
        (Some(hash), _) => hash,
        (None, Some(file)) => {
            if !file.exists() {
                return Err(CliError::user(format!("File not found: {}", file.display())));
            }
            content_hash(&std::fs::read(file)?)
        }
        (None, None) => return Err(CliError::user("Pass a fingerprint or --file")),
    };

    let receipt = ctx.host.set_uri(caller, beneficiary, path, fingerprint)?;
    let action = format!("Bound {} to {}", fingerprint, ctx.host.resolve_path(path)?);
    Ok(ReceiptOutput::new(action, receipt).render(format))
}
