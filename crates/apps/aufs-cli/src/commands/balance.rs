//! Show a token balance.

use aufs_crypto::Principal;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{BalanceOutput, OutputFormat, Render};

/// Execute the balance command.
pub fn balance(
    ctx: &RegistryContext,
    format: OutputFormat,
    principal: Option<Principal>,
) -> CliResult<String> {
    let principal = ctx.principal_or_caller(principal)?;
    let token = ctx.host.ledger().config();

    let output = BalanceOutput {
        principal,
        balance: ctx.host.balance_of(&principal)?,
        symbol: token.symbol.clone(),
        decimals: token.decimals,
    };
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{alice, deployed, open_as, owner};
    use crate::error::CliError;
    use tempfile::TempDir;

    #[test]
    fn test_balance_of_caller() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let ctx = open_as(&config, owner());

        let output = balance(&ctx, OutputFormat::Json, None).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["balance"], 90_000);
        assert_eq!(json["symbol"], "AUR");

        let output = balance(&ctx, OutputFormat::Human, Some(alice())).unwrap();
        assert!(output.contains("10000 AUR"));
    }

    #[test]
    fn test_balance_without_caller() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let ctx = RegistryContext::open(config, None, None).unwrap();

        let result = balance(&ctx, OutputFormat::Human, None);
        assert!(matches!(result, Err(CliError::CallerRequired)));
    }
}
