//! Transfer tokens.

use aufs_crypto::Principal;
use aufs_types::Amount;

use crate::context::RegistryContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, ReceiptOutput, Render};

/// Execute the transfer command.
pub fn transfer(
    ctx: &mut RegistryContext,
    format: OutputFormat,
    to: Principal,
    amount: Amount,
) -> CliResult<String> {
    let caller = ctx.caller()?;
    let receipt = ctx.host.transfer(caller, to, amount)?;
    Ok(ReceiptOutput::new(format!("Sent {} to {}", amount, to), receipt).render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{alice, bob, deployed, open_as};
    use aufs_types::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_transfer() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let mut ctx = open_as(&config, alice());

        let output = transfer(&mut ctx, OutputFormat::Human, bob(), 2_500).unwrap();
        assert!(output.contains("Sent 2500"));
        assert_eq!(ctx.host.balance_of(&alice()).unwrap(), 7_500);
        assert_eq!(ctx.host.balance_of(&bob()).unwrap(), 2_500);
    }

    #[test]
    fn test_transfer_exceeding_balance() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let mut ctx = open_as(&config, bob());

        let err = transfer(&mut ctx, OutputFormat::Human, alice(), 1).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InsufficientBalance);
    }

    #[test]
    fn test_transfer_to_zero_address() {
        let temp_dir = TempDir::new().unwrap();
        let config = deployed(&temp_dir);
        let mut ctx = open_as(&config, alice());

        let err = transfer(&mut ctx, OutputFormat::Human, Principal::ZERO, 1).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidAddress);
    }
}
