//! Command-line interface for the AuFS rights registry.
//!
//! This crate provides the `aufs` binary for driving a registry deployed
//! over a SQLite database. It includes commands for:
//!
//! - **Setup**: Deploy a registry, generate identities
//! - **Administration**: Delegate path attributes, grant capabilities, bind fingerprints
//! - **Pricing**: Quote, set the default price, set or clear a seller price
//! - **Tokens**: Buy grants, transfer, check balances, withdraw proceeds
//! - **Inspection**: Dump the registry or a single path
//!
//! # Quick Start
//!
//! ```bash
//! # Deploy, owned by a fresh identity
//! aufs keygen
//! aufs init --owner 0x.. --default-price 1000
//!
//! # Hand a sub-tree to a seller
//! aufs delegate /dir1 can-authorize --to 0x..
//!
//! # Buy a day of access as someone else
//! aufs --caller 0x.. buy /dir1/movie1.mp4
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format` for output control:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `config.toml` in the data directory
//! (`AUFS_DATA_DIR` or the platform default). Override with `--config`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use context::RegistryContext;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};

use config::default_config_path;

/// Execute a parsed command line and return its rendered output.
pub fn run(cli: Cli) -> CliResult<String> {
    let format = OutputFormat::from(cli.format);
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Init {
            owner,
            scheme,
            mount,
            default_price,
            initial_supply,
            airdrop,
            database,
            force,
        } => {
            let options = commands::InitOptions {
                owner,
                scheme,
                mount,
                default_price,
                initial_supply,
                airdrop,
                database,
                force,
            };
            commands::init(&config_path, cli.caller, options, format)
        }
        Commands::Keygen => commands::keygen(format),
        command => {
            let config = CliConfig::load(&config_path)?;
            let mut ctx = RegistryContext::open(config, cli.caller, cli.at)?;
            dispatch(&mut ctx, command, format)
        }
    }
}

fn dispatch(ctx: &mut RegistryContext, command: Commands, format: OutputFormat) -> CliResult<String> {
    match command {
        Commands::Delegate {
            path,
            attr,
            to,
            remove,
        } => commands::delegate(ctx, format, &path, attr, to, remove),
        Commands::Authorize {
            path,
            capabilities,
            beneficiary,
            duration,
            revoke,
        } => commands::authorize(ctx, format, &path, capabilities, beneficiary, duration, revoke),
        Commands::SetUri {
            path,
            fingerprint,
            file,
            beneficiary,
        } => commands::set_uri(ctx, format, &path, fingerprint, file.as_deref(), beneficiary),
        Commands::Price { principal, path } => {
            commands::price(ctx, format, principal, path.as_deref())
        }
        Commands::SetDefaultPrice { price } => commands::set_default_price(ctx, format, price),
        Commands::SetUserPrice { price, clear } => {
            let price = if clear { None } else { price };
            commands::set_user_price(ctx, format, price)
        }
        Commands::Buy {
            path,
            amount,
            beneficiary,
            duration,
        } => commands::buy(ctx, format, &path, amount, beneficiary, duration),
        Commands::Transfer { to, amount } => commands::transfer(ctx, format, to, amount),
        Commands::Balance { principal } => commands::balance(ctx, format, principal),
        Commands::Taxes => commands::taxes(ctx, format),
        Commands::WithdrawTax { amount, to } => commands::withdraw_tax(ctx, format, amount, to),
        Commands::Inspect { path, principal } => {
            commands::inspect(ctx, format, path.as_deref(), principal)
        }
        Commands::Init { .. } | Commands::Keygen => Err(CliError::user(
            "init and keygen do not run against an open registry",
        )),
    }
}
