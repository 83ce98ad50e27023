//! Deploy a registry.

use std::path::{Path, PathBuf};

use aufs_crypto::Principal;
use aufs_store::DATABASE_FILE;
use aufs_types::Amount;

use crate::config::CliConfig;
use crate::context::RegistryContext;
use crate::error::{CliError, CliResult};
use crate::output::{InitOutput, OutputFormat, Render};

/// Overrides accepted by `aufs init`.
#[derive(Debug, Default, Clone)]
pub struct InitOptions {
    pub owner: Option<Principal>,
    pub scheme: Option<String>,
    pub mount: Option<String>,
    pub default_price: Option<Amount>,
    pub initial_supply: Option<Amount>,
    pub airdrop: Option<Amount>,
    pub database: Option<PathBuf>,
    pub force: bool,
}

/// Execute the init command.
///
/// The configuration is written only after genesis succeeds, so a rejected
/// deployment leaves no file behind.
pub fn init(
    config_path: &Path,
    caller: Option<Principal>,
    options: InitOptions,
    format: OutputFormat,
) -> CliResult<String> {
    if config_path.exists() && !options.force {
        return Err(CliError::ConfigExists(config_path.to_path_buf()));
    }

    let owner = options.owner.or(caller).ok_or_else(|| {
        CliError::user("An owner is required. Pass --owner 0x.. or --caller 0x..")
    })?;

    let mut config = CliConfig::load(config_path)?;
    config.registry.owner = owner;
    if let Some(scheme) = options.scheme {
        config.registry.scheme = scheme;
    }
    if let Some(mount) = options.mount {
        config.registry.mount = mount;
    }
    if let Some(price) = options.default_price {
        config.registry.default_price = price;
    }
    if let Some(supply) = options.initial_supply {
        config.token.initial_supply = supply;
    }
    if let Some(airdrop) = options.airdrop {
        config.token.airdrop = airdrop;
    }
    config.storage.database = match options.database {
        Some(path) => path,
        None => config_path
            .parent()
            .map(|dir| dir.join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE)),
    };
    if config.identity.caller.is_none() {
        config.identity.caller = Some(owner);
    }

    if options.force && config.storage.database.exists() {
        tracing::warn!(
            database = %config.storage.database.display(),
            "Removing existing database for redeployment"
        );
        std::fs::remove_file(&config.storage.database)?;
    }

    let (ctx, receipt) = RegistryContext::deploy(config)?;
    ctx.config.save(config_path)?;
    tracing::info!(
        owner = %owner,
        events = receipt.len(),
        config = %config_path.display(),
        "Registry deployed"
    );

    let output = InitOutput {
        owner,
        registry: ctx.host.registry().address(),
        mount: ctx.host.registry().mount().to_string(),
        default_price: ctx.host.default_price()?,
        initial_supply: ctx.host.total_supply()?,
        symbol: ctx.config.token.symbol.clone(),
        config_path: config_path.to_string_lossy().to_string(),
        database: ctx.config.storage.database.to_string_lossy().to_string(),
    };

    Ok(output.render(format))
}
