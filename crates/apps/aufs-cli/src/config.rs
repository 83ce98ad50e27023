//! CLI configuration.

use std::path::{Path, PathBuf};

use aufs_crypto::Principal;
use aufs_ledger::TokenConfig;
use aufs_registry::RegistryConfig;
use aufs_store::{default_data_dir, default_database_path};
use aufs_types::{
    Amount, DEFAULT_AIRDROP, DEFAULT_DECIMALS, DEFAULT_INITIAL_SUPPLY, DEFAULT_TOKEN_NAME,
    DEFAULT_TOKEN_SYMBOL,
};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Deployment parameters of the registry.
    pub registry: RegistryConfig,
    /// Token parameters.
    pub token: TokenSection,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Identity configuration.
    pub identity: IdentityConfig,
}

impl CliConfig {
    /// Load configuration from a file.
    ///
    /// A missing file yields the default configuration, which has no owner
    /// and so reads as "not initialized".
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Whether a registry owner has been configured.
    pub fn is_initialized(&self) -> bool {
        !self.registry.owner.is_zero()
    }
}

/// Token section. Mirrors [`TokenConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSection {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_supply: Amount,
    /// Balance untouched accounts read as holding. Zero disables it.
    pub airdrop: Amount,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            airdrop: DEFAULT_AIRDROP,
        }
    }
}

impl From<&TokenSection> for TokenConfig {
    fn from(section: &TokenSection) -> Self {
        TokenConfig {
            name: section.name.clone(),
            symbol: section.symbol.clone(),
            decimals: section.decimals,
            initial_supply: section.initial_supply,
            airdrop: section.airdrop,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database.
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

/// Identity configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Principal used when `--caller` is not given.
    pub caller: Option<Principal>,
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    default_data_dir().join(CONFIG_FILE)
}
