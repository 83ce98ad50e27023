//! Registry context for CLI operations.

use aufs_crypto::{Principal, Timestamp};
use aufs_ledger::{TokenConfig, TokenLedger};
use aufs_registry::{Host, ManualClock, Registry};
use aufs_store::SqliteStore;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// An opened deployment: the host over the configured database plus the
/// resolved caller.
pub struct RegistryContext {
    /// Execution host.
    pub host: Host<SqliteStore>,
    /// Configuration.
    pub config: CliConfig,
    caller: Option<Principal>,
}

impl RegistryContext {
    /// Open an existing deployment.
    ///
    /// Fails with [`CliError::NotInitialized`] when the configuration has no
    /// owner or the database has never seen genesis. `at` pins the clock to
    /// a fixed Unix time.
    pub fn open(
        config: CliConfig,
        caller: Option<Principal>,
        at: Option<Timestamp>,
    ) -> CliResult<Self> {
        if !config.is_initialized() {
            return Err(CliError::NotInitialized);
        }

        let registry = Registry::new(&config.registry)?;
        let ledger = TokenLedger::new(TokenConfig::from(&config.token));
        let store = SqliteStore::open(&config.storage.database)?;

        let mut host = Host::new(store, registry, ledger);
        if !host.is_initialized()? {
            return Err(CliError::NotInitialized);
        }
        if let Some(at) = at {
            tracing::debug!(at, "Clock pinned");
            host = host.with_clock(ManualClock::new(at));
        }

        let caller = caller.or(config.identity.caller);
        Ok(Self {
            host,
            config,
            caller,
        })
    }

    /// Deploy a fresh registry, running genesis on the configured database.
    pub fn deploy(config: CliConfig) -> CliResult<(Self, aufs_types::Receipt)> {
        let store = SqliteStore::open(&config.storage.database)?;
        let token = TokenConfig::from(&config.token);
        let (host, receipt) = Host::deploy(store, &config.registry, token)?;
        let caller = config.identity.caller;
        Ok((
            Self {
                host,
                config,
                caller,
            },
            receipt,
        ))
    }

    /// The acting principal.
    pub fn caller(&self) -> CliResult<Principal> {
        self.caller.ok_or(CliError::CallerRequired)
    }

    /// `principal`, or the caller when absent.
    pub fn principal_or_caller(&self, principal: Option<Principal>) -> CliResult<Principal> {
        match principal {
            Some(p) => Ok(p),
            None => self.caller(),
        }
    }
}
