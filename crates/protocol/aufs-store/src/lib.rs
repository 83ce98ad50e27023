//! Storage layer for the AuFS registry.
//!
//! This crate persists everything the registry and its token ledger need:
//!
//! - **Delegation edges**: who holds `CanDelegate` / `CanAuthorize` on a path
//! - **Authorization grants**: capability masks with optional expiry
//! - **URI records**: content fingerprints bound to paths
//! - **Prices**: the global default and per-seller overrides
//! - **Taxes**: accrued, undistributed protocol revenue
//! - **Balances**: token accounts and total supply
//!
//! # Storage Layout
//!
//! ```text
//! ~/.aufs/
//! ├── config.toml              # CLI configuration
//! ├── identity.key             # Ed25519 private key
//! └── aufs.db                  # SQLite: registry and ledger state
//! ```
//!
//! # Example
//!
//! ```
//! use aufs_store::{LedgerStore, MemoryStore, Transactional};
//! use aufs_crypto::Principal;
//!
//! let mut store = MemoryStore::new();
//! let alice = Principal::from_bytes([1; 20]);
//!
//! store.begin().unwrap();
//! store.set_balance(&alice, 100).unwrap();
//! store.rollback().unwrap();
//!
//! assert_eq!(store.balance(&alice).unwrap(), None);
//! ```
//!
//! # Trait-Based Design
//!
//! The registry and ledger are generic over [`RegistryStore`],
//! [`LedgerStore`] and [`Transactional`]. [`MemoryStore`] backs tests and
//! ephemeral hosts; [`SqliteStore`] backs the CLI.

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use schema::{initialize_schema, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use traits::{LedgerStore, RegistryStore, Transactional};

use std::path::PathBuf;

/// File name of the state database inside the data directory.
pub const DATABASE_FILE: &str = "aufs.db";

/// Get the default data directory for AuFS state.
///
/// Priority:
/// 1. `AUFS_DATA_DIR` environment variable (if set)
/// 2. Platform-specific data directory (e.g., `~/.local/share/aufs` on Linux)
/// 3. Fallback to `$HOME/.aufs`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AUFS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("io", "aurora-fs", "aufs")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".aufs")
        })
}

/// Path of the state database under [`default_data_dir`].
pub fn default_database_path() -> PathBuf {
    default_data_dir().join(DATABASE_FILE)
}
