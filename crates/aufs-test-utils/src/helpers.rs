//! Helper functions for creating test fixtures.
//!
//! Provides deterministic principals and hashes, and hosts deployed over
//! in-memory or temporary SQLite stores with a manual clock.

use aufs_crypto::{
    content_hash, generate_identity, principal_from_public_key, Hash, Principal, PrivateKey,
    PublicKey, Timestamp,
};
use aufs_ledger::TokenConfig;
use aufs_registry::{Host, ManualClock, RegistryConfig};
use aufs_store::{MemoryStore, SqliteStore};
use aufs_types::Amount;
use tempfile::TempDir;

/// Start time of every test clock.
pub const TEST_EPOCH: Timestamp = 1_700_000_000;

/// A principal derived from a label. The same label always yields the same
/// principal.
pub fn test_principal(label: &str) -> Principal {
    let digest = content_hash(label.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest.as_bytes()[..20]);
    Principal::from_bytes(bytes)
}

/// Generate a keypair and its principal.
pub fn test_keypair() -> (PrivateKey, PublicKey, Principal) {
    let (private_key, public_key) = generate_identity();
    let principal = principal_from_public_key(&public_key);
    (private_key, public_key, principal)
}

/// Create a test content hash from a string label.
pub fn test_hash(label: &str) -> Hash {
    content_hash(label.as_bytes())
}

/// Deploy a registry owned by `owner` over a [`MemoryStore`].
///
/// Returns the host and a handle to its clock, set to [`TEST_EPOCH`].
pub fn test_host(owner: Principal) -> (Host<MemoryStore>, ManualClock) {
    test_host_with(MemoryStore::new(), &RegistryConfig::new(owner), TokenConfig::default())
}

/// Deploy a registry over a fresh SQLite database in a temporary directory.
///
/// The temp directory must be kept alive for the duration of the test.
pub fn test_sqlite_host(owner: Principal) -> (Host<SqliteStore>, ManualClock, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("aufs.db")).unwrap();
    let (host, clock) = test_host_with(store, &RegistryConfig::new(owner), TokenConfig::default());
    (host, clock, temp_dir)
}

/// Deploy a registry with explicit parameters over `store`.
pub fn test_host_with<S>(
    store: S,
    config: &RegistryConfig,
    token: TokenConfig,
) -> (Host<S>, ManualClock)
where
    S: aufs_store::RegistryStore + aufs_store::LedgerStore + aufs_store::Transactional,
{
    let clock = ManualClock::new(TEST_EPOCH);
    let (host, _) = Host::deploy(store, config, token).unwrap();
    (host.with_clock(clock.clone()), clock)
}

/// Deploy a registry and pay each account its amount out of the owner's
/// genesis supply.
pub fn funded_host(
    owner: Principal,
    accounts: &[(Principal, Amount)],
) -> (Host<MemoryStore>, ManualClock) {
    let (mut host, clock) = test_host(owner);
    for (account, amount) in accounts {
        host.transfer(owner, *account, *amount).unwrap();
    }
    (host, clock)
}
