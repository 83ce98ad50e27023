//! Trait definitions for storage components.
//!
//! The registry and ledger only talk to storage through these traits.
//! Implementations (in-memory, SQLite) must satisfy the same contracts: all
//! lookups are by exact key, writes replace in place, and deletes of
//! missing keys succeed.

use aufs_crypto::Principal;
use aufs_types::{
    Amount, AuthorizationGrant, DelegationEdge, PathAttr, RegistryPath, UriRecord,
};

use crate::error::Result;

// =============================================================================
// Registry State
// =============================================================================

/// Persistent state of the path registry.
///
/// Logically four maps (delegation edges, authorization grants, URI records,
/// price overrides) plus two scalars (default price, accrued taxes).
pub trait RegistryStore {
    /// Load the delegation edge for `(path, attr)`.
    fn edge(&self, path: &RegistryPath, attr: PathAttr) -> Result<Option<DelegationEdge>>;

    /// Insert or replace the edge keyed by `(edge.path, edge.attr)`.
    fn put_edge(&mut self, edge: &DelegationEdge) -> Result<()>;

    /// Delete the edge for `(path, attr)`.
    ///
    /// Returns Ok(()) even if the edge doesn't exist.
    fn delete_edge(&mut self, path: &RegistryPath, attr: PathAttr) -> Result<()>;

    /// List all edges, ordered by path then attribute.
    fn edges(&self) -> Result<Vec<DelegationEdge>>;

    /// Load the grant for `(path, principal)`, expired or not.
    fn grant(&self, path: &RegistryPath, principal: &Principal)
        -> Result<Option<AuthorizationGrant>>;

    /// Insert or replace the grant keyed by `(grant.path, grant.principal)`.
    fn put_grant(&mut self, grant: &AuthorizationGrant) -> Result<()>;

    /// Delete the grant for `(path, principal)`.
    ///
    /// Returns Ok(()) even if the grant doesn't exist.
    fn delete_grant(&mut self, path: &RegistryPath, principal: &Principal) -> Result<()>;

    /// List all grants, ordered by path then principal.
    fn grants(&self) -> Result<Vec<AuthorizationGrant>>;

    /// Load the URI record of `path`.
    fn uri(&self, path: &RegistryPath) -> Result<Option<UriRecord>>;

    /// Insert or replace the URI record of `record.path`.
    fn put_uri(&mut self, record: &UriRecord) -> Result<()>;

    /// List all URI records, ordered by path.
    fn uris(&self) -> Result<Vec<UriRecord>>;

    /// The global default price, `None` before genesis.
    fn default_price(&self) -> Result<Option<Amount>>;

    /// Set the global default price.
    fn set_default_price(&mut self, price: Amount) -> Result<()>;

    /// The price override of `principal`.
    fn user_price(&self, principal: &Principal) -> Result<Option<Amount>>;

    /// Set (`Some`) or clear (`None`) the price override of `principal`.
    fn set_user_price(&mut self, principal: &Principal, price: Option<Amount>) -> Result<()>;

    /// List all price overrides, ordered by principal.
    fn user_prices(&self) -> Result<Vec<(Principal, Amount)>>;

    /// Accrued, undistributed taxes.
    fn total_taxes(&self) -> Result<Amount>;

    /// Overwrite the accrued taxes.
    fn set_total_taxes(&mut self, amount: Amount) -> Result<()>;
}

// =============================================================================
// Ledger State
// =============================================================================

/// Persistent state of the value ledger.
pub trait LedgerStore {
    /// The stored balance of `principal`.
    ///
    /// `None` means the account was never touched, which matters for the
    /// first-touch airdrop.
    fn balance(&self, principal: &Principal) -> Result<Option<Amount>>;

    /// Set the balance of `principal`, marking it touched.
    fn set_balance(&mut self, principal: &Principal, amount: Amount) -> Result<()>;

    /// List all touched accounts, ordered by principal.
    fn balances(&self) -> Result<Vec<(Principal, Amount)>>;

    /// Total minted supply.
    fn total_supply(&self) -> Result<Amount>;

    /// Overwrite the total supply.
    fn set_total_supply(&mut self, amount: Amount) -> Result<()>;
}

// =============================================================================
// Transactions
// =============================================================================

/// All-or-nothing grouping of writes.
///
/// Between `begin` and `commit` every write is provisional; `rollback`
/// restores the state observed at `begin`. Transactions do not nest.
pub trait Transactional {
    /// Start a transaction.
    fn begin(&mut self) -> Result<()>;

    /// Make all writes since `begin` permanent.
    fn commit(&mut self) -> Result<()>;

    /// Discard all writes since `begin`.
    fn rollback(&mut self) -> Result<()>;

    /// Whether a transaction is open.
    fn in_transaction(&self) -> bool;
}
