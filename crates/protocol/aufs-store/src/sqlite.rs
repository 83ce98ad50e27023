//! SQLite-backed store.
//!
//! One database holds both registry and ledger state so that a purchase
//! (balance movement, grant, tax accrual) commits in a single SQLite
//! transaction.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use aufs_crypto::{Hash, Principal};
use aufs_types::{
    Amount, AuthorizationGrant, Capabilities, DelegationEdge, PathAttr, RegistryPath, UriRecord,
};

use crate::error::{Result, StoreError};
use crate::schema::{initialize_schema, KEY_DEFAULT_PRICE, KEY_TOTAL_SUPPLY, KEY_TOTAL_TAXES};
use crate::traits::{LedgerStore, RegistryStore, Transactional};

/// SQLite-backed registry and ledger store.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialize the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        tracing::debug!(path = %path.display(), "Opened registry database");
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// Wrap an existing connection. The schema must already be initialized.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))
    }

    fn scalar(&self, key: &str) -> Result<Option<Amount>> {
        let conn = self.conn()?;
        let value: Option<i64> = conn
            .query_row("SELECT value FROM scalars WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.map(from_sql_u64))
    }

    fn set_scalar(&self, key: &str, value: Amount) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO scalars (key, value) VALUES (?1, ?2)",
            params![key, to_sql_u64(value)],
        )?;
        Ok(())
    }
}

// =============================================================================
// Column Conversions
// =============================================================================

// SQLite integers are signed. Amounts and timestamps keep their full u64
// range by storing the same 8 bytes; values above i64::MAX read back as
// negative integers in raw SQL.
fn to_sql_u64(value: u64) -> i64 {
    i64::from_be_bytes(value.to_be_bytes())
}

fn from_sql_u64(value: i64) -> u64 {
    u64::from_be_bytes(value.to_be_bytes())
}

fn principal_from_blob(bytes: &[u8]) -> Result<Principal> {
    let arr: [u8; 20] = bytes.try_into().map_err(|_| {
        StoreError::invalid_data(format!("principal must be 20 bytes, got {}", bytes.len()))
    })?;
    Ok(Principal(arr))
}

fn hash_from_blob(bytes: &[u8]) -> Result<Hash> {
    let arr: [u8; 32] = bytes.try_into().map_err(|_| {
        StoreError::invalid_data(format!("hash must be 32 bytes, got {}", bytes.len()))
    })?;
    Ok(Hash(arr))
}

fn path_from_text(text: &str) -> Result<RegistryPath> {
    RegistryPath::parse(text)
        .map_err(|e| StoreError::invalid_data(format!("stored path {:?}: {}", text, e)))
}

fn attr_from_code(code: i64) -> Result<PathAttr> {
    u8::try_from(code)
        .ok()
        .and_then(PathAttr::from_code)
        .ok_or_else(|| StoreError::invalid_data(format!("unknown path attribute {}", code)))
}

fn capabilities_from_sql(bits: i64) -> Result<Capabilities> {
    u32::try_from(bits)
        .map(Capabilities::from_bits)
        .map_err(|_| StoreError::invalid_data(format!("capability bits out of range: {}", bits)))
}

type EdgeRow = (String, i64, Vec<u8>, Vec<u8>, i64);
type GrantRow = (String, Vec<u8>, i64, Option<i64>, Vec<u8>, i64);
type UriRow = (String, Vec<u8>, Vec<u8>, i64);

fn edge_from_row(row: EdgeRow) -> Result<DelegationEdge> {
    let (path, attr, grantee, granted_by, created_at) = row;
    Ok(DelegationEdge {
        path: path_from_text(&path)?,
        attr: attr_from_code(attr)?,
        grantee: principal_from_blob(&grantee)?,
        granted_by: principal_from_blob(&granted_by)?,
        created_at: from_sql_u64(created_at),
    })
}

fn grant_from_row(row: GrantRow) -> Result<AuthorizationGrant> {
    let (path, principal, capabilities, expires_at, granted_by, updated_at) = row;
    Ok(AuthorizationGrant {
        path: path_from_text(&path)?,
        principal: principal_from_blob(&principal)?,
        capabilities: capabilities_from_sql(capabilities)?,
        expires_at: expires_at.map(from_sql_u64),
        granted_by: principal_from_blob(&granted_by)?,
        updated_at: from_sql_u64(updated_at),
    })
}

fn uri_from_row(row: UriRow) -> Result<UriRecord> {
    let (path, fingerprint, beneficiary, updated_at) = row;
    Ok(UriRecord {
        path: path_from_text(&path)?,
        fingerprint: hash_from_blob(&fingerprint)?,
        beneficiary: principal_from_blob(&beneficiary)?,
        updated_at: from_sql_u64(updated_at),
    })
}

// =============================================================================
// Registry State
// =============================================================================

impl RegistryStore for SqliteStore {
    fn edge(&self, path: &RegistryPath, attr: PathAttr) -> Result<Option<DelegationEdge>> {
        let conn = self.conn()?;
        let row: Option<EdgeRow> = conn
            .query_row(
                "SELECT path, attr, grantee, granted_by, created_at
                 FROM delegations WHERE path = ?1 AND attr = ?2",
                params![path.as_str(), attr.code()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()?;
        row.map(edge_from_row).transpose()
    }

    fn put_edge(&mut self, edge: &DelegationEdge) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO delegations (path, attr, grantee, granted_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                edge.path.as_str(),
                edge.attr.code(),
                edge.grantee.0.to_vec(),
                edge.granted_by.0.to_vec(),
                to_sql_u64(edge.created_at),
            ],
        )?;
        Ok(())
    }

    fn delete_edge(&mut self, path: &RegistryPath, attr: PathAttr) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM delegations WHERE path = ?1 AND attr = ?2",
            params![path.as_str(), attr.code()],
        )?;
        Ok(())
    }

    fn edges(&self) -> Result<Vec<DelegationEdge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, attr, grantee, granted_by, created_at
             FROM delegations ORDER BY path ASC, attr ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<rusqlite::Result<Vec<EdgeRow>>>()?;
        rows.into_iter().map(edge_from_row).collect()
    }

    fn grant(
        &self,
        path: &RegistryPath,
        principal: &Principal,
    ) -> Result<Option<AuthorizationGrant>> {
        let conn = self.conn()?;
        let row: Option<GrantRow> = conn
            .query_row(
                "SELECT path, principal, capabilities, expires_at, granted_by, updated_at
                 FROM authorizations WHERE path = ?1 AND principal = ?2",
                params![path.as_str(), principal.0.to_vec()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()?;
        row.map(grant_from_row).transpose()
    }

    fn put_grant(&mut self, grant: &AuthorizationGrant) -> Result<()> {
        let expires_at = grant.expires_at.map(to_sql_u64);
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO authorizations
             (path, principal, capabilities, expires_at, granted_by, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                grant.path.as_str(),
                grant.principal.0.to_vec(),
                i64::from(grant.capabilities.bits()),
                expires_at,
                grant.granted_by.0.to_vec(),
                to_sql_u64(grant.updated_at),
            ],
        )?;
        Ok(())
    }

    fn delete_grant(&mut self, path: &RegistryPath, principal: &Principal) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM authorizations WHERE path = ?1 AND principal = ?2",
            params![path.as_str(), principal.0.to_vec()],
        )?;
        Ok(())
    }

    fn grants(&self) -> Result<Vec<AuthorizationGrant>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, principal, capabilities, expires_at, granted_by, updated_at
             FROM authorizations ORDER BY path ASC, principal ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<GrantRow>>>()?;
        rows.into_iter().map(grant_from_row).collect()
    }

    fn uri(&self, path: &RegistryPath) -> Result<Option<UriRecord>> {
        let conn = self.conn()?;
        let row: Option<UriRow> = conn
            .query_row(
                "SELECT path, fingerprint, beneficiary, updated_at FROM uris WHERE path = ?1",
                [path.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        row.map(uri_from_row).transpose()
    }

    fn put_uri(&mut self, record: &UriRecord) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO uris (path, fingerprint, beneficiary, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.path.as_str(),
                record.fingerprint.0.to_vec(),
                record.beneficiary.0.to_vec(),
                to_sql_u64(record.updated_at),
            ],
        )?;
        Ok(())
    }

    fn uris(&self) -> Result<Vec<UriRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, fingerprint, beneficiary, updated_at FROM uris ORDER BY path ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<Vec<UriRow>>>()?;
        rows.into_iter().map(uri_from_row).collect()
    }

    fn default_price(&self) -> Result<Option<Amount>> {
        self.scalar(KEY_DEFAULT_PRICE)
    }

    fn set_default_price(&mut self, price: Amount) -> Result<()> {
        self.set_scalar(KEY_DEFAULT_PRICE, price)
    }

    fn user_price(&self, principal: &Principal) -> Result<Option<Amount>> {
        let conn = self.conn()?;
        let price: Option<i64> = conn
            .query_row(
                "SELECT price FROM user_prices WHERE principal = ?1",
                [principal.0.to_vec()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(price.map(from_sql_u64))
    }

    fn set_user_price(&mut self, principal: &Principal, price: Option<Amount>) -> Result<()> {
        let conn = self.conn()?;
        match price {
            Some(price) => {
                conn.execute(
                    "INSERT OR REPLACE INTO user_prices (principal, price) VALUES (?1, ?2)",
                    params![principal.0.to_vec(), to_sql_u64(price)],
                )?;
            }
            None => {
                conn.execute(
                    "DELETE FROM user_prices WHERE principal = ?1",
                    [principal.0.to_vec()],
                )?;
            }
        }
        Ok(())
    }

    fn user_prices(&self) -> Result<Vec<(Principal, Amount)>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT principal, price FROM user_prices ORDER BY principal ASC")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(p, a)| Ok((principal_from_blob(&p)?, from_sql_u64(a))))
            .collect()
    }

    fn total_taxes(&self) -> Result<Amount> {
        Ok(self.scalar(KEY_TOTAL_TAXES)?.unwrap_or(0))
    }

    fn set_total_taxes(&mut self, amount: Amount) -> Result<()> {
        self.set_scalar(KEY_TOTAL_TAXES, amount)
    }
}

// =============================================================================
// Ledger State
// =============================================================================

impl LedgerStore for SqliteStore {
    fn balance(&self, principal: &Principal) -> Result<Option<Amount>> {
        let conn = self.conn()?;
        let amount: Option<i64> = conn
            .query_row(
                "SELECT amount FROM balances WHERE principal = ?1",
                [principal.0.to_vec()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(amount.map(from_sql_u64))
    }

    fn set_balance(&mut self, principal: &Principal, amount: Amount) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO balances (principal, amount) VALUES (?1, ?2)",
            params![principal.0.to_vec(), to_sql_u64(amount)],
        )?;
        Ok(())
    }

    fn balances(&self) -> Result<Vec<(Principal, Amount)>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT principal, amount FROM balances ORDER BY principal ASC")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(p, a)| Ok((principal_from_blob(&p)?, from_sql_u64(a))))
            .collect()
    }

    fn total_supply(&self) -> Result<Amount> {
        Ok(self.scalar(KEY_TOTAL_SUPPLY)?.unwrap_or(0))
    }

    fn set_total_supply(&mut self, amount: Amount) -> Result<()> {
        self.set_scalar(KEY_TOTAL_SUPPLY, amount)
    }
}

// =============================================================================
// Transactions
// =============================================================================

impl Transactional for SqliteStore {
    fn begin(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if !conn.is_autocommit() {
            return Err(StoreError::transaction("transaction already active"));
        }
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if conn.is_autocommit() {
            return Err(StoreError::transaction("no active transaction"));
        }
        conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if conn.is_autocommit() {
            return Err(StoreError::transaction("no active transaction"));
        }
        conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.conn
            .lock()
            .map(|conn| !conn.is_autocommit())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aufs_crypto::content_hash;

    fn path(s: &str) -> RegistryPath {
        RegistryPath::parse(s).unwrap()
    }

    #[test]
    fn test_edge_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let edge = DelegationEdge {
            path: path("/Web3Tube/dir1"),
            attr: PathAttr::CanAuthorize,
            grantee: Principal([1; 20]),
            granted_by: Principal([2; 20]),
            created_at: 1_700_000_000,
        };
        store.put_edge(&edge).unwrap();

        let loaded = store
            .edge(&edge.path, PathAttr::CanAuthorize)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, edge);
        assert!(store
            .edge(&edge.path, PathAttr::CanDelegate)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_grant_with_and_without_expiry() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let timed = AuthorizationGrant {
            path: path("/Web3Tube/dir1/movie1.mp4"),
            principal: Principal([1; 20]),
            capabilities: Capabilities::ALL,
            expires_at: Some(1_300),
            granted_by: Principal([9; 20]),
            updated_at: 1_000,
        };
        let indefinite = AuthorizationGrant {
            principal: Principal([2; 20]),
            expires_at: None,
            capabilities: Capabilities::SET_URI,
            ..timed.clone()
        };
        store.put_grant(&timed).unwrap();
        store.put_grant(&indefinite).unwrap();

        assert_eq!(
            store.grant(&timed.path, &timed.principal).unwrap(),
            Some(timed.clone())
        );
        assert_eq!(
            store
                .grant(&indefinite.path, &indefinite.principal)
                .unwrap(),
            Some(indefinite)
        );
        assert_eq!(store.grants().unwrap().len(), 2);
    }

    #[test]
    fn test_uri_upsert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut record = UriRecord {
            path: path("/Web3Tube/dir1/movie1.mp4"),
            fingerprint: content_hash(b"v1"),
            beneficiary: Principal([1; 20]),
            updated_at: 1,
        };
        store.put_uri(&record).unwrap();
        record.fingerprint = content_hash(b"v2");
        store.put_uri(&record).unwrap();

        assert_eq!(store.uri(&record.path).unwrap(), Some(record));
        assert_eq!(store.uris().unwrap().len(), 1);
    }

    #[test]
    fn test_scalars_default() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.default_price().unwrap(), None);
        assert_eq!(store.total_taxes().unwrap(), 0);
        assert_eq!(store.total_supply().unwrap(), 0);
    }

    #[test]
    fn test_rollback_discards_writes() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set_balance(&Principal([1; 20]), 100).unwrap();

        store.begin().unwrap();
        assert!(store.in_transaction());
        store.set_balance(&Principal([1; 20]), 0).unwrap();
        store.set_total_taxes(100).unwrap();
        store.rollback().unwrap();

        assert!(!store.in_transaction());
        assert_eq!(store.balance(&Principal([1; 20])).unwrap(), Some(100));
        assert_eq!(store.total_taxes().unwrap(), 0);
    }

    #[test]
    fn test_full_u64_range_preserved() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let alice = Principal([1; 20]);
        let edge_of_signed = i64::MAX as u64 + 1;

        store.set_balance(&alice, u64::MAX).unwrap();
        store.set_user_price(&alice, Some(edge_of_signed)).unwrap();
        store.set_total_taxes(u64::MAX).unwrap();

        assert_eq!(store.balance(&alice).unwrap(), Some(u64::MAX));
        assert_eq!(store.user_price(&alice).unwrap(), Some(edge_of_signed));
        assert_eq!(store.user_prices().unwrap(), vec![(alice, edge_of_signed)]);
        assert_eq!(store.total_taxes().unwrap(), u64::MAX);
    }

    #[test]
    fn test_transaction_misuse() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(store.commit(), Err(StoreError::Transaction(_))));
        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(StoreError::Transaction(_))));
        store.rollback().unwrap();
    }
}
