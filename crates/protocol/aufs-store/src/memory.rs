//! In-memory store.
//!
//! Backs tests and ephemeral hosts. Transactions are implemented with an
//! undo journal: every write inside a transaction records the value it
//! replaced, and rollback replays the journal in reverse.

use std::collections::BTreeMap;

use aufs_crypto::Principal;
use aufs_types::{
    Amount, AuthorizationGrant, DelegationEdge, PathAttr, RegistryPath, UriRecord,
};

use crate::error::{Result, StoreError};
use crate::traits::{LedgerStore, RegistryStore, Transactional};

type EdgeKey = (RegistryPath, PathAttr);
type GrantKey = (RegistryPath, Principal);

/// Previous value of one written key.
enum Undo {
    Edge(EdgeKey, Option<DelegationEdge>),
    Grant(GrantKey, Option<AuthorizationGrant>),
    Uri(RegistryPath, Option<UriRecord>),
    DefaultPrice(Option<Amount>),
    UserPrice(Principal, Option<Amount>),
    Taxes(Amount),
    Balance(Principal, Option<Amount>),
    Supply(Amount),
}

/// Registry and ledger state held in ordered maps.
#[derive(Default)]
pub struct MemoryStore {
    edges: BTreeMap<EdgeKey, DelegationEdge>,
    grants: BTreeMap<GrantKey, AuthorizationGrant>,
    uris: BTreeMap<RegistryPath, UriRecord>,
    default_price: Option<Amount>,
    user_prices: BTreeMap<Principal, Amount>,
    total_taxes: Amount,
    balances: BTreeMap<Principal, Amount>,
    total_supply: Amount,
    journal: Option<Vec<Undo>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(undo);
        }
    }

    fn restore(&mut self, undo: Undo) {
        match undo {
            Undo::Edge(key, prev) => restore_entry(&mut self.edges, key, prev),
            Undo::Grant(key, prev) => restore_entry(&mut self.grants, key, prev),
            Undo::Uri(key, prev) => restore_entry(&mut self.uris, key, prev),
            Undo::DefaultPrice(prev) => self.default_price = prev,
            Undo::UserPrice(key, prev) => restore_entry(&mut self.user_prices, key, prev),
            Undo::Taxes(prev) => self.total_taxes = prev,
            Undo::Balance(key, prev) => restore_entry(&mut self.balances, key, prev),
            Undo::Supply(prev) => self.total_supply = prev,
        }
    }
}

fn restore_entry<K: Ord, V>(map: &mut BTreeMap<K, V>, key: K, prev: Option<V>) {
    match prev {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

impl RegistryStore for MemoryStore {
    fn edge(&self, path: &RegistryPath, attr: PathAttr) -> Result<Option<DelegationEdge>> {
        Ok(self.edges.get(&(path.clone(), attr)).cloned())
    }

    fn put_edge(&mut self, edge: &DelegationEdge) -> Result<()> {
        let key = (edge.path.clone(), edge.attr);
        let prev = self.edges.insert(key.clone(), edge.clone());
        self.record(Undo::Edge(key, prev));
        Ok(())
    }

    fn delete_edge(&mut self, path: &RegistryPath, attr: PathAttr) -> Result<()> {
        let key = (path.clone(), attr);
        let prev = self.edges.remove(&key);
        self.record(Undo::Edge(key, prev));
        Ok(())
    }

    fn edges(&self) -> Result<Vec<DelegationEdge>> {
        Ok(self.edges.values().cloned().collect())
    }

    fn grant(
        &self,
        path: &RegistryPath,
        principal: &Principal,
    ) -> Result<Option<AuthorizationGrant>> {
        Ok(self.grants.get(&(path.clone(), *principal)).cloned())
    }

    fn put_grant(&mut self, grant: &AuthorizationGrant) -> Result<()> {
        let key = (grant.path.clone(), grant.principal);
        let prev = self.grants.insert(key.clone(), grant.clone());
        self.record(Undo::Grant(key, prev));
        Ok(())
    }

    fn delete_grant(&mut self, path: &RegistryPath, principal: &Principal) -> Result<()> {
        let key = (path.clone(), *principal);
        let prev = self.grants.remove(&key);
        self.record(Undo::Grant(key, prev));
        Ok(())
    }

    fn grants(&self) -> Result<Vec<AuthorizationGrant>> {
        Ok(self.grants.values().cloned().collect())
    }

    fn uri(&self, path: &RegistryPath) -> Result<Option<UriRecord>> {
        Ok(self.uris.get(path).cloned())
    }

    fn put_uri(&mut self, record: &UriRecord) -> Result<()> {
        let prev = self.uris.insert(record.path.clone(), record.clone());
        self.record(Undo::Uri(record.path.clone(), prev));
        Ok(())
    }

    fn uris(&self) -> Result<Vec<UriRecord>> {
        Ok(self.uris.values().cloned().collect())
    }

    fn default_price(&self) -> Result<Option<Amount>> {
        Ok(self.default_price)
    }

    fn set_default_price(&mut self, price: Amount) -> Result<()> {
        let prev = self.default_price.replace(price);
        self.record(Undo::DefaultPrice(prev));
        Ok(())
    }

    fn user_price(&self, principal: &Principal) -> Result<Option<Amount>> {
        Ok(self.user_prices.get(principal).copied())
    }

    fn set_user_price(&mut self, principal: &Principal, price: Option<Amount>) -> Result<()> {
        let prev = match price {
            Some(price) => self.user_prices.insert(*principal, price),
            None => self.user_prices.remove(principal),
        };
        self.record(Undo::UserPrice(*principal, prev));
        Ok(())
    }

    fn user_prices(&self) -> Result<Vec<(Principal, Amount)>> {
        Ok(self.user_prices.iter().map(|(p, a)| (*p, *a)).collect())
    }

    fn total_taxes(&self) -> Result<Amount> {
        Ok(self.total_taxes)
    }

    fn set_total_taxes(&mut self, amount: Amount) -> Result<()> {
        let prev = std::mem::replace(&mut self.total_taxes, amount);
        self.record(Undo::Taxes(prev));
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn balance(&self, principal: &Principal) -> Result<Option<Amount>> {
        Ok(self.balances.get(principal).copied())
    }

    fn set_balance(&mut self, principal: &Principal, amount: Amount) -> Result<()> {
        let prev = self.balances.insert(*principal, amount);
        self.record(Undo::Balance(*principal, prev));
        Ok(())
    }

    fn balances(&self) -> Result<Vec<(Principal, Amount)>> {
        Ok(self.balances.iter().map(|(p, a)| (*p, *a)).collect())
    }

    fn total_supply(&self) -> Result<Amount> {
        Ok(self.total_supply)
    }

    fn set_total_supply(&mut self, amount: Amount) -> Result<()> {
        let prev = std::mem::replace(&mut self.total_supply, amount);
        self.record(Undo::Supply(prev));
        Ok(())
    }
}

impl Transactional for MemoryStore {
    fn begin(&mut self) -> Result<()> {
        if self.journal.is_some() {
            return Err(StoreError::transaction("transaction already active"));
        }
        self.journal = Some(Vec::new());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.journal
            .take()
            .map(|_| ())
            .ok_or_else(|| StoreError::transaction("no active transaction"))
    }

    fn rollback(&mut self) -> Result<()> {
        let journal = self
            .journal
            .take()
            .ok_or_else(|| StoreError::transaction("no active transaction"))?;
        for undo in journal.into_iter().rev() {
            self.restore(undo);
        }
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.journal.is_some()
    }
}
