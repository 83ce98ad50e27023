//! Serialized execution host.
//!
//! [`Host`] owns the store, the registry, the token ledger and a clock, and
//! runs every mutating operation inside one store transaction. Operations
//! take `&mut self`, so they are applied one at a time; a failing operation
//! is rolled back entirely, including any token movement it caused.

use aufs_crypto::{Hash, Principal, Timestamp};
use aufs_ledger::{TokenConfig, TokenLedger, Transfer};
use aufs_store::{LedgerStore, RegistryStore, Transactional};
use aufs_types::{
    Amount, AuthorizationGrant, Capabilities, PathAttr, Receipt, RegistryPath, UriRecord,
};
use aufs_wire::{encode_purchase_order, PurchaseOrder};

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::gateway::PaymentGateway;
use crate::registry::Registry;

/// A registry and its token ledger over one transactional store.
pub struct Host<S> {
    store: S,
    registry: Registry,
    ledger: TokenLedger,
    clock: Box<dyn Clock>,
}

impl<S> Host<S>
where
    S: RegistryStore + LedgerStore + Transactional,
{
    /// Wrap an existing store. Does not run genesis; see [`Host::initialize`].
    pub fn new(store: S, registry: Registry, ledger: TokenLedger) -> Self {
        Self {
            store,
            registry,
            ledger,
            clock: Box::new(SystemClock),
        }
    }

    /// Build a host and run genesis on a fresh store.
    ///
    /// # Example
    /// ```
    /// use aufs_crypto::Principal;
    /// use aufs_ledger::TokenConfig;
    /// use aufs_registry::{Host, RegistryConfig};
    /// use aufs_store::MemoryStore;
    ///
    /// let owner = Principal::from_bytes([1; 20]);
    /// let (host, receipt) = Host::deploy(
    ///     MemoryStore::new(),
    ///     &RegistryConfig::new(owner),
    ///     TokenConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(host.balance_of(&owner).unwrap(), 100_000);
    /// assert_eq!(receipt.count("transfer"), 1);
    /// ```
    pub fn deploy(
        store: S,
        config: &RegistryConfig,
        token: TokenConfig,
    ) -> RegistryResult<(Self, Receipt)> {
        let registry = Registry::new(config)?;
        let mut host = Self::new(store, registry, TokenLedger::new(token));
        let receipt = host.initialize()?;
        Ok((host, receipt))
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run genesis if the store has not seen it yet.
    ///
    /// Mints the initial supply to the owner and writes the default price.
    /// Returns an empty receipt for an already initialized store.
    pub fn initialize(&mut self) -> RegistryResult<Receipt> {
        if self.is_initialized()? {
            return Ok(Receipt::new());
        }
        self.execute(|registry, ledger, store, _, receipt| {
            registry.genesis(store)?;
            ledger.genesis(store, registry.owner(), receipt)?;
            Ok(())
        })
    }

    /// Whether genesis has run on the store.
    pub fn is_initialized(&self) -> RegistryResult<bool> {
        Ok(self.store.default_price()?.is_some())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current time according to the host clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Run `op` inside a store transaction.
    ///
    /// Commits on success. On failure rolls back and returns the original
    /// error.
    fn execute<F>(&mut self, op: F) -> RegistryResult<Receipt>
    where
        F: FnOnce(&Registry, &TokenLedger, &mut S, Timestamp, &mut Receipt) -> RegistryResult<()>,
    {
        let now = self.clock.now();
        self.store.begin()?;

        let mut receipt = Receipt::new();
        let result = op(&self.registry, &self.ledger, &mut self.store, now, &mut receipt)
            .and_then(|()| self.store.commit().map_err(RegistryError::from));

        match result {
            Ok(()) => Ok(receipt),
            Err(e) => {
                if self.store.in_transaction() {
                    if let Err(rollback) = self.store.rollback() {
                        tracing::warn!(error = %rollback, "Rollback failed");
                    }
                }
                tracing::debug!(error = %e, "Operation rolled back");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    pub fn set_delegate(
        &mut self,
        caller: Principal,
        path: &str,
        attr: PathAttr,
        remove: bool,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, now, receipt| {
            registry.set_delegate(store, caller, &path, attr, remove, now, receipt)
        })
    }

    pub fn delegate(
        &mut self,
        caller: Principal,
        grantee: Principal,
        path: &str,
        attr: PathAttr,
        remove: bool,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, now, receipt| {
            registry.delegate(store, caller, grantee, &path, attr, remove, now, receipt)
        })
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    pub fn set_authorization(
        &mut self,
        caller: Principal,
        path: &str,
        capabilities: Capabilities,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, now, receipt| {
            registry.set_authorization(store, caller, &path, capabilities, now, receipt)
        })
    }

    pub fn authorize_for(
        &mut self,
        caller: Principal,
        beneficiary: Principal,
        path: &str,
        capabilities: Capabilities,
        duration: Option<u64>,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, now, receipt| {
            registry.authorize_for(
                store,
                caller,
                beneficiary,
                &path,
                capabilities,
                duration,
                now,
                receipt,
            )
        })
    }

    pub fn revoke_authorization(
        &mut self,
        caller: Principal,
        beneficiary: Principal,
        path: &str,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, _, receipt| {
            registry.revoke_authorization(store, caller, beneficiary, &path, receipt)
        })
    }

    pub fn set_uri(
        &mut self,
        caller: Principal,
        beneficiary: Principal,
        path: &str,
        fingerprint: Hash,
    ) -> RegistryResult<Receipt> {
        let path = self.registry.resolve_path(path)?;
        self.execute(|registry, _, store, now, receipt| {
            registry.set_uri(store, caller, beneficiary, &path, fingerprint, now, receipt)
        })
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    pub fn set_default_price(&mut self, caller: Principal, price: Amount) -> RegistryResult<Receipt> {
        self.execute(|registry, _, store, _, receipt| {
            registry.set_default_price(store, caller, price, receipt)
        })
    }

    pub fn set_user_price(&mut self, caller: Principal, price: Amount) -> RegistryResult<Receipt> {
        self.execute(|registry, _, store, _, receipt| {
            registry.set_user_price(store, caller, price, receipt)
        })
    }

    pub fn clear_user_price(&mut self, caller: Principal) -> RegistryResult<Receipt> {
        self.execute(|registry, _, store, _, receipt| {
            registry.clear_user_price(store, caller, receipt)
        })
    }

    // =========================================================================
    // Value Movement
    // =========================================================================

    /// Deliver a transfer of either kind. Instruction transfers to the
    /// registry address run the payment gateway.
    pub fn send(
        &mut self,
        from: Principal,
        to: Principal,
        amount: Amount,
        transfer: &Transfer,
    ) -> RegistryResult<Receipt> {
        self.execute(|registry, ledger, store, now, receipt| {
            let mut gateway = PaymentGateway::new(registry, now);
            ledger.send(store, from, to, amount, transfer, &mut gateway, receipt)
        })
    }

    /// Plain token transfer.
    pub fn transfer(
        &mut self,
        from: Principal,
        to: Principal,
        amount: Amount,
    ) -> RegistryResult<Receipt> {
        self.send(from, to, amount, &Transfer::Plain)
    }

    /// Token transfer carrying an instruction payload.
    pub fn transfer_and_notify(
        &mut self,
        from: Principal,
        to: Principal,
        amount: Amount,
        payload: Vec<u8>,
    ) -> RegistryResult<Receipt> {
        self.send(from, to, amount, &Transfer::WithInstruction(payload))
    }

    /// Buy a grant on `path` for `beneficiary` by paying `amount` to the
    /// registry.
    pub fn buy(
        &mut self,
        buyer: Principal,
        path: &str,
        beneficiary: Principal,
        duration_secs: u32,
        amount: Amount,
    ) -> RegistryResult<Receipt> {
        let order = PurchaseOrder::new(path, beneficiary, duration_secs);
        let payload = encode_purchase_order(&order)
            .map_err(|e| RegistryError::invalid_payload(e.to_string()))?;
        let to = self.registry.address();
        self.transfer_and_notify(buyer, to, amount, payload)
    }

    pub fn withdraw_tax(
        &mut self,
        caller: Principal,
        to: Principal,
        amount: Amount,
    ) -> RegistryResult<Receipt> {
        self.execute(|registry, ledger, store, _, receipt| {
            registry.withdraw_tax(store, ledger, caller, to, amount, receipt)
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn default_price(&self) -> RegistryResult<Amount> {
        self.registry.default_price(&self.store)
    }

    pub fn price(&self, principal: &Principal) -> RegistryResult<Amount> {
        self.registry.price(&self.store, principal)
    }

    pub fn total_taxes(&self) -> RegistryResult<Amount> {
        self.registry.total_taxes(&self.store)
    }

    pub fn balance_of(&self, principal: &Principal) -> RegistryResult<Amount> {
        Ok(self.ledger.balance_of(&self.store, principal)?)
    }

    pub fn total_supply(&self) -> RegistryResult<Amount> {
        Ok(self.ledger.total_supply(&self.store)?)
    }

    pub fn resolve_path(&self, path: &str) -> RegistryResult<RegistryPath> {
        self.registry.resolve_path(path)
    }

    pub fn holds(&self, principal: &Principal, path: &str, attr: PathAttr) -> RegistryResult<bool> {
        let path = self.registry.resolve_path(path)?;
        self.registry.holds(&self.store, principal, &path, attr)
    }

    /// The domain that sets the price of purchases on `path`.
    pub fn path_owner(&self, path: &str) -> RegistryResult<Principal> {
        let path = self.registry.resolve_path(path)?;
        self.registry.path_owner(&self.store, &path)
    }

    /// The grant currently governing `principal` on `path`, if any.
    pub fn effective_authorization(
        &self,
        path: &str,
        principal: &Principal,
    ) -> RegistryResult<Option<AuthorizationGrant>> {
        let path = self.registry.resolve_path(path)?;
        self.registry
            .effective_authorization(&self.store, &path, principal, self.now())
    }

    pub fn uri(&self, path: &str) -> RegistryResult<Option<UriRecord>> {
        let path = self.registry.resolve_path(path)?;
        self.registry.uri(&self.store, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use aufs_store::MemoryStore;
    use aufs_types::ErrorCode;

    fn owner() -> Principal {
        Principal::from_bytes([1; 20])
    }

    fn buyer() -> Principal {
        Principal::from_bytes([2; 20])
    }

    fn host() -> Host<MemoryStore> {
        let (host, _) = Host::deploy(
            MemoryStore::new(),
            &RegistryConfig::new(owner()),
            TokenConfig::default(),
        )
        .unwrap();
        host.with_clock(ManualClock::new(1_000))
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut host = host();
        let receipt = host.initialize().unwrap();
        assert!(receipt.is_empty());
        assert_eq!(host.total_supply().unwrap(), 100_000);
    }

    #[test]
    fn test_failed_operation_leaves_no_transaction() {
        let mut host = host();
        let err = host.set_default_price(buyer(), 5).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
        assert!(!host.store().in_transaction());

        host.set_default_price(owner(), 5).unwrap();
        assert_eq!(host.default_price().unwrap(), 5);
    }

    #[test]
    fn test_rejected_purchase_keeps_balances() {
        let mut host = host();
        host.transfer(owner(), buyer(), 500).unwrap();

        let err = host
            .buy(buyer(), "/dir1/movie1.mp4", buyer(), 300, 99)
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InsufficientPayment);
        assert_eq!(host.balance_of(&buyer()).unwrap(), 500);
        assert_eq!(host.balance_of(&host.registry().address()).unwrap(), 0);
        assert_eq!(host.total_taxes().unwrap(), 0);
    }

    #[test]
    fn test_plain_transfer_to_registry_is_not_taxed() {
        let mut host = host();
        let registry = host.registry().address();
        host.transfer(owner(), registry, 100).unwrap();
        assert_eq!(host.balance_of(&registry).unwrap(), 100);
        assert_eq!(host.total_taxes().unwrap(), 0);
    }

    #[test]
    fn test_payload_to_non_registry() {
        let mut host = host();
        let err = host
            .transfer_and_notify(owner(), buyer(), 100, vec![0xA0])
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NoReceiver);
    }

    #[test]
    fn test_invalid_path_rejected_before_transaction() {
        let mut host = host();
        let err = host
            .set_delegate(owner(), "relative/path", PathAttr::CanDelegate, false)
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPath);
    }
}
