//! Payment gateway.
//!
//! The registry's receiver hook for instruction transfers. By the time the
//! hook runs the buyer's tokens already sit on the registry address; any
//! error returned here must abort the enclosing transaction so the value
//! movement is undone with it.

use aufs_crypto::{Principal, Timestamp};
use aufs_econ::{accrue_tax, check_payment};
use aufs_ledger::TransferReceiver;
use aufs_store::RegistryStore;
use aufs_types::{Amount, AuthorizationGrant, Capabilities, Event, Receipt};
use aufs_wire::{decode_purchase_order, PurchaseOrder};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;

impl Registry {
    /// Settle a purchase of `paid` tokens from `buyer`.
    ///
    /// # Arguments
    /// * `buyer` - Sender of the payment
    /// * `paid` - Amount already credited to the registry
    /// * `order` - Decoded purchase order
    /// * `now` - Current time, the base of a fresh grant's expiry
    ///
    /// # Returns
    /// `InsufficientPayment` if `paid` is below the price of the domain that
    /// owns the path. On success the beneficiary holds an `ALL` grant and
    /// the full payment is booked as tax.
    pub fn purchase<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        buyer: Principal,
        paid: Amount,
        order: &PurchaseOrder,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        let path = self.resolve_path(&order.path).map_err(|e| {
            RegistryError::invalid_payload(format!("path {:?}: {}", order.path, e))
        })?;
        if order.beneficiary.is_zero() {
            return Err(RegistryError::invalid_payload(
                "beneficiary must not be the zero address",
            ));
        }

        let seller = self.path_owner(store, &path)?;
        let required = self.price(store, &seller)?;
        if let Err(e) = check_payment(required, paid) {
            tracing::warn!(
                buyer = %buyer,
                path = %path,
                required,
                paid,
                "Purchase rejected"
            );
            return Err(e.into());
        }

        let duration = u64::from(order.duration_secs);
        let expires_at = match store.grant(&path, &order.beneficiary)? {
            Some(current) if current.is_active(now) => current
                .expires_at
                .map(|expiry| expiry.max(now).saturating_add(duration)),
            _ => Some(now.saturating_add(duration)),
        };

        store.put_grant(&AuthorizationGrant {
            path: path.clone(),
            principal: order.beneficiary,
            capabilities: Capabilities::ALL,
            expires_at,
            granted_by: self.address(),
            updated_at: now,
        })?;

        let taxes = accrue_tax(store.total_taxes()?, paid)?;
        store.set_total_taxes(taxes)?;

        receipt.push(Event::AuthorizationChanged {
            domain: self.domain_of(seller),
            path: path.clone(),
            capabilities: Capabilities::ALL,
            beneficiary: order.beneficiary,
            expires_at,
        });
        tracing::info!(
            buyer = %buyer,
            beneficiary = %order.beneficiary,
            path = %path,
            paid,
            required,
            "Purchase settled"
        );
        Ok(())
    }
}

/// Receiver hook binding a registry to the current time.
pub struct PaymentGateway<'a> {
    registry: &'a Registry,
    now: Timestamp,
}

impl<'a> PaymentGateway<'a> {
    pub fn new(registry: &'a Registry, now: Timestamp) -> Self {
        Self { registry, now }
    }
}

impl<S: RegistryStore + ?Sized> TransferReceiver<S> for PaymentGateway<'_> {
    type Error = RegistryError;

    fn address(&self) -> Principal {
        self.registry.address()
    }

    fn on_token_transfer(
        &mut self,
        store: &mut S,
        from: Principal,
        amount: Amount,
        payload: &[u8],
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        let order = decode_purchase_order(payload)?;
        self.registry
            .purchase(store, from, amount, &order, self.now, receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use aufs_store::MemoryStore;
    use aufs_types::{ErrorCode, PathAttr};
    use aufs_wire::encode_purchase_order;

    const NOW: Timestamp = 10_000;

    fn owner() -> Principal {
        Principal::from_bytes([1; 20])
    }

    fn seller() -> Principal {
        Principal::from_bytes([2; 20])
    }

    fn buyer() -> Principal {
        Principal::from_bytes([3; 20])
    }

    fn setup() -> (Registry, MemoryStore) {
        let registry = Registry::new(&RegistryConfig::new(owner())).unwrap();
        let mut store = MemoryStore::new();
        registry.genesis(&mut store).unwrap();
        (registry, store)
    }

    fn order(duration: u32) -> PurchaseOrder {
        PurchaseOrder::new("/Web3Tube/dir1/movie1.mp4", buyer(), duration)
    }

    #[test]
    fn test_purchase_installs_grant_and_books_tax() {
        let (registry, mut store) = setup();
        let mut receipt = Receipt::new();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW, &mut receipt)
            .unwrap();

        let path = registry.resolve_path("/dir1/movie1.mp4").unwrap();
        let grant = store.grant(&path, &buyer()).unwrap().unwrap();
        assert_eq!(grant.capabilities, Capabilities::ALL);
        assert_eq!(grant.expires_at, Some(NOW + 300));
        assert_eq!(store.total_taxes().unwrap(), 100);
        assert_eq!(receipt.count("authorization_changed"), 1);
    }

    #[test]
    fn test_price_is_path_owners() {
        let (registry, mut store) = setup();
        let dir = registry.resolve_path("/dir1").unwrap();
        registry
            .delegate(&mut store, owner(), seller(), &dir, PathAttr::CanAuthorize, false, NOW, &mut Receipt::new())
            .unwrap();
        registry
            .set_user_price(&mut store, seller(), 1000, &mut Receipt::new())
            .unwrap();
        // The buyer's own price is irrelevant
        registry
            .set_user_price(&mut store, buyer(), 1, &mut Receipt::new())
            .unwrap();

        let err = registry
            .purchase(&mut store, buyer(), 999, &order(300), NOW, &mut Receipt::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InsufficientPayment {
                required: 1000,
                paid: 999
            }
        ));

        let mut receipt = Receipt::new();
        registry
            .purchase(&mut store, buyer(), 1000, &order(300), NOW, &mut receipt)
            .unwrap();
        assert!(matches!(
            &receipt.events[0],
            Event::AuthorizationChanged { domain, .. } if domain.principal() == seller()
        ));
    }

    #[test]
    fn test_overpayment_fully_taxed() {
        let (registry, mut store) = setup();
        registry
            .purchase(&mut store, buyer(), 250, &order(60), NOW, &mut Receipt::new())
            .unwrap();
        assert_eq!(store.total_taxes().unwrap(), 250);
    }

    #[test]
    fn test_repurchase_extends_active_grant() {
        let (registry, mut store) = setup();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW, &mut Receipt::new())
            .unwrap();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW + 100, &mut Receipt::new())
            .unwrap();

        let path = registry.resolve_path("/dir1/movie1.mp4").unwrap();
        let grant = store.grant(&path, &buyer()).unwrap().unwrap();
        assert_eq!(grant.expires_at, Some(NOW + 600));
        assert_eq!(store.total_taxes().unwrap(), 200);
    }

    #[test]
    fn test_repurchase_after_expiry_restarts() {
        let (registry, mut store) = setup();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW, &mut Receipt::new())
            .unwrap();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW + 1_000, &mut Receipt::new())
            .unwrap();

        let path = registry.resolve_path("/dir1/movie1.mp4").unwrap();
        let grant = store.grant(&path, &buyer()).unwrap().unwrap();
        assert_eq!(grant.expires_at, Some(NOW + 1_300));
    }

    #[test]
    fn test_indefinite_grant_stays_indefinite() {
        let (registry, mut store) = setup();
        let path = registry.resolve_path("/dir1/movie1.mp4").unwrap();
        registry
            .authorize_for(&mut store, owner(), buyer(), &path, Capabilities::READ, None, NOW, &mut Receipt::new())
            .unwrap();
        registry
            .purchase(&mut store, buyer(), 100, &order(300), NOW, &mut Receipt::new())
            .unwrap();

        let grant = store.grant(&path, &buyer()).unwrap().unwrap();
        assert_eq!(grant.expires_at, None);
        assert_eq!(grant.capabilities, Capabilities::ALL);
    }

    #[test]
    fn test_zero_duration_expires_instantly() {
        let (registry, mut store) = setup();
        registry
            .purchase(&mut store, buyer(), 100, &order(0), NOW, &mut Receipt::new())
            .unwrap();

        let path = registry.resolve_path("/dir1/movie1.mp4").unwrap();
        assert!(registry
            .effective_authorization(&store, &path, &buyer(), NOW)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_gateway_rejects_garbage() {
        let (registry, mut store) = setup();
        let mut gateway = PaymentGateway::new(&registry, NOW);
        let err = gateway
            .on_token_transfer(&mut store, buyer(), 100, &[0xFF, 0x00], &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPayload);
    }

    #[test]
    fn test_gateway_rejects_bad_path() {
        let (registry, mut store) = setup();
        let payload =
            encode_purchase_order(&PurchaseOrder::new("/dir1/../etc", buyer(), 10)).unwrap();
        let mut gateway = PaymentGateway::new(&registry, NOW);
        let err = gateway
            .on_token_transfer(&mut store, buyer(), 100, &payload, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPayload);
    }

    #[test]
    fn test_gateway_decodes_and_purchases() {
        let (registry, mut store) = setup();
        let payload = encode_purchase_order(&order(300)).unwrap();
        let mut gateway = PaymentGateway::new(&registry, NOW);
        gateway
            .on_token_transfer(&mut store, buyer(), 100, &payload, &mut Receipt::new())
            .unwrap();
        assert_eq!(store.total_taxes().unwrap(), 100);
        assert_eq!(
            TransferReceiver::<MemoryStore>::address(&gateway),
            registry.address()
        );
    }
}
