//! Pricing engine.
//!
//! Prices are per seller: the price of a purchase is the override of the
//! domain that owns the path, or the global default if it never set one.

use aufs_crypto::Principal;
use aufs_econ::{resolve_price, validate_price};
use aufs_store::RegistryStore;
use aufs_types::{Amount, Event, Receipt, DEFAULT_PRICE};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;

impl Registry {
    /// The global default price.
    pub fn default_price<S: RegistryStore + ?Sized>(&self, store: &S) -> RegistryResult<Amount> {
        Ok(store.default_price()?.unwrap_or(DEFAULT_PRICE))
    }

    /// The price `principal` charges.
    pub fn price<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        principal: &Principal,
    ) -> RegistryResult<Amount> {
        let user = store.user_price(principal)?;
        Ok(resolve_price(user, self.default_price(store)?))
    }

    /// Replace the global default price. Root owner only.
    pub fn set_default_price<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        price: Amount,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        if caller != self.owner() {
            return Err(RegistryError::unauthorized(caller, "set the default price"));
        }
        validate_price(price)?;

        let old = self.default_price(store)?;
        store.set_default_price(price)?;
        receipt.push(Event::DefaultPriceChanged { old, new: price });
        tracing::info!(old, new = price, "Default price changed");
        Ok(())
    }

    /// Set the caller's own price. Zero means free.
    pub fn set_user_price<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        price: Amount,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        store.set_user_price(&caller, Some(price))?;
        receipt.push(Event::UserPriceChanged {
            principal: caller,
            price: Some(price),
        });
        tracing::info!(principal = %caller, price, "User price changed");
        Ok(())
    }

    /// Drop the caller's override so the default applies again.
    pub fn clear_user_price<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        if store.user_price(&caller)?.is_none() {
            return Ok(());
        }
        store.set_user_price(&caller, None)?;
        receipt.push(Event::UserPriceChanged {
            principal: caller,
            price: None,
        });
        tracing::info!(principal = %caller, "User price cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use aufs_store::MemoryStore;
    use aufs_types::ErrorCode;

    fn owner() -> Principal {
        Principal::from_bytes([1; 20])
    }

    fn seller() -> Principal {
        Principal::from_bytes([2; 20])
    }

    fn setup() -> (Registry, MemoryStore) {
        let registry = Registry::new(&RegistryConfig::new(owner())).unwrap();
        let mut store = MemoryStore::new();
        registry.genesis(&mut store).unwrap();
        (registry, store)
    }

    #[test]
    fn test_price_falls_back_to_default() {
        let (registry, store) = setup();
        assert_eq!(registry.price(&store, &seller()).unwrap(), DEFAULT_PRICE);
    }

    #[test]
    fn test_override_independent_of_default() {
        let (registry, mut store) = setup();
        let mut receipt = Receipt::new();

        registry
            .set_user_price(&mut store, seller(), 50, &mut receipt)
            .unwrap();
        assert_eq!(registry.price(&store, &seller()).unwrap(), 50);
        assert_eq!(registry.default_price(&store).unwrap(), DEFAULT_PRICE);

        registry
            .set_default_price(&mut store, owner(), 1000, &mut receipt)
            .unwrap();
        assert_eq!(registry.price(&store, &seller()).unwrap(), 50);
        assert_eq!(registry.price(&store, &owner()).unwrap(), 1000);

        assert_eq!(
            receipt.events[1],
            Event::DefaultPriceChanged {
                old: DEFAULT_PRICE,
                new: 1000
            }
        );
    }

    #[test]
    fn test_default_price_owner_only() {
        let (registry, mut store) = setup();
        let err = registry
            .set_default_price(&mut store, seller(), 1000, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
        assert_eq!(registry.default_price(&store).unwrap(), DEFAULT_PRICE);
    }

    #[test]
    fn test_default_price_bounds() {
        let (registry, mut store) = setup();
        let err = registry
            .set_default_price(&mut store, owner(), 0, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPrice);
    }

    #[test]
    fn test_zero_user_price_is_free() {
        let (registry, mut store) = setup();
        registry
            .set_user_price(&mut store, seller(), 0, &mut Receipt::new())
            .unwrap();
        assert_eq!(registry.price(&store, &seller()).unwrap(), 0);
    }

    #[test]
    fn test_clear_user_price() {
        let (registry, mut store) = setup();
        let mut receipt = Receipt::new();
        registry
            .clear_user_price(&mut store, seller(), &mut receipt)
            .unwrap();
        assert!(receipt.is_empty());

        registry
            .set_user_price(&mut store, seller(), 5, &mut receipt)
            .unwrap();
        registry
            .clear_user_price(&mut store, seller(), &mut receipt)
            .unwrap();
        assert_eq!(registry.price(&store, &seller()).unwrap(), DEFAULT_PRICE);
        assert_eq!(receipt.count("user_price_changed"), 2);
    }
}
