//! Tax ledger surface.

use aufs_crypto::Principal;
use aufs_econ::withdraw_tax;
use aufs_ledger::TokenLedger;
use aufs_store::{LedgerStore, RegistryStore};
use aufs_types::{Amount, Event, Receipt};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;

impl Registry {
    /// Accrued, undistributed proceeds.
    pub fn total_taxes<S: RegistryStore + ?Sized>(&self, store: &S) -> RegistryResult<Amount> {
        Ok(store.total_taxes()?)
    }

    /// Pay `amount` of accrued taxes out to `to`. Root owner only.
    ///
    /// The tokens leave the registry address as a plain transfer.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw_tax<S: RegistryStore + LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ledger: &TokenLedger,
        caller: Principal,
        to: Principal,
        amount: Amount,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        if caller != self.owner() {
            return Err(RegistryError::unauthorized(caller, "withdraw taxes"));
        }

        let remaining = withdraw_tax(store.total_taxes()?, amount)?;
        store.set_total_taxes(remaining)?;
        ledger.transfer(store, self.address(), to, amount, receipt)?;

        receipt.push(Event::TaxWithdrawn { to, amount });
        tracing::info!(to = %to, amount, remaining, "Taxes withdrawn");
        Ok(())
    }
}
