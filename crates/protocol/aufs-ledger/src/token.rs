//! Token ledger operations.

use aufs_crypto::Principal;
use aufs_store::{LedgerStore, Transactional};
use aufs_types::{
    Amount, Event, Receipt, DEFAULT_AIRDROP, DEFAULT_DECIMALS, DEFAULT_INITIAL_SUPPLY,
    DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::transfer::{Transfer, TransferReceiver};

/// Token parameters fixed at deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Display scaling: one display token is `10^decimals` base units.
    pub decimals: u8,
    /// Minted to the deployer at genesis.
    pub initial_supply: Amount,
    /// Balance every untouched account reads as holding. Zero disables it.
    pub airdrop: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            airdrop: DEFAULT_AIRDROP,
        }
    }
}

impl TokenConfig {
    /// Set the genesis supply.
    pub fn with_initial_supply(mut self, amount: Amount) -> Self {
        self.initial_supply = amount;
        self
    }

    /// Set the first-touch airdrop.
    pub fn with_airdrop(mut self, amount: Amount) -> Self {
        self.airdrop = amount;
        self
    }
}

/// Balance-moving logic over a [`LedgerStore`].
///
/// The ledger holds no state of its own; balances and supply live in the
/// store passed to each call.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    config: TokenConfig,
}

impl TokenLedger {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Balance of `principal`, counting a pending airdrop for untouched
    /// accounts.
    pub fn balance_of<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        principal: &Principal,
    ) -> LedgerResult<Amount> {
        match store.balance(principal)? {
            Some(amount) => Ok(amount),
            None if principal.is_zero() => Ok(0),
            None => Ok(self.config.airdrop),
        }
    }

    /// Total minted supply, excluding airdrops not yet claimed.
    pub fn total_supply<S: LedgerStore + ?Sized>(&self, store: &S) -> LedgerResult<Amount> {
        Ok(store.total_supply()?)
    }

    // =========================================================================
    // Minting
    // =========================================================================

    /// Mint `amount` to `to`.
    ///
    /// # Arguments
    /// * `store` - Ledger state
    /// * `to` - Recipient, must not be the zero principal
    /// * `amount` - Base units to create
    /// * `receipt` - Receives the `Transfer` event from [`Principal::ZERO`]
    pub fn mint<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        to: Principal,
        amount: Amount,
        receipt: &mut Receipt,
    ) -> LedgerResult<()> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let balance = self.touch(store, to, receipt)?;
        let credited = checked_add(balance, amount)?;
        let supply = checked_add(store.total_supply()?, amount)?;
        store.set_balance(&to, credited)?;
        store.set_total_supply(supply)?;
        receipt.push(Event::Transfer {
            from: Principal::ZERO,
            to,
            amount,
        });
        debug!(to = %to, amount, "Minted tokens");
        Ok(())
    }

    /// Mint the configured initial supply to the deployer.
    pub fn genesis<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        deployer: Principal,
        receipt: &mut Receipt,
    ) -> LedgerResult<()> {
        if self.config.initial_supply == 0 {
            return Ok(());
        }
        self.mint(store, deployer, self.config.initial_supply, receipt)
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Move `amount` from `from` to `to`.
    ///
    /// Untouched parties receive their airdrop first. A transfer to oneself
    /// leaves balances unchanged but still emits a `Transfer` event.
    pub fn transfer<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        from: Principal,
        to: Principal,
        amount: Amount,
        receipt: &mut Receipt,
    ) -> LedgerResult<()> {
        if from.is_zero() || to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        let available = self.balance_of(store, &from)?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let from_balance = self.touch(store, from, receipt)?;
        if from != to {
            let to_balance = self.touch(store, to, receipt)?;
            let credited = checked_add(to_balance, amount)?;
            store.set_balance(&from, from_balance - amount)?;
            store.set_balance(&to, credited)?;
        }

        receipt.push(Event::Transfer { from, to, amount });
        debug!(from = %from, to = %to, amount, "Transferred tokens");
        Ok(())
    }

    /// Deliver a transfer of either kind.
    ///
    /// An instruction transfer must target `receiver.address()`; anything
    /// else fails with [`LedgerError::NoReceiver`] before value moves. On
    /// success the receiver hook runs with the payload after the balances
    /// have been updated.
    pub fn send<S, R>(
        &self,
        store: &mut S,
        from: Principal,
        to: Principal,
        amount: Amount,
        transfer: &Transfer,
        receiver: &mut R,
        receipt: &mut Receipt,
    ) -> Result<(), R::Error>
    where
        S: LedgerStore + ?Sized,
        R: TransferReceiver<S>,
    {
        match transfer {
            Transfer::Plain => {
                self.transfer(store, from, to, amount, receipt)?;
                Ok(())
            }
            Transfer::WithInstruction(payload) => {
                if to != receiver.address() {
                    return Err(LedgerError::NoReceiver(to).into());
                }
                self.transfer(store, from, to, amount, receipt)?;
                receiver.on_token_transfer(store, from, amount, payload, receipt)
            }
        }
    }

    /// Like [`send`](Self::send), but runs inside its own store transaction
    /// that is rolled back if the transfer or the receiver hook fails.
    pub fn send_atomic<S, R>(
        &self,
        store: &mut S,
        from: Principal,
        to: Principal,
        amount: Amount,
        transfer: &Transfer,
        receiver: &mut R,
    ) -> Result<Receipt, R::Error>
    where
        S: LedgerStore + Transactional + ?Sized,
        R: TransferReceiver<S>,
        R::Error: From<aufs_store::StoreError>,
    {
        store.begin()?;
        let mut receipt = Receipt::new();
        match self.send(store, from, to, amount, transfer, receiver, &mut receipt) {
            Ok(()) => {
                store.commit()?;
                Ok(receipt)
            }
            Err(e) => {
                store.rollback()?;
                Err(e)
            }
        }
    }

    /// Materialize the airdrop of an untouched account and return its
    /// current balance.
    fn touch<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        principal: Principal,
        receipt: &mut Receipt,
    ) -> LedgerResult<Amount> {
        if let Some(balance) = store.balance(&principal)? {
            return Ok(balance);
        }
        let airdrop = self.config.airdrop;
        if airdrop == 0 || principal.is_zero() {
            return Ok(0);
        }

        let supply = checked_add(store.total_supply()?, airdrop)?;
        store.set_balance(&principal, airdrop)?;
        store.set_total_supply(supply)?;
        receipt.push(Event::Transfer {
            from: Principal::ZERO,
            to: principal,
            amount: airdrop,
        });
        debug!(principal = %principal, airdrop, "Claimed airdrop");
        Ok(airdrop)
    }
}

fn checked_add(current: Amount, amount: Amount) -> LedgerResult<Amount> {
    current
        .checked_add(amount)
        .ok_or(LedgerError::Overflow { current, amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aufs_store::MemoryStore;

    fn alice() -> Principal {
        Principal::from_bytes([0xA1; 20])
    }

    fn bob() -> Principal {
        Principal::from_bytes([0xB0; 20])
    }

    fn funded(amount: Amount) -> (TokenLedger, MemoryStore) {
        let ledger = TokenLedger::new(TokenConfig::default().with_initial_supply(amount));
        let mut store = MemoryStore::new();
        ledger
            .genesis(&mut store, alice(), &mut Receipt::new())
            .unwrap();
        (ledger, store)
    }

    #[test]
    fn test_genesis_mints_to_deployer() {
        let ledger = TokenLedger::default();
        let mut store = MemoryStore::new();
        let mut receipt = Receipt::new();
        ledger.genesis(&mut store, alice(), &mut receipt).unwrap();

        assert_eq!(ledger.balance_of(&store, &alice()).unwrap(), 100_000);
        assert_eq!(ledger.total_supply(&store).unwrap(), 100_000);
        assert_eq!(
            receipt.events,
            vec![Event::Transfer {
                from: Principal::ZERO,
                to: alice(),
                amount: 100_000
            }]
        );
    }

    #[test]
    fn test_transfer_moves_value() {
        let (ledger, mut store) = funded(1_000);
        let mut receipt = Receipt::new();
        ledger
            .transfer(&mut store, alice(), bob(), 400, &mut receipt)
            .unwrap();

        assert_eq!(ledger.balance_of(&store, &alice()).unwrap(), 600);
        assert_eq!(ledger.balance_of(&store, &bob()).unwrap(), 400);
        assert_eq!(receipt.count("transfer"), 1);
    }

    #[test]
    fn test_transfer_exceeding_balance() {
        let (ledger, mut store) = funded(1_000);
        let result = ledger.transfer(&mut store, alice(), bob(), 1_001, &mut Receipt::new());

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 1_000,
                requested: 1_001
            })
        ));
        assert_eq!(store.balance(&bob()).unwrap(), None);
    }

    #[test]
    fn test_zero_address_rejected() {
        let (ledger, mut store) = funded(1_000);
        let result = ledger.transfer(&mut store, alice(), Principal::ZERO, 1, &mut Receipt::new());
        assert!(matches!(result, Err(LedgerError::ZeroAddress)));
    }

    #[test]
    fn test_self_transfer_emits_event() {
        let (ledger, mut store) = funded(1_000);
        let mut receipt = Receipt::new();
        ledger
            .transfer(&mut store, alice(), alice(), 250, &mut receipt)
            .unwrap();

        assert_eq!(ledger.balance_of(&store, &alice()).unwrap(), 1_000);
        assert_eq!(receipt.count("transfer"), 1);
    }

    #[test]
    fn test_airdrop_claimed_on_first_touch() {
        let ledger = TokenLedger::new(
            TokenConfig::default()
                .with_initial_supply(0)
                .with_airdrop(100_000),
        );
        let mut store = MemoryStore::new();

        assert_eq!(ledger.balance_of(&store, &bob()).unwrap(), 100_000);
        assert_eq!(ledger.balance_of(&store, &Principal::ZERO).unwrap(), 0);
        assert_eq!(ledger.total_supply(&store).unwrap(), 0);

        let mut receipt = Receipt::new();
        ledger
            .transfer(&mut store, alice(), bob(), 10, &mut receipt)
            .unwrap();

        // Both untouched parties claim before the move
        assert_eq!(receipt.events.len(), 3);
        assert_eq!(
            receipt.events[0],
            Event::Transfer {
                from: Principal::ZERO,
                to: alice(),
                amount: 100_000
            }
        );
        assert_eq!(ledger.balance_of(&store, &alice()).unwrap(), 99_990);
        assert_eq!(ledger.balance_of(&store, &bob()).unwrap(), 100_010);
        assert_eq!(ledger.total_supply(&store).unwrap(), 200_000);

        let mut again = Receipt::new();
        ledger
            .transfer(&mut store, alice(), bob(), 10, &mut again)
            .unwrap();
        assert_eq!(again.events.len(), 1);
    }

    #[test]
    fn test_mint_overflow() {
        let (ledger, mut store) = funded(1);
        let result = ledger.mint(&mut store, bob(), Amount::MAX, &mut Receipt::new());
        assert!(matches!(result, Err(LedgerError::Overflow { .. })));
    }
}
