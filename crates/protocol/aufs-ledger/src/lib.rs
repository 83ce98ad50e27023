//! Fungible token ledger for the AuFS registry.
//!
//! The ledger is the payment rail of the registry. It keeps balances in a
//! [`LedgerStore`](aufs_store::LedgerStore) and supports two kinds of
//! transfer:
//!
//! - [`Transfer::Plain`] moves value and nothing else
//! - [`Transfer::WithInstruction`] moves value to a contract-like account
//!   and then invokes its [`TransferReceiver`] hook with the payload
//!
//! Conservation holds for every transfer: the sum of balances changes only
//! through minting (genesis and first-touch airdrops).
//!
//! # Example
//!
//! ```
//! use aufs_crypto::Principal;
//! use aufs_ledger::{TokenConfig, TokenLedger};
//! use aufs_store::MemoryStore;
//! use aufs_types::Receipt;
//!
//! let ledger = TokenLedger::new(TokenConfig::default());
//! let mut store = MemoryStore::new();
//! let deployer = Principal::from_bytes([1; 20]);
//! let buyer = Principal::from_bytes([2; 20]);
//!
//! let mut receipt = Receipt::new();
//! ledger.genesis(&mut store, deployer, &mut receipt).unwrap();
//! ledger.transfer(&mut store, deployer, buyer, 5_000, &mut receipt).unwrap();
//!
//! assert_eq!(ledger.balance_of(&store, &buyer).unwrap(), 5_000);
//! assert_eq!(receipt.count("transfer"), 2);
//! ```

pub mod error;
pub mod token;
pub mod transfer;

pub use error::{LedgerError, LedgerResult};
pub use token::{TokenConfig, TokenLedger};
pub use transfer::{Transfer, TransferReceiver};
