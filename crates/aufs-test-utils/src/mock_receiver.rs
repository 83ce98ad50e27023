//! Mock implementation of the `TransferReceiver` trait for testing.
//!
//! Records every instruction transfer it receives and can be told to
//! reject them, so ledger plumbing can be tested without a registry.

use std::sync::{Arc, RwLock};

use aufs_crypto::Principal;
use aufs_ledger::{LedgerError, TransferReceiver};
use aufs_store::StoreError;
use aufs_types::{Amount, Receipt};
use thiserror::Error;

/// Errors surfaced by [`MockReceiver`].
#[derive(Debug, Error)]
pub enum MockReceiverError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The mock was configured to fail.
    #[error("receiver rejected the transfer")]
    Rejected,
}

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedTransfer {
    pub from: Principal,
    pub amount: Amount,
    pub payload: Vec<u8>,
}

struct MockReceiverInner {
    received: Vec<ReceivedTransfer>,
    should_fail: bool,
}

/// A receiver that records what it is sent.
///
/// Clones share the same record, so a test can keep one handle while the
/// ledger borrows another.
#[derive(Clone)]
pub struct MockReceiver {
    address: Principal,
    inner: Arc<RwLock<MockReceiverInner>>,
}

impl MockReceiver {
    pub fn new(address: Principal) -> Self {
        Self {
            address,
            inner: Arc::new(RwLock::new(MockReceiverInner {
                received: Vec::new(),
                should_fail: false,
            })),
        }
    }

    /// Make every subsequent hook call fail with [`MockReceiverError::Rejected`].
    pub fn set_should_fail(&self, fail: bool) {
        self.inner.write().unwrap().should_fail = fail;
    }

    /// All transfers received so far.
    pub fn received(&self) -> Vec<ReceivedTransfer> {
        self.inner.read().unwrap().received.clone()
    }
}

impl<S: ?Sized> TransferReceiver<S> for MockReceiver {
    type Error = MockReceiverError;

    fn address(&self) -> Principal {
        self.address
    }

    fn on_token_transfer(
        &mut self,
        _store: &mut S,
        from: Principal,
        amount: Amount,
        payload: &[u8],
        _receipt: &mut Receipt,
    ) -> Result<(), MockReceiverError> {
        let mut inner = self.inner.write().unwrap();
        if inner.should_fail {
            return Err(MockReceiverError::Rejected);
        }
        inner.received.push(ReceivedTransfer {
            from,
            amount,
            payload: payload.to_vec(),
        });
        Ok(())
    }
}
