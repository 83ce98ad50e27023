//! Transfer kinds and the receiver hook.

use aufs_crypto::Principal;
use aufs_types::{Amount, Receipt};

use crate::error::LedgerError;

/// How a transfer is delivered.
///
/// Resolved once at the ledger boundary: a plain transfer only moves value,
/// an instruction transfer moves value and then hands the payload to the
/// recipient's [`TransferReceiver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Plain,
    WithInstruction(Vec<u8>),
}

impl Transfer {
    /// The instruction payload, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Transfer::Plain => None,
            Transfer::WithInstruction(payload) => Some(payload),
        }
    }
}

/// A contract-like account that reacts to instruction transfers.
///
/// The hook runs after value has moved. If it fails, the caller is
/// responsible for rolling back the enclosing store transaction so the
/// value movement is discarded with it.
pub trait TransferReceiver<S: ?Sized> {
    /// Error type surfaced by the hook.
    type Error: From<LedgerError>;

    /// Address instruction transfers must target.
    fn address(&self) -> Principal;

    /// Handle `amount` tokens received from `from` with `payload`.
    fn on_token_transfer(
        &mut self,
        store: &mut S,
        from: Principal,
        amount: Amount,
        payload: &[u8],
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error>;
}
