//! Payload types carried by payment transfers.

use aufs_crypto::Principal;
use serde::{Deserialize, Serialize};

/// A purchase order carried by a transfer-with-instruction to the registry.
///
/// The path is kept as raw text; the receiving registry resolves it against
/// its own mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PurchaseOrder {
    /// Path the authorization is bought for
    pub path: String,
    /// Principal that receives the authorization
    pub beneficiary: Principal,
    /// Seconds added to the grant's expiry
    pub duration_secs: u32,
}

impl PurchaseOrder {
    /// Create a new purchase order.
    pub fn new(path: impl Into<String>, beneficiary: Principal, duration_secs: u32) -> Self {
        Self {
            path: path.into(),
            beneficiary,
            duration_secs,
        }
    }
}
