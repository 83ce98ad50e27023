//! Persisted registry records.

use serde::{Deserialize, Serialize};

use crate::{Capabilities, Hash, PathAttr, Principal, RegistryPath, Timestamp};

/// A grant of a single attribute over a path.
///
/// Edges are keyed by `(path, attr)`. An edge exists only while active;
/// removal deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationEdge {
    /// Path the attribute applies to (and everything below it)
    pub path: RegistryPath,
    /// Granted attribute
    pub attr: PathAttr,
    /// Principal holding the attribute
    pub grantee: Principal,
    /// Principal that wrote the edge
    pub granted_by: Principal,
    /// When the edge was written
    pub created_at: Timestamp,
}

/// An authorization mask held by a principal over a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    pub path: RegistryPath,
    pub principal: Principal,
    pub capabilities: Capabilities,
    /// `None` means indefinite
    pub expires_at: Option<Timestamp>,
    pub granted_by: Principal,
    pub updated_at: Timestamp,
}

impl AuthorizationGrant {
    /// A grant is active while `now < expires_at`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now < expires_at,
        }
    }

    /// Whether the grant is active and contains every bit of `required`.
    pub fn permits(&self, required: Capabilities, now: Timestamp) -> bool {
        self.is_active(now) && self.capabilities.contains(required)
    }
}

/// A content fingerprint bound to a leaf path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriRecord {
    pub path: RegistryPath,
    pub fingerprint: Hash,
    /// Principal whose grant authorized the write
    pub beneficiary: Principal,
    pub updated_at: Timestamp,
}
