//! Path registry: delegation edges, authorization grants and URI records.
//!
//! Access control walks the path from the target up to the mount. A
//! principal holds an attribute on a path when it is the root owner or when
//! the edge for that attribute on the path or any ancestor names it as
//! grantee. Upper administrators therefore keep their rights below paths
//! they delegated.

use aufs_crypto::{contract_address, Hash, Principal, Timestamp};
use aufs_store::RegistryStore;
use aufs_types::{
    Amount, AuthorizationGrant, Capabilities, DelegationEdge, Domain, Event, PathAttr, PathError,
    Receipt, RegistryPath, UriRecord,
};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// A deployed registry.
///
/// Holds only the immutable deployment parameters; all mutable state lives
/// in the store passed to each operation.
#[derive(Debug, Clone)]
pub struct Registry {
    owner: Principal,
    address: Principal,
    scheme: String,
    mount: RegistryPath,
    genesis_price: Amount,
}

impl Registry {
    /// Build a registry from validated deployment parameters.
    ///
    /// The registry address is derived from the owner and the mount, so the
    /// same deployment always lands at the same address.
    pub fn new(config: &RegistryConfig) -> RegistryResult<Self> {
        let mount = config.validate()?;
        Ok(Self {
            owner: config.owner,
            address: contract_address(&config.owner, mount.as_str()),
            scheme: config.scheme.clone(),
            mount,
            genesis_price: config.default_price,
        })
    }

    /// Root owner.
    pub fn owner(&self) -> Principal {
        self.owner
    }

    /// The registry's own account: receives purchase payments and acts as
    /// trustee of delegation events.
    pub fn address(&self) -> Principal {
        self.address
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn mount(&self) -> &RegistryPath {
        &self.mount
    }

    /// Domain label of `principal` under this registry's scheme.
    pub fn domain_of(&self, principal: Principal) -> Domain {
        Domain::new(self.scheme.clone(), principal)
    }

    /// Resolve user input against the mount.
    pub fn resolve_path(&self, input: &str) -> RegistryResult<RegistryPath> {
        Ok(RegistryPath::resolve(&self.mount, input)?)
    }

    /// Write the genesis default price if the store has none yet.
    ///
    /// Returns `false` when the store was already initialized.
    pub fn genesis<S: RegistryStore + ?Sized>(&self, store: &mut S) -> RegistryResult<bool> {
        if store.default_price()?.is_some() {
            return Ok(false);
        }
        store.set_default_price(self.genesis_price)?;
        tracing::info!(
            owner = %self.owner,
            address = %self.address,
            mount = %self.mount,
            default_price = self.genesis_price,
            "Registry initialized"
        );
        Ok(true)
    }

    fn ensure_within(&self, path: &RegistryPath) -> RegistryResult<()> {
        if path.is_within(&self.mount) {
            Ok(())
        } else {
            Err(PathError::OutsideMount {
                path: path.to_string(),
                mount: self.mount.to_string(),
            }
            .into())
        }
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    /// Whether `principal` holds `attr` on `path`.
    pub fn holds<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        principal: &Principal,
        path: &RegistryPath,
        attr: PathAttr,
    ) -> RegistryResult<bool> {
        if *principal == self.owner {
            return Ok(true);
        }
        for ancestor in path.ancestors_to(&self.mount) {
            if let Some(edge) = store.edge(&ancestor, attr)? {
                if edge.grantee == *principal {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Whether `principal` administers `path` (holds either attribute).
    pub fn is_administrator<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        principal: &Principal,
        path: &RegistryPath,
    ) -> RegistryResult<bool> {
        for attr in PathAttr::ALL {
            if self.holds(store, principal, path, attr)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The domain administratively responsible for `path`.
    ///
    /// Walks upward from `path`; at each level a `CanAuthorize` edge wins
    /// over a `CanDelegate` edge. Falls back to the root owner.
    pub fn path_owner<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        path: &RegistryPath,
    ) -> RegistryResult<Principal> {
        for ancestor in path.ancestors_to(&self.mount) {
            for attr in [PathAttr::CanAuthorize, PathAttr::CanDelegate] {
                if let Some(edge) = store.edge(&ancestor, attr)? {
                    return Ok(edge.grantee);
                }
            }
        }
        Ok(self.owner)
    }

    /// Claim (or release) `attr` on `path` for the caller itself.
    pub fn set_delegate<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        path: &RegistryPath,
        attr: PathAttr,
        remove: bool,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.delegate(store, caller, caller, path, attr, remove, now, receipt)
    }

    /// Grant (or revoke) `attr` on `path` to `grantee`.
    ///
    /// # Arguments
    /// * `caller` - Must hold `CanDelegate` on `path`
    /// * `grantee` - Principal recorded on the edge
    /// * `remove` - Delete the edge instead; a no-op unless the current
    ///   grantee is `grantee`
    ///
    /// # Returns
    /// `Unauthorized` if the caller lacks `CanDelegate` on `path`.
    #[allow(clippy::too_many_arguments)]
    pub fn delegate<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        grantee: Principal,
        path: &RegistryPath,
        attr: PathAttr,
        remove: bool,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.ensure_within(path)?;
        if !self.holds(store, &caller, path, PathAttr::CanDelegate)? {
            tracing::warn!(caller = %caller, path = %path, attr = %attr, "Delegation refused");
            return Err(RegistryError::unauthorized(
                caller,
                format!("delegate {} on {}", attr, path),
            ));
        }

        if remove {
            match store.edge(path, attr)? {
                Some(edge) if edge.grantee == grantee => {
                    store.delete_edge(path, attr)?;
                }
                _ => {
                    tracing::debug!(path = %path, attr = %attr, "No matching edge to remove");
                    return Ok(());
                }
            }
        } else {
            store.put_edge(&DelegationEdge {
                path: path.clone(),
                attr,
                grantee,
                granted_by: caller,
                created_at: now,
            })?;
        }

        receipt.push(Event::DelegationChanged {
            domain: self.domain_of(grantee),
            path: path.clone(),
            attr,
            removed: remove,
            trustee: self.address,
        });
        tracing::info!(
            grantee = %grantee,
            path = %path,
            attr = %attr,
            removed = remove,
            "Delegation changed"
        );
        Ok(())
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Set the caller's own indefinite mask on `path`.
    pub fn set_authorization<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        path: &RegistryPath,
        capabilities: Capabilities,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.authorize_for(store, caller, caller, path, capabilities, None, now, receipt)
    }

    /// Install a mask for `beneficiary` on `path`, replacing any previous one.
    ///
    /// `duration` of `None` makes the grant indefinite; otherwise it expires
    /// `duration` seconds after `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn authorize_for<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        beneficiary: Principal,
        path: &RegistryPath,
        capabilities: Capabilities,
        duration: Option<u64>,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.require_administrator(store, caller, path, "authorize")?;

        let expires_at = duration.map(|secs| now.saturating_add(secs));
        store.put_grant(&AuthorizationGrant {
            path: path.clone(),
            principal: beneficiary,
            capabilities,
            expires_at,
            granted_by: caller,
            updated_at: now,
        })?;

        receipt.push(Event::AuthorizationChanged {
            domain: self.domain_of(caller),
            path: path.clone(),
            capabilities,
            beneficiary,
            expires_at,
        });
        tracing::info!(
            beneficiary = %beneficiary,
            path = %path,
            capabilities = %capabilities,
            "Authorization set"
        );
        Ok(())
    }

    /// Delete the grant of `beneficiary` on `path`. Missing grants are a no-op.
    pub fn revoke_authorization<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        beneficiary: Principal,
        path: &RegistryPath,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.require_administrator(store, caller, path, "revoke")?;

        if store.grant(path, &beneficiary)?.is_none() {
            tracing::debug!(beneficiary = %beneficiary, path = %path, "No grant to revoke");
            return Ok(());
        }
        store.delete_grant(path, &beneficiary)?;

        receipt.push(Event::AuthorizationChanged {
            domain: self.domain_of(caller),
            path: path.clone(),
            capabilities: Capabilities::NONE,
            beneficiary,
            expires_at: None,
        });
        tracing::info!(beneficiary = %beneficiary, path = %path, "Authorization revoked");
        Ok(())
    }

    /// The nearest active grant of `principal` on `path` or an ancestor.
    pub fn effective_authorization<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        path: &RegistryPath,
        principal: &Principal,
        now: Timestamp,
    ) -> RegistryResult<Option<AuthorizationGrant>> {
        for ancestor in path.ancestors_to(&self.mount) {
            if let Some(grant) = store.grant(&ancestor, principal)? {
                if grant.is_active(now) {
                    return Ok(Some(grant));
                }
            }
        }
        Ok(None)
    }

    fn require_administrator<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        caller: Principal,
        path: &RegistryPath,
        action: &str,
    ) -> RegistryResult<()> {
        self.ensure_within(path)?;
        if self.is_administrator(store, &caller, path)? {
            return Ok(());
        }
        tracing::warn!(caller = %caller, path = %path, action, "Authorization refused");
        Err(RegistryError::unauthorized(
            caller,
            format!("{} on {}", action, path),
        ))
    }

    // =========================================================================
    // URI Records
    // =========================================================================

    /// Bind `fingerprint` to `path` on behalf of `beneficiary`.
    ///
    /// The caller must be the beneficiary, the root owner or the registry
    /// itself. The beneficiary's effective mask must contain `SET_URI`.
    #[allow(clippy::too_many_arguments)]
    pub fn set_uri<S: RegistryStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Principal,
        beneficiary: Principal,
        path: &RegistryPath,
        fingerprint: Hash,
        now: Timestamp,
        receipt: &mut Receipt,
    ) -> RegistryResult<()> {
        self.ensure_within(path)?;
        if caller != beneficiary && caller != self.owner && caller != self.address {
            return Err(RegistryError::unauthorized(
                caller,
                format!("set the URI of {} for {}", path, beneficiary),
            ));
        }

        let permitted = self
            .effective_authorization(store, path, &beneficiary, now)?
            .is_some_and(|grant| grant.capabilities.contains(Capabilities::SET_URI));
        if !permitted {
            tracing::warn!(beneficiary = %beneficiary, path = %path, "URI write forbidden");
            return Err(RegistryError::forbidden(format!(
                "{} has no active set_uri grant on {}",
                beneficiary, path
            )));
        }

        store.put_uri(&UriRecord {
            path: path.clone(),
            fingerprint,
            beneficiary,
            updated_at: now,
        })?;

        receipt.push(Event::UriSet {
            domain: self.domain_of(beneficiary),
            path: path.clone(),
            fingerprint,
        });
        tracing::info!(path = %path, fingerprint = %fingerprint, "URI set");
        Ok(())
    }

    /// The URI record of `path`.
    pub fn uri<S: RegistryStore + ?Sized>(
        &self,
        store: &S,
        path: &RegistryPath,
    ) -> RegistryResult<Option<UriRecord>> {
        Ok(store.uri(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aufs_crypto::content_hash;
    use aufs_store::MemoryStore;
    use aufs_types::ErrorCode;

    const NOW: Timestamp = 1_000;

    fn owner() -> Principal {
        Principal::from_bytes([0x01; 20])
    }

    fn admin() -> Principal {
        Principal::from_bytes([0x0A; 20])
    }

    fn user() -> Principal {
        Principal::from_bytes([0x0B; 20])
    }

    fn setup() -> (Registry, MemoryStore) {
        let registry = Registry::new(&RegistryConfig::new(owner())).unwrap();
        let mut store = MemoryStore::new();
        registry.genesis(&mut store).unwrap();
        (registry, store)
    }

    fn path(registry: &Registry, s: &str) -> RegistryPath {
        registry.resolve_path(s).unwrap()
    }

    #[test]
    fn test_address_is_deterministic() {
        let a = Registry::new(&RegistryConfig::new(owner())).unwrap();
        let b = Registry::new(&RegistryConfig::new(owner())).unwrap();
        let c = Registry::new(&RegistryConfig::new(owner()).with_mount("/Other")).unwrap();
        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), c.address());
        assert_ne!(a.address(), owner());
    }

    #[test]
    fn test_genesis_only_once() {
        let (registry, mut store) = setup();
        store.set_default_price(7).unwrap();
        assert!(!registry.genesis(&mut store).unwrap());
        assert_eq!(store.default_price().unwrap(), Some(7));
    }

    #[test]
    fn test_owner_holds_everything() {
        let (registry, store) = setup();
        let p = path(&registry, "/dir1/deep/file");
        for attr in PathAttr::ALL {
            assert!(registry.holds(&store, &owner(), &p, attr).unwrap());
            assert!(!registry.holds(&store, &user(), &p, attr).unwrap());
        }
    }

    #[test]
    fn test_delegation_enables_attribute() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let mut receipt = Receipt::new();

        assert!(!registry
            .holds(&store, &admin(), &dir, PathAttr::CanAuthorize)
            .unwrap());
        registry
            .delegate(&mut store, owner(), admin(), &dir, PathAttr::CanAuthorize, false, NOW, &mut receipt)
            .unwrap();

        assert!(registry
            .holds(&store, &admin(), &dir, PathAttr::CanAuthorize)
            .unwrap());
        // Applies below the delegated path, not above it
        assert!(registry
            .holds(&store, &admin(), &path(&registry, "/dir1/movie1.mp4"), PathAttr::CanAuthorize)
            .unwrap());
        assert!(!registry
            .holds(&store, &admin(), registry.mount(), PathAttr::CanAuthorize)
            .unwrap());
        // Only the delegated attribute
        assert!(!registry
            .holds(&store, &admin(), &dir, PathAttr::CanDelegate)
            .unwrap());

        assert_eq!(
            receipt.events,
            vec![Event::DelegationChanged {
                domain: registry.domain_of(admin()),
                path: dir,
                attr: PathAttr::CanAuthorize,
                removed: false,
                trustee: registry.address(),
            }]
        );
    }

    #[test]
    fn test_set_delegate_requires_can_delegate() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");

        let err = registry
            .set_delegate(&mut store, user(), &dir, PathAttr::CanDelegate, false, NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
        assert!(store.edges().unwrap().is_empty());
    }

    #[test]
    fn test_sub_delegation_chain() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let sub = path(&registry, "/dir1/sub");
        let mut receipt = Receipt::new();

        registry
            .delegate(&mut store, owner(), admin(), &dir, PathAttr::CanDelegate, false, NOW, &mut receipt)
            .unwrap();
        registry
            .delegate(&mut store, admin(), user(), &sub, PathAttr::CanAuthorize, false, NOW, &mut receipt)
            .unwrap();

        assert!(registry
            .holds(&store, &user(), &sub, PathAttr::CanAuthorize)
            .unwrap());
        // The delegating administrator keeps its rights below
        assert!(registry
            .holds(&store, &admin(), &sub, PathAttr::CanDelegate)
            .unwrap());
        assert_eq!(registry.path_owner(&store, &sub).unwrap(), user());
        assert_eq!(registry.path_owner(&store, &dir).unwrap(), admin());
        assert_eq!(
            registry.path_owner(&store, registry.mount()).unwrap(),
            owner()
        );
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let mut receipt = Receipt::new();

        registry
            .set_delegate(&mut store, owner(), &dir, PathAttr::CanAuthorize, true, NOW, &mut receipt)
            .unwrap();
        assert!(receipt.is_empty());
        assert!(store.edges().unwrap().is_empty());
    }

    #[test]
    fn test_remove_other_grantee_is_noop() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let mut receipt = Receipt::new();

        registry
            .delegate(&mut store, owner(), admin(), &dir, PathAttr::CanAuthorize, false, NOW, &mut receipt)
            .unwrap();
        registry
            .delegate(&mut store, owner(), user(), &dir, PathAttr::CanAuthorize, true, NOW, &mut receipt)
            .unwrap();
        assert_eq!(store.edges().unwrap().len(), 1);

        registry
            .delegate(&mut store, owner(), admin(), &dir, PathAttr::CanAuthorize, true, NOW, &mut receipt)
            .unwrap();
        assert!(store.edges().unwrap().is_empty());
        assert_eq!(receipt.count("delegation_changed"), 2);
    }

    #[test]
    fn test_set_authorization_requires_admin() {
        let (registry, mut store) = setup();
        let file = path(&registry, "/dir1/movie1.mp4");

        let err = registry
            .set_authorization(&mut store, user(), &file, Capabilities::ALL, NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);

        registry
            .delegate(&mut store, owner(), user(), &path(&registry, "/dir1"), PathAttr::CanAuthorize, false, NOW, &mut Receipt::new())
            .unwrap();
        registry
            .set_authorization(&mut store, user(), &file, Capabilities::ALL, NOW, &mut Receipt::new())
            .unwrap();

        let grant = store.grant(&file, &user()).unwrap().unwrap();
        assert_eq!(grant.capabilities, Capabilities::ALL);
        assert_eq!(grant.expires_at, None);
    }

    #[test]
    fn test_effective_authorization_inherits_and_expires() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let file = path(&registry, "/dir1/movie1.mp4");

        registry
            .authorize_for(&mut store, owner(), user(), &dir, Capabilities::READ, Some(100), NOW, &mut Receipt::new())
            .unwrap();

        let grant = registry
            .effective_authorization(&store, &file, &user(), NOW + 99)
            .unwrap()
            .unwrap();
        assert_eq!(grant.path, dir);
        assert!(registry
            .effective_authorization(&store, &file, &user(), NOW + 100)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_nearest_active_grant_wins() {
        let (registry, mut store) = setup();
        let dir = path(&registry, "/dir1");
        let file = path(&registry, "/dir1/movie1.mp4");
        let mut receipt = Receipt::new();

        registry
            .authorize_for(&mut store, owner(), user(), &dir, Capabilities::ALL, None, NOW, &mut receipt)
            .unwrap();
        registry
            .authorize_for(&mut store, owner(), user(), &file, Capabilities::READ, Some(10), NOW, &mut receipt)
            .unwrap();

        let near = registry
            .effective_authorization(&store, &file, &user(), NOW)
            .unwrap()
            .unwrap();
        assert_eq!(near.capabilities, Capabilities::READ);

        // Expired leaf grant is skipped in favour of the ancestor
        let far = registry
            .effective_authorization(&store, &file, &user(), NOW + 10)
            .unwrap()
            .unwrap();
        assert_eq!(far.capabilities, Capabilities::ALL);
    }

    #[test]
    fn test_revoke_authorization() {
        let (registry, mut store) = setup();
        let file = path(&registry, "/dir1/movie1.mp4");
        let mut receipt = Receipt::new();

        registry
            .revoke_authorization(&mut store, owner(), user(), &file, &mut receipt)
            .unwrap();
        assert!(receipt.is_empty());

        registry
            .authorize_for(&mut store, owner(), user(), &file, Capabilities::ALL, None, NOW, &mut receipt)
            .unwrap();
        registry
            .revoke_authorization(&mut store, owner(), user(), &file, &mut receipt)
            .unwrap();
        assert!(store.grant(&file, &user()).unwrap().is_none());
        assert_eq!(receipt.count("authorization_changed"), 2);
    }

    #[test]
    fn test_set_uri_requires_bit() {
        let (registry, mut store) = setup();
        let file = path(&registry, "/dir1/movie1.mp4");
        let fingerprint = content_hash(b"movie");

        let err = registry
            .set_uri(&mut store, user(), user(), &file, fingerprint, NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Forbidden);

        registry
            .authorize_for(&mut store, owner(), user(), &file, Capabilities::READ, None, NOW, &mut Receipt::new())
            .unwrap();
        let err = registry
            .set_uri(&mut store, user(), user(), &file, fingerprint, NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Forbidden);

        registry
            .authorize_for(&mut store, owner(), user(), &file, Capabilities::READ | Capabilities::SET_URI, None, NOW, &mut Receipt::new())
            .unwrap();
        let mut receipt = Receipt::new();
        registry
            .set_uri(&mut store, user(), user(), &file, fingerprint, NOW, &mut receipt)
            .unwrap();

        assert_eq!(
            registry.uri(&store, &file).unwrap().unwrap().fingerprint,
            fingerprint
        );
        assert_eq!(receipt.count("uri_set"), 1);
    }

    #[test]
    fn test_set_uri_caller_restrictions() {
        let (registry, mut store) = setup();
        let file = path(&registry, "/dir1/movie1.mp4");
        registry
            .authorize_for(&mut store, owner(), user(), &file, Capabilities::ALL, None, NOW, &mut Receipt::new())
            .unwrap();

        let err = registry
            .set_uri(&mut store, admin(), user(), &file, Hash([1; 32]), NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);

        // The registry itself may act for the beneficiary
        registry
            .set_uri(&mut store, registry.address(), user(), &file, Hash([1; 32]), NOW, &mut Receipt::new())
            .unwrap();
    }

    #[test]
    fn test_path_outside_mount_rejected() {
        let (registry, mut store) = setup();
        let outside = RegistryPath::parse("/Elsewhere/x").unwrap();
        let err = registry
            .delegate(&mut store, owner(), admin(), &outside, PathAttr::CanDelegate, false, NOW, &mut Receipt::new())
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPath);
    }
}
