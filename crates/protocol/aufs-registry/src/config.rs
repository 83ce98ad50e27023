//! Deployment parameters of a registry.

use aufs_crypto::Principal;
use aufs_types::{validate_scheme, Amount, RegistryPath, DEFAULT_MOUNT, DEFAULT_PRICE, DEFAULT_SCHEME};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Parameters fixed when a registry is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root owner. Holds every attribute on every path.
    pub owner: Principal,
    /// Scheme of domain labels (`<scheme>://0x..`).
    pub scheme: String,
    /// Mount point all paths are rooted at.
    pub mount: String,
    /// Price charged by sellers without an override.
    pub default_price: Amount,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            owner: Principal::ZERO,
            scheme: DEFAULT_SCHEME.to_string(),
            mount: DEFAULT_MOUNT.to_string(),
            default_price: DEFAULT_PRICE,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with defaults for everything but the owner.
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    pub fn with_default_price(mut self, price: Amount) -> Self {
        self.default_price = price;
        self
    }

    /// Check every parameter and return the parsed mount.
    pub fn validate(&self) -> RegistryResult<RegistryPath> {
        if self.owner.is_zero() {
            return Err(RegistryError::invalid_config(
                "owner must not be the zero address",
            ));
        }
        validate_scheme(&self.scheme)?;
        let mount = RegistryPath::parse(&self.mount)?;
        aufs_econ::validate_price(self.default_price)?;
        Ok(mount)
    }
}
