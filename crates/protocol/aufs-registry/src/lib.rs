//! Path-hierarchical rights registry for AuFS.
//!
//! The registry lets a root owner delegate administrative attributes over
//! sub-paths of a mounted namespace, lets administrators grant capability
//! masks on those paths, binds content fingerprints to leaf paths, and sells
//! time-bounded grants for tokens.
//!
//! # Module Organization
//!
//! - [`registry`] - Delegation edges, authorization grants, URI records
//! - [`pricing`] - Default and per-seller prices
//! - [`gateway`] - Purchase settlement, the ledger receiver hook
//! - [`tax`] - Accrued proceeds and owner withdrawal
//! - [`host`] - Transactional execution of every operation
//! - [`config`] - Deployment parameters
//! - [`clock`] - Time sources
//! - [`error`] - Registry error types
//!
//! # Purchase Flow
//!
//! A buyer sends a transfer-with-instruction to the registry address. The
//! ledger credits the registry and hands the payload to the
//! [`PaymentGateway`], which decodes the purchase order, resolves the price
//! of the domain owning the path, installs an `ALL` grant for the
//! beneficiary and books the full payment as tax. If any step fails the
//! [`Host`] rolls the whole transaction back, token movement included.
//!
//! # Example
//!
//! ```
//! use aufs_crypto::Principal;
//! use aufs_ledger::TokenConfig;
//! use aufs_registry::{Host, RegistryConfig};
//! use aufs_store::MemoryStore;
//! use aufs_types::{Capabilities, PathAttr};
//!
//! let owner = Principal::from_bytes([1; 20]);
//! let seller = Principal::from_bytes([2; 20]);
//! let (mut host, _) = Host::deploy(
//!     MemoryStore::new(),
//!     &RegistryConfig::new(owner),
//!     TokenConfig::default(),
//! )
//! .unwrap();
//!
//! host.delegate(owner, seller, "/dir1", PathAttr::CanAuthorize, false).unwrap();
//! host.buy(owner, "/dir1/movie1.mp4", seller, 300, 100).unwrap();
//!
//! let grant = host
//!     .effective_authorization("/dir1/movie1.mp4", &seller)
//!     .unwrap()
//!     .unwrap();
//! assert!(grant.capabilities.contains(Capabilities::SET_URI));
//! assert_eq!(host.total_taxes().unwrap(), 100);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod host;
pub mod pricing;
pub mod registry;
pub mod tax;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use gateway::PaymentGateway;
pub use host::Host;
pub use registry::Registry;
