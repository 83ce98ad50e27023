//! Data structures for the AuFS rights registry.
//!
//! This crate provides the data types shared by the registry, the value
//! ledger, the stores and the CLI. It contains no business logic, only type
//! definitions with validation and serialization support.
//!
//! # Module Organization
//!
//! - [`constants`] - Deployment defaults and limits
//! - [`error`] - Error codes and parse errors
//! - [`path`] - Normalized namespace paths
//! - [`capability`] - Delegation attributes and authorization capability sets
//! - [`domain`] - Domain labels derived from principals
//! - [`records`] - Delegation edges, authorization grants, URI records
//! - [`event`] - Emitted events and receipts
//!
//! # Example
//!
//! ```
//! use aufs_types::{Capabilities, Domain, PathAttr, Principal, RegistryPath, DEFAULT_MOUNT};
//!
//! let mount = RegistryPath::parse(DEFAULT_MOUNT).unwrap();
//! let file = RegistryPath::resolve(&mount, "/dir1/movie1.mp4").unwrap();
//! assert_eq!(file.as_str(), "/Web3Tube/dir1/movie1.mp4");
//! assert_eq!(file.ancestors_to(&mount).len(), 3);
//!
//! let domain = Domain::new("aufs", Principal::from_bytes([1; 20]));
//! assert!(domain.label().starts_with("aufs://0x"));
//!
//! assert!(Capabilities::ALL.contains(Capabilities::SET_URI));
//! assert_eq!(PathAttr::CanAuthorize.code(), 2);
//! ```

pub mod capability;
pub mod constants;
pub mod domain;
pub mod error;
pub mod event;
pub mod path;
pub mod records;

pub use capability::{Capabilities, PathAttr};
pub use constants::*;
pub use domain::{validate_scheme, Domain};
pub use error::{ErrorCode, ParseError, PathError};
pub use event::{Event, Receipt};
pub use path::RegistryPath;
pub use records::{AuthorizationGrant, DelegationEdge, UriRecord};

/// Amount in token base units (10^-9 of a display token).
pub type Amount = u64;

// Re-export crypto types that are commonly used with types
pub use aufs_crypto::{Hash, Principal, Timestamp};
