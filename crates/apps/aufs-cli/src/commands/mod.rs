//! CLI command implementations.
//!
//! Each command takes its inputs, runs against a [`RegistryContext`] where
//! it needs one, and returns the rendered output.
//!
//! [`RegistryContext`]: crate::context::RegistryContext

pub mod authorize;
pub mod balance;
pub mod buy;
pub mod delegate;
pub mod init;
pub mod inspect;
pub mod keygen;
pub mod pricing;
pub mod set_uri;
pub mod taxes;
pub mod transfer;

pub use authorize::authorize;
pub use balance::balance;
pub use buy::buy;
pub use delegate::delegate;
pub use init::{init, InitOptions};
pub use inspect::inspect;
pub use keygen::keygen;
pub use pricing::{price, set_default_price, set_user_price};
pub use set_uri::set_uri;
pub use taxes::{taxes, withdraw_tax};
pub use transfer::transfer;
