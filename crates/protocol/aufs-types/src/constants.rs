//! Registry constants.
//!
//! These constants define deployment defaults, path limits, pricing bounds
//! and payload limits shared by every crate in the workspace.

use crate::Amount;

// =============================================================================
// Deployment Defaults
// =============================================================================

/// Default URI scheme used to build domain labels (`aufs://0x...`)
pub const DEFAULT_SCHEME: &str = "aufs";

/// Default mount point of the namespace
pub const DEFAULT_MOUNT: &str = "/Web3Tube";

/// Default global price for a purchased authorization grant
pub const DEFAULT_PRICE: Amount = 100;

// =============================================================================
// Path Limits
// =============================================================================

/// Maximum length of a full path in bytes
pub const MAX_PATH_LENGTH: usize = 1024;

/// Maximum number of segments below the mount point
pub const MAX_PATH_DEPTH: usize = 32;

/// Maximum length of a domain scheme
pub const MAX_SCHEME_LENGTH: usize = 32;

// =============================================================================
// Economics
// =============================================================================

/// Minimum global default price
pub const MIN_PRICE: Amount = 1;

/// Maximum global default price (10^16)
pub const MAX_PRICE: Amount = 10_000_000_000_000_000;

// =============================================================================
// Payment Payload
// =============================================================================

/// Maximum size of an encoded purchase order carried by a transfer
pub const MAX_PAYLOAD_SIZE: usize = 4096;

// =============================================================================
// Token Defaults
// =============================================================================

/// Default token name
pub const DEFAULT_TOKEN_NAME: &str = "Aurora";

/// Default token symbol
pub const DEFAULT_TOKEN_SYMBOL: &str = "AUR";

/// Display decimals (one whole token is 10^9 base units)
pub const DEFAULT_DECIMALS: u8 = 9;

/// Supply minted to the deployer at genesis
pub const DEFAULT_INITIAL_SUPPLY: Amount = 100_000;

/// First-touch airdrop per principal (0 disables it)
pub const DEFAULT_AIRDROP: Amount = 0;
