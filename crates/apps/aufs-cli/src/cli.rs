//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use aufs_crypto::{Hash, Principal, Timestamp};
use aufs_types::{Amount, Capabilities, PathAttr, MAX_PRICE};

use crate::output::OutputFormat;

/// One day, the default purchase duration.
pub const DEFAULT_DURATION_SECS: u32 = 86_400;

/// AuFS rights registry CLI.
#[derive(Parser, Debug)]
#[command(name = "aufs")]
#[command(author = "Aurora FS Contributors")]
#[command(version)]
#[command(about = "Command-line interface for the AuFS rights registry")]
#[command(
    long_about = "AuFS is a path-hierarchical rights registry: owners delegate sub-paths, administrators grant capabilities, and buyers pay tokens for time-bounded access.\n\nRun 'aufs init --owner 0x..' to get started."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "AUFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Principal acting for this command (overrides [identity] caller).
    #[arg(long, global = true, env = "AUFS_CALLER", value_parser = parse_principal)]
    pub caller: Option<Principal>,

    /// Pin the clock to this Unix time instead of the system time.
    #[arg(long, global = true)]
    pub at: Option<Timestamp>,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // Setup Commands
    // =========================================================================
    /// Deploy a registry.
    ///
    /// Writes the configuration file, creates the database and mints the
    /// initial token supply to the owner.
    Init {
        /// Root owner (defaults to --caller).
        #[arg(long, value_parser = parse_principal)]
        owner: Option<Principal>,

        /// Scheme of domain labels.
        #[arg(long)]
        scheme: Option<String>,

        /// Mount point all paths are rooted at.
        #[arg(long)]
        mount: Option<String>,

        /// Default price per purchase.
        #[arg(long, value_parser = parse_price)]
        default_price: Option<Amount>,

        /// Tokens minted to the owner at genesis.
        #[arg(long)]
        initial_supply: Option<Amount>,

        /// Balance every untouched account reads as holding.
        #[arg(long)]
        airdrop: Option<Amount>,

        /// SQLite database path (defaults to next to the config file).
        #[arg(long)]
        database: Option<PathBuf>,

        /// Overwrite an existing configuration.
        #[arg(short = 'F', long)]
        force: bool,
    },

    /// Generate a new Ed25519 identity.
    ///
    /// Prints the principal derived from the public key.
    Keygen,

    // =========================================================================
    // Administration Commands
    // =========================================================================
    /// Grant or remove a path attribute.
    ///
    /// Without --to the caller claims the attribute for itself.
    Delegate {
        /// Path (absolute or relative to the mount).
        path: String,

        /// Attribute: can-delegate or can-authorize.
        #[arg(value_parser = parse_attr)]
        attr: PathAttr,

        /// Grantee (defaults to the caller).
        #[arg(long, value_parser = parse_principal)]
        to: Option<Principal>,

        /// Remove the edge instead of writing it.
        #[arg(short, long)]
        remove: bool,
    },

    /// Grant or revoke capabilities on a path.
    ///
    /// Without --for the grant is written for the caller and never expires.
    Authorize {
        /// Path (absolute or relative to the mount).
        path: String,

        /// Capabilities: all, none, or a list such as read,set-uri.
        #[arg(value_parser = parse_capabilities, default_value = "all")]
        capabilities: Capabilities,

        /// Beneficiary of the grant.
        #[arg(long = "for", value_parser = parse_principal)]
        beneficiary: Option<Principal>,

        /// Grant lifetime in seconds (indefinite when absent).
        #[arg(short, long)]
        duration: Option<u64>,

        /// Delete the beneficiary's grant instead.
        #[arg(long, conflicts_with = "duration")]
        revoke: bool,
    },

    /// Bind a content fingerprint to a path.
    SetUri {
        /// Path (absolute or relative to the mount).
        path: String,

        /// Fingerprint as 0x-prefixed hex.
        #[arg(value_parser = parse_hash, required_unless_present = "file")]
        fingerprint: Option<Hash>,

        /// Hash this file instead of passing a fingerprint.
        #[arg(long, conflicts_with = "fingerprint")]
        file: Option<PathBuf>,

        /// Grant holder the write is made for (defaults to the caller).
        #[arg(long, value_parser = parse_principal)]
        beneficiary: Option<Principal>,
    },

    // =========================================================================
    // Pricing Commands
    // =========================================================================
    /// Show prices.
    ///
    /// With --path, shows the price a buyer of that path pays.
    Price {
        /// Seller to quote (defaults to the caller).
        #[arg(value_parser = parse_principal)]
        principal: Option<Principal>,

        /// Quote the seller owning this path.
        #[arg(short, long, conflicts_with = "principal")]
        path: Option<String>,
    },

    /// Change the default price (owner only).
    SetDefaultPrice {
        #[arg(value_parser = parse_price)]
        price: Amount,
    },

    /// Set or clear the caller's own price.
    SetUserPrice {
        /// Price in base units; 0 means free.
        #[arg(required_unless_present = "clear")]
        price: Option<Amount>,

        /// Remove the override and fall back to the default price.
        #[arg(long, conflicts_with = "price")]
        clear: bool,
    },

    // =========================================================================
    // Token Commands
    // =========================================================================
    /// Buy a time-bounded grant on a path.
    Buy {
        /// Path (absolute or relative to the mount).
        path: String,

        /// Amount to pay (defaults to the seller's price).
        #[arg(short, long)]
        amount: Option<Amount>,

        /// Who receives the grant (defaults to the caller).
        #[arg(long, value_parser = parse_principal)]
        beneficiary: Option<Principal>,

        /// Seconds of access bought.
        #[arg(short, long, default_value_t = DEFAULT_DURATION_SECS)]
        duration: u32,
    },

    /// Transfer tokens.
    Transfer {
        #[arg(value_parser = parse_principal)]
        to: Principal,

        amount: Amount,
    },

    /// Show a token balance.
    Balance {
        /// Account (defaults to the caller).
        #[arg(value_parser = parse_principal)]
        principal: Option<Principal>,
    },

    /// Show accrued purchase proceeds.
    Taxes,

    /// Withdraw accrued proceeds (owner only).
    WithdrawTax {
        amount: Amount,

        /// Recipient (defaults to the caller).
        #[arg(long, value_parser = parse_principal)]
        to: Option<Principal>,
    },

    // =========================================================================
    // Inspection Commands
    // =========================================================================
    /// Show the registry, or one path in detail.
    Inspect {
        /// Path to inspect.
        path: Option<String>,

        /// Show this principal's effective grant on the path.
        #[arg(long, value_parser = parse_principal, requires = "path")]
        principal: Option<Principal>,
    },
}

fn parse_principal(s: &str) -> Result<Principal, String> {
    s.parse::<Principal>().map_err(|e| e.to_string())
}

fn parse_hash(s: &str) -> Result<Hash, String> {
    s.parse::<Hash>().map_err(|e| e.to_string())
}

fn parse_attr(s: &str) -> Result<PathAttr, String> {
    s.parse::<PathAttr>().map_err(|e| e.to_string())
}

fn parse_capabilities(s: &str) -> Result<Capabilities, String> {
    s.parse::<Capabilities>().map_err(|e| e.to_string())
}

/// Parse a price, rejecting values the registry would refuse.
fn parse_price(s: &str) -> Result<Amount, String> {
    let value: Amount = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid price", s))?;
    if value == 0 || value > MAX_PRICE {
        return Err(format!("Price must be between 1 and {}", MAX_PRICE));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const ALICE: &str = "0x0101010101010101010101010101010101010101";

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_caller() {
        let cli = Cli::try_parse_from(["aufs", "--caller", ALICE, "taxes"]).unwrap();
        assert_eq!(cli.caller, Some(Principal::from_bytes([1; 20])));
        assert!(matches!(cli.command, Commands::Taxes));
    }

    #[test]
    fn test_bad_principal_rejected() {
        let result = Cli::try_parse_from(["aufs", "balance", "0x1234"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delegate_args() {
        let cli = Cli::try_parse_from(["aufs", "delegate", "/dir1", "can-authorize", "--to", ALICE])
            .unwrap();
        match cli.command {
            Commands::Delegate { attr, to, remove, .. } => {
                assert_eq!(attr, PathAttr::CanAuthorize);
                assert_eq!(to, Some(Principal::from_bytes([1; 20])));
                assert!(!remove);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_authorize_capability_list() {
        let cli = Cli::try_parse_from(["aufs", "authorize", "/dir1", "read,set-uri"]).unwrap();
        match cli.command {
            Commands::Authorize { capabilities, .. } => {
                assert_eq!(capabilities, Capabilities::READ | Capabilities::SET_URI);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_buy_defaults() {
        let cli = Cli::try_parse_from(["aufs", "buy", "/dir1/movie1.mp4"]).unwrap();
        match cli.command {
            Commands::Buy {
                amount, duration, ..
            } => {
                assert_eq!(amount, None);
                assert_eq!(duration, DEFAULT_DURATION_SECS);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_set_user_price_needs_value_or_clear() {
        assert!(Cli::try_parse_from(["aufs", "set-user-price"]).is_err());
        assert!(Cli::try_parse_from(["aufs", "set-user-price", "--clear"]).is_ok());
        assert!(Cli::try_parse_from(["aufs", "set-user-price", "0"]).is_ok());
    }

    #[test]
    fn test_price_bounds() {
        assert!(parse_price("0").is_err());
        assert_eq!(parse_price("1000").unwrap(), 1_000);
        assert!(parse_price("abc").unwrap_err().contains("not a valid price"));
        assert!(parse_price(&(MAX_PRICE + 1).to_string()).is_err());
    }
}
