//! Output formatting for CLI commands.
//!
//! Every command builds a serializable output struct and renders it either
//! as colored human text or as pretty JSON.

use aufs_crypto::{Hash, Principal, Timestamp};
use aufs_types::{
    Amount, AuthorizationGrant, Capabilities, DelegationEdge, ErrorCode, Event, Receipt, UriRecord,
};
use colored::Colorize;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Render a command result.
pub trait Render: Serialize {
    /// Human-readable rendering.
    fn render_human(&self) -> String;

    /// JSON rendering.
    fn render_json(&self) -> String {
        to_json(self)
    }

    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn label(name: &str) -> String {
    format!("{:<16}", format!("{}:", name)).bold().to_string()
}

fn format_expiry(expires_at: Option<Timestamp>) -> String {
    match expires_at {
        Some(t) => format!("until {}", t),
        None => "indefinite".to_string(),
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Output of `aufs init`.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub owner: Principal,
    pub registry: Principal,
    pub mount: String,
    pub default_price: Amount,
    pub initial_supply: Amount,
    pub symbol: String,
    pub config_path: String,
    pub database: String,
}

impl Render for InitOutput {
    fn render_human(&self) -> String {
        [
            format!("{} Registry deployed", "✓".green()),
            format!("{}{}", label("Owner"), self.owner),
            format!("{}{}", label("Registry"), self.registry),
            format!("{}{}", label("Mount"), self.mount),
            format!("{}{}", label("Default price"), self.default_price),
            format!("{}{} {}", label("Supply"), self.initial_supply, self.symbol),
            format!("{}{}", label("Config"), self.config_path),
            format!("{}{}", label("Database"), self.database),
        ]
        .join("\n")
    }
}

/// Output of `aufs keygen`.
#[derive(Debug, Serialize)]
pub struct KeygenOutput {
    pub principal: Principal,
    pub public_key: String,
    pub private_key: String,
}

impl Render for KeygenOutput {
    fn render_human(&self) -> String {
        [
            format!("{}{}", label("Principal"), self.principal),
            format!("{}{}", label("Public key"), self.public_key),
            format!("{}{}", label("Private key"), self.private_key),
            format!(
                "\n{}",
                "Keep the private key secret. It is not stored anywhere.".yellow()
            ),
        ]
        .join("\n")
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// Events committed by a state-changing command.
#[derive(Debug, Serialize)]
pub struct ReceiptOutput {
    pub action: String,
    pub events: Vec<Event>,
}

impl ReceiptOutput {
    pub fn new(action: impl Into<String>, receipt: Receipt) -> Self {
        Self {
            action: action.into(),
            events: receipt.events,
        }
    }
}

impl Render for ReceiptOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!("{} {}", "✓".green(), self.action)];
        if self.events.is_empty() {
            lines.push(format!("  {}", "no change".dimmed()));
        }
        for event in &self.events {
            lines.push(format!("  {} {}", event.name().cyan(), describe_event(event)));
        }
        lines.join("\n")
    }
}

/// One-line summary of an event's fields.
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::Transfer { from, to, amount } if from.is_zero() => {
            format!("minted {} to {}", amount, to)
        }
        Event::Transfer { from, to, amount } => format!("{} from {} to {}", amount, from, to),
        Event::DelegationChanged {
            domain,
            path,
            attr,
            removed,
            ..
        } => {
            let verb = if *removed { "removed from" } else { "granted to" };
            format!("{} on {} {} {}", attr, path, verb, domain)
        }
        Event::AuthorizationChanged {
            domain,
            path,
            capabilities,
            beneficiary,
            expires_at,
        } => {
            if *capabilities == Capabilities::NONE {
                format!("{} revoked on {} by {}", beneficiary, path, domain)
            } else {
                format!(
                    "{} on {} for {} ({}) by {}",
                    capabilities,
                    path,
                    beneficiary,
                    format_expiry(*expires_at),
                    domain
                )
            }
        }
        Event::UriSet {
            domain,
            path,
            fingerprint,
        } => format!("{} -> {} for {}", path, fingerprint, domain),
        Event::DefaultPriceChanged { old, new } => format!("{} -> {}", old, new),
        Event::UserPriceChanged { principal, price } => match price {
            Some(price) => format!("{} for {}", price, principal),
            None => format!("cleared for {}", principal),
        },
        Event::TaxWithdrawn { to, amount } => format!("{} to {}", amount, to),
        _ => String::new(),
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Output of `aufs balance`.
#[derive(Debug, Serialize)]
pub struct BalanceOutput {
    pub principal: Principal,
    pub balance: Amount,
    pub symbol: String,
    pub decimals: u8,
}

impl Render for BalanceOutput {
    fn render_human(&self) -> String {
        format!(
            "{}{}\n{}{} {} {}",
            label("Principal"),
            self.principal,
            label("Balance"),
            self.balance,
            self.symbol,
            format!("(10^{} units per token)", self.decimals).dimmed()
        )
    }
}

/// Output of `aufs price`.
#[derive(Debug, Serialize)]
pub struct PriceOutput {
    pub default_price: Amount,
    pub principal: Principal,
    pub price: Amount,
    /// Set when the query was for a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Render for PriceOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!("{}{}", label("Default price"), self.default_price)];
        if let Some(path) = &self.path {
            lines.push(format!("{}{}", label("Path"), path));
            lines.push(format!("{}{}", label("Sold by"), self.principal));
        } else {
            lines.push(format!("{}{}", label("Seller"), self.principal));
        }
        lines.push(format!("{}{}", label("Price"), self.price));
        lines.join("\n")
    }
}

/// Output of `aufs taxes`.
#[derive(Debug, Serialize)]
pub struct TaxesOutput {
    pub registry: Principal,
    pub total_taxes: Amount,
    pub registry_balance: Amount,
}

impl Render for TaxesOutput {
    fn render_human(&self) -> String {
        format!(
            "{}{}\n{}{}\n{}{}",
            label("Registry"),
            self.registry,
            label("Accrued taxes"),
            self.total_taxes,
            label("Balance"),
            self.registry_balance
        )
    }
}

/// Output of `aufs inspect` without a path.
#[derive(Debug, Serialize)]
pub struct RegistryOutput {
    pub owner: Principal,
    pub registry: Principal,
    pub scheme: String,
    pub mount: String,
    pub default_price: Amount,
    pub total_supply: Amount,
    pub total_taxes: Amount,
    pub delegations: Vec<DelegationEdge>,
    pub authorizations: Vec<AuthorizationGrant>,
    pub uris: Vec<UriRecord>,
}

impl Render for RegistryOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{}{}", label("Owner"), self.owner),
            format!("{}{}", label("Registry"), self.registry),
            format!("{}{}://", label("Scheme"), self.scheme),
            format!("{}{}", label("Mount"), self.mount),
            format!("{}{}", label("Default price"), self.default_price),
            format!("{}{}", label("Total supply"), self.total_supply),
            format!("{}{}", label("Accrued taxes"), self.total_taxes),
        ];

        lines.push(format!("\n{} ({})", "Delegations".bold(), self.delegations.len()));
        for edge in &self.delegations {
            lines.push(format!("  {} {} -> {}", edge.path, edge.attr, edge.grantee));
        }

        lines.push(format!(
            "\n{} ({})",
            "Authorizations".bold(),
            self.authorizations.len()
        ));
        for grant in &self.authorizations {
            lines.push(format!(
                "  {} {} [{}] {}",
                grant.path,
                grant.principal,
                grant.capabilities,
                format_expiry(grant.expires_at)
            ));
        }

        lines.push(format!("\n{} ({})", "URIs".bold(), self.uris.len()));
        for record in &self.uris {
            lines.push(format!("  {} {}", record.path, record.fingerprint));
        }
        lines.join("\n")
    }
}

/// Output of `aufs inspect <path>`.
#[derive(Debug, Serialize)]
pub struct PathOutput {
    pub path: String,
    pub path_owner: Principal,
    pub price: Amount,
    pub fingerprint: Option<Hash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationGrant>,
    pub now: Timestamp,
}

impl Render for PathOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{}{}", label("Path"), self.path),
            format!("{}{}", label("Path owner"), self.path_owner),
            format!("{}{}", label("Price"), self.price),
            format!(
                "{}{}",
                label("Fingerprint"),
                self.fingerprint
                    .map(|h| h.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
        ];
        if let Some(principal) = &self.principal {
            let grant = match &self.authorization {
                Some(grant) => format!(
                    "[{}] {} (from {})",
                    grant.capabilities,
                    format_expiry(grant.expires_at),
                    grant.path
                ),
                None => "none".red().to_string(),
            };
            lines.push(format!("{}{} {}", label("Grant"), principal, grant));
        }
        lines.join("\n")
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error rendering for `--format json`.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorOutput {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            error: message.into(),
            code: code.to_string(),
            suggestion: code.suggestion().map(str::to_string),
        }
    }
}

impl Render for ErrorOutput {
    fn render_human(&self) -> String {
        let mut out = format!(
            "{} [{}]: {}",
            "Error".red().bold(),
            self.code.yellow(),
            self.error
        );
        if let Some(suggestion) = &self.suggestion {
            out.push_str(&format!("\n{}: {}", "Hint".cyan(), suggestion));
        }
        out
    }
}
