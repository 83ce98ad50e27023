//! Domain labels.
//!
//! A domain is the administrative label of a principal: `<scheme>://<principal>`.
//! The mapping is injective for a fixed scheme, so tests and callers can
//! compare labels without caring how principals are formatted.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SCHEME_LENGTH;
use crate::error::ParseError;
use crate::Principal;

/// Administrative label derived from a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain {
    scheme: String,
    principal: Principal,
}

impl Domain {
    /// Build the domain of `principal` under `scheme`.
    ///
    /// The scheme is assumed valid; use [`validate_scheme`] on untrusted
    /// input first.
    pub fn new(scheme: impl Into<String>, principal: Principal) -> Self {
        Self {
            scheme: scheme.into(),
            principal,
        }
    }

    /// The URI scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The principal this label stands for.
    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// The full label, e.g. `aufs://0x1f...`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// Check that a scheme is non-empty, starts with a lowercase letter and
/// contains only lowercase letters, digits, `+`, `-` or `.`.
pub fn validate_scheme(scheme: &str) -> Result<(), ParseError> {
    let mut chars = scheme.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c));
    if valid_start && valid_rest && scheme.len() <= MAX_SCHEME_LENGTH {
        Ok(())
    } else {
        Err(ParseError::InvalidScheme(scheme.to_string()))
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.principal)
    }
}

impl std::str::FromStr for Domain {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = s
            .split_once("://")
            .ok_or_else(|| ParseError::InvalidDomain(s.to_string()))?;
        validate_scheme(scheme)?;
        let principal = rest
            .parse::<Principal>()
            .map_err(|_| ParseError::InvalidDomain(s.to_string()))?;
        Ok(Self::new(scheme, principal))
    }
}

impl TryFrom<String> for Domain {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.to_string()
    }
}
