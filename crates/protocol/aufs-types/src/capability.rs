//! Delegation attributes and authorization capability sets.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Capability tag attached to a delegation edge.
///
/// An edge grants exactly one attribute over a path, never blanket control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[non_exhaustive]
pub enum PathAttr {
    /// May create or revoke delegation edges
    CanDelegate = 1,
    /// May grant usage authorizations
    CanAuthorize = 2,
}

impl PathAttr {
    /// All known attributes.
    pub const ALL: [PathAttr; 2] = [PathAttr::CanDelegate, PathAttr::CanAuthorize];

    /// Numeric wire value.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Look up an attribute by its wire value.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PathAttr::CanDelegate),
            2 => Some(PathAttr::CanAuthorize),
            _ => None,
        }
    }

    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathAttr::CanDelegate => "can_delegate",
            PathAttr::CanAuthorize => "can_authorize",
        }
    }
}

impl std::fmt::Display for PathAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PathAttr {
    type Err = ParseError;

    /// Accepts `can_delegate`/`delegate`/`1` and `can_authorize`/`authorize`/`2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "can_delegate" | "delegate" | "1" => Ok(PathAttr::CanDelegate),
            "can_authorize" | "authorize" | "2" => Ok(PathAttr::CanAuthorize),
            _ => Err(ParseError::UnknownAttr(s.to_string())),
        }
    }
}

/// A typed 32-bit set of operation permissions.
///
/// [`Capabilities::ALL`] sets every bit, so it contains any capability,
/// including ones not yet named here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(u32);

impl Capabilities {
    /// No permissions.
    pub const NONE: Capabilities = Capabilities(0);
    /// Read the resource.
    pub const READ: Capabilities = Capabilities(1 << 0);
    /// Write the resource.
    pub const WRITE: Capabilities = Capabilities(1 << 1);
    /// Bind a content fingerprint to the path.
    pub const SET_URI: Capabilities = Capabilities(1 << 2);
    /// Unrestricted.
    pub const ALL: Capabilities = Capabilities(u32::MAX);

    const NAMED: [(&'static str, Capabilities); 3] = [
        ("read", Capabilities::READ),
        ("write", Capabilities::WRITE),
        ("set_uri", Capabilities::SET_URI),
    ];

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(&self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether this is the unrestricted set.
    pub const fn is_all(&self) -> bool {
        self.0 == u32::MAX
    }

    /// Union of two sets.
    pub const fn union(self, other: Capabilities) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitAnd for Capabilities {
    type Output = Capabilities;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Capabilities({})", self)
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_all() {
            return f.write_str("all");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, cap)| self.contains(*cap))
            .map(|(name, _)| *name)
            .collect();
        let named_bits = Self::NAMED
            .iter()
            .filter(|(_, cap)| self.contains(*cap))
            .fold(0u32, |acc, (_, cap)| acc | cap.0);
        let rest = self.0 & !named_bits;
        match (names.is_empty(), rest) {
            (true, _) => write!(f, "0x{:08x}", self.0),
            (false, 0) => f.write_str(&names.join(",")),
            (false, _) => write!(f, "{},0x{:08x}", names.join(","), rest),
        }
    }
}

impl std::str::FromStr for Capabilities {
    type Err = ParseError;

    /// Accepts `all`, `none`, a comma-separated list of names, a decimal
    /// number or a `0x` hex number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix("0x") {
            return u32::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| ParseError::UnknownCapability(s.to_string()));
        }
        if let Ok(bits) = trimmed.parse::<u32>() {
            return Ok(Self(bits));
        }

        let mut caps = Capabilities::NONE;
        for part in trimmed.split(',').map(str::trim) {
            caps = caps
                | match part.to_ascii_lowercase().replace('-', "_").as_str() {
                    "all" => Capabilities::ALL,
                    "none" => Capabilities::NONE,
                    "read" => Capabilities::READ,
                    "write" => Capabilities::WRITE,
                    "set_uri" | "seturi" | "uri" => Capabilities::SET_URI,
                    _ => return Err(ParseError::UnknownCapability(part.to_string())),
                };
        }
        Ok(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_codes() {
        assert_eq!(PathAttr::CanDelegate.code(), 1);
        assert_eq!(PathAttr::CanAuthorize.code(), 2);
        assert_eq!(PathAttr::from_code(2), Some(PathAttr::CanAuthorize));
        assert_eq!(PathAttr::from_code(3), None);
    }

    #[test]
    fn test_attr_parse() {
        assert_eq!("1".parse::<PathAttr>().unwrap(), PathAttr::CanDelegate);
        assert_eq!(
            "can-authorize".parse::<PathAttr>().unwrap(),
            PathAttr::CanAuthorize
        );
        assert!("owner".parse::<PathAttr>().is_err());
    }

    #[test]
    fn test_all_contains_everything() {
        assert!(Capabilities::ALL.contains(Capabilities::SET_URI));
        assert!(Capabilities::ALL.contains(Capabilities::from_bits(1 << 31)));
        assert_eq!(Capabilities::ALL.bits(), 4_294_967_295);
    }

    #[test]
    fn test_contains_partial() {
        let caps = Capabilities::READ | Capabilities::WRITE;
        assert!(caps.contains(Capabilities::READ));
        assert!(!caps.contains(Capabilities::SET_URI));
        assert!(!caps.contains(Capabilities::READ | Capabilities::SET_URI));
    }

    #[test]
    fn test_display() {
        assert_eq!(Capabilities::ALL.to_string(), "all");
        assert_eq!(Capabilities::NONE.to_string(), "none");
        assert_eq!(
            (Capabilities::READ | Capabilities::SET_URI).to_string(),
            "read,set_uri"
        );
        assert_eq!(Capabilities::from_bits(1 << 8).to_string(), "0x00000100");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "4294967295".parse::<Capabilities>().unwrap(),
            Capabilities::ALL
        );
        assert_eq!("0x4".parse::<Capabilities>().unwrap(), Capabilities::SET_URI);
        assert_eq!(
            "read, set-uri".parse::<Capabilities>().unwrap(),
            Capabilities::READ | Capabilities::SET_URI
        );
        assert!("execute".parse::<Capabilities>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Capabilities::SET_URI).unwrap();
        assert_eq!(json, "4");
    }
}
