//! Namespace paths.
//!
//! A [`RegistryPath`] is a normalized absolute path. Every path the registry
//! stores lives at or below the configured mount point, and user input is
//! resolved against that mount with [`RegistryPath::resolve`].

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PATH_DEPTH, MAX_PATH_LENGTH};
use crate::error::PathError;

/// A validated, normalized absolute path.
///
/// Invariants: starts with `/`, has at least one segment, no empty, `.` or
/// `..` segments, no control characters, no trailing `/`, at most
/// [`MAX_PATH_LENGTH`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryPath(String);

impl RegistryPath {
    /// Parse and normalize an absolute path.
    ///
    /// A single trailing `/` is stripped.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        if input.chars().any(char::is_control) {
            return Err(PathError::ControlCharacter);
        }
        if !input.starts_with('/') {
            return Err(PathError::NotAbsolute(input.to_string()));
        }

        let trimmed = match input.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => input,
        };
        if trimmed == "/" {
            return Err(PathError::Empty);
        }
        if trimmed.len() > MAX_PATH_LENGTH {
            return Err(PathError::TooLong {
                len: trimmed.len(),
                max: MAX_PATH_LENGTH,
            });
        }

        for segment in trimmed[1..].split('/') {
            match segment {
                "" => return Err(PathError::EmptySegment(input.to_string())),
                "." | ".." => return Err(PathError::RelativeSegment(input.to_string())),
                _ => {}
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Resolve user input against a mount point.
    ///
    /// Input equal to the mount, or starting with `<mount>/`, is taken as a
    /// full path. Any other absolute input is treated as relative to the
    /// mount.
    ///
    /// # Example
    /// ```
    /// use aufs_types::RegistryPath;
    ///
    /// let mount = RegistryPath::parse("/Web3Tube").unwrap();
    /// let short = RegistryPath::resolve(&mount, "/dir1").unwrap();
    /// let full = RegistryPath::resolve(&mount, "/Web3Tube/dir1").unwrap();
    /// assert_eq!(short, full);
    /// assert_eq!(short.as_str(), "/Web3Tube/dir1");
    /// ```
    pub fn resolve(mount: &RegistryPath, input: &str) -> Result<Self, PathError> {
        let parsed = Self::parse(input)?;
        let full = if parsed.is_within(mount) {
            parsed
        } else {
            Self::parse(&format!("{}{}", mount.0, parsed.0))?
        };

        let below = full.depth() - mount.depth();
        if below > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep {
                depth: below,
                max: MAX_PATH_DEPTH,
            });
        }
        Ok(full)
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0[1..].split('/')
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The final segment.
    pub fn name(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    /// The parent path, or `None` for a top-level path.
    pub fn parent(&self) -> Option<RegistryPath> {
        match self.0.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Whether this path equals `ancestor` or lies below it.
    pub fn is_within(&self, ancestor: &RegistryPath) -> bool {
        self.0 == ancestor.0
            || (self.0.starts_with(&ancestor.0) && self.0.as_bytes()[ancestor.0.len()] == b'/')
    }

    /// The path itself followed by each ancestor up to and including `mount`.
    ///
    /// Returns an empty list when the path is not within `mount`.
    pub fn ancestors_to(&self, mount: &RegistryPath) -> Vec<RegistryPath> {
        if !self.is_within(mount) {
            return Vec::new();
        }

        let mut chain = Vec::with_capacity(self.depth() - mount.depth() + 1);
        let mut current = Some(self.clone());
        while let Some(path) = current {
            let at_mount = path == *mount;
            current = if at_mount { None } else { path.parent() };
            chain.push(path);
        }
        chain
    }
}

impl std::fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RegistryPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryPath> for String {
    fn from(path: RegistryPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RegistryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
