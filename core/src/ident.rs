//! `Ident` — Namespaced identifier for items, blocks, and tags
//!
//! Identifiers take the form `namespace:path` (e.g. `minecraft:diamond_sword`,
//! `mekanism:digital_miner`). A bare path with no separator defaults to the
//! [`DEFAULT_NAMESPACE`]. The namespace is kept as a separate field because
//! wildcard patterns match on it alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace assumed when an identifier or tag omits one (`"dirt"` means
/// `"minecraft:dirt"`, `"#beds"` means `"#minecraft:beds"`).
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Errors from identifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentError {
    /// The input was empty after trimming.
    #[error("identifier is empty")]
    Empty,

    /// More than one `:` separator.
    #[error("identifier \"{text}\" has more than one ':' separator")]
    ExtraSeparator {
        /// The offending input.
        text: String,
    },

    /// A character outside the allowed namespace set `[a-z0-9_.-]`.
    #[error("invalid character {ch:?} in namespace of \"{text}\"")]
    BadNamespaceChar {
        /// The offending input.
        text: String,
        /// The first rejected character.
        ch: char,
    },

    /// A character outside the allowed path set `[a-z0-9_/.-]`.
    #[error("invalid character {ch:?} in path of \"{text}\"")]
    BadPathChar {
        /// The offending input.
        text: String,
        /// The first rejected character.
        ch: char,
    },
}

/// A namespaced identifier naming an item or block type, or a tag.
///
/// Treated as an opaque comparable key plus a derived `namespace` field used
/// for wildcard matching. Serializes as the plain `namespace:path` string.
///
/// # Example
///
/// ```
/// use rankgate::Ident;
///
/// let sword: Ident = "minecraft:diamond_sword".parse().unwrap();
/// assert_eq!(sword.namespace(), "minecraft");
/// assert_eq!(sword.path(), "diamond_sword");
///
/// // Bare paths pick up the default namespace.
/// let dirt: Ident = "dirt".parse().unwrap();
/// assert_eq!(dirt.to_string(), "minecraft:dirt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident {
    namespace: String,
    path: String,
}

impl Ident {
    /// Create an identifier from validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError`] if either part is empty or contains a character
    /// outside its allowed set.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, IdentError> {
        let namespace = namespace.into();
        let path = path.into();
        if namespace.is_empty() || path.is_empty() {
            return Err(IdentError::Empty);
        }
        let text = || format!("{namespace}:{path}");
        if let Some(ch) = namespace.chars().find(|c| !is_namespace_char(*c)) {
            return Err(IdentError::BadNamespaceChar { text: text(), ch });
        }
        if let Some(ch) = path.chars().find(|c| !is_path_char(*c)) {
            return Err(IdentError::BadPathChar { text: text(), ch });
        }
        Ok(Self { namespace, path })
    }

    /// Parse a `namespace:path` string. A missing namespace defaults to
    /// [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentError`] on empty input, multiple separators, or invalid
    /// characters.
    pub fn parse(input: &str) -> Result<Self, IdentError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentError::Empty);
        }
        let mut parts = trimmed.splitn(3, ':');
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Self::new(DEFAULT_NAMESPACE, first),
            (Some(path), None) => Self::new(first, path),
            (Some(_), Some(_)) => Err(IdentError::ExtraSeparator {
                text: trimmed.to_string(),
            }),
        }
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Ident {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Ident {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
