//! `Pattern` — Classified restriction rule
//!
//! One raw config token classifies into exactly one of three kinds:
//!
//! - `minecraft:diamond_sword` — [`Pattern::Exact`], full identifier equality
//! - `mekanism:*` — [`Pattern::ModWildcard`], everything in a namespace
//! - `#forge:tools` / `#beds` — [`Pattern::Tag`], membership resolved through
//!   the external [`TagOracle`](crate::TagOracle)
//!
//! Classification is total and deterministic over any non-empty trimmed
//! string: every input either classifies or yields a typed [`PatternError`]
//! that the caller logs and discards. A single config list entry may carry
//! several comma-separated tokens; [`split_tokens`] is the one place that
//! sub-splitting is defined.

use crate::ident::{Ident, IdentError, DEFAULT_NAMESPACE};
use std::fmt;

/// Errors from pattern classification.
///
/// These are per-token failures: the caller drops the offending token and
/// keeps processing the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The token was empty after trimming.
    #[error("empty pattern")]
    Empty,

    /// An exact pattern failed identifier parsing.
    #[error("invalid identifier \"{text}\": {source}")]
    InvalidIdent {
        /// The raw token.
        text: String,
        /// The underlying parse failure.
        source: IdentError,
    },

    /// A `#tag` token failed tag-identifier parsing.
    #[error("invalid tag \"{text}\": {source}")]
    InvalidTag {
        /// The raw token (including the `#`).
        text: String,
        /// The underlying parse failure.
        source: IdentError,
    },

    /// A `namespace:*` token has an empty or malformed namespace.
    #[error("invalid namespace wildcard \"{text}\"")]
    InvalidWildcard {
        /// The raw token.
        text: String,
    },
}

/// A classified restriction pattern.
///
/// # Example
///
/// ```
/// use rankgate::{classify, Pattern};
///
/// assert!(matches!(classify("minecraft:tnt").unwrap(), Pattern::Exact(_)));
/// assert!(matches!(classify("mekanism:*").unwrap(), Pattern::ModWildcard(_)));
/// assert!(matches!(classify("#forge:tools").unwrap(), Pattern::Tag(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exact identifier equality.
    Exact(Ident),
    /// Every identifier in one namespace.
    ModWildcard(String),
    /// Tag membership, resolved against the external oracle at match time.
    Tag(Ident),
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(id) => write!(f, "{id}"),
            Self::ModWildcard(ns) => write!(f, "{ns}:*"),
            Self::Tag(id) => write!(f, "#{id}"),
        }
    }
}

/// Split one raw config entry into its comma-separated sub-tokens.
///
/// An entry like `"#forge:tools,minecraft:tnt, mekanism:*"` contributes three
/// independent tokens, exactly as if each had been listed separately. Empty
/// segments are dropped.
pub fn split_tokens(entry: &str) -> impl Iterator<Item = &str> {
    entry.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Classify one raw token into a [`Pattern`].
///
/// - `#name` or `#namespace:name` → [`Pattern::Tag`] (missing namespace
///   defaults to [`DEFAULT_NAMESPACE`])
/// - `namespace:*` → [`Pattern::ModWildcard`]
/// - anything else → [`Pattern::Exact`] via [`Ident::parse`]
///
/// # Errors
///
/// Returns [`PatternError`] on empty input or malformed identifiers. The
/// intended caller behavior is warn-and-drop, never abort.
pub fn classify(raw: &str) -> Result<Pattern, PatternError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(PatternError::Empty);
    }

    if let Some(tag) = token.strip_prefix('#') {
        let parsed = if tag.contains(':') {
            Ident::parse(tag)
        } else {
            Ident::new(DEFAULT_NAMESPACE, tag.trim())
        };
        return parsed
            .map(Pattern::Tag)
            .map_err(|source| PatternError::InvalidTag {
                text: token.to_string(),
                source,
            });
    }

    if let Some(namespace) = token.strip_suffix(":*") {
        if namespace.is_empty() || !namespace.chars().all(is_wildcard_namespace_char) {
            return Err(PatternError::InvalidWildcard {
                text: token.to_string(),
            });
        }
        return Ok(Pattern::ModWildcard(namespace.to_string()));
    }

    Ident::parse(token)
        .map(Pattern::Exact)
        .map_err(|source| PatternError::InvalidIdent {
            text: token.to_string(),
            source,
        })
}

fn is_wildcard_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}
