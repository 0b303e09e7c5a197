//! `RestrictionSet` — A group of classified patterns with an optional message
//!
//! A set owns two independent pattern collections, one for items and one for
//! blocks, each preprocessed at construction into an index that makes the
//! per-check lookup cheap:
//!
//! 1. exact identifiers — `HashSet`, O(1)
//! 2. wildcard namespaces — `HashSet`, O(1)
//! 3. tag identifiers — `Vec`, O(k) scan through the [`TagOracle`]
//!
//! The short-circuit order is a performance choice, not a semantic one: any
//! match restricts regardless of which tier found it. Items never match
//! against block patterns or vice versa.
//!
//! Raw pattern strings are retained alongside the index so the set can be
//! written back to config exactly as the operator typed it. Equality is
//! structural over the *classified* collections and the message — two raw
//! lists that classify identically compare equal.

use crate::ident::Ident;
use crate::pattern::{classify, split_tokens, Pattern};
use crate::provider::TagOracle;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Whether a check targets an item or a block type.
///
/// Matching is fully symmetric between the two; the kind selects which of a
/// set's two pattern collections is consulted and is forwarded to the
/// [`TagOracle`] so tag namespaces stay separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// An item type.
    Item,
    /// A block type.
    Block,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => f.write_str("item"),
            Self::Block => f.write_str("block"),
        }
    }
}

/// One pattern collection (items or blocks) in raw + compiled form.
#[derive(Debug, Clone, Default)]
struct PatternIndex {
    /// The entries as configured, kept verbatim for save/display.
    raw: Vec<String>,
    exact: HashSet<Ident>,
    namespaces: HashSet<String>,
    tags: Vec<Ident>,
}

impl PatternIndex {
    /// Compile raw entries into the three-tier index.
    ///
    /// Each entry is comma-split first; tokens that fail classification are
    /// dropped individually with a warning. Compilation never aborts the
    /// whole collection.
    fn compile(raw: Vec<String>, kind: TargetKind) -> Self {
        let mut index = Self {
            raw,
            ..Self::default()
        };
        for entry in &index.raw {
            for token in split_tokens(entry) {
                match classify(token) {
                    Ok(Pattern::Exact(id)) => {
                        index.exact.insert(id);
                    }
                    Ok(Pattern::ModWildcard(ns)) => {
                        index.namespaces.insert(ns);
                    }
                    Ok(Pattern::Tag(id)) => {
                        index.tags.push(id);
                    }
                    Err(e) => {
                        warn!(pattern = token, "dropping unparseable {kind} pattern: {e}");
                    }
                }
            }
        }
        index
    }

    fn matches(&self, ident: &Ident, kind: TargetKind, tags: &dyn TagOracle) -> bool {
        if self.exact.contains(ident) {
            return true;
        }
        if self.namespaces.contains(ident.namespace()) {
            return true;
        }
        self.tags.iter().any(|tag| tags.is_member(ident, tag, kind))
    }

    fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.namespaces.is_empty() && self.tags.is_empty()
    }
}

// Structural equality over the compiled index; the raw strings are
// presentation data and excluded deliberately.
impl PartialEq for PatternIndex {
    fn eq(&self, other: &Self) -> bool {
        self.exact == other.exact
            && self.namespaces == other.namespaces
            && self.tags == other.tags
    }
}

impl Eq for PatternIndex {}

/// An immutable-after-build group of item and block patterns plus an optional
/// denial message.
///
/// `None`/empty message means "defer to the process-wide default". Mutators
/// rebuild the affected index wholesale; there is no partial application.
///
/// # Example
///
/// ```
/// use rankgate::{Ident, NoTags, RestrictionSet, TargetKind};
///
/// let set = RestrictionSet::new(
///     vec!["minecraft:diamond_sword".into(), "mekanism:*".into()],
///     vec![],
///     Some("&cNot with your rank!".into()),
/// );
///
/// let sword: Ident = "minecraft:diamond_sword".parse().unwrap();
/// assert!(set.matches(&sword, TargetKind::Item, &NoTags));
/// assert!(!set.matches(&sword, TargetKind::Block, &NoTags));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionSet {
    items: PatternIndex,
    blocks: PatternIndex,
    message: Option<String>,
}

impl RestrictionSet {
    /// Build a set from raw item and block pattern lists.
    ///
    /// Unparseable tokens are dropped with warnings; the rest of the set is
    /// compiled normally.
    #[must_use]
    pub fn new(items: Vec<String>, blocks: Vec<String>, message: Option<String>) -> Self {
        Self {
            items: PatternIndex::compile(items, TargetKind::Item),
            blocks: PatternIndex::compile(blocks, TargetKind::Block),
            message,
        }
    }

    /// Whether `ident` is restricted by this set for the given kind.
    ///
    /// Exact lookup, then namespace lookup, then a tag scan through the
    /// oracle. Never fails and never blocks.
    pub fn matches(&self, ident: &Ident, kind: TargetKind, tags: &dyn TagOracle) -> bool {
        match kind {
            TargetKind::Item => self.items.matches(ident, kind, tags),
            TargetKind::Block => self.blocks.matches(ident, kind, tags),
        }
    }

    /// The set's message template, if it has one with content.
    ///
    /// An empty string is treated the same as no message: defer to the
    /// caller's fallback.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Replace the message template.
    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    /// Replace the item pattern list, rebuilding the item index.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = PatternIndex::compile(items, TargetKind::Item);
    }

    /// Replace the block pattern list, rebuilding the block index.
    pub fn set_blocks(&mut self, blocks: Vec<String>) {
        self.blocks = PatternIndex::compile(blocks, TargetKind::Block);
    }

    /// The raw item pattern entries as configured.
    #[must_use]
    pub fn item_patterns(&self) -> &[String] {
        &self.items.raw
    }

    /// The raw block pattern entries as configured.
    #[must_use]
    pub fn block_patterns(&self) -> &[String] {
        &self.blocks.raw
    }

    /// Whether the set restricts nothing (both compiled indices empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.blocks.is_empty()
    }
}
