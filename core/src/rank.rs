//! `RankRestrictions` — Ordered restriction sets owned by one rank
//!
//! A rank's sets are evaluated in insertion order with first-match-wins
//! semantics for message resolution. Matching itself is order-independent:
//! any set matching is sufficient to restrict.
//!
//! A rank with zero sets is a valid, "configured but unrestricted" rank —
//! distinct from a rank the registry has never heard of.

use crate::ident::Ident;
use crate::provider::TagOracle;
use crate::set::{RestrictionSet, TargetKind};
use tracing::warn;

/// Restriction data for exactly one rank identifier.
///
/// # INV: First-match-wins
///
/// [`find_matching_set`](Self::find_matching_set) walks sets in insertion
/// order and stops at the first match, so when two sets both restrict an
/// identifier, the earlier set's message is the one shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRestrictions {
    rank_id: String,
    sets: Vec<RestrictionSet>,
}

impl RankRestrictions {
    /// Create empty restriction data for a rank.
    pub fn new(rank_id: impl Into<String>) -> Self {
        Self {
            rank_id: rank_id.into(),
            sets: Vec::new(),
        }
    }

    /// The rank identifier this data belongs to.
    #[must_use]
    pub fn rank_id(&self) -> &str {
        &self.rank_id
    }

    /// The sets in insertion order.
    #[must_use]
    pub fn sets(&self) -> &[RestrictionSet] {
        &self.sets
    }

    /// Number of sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether this rank restricts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Append a set.
    pub fn push_set(&mut self, set: RestrictionSet) {
        self.sets.push(set);
    }

    /// Mutable access to one set, for admin edits.
    pub fn set_mut(&mut self, index: usize) -> Option<&mut RestrictionSet> {
        self.sets.get_mut(index)
    }

    /// Remove the set at `index`.
    ///
    /// Out-of-bounds indices come from operator commands, so a bad index is
    /// logged and reported as `false` rather than panicking mid-check.
    pub fn remove_set(&mut self, index: usize) -> bool {
        if index < self.sets.len() {
            self.sets.remove(index);
            true
        } else {
            warn!(
                rank = %self.rank_id,
                index,
                len = self.sets.len(),
                "ignoring out-of-range restriction set removal"
            );
            false
        }
    }

    /// Drop every set.
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// The first set, in insertion order, that restricts `ident` for `kind`,
    /// along with its index.
    pub fn find_matching_set(
        &self,
        ident: &Ident,
        kind: TargetKind,
        tags: &dyn TagOracle,
    ) -> Option<(usize, &RestrictionSet)> {
        self.sets
            .iter()
            .enumerate()
            .find(|(_, set)| set.matches(ident, kind, tags))
    }

    /// Whether any set restricts `ident` for `kind`.
    pub fn is_restricted(&self, ident: &Ident, kind: TargetKind, tags: &dyn TagOracle) -> bool {
        self.find_matching_set(ident, kind, tags).is_some()
    }
}
