//! Collaborator interfaces consumed by the engine
//!
//! The engine never talks to a host runtime or an external ranks plugin
//! directly. It calls three narrow traits whose concrete implementations are
//! injected once at startup and may be absent/no-op:
//!
//! - [`RankProvider`] — which ranks exist, and which a player holds
//! - [`TagOracle`] — does an identifier belong to a named tag
//! - [`DisplayResolver`] — human-readable names for message substitution
//!
//! Unavailability is a steady permissive state, not an error: an unavailable
//! provider reports `available() == false` and returns empty sequences, and
//! callers treat that as "no restrictions apply".

use crate::ident::Ident;
use crate::set::TargetKind;

/// An externally-defined rank, reduced to the two fields the engine needs.
///
/// The upstream rank object stays behind the [`RankProvider`]; the engine
/// treats the id as an opaque key and the display name as presentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankHandle {
    id: String,
    display_name: String,
}

impl RankHandle {
    /// Create a handle from an id and display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// The rank's stable identifier (config map key).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The rank's presentation name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Supplies the set of known ranks and per-player rank membership.
///
/// Implementations adapt whatever rank system the host runs. The engine only
/// calls this from discovery and from the host gate, never from the per-check
/// hot path.
pub trait RankProvider: Send + Sync {
    /// Whether the upstream rank system is reachable right now.
    ///
    /// When this returns `false`, the other methods return empty sequences
    /// and callers enforce nothing.
    fn available(&self) -> bool;

    /// Every rank the upstream system knows about.
    fn all_ranks(&self) -> Vec<RankHandle>;

    /// The ranks held by one player, in the upstream system's order.
    ///
    /// That order decides multi-rank precedence: the first rank with a
    /// matching restriction wins.
    fn ranks_of(&self, player: &str) -> Vec<RankHandle>;
}

impl RankProvider for Box<dyn RankProvider> {
    fn available(&self) -> bool {
        (**self).available()
    }

    fn all_ranks(&self) -> Vec<RankHandle> {
        (**self).all_ranks()
    }

    fn ranks_of(&self, player: &str) -> Vec<RankHandle> {
        (**self).ranks_of(player)
    }
}

/// Resolves tag membership for tag patterns.
///
/// Tag contents are owned by the host's data system, not by this engine;
/// patterns store only the tag identifier and ask the oracle at match time.
/// Oracle state may change between calls without any reclassification.
pub trait TagOracle: Send + Sync {
    /// Whether `ident` belongs to the tag named `tag` for the given kind.
    fn is_member(&self, ident: &Ident, tag: &Ident, kind: TargetKind) -> bool;
}

impl TagOracle for Box<dyn TagOracle> {
    fn is_member(&self, ident: &Ident, tag: &Ident, kind: TargetKind) -> bool {
        (**self).is_member(ident, tag, kind)
    }
}

/// A [`TagOracle`] with no tag data: every membership test is `false`.
///
/// Useful for call sites (tests, offline tooling) where tag patterns should
/// simply never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagOracle for NoTags {
    fn is_member(&self, _ident: &Ident, _tag: &Ident, _kind: TargetKind) -> bool {
        false
    }
}

/// Resolves display text for message placeholder substitution.
///
/// `None` means "no display name known" and callers fall back to the
/// identifier's `namespace:path` rendering.
pub trait DisplayResolver: Send + Sync {
    /// Human-readable name for the identifier, if one is known.
    fn display_name(&self, ident: &Ident, kind: TargetKind) -> Option<String>;
}

impl DisplayResolver for Box<dyn DisplayResolver> {
    fn display_name(&self, ident: &Ident, kind: TargetKind) -> Option<String> {
        (**self).display_name(ident, kind)
    }
}

/// A [`DisplayResolver`] that knows no names: identifiers render as
/// `namespace:path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNames;

impl DisplayResolver for PlainNames {
    fn display_name(&self, _ident: &Ident, _kind: TargetKind) -> Option<String> {
        None
    }
}
