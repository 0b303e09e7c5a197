//! `AccessGate` — Per-player restriction checks for event handlers
//!
//! Event handlers see players; the registry sees ranks. The gate holds the
//! registry and the injected collaborators, looks up the player's ranks in
//! provider order, and stops at the first rank with a matching restriction.

use rankgate::{
    DisplayResolver, Ident, RankProvider, RestrictionRegistry, TagOracle, TargetKind,
};
use std::sync::Arc;
use tracing::debug;

/// The outcome of a denied check: which rank triggered it and the resolved,
/// placeholder-substituted message to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// The first of the player's ranks with a matching restriction.
    pub rank_id: String,
    /// The message to show, with `%item%` already substituted.
    pub message: String,
}

/// Combines the registry with the collaborator seams to answer per-player
/// questions from host event handlers.
///
/// All state is shared via `Arc`, so one gate can be cloned into every
/// handler cheaply. Checks are read-only and safe to call concurrently.
#[derive(Clone)]
pub struct AccessGate {
    registry: Arc<RestrictionRegistry>,
    ranks: Arc<dyn RankProvider>,
    tags: Arc<dyn TagOracle>,
    names: Arc<dyn DisplayResolver>,
}

impl AccessGate {
    /// Assemble a gate from the registry and collaborator implementations.
    pub fn new(
        registry: Arc<RestrictionRegistry>,
        ranks: Arc<dyn RankProvider>,
        tags: Arc<dyn TagOracle>,
        names: Arc<dyn DisplayResolver>,
    ) -> Self {
        Self {
            registry,
            ranks,
            tags,
            names,
        }
    }

    /// The shared registry, for admin commands that live beside the gate.
    #[must_use]
    pub fn registry(&self) -> &Arc<RestrictionRegistry> {
        &self.registry
    }

    /// Whether `player` may not use `ident` for the given kind.
    ///
    /// Returns the [`Denial`] from the first restricting rank, in the
    /// provider's rank order. Fails open — returns `None` — when the
    /// registry is not yet loaded or the rank provider is unavailable.
    pub fn check(&self, player: &str, ident: &Ident, kind: TargetKind) -> Option<Denial> {
        if !self.registry.is_loaded() {
            return None;
        }
        if !self.ranks.available() {
            return None;
        }

        let held = self.ranks.ranks_of(player);
        if held.is_empty() {
            return None;
        }

        let rank_id = self.registry.restricting_rank(
            held.iter().map(|h| h.id()),
            ident,
            kind,
            &*self.tags,
        )?;
        let message =
            self.registry
                .resolve_message(&rank_id, ident, kind, &*self.tags, &*self.names);
        debug!(player, %ident, %kind, rank = %rank_id, "restricted action denied");
        Some(Denial { rank_id, message })
    }

    /// Check every identifier in an inventory sweep.
    ///
    /// Returns `(slot index, denial)` for each restricted entry, preserving
    /// slot order. Handlers use this for the periodic inventory scan that
    /// strips items a player should no longer hold.
    pub fn sweep<'a, I>(&self, player: &str, slots: I, kind: TargetKind) -> Vec<(usize, Denial)>
    where
        I: IntoIterator<Item = Option<&'a Ident>>,
    {
        slots
            .into_iter()
            .enumerate()
            .filter_map(|(slot, ident)| {
                let denial = self.check(player, ident?, kind)?;
                Some((slot, denial))
            })
            .collect()
    }
}
