//! rankgate-host: Host-integration toolkit
//!
//! The core engine answers per-rank questions; a host's event handlers ask
//! per-player questions, from whatever thread the host dispatches on. This
//! crate bridges the two:
//!
//! - [`AccessGate`] — owns the registry plus the collaborator trait objects
//!   and answers "may this player use this item/block, and if not, what do
//!   we tell them" in one call, iterating the player's ranks in provider
//!   order.
//! - [`NoticeCooldown`] — an expiring map that rate-limits repeated denial
//!   notices, keyed by whatever (player, source) pair the handler chooses.
//!
//! Both fail open: an `Unloaded` registry or an unavailable rank provider
//! means no enforcement, never an error or a blocked action.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rankgate::{NoTags, PlainNames, RestrictionRegistry, TargetKind};
//! use rankgate_host::{AccessGate, NoticeCooldown};
//! # use rankgate::{RankHandle, RankProvider};
//! # struct OneRank;
//! # impl RankProvider for OneRank {
//! #     fn available(&self) -> bool { true }
//! #     fn all_ranks(&self) -> Vec<RankHandle> { vec![RankHandle::new("member", "Member")] }
//! #     fn ranks_of(&self, _player: &str) -> Vec<RankHandle> { self.all_ranks() }
//! # }
//!
//! let registry = Arc::new(RestrictionRegistry::new());
//! registry.load_str(r#"
//! [restrictions.member]
//! [[restrictions.member.restriction_sets]]
//! items = ["minecraft:tnt"]
//! "#).unwrap();
//!
//! let gate = AccessGate::new(registry, Arc::new(OneRank), Arc::new(NoTags), Arc::new(PlainNames));
//! let cooldown: NoticeCooldown<(String, u64)> = NoticeCooldown::new(Duration::from_secs(5));
//!
//! let tnt = "minecraft:tnt".parse().unwrap();
//! if let Some(denial) = gate.check("alice", &tnt, TargetKind::Item) {
//!     if cooldown.should_notify(("alice".to_string(), 42)) {
//!         // send denial.message to the player
//!     }
//! }
//! ```

mod cooldown;
mod gate;

pub use cooldown::NoticeCooldown;
pub use gate::{AccessGate, Denial};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{AccessGate, Denial, NoticeCooldown};
    pub use rankgate::prelude::*;
}
