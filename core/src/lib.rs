//! rankgate - Rank-based item/block restriction matching engine
//!
//! Given an item or block identifier and a player's ranks, decide whether a
//! configured restriction matches and which denial message to show.
//!
//! # Architecture
//!
//! Raw config strings flow left to right, classified once at load time and
//! queried many times per second afterwards:
//!
//! - [`classify`] — one raw token → [`Pattern`] (Exact / ModWildcard / Tag)
//! - [`RestrictionSet`] — preprocessed pattern collections (items + blocks)
//!   with O(1) exact/namespace lookup and an optional message
//! - [`RankRestrictions`] — ordered sets for one rank, first-match-wins
//! - [`RestrictionRegistry`] — rank map + default message + TOML load/save;
//!   the single entry point for the surrounding system
//!
//! # Key Design Invariants
//!
//! 1. **Fail open**: unknown ranks, an `Unloaded` registry, and unavailable
//!    collaborators all evaluate to "not restricted". The query path never
//!    returns an error and never blocks on I/O.
//!
//! 2. **Classify once, match cheap**: pattern strings compile into hash-set
//!    indices at config load; per-check work is two O(1) lookups plus an
//!    O(k) tag scan.
//!
//! 3. **Degrade gracefully**: a malformed pattern drops that pattern; a
//!    malformed rank entry skips that rank; a failed load leaves previous
//!    state intact.
//!
//! # Example
//!
//! ```
//! use rankgate::{Ident, NoTags, RestrictionRegistry, TargetKind};
//!
//! let registry = RestrictionRegistry::new();
//! registry
//!     .load_str(
//!         r##"
//! [messages]
//! default_restriction = "&cYou cannot use %item%!"
//!
//! [restrictions.member]
//! [[restrictions.member.restriction_sets]]
//! items = ["minecraft:diamond_sword", "#forge:tools", "mekanism:*"]
//! message = "&cNo high-tier gear for members!"
//! "##,
//!     )
//!     .unwrap();
//!
//! let sword: Ident = "minecraft:diamond_sword".parse().unwrap();
//! assert!(registry.is_restricted("member", &sword, TargetKind::Item, &NoTags));
//! assert!(!registry.is_restricted("guest", &sword, TargetKind::Item, &NoTags));
//! ```
//!
//! # Extensions
//!
//! Host-facing functionality lives in separate crates:
//!
//! - [`rankgate-host`](https://docs.rs/rankgate-host) — multi-rank access
//!   gate and denial-notice cooldown for event handlers
//! - [`rankgate-test`](https://docs.rs/rankgate-test) — fixture
//!   collaborators for conformance testing (internal)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod ident;
mod pattern;
mod provider;
mod rank;
mod registry;
mod set;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use ident::{Ident, IdentError, DEFAULT_NAMESPACE};
pub use pattern::{classify, split_tokens, Pattern, PatternError};
pub use rank::RankRestrictions;
pub use registry::{AdminError, RestrictionRegistry};
pub use set::{RestrictionSet, TargetKind};

// Config surface
pub use config::{ConfigError, LoadReport, DEFAULT_MESSAGE, MESSAGE_PLACEHOLDER};

// Collaborator seams
pub use provider::{
    DisplayResolver, NoTags, PlainNames, RankHandle, RankProvider, TagOracle,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use rankgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        classify,
        // Errors
        AdminError,
        ConfigError,
        // Collaborator seams
        DisplayResolver,
        // Core types
        Ident,
        IdentError,
        LoadReport,
        NoTags,
        Pattern,
        PatternError,
        PlainNames,
        RankHandle,
        RankProvider,
        RankRestrictions,
        RestrictionRegistry,
        RestrictionSet,
        TagOracle,
        TargetKind,
    };
}
