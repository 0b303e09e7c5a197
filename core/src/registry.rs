//! `RestrictionRegistry` — Top-level restriction state and query API
//!
//! The registry maps rank identifiers to their [`RankRestrictions`] and owns
//! the process-wide default denial message. There is one live instance per
//! running process by construction: it is created at startup and handed by
//! reference to every consumer — no global, no singleton machinery.
//!
//! # Concurrency
//!
//! Event dispatch may call the query API from more than one thread, so the
//! interior state sits behind a [`parking_lot::RwLock`]. Reads (per-action
//! checks) are frequent and latency-sensitive; writes (reload, discovery,
//! admin edits) are rare. No query performs I/O or blocks indefinitely.
//!
//! # Loaded state
//!
//! The registry starts `Unloaded` and flips to `Loaded` on the first
//! successful load of an existing document; it never reverts. While
//! `Unloaded` every lookup returns the permissive default (not restricted),
//! so the surrounding system fails open rather than blocking all actions
//! before configuration is ready.

use crate::config::{self, ConfigError, LoadReport, DEFAULT_MESSAGE, MESSAGE_PLACEHOLDER};
use crate::ident::Ident;
use crate::provider::{DisplayResolver, RankProvider, TagOracle};
use crate::rank::RankRestrictions;
use crate::set::{RestrictionSet, TargetKind};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Errors from operator-facing edit operations.
///
/// These are reported back to the operator; the registry state is unchanged
/// whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// The rank is not present in the registry.
    #[error("rank \"{rank}\" has no restriction data")]
    UnknownRank {
        /// The requested rank id.
        rank: String,
    },

    /// A set index beyond the rank's set list.
    #[error("set index {index} is out of range for rank \"{rank}\" ({len} sets)")]
    IndexOutOfRange {
        /// The requested rank id.
        rank: String,
        /// The requested index.
        index: usize,
        /// The rank's current set count.
        len: usize,
    },
}

#[derive(Debug)]
struct Inner {
    /// Rank id → restriction data. Insertion order is preserved so saved
    /// documents are deterministic.
    ranks: IndexMap<String, RankRestrictions>,
    default_message: String,
    loaded: bool,
}

/// The restriction engine's top-level state.
///
/// # Example
///
/// ```
/// use rankgate::{Ident, NoTags, RestrictionRegistry, TargetKind};
///
/// let registry = RestrictionRegistry::new();
/// registry
///     .load_str(
///         r#"
/// [restrictions.member]
/// [[restrictions.member.restriction_sets]]
/// items = ["minecraft:diamond_sword"]
/// "#,
///     )
///     .unwrap();
///
/// let sword: Ident = "minecraft:diamond_sword".parse().unwrap();
/// assert!(registry.is_restricted("member", &sword, TargetKind::Item, &NoTags));
/// assert!(!registry.is_restricted("guest", &sword, TargetKind::Item, &NoTags));
/// ```
#[derive(Debug)]
pub struct RestrictionRegistry {
    inner: RwLock<Inner>,
}

impl Default for RestrictionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RestrictionRegistry {
    /// Create an empty, `Unloaded` registry with the built-in default
    /// message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                ranks: IndexMap::new(),
                default_message: DEFAULT_MESSAGE.to_string(),
                loaded: false,
            }),
        }
    }

    // ── Query path ───────────────────────────────────────────────────────

    /// Whether `ident` is restricted for the given rank.
    ///
    /// Unknown rank → `false` (restrictions are opt-in per rank).
    /// `Unloaded` registry → `false` (fail open).
    pub fn is_restricted(
        &self,
        rank_id: &str,
        ident: &Ident,
        kind: TargetKind,
        tags: &dyn TagOracle,
    ) -> bool {
        let inner = self.inner.read();
        inner.loaded
            && inner
                .ranks
                .get(rank_id)
                .is_some_and(|data| data.is_restricted(ident, kind, tags))
    }

    /// The first of `rank_ids`, in the order given, with any matching set.
    ///
    /// Callers pass a player's ranks in provider order, which makes this the
    /// multi-rank precedence primitive: the first restricting rank decides
    /// which message the player sees.
    pub fn restricting_rank<'a, I>(
        &self,
        rank_ids: I,
        ident: &Ident,
        kind: TargetKind,
        tags: &dyn TagOracle,
    ) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let inner = self.inner.read();
        if !inner.loaded {
            return None;
        }
        rank_ids
            .into_iter()
            .find(|rank_id| {
                inner
                    .ranks
                    .get(*rank_id)
                    .is_some_and(|data| data.is_restricted(ident, kind, tags))
            })
            .map(String::from)
    }

    /// Resolve the denial message for one rank and identifier.
    ///
    /// The identifier's display text (from `names`, falling back to the
    /// `namespace:path` rendering) replaces the literal `%item%` token.
    /// Falls back to the process-wide default message exactly when the rank
    /// is unknown, no set matches, or the matching set has no message.
    pub fn resolve_message(
        &self,
        rank_id: &str,
        ident: &Ident,
        kind: TargetKind,
        tags: &dyn TagOracle,
        names: &dyn DisplayResolver,
    ) -> String {
        let display = names
            .display_name(ident, kind)
            .unwrap_or_else(|| ident.to_string());

        let inner = self.inner.read();
        if inner.loaded {
            if let Some(data) = inner.ranks.get(rank_id) {
                if let Some((_, set)) = data.find_matching_set(ident, kind, tags) {
                    if let Some(template) = set.message() {
                        return template.replace(MESSAGE_PLACEHOLDER, &display);
                    }
                }
            }
        }
        inner.default_message.replace(MESSAGE_PLACEHOLDER, &display)
    }

    // ── Introspection ────────────────────────────────────────────────────

    /// Whether a successful load has happened.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.read().loaded
    }

    /// The configured rank ids, in insertion order.
    #[must_use]
    pub fn rank_ids(&self) -> Vec<String> {
        self.inner.read().ranks.keys().cloned().collect()
    }

    /// Number of configured ranks.
    #[must_use]
    pub fn rank_count(&self) -> usize {
        self.inner.read().ranks.len()
    }

    /// Whether the rank is configured (even with zero sets).
    #[must_use]
    pub fn contains_rank(&self, rank_id: &str) -> bool {
        self.inner.read().ranks.contains_key(rank_id)
    }

    /// A point-in-time copy of one rank's data, for display and tooling.
    #[must_use]
    pub fn snapshot_rank(&self, rank_id: &str) -> Option<RankRestrictions> {
        self.inner.read().ranks.get(rank_id).cloned()
    }

    /// The process-wide default denial message template.
    #[must_use]
    pub fn default_message(&self) -> String {
        self.inner.read().default_message.clone()
    }

    /// Replace the process-wide default denial message template.
    pub fn set_default_message(&self, message: impl Into<String>) {
        self.inner.write().default_message = message.into();
    }

    // ── Discovery & admin edits ──────────────────────────────────────────

    /// Insert an empty [`RankRestrictions`] for every provider rank not yet
    /// configured.
    ///
    /// Returns whether anything was inserted, so the caller can decide to
    /// persist. Ranks that disappear upstream are never removed here:
    /// config entries are sticky so a briefly-failing provider cannot erase
    /// an operator's rules. Idempotent for a fixed provider state.
    pub fn discover_ranks(&self, provider: &dyn RankProvider) -> bool {
        if !provider.available() {
            warn!("rank provider unavailable; skipping rank discovery");
            return false;
        }

        let mut changed = false;
        let mut inner = self.inner.write();
        for handle in provider.all_ranks() {
            if handle.id().is_empty() {
                warn!("skipping a provider rank with an empty id");
                continue;
            }
            if !inner.ranks.contains_key(handle.id()) {
                info!(rank = handle.id(), "discovered new rank; configured as unrestricted");
                inner
                    .ranks
                    .insert(handle.id().to_string(), RankRestrictions::new(handle.id()));
                changed = true;
            }
        }
        changed
    }

    /// Replace the set at `index` for a rank, or append when `index` equals
    /// the current set count. The rank is created if absent.
    ///
    /// # Errors
    ///
    /// [`AdminError::IndexOutOfRange`] when `index` is past the append
    /// position; nothing is mutated in that case.
    pub fn upsert_set(
        &self,
        rank_id: &str,
        index: usize,
        set: RestrictionSet,
    ) -> Result<(), AdminError> {
        let mut inner = self.inner.write();
        let len = inner.ranks.get(rank_id).map_or(0, RankRestrictions::len);
        if index > len {
            return Err(AdminError::IndexOutOfRange {
                rank: rank_id.to_string(),
                index,
                len,
            });
        }
        let data = inner
            .ranks
            .entry(rank_id.to_string())
            .or_insert_with(|| RankRestrictions::new(rank_id));
        if index == data.len() {
            data.push_set(set);
        } else if let Some(slot) = data.set_mut(index) {
            *slot = set;
        }
        info!(rank = rank_id, index, "updated restriction set");
        Ok(())
    }

    /// Remove the set at `index` from a rank.
    ///
    /// # Errors
    ///
    /// [`AdminError::UnknownRank`] or [`AdminError::IndexOutOfRange`];
    /// nothing is mutated in either case.
    pub fn remove_set(&self, rank_id: &str, index: usize) -> Result<(), AdminError> {
        let mut inner = self.inner.write();
        let Some(data) = inner.ranks.get_mut(rank_id) else {
            return Err(AdminError::UnknownRank {
                rank: rank_id.to_string(),
            });
        };
        let len = data.len();
        if data.remove_set(index) {
            Ok(())
        } else {
            Err(AdminError::IndexOutOfRange {
                rank: rank_id.to_string(),
                index,
                len,
            })
        }
    }

    // ── Load & save ──────────────────────────────────────────────────────

    /// Load (merge) a document from a string.
    ///
    /// The document is parsed completely before any state is touched, so a
    /// syntax error leaves the previous state intact. Ranks present in the
    /// document replace their set lists; ranks only known in memory are
    /// kept. Flips the registry to `Loaded` on success.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on invalid TOML.
    pub fn load_str(&self, text: &str) -> Result<LoadReport, ConfigError> {
        let doc = config::parse_document(text)?;

        let mut inner = self.inner.write();
        if let Some(message) = doc.default_message {
            inner.default_message = message;
        }
        for (rank_id, sets) in doc.ranks {
            let data = inner
                .ranks
                .entry(rank_id.clone())
                .or_insert_with(|| RankRestrictions::new(rank_id));
            data.clear();
            for set in sets {
                data.push_set(set);
            }
        }
        inner.loaded = true;
        info!(ranks = inner.ranks.len(), skipped = doc.skipped, "loaded restriction config");
        Ok(LoadReport {
            loaded: true,
            ranks: inner.ranks.len(),
            skipped: doc.skipped,
        })
    }

    /// Load (merge) the document at `path`.
    ///
    /// A missing file is not an error: there is nothing to load yet, the
    /// registry stays `Unloaded`, and the file will be created on the next
    /// save.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`]; in-memory state is
    /// unchanged on failure.
    pub fn load_path(&self, path: &Path) -> Result<LoadReport, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file to load yet");
            return Ok(LoadReport {
                loaded: false,
                ranks: self.rank_count(),
                skipped: 0,
            });
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&text)
    }

    /// Render the current state as a TOML document (no header).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Render`] if serialization fails.
    pub fn render(&self) -> Result<String, ConfigError> {
        let inner = self.inner.read();
        config::render_document(&inner.ranks, &inner.default_message)
    }

    /// Write the current state to `path`.
    ///
    /// On first creation (missing or empty file) the static documentation
    /// header is written above the data. On later saves the file's existing
    /// leading comment block is kept and only the data below it is
    /// rewritten.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Render`] or [`ConfigError::Write`]; in-memory state is
    /// never affected.
    pub fn save_path(&self, path: &Path) -> Result<(), ConfigError> {
        let body = self.render()?;

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let header = match fs::read_to_string(path) {
            Ok(existing) if !existing.trim().is_empty() => leading_comment_block(&existing),
            _ => Some(config::FILE_HEADER.to_string()),
        };
        let content = match header {
            Some(header) => format!("{header}\n{body}"),
            None => body,
        };
        fs::write(path, content).map_err(write_err)?;
        info!(path = %path.display(), ranks = self.rank_count(), "saved restriction config");
        Ok(())
    }

    /// Operator reload: re-read the document at `path`, re-discover ranks
    /// from the provider, and persist if discovery added any.
    ///
    /// Returns the load report with the final rank count.
    ///
    /// # Errors
    ///
    /// Propagates load/save failures; a failed load leaves prior state
    /// intact.
    pub fn reload(
        &self,
        path: &Path,
        provider: &dyn RankProvider,
    ) -> Result<LoadReport, ConfigError> {
        let report = self.load_path(path)?;
        if self.discover_ranks(provider) {
            self.save_path(path)?;
        }
        Ok(LoadReport {
            ranks: self.rank_count(),
            ..report
        })
    }
}

/// The contiguous run of comment/blank lines at the top of an existing file.
fn leading_comment_block(text: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || trimmed.is_empty() {
            lines.push(line);
        } else {
            break;
        }
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
