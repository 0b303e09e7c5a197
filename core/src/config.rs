//! Persisted configuration — TOML document parsing and rendering
//!
//! The on-disk format, current shape:
//!
//! ```toml
//! [messages]
//! default_restriction = "&cYou are not allowed to use %item%!"
//!
//! [restrictions.member]
//! [[restrictions.member.restriction_sets]]
//! items = ["minecraft:diamond_sword", "#forge:tools"]
//! blocks = ["mekanism:*"]
//! message = "&cNot with your rank!"
//! ```
//!
//! A legacy shape is accepted on read — `restrictions = [...]` (or
//! `items = [...]`) plus `messageForRestrictionSet` directly under the rank
//! table — and normalized into a single restriction set.
//!
//! Parsing degrades gracefully: a rank entry with the wrong shape is skipped
//! with a warning and counted, never aborting the rest of the document.
//! Rendering always emits the current shape, rank entries in insertion order.

use crate::rank::RankRestrictions;
use crate::set::RestrictionSet;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use toml::Value;
use tracing::{debug, warn};

/// Placeholder token replaced with the identifier's display text in message
/// templates. Literal text replacement, not a templating language.
pub const MESSAGE_PLACEHOLDER: &str = "%item%";

/// Default process-wide denial message used until configuration overrides it.
pub const DEFAULT_MESSAGE: &str = "&cYou are not allowed to use %item% with your current rank!";

/// Documentation block written once when the config file is first created.
///
/// Operators edit the file by hand; the header explains the grammar so the
/// file is self-describing. It is never rewritten on later saves.
pub(crate) const FILE_HEADER: &str = "\
# Rank restrictions configuration
#
# Items and blocks can be restricted per rank. Each restriction entry must be
# a quoted string; multiple entries go in a [ ] array. One entry may hold
# several comma-separated patterns.
#
# Pattern types, valid in both 'items' and 'blocks' lists:
#   1. Exact id:      \"minecraft:diamond_sword\"
#   2. Mod wildcard:  \"mod_id:*\"            (everything from that mod)
#   3. Tag:           \"#namespace:tag_path\" (e.g. \"#minecraft:beds\")
#
# A rank may carry several restriction sets; the first set matching an
# identifier supplies the denial message. A set without a message falls back
# to messages.default_restriction. %item% is replaced with the item's name.
#
# Example:
# [restrictions.member]
#   [[restrictions.member.restriction_sets]]
#     items = [\"minecraft:diamond_sword\", \"#forge:tools\"]
#     blocks = [\"mekanism:*\"]
#     message = \"&cYou cannot use %item% yet!\"
";

/// Errors from reading, parsing, or writing the persisted configuration.
///
/// Any of these leaves the in-memory registry untouched: documents are fully
/// parsed before state is committed, and write failures happen after
/// rendering.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file (or its parent directory) could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid TOML.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory state could not be rendered to TOML.
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Outcome of a load operation, for operator-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether a document was actually read (false: no file to load yet).
    pub loaded: bool,
    /// Ranks configured after the load.
    pub ranks: usize,
    /// Rank entries skipped because they had the wrong shape.
    pub skipped: usize,
}

/// A fully parsed document, not yet committed to any registry.
#[derive(Debug, Default)]
pub(crate) struct ParsedDocument {
    pub(crate) default_message: Option<String>,
    pub(crate) ranks: Vec<(String, Vec<RestrictionSet>)>,
    pub(crate) skipped: usize,
}

/// Parse the persisted document.
///
/// Syntax errors fail the whole parse; shape anomalies below the top level
/// are skipped per entry with warnings.
pub(crate) fn parse_document(text: &str) -> Result<ParsedDocument, ConfigError> {
    let table: toml::Table = toml::from_str(text)?;
    let mut doc = ParsedDocument::default();

    if let Some(messages) = table.get("messages").and_then(Value::as_table) {
        if let Some(message) = messages.get("default_restriction").and_then(Value::as_str) {
            doc.default_message = Some(message.to_string());
        }
    }

    let Some(restrictions) = table.get("restrictions") else {
        debug!("no [restrictions] table in config");
        return Ok(doc);
    };
    let Some(restrictions) = restrictions.as_table() else {
        warn!("'restrictions' entry is not a table; ignoring it");
        return Ok(doc);
    };

    for (rank_id, entry) in restrictions {
        let Some(rank_table) = entry.as_table() else {
            warn!(rank = %rank_id, "skipping rank entry: expected a table");
            doc.skipped += 1;
            continue;
        };
        let sets = parse_rank_entry(rank_id, rank_table);
        doc.ranks.push((rank_id.clone(), sets));
    }

    Ok(doc)
}

/// Parse one rank table into its restriction sets.
///
/// Prefers the current `restriction_sets` array-of-tables shape; falls back
/// to the legacy flat-list shape when it is absent.
fn parse_rank_entry(rank_id: &str, rank_table: &toml::Table) -> Vec<RestrictionSet> {
    let mut sets = Vec::new();

    if let Some(raw_sets) = rank_table.get("restriction_sets") {
        let Some(raw_sets) = raw_sets.as_array() else {
            warn!(rank = %rank_id, "'restriction_sets' is not an array; treating rank as unrestricted");
            return sets;
        };
        for raw_set in raw_sets {
            let Some(set_table) = raw_set.as_table() else {
                warn!(rank = %rank_id, "skipping restriction set: expected a table");
                continue;
            };
            let items = string_list(rank_id, set_table, "items");
            let blocks = string_list(rank_id, set_table, "blocks");
            let message = set_table
                .get("message")
                .and_then(Value::as_str)
                .map(String::from);
            if items.is_empty() && blocks.is_empty() {
                debug!(rank = %rank_id, "ignoring restriction set with no patterns");
                continue;
            }
            sets.push(RestrictionSet::new(items, blocks, message));
        }
        return sets;
    }

    // Legacy shape: one flat pattern list under "restrictions" (older files
    // used "items") plus an optional "messageForRestrictionSet".
    let mut legacy = string_list(rank_id, rank_table, "restrictions");
    if legacy.is_empty() {
        legacy = string_list(rank_id, rank_table, "items");
    }
    let message = rank_table
        .get("messageForRestrictionSet")
        .and_then(Value::as_str)
        .map(String::from);
    if !legacy.is_empty() {
        debug!(rank = %rank_id, "normalized legacy restriction list into one set");
        sets.push(RestrictionSet::new(legacy, Vec::new(), message));
    }
    sets
}

/// Read an array of strings from a table, tolerating absence.
///
/// Non-string elements are dropped with a warning rather than failing the
/// surrounding set.
fn string_list(rank_id: &str, table: &toml::Table, key: &str) -> Vec<String> {
    let Some(value) = table.get(key) else {
        return Vec::new();
    };
    let Some(array) = value.as_array() else {
        warn!(rank = %rank_id, key, "expected an array of strings");
        return Vec::new();
    };
    array
        .iter()
        .filter_map(|v| match v.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                warn!(rank = %rank_id, key, "dropping non-string entry {v}");
                None
            }
        })
        .collect()
}

// ── Rendering ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DocumentOut<'a> {
    messages: MessagesOut<'a>,
    restrictions: IndexMap<&'a str, RankOut<'a>>,
}

#[derive(Serialize)]
struct MessagesOut<'a> {
    default_restriction: &'a str,
}

#[derive(Serialize)]
struct RankOut<'a> {
    restriction_sets: Vec<SetOut<'a>>,
}

#[derive(Serialize)]
struct SetOut<'a> {
    items: &'a [String],
    blocks: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// Render the registry state in the current document shape, rank entries in
/// insertion order.
pub(crate) fn render_document(
    ranks: &IndexMap<String, RankRestrictions>,
    default_message: &str,
) -> Result<String, ConfigError> {
    let doc = DocumentOut {
        messages: MessagesOut {
            default_restriction: default_message,
        },
        restrictions: ranks
            .iter()
            .map(|(id, data)| {
                let sets = data
                    .sets()
                    .iter()
                    .map(|set| SetOut {
                        items: set.item_patterns(),
                        blocks: set.block_patterns(),
                        message: set.message(),
                    })
                    .collect();
                (
                    id.as_str(),
                    RankOut {
                        restriction_sets: sets,
                    },
                )
            })
            .collect(),
    };
    Ok(toml::to_string(&doc)?)
}
