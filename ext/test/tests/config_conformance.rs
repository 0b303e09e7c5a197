//! Config conformance suite
//!
//! Round-trip, legacy normalization, graceful degradation, and the file
//! lifecycle (header on first creation, merge-on-reload, failure isolation).

use rankgate_test::prelude::*;
use std::fs;

fn ident(s: &str) -> Ident {
    s.parse().unwrap()
}

// ── Round-trip ───────────────────────────────────────────────────────────

#[test]
fn save_load_round_trip_preserves_structure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");

    let original = RestrictionRegistry::new();
    original
        .load_str(
            r##"
[messages]
default_restriction = "&cBlocked: %item%!"

[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:diamond_sword", "#forge:tools"]
blocks = ["tconstruct:*"]
message = "&cNo swords!"

[[restrictions.member.restriction_sets]]
items = ["minecraft:rotten_flesh,minecraft:poisonous_potato"]

[restrictions.guest]
restriction_sets = []
"##,
        )
        .unwrap();
    original.save_path(&path).unwrap();

    let reloaded = RestrictionRegistry::new();
    reloaded.load_path(&path).unwrap();

    // Identical rank order, identical structural content, identical default.
    assert_eq!(reloaded.rank_ids(), original.rank_ids());
    assert_eq!(reloaded.default_message(), original.default_message());
    for rank_id in original.rank_ids() {
        assert_eq!(
            reloaded.snapshot_rank(&rank_id),
            original.snapshot_rank(&rank_id),
            "rank {rank_id} must survive the round trip structurally"
        );
    }
}

#[test]
fn round_trip_preserves_comma_entry_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");

    let original = RestrictionRegistry::new();
    original
        .load_str(
            r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt,mekanism:*"]
"#,
        )
        .unwrap();
    original.save_path(&path).unwrap();

    let reloaded = RestrictionRegistry::new();
    reloaded.load_path(&path).unwrap();
    assert!(reloaded.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags));
    assert!(reloaded.is_restricted("member", &ident("mekanism:jetpack"), TargetKind::Item, &NoTags));
}

// ── Legacy shape ─────────────────────────────────────────────────────────

#[test]
fn legacy_shape_equals_directly_built_set() {
    let legacy = RestrictionRegistry::new();
    legacy
        .load_str(
            r##"
[restrictions.member]
restrictions = ["minecraft:diamond_sword", "#forge:tools"]
messageForRestrictionSet = "&cNo swords!"
"##,
        )
        .unwrap();

    let direct = RestrictionRegistry::new();
    direct
        .upsert_set(
            "member",
            0,
            RestrictionSet::new(
                vec!["minecraft:diamond_sword".into(), "#forge:tools".into()],
                vec![],
                Some("&cNo swords!".into()),
            ),
        )
        .unwrap();

    assert_eq!(
        legacy.snapshot_rank("member"),
        direct.snapshot_rank("member")
    );
}

#[test]
fn legacy_shape_is_rewritten_in_current_shape_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");

    let registry = RestrictionRegistry::new();
    registry
        .load_str(
            r#"
[restrictions.member]
restrictions = ["minecraft:tnt"]
messageForRestrictionSet = "&cNo!"
"#,
        )
        .unwrap();
    registry.save_path(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[[restrictions.member.restriction_sets]]"));
    assert!(!text.contains("messageForRestrictionSet"));

    let reloaded = RestrictionRegistry::new();
    reloaded.load_path(&path).unwrap();
    assert_eq!(reloaded.snapshot_rank("member"), registry.snapshot_rank("member"));
}

// ── Graceful degradation ─────────────────────────────────────────────────

#[test]
fn malformed_rank_entries_are_skipped_and_counted() {
    let registry = RestrictionRegistry::new();
    let report = registry
        .load_str(
            r#"
[restrictions]
broken = 42
also_broken = "still not a table"

[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]
"#,
        )
        .unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(registry.rank_ids(), ["member"]);
    assert!(registry.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags));
}

#[test]
fn unparseable_patterns_do_not_poison_their_set() {
    let registry = RestrictionRegistry::new();
    registry
        .load_str(
            r##"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["Totally Wrong", "minecraft:tnt", "#bad:tag:id"]
"##,
        )
        .unwrap();

    assert!(registry.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags));
}

#[test]
fn syntax_error_preserves_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");

    let registry = RestrictionRegistry::new();
    registry
        .load_str(
            r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]
"#,
        )
        .unwrap();

    fs::write(&path, "[[[ not toml").unwrap();
    assert!(registry.load_path(&path).is_err());

    // Prior state intact, still loaded.
    assert!(registry.is_loaded());
    assert!(registry.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags));
}

// ── File lifecycle ───────────────────────────────────────────────────────

#[test]
fn header_written_once_and_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");
    let registry = RestrictionRegistry::new();

    registry.save_path(&path).unwrap();
    let first = fs::read_to_string(&path).unwrap();
    assert!(first.starts_with("# Rank restrictions configuration"));
    let header_count = first.matches("# Rank restrictions configuration").count();
    assert_eq!(header_count, 1);

    registry.save_path(&path).unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(
        second.matches("# Rank restrictions configuration").count(),
        1,
        "resaving must not duplicate the header"
    );
}

#[test]
fn loading_missing_file_keeps_registry_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let registry = RestrictionRegistry::new();

    let report = registry.load_path(&dir.path().join("nope.toml")).unwrap();
    assert!(!report.loaded);
    assert!(!registry.is_loaded());
    // Fail-open: nothing is restricted before the first real load.
    assert!(!registry.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags));
}

#[test]
fn reload_merges_file_and_discovers_provider_ranks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restrictions.toml");

    let seed = RestrictionRegistry::new();
    seed.load_str(
        r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]
"#,
    )
    .unwrap();
    seed.save_path(&path).unwrap();

    let registry = RestrictionRegistry::new();
    let provider = StaticRanks::new()
        .rank("member", "Member")
        .rank("vip", "VIP");
    let report = registry.reload(&path, &provider).unwrap();

    assert!(report.loaded);
    assert_eq!(report.ranks, 2);
    assert_eq!(registry.rank_ids(), ["member", "vip"]);

    // Discovery persisted the fresh rank as configured-but-unrestricted.
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[restrictions.vip]"));
    assert!(registry.snapshot_rank("vip").unwrap().is_empty());
}
