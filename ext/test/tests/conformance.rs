//! Matching-semantics conformance suite
//!
//! Exercises the documented engine properties end to end through the public
//! API: pattern kinds, oracle dynamism, multi-set precedence, message
//! fallback, and the per-player gate.

use rankgate_host::{AccessGate, NoticeCooldown};
use rankgate_test::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn ident(s: &str) -> Ident {
    s.parse().unwrap()
}

fn registry_from(text: &str) -> RestrictionRegistry {
    let registry = RestrictionRegistry::new();
    registry.load_str(text).unwrap();
    registry
}

// ── Pattern kinds ────────────────────────────────────────────────────────

#[test]
fn exact_pattern_matches_only_its_identifier() {
    let registry = registry_from(
        r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:diamond_sword"]
"#,
    );

    assert!(registry.is_restricted(
        "member",
        &ident("minecraft:diamond_sword"),
        TargetKind::Item,
        &NoTags
    ));
    for other in ["minecraft:diamond_axe", "minecraft:dirt", "othermod:diamond_sword"] {
        assert!(
            !registry.is_restricted("member", &ident(other), TargetKind::Item, &NoTags),
            "{other} must not match an exact pattern for a different id"
        );
    }
}

#[test]
fn wildcard_pattern_matches_any_path_in_namespace() {
    let registry = registry_from(
        r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["mekanism:*"]
"#,
    );

    for path in ["digital_miner", "jetpack", "atomic_disassembler"] {
        assert!(registry.is_restricted(
            "member",
            &ident(&format!("mekanism:{path}")),
            TargetKind::Item,
            &NoTags
        ));
    }
    assert!(!registry.is_restricted("member", &ident("thermal:dynamo"), TargetKind::Item, &NoTags));
}

#[test]
fn tag_pattern_tracks_oracle_state() {
    let registry = registry_from(
        r##"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["#forge:tools"]
"##,
    );
    let sword = ident("minecraft:diamond_sword");

    // Empty oracle: nothing matches.
    assert!(!registry.is_restricted("member", &sword, TargetKind::Item, &TagTable::new()));

    // Populated oracle: the same registry (no reload, no reclassification)
    // now restricts.
    let tags = TagTable::new().tag(TargetKind::Item, "forge:tools", "minecraft:diamond_sword");
    assert!(registry.is_restricted("member", &sword, TargetKind::Item, &tags));
}

#[test]
fn comma_separated_entry_contributes_independent_patterns() {
    let registry = registry_from(
        r##"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["#forge:chests,minecraft:tnt,mekanism:*"]
"##,
    );
    let tags = TagTable::new().tag(TargetKind::Item, "forge:chests", "ironchest:iron_chest");

    assert!(registry.is_restricted("member", &ident("minecraft:tnt"), TargetKind::Item, &tags));
    assert!(registry.is_restricted("member", &ident("mekanism:jetpack"), TargetKind::Item, &tags));
    assert!(registry.is_restricted("member", &ident("ironchest:iron_chest"), TargetKind::Item, &tags));
    assert!(!registry.is_restricted("member", &ident("minecraft:dirt"), TargetKind::Item, &tags));
}

#[test]
fn item_and_block_collections_stay_separate() {
    let registry = registry_from(
        r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:diamond_sword"]
blocks = ["minecraft:furnace", "tconstruct:*"]
"#,
    );

    assert!(registry.is_restricted("member", &ident("minecraft:furnace"), TargetKind::Block, &NoTags));
    assert!(!registry.is_restricted("member", &ident("minecraft:furnace"), TargetKind::Item, &NoTags));
    assert!(registry.is_restricted(
        "member",
        &ident("tconstruct:smeltery_controller"),
        TargetKind::Block,
        &NoTags
    ));
    assert!(!registry.is_restricted(
        "member",
        &ident("minecraft:diamond_sword"),
        TargetKind::Block,
        &NoTags
    ));
}

// ── Multi-set precedence & messages ──────────────────────────────────────

#[test]
fn first_matching_set_supplies_the_message() {
    let registry = registry_from(
        r#"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]
message = "from the first set"

[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt", "minecraft:bedrock"]
message = "from the second set"
"#,
    );

    let message = registry.resolve_message(
        "member",
        &ident("minecraft:tnt"),
        TargetKind::Item,
        &NoTags,
        &PlainNames,
    );
    assert_eq!(message, "from the first set");

    // An identifier only the second set covers gets the second message.
    let message = registry.resolve_message(
        "member",
        &ident("minecraft:bedrock"),
        TargetKind::Item,
        &NoTags,
        &PlainNames,
    );
    assert_eq!(message, "from the second set");
}

#[test]
fn default_message_fallback_conditions() {
    let registry = registry_from(
        r#"
[messages]
default_restriction = "&cBlocked: %item%!"

[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]

[[restrictions.member.restriction_sets]]
items = ["minecraft:bedrock"]
message = "&cBedrock stays put!"
"#,
    );

    // Matching set without a message → default.
    assert_eq!(
        registry.resolve_message("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags, &PlainNames),
        "&cBlocked: minecraft:tnt!"
    );
    // Unknown rank → default.
    assert_eq!(
        registry.resolve_message("guest", &ident("minecraft:tnt"), TargetKind::Item, &NoTags, &PlainNames),
        "&cBlocked: minecraft:tnt!"
    );
    // Known rank, no matching set → default.
    assert_eq!(
        registry.resolve_message("member", &ident("minecraft:dirt"), TargetKind::Item, &NoTags, &PlainNames),
        "&cBlocked: minecraft:dirt!"
    );
    // Matching set with a message → that message.
    assert_eq!(
        registry.resolve_message("member", &ident("minecraft:bedrock"), TargetKind::Item, &NoTags, &PlainNames),
        "&cBedrock stays put!"
    );
}

#[test]
fn placeholder_substitutes_display_name_when_known() {
    let registry = registry_from(
        r#"
[messages]
default_restriction = "&cBlocked: %item%!"

[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt"]
"#,
    );
    let names = NameTable::new().name(TargetKind::Item, "minecraft:tnt", "TNT");

    assert_eq!(
        registry.resolve_message("member", &ident("minecraft:tnt"), TargetKind::Item, &NoTags, &names),
        "&cBlocked: TNT!"
    );
}

// ── The documented example scenario ──────────────────────────────────────

#[test]
fn member_guest_scenario() {
    let registry = registry_from(
        r##"
[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:diamond_sword", "#forge:tools"]
message = "&cNo swords!"
"##,
    );
    let sword = ident("minecraft:diamond_sword");

    assert!(registry.is_restricted("member", &sword, TargetKind::Item, &NoTags));
    assert!(!registry.is_restricted("member", &ident("minecraft:dirt"), TargetKind::Item, &NoTags));
    // Unknown rank is permissive.
    assert!(!registry.is_restricted("guest", &sword, TargetKind::Item, &NoTags));
}

// ── Discovery ────────────────────────────────────────────────────────────

#[test]
fn discovery_is_idempotent() {
    let registry = RestrictionRegistry::new();
    let provider = StaticRanks::new().rank("member", "Member").rank("vip", "VIP");

    assert!(registry.discover_ranks(&provider));
    let after_first = registry.rank_ids();

    assert!(!registry.discover_ranks(&provider));
    assert_eq!(registry.rank_ids(), after_first);
}

#[test]
fn discovery_treats_offline_provider_as_empty() {
    let registry = RestrictionRegistry::new();
    assert!(!registry.discover_ranks(&StaticRanks::new().rank("member", "Member").offline()));
    assert_eq!(registry.rank_count(), 0);
}

// ── Per-player gate ──────────────────────────────────────────────────────

fn gate_fixture() -> AccessGate {
    let registry = Arc::new(registry_from(
        r##"
[messages]
default_restriction = "&cBlocked: %item%!"

[restrictions.member]
[[restrictions.member.restriction_sets]]
items = ["minecraft:tnt", "#forge:tools"]
message = "&cMembers cannot use %item%!"
"##,
    ));
    let ranks = StaticRanks::new()
        .rank("member", "Member")
        .rank("builder", "Builder")
        .assign("alice", "member")
        .assign("bob", "builder");
    let tags = TagTable::new().tag(TargetKind::Item, "forge:tools", "minecraft:diamond_sword");
    let names = NameTable::new().name(TargetKind::Item, "minecraft:tnt", "TNT");

    AccessGate::new(registry, Arc::new(ranks), Arc::new(tags), Arc::new(names))
}

#[test]
fn gate_denies_restricted_player_with_resolved_message() {
    let gate = gate_fixture();
    let denial = gate.check("alice", &ident("minecraft:tnt"), TargetKind::Item).unwrap();
    assert_eq!(denial.rank_id, "member");
    assert_eq!(denial.message, "&cMembers cannot use TNT!");

    // Tag-driven restriction flows through the same path.
    let denial = gate
        .check("alice", &ident("minecraft:diamond_sword"), TargetKind::Item)
        .unwrap();
    assert_eq!(denial.rank_id, "member");
}

#[test]
fn gate_allows_unrestricted_rank_and_unknown_player() {
    let gate = gate_fixture();
    assert!(gate.check("bob", &ident("minecraft:tnt"), TargetKind::Item).is_none());
    assert!(gate.check("stranger", &ident("minecraft:tnt"), TargetKind::Item).is_none());
}

#[test]
fn gate_with_cooldown_suppresses_repeat_notices() {
    let gate = gate_fixture();
    let cooldown: NoticeCooldown<(&str, u64)> = NoticeCooldown::new(Duration::from_secs(60));
    let tnt = ident("minecraft:tnt");

    let mut notices = 0;
    for _ in 0..5 {
        if gate.check("alice", &tnt, TargetKind::Item).is_some()
            && cooldown.should_notify(("alice", 42))
        {
            notices += 1;
        }
    }
    assert_eq!(notices, 1);
}
