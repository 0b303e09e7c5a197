//! rankgate CLI — operator tooling for the restriction engine.
//!
//! Subcommands:
//! - `check <config>` — load and validate, report configured rank count
//! - `query <config> <rank> <ident> [--block] [--tag tag=member,...]` —
//!   evaluate one identifier against one rank
//! - `ranks <config>` — list configured ranks and their set counts
//! - `init <config>` — create a fresh, documented config file

use std::path::Path;
use std::process;

use rankgate::prelude::*;
use rankgate_test::TagTable;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => cmd_check(&args[2..]),
        "query" => cmd_query(&args[2..]),
        "ranks" => cmd_ranks(&args[2..]),
        "init" => cmd_init(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(args: &[String]) -> Result<(), String> {
    let [config_path] = args else {
        return Err("check requires exactly one config file path".into());
    };

    let registry = RestrictionRegistry::new();
    let report = registry
        .load_path(Path::new(config_path))
        .map_err(|e| e.to_string())?;

    if report.loaded {
        println!(
            "Config valid — {} rank(s) configured, {} entr{} skipped",
            report.ranks,
            report.skipped,
            if report.skipped == 1 { "y" } else { "ies" }
        );
    } else {
        println!("No config file at {config_path} — run `rankgate init {config_path}` to create one");
    }
    Ok(())
}

fn cmd_query(args: &[String]) -> Result<(), String> {
    if args.len() < 3 {
        return Err("query requires <config> <rank> <ident>".into());
    }
    let config_path = &args[0];
    let rank_id = &args[1];
    let ident: Ident = args[2]
        .parse()
        .map_err(|e: IdentError| format!("bad identifier \"{}\": {e}", args[2]))?;

    let (kind, tags) = parse_query_flags(&args[3..])?;

    let registry = load_registry(config_path)?;
    if !registry.is_loaded() {
        return Err(format!("no config file at {config_path}"));
    }

    if registry.is_restricted(rank_id, &ident, kind, &tags) {
        let message = registry.resolve_message(rank_id, &ident, kind, &tags, &PlainNames);
        println!("RESTRICTED ({kind} {ident} for rank {rank_id})");
        println!("message: {message}");
    } else {
        println!("allowed ({kind} {ident} for rank {rank_id})");
    }
    Ok(())
}

fn cmd_ranks(args: &[String]) -> Result<(), String> {
    let [config_path] = args else {
        return Err("ranks requires exactly one config file path".into());
    };

    let registry = load_registry(config_path)?;
    if !registry.is_loaded() {
        return Err(format!("no config file at {config_path}"));
    }

    let rank_ids = registry.rank_ids();
    if rank_ids.is_empty() {
        println!("No ranks configured");
        return Ok(());
    }
    println!("Configured ranks:");
    for rank_id in rank_ids {
        let sets = registry.snapshot_rank(&rank_id).map_or(0, |data| data.len());
        println!("  {rank_id} — {sets} restriction set(s)");
    }
    Ok(())
}

fn cmd_init(args: &[String]) -> Result<(), String> {
    let [config_path] = args else {
        return Err("init requires exactly one config file path".into());
    };
    let path = Path::new(config_path);
    if path.exists() {
        return Err(format!("{config_path} already exists; refusing to overwrite"));
    }

    RestrictionRegistry::new()
        .save_path(path)
        .map_err(|e| e.to_string())?;
    println!("Created {config_path}");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn load_registry(config_path: &str) -> Result<RestrictionRegistry, String> {
    let registry = RestrictionRegistry::new();
    registry
        .load_path(Path::new(config_path))
        .map_err(|e| e.to_string())?;
    Ok(registry)
}

/// Parse trailing `query` flags: `--block` and repeatable
/// `--tag tag_id=member[,member...]` (applied to both kinds).
fn parse_query_flags(args: &[String]) -> Result<(TargetKind, TagTable), String> {
    let mut kind = TargetKind::Item;
    let mut tags = TagTable::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--block" => kind = TargetKind::Block,
            "--tag" => {
                let pair = iter
                    .next()
                    .ok_or_else(|| "--tag requires tag_id=member[,member...]".to_string())?;
                let (tag_id, members) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("bad --tag value \"{pair}\" (expected tag_id=member)"))?;
                for member in members.split(',').map(str::trim).filter(|m| !m.is_empty()) {
                    tags = tags
                        .tag(TargetKind::Item, tag_id, member)
                        .tag(TargetKind::Block, tag_id, member);
                }
            }
            other => return Err(format!("unknown flag \"{other}\"")),
        }
    }
    Ok((kind, tags))
}

fn print_usage() {
    eprintln!(
        "rankgate — rank-based item/block restriction engine

Usage:
  rankgate check <config>
  rankgate query <config> <rank> <ident> [--block] [--tag tag_id=member,...]
  rankgate ranks <config>
  rankgate init <config>

Examples:
  rankgate init restrictions.toml
  rankgate check restrictions.toml
  rankgate query restrictions.toml member minecraft:diamond_sword
  rankgate query restrictions.toml member minecraft:furnace --block
  rankgate query restrictions.toml member minecraft:diamond_sword \\
      --tag forge:tools=minecraft:diamond_sword"
    );
}
