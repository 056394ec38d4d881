//! capdev demo CLI
//!
//! Computes the action list for one entity snapshot, evaluates a single
//! permission fact, or validates a policy file.
//!
//! Usage:
//!   cargo run -p demo -- actions --entity Offer --context DETAIL \
//!       --snapshot offer.json --principal me.json
//!   cargo run -p demo -- fact --name can_accept --snapshot offer.json --principal me.json
//!   cargo run -p demo -- check-policy --policy crates/capdev-marketplace/policies/marketplace.toml

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use capdev_contracts::{
    action::ActionContext,
    entity::{EntitySnapshot, EntityType},
    error::{ActionError, ActionResult},
    principal::Principal,
};
use capdev_core::ActionEngine;
use capdev_marketplace::{default_engine, engine_from_file, MarketplaceEvaluator};
use capdev_policy::TomlAllowList;
use capdev_verify::engine::ContractVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// capdev: capability-driven actions for the marketplace.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "capdev marketplace action engine demo",
    long_about = "Computes server-authoritative action descriptors for marketplace\n\
                  entities and prints them in the wire format clients consume."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the action list for a snapshot and principal.
    Actions {
        /// Entity type: Request, Offer, Document or User.
        #[arg(long)]
        entity: EntityType,
        /// Rendering context: LIST, DETAIL, ADMIN or USER.
        #[arg(long)]
        context: ActionContext,
        /// Path to the entity snapshot JSON.
        #[arg(long)]
        snapshot: PathBuf,
        /// Path to the principal JSON.
        #[arg(long)]
        principal: PathBuf,
        /// Policy TOML. Defaults to the shipped marketplace policy.
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Also print the deprecated `can_*` boolean map.
        #[arg(long)]
        legacy: bool,
    },
    /// Evaluate one named permission fact.
    Fact {
        /// Fact name, e.g. `can_accept`.
        #[arg(long)]
        name: String,
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        principal: PathBuf,
    },
    /// Parse a policy file and report its contents.
    CheckPolicy {
        #[arg(long)]
        policy: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows engine decisions, including stripped actions.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Actions {
            entity,
            context,
            snapshot,
            principal,
            policy,
            legacy,
        } => run_actions(entity, context, &snapshot, &principal, policy.as_deref(), legacy),
        Command::Fact {
            name,
            snapshot,
            principal,
        } => run_fact(&name, &snapshot, &principal),
        Command::CheckPolicy { policy } => run_check_policy(&policy),
    };

    if let Err(e) = result {
        eprintln!("demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_actions(
    entity: EntityType,
    context: ActionContext,
    snapshot: &Path,
    principal: &Path,
    policy: Option<&Path>,
    legacy: bool,
) -> ActionResult<()> {
    let engine: ActionEngine = match policy {
        Some(path) => engine_from_file(path)?,
        None => default_engine()?,
    };
    let snapshot: EntitySnapshot = read_json(snapshot, "snapshot")?;
    let principal: Principal = read_json(principal, "principal")?;

    let actions = engine.compute_actions(entity, &snapshot, &principal, context)?;
    debug!(count = actions.len(), "actions computed");

    let wire = ContractVerifier::new()?.ensure(&actions)?;
    println!("{}", to_pretty(&wire)?);

    if legacy {
        #[allow(deprecated)]
        let flags = capdev_core::legacy_flags(&actions);
        println!("{}", to_pretty(&flags)?);
    }
    Ok(())
}

fn run_fact(name: &str, snapshot: &Path, principal: &Path) -> ActionResult<()> {
    let snapshot: EntitySnapshot = read_json(snapshot, "snapshot")?;
    let principal: Principal = read_json(principal, "principal")?;

    let value = MarketplaceEvaluator.evaluate_named(name, &principal, &snapshot)?;
    println!("{} = {}", name, value);
    Ok(())
}

fn run_check_policy(path: &Path) -> ActionResult<()> {
    let policy = TomlAllowList::from_file(path)?;

    println!("policy '{}' is valid (mode: {:?})", path.display(), policy.mode());
    for entity in EntityType::ALL {
        for context in ActionContext::ALL {
            let allowed = policy.allowed(entity, context);
            if allowed.is_empty() {
                continue;
            }
            let keys: Vec<&str> = allowed.iter().map(|k| k.as_str()).collect();
            println!("  {:<8} {:<6} {}", entity.as_str(), context.as_str(), keys.join(", "));
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> ActionResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| ActionError::ConfigError {
        reason: format!("failed to read {} file '{}': {}", what, path.display(), e),
    })?;
    serde_json::from_str(&raw).map_err(|e| ActionError::ConfigError {
        reason: format!("failed to parse {} JSON: {}", what, e),
    })
}

fn to_pretty<T: serde::Serialize>(value: &T) -> ActionResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ActionError::ContractViolation {
        reason: format!("failed to serialize output: {}", e),
    })
}
