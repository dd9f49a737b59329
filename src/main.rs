use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtsplit::models::{SplitKey, ViewFlags};
use courtsplit::reconcile::{FilterProfile, Reconciler};
use courtsplit::registry::PresetRegistry;

#[derive(Parser)]
#[command(name = "courtsplit")]
#[command(about = "Filter-state reconciler for college basketball on/off analytics")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Preset pack to layer over the built-in registry
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Filter page profile: game, lineup, or matchup
    #[arg(long, default_value = "game")]
    profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize a persisted query string
    Cleanse {
        /// Query string, e.g. "team=Duke&minRank=1&onQuery=..."
        query: String,
    },

    /// Match a query string against the preset registry
    Preset {
        query: String,

        /// Roster players for the on/off shorthand (comma-separated)
        #[arg(long, default_value = "")]
        roster: String,
    },

    /// Apply a preset pair and print the resulting query string
    Apply {
        query: String,

        #[arg(long)]
        mode: String,

        #[arg(long)]
        split: String,
    },

    /// Show the request fan-out for a query string
    Plan {
        query: String,

        /// Enable the team shot chart view
        #[arg(long)]
        shot_charts: bool,

        /// Enable the per-player shot chart view
        #[arg(long)]
        player_shot_charts: bool,

        /// Enable a lineup-consuming view
        #[arg(long)]
        lineups: bool,
    },

    /// List the presets in the active registry
    Registry,
}

fn parse_profile(raw: &str) -> Result<FilterProfile> {
    match raw {
        "game" => Ok(FilterProfile::Game),
        "lineup" => Ok(FilterProfile::Lineup),
        "matchup" => Ok(FilterProfile::Matchup),
        other => anyhow::bail!("unknown profile: {} (use game, lineup, or matchup)", other),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = match &cli.presets {
        Some(path) => PresetRegistry::from_file(path)?,
        None => PresetRegistry::builtin(),
    };
    let profile = parse_profile(&cli.profile)?;
    let reconciler = Reconciler::new(profile).with_registry(registry);

    match cli.command {
        Commands::Cleanse { query } => {
            let states = reconciler.decode(&query);
            let canonical = reconciler.encode(&states);
            println!("{}", canonical);
            for (prefix, state) in &states {
                let name = if prefix.is_primary() {
                    "primary".to_string()
                } else {
                    prefix.to_string()
                };
                println!(
                    "  [{}] hash: {}",
                    name,
                    courtsplit::reconcile::canonical_hash(&state.to_params())
                );
            }
        }
        Commands::Preset { query, roster } => {
            let roster: Vec<String> = roster
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();

            for (prefix, state) in reconciler.decode(&query) {
                let m = reconciler.match_presets(&state, &roster);
                let name = if prefix.is_primary() {
                    "primary".to_string()
                } else {
                    prefix.to_string()
                };
                match m.usable() {
                    Some((mode, split)) => {
                        println!("[{}] mode: {}", name, mode);
                        println!("[{}] split: {}", name, split);
                    }
                    None => {
                        println!("[{}] no preset pair expresses this state", name);
                        println!("[{}]   mode:  {:?}", name, m.mode);
                        println!("[{}]   split: {:?}", name, m.split);
                    }
                }
            }
        }
        Commands::Apply { query, mode, split } => {
            let split_key = match split.strip_prefix("player-on-off:") {
                Some(player) => SplitKey::PlayerOnOff(player.to_string()),
                None => SplitKey::Named(split.clone()),
            };

            let mut states = reconciler.decode(&query);
            for (_, state) in states.iter_mut() {
                match reconciler.apply_presets(state, &mode, &split_key) {
                    Some(applied) => *state = applied,
                    None => anyhow::bail!("unknown preset pair: {} / {}", mode, split),
                }
            }
            println!("{}", reconciler.encode(&states));
        }
        Commands::Plan {
            query,
            shot_charts,
            player_shot_charts,
            lineups,
        } => {
            let flags = ViewFlags {
                shot_charts,
                player_shot_charts,
                rapm: lineups,
                ..Default::default()
            };
            let reconciler = reconciler.with_flags(flags);

            for (prefix, state) in reconciler.decode(&query) {
                let requests = reconciler.plan(&prefix, &state, None);
                let name = if prefix.is_primary() {
                    "primary".to_string()
                } else {
                    prefix.to_string()
                };
                println!("=== Requests [{}] ({}) ===", name, requests.len());
                for req in &requests {
                    let roster = if req.include_roster { " +roster" } else { "" };
                    println!(
                        "  {:16} {}{}",
                        req.tag,
                        courtsplit::codec::stringify(&req.params),
                        roster
                    );
                }
            }
        }
        Commands::Registry => {
            println!("=== Modes ===");
            for mode in reconciler.registry().modes() {
                println!("  {:14} {}", mode.key, mode.label);
            }
            println!("\n=== Splits ===");
            for split in reconciler.registry().splits() {
                println!("  {:14} {}", split.key, split.label);
            }
            println!("\n  \"player-on-off:<Name>\" matches any roster player");
        }
    }

    Ok(())
}
