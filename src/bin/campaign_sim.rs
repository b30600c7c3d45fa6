//! Campaign simulation
//!
//! Loads a scenario and lets every faction, the player's included, run
//! under the AI controller for a number of turns.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warlords::campaign::{analyze_factions, end_turn, process_all_ai_turns, WorldState};
use warlords::core::types::FactionId;
use warlords::rules::load_scenario;

/// Campaign simulation - AI factions compete for the map
#[derive(Parser, Debug)]
#[command(name = "campaign_sim")]
#[command(about = "Run AI factions through a scenario for a number of turns")]
struct Args {
    /// Scenario TOML file
    #[arg(long, default_value = "data/scenario.toml")]
    scenario: PathBuf,

    /// Turns to simulate
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the final world as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let scenario = match load_scenario(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario {}: {}", args.scenario.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let rules = scenario.rules;
    // Nobody is at the keyboard: hand the player's faction to the AI too
    let mut world = scenario.world;
    world.player_faction = FactionId(0);

    println!("=== {} (seed {}) ===", scenario.name, args.seed);
    print_standings(&world);

    for _ in 0..args.turns {
        let outcome = process_all_ai_turns(&world, &rules, &mut rng);
        println!("\n--- Turn {} ---", outcome.world.turn);
        for log in &outcome.logs {
            if log.events.is_empty() {
                continue;
            }
            println!("{} ({} actions)", faction_name(&outcome.world, log.faction), log.actions_used);
            for event in &log.events {
                println!("  {}", event.description);
            }
        }
        for event in &outcome.diplomacy {
            println!("  {}", event.description);
        }
        world = end_turn(&outcome.world, &rules);

        let survivors = analyze_factions(&world).iter().filter(|a| a.is_alive()).count();
        if survivors <= 1 {
            println!("\nThe realm is unified.");
            break;
        }
    }

    println!();
    print_standings(&world);

    if let Some(path) = args.json {
        let written = serde_json::to_string_pretty(&world)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Failed to write {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("Final world written to {}", path.display());
    }
    ExitCode::SUCCESS
}

fn faction_name(world: &WorldState, id: FactionId) -> String {
    world
        .faction(id)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn print_standings(world: &WorldState) {
    println!("Standings at turn {}:", world.turn);
    let mut analyses = analyze_factions(world);
    analyses.sort_by_key(|a| a.power_rank);
    for a in analyses {
        println!(
            "  #{} {:<12} regions {:>2}  troops {:>6}  gold {:>6}  threat {:>3}",
            a.power_rank,
            faction_name(world, a.faction),
            a.region_count,
            a.total_troops,
            a.total_gold,
            a.threat_level
        );
    }
}
