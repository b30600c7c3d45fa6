//! Headless Battle Runner
//!
//! Pits two generals from a scenario against each other. The player side
//! follows a fixed policy so runs with the same seed are identical.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use warlords::battle::{resolve_battle_round, resolve_duel_round, BattleAction, BattlePhase, BattleState};
use warlords::combat::{BattleUnit, DuelChoice};
use warlords::core::types::{GeneralId, Side};
use warlords::core::RandomSource;
use warlords::rules::{load_scenario, Rules};

/// Headless Battle Runner - scripted player against the battle AI
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a single battle between two scenario generals")]
struct Args {
    /// Scenario providing generals and tunables
    #[arg(long, default_value = "data/scenario.toml")]
    scenario: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// General leading the attack
    #[arg(long, default_value_t = 1)]
    attacker: u32,

    /// General holding the field
    #[arg(long, default_value_t = 4)]
    defender: u32,

    /// Troops on each side
    #[arg(long, default_value_t = 5000)]
    troops: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleSummary<'a> {
    seed: u64,
    winner: Option<Side>,
    rounds: u32,
    player_troops: u32,
    enemy_troops: u32,
    player_morale: u32,
    enemy_morale: u32,
    battle: &'a BattleState,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let scenario = match load_scenario(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario {}: {}", args.scenario.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let rules = scenario.rules;

    let (Some(attacker), Some(defender)) = (
        rules.data.general(GeneralId(args.attacker)),
        rules.data.general(GeneralId(args.defender)),
    ) else {
        eprintln!("Unknown general id; check --attacker and --defender");
        return ExitCode::FAILURE;
    };

    let mut state = BattleState::new(
        BattleUnit::new(attacker.clone(), args.troops),
        BattleUnit::new(defender.clone(), args.troops),
        Side::Player,
        &rules.config.battle,
    );

    // Each call either advances a round, resolves a duel exchange or is
    // rejected; the cap only guards against a policy that keeps being
    // rejected.
    let mut steps = 0;
    while !state.is_finished() && steps < 200 {
        state = match state.phase {
            BattlePhase::Duel => {
                let choice = pick_duel_move(&mut rng);
                resolve_duel_round(&state, choice, &rules, &mut rng)
            }
            _ => {
                let action = choose_action(&state, &rules);
                resolve_battle_round(&state, action, &rules, &mut rng)
            }
        };
        steps += 1;
    }

    if args.format == "json" {
        let summary = BattleSummary {
            seed,
            winner: state.winner,
            rounds: state.round,
            player_troops: state.player.troops,
            enemy_troops: state.enemy.troops,
            player_morale: state.player.morale,
            enemy_morale: state.enemy.morale,
            battle: &state,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&state, seed);
    }
    ExitCode::SUCCESS
}

/// Open with the strongest stratagem, duel a weaker commander, fall
/// back to defend when shaken and charge otherwise.
fn choose_action(state: &BattleState, rules: &Rules) -> BattleAction {
    let player = &state.player;
    let enemy = &state.enemy;

    let best_stratagem = rules
        .data
        .stratagems
        .available_for(player)
        .max_by_key(|s| s.required_intellect)
        .map(|s| s.id.clone());
    if let Some(id) = best_stratagem {
        return BattleAction::Stratagem(id);
    }

    let can_duel = !player.commander_lost && !enemy.commander_lost;
    if can_duel && player.might() >= enemy.might() + 15 {
        return BattleAction::Duel;
    }

    if player.morale < 40 {
        BattleAction::Defend
    } else {
        BattleAction::Charge
    }
}

fn pick_duel_move(rng: &mut impl RandomSource) -> DuelChoice {
    [DuelChoice::Power, DuelChoice::Counter, DuelChoice::Special][rng.pick_index(3)]
}

fn print_report(state: &BattleState, seed: u64) {
    println!("=== Battle (seed {}) ===", seed);
    println!(
        "{} ({} troops) vs {} ({} troops)",
        state.player.general.name, state.player.max_troops, state.enemy.general.name, state.enemy.max_troops
    );
    for event in &state.log {
        println!("  [{}] {}", event.round, event.description);
    }
    println!();

    let verdict = match state.winner {
        Some(Side::Player) => "Victory",
        Some(Side::Enemy) => "Defeat",
        None => "Undecided",
    };
    println!("Result: {} after {} rounds", verdict, state.round);
    println!(
        "  {}: {} troops, morale {}",
        state.player.general.name, state.player.troops, state.player.morale
    );
    println!(
        "  {}: {} troops, morale {}",
        state.enemy.general.name, state.enemy.troops, state.enemy.morale
    );
    for fate in &state.fates {
        println!(
            "  {} -> {:?}{}",
            fate.general_id,
            fate.fate,
            fate.message.as_deref().map(|m| format!(" ({})", m)).unwrap_or_default()
        );
    }
}
