//! Battle state machine integration tests

mod common;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warlords::battle::*;
use warlords::combat::{DuelChoice, TroopType};
use warlords::core::types::Side;
use warlords::core::ScriptedRng;

use common::{rules, unit};

fn battle() -> BattleState {
    BattleState::new(
        unit(80, 75, 5000, TroopType::Cavalry),
        unit(60, 40, 5000, TroopType::Infantry),
        Side::Player,
        &rules().config.battle,
    )
}

fn charge_to_the_end(seed: u64) -> BattleState {
    let rules = rules();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = battle();
    for _ in 0..20 {
        if state.is_finished() {
            break;
        }
        state = resolve_battle_round(&state, BattleAction::Charge, &rules, &mut rng);
    }
    state
}

#[test]
fn test_charging_battle_terminates() {
    let state = charge_to_the_end(11);
    assert!(state.is_finished());
    assert!(state.phase.is_terminal());
    assert!(state.winner.is_some());
    assert!(state.round <= state.max_rounds + 1);

    assert_eq!(state.log.first().map(|e| &e.event_type), Some(&BattleEventType::BattleStarted));
    assert!(matches!(
        state.log.last().map(|e| &e.event_type),
        Some(BattleEventType::BattleEnded { .. })
    ));
}

#[test]
fn test_same_seed_same_battle() {
    assert_eq!(charge_to_the_end(5), charge_to_the_end(5));
}

#[test]
fn test_winner_matches_phase() {
    for seed in 0..20 {
        let state = charge_to_the_end(seed);
        match state.winner {
            Some(Side::Player) => assert_eq!(state.phase, BattlePhase::Victory),
            Some(Side::Enemy) => assert_eq!(state.phase, BattlePhase::Defeat),
            None => panic!("battle {} did not finish", seed),
        }
        assert!(state.player.morale <= 100 && state.enemy.morale <= 100);
        assert!(state.player.troops <= 5000 && state.enemy.troops <= 5000);
    }
}

#[test]
fn test_loser_fate_recorded() {
    for seed in 0..20 {
        let state = charge_to_the_end(seed);
        let Some(winner) = state.winner else { continue };
        let loser = winner.opponent();
        let fate = state.fate_of(loser).expect("losing commander has a fate");
        assert_ne!(fate.fate, warlords::combat::Fate::Alive);
    }
}

#[test]
fn test_stratagem_once_per_battle() {
    let rules = rules();
    // High draws keep the enemy charging
    let mut rng = ScriptedRng::constant(0.9);
    let state = battle();

    let first = resolve_battle_round(&state, BattleAction::Stratagem("ambush".into()), &rules, &mut rng);
    assert!(first.player.has_used("ambush"));
    let second = resolve_battle_round(&first, BattleAction::Stratagem("ambush".into()), &rules, &mut rng);

    let applied: Vec<bool> = second
        .log
        .iter()
        .filter_map(|e| match &e.event_type {
            BattleEventType::Stratagem { side: Side::Player, applied, .. } => Some(*applied),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![true, false]);
}

#[test]
fn test_unknown_stratagem_is_logged_not_fatal() {
    let rules = rules();
    let mut rng = ScriptedRng::constant(0.9);
    let state = resolve_battle_round(&battle(), BattleAction::Stratagem("meteor".into()), &rules, &mut rng);
    assert_eq!(state.round, 2);
    assert!(state.log.iter().any(|e| matches!(
        &e.event_type,
        BattleEventType::Stratagem { applied: false, .. }
    )));
}

#[test]
fn test_duel_until_a_commander_falls() {
    let rules = rules();
    let mut rng = ScriptedRng::constant(0.0);
    let mut state = resolve_battle_round(&battle(), BattleAction::Duel, &rules, &mut rng);
    assert_eq!(state.phase, BattlePhase::Duel);

    // Enemy always plays power at draw 0.0; counter beats it
    for _ in 0..10 {
        if state.enemy.commander_lost || state.is_finished() {
            break;
        }
        if state.phase == BattlePhase::Selection {
            state = resolve_battle_round(&state, BattleAction::Duel, &rules, &mut rng);
        }
        state = resolve_duel_round(&state, DuelChoice::Counter, &rules, &mut rng);
    }

    assert!(state.enemy.commander_lost);
    assert_eq!(state.enemy_duel_health, 0);
    assert_eq!(state.player_duel_health, 100);
    assert!(state.fate_of(Side::Enemy).is_some());

    // No second duel once a commander is gone
    if !state.is_finished() {
        let again = resolve_battle_round(&state, BattleAction::Duel, &rules, &mut rng);
        assert_eq!(again.phase, BattlePhase::Selection);
        assert!(matches!(
            again.log.last().map(|e| &e.event_type),
            Some(BattleEventType::ActionRejected)
        ));
    }
}

#[test]
fn test_battle_state_serializes() {
    let state = charge_to_the_end(1);
    let json = serde_json::to_string(&state).unwrap();
    let back: BattleState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
