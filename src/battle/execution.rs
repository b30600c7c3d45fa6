//! Battle round resolution
//!
//! Each round: enemy picks a counter-action -> player acts -> enemy acts
//! -> round morale -> termination check.

use crate::battle::enemy_ai::{choose_counter_action, choose_duel_move};
use crate::battle::state::{BattleAction, BattleEventType, BattlePhase, BattleState};
use crate::combat::{
    apply_morale_change, apply_stratagem, apply_troop_damage, calculate_damage, check_rout, resolve_duel,
    resolve_fate, DuelChoice, DuelWinner, FateContext,
};
use crate::core::rng::RandomSource;
use crate::core::types::Side;
use crate::rules::Rules;

/// Resolve one player action and the enemy's counter-action
pub fn resolve_battle_round(
    state: &BattleState,
    action: BattleAction,
    rules: &Rules,
    rng: &mut impl RandomSource,
) -> BattleState {
    let mut next = state.clone();

    if next.is_finished() {
        next.log_event(BattleEventType::ActionRejected, "The battle is already over".into());
        return next;
    }

    if next.phase == BattlePhase::Duel {
        next.log_event(
            BattleEventType::ActionRejected,
            "The commanders are locked in a duel".into(),
        );
        return next;
    }

    if action == BattleAction::Duel {
        return begin_duel(next);
    }

    let battle_config = &rules.config.battle;
    let enemy_action = choose_counter_action(&next.enemy, &rules.data.stratagems, battle_config, rng);

    next.player.defending = action == BattleAction::Defend && next.player.disabled_turns == 0;
    next.enemy.defending = enemy_action == BattleAction::Defend && next.enemy.disabled_turns == 0;

    let player_before = next.player.troops;
    let enemy_before = next.enemy.troops;

    perform_action(&mut next, Side::Player, &action, rules, rng);
    if next.enemy.troops > 0 && !check_rout(&next.enemy) {
        perform_action(&mut next, Side::Enemy, &enemy_action, rules, rng);
    }

    let player_inflicted = enemy_before - next.enemy.troops.min(enemy_before);
    let enemy_inflicted = player_before - next.player.troops.min(player_before);
    match player_inflicted.cmp(&enemy_inflicted) {
        std::cmp::Ordering::Greater => {
            shift_morale(&mut next, Side::Player, battle_config.round_win_morale);
            shift_morale(&mut next, Side::Enemy, battle_config.round_loss_morale);
        }
        std::cmp::Ordering::Less => {
            shift_morale(&mut next, Side::Enemy, battle_config.round_win_morale);
            shift_morale(&mut next, Side::Player, battle_config.round_loss_morale);
        }
        std::cmp::Ordering::Equal => {}
    }

    next.player.defending = false;
    next.enemy.defending = false;
    next.round += 1;

    tracing::debug!(
        round = next.round - 1,
        player_troops = next.player.troops,
        enemy_troops = next.enemy.troops,
        player_morale = next.player.morale,
        enemy_morale = next.enemy.morale,
        "battle round resolved"
    );

    evaluate_termination(&mut next, rules, rng);
    next
}

/// Resolve one duel exchange
pub fn resolve_duel_round(
    state: &BattleState,
    choice: DuelChoice,
    rules: &Rules,
    rng: &mut impl RandomSource,
) -> BattleState {
    let mut next = state.clone();

    if next.is_finished() {
        next.log_event(BattleEventType::ActionRejected, "The battle is already over".into());
        return next;
    }

    if next.phase != BattlePhase::Duel {
        next.log_event(BattleEventType::ActionRejected, "No duel is in progress".into());
        return next;
    }

    let enemy_choice = choose_duel_move(rng);
    let outcome = resolve_duel(
        choice,
        enemy_choice,
        &next.player.general,
        &next.enemy.general,
        &rules.config.combat,
    );

    let loser = match outcome.winner {
        DuelWinner::A => Some(Side::Enemy),
        DuelWinner::B => Some(Side::Player),
        DuelWinner::Draw => None,
    };

    let description = match loser {
        Some(side) => {
            let health = next.duel_health_mut(side);
            *health = health.saturating_sub(outcome.damage);
            format!(
                "{} strikes {} for {}",
                next.unit(side.opponent()).general.name,
                next.unit(side).general.name,
                outcome.damage
            )
        }
        None => "The blades meet and neither yields".to_string(),
    };
    next.log_event(
        BattleEventType::DuelExchange {
            player: choice,
            enemy: enemy_choice,
            winner: outcome.winner,
            damage: outcome.damage,
        },
        description,
    );

    next.phase = BattlePhase::Selection;

    if let Some(side) = loser {
        if next.duel_health(side) == 0 {
            commander_falls(&mut next, side, rules, rng);
            evaluate_termination(&mut next, rules, rng);
        }
    }

    next
}

fn begin_duel(mut state: BattleState) -> BattleState {
    if state.player.commander_lost || state.enemy.commander_lost {
        state.log_event(
            BattleEventType::ActionRejected,
            "There is no commander left to duel".into(),
        );
        return state;
    }

    let description = format!(
        "{} challenges {} to single combat",
        state.player.general.name, state.enemy.general.name
    );
    state.phase = BattlePhase::Duel;
    state.log_event(BattleEventType::DuelChallenged, description);
    state
}

fn perform_action(
    state: &mut BattleState,
    side: Side,
    action: &BattleAction,
    rules: &Rules,
    rng: &mut impl RandomSource,
) {
    {
        let actor = state.unit_mut(side);
        if actor.disabled_turns > 0 {
            actor.disabled_turns -= 1;
            let description = format!("{} is in disarray and cannot act", actor.general.name);
            state.log_event(BattleEventType::TurnLost { side }, description);
            return;
        }
    }

    let battle_config = &rules.config.battle;

    match action {
        BattleAction::Charge => {
            let (actor, target) = state.units_mut(side);
            let mut multiplier = 1.0;
            if actor.empowered {
                multiplier *= battle_config.empowered_charge_multiplier;
                actor.empowered = false;
            }
            if target.defending {
                multiplier *= battle_config.defend_damage_factor;
            }
            let damage = calculate_damage(actor, target, multiplier, actor.training, &rules.config.combat, rng);
            target.troops = apply_troop_damage(target, damage as i64);
            let description = format!("{} charges, {} troops fall", actor.general.name, damage);
            state.log_event(BattleEventType::Charge { side, damage }, description);
        }
        BattleAction::Defend => {
            let actor = state.unit_mut(side);
            actor.morale = apply_morale_change(actor, battle_config.defend_morale_recovery);
            let description = format!("{} holds the line", actor.general.name);
            state.log_event(BattleEventType::Defend { side }, description);
        }
        BattleAction::Stratagem(id) => {
            let (actor, target) = state.units_mut(side);
            let outcome = apply_stratagem(actor, target, id, &rules.data.stratagems);
            *actor = outcome.caster;
            *target = outcome.target;
            if !outcome.applied {
                tracing::debug!(?side, stratagem = %id, "stratagem rejected");
            }
            state.log_event(
                BattleEventType::Stratagem {
                    side,
                    id: id.clone(),
                    applied: outcome.applied,
                },
                outcome.message,
            );
        }
        BattleAction::Duel => {
            state.log_event(BattleEventType::ActionRejected, "Only the player may call a duel".into());
        }
    }
}

fn shift_morale(state: &mut BattleState, side: Side, delta: i32) {
    if delta == 0 {
        return;
    }
    let unit = state.unit_mut(side);
    let before = unit.morale;
    unit.morale = apply_morale_change(unit, delta);
    let applied = unit.morale as i32 - before as i32;
    let description = format!("{} morale {:+}", unit.general.name, applied);
    state.log_event(BattleEventType::MoraleShift { side, delta: applied }, description);
}

fn commander_falls(state: &mut BattleState, side: Side, rules: &Rules, rng: &mut impl RandomSource) {
    let fate = resolve_fate(
        &state.unit(side).general,
        FateContext::DuelDefeated,
        &rules.config.fate,
        rng,
    );
    state.unit_mut(side).commander_lost = true;

    let description = fate
        .message
        .clone()
        .unwrap_or_else(|| format!("{} is defeated", state.unit(side).general.name));
    state.log_event(BattleEventType::CommanderFell { side, fate: fate.fate }, description);
    state.fates.push(fate);

    shift_morale(state, side, rules.config.battle.commander_lost_morale);
    shift_morale(state, side.opponent(), rules.config.battle.commander_won_morale);
}

fn evaluate_termination(state: &mut BattleState, rules: &Rules, rng: &mut impl RandomSource) {
    let player_down = state.player.troops == 0 || check_rout(&state.player);
    let enemy_down = state.enemy.troops == 0 || check_rout(&state.enemy);

    for (side, down) in [(Side::Player, player_down), (Side::Enemy, enemy_down)] {
        if down && check_rout(state.unit(side)) {
            let description = format!("{}'s army breaks and flees", state.unit(side).general.name);
            state.log_event(BattleEventType::Routed { side }, description);
        }
    }

    let winner = match (player_down, enemy_down) {
        (true, true) => Some(state.defender()),
        (true, false) => Some(Side::Enemy),
        (false, true) => Some(Side::Player),
        (false, false) if state.round > state.max_rounds => {
            Some(match state.player.morale.cmp(&state.enemy.morale) {
                std::cmp::Ordering::Greater => Side::Player,
                std::cmp::Ordering::Less => Side::Enemy,
                std::cmp::Ordering::Equal => state.defender(),
            })
        }
        (false, false) => None,
    };

    if let Some(winner) = winner {
        finish_battle(state, winner, rules, rng);
    }
}

fn finish_battle(state: &mut BattleState, winner: Side, rules: &Rules, rng: &mut impl RandomSource) {
    let loser = winner.opponent();

    if !state.unit(loser).commander_lost {
        let fate = resolve_fate(
            &state.unit(loser).general,
            FateContext::BattleLost,
            &rules.config.fate,
            rng,
        );
        state.fates.push(fate);
    }

    state.phase = match winner {
        Side::Player => BattlePhase::Victory,
        Side::Enemy => BattlePhase::Defeat,
    };
    state.winner = Some(winner);

    let description = format!("{} carries the day", state.unit(winner).general.name);
    tracing::info!(?winner, rounds = state.round - 1, "battle ended");
    state.log_event(BattleEventType::BattleEnded { winner }, description);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::general::General;
    use crate::combat::{BattleUnit, Fate, TroopType};
    use crate::core::rng::ScriptedRng;
    use crate::core::types::{FactionId, GeneralId};

    fn general(id: u32, might: u32, intellect: u32) -> General {
        General::new(GeneralId(id), format!("General {}", id), FactionId(id))
            .with_stats(might, intellect, 50, 50)
            .with_troop_type(TroopType::Infantry)
    }

    fn battle(player_troops: u32, enemy_troops: u32) -> BattleState {
        let rules = Rules::default();
        BattleState::new(
            BattleUnit::new(general(1, 80, 40), player_troops),
            BattleUnit::new(general(2, 50, 40), enemy_troops),
            Side::Player,
            &rules.config.battle,
        )
    }

    #[test]
    fn test_charge_damages_both_sides() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(&battle(5000, 5000), BattleAction::Charge, &rules, &mut rng);

        // player: 5000 * 0.1 * 1.8 = 900, enemy then hits back with 4100 * 0.1 * 1.5 = 615
        assert_eq!(next.enemy.troops, 4100);
        assert_eq!(next.player.troops, 4385);
        assert_eq!(next.round, 2);
        assert_eq!(next.player.morale, 100);
        assert_eq!(next.enemy.morale, 90);
    }

    #[test]
    fn test_input_state_is_untouched() {
        let rules = Rules::default();
        let before = battle(5000, 5000);
        let snapshot = before.clone();
        let mut rng = ScriptedRng::constant(0.5);
        let _ = resolve_battle_round(&before, BattleAction::Charge, &rules, &mut rng);
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_defend_halves_incoming() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(&battle(5000, 5000), BattleAction::Defend, &rules, &mut rng);

        // enemy: 5000 * 0.1 * 1.5 * 0.5 = 375
        assert_eq!(next.player.troops, 4625);
        assert_eq!(next.enemy.troops, 5000);
        assert!(!next.player.defending);
    }

    #[test]
    fn test_annihilation_ends_battle() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(&battle(20_000, 500), BattleAction::Charge, &rules, &mut rng);

        assert_eq!(next.enemy.troops, 0);
        assert_eq!(next.phase, BattlePhase::Victory);
        assert_eq!(next.winner, Some(Side::Player));
        assert!(next.fate_of(Side::Enemy).is_some());
    }

    #[test]
    fn test_rout_ends_battle() {
        let rules = Rules::default();
        let mut state = battle(5000, 5000);
        state.enemy.morale = 5;
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(&state, BattleAction::Charge, &rules, &mut rng);

        assert_eq!(next.enemy.morale, 0);
        assert_eq!(next.phase, BattlePhase::Victory);
        assert!(next.log.iter().any(|e| matches!(e.event_type, BattleEventType::Routed { side: Side::Enemy })));
    }

    #[test]
    fn test_max_rounds_tie_goes_to_defender() {
        let rules = Rules::default();
        let mut state = battle(5000, 5000);
        state.round = state.max_rounds;
        state.player.morale = 30;
        state.enemy.morale = 30;
        let mut rng = ScriptedRng::constant(0.1);
        let next = resolve_battle_round(&state, BattleAction::Defend, &rules, &mut rng);

        // enemy at morale 30 defends (0.1 < 0.4); both recover to 35
        assert_eq!(next.player.morale, next.enemy.morale);
        assert_eq!(next.phase, BattlePhase::Defeat);
        assert_eq!(next.winner, Some(Side::Enemy));
    }

    #[test]
    fn test_actions_after_end_are_rejected() {
        let rules = Rules::default();
        let mut state = battle(5000, 5000);
        state.phase = BattlePhase::Victory;
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(&state, BattleAction::Charge, &rules, &mut rng);
        assert_eq!(next.player.troops, 5000);
        assert!(matches!(next.log.last().map(|e| &e.event_type), Some(BattleEventType::ActionRejected)));
    }

    #[test]
    fn test_unknown_stratagem_logs_and_continues() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.5);
        let next = resolve_battle_round(
            &battle(5000, 5000),
            BattleAction::Stratagem("meteor".into()),
            &rules,
            &mut rng,
        );
        assert!(next.log.iter().any(|e| matches!(
            &e.event_type,
            BattleEventType::Stratagem { applied: false, .. }
        )));
        assert_eq!(next.phase, BattlePhase::Selection);
    }

    #[test]
    fn test_duel_flow_returns_to_selection() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.0);
        let dueling = resolve_battle_round(&battle(5000, 5000), BattleAction::Duel, &rules, &mut rng);
        assert_eq!(dueling.phase, BattlePhase::Duel);
        assert_eq!(dueling.round, 1);

        // enemy draws 0.0 -> Power; Counter beats Power
        let after = resolve_duel_round(&dueling, DuelChoice::Counter, &rules, &mut rng);
        assert_eq!(after.phase, BattlePhase::Selection);
        assert_eq!(after.enemy_duel_health, 100 - (20 + 15));
        assert_eq!(after.player_duel_health, 100);
    }

    #[test]
    fn test_duel_kill_swings_morale() {
        let rules = Rules::default();
        let mut state = battle(5000, 5000);
        state.phase = BattlePhase::Duel;
        state.enemy_duel_health = 10;
        let mut rng = ScriptedRng::constant(0.0);
        let after = resolve_duel_round(&state, DuelChoice::Counter, &rules, &mut rng);

        assert!(after.enemy.commander_lost);
        assert_eq!(after.enemy.morale, 70);
        assert_eq!(after.player.morale, 100);
        let fate = after.fate_of(Side::Enemy).map(|f| f.fate);
        assert!(matches!(fate, Some(Fate::Dead | Fate::Captured | Fate::Escaped)));
    }

    #[test]
    fn test_duel_outside_duel_phase_rejected() {
        let rules = Rules::default();
        let mut rng = ScriptedRng::constant(0.0);
        let next = resolve_duel_round(&battle(5000, 5000), DuelChoice::Power, &rules, &mut rng);
        assert_eq!(next.enemy_duel_health, 100);
        assert!(matches!(next.log.last().map(|e| &e.event_type), Some(BattleEventType::ActionRejected)));
    }
}
