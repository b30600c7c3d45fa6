//! Combat arithmetic: troop damage, duels, morale and rout
//!
//! Every function is pure. Randomness enters only through the
//! `RandomSource` passed in.

use serde::{Deserialize, Serialize};

use crate::campaign::general::General;
use crate::combat::constants::{MIGHT_DIVISOR, MORALE_MAX, NEUTRAL_TRAINING, TRAINING_DIVISOR, TRAINING_MAX};
use crate::combat::troop_type::has_advantage;
use crate::combat::unit::BattleUnit;
use crate::core::config::CombatConfig;
use crate::core::rng::RandomSource;

/// Damage before the random factor is applied
pub fn expected_damage(
    attacker: &BattleUnit,
    defender: &BattleUnit,
    multiplier: f64,
    training: u32,
    config: &CombatConfig,
) -> f64 {
    let might_factor = 1.0 + attacker.might() as f64 / MIGHT_DIVISOR;
    let advantage_factor = if has_advantage(attacker.troop_type, defender.troop_type) {
        config.advantage_bonus
    } else {
        1.0
    };
    let training = training.min(TRAINING_MAX) as f64;
    let training_factor = 1.0 + (training - NEUTRAL_TRAINING as f64) / TRAINING_DIVISOR;

    attacker.troops as f64
        * config.base_damage_rate
        * might_factor
        * advantage_factor
        * training_factor
        * multiplier.max(0.0)
}

/// Troops the attacker kills in one exchange
pub fn calculate_damage(
    attacker: &BattleUnit,
    defender: &BattleUnit,
    multiplier: f64,
    training: u32,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> u32 {
    let random_factor = rng.range(config.random_min, config.random_max);
    let damage = expected_damage(attacker, defender, multiplier, training, config) * random_factor;
    damage.round().max(0.0) as u32
}

/// The three duel moves. Power beats special, counter beats power,
/// special beats counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelChoice {
    Power,
    Counter,
    Special,
}

impl DuelChoice {
    pub fn all() -> &'static [DuelChoice] {
        &[DuelChoice::Power, DuelChoice::Counter, DuelChoice::Special]
    }

    pub fn beats(&self, other: DuelChoice) -> bool {
        matches!(
            (self, other),
            (DuelChoice::Power, DuelChoice::Special)
                | (DuelChoice::Counter, DuelChoice::Power)
                | (DuelChoice::Special, DuelChoice::Counter)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelWinner {
    A,
    B,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: DuelWinner,
    /// Health the loser gives up. Same value whoever wins.
    pub damage: u32,
}

/// Resolve one duel exchange between two commanders
pub fn resolve_duel(
    choice_a: DuelChoice,
    choice_b: DuelChoice,
    a: &General,
    b: &General,
    config: &CombatConfig,
) -> DuelOutcome {
    let winner = if choice_a.beats(choice_b) {
        DuelWinner::A
    } else if choice_b.beats(choice_a) {
        DuelWinner::B
    } else {
        match a.might.cmp(&b.might) {
            std::cmp::Ordering::Greater => DuelWinner::A,
            std::cmp::Ordering::Less => DuelWinner::B,
            std::cmp::Ordering::Equal => DuelWinner::Draw,
        }
    };

    let damage = config.duel_base_damage + a.might.abs_diff(b.might) / 2;

    DuelOutcome { winner, damage }
}

/// Morale after a change, clamped to [0, 100]
pub fn apply_morale_change(unit: &BattleUnit, delta: i32) -> u32 {
    (unit.morale as i64 + delta as i64).clamp(0, MORALE_MAX as i64) as u32
}

/// Troops left after taking damage. Negative damage heals nothing.
pub fn apply_troop_damage(unit: &BattleUnit, damage: i64) -> u32 {
    (unit.troops as i64 - damage.max(0)).max(0) as u32
}

/// A unit routs exactly when its morale reaches zero
pub fn check_rout(unit: &BattleUnit) -> bool {
    unit.morale == 0
}
