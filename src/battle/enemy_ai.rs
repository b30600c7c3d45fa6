//! Counter-action policy of the computer-controlled side

use crate::battle::state::BattleAction;
use crate::combat::{BattleUnit, DuelChoice, StratagemCatalog};
use crate::core::config::BattleConfig;
use crate::core::rng::RandomSource;

/// Pick the enemy's action for this round
///
/// Shaken units lean toward defending, clever commanders toward
/// stratagems, everyone else charges.
pub fn choose_counter_action(
    unit: &BattleUnit,
    catalog: &StratagemCatalog,
    config: &BattleConfig,
    rng: &mut impl RandomSource,
) -> BattleAction {
    if unit.morale < config.enemy_defend_morale_threshold && rng.chance(config.enemy_defend_chance) {
        return BattleAction::Defend;
    }

    if unit.intellect() > config.enemy_stratagem_intellect {
        let available: Vec<&str> = catalog.available_for(unit).map(|s| s.id.as_str()).collect();
        if !available.is_empty() && rng.chance(config.enemy_stratagem_chance) {
            let pick = available[rng.pick_index(available.len())];
            return BattleAction::Stratagem(pick.to_string());
        }
    }

    BattleAction::Charge
}

/// Enemy duel moves are uniform
pub fn choose_duel_move(rng: &mut impl RandomSource) -> DuelChoice {
    let choices = DuelChoice::all();
    choices[rng.pick_index(choices.len())]
}
