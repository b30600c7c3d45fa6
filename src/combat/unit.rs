//! BattleUnit - a commander bound to an army for one battle

use serde::{Deserialize, Serialize};

use crate::campaign::general::General;
use crate::combat::constants::{MORALE_MAX, NEUTRAL_TRAINING, STARTING_MORALE, TRAINING_MAX};
use crate::combat::troop_type::TroopType;

/// A general plus troops, created at battle start and discarded at the end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleUnit {
    pub general: General,
    pub troops: u32,
    pub max_troops: u32,
    /// 0 to 100. Zero means the unit routs.
    pub morale: u32,
    pub troop_type: TroopType,
    /// Training level of the troops (0 to 100)
    pub training: u32,
    /// Stratagems already used in this battle
    pub used_stratagems: Vec<String>,
    /// Halves incoming damage for the current round
    pub defending: bool,
    /// Turns this unit must skip
    pub disabled_turns: u32,
    /// Next charge deals extra damage
    pub empowered: bool,
    /// Commander fell in a duel; the troops fight on without one
    pub commander_lost: bool,
}

impl BattleUnit {
    pub fn new(general: General, troops: u32) -> Self {
        let troop_type = general.troop_type;
        Self {
            general,
            troops,
            max_troops: troops,
            morale: STARTING_MORALE,
            troop_type,
            training: NEUTRAL_TRAINING,
            used_stratagems: Vec::new(),
            defending: false,
            disabled_turns: 0,
            empowered: false,
            commander_lost: false,
        }
    }

    pub fn with_training(mut self, training: u32) -> Self {
        self.training = training.min(TRAINING_MAX);
        self
    }

    pub fn with_morale(mut self, morale: u32) -> Self {
        self.morale = morale.min(MORALE_MAX);
        self
    }

    pub fn with_troop_type(mut self, troop_type: TroopType) -> Self {
        self.troop_type = troop_type;
        self
    }

    pub fn might(&self) -> u32 {
        self.general.might
    }

    pub fn intellect(&self) -> u32 {
        self.general.intellect
    }

    pub fn has_used(&self, stratagem_id: &str) -> bool {
        self.used_stratagems.iter().any(|s| s == stratagem_id)
    }

    /// Share of the starting army still standing
    pub fn strength_ratio(&self) -> f64 {
        if self.max_troops == 0 {
            return 0.0;
        }
        self.troops as f64 / self.max_troops as f64
    }
}
