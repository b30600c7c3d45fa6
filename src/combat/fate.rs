//! Fate of commanders after a lost battle or duel

use serde::{Deserialize, Serialize};

use crate::campaign::general::General;
use crate::core::config::{FateConfig, OutcomeWeights};
use crate::core::rng::RandomSource;
use crate::core::types::GeneralId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fate {
    Alive,
    Dead,
    Captured,
    Escaped,
}

/// Circumstances in which a fate is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FateContext {
    /// The general's side did not lose
    Victorious,
    /// The general's army lost the battle
    BattleLost,
    /// The general was beaten in a duel
    DuelDefeated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralFate {
    pub general_id: GeneralId,
    pub fate: Fate,
    pub message: Option<String>,
}

/// Normalized outcome probabilities (sum to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FateProbabilities {
    pub alive: f64,
    pub dead: f64,
    pub captured: f64,
    pub escaped: f64,
}

impl FateProbabilities {
    pub fn total(&self) -> f64 {
        self.alive + self.dead + self.captured + self.escaped
    }
}

/// Probability of each outcome for this general in this context
///
/// Charisma lowers the chance of death and raises the chance of being
/// taken alive; might raises the chance of cutting a way out.
pub fn fate_probabilities(general: &General, context: FateContext, config: &FateConfig) -> FateProbabilities {
    let base: OutcomeWeights = match context {
        FateContext::Victorious => {
            return FateProbabilities { alive: 1.0, dead: 0.0, captured: 0.0, escaped: 0.0 };
        }
        FateContext::BattleLost => config.battle_lost,
        FateContext::DuelDefeated => config.duel_defeated,
    };

    let charisma = general.charisma.min(100) as f64 / 100.0;
    let might = general.might.min(100) as f64 / 100.0;

    let dead = base.dead.max(0.0) * (1.0 - charisma * config.charisma_death_reduction).max(0.0);
    let captured = base.captured.max(0.0) * (1.0 + charisma * config.charisma_capture_bonus);
    let escaped = base.escaped.max(0.0) * (1.0 + might * config.might_escape_bonus);

    let total = dead + captured + escaped;
    if total <= 0.0 {
        return FateProbabilities { alive: 0.0, dead: 0.0, captured: 1.0, escaped: 0.0 };
    }

    FateProbabilities {
        alive: 0.0,
        dead: dead / total,
        captured: captured / total,
        escaped: escaped / total,
    }
}

/// Roll the fate of a general
pub fn resolve_fate(
    general: &General,
    context: FateContext,
    config: &FateConfig,
    rng: &mut impl RandomSource,
) -> GeneralFate {
    let probabilities = fate_probabilities(general, context, config);
    let roll = rng.next_f64();

    let fate = if roll < probabilities.alive {
        Fate::Alive
    } else if roll < probabilities.alive + probabilities.dead {
        Fate::Dead
    } else if roll < probabilities.alive + probabilities.dead + probabilities.captured {
        Fate::Captured
    } else {
        Fate::Escaped
    };

    let message = match fate {
        Fate::Alive => None,
        Fate::Dead => Some(format!("{} has fallen on the field", general.name)),
        Fate::Captured => Some(format!("{} has been taken prisoner", general.name)),
        Fate::Escaped => Some(format!("{} escaped in the chaos", general.name)),
    };

    tracing::debug!(general = general.id.0, ?context, ?fate, roll, "fate resolved");

    GeneralFate {
        general_id: general.id,
        fate,
        message,
    }
}
