//! Game configuration with documented constants
//!
//! All tunable numbers live here, grouped by the subsystem that reads
//! them. Every section is `#[serde(default)]` so a scenario file only
//! needs to list the values it overrides.

use serde::{Deserialize, Serialize};

/// Configuration for every rules subsystem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub battle: BattleConfig,
    pub fate: FateConfig,
    pub domestic: DomesticCosts,
    pub controller: ControllerConfig,
    pub diplomacy: DiplomacyConfig,
    pub economy: EconomyConfig,
}

/// Troop damage and duel arithmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fraction of attacking troops that becomes damage before modifiers
    pub base_damage_rate: f64,
    /// Multiplier when the attacker's troop type beats the defender's
    pub advantage_bonus: f64,
    /// Lower bound of the random damage factor
    pub random_min: f64,
    /// Upper bound of the random damage factor
    pub random_max: f64,
    /// Duel damage before the might difference is added
    pub duel_base_damage: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_damage_rate: 0.1,
            advantage_bonus: 1.2,
            random_min: 0.8,
            random_max: 1.2,
            duel_base_damage: 20,
        }
    }
}

/// Battle state machine pacing and the enemy counter-action policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub max_rounds: u32,
    /// Morale gained by the side that inflicted more losses in a round
    pub round_win_morale: i32,
    /// Morale change for the side that inflicted fewer losses
    pub round_loss_morale: i32,
    /// Morale recovered by a defending unit
    pub defend_morale_recovery: i32,
    /// Incoming damage multiplier while defending
    pub defend_damage_factor: f64,
    /// Damage multiplier of an empowered charge
    pub empowered_charge_multiplier: f64,
    pub enemy_defend_morale_threshold: u32,
    pub enemy_defend_chance: f64,
    pub enemy_stratagem_intellect: u32,
    pub enemy_stratagem_chance: f64,
    /// Starting duel health of each commander
    pub duel_health: u32,
    /// Morale change for the side whose commander falls in a duel
    pub commander_lost_morale: i32,
    /// Morale change for the side whose commander wins a duel outright
    pub commander_won_morale: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            round_win_morale: 5,
            round_loss_morale: -10,
            defend_morale_recovery: 5,
            defend_damage_factor: 0.5,
            empowered_charge_multiplier: 2.0,
            enemy_defend_morale_threshold: 40,
            enemy_defend_chance: 0.4,
            enemy_stratagem_intellect: 60,
            enemy_stratagem_chance: 0.3,
            duel_health: 100,
            commander_lost_morale: -30,
            commander_won_morale: 20,
        }
    }
}

/// Relative weights of each outcome before stat adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeWeights {
    pub dead: f64,
    pub captured: f64,
    pub escaped: f64,
}

/// Probability table for the fate of a defeated commander
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FateConfig {
    /// Weights when the commander's army lost the battle
    pub battle_lost: OutcomeWeights,
    /// Weights when the commander was beaten in a duel
    pub duel_defeated: OutcomeWeights,
    /// Fraction of the death weight removed at charisma 100
    pub charisma_death_reduction: f64,
    /// Fraction added to the capture weight at charisma 100
    pub charisma_capture_bonus: f64,
    /// Fraction added to the escape weight at might 100
    pub might_escape_bonus: f64,
}

impl Default for FateConfig {
    fn default() -> Self {
        Self {
            battle_lost: OutcomeWeights { dead: 0.15, captured: 0.45, escaped: 0.40 },
            duel_defeated: OutcomeWeights { dead: 0.40, captured: 0.35, escaped: 0.25 },
            charisma_death_reduction: 0.5,
            charisma_capture_bonus: 0.3,
            might_escape_bonus: 0.3,
        }
    }
}

/// Costs and effects of domestic commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomesticCosts {
    pub recruit_gold: u32,
    pub recruit_food: u32,
    /// Upper bound on troops raised by one recruit command
    pub recruit_max: u32,
    /// Share of population that can be raised by one recruit command
    pub recruit_population_share: f64,
    pub train_gold: u32,
    pub train_food: u32,
    pub train_gain: u32,
    pub develop_gold: u32,
    pub develop_gain: u32,
    /// Ceiling of every development stat and of training
    pub stat_cap: u32,
}

impl Default for DomesticCosts {
    fn default() -> Self {
        Self {
            recruit_gold: 500,
            recruit_food: 500,
            recruit_max: 1500,
            recruit_population_share: 0.1,
            train_gold: 300,
            train_food: 200,
            train_gain: 10,
            develop_gold: 500,
            develop_gain: 5,
            stat_cap: 100,
        }
    }
}

/// Thresholds of the autonomous faction turn loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Actions per faction per turn (the player gets the same budget)
    pub action_budget: u32,
    /// Minimum troops in a region before it may launch an attack
    pub min_attack_troops: u32,
    /// Share of a region's troops committed to an attack
    pub attack_commit_share: f64,
    /// Minimum committed/defending ratio for a target to be considered
    pub min_power_ratio: f64,
    pub defense_troop_multiplier: f64,
    pub defense_stat_multiplier: f64,
    /// attack power / defense power needed for a capture
    pub success_ratio: f64,
    /// Share of committed troops lost on a successful attack
    pub success_loss_share: f64,
    /// Share of committed troops lost on a failed attack
    pub failure_loss_share: f64,
    /// Share of defending troops lost on a failed attack
    pub defender_loss_share: f64,
    pub recruit_troop_ceiling: u32,
    pub recruit_min_population: u32,
    pub training_ceiling: u32,
    pub develop_ceiling: u32,
    pub defense_ceiling: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            action_budget: 3,
            min_attack_troops: 3000,
            attack_commit_share: 0.7,
            min_power_ratio: 1.5,
            defense_troop_multiplier: 1.2,
            defense_stat_multiplier: 10.0,
            success_ratio: 1.2,
            success_loss_share: 0.2,
            failure_loss_share: 0.3,
            defender_loss_share: 0.2,
            recruit_troop_ceiling: 10_000,
            recruit_min_population: 5000,
            training_ceiling: 90,
            develop_ceiling: 90,
            defense_ceiling: 100,
        }
    }
}

/// Probabilities and thresholds of the diplomacy engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiplomacyConfig {
    /// Duration in turns of a truce proposed by the AI
    pub truce_duration: u32,
    /// Own troops below this share of the opponent's counts as losing
    pub losing_ratio: f64,
    pub alliance_base_acceptance: f64,
    pub alliance_outranked_bonus: f64,
    pub alliance_common_enemy_bonus: f64,
    pub alliance_threat_bonus: f64,
    /// Threat level above which a faction feels threatened
    pub high_threat_level: u32,
    pub aggression_rejection_weight: f64,
    pub truce_losing_acceptance: f64,
    pub truce_many_borders_acceptance: f64,
    pub truce_pragmatic_acceptance: f64,
    pub truce_default_acceptance: f64,
    /// Border count at which a faction wants fewer fronts
    pub many_borders: usize,
    pub pragmatic_threshold: f64,
    pub trustworthy_threshold: f64,
    /// Chance that a losing, hostile faction sues for peace is
    /// `truce_offer_base + pragmatism * truce_offer_pragmatism_weight`
    pub truce_offer_base: f64,
    pub truce_offer_pragmatism_weight: f64,
    pub proposal_base_chance: f64,
    /// Added to the proposal chance per unit of threat (threat level / 100)
    pub proposal_threat_weight: f64,
    /// Added to the proposal chance when the player outranks the faction
    pub proposal_outranked_bonus: f64,
    /// Chance that a trustworthy faction offers an alliance over a truce
    pub alliance_offer_chance: f64,
    pub war_min_aggressiveness: f64,
    pub war_base_ratio: f64,
    pub war_aggression_span: f64,
    pub war_declare_scale: f64,
    pub ai_truce_chance: f64,
    pub ai_alliance_chance: f64,
}

impl Default for DiplomacyConfig {
    fn default() -> Self {
        Self {
            truce_duration: 5,
            losing_ratio: 0.8,
            alliance_base_acceptance: 0.15,
            alliance_outranked_bonus: 0.25,
            alliance_common_enemy_bonus: 0.3,
            alliance_threat_bonus: 0.2,
            high_threat_level: 60,
            aggression_rejection_weight: 0.3,
            truce_losing_acceptance: 0.8,
            truce_many_borders_acceptance: 0.6,
            truce_pragmatic_acceptance: 0.55,
            truce_default_acceptance: 0.4,
            many_borders: 3,
            pragmatic_threshold: 0.6,
            trustworthy_threshold: 0.6,
            truce_offer_base: 0.5,
            truce_offer_pragmatism_weight: 0.5,
            proposal_base_chance: 0.1,
            proposal_threat_weight: 0.3,
            proposal_outranked_bonus: 0.1,
            alliance_offer_chance: 0.5,
            war_min_aggressiveness: 0.3,
            war_base_ratio: 1.3,
            war_aggression_span: 0.5,
            war_declare_scale: 0.2,
            ai_truce_chance: 0.05,
            ai_alliance_chance: 0.02,
        }
    }
}

/// Per-turn income, upkeep and growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub gold_per_commerce: u32,
    pub food_per_agriculture: u32,
    /// Gold collected per thousand population
    pub tax_per_thousand: u32,
    /// Troops fed by one unit of food
    pub troops_per_food: u32,
    pub growth_rate: f64,
    pub population_cap: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            gold_per_commerce: 10,
            food_per_agriculture: 20,
            tax_per_thousand: 5,
            troops_per_food: 100,
            growth_rate: 0.01,
            population_cap: 100_000,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.combat.random_min > self.combat.random_max {
            return Err(format!(
                "random_min ({}) should be <= random_max ({})",
                self.combat.random_min, self.combat.random_max
            ));
        }

        if self.controller.action_budget == 0 {
            return Err("action_budget must be positive".into());
        }

        if self.economy.troops_per_food == 0 {
            return Err("troops_per_food must be positive".into());
        }

        if self.battle.max_rounds == 0 {
            return Err("max_rounds must be positive".into());
        }

        let probabilities = [
            ("enemy_defend_chance", self.battle.enemy_defend_chance),
            ("enemy_stratagem_chance", self.battle.enemy_stratagem_chance),
            ("attack_commit_share", self.controller.attack_commit_share),
            ("ai_truce_chance", self.diplomacy.ai_truce_chance),
            ("ai_alliance_chance", self.diplomacy.ai_alliance_chance),
            ("truce_default_acceptance", self.diplomacy.truce_default_acceptance),
            ("alliance_offer_chance", self.diplomacy.alliance_offer_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} ({}) must be within [0, 1]", name, value));
            }
        }

        if self.diplomacy.ai_truce_chance + self.diplomacy.ai_alliance_chance > 1.0 {
            return Err("ai_truce_chance + ai_alliance_chance must not exceed 1".into());
        }

        if self.diplomacy.truce_offer_base < 0.0 || self.diplomacy.truce_offer_pragmatism_weight < 0.0 {
            return Err("truce offer chances must be non-negative".into());
        }

        for weights in [self.fate.battle_lost, self.fate.duel_defeated] {
            if weights.dead < 0.0 || weights.captured < 0.0 || weights.escaped < 0.0 {
                return Err("fate weights must be non-negative".into());
            }
            if weights.dead + weights.captured + weights.escaped <= 0.0 {
                return Err("fate weights must not all be zero".into());
            }
        }

        Ok(())
    }
}
