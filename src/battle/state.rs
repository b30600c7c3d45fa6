//! Battle state and log

use serde::{Deserialize, Serialize};

use crate::combat::{BattleUnit, DuelChoice, DuelWinner, Fate, GeneralFate};
use crate::core::config::BattleConfig;
use crate::core::types::Side;

/// Battle phases. Charge, defend and stratagem resolve within a single
/// round call and return straight to `Selection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Selection,
    Duel,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }
}

/// An action a side can take in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Charge,
    Defend,
    Stratagem(String),
    /// Challenge the enemy commander. Player only.
    Duel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    Charge { side: Side, damage: u32 },
    Defend { side: Side },
    Stratagem { side: Side, id: String, applied: bool },
    TurnLost { side: Side },
    MoraleShift { side: Side, delta: i32 },
    DuelChallenged,
    DuelExchange { player: DuelChoice, enemy: DuelChoice, winner: DuelWinner, damage: u32 },
    CommanderFell { side: Side, fate: Fate },
    Routed { side: Side },
    ActionRejected,
    BattleEnded { winner: Side },
}

/// Complete battle state. Treated as a value: every resolution call
/// returns a new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub player: BattleUnit,
    pub enemy: BattleUnit,
    /// Side that initiated the battle
    pub attacker: Side,
    pub phase: BattlePhase,
    /// Current round, starting at 1
    pub round: u32,
    pub max_rounds: u32,
    pub player_duel_health: u32,
    pub enemy_duel_health: u32,
    pub winner: Option<Side>,
    pub fates: Vec<GeneralFate>,
    pub log: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(player: BattleUnit, enemy: BattleUnit, attacker: Side, config: &BattleConfig) -> Self {
        let mut state = Self {
            player,
            enemy,
            attacker,
            phase: BattlePhase::Selection,
            round: 1,
            max_rounds: config.max_rounds,
            player_duel_health: config.duel_health,
            enemy_duel_health: config.duel_health,
            winner: None,
            fates: Vec::new(),
            log: Vec::new(),
        };
        let description = format!(
            "{} ({} troops) faces {} ({} troops)",
            state.player.general.name, state.player.troops, state.enemy.general.name, state.enemy.troops
        );
        state.log_event(BattleEventType::BattleStarted, description);
        state
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Side that holds the field on an exact tie
    pub fn defender(&self) -> Side {
        self.attacker.opponent()
    }

    pub fn unit(&self, side: Side) -> &BattleUnit {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn unit_mut(&mut self, side: Side) -> &mut BattleUnit {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// (acting unit, opposing unit)
    pub fn units_mut(&mut self, side: Side) -> (&mut BattleUnit, &mut BattleUnit) {
        match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }

    pub fn duel_health(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_duel_health,
            Side::Enemy => self.enemy_duel_health,
        }
    }

    pub fn duel_health_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player_duel_health,
            Side::Enemy => &mut self.enemy_duel_health,
        }
    }

    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.log.push(BattleEvent {
            round: self.round,
            event_type,
            description,
        });
    }

    pub fn fate_of(&self, side: Side) -> Option<&GeneralFate> {
        let id = self.unit(side).general.id;
        self.fates.iter().find(|f| f.general_id == id)
    }
}
