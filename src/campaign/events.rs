//! Turn log types for AI factions

use serde::{Deserialize, Serialize};

use crate::campaign::domestic::DomesticCommand;
use crate::campaign::relations::RelationType;
use crate::campaign::world::WorldState;
use crate::core::types::{FactionId, GeneralId, RegionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEventType {
    Attack {
        from: RegionId,
        to: RegionId,
        defender: FactionId,
        committed: u32,
        success: bool,
        attacker_losses: u32,
        defender_losses: u32,
        captured: Vec<GeneralId>,
    },
    Domestic {
        region: RegionId,
        command: DomesticCommand,
    },
    ProposalSent {
        to: FactionId,
        proposal_type: RelationType,
    },
    WarDeclared {
        against: FactionId,
    },
    RelationFormed {
        faction1: FactionId,
        faction2: FactionId,
        relation_type: RelationType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: u32,
    pub event_type: TurnEventType,
    pub description: String,
}

/// Everything one AI faction did in a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionTurnLog {
    pub faction: FactionId,
    pub actions_used: u32,
    pub events: Vec<TurnEvent>,
}

impl FactionTurnLog {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            actions_used: 0,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, turn: u32, event_type: TurnEventType, description: impl Into<String>) {
        self.events.push(TurnEvent {
            turn,
            event_type,
            description: description.into(),
        });
    }

    pub fn attacks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.event_type, TurnEventType::Attack { .. }))
            .count()
    }
}

/// Result of the AI phase: the new world plus what happened
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub world: WorldState,
    pub logs: Vec<FactionTurnLog>,
    /// Relations formed between AI factions
    pub diplomacy: Vec<TurnEvent>,
}
