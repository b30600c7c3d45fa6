//! Troop types and the advantage triangle

use serde::{Deserialize, Serialize};

/// Branch of an army. Infantry beats archers, archers beat cavalry,
/// cavalry beats infantry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroopType {
    #[default]
    Infantry,
    Cavalry,
    Archer,
}

impl TroopType {
    pub fn all() -> &'static [TroopType] {
        &[TroopType::Infantry, TroopType::Cavalry, TroopType::Archer]
    }

    /// The troop type this one has the advantage over
    pub fn prey(&self) -> TroopType {
        match self {
            TroopType::Infantry => TroopType::Archer,
            TroopType::Archer => TroopType::Cavalry,
            TroopType::Cavalry => TroopType::Infantry,
        }
    }

    pub fn beats(&self, other: TroopType) -> bool {
        self.prey() == other
    }
}

pub fn has_advantage(attacker: TroopType, defender: TroopType) -> bool {
    attacker.beats(defender)
}
