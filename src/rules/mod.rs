//! Static game content plus tunables
//!
//! `Rules` is passed explicitly to every entry point that needs
//! content lookups or constants.

mod loader;

pub use loader::{load_scenario, parse_scenario, Scenario, ScenarioFile};

use std::collections::BTreeMap;

use crate::campaign::general::General;
use crate::campaign::personality::PersonalityTable;
use crate::combat::stratagem::StratagemCatalog;
use crate::core::config::GameConfig;
use crate::core::types::GeneralId;

/// Read-only content tables
#[derive(Debug, Clone)]
pub struct GameData {
    pub generals: BTreeMap<GeneralId, General>,
    pub stratagems: StratagemCatalog,
    pub personalities: PersonalityTable,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            generals: BTreeMap::new(),
            stratagems: StratagemCatalog::standard(),
            personalities: PersonalityTable::new(),
        }
    }
}

impl GameData {
    pub fn general(&self, id: GeneralId) -> Option<&General> {
        self.generals.get(&id)
    }

    pub fn add_general(&mut self, general: General) {
        self.generals.insert(general.id, general);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub data: GameData,
    pub config: GameConfig,
}

impl Rules {
    pub fn new(data: GameData, config: GameConfig) -> Self {
        Self { data, config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FactionId;

    #[test]
    fn test_default_rules_carry_standard_stratagems() {
        let rules = Rules::default();
        assert!(rules.data.stratagems.get("fire_attack").is_some());
        assert!(rules.config.validate().is_ok());
    }

    #[test]
    fn test_general_lookup() {
        let mut data = GameData::default();
        data.add_general(General::new(GeneralId(3), "Zhang Liao", FactionId(1)));
        assert_eq!(data.general(GeneralId(3)).map(|g| g.name.as_str()), Some("Zhang Liao"));
        assert!(data.general(GeneralId(4)).is_none());
    }
}
