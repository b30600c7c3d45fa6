//! General - commanders who lead armies and hold regions

use serde::{Deserialize, Serialize};

use crate::combat::TroopType;
use crate::core::types::{FactionId, GeneralId};

/// A commander. Immutable reference data, looked up by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub id: GeneralId,
    pub name: String,
    /// Faction the general originally serves
    pub faction: FactionId,
    pub might: u32,
    pub intellect: u32,
    pub politics: u32,
    pub charisma: u32,
    /// Branch of troops the general leads into battle
    #[serde(default)]
    pub troop_type: TroopType,
}

impl General {
    pub fn new(id: GeneralId, name: impl Into<String>, faction: FactionId) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            might: 50,
            intellect: 50,
            politics: 50,
            charisma: 50,
            troop_type: TroopType::Infantry,
        }
    }

    pub fn with_stats(mut self, might: u32, intellect: u32, politics: u32, charisma: u32) -> Self {
        self.might = might.min(100);
        self.intellect = intellect.min(100);
        self.politics = politics.min(100);
        self.charisma = charisma.min(100);
        self
    }

    pub fn with_troop_type(mut self, troop_type: TroopType) -> Self {
        self.troop_type = troop_type;
        self
    }

    /// Leader of last resort for a region with no garrison general
    pub fn militia_captain(faction: FactionId) -> Self {
        Self::new(GeneralId(0), "Militia Captain", faction).with_stats(40, 30, 30, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_capped_at_100() {
        let general = General::new(GeneralId(1), "Lu Bu", FactionId(1)).with_stats(150, 30, 20, 40);
        assert_eq!(general.might, 100);
        assert_eq!(general.intellect, 30);
    }

    #[test]
    fn test_troop_type_defaults_when_missing() {
        let general: General = toml::from_str(
            "id = 3\nname = \"Zhang Fei\"\nfaction = 2\nmight = 97\nintellect = 30\npolitics = 22\ncharisma = 44\n",
        )
        .unwrap();
        assert_eq!(general.troop_type, TroopType::Infantry);
        assert_eq!(general.might, 97);
    }
}
