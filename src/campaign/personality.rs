//! Faction personalities
//!
//! Traits bias diplomatic decisions. Factions without an entry fall
//! back to the table's default, which is neutral on every trait.

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// Behavioral tendencies (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Willingness to start wars (0.0 = peaceful, 1.0 = warmonger)
    #[serde(default = "neutral_trait")]
    pub aggressiveness: f64,
    /// Tendency to seek and honor alliances
    #[serde(default = "neutral_trait")]
    pub trustworthiness: f64,
    /// Tendency to accept a bad peace over a good war
    #[serde(default = "neutral_trait")]
    pub pragmatism: f64,
}

fn neutral_trait() -> f64 {
    0.5
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggressiveness: 0.5,
            trustworthiness: 0.5,
            pragmatism: 0.5,
        }
    }
}

impl Personality {
    pub fn new(aggressiveness: f64, trustworthiness: f64, pragmatism: f64) -> Self {
        Self {
            aggressiveness: aggressiveness.clamp(0.0, 1.0),
            trustworthiness: trustworthiness.clamp(0.0, 1.0),
            pragmatism: pragmatism.clamp(0.0, 1.0),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("aggressiveness", self.aggressiveness),
            ("trustworthiness", self.trustworthiness),
            ("pragmatism", self.pragmatism),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within 0..=1, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Personality entry as written in scenario files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionPersonality {
    pub faction: FactionId,
    #[serde(flatten)]
    pub personality: Personality,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalityTable {
    default: Personality,
    entries: Vec<FactionPersonality>,
}

impl PersonalityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FactionPersonality>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.faction, entry.personality);
        }
        table
    }

    pub fn insert(&mut self, faction: FactionId, personality: Personality) {
        self.entries.retain(|e| e.faction != faction);
        self.entries.push(FactionPersonality { faction, personality });
    }

    /// Personality for a faction, or the default when none is set
    pub fn get(&self, faction: FactionId) -> Personality {
        self.entries
            .iter()
            .find(|e| e.faction == faction)
            .map(|e| e.personality)
            .unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_personality_values() {
        let p = Personality::default();
        assert_eq!(p.aggressiveness, 0.5);
        assert_eq!(p.trustworthiness, 0.5);
        assert_eq!(p.pragmatism, 0.5);
    }

    #[test]
    fn test_unknown_faction_falls_back() {
        let table = PersonalityTable::from_entries([FactionPersonality {
            faction: FactionId(2),
            personality: Personality::new(0.9, 0.1, 0.2),
        }]);
        assert_eq!(table.get(FactionId(2)).aggressiveness, 0.9);
        assert_eq!(table.get(FactionId(7)), Personality::default());
    }

    #[test]
    fn test_new_clamps_traits() {
        let p = Personality::new(1.5, -0.2, 0.3);
        assert_eq!(p.aggressiveness, 1.0);
        assert_eq!(p.trustworthiness, 0.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_entry() {
        let entry: FactionPersonality = toml::from_str("faction = 3\naggressiveness = 0.8\n").unwrap();
        assert_eq!(entry.faction, FactionId(3));
        assert_eq!(entry.personality.aggressiveness, 0.8);
        assert_eq!(entry.personality.pragmatism, 0.5);
    }
}
