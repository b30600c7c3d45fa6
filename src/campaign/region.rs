//! Region - a province on the campaign map

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, GeneralId, RegionId};

/// A province. Persistent across turns; the owner changes on conquest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub owner: FactionId,

    // Resources
    pub gold: u32,
    pub food: u32,
    pub population: u32,
    pub troops: u32,

    // Development (0 to 100)
    #[serde(default)]
    pub agriculture: u32,
    #[serde(default)]
    pub commerce: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default = "default_training")]
    pub training: u32,

    // Geography
    pub adjacent: Vec<RegionId>,

    /// Generals stationed here
    #[serde(default)]
    pub generals: Vec<GeneralId>,
}

fn default_training() -> u32 {
    50
}

impl Region {
    pub fn new(id: RegionId, name: impl Into<String>, owner: FactionId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            gold: 0,
            food: 0,
            population: 0,
            troops: 0,
            agriculture: 0,
            commerce: 0,
            defense: 0,
            training: default_training(),
            adjacent: Vec::new(),
            generals: Vec::new(),
        }
    }

    pub fn is_adjacent(&self, other: RegionId) -> bool {
        self.adjacent.contains(&other)
    }

    /// Mean of agriculture and commerce
    pub fn development(&self) -> u32 {
        (self.agriculture + self.commerce) / 2
    }
}
