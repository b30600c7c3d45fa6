//! Faction - a warlord's realm

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// Display data for a faction. Territory is tracked on regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    /// Map color as a hex string
    #[serde(default)]
    pub color: String,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::new(),
        }
    }
}
