//! WorldState - the full campaign snapshot
//!
//! Campaign operations take a `&WorldState` and hand back a new one, so
//! callers can keep earlier snapshots for replay or undo.

use serde::{Deserialize, Serialize};

use crate::campaign::faction::Faction;
use crate::campaign::region::Region;
use crate::campaign::relations::{DiplomaticProposal, RelationBook, RelationType};
use crate::core::error::{GameError, Result};
use crate::core::types::{FactionId, GeneralId, RegionId};

/// A general held captive by another faction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prisoner {
    pub general: GeneralId,
    pub captor: FactionId,
    pub location: RegionId,
    pub captured_turn: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub turn: u32,
    pub player_faction: FactionId,
    /// Orders the player may still issue this turn
    pub player_actions: u32,
    /// Sorted by id
    pub factions: Vec<Faction>,
    /// Sorted by id
    pub regions: Vec<Region>,
    #[serde(default)]
    pub relations: RelationBook,
    #[serde(default)]
    pub prisoners: Vec<Prisoner>,
    #[serde(default)]
    pub proposals: Vec<DiplomaticProposal>,
}

impl WorldState {
    pub fn new(turn: u32, player_faction: FactionId, mut factions: Vec<Faction>, mut regions: Vec<Region>) -> Self {
        factions.sort_by_key(|f| f.id);
        regions.sort_by_key(|r| r.id);
        Self {
            turn,
            player_faction,
            player_actions: 0,
            factions,
            regions,
            relations: RelationBook::new(),
            prisoners: Vec::new(),
            proposals: Vec::new(),
        }
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions
            .binary_search_by_key(&id, |f| f.id)
            .ok()
            .map(|i| &self.factions[i])
    }

    pub fn has_faction(&self, id: FactionId) -> bool {
        self.faction(id).is_some()
    }

    pub fn faction_ids(&self) -> Vec<FactionId> {
        self.factions.iter().map(|f| f.id).collect()
    }

    /// Every faction the player does not control
    pub fn ai_factions(&self) -> Vec<FactionId> {
        self.factions
            .iter()
            .map(|f| f.id)
            .filter(|id| *id != self.player_faction)
            .collect()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.regions[i])
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        match self.regions.binary_search_by_key(&id, |r| r.id) {
            Ok(i) => Some(&mut self.regions[i]),
            Err(_) => None,
        }
    }

    pub fn regions_of(&self, faction: FactionId) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.owner == faction)
    }

    pub fn relation(&self, a: FactionId, b: FactionId) -> RelationType {
        self.relations.get(a, b)
    }

    /// True if some region of `a` is adjacent to some region of `b`
    pub fn borders(&self, a: FactionId, b: FactionId) -> bool {
        a != b
            && self.regions_of(a).any(|region| {
                region
                    .adjacent
                    .iter()
                    .filter_map(|adj| self.region(*adj))
                    .any(|other| other.owner == b)
            })
    }

    pub fn is_prisoner(&self, general: GeneralId) -> bool {
        self.prisoners.iter().any(|p| p.general == general)
    }

    /// Record a capture. A general already held is left as is.
    pub fn take_prisoner(&mut self, general: GeneralId, captor: FactionId, location: RegionId) -> bool {
        if self.is_prisoner(general) {
            return false;
        }
        self.prisoners.push(Prisoner {
            general,
            captor,
            location,
            captured_turn: self.turn,
        });
        true
    }

    /// Region where a general is stationed
    pub fn station_of(&self, general: GeneralId) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|r| r.generals.contains(&general))
            .map(|r| r.id)
    }

    /// Check structural consistency: known owners, symmetric adjacency,
    /// no self-adjacency and unique ids.
    pub fn validate(&self) -> Result<()> {
        if !self.has_faction(self.player_faction) {
            return Err(GameError::UnknownFaction(self.player_faction));
        }
        if self.factions.windows(2).any(|w| w[0].id == w[1].id) {
            return Err(GameError::InvalidScenario("duplicate faction id".into()));
        }
        if self.regions.windows(2).any(|w| w[0].id == w[1].id) {
            return Err(GameError::InvalidScenario("duplicate region id".into()));
        }

        for region in &self.regions {
            if !self.has_faction(region.owner) {
                return Err(GameError::UnknownFaction(region.owner));
            }
            for adj in &region.adjacent {
                if *adj == region.id {
                    return Err(GameError::InvalidScenario(format!("{} is adjacent to itself", region.id)));
                }
                let other = self.region(*adj).ok_or(GameError::UnknownRegion(*adj))?;
                if !other.is_adjacent(region.id) {
                    return Err(GameError::InvalidScenario(format!(
                        "adjacency {} -> {} is not symmetric",
                        region.id, other.id
                    )));
                }
            }
        }

        for relation in self.relations.iter() {
            for faction in [relation.faction1, relation.faction2] {
                if !self.has_faction(faction) {
                    return Err(GameError::UnknownFaction(faction));
                }
            }
        }

        Ok(())
    }
}
