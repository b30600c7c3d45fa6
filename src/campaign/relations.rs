//! Diplomatic relations between factions
//!
//! Relations are stored per unordered pair. A missing entry means
//! neutral.

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Alliance,
    Truce,
    Tribute,
    Hostile,
    #[default]
    Neutral,
}

impl RelationType {
    /// Alliances and truces forbid attacks
    pub fn is_peaceful(&self) -> bool {
        matches!(self, RelationType::Alliance | RelationType::Truce)
    }
}

/// Normalize a pair so (a, b) and (b, a) share one key
pub fn ordered_pair(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaticRelation {
    pub faction1: FactionId,
    pub faction2: FactionId,
    pub relation_type: RelationType,
    pub start_turn: u32,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl DiplomaticRelation {
    pub fn involves(&self, faction: FactionId) -> bool {
        self.faction1 == faction || self.faction2 == faction
    }

    pub fn other(&self, faction: FactionId) -> Option<FactionId> {
        if self.faction1 == faction {
            Some(self.faction2)
        } else if self.faction2 == faction {
            Some(self.faction1)
        } else {
            None
        }
    }

    /// First turn on which the relation no longer holds
    pub fn expires_at(&self) -> Option<u32> {
        self.duration.map(|d| self.start_turn + d)
    }
}

/// All non-neutral relations, at most one per unordered pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationBook {
    relations: Vec<DiplomaticRelation>,
}

impl RelationBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_relations(relations: impl IntoIterator<Item = DiplomaticRelation>) -> Self {
        let mut book = Self::new();
        for r in relations {
            book.set(r.faction1, r.faction2, r.relation_type, r.start_turn, r.duration);
        }
        book
    }

    pub fn entry(&self, a: FactionId, b: FactionId) -> Option<&DiplomaticRelation> {
        let (f1, f2) = ordered_pair(a, b);
        self.relations.iter().find(|r| r.faction1 == f1 && r.faction2 == f2)
    }

    pub fn get(&self, a: FactionId, b: FactionId) -> RelationType {
        self.entry(a, b).map(|r| r.relation_type).unwrap_or_default()
    }

    /// Replace the relation for a pair. Setting neutral removes it.
    pub fn set(&mut self, a: FactionId, b: FactionId, relation_type: RelationType, turn: u32, duration: Option<u32>) {
        if a == b {
            return;
        }
        let (f1, f2) = ordered_pair(a, b);
        self.relations.retain(|r| !(r.faction1 == f1 && r.faction2 == f2));
        if relation_type == RelationType::Neutral {
            return;
        }
        self.relations.push(DiplomaticRelation {
            faction1: f1,
            faction2: f2,
            relation_type,
            start_turn: turn,
            duration,
        });
        self.relations.sort_by_key(|r| (r.faction1, r.faction2));
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiplomaticRelation> {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Factions the given faction is hostile to
    pub fn enemies_of(&self, faction: FactionId) -> Vec<FactionId> {
        self.relations
            .iter()
            .filter(|r| r.relation_type == RelationType::Hostile)
            .filter_map(|r| r.other(faction))
            .collect()
    }

    /// Drop relations whose duration has run out by `turn`
    pub fn expire(&mut self, turn: u32) -> Vec<DiplomaticRelation> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .relations
            .drain(..)
            .partition(|r| r.expires_at().is_some_and(|end| end <= turn));
        self.relations = kept;
        expired
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A proposal between two factions. Answered proposals are dropped at
/// the end of the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaticProposal {
    pub from: FactionId,
    pub to: FactionId,
    pub proposal_type: RelationType,
    pub turn: u32,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub status: ProposalStatus,
}

impl DiplomaticProposal {
    pub fn new(from: FactionId, to: FactionId, proposal_type: RelationType, turn: u32, duration: Option<u32>) -> Self {
        Self {
            from,
            to,
            proposal_type,
            turn,
            duration,
            status: ProposalStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_relation_is_neutral() {
        let book = RelationBook::new();
        assert_eq!(book.get(FactionId(1), FactionId(2)), RelationType::Neutral);
    }

    #[test]
    fn test_pair_is_unordered() {
        let mut book = RelationBook::new();
        book.set(FactionId(2), FactionId(1), RelationType::Alliance, 1, None);
        assert_eq!(book.get(FactionId(1), FactionId(2)), RelationType::Alliance);
        assert_eq!(book.entry(FactionId(1), FactionId(2)).map(|r| r.faction1), Some(FactionId(1)));
    }

    #[test]
    fn test_one_entry_per_pair() {
        let mut book = RelationBook::new();
        book.set(FactionId(1), FactionId(2), RelationType::Hostile, 1, None);
        book.set(FactionId(2), FactionId(1), RelationType::Truce, 2, Some(5));
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(FactionId(1), FactionId(2)), RelationType::Truce);

        book.set(FactionId(1), FactionId(2), RelationType::Neutral, 3, None);
        assert!(book.is_empty());
    }

    #[test]
    fn test_expire_by_duration() {
        let mut book = RelationBook::new();
        book.set(FactionId(1), FactionId(2), RelationType::Truce, 3, Some(5));
        book.set(FactionId(1), FactionId(3), RelationType::Alliance, 3, None);

        assert!(book.expire(7).is_empty());
        let expired = book.expire(8);
        assert_eq!(expired.len(), 1);
        assert_eq!(book.get(FactionId(1), FactionId(2)), RelationType::Neutral);
        assert_eq!(book.get(FactionId(1), FactionId(3)), RelationType::Alliance);
    }

    #[test]
    fn test_enemies_of() {
        let mut book = RelationBook::new();
        book.set(FactionId(1), FactionId(2), RelationType::Hostile, 1, None);
        book.set(FactionId(3), FactionId(1), RelationType::Hostile, 1, None);
        book.set(FactionId(1), FactionId(4), RelationType::Truce, 1, None);
        let mut enemies = book.enemies_of(FactionId(1));
        enemies.sort();
        assert_eq!(enemies, vec![FactionId(2), FactionId(3)]);
    }

    #[test]
    fn test_self_relation_ignored() {
        let mut book = RelationBook::new();
        book.set(FactionId(1), FactionId(1), RelationType::Hostile, 1, None);
        assert!(book.is_empty());
    }
}
