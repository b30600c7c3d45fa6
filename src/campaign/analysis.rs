//! Faction strength analysis
//!
//! Snapshot of every faction's totals, power rank and threat level.
//! Recomputed from the world whenever it is needed; never cached
//! across mutations.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::campaign::world::WorldState;
use crate::core::types::FactionId;

/// Power credited per owned region
pub const REGION_POWER: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionAnalysis {
    pub faction: FactionId,
    pub total_troops: u64,
    pub total_gold: u64,
    pub total_food: u64,
    pub region_count: usize,
    /// Factions owning a region adjacent to one of ours, sorted
    pub bordering_factions: Vec<FactionId>,
    /// 1 is strongest
    pub power_rank: usize,
    /// 0 to 100
    pub threat_level: u32,
}

impl FactionAnalysis {
    pub fn power(&self) -> u64 {
        self.total_troops + self.region_count as u64 * REGION_POWER
    }

    pub fn is_alive(&self) -> bool {
        self.region_count > 0
    }

    pub fn borders(&self, other: FactionId) -> bool {
        self.bordering_factions.contains(&other)
    }
}

/// Analyze every faction. Output is ordered by faction id.
pub fn analyze_factions(world: &WorldState) -> Vec<FactionAnalysis> {
    let mut analyses: Vec<FactionAnalysis> = world
        .factions
        .iter()
        .map(|faction| {
            let mut analysis = FactionAnalysis {
                faction: faction.id,
                total_troops: 0,
                total_gold: 0,
                total_food: 0,
                region_count: 0,
                bordering_factions: Vec::new(),
                power_rank: 0,
                threat_level: 0,
            };
            let mut bordering = AHashSet::new();
            for region in world.regions_of(faction.id) {
                analysis.total_troops += region.troops as u64;
                analysis.total_gold += region.gold as u64;
                analysis.total_food += region.food as u64;
                analysis.region_count += 1;
                for neighbor in region.adjacent.iter().filter_map(|id| world.region(*id)) {
                    if neighbor.owner != faction.id {
                        bordering.insert(neighbor.owner);
                    }
                }
            }
            analysis.bordering_factions = bordering.into_iter().collect();
            analysis.bordering_factions.sort();
            analysis
        })
        .collect();

    // Rank by power, strongest first; ties go to the lower id
    let mut order: Vec<usize> = (0..analyses.len()).collect();
    order.sort_by(|&a, &b| {
        analyses[b]
            .power()
            .cmp(&analyses[a].power())
            .then(analyses[a].faction.cmp(&analyses[b].faction))
    });
    for (rank, index) in order.into_iter().enumerate() {
        analyses[index].power_rank = rank + 1;
    }

    let threats: Vec<u32> = analyses
        .iter()
        .map(|analysis| {
            let bordering_troops: u64 = analysis
                .bordering_factions
                .iter()
                .filter_map(|id| find_analysis(&analyses, *id))
                .map(|other| other.total_troops)
                .sum();
            threat_level(bordering_troops, analysis.total_troops)
        })
        .collect();
    for (analysis, threat) in analyses.iter_mut().zip(threats) {
        analysis.threat_level = threat;
    }

    tracing::debug!(factions = analyses.len(), "Analyzed factions");
    analyses
}

/// min(100, round(bordering / max(own, 1) * 50))
pub fn threat_level(bordering_troops: u64, own_troops: u64) -> u32 {
    let ratio = bordering_troops as f64 / own_troops.max(1) as f64;
    (ratio * 50.0).round().min(100.0) as u32
}

pub fn find_analysis(analyses: &[FactionAnalysis], faction: FactionId) -> Option<&FactionAnalysis> {
    analyses.iter().find(|a| a.faction == faction)
}
