//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use warlords::campaign::{Faction, General, Region, WorldState};
use warlords::combat::{BattleUnit, TroopType};
use warlords::core::types::{FactionId, GeneralId, RegionId};
use warlords::rules::Rules;

pub fn scenario_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/scenario.toml")
}

pub fn general(id: u32, faction: u32, might: u32, intellect: u32) -> General {
    General::new(GeneralId(id), format!("General {}", id), FactionId(faction)).with_stats(might, intellect, 50, 50)
}

pub fn unit(might: u32, intellect: u32, troops: u32, troop_type: TroopType) -> BattleUnit {
    BattleUnit::new(general(might, 1, might, intellect), troops).with_troop_type(troop_type)
}

pub fn region(id: u32, owner: u32, troops: u32, adjacent: &[u32]) -> Region {
    let mut r = Region::new(RegionId(id), format!("Region {}", id), FactionId(owner));
    r.troops = troops;
    r.adjacent = adjacent.iter().copied().map(RegionId).collect();
    r
}

/// A ring of four regions, one per faction; faction 1 is the player.
/// Faction 3 sits opposite the player and does not border it.
///
/// ```text
/// 1 - 2
/// |   |
/// 4 - 3
/// ```
pub fn ring_world(troops: u32) -> WorldState {
    let mut world = WorldState::new(
        1,
        FactionId(1),
        (1..=4).map(|i| Faction::new(FactionId(i), format!("Faction {}", i))).collect(),
        vec![
            region(1, 1, troops, &[2, 4]),
            region(2, 2, troops, &[1, 3]),
            region(3, 3, troops, &[2, 4]),
            region(4, 4, troops, &[1, 3]),
        ],
    );
    world.player_actions = 3;
    world
}

pub fn rules() -> Rules {
    Rules::default()
}
