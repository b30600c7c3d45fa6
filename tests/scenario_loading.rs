//! Scenario file loading tests

mod common;

use std::path::Path;

use warlords::campaign::RelationType;
use warlords::core::types::{FactionId, GeneralId, RegionId};
use warlords::core::GameError;
use warlords::rules::load_scenario;

use common::scenario_path;

#[test]
fn test_load_bundled_scenario() {
    let scenario = load_scenario(&scenario_path()).expect("bundled scenario loads");
    let world = &scenario.world;

    assert_eq!(world.player_faction, FactionId(1));
    assert_eq!(world.factions.len(), 4);
    assert_eq!(world.regions.len(), 10);
    assert_eq!(scenario.rules.data.generals.len(), 11);
    assert_eq!(world.player_actions, 3);
    assert!(world.validate().is_ok());

    assert_eq!(world.relation(FactionId(4), FactionId(1)), RelationType::Hostile);
    assert_eq!(world.region(RegionId(5)).unwrap().generals, vec![GeneralId(4)]);
    assert_eq!(scenario.rules.data.personalities.get(FactionId(4)).aggressiveness, 0.9);
    // Wei has no entry and falls back to the default
    assert_eq!(scenario.rules.data.personalities.get(FactionId(1)).pragmatism, 0.5);
    assert_eq!(scenario.rules.data.stratagems.len(), 6);
}

#[test]
fn test_every_garrison_general_serves_region_owner() {
    let scenario = load_scenario(&scenario_path()).unwrap();
    for region in &scenario.world.regions {
        for id in &region.generals {
            let general = scenario.rules.data.general(*id).unwrap();
            assert_eq!(general.faction, region.owner, "{} in {}", general.name, region.name);
        }
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_scenario(Path::new("data/does_not_exist.toml"));
    assert!(matches!(result, Err(GameError::Io(_))));
}
