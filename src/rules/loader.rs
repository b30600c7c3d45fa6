//! Load a scenario (content tables + starting world) from TOML

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::campaign::faction::Faction;
use crate::campaign::general::General;
use crate::campaign::personality::{FactionPersonality, PersonalityTable};
use crate::campaign::region::Region;
use crate::campaign::relations::{DiplomaticRelation, RelationBook};
use crate::campaign::world::WorldState;
use crate::combat::stratagem::{Stratagem, StratagemCatalog};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::FactionId;
use crate::rules::{GameData, Rules};

/// On-disk layout of a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_start_turn")]
    pub start_turn: u32,
    pub player_faction: FactionId,
    #[serde(default)]
    pub config: GameConfig,
    pub factions: Vec<Faction>,
    pub regions: Vec<Region>,
    #[serde(default)]
    pub generals: Vec<General>,
    /// Replaces the standard catalog when present
    #[serde(default)]
    pub stratagems: Option<Vec<Stratagem>>,
    #[serde(default)]
    pub personalities: Vec<FactionPersonality>,
    #[serde(default)]
    pub relations: Vec<DiplomaticRelation>,
}

fn default_start_turn() -> u32 {
    1
}

/// A ready-to-play scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub rules: Rules,
    pub world: WorldState,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)?;
    let scenario = parse_scenario(&contents)?;
    tracing::info!(
        path = %path.display(),
        name = %scenario.name,
        factions = scenario.world.factions.len(),
        regions = scenario.world.regions.len(),
        "Loaded scenario"
    );
    Ok(scenario)
}

pub fn parse_scenario(contents: &str) -> Result<Scenario> {
    let file: ScenarioFile = toml::from_str(contents)?;
    build_scenario(file)
}

fn build_scenario(file: ScenarioFile) -> Result<Scenario> {
    file.config.validate().map_err(GameError::InvalidScenario)?;
    for entry in &file.personalities {
        entry.personality.validate().map_err(GameError::InvalidScenario)?;
    }

    let mut data = GameData {
        stratagems: match file.stratagems {
            Some(entries) => StratagemCatalog::from_entries(entries),
            None => StratagemCatalog::standard(),
        },
        personalities: PersonalityTable::from_entries(file.personalities),
        ..GameData::default()
    };
    for general in file.generals {
        if data.generals.contains_key(&general.id) {
            return Err(GameError::InvalidScenario(format!("duplicate general {}", general.id)));
        }
        data.add_general(general);
    }

    let mut world = WorldState::new(file.start_turn, file.player_faction, file.factions, file.regions);
    world.player_actions = file.config.controller.action_budget;
    world.relations = RelationBook::from_relations(file.relations);
    world.validate()?;

    for region in &world.regions {
        for general in &region.generals {
            if data.general(*general).is_none() {
                return Err(GameError::UnknownGeneral(*general));
            }
        }
    }

    Ok(Scenario {
        name: file.name,
        rules: Rules::new(data, file.config),
        world,
    })
}
