use thiserror::Error;

use crate::core::types::{FactionId, GeneralId, RegionId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown faction: {0}")]
    UnknownFaction(FactionId),

    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    #[error("Unknown general: {0}")]
    UnknownGeneral(GeneralId),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
