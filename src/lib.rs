//! Warlords - turn-based strategy core
//!
//! Combat resolution between commanded armies and the autonomous
//! faction AI that drives a campaign turn. Everything operates on plain
//! data; rendering, input and persistence live elsewhere.

pub mod battle;
pub mod campaign;
pub mod combat;
pub mod core;
pub mod rules;
