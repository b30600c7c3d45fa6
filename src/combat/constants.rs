//! Combat system constants - fixed bounds, not tunables
//!
//! Tunable rates live in `GameConfig`; these are the invariant limits.

pub const MORALE_MIN: u32 = 0;
pub const MORALE_MAX: u32 = 100;
pub const STARTING_MORALE: u32 = 100;

/// Training level at which the training factor is neutral
pub const NEUTRAL_TRAINING: u32 = 50;
pub const TRAINING_MAX: u32 = 100;

/// Training levels span a +/-25% damage swing
pub const TRAINING_DIVISOR: f64 = 200.0;

/// Might is read as a percentage bonus
pub const MIGHT_DIVISOR: f64 = 100.0;
