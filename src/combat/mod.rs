//! Combat resolution
//!
//! Stateless arithmetic for troop damage, duels, morale and rout, the
//! stratagem table, and the fate of defeated commanders.

pub mod constants;
pub mod fate;
pub mod math;
pub mod stratagem;
pub mod troop_type;
pub mod unit;

pub use fate::{fate_probabilities, resolve_fate, Fate, FateContext, FateProbabilities, GeneralFate};
pub use math::{
    apply_morale_change, apply_troop_damage, calculate_damage, check_rout, expected_damage,
    resolve_duel, DuelChoice, DuelOutcome, DuelWinner,
};
pub use stratagem::{apply_stratagem, Stratagem, StratagemCatalog, StratagemOutcome, StratagemSpecial};
pub use troop_type::{has_advantage, TroopType};
pub use unit::BattleUnit;
