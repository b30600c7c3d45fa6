//! Battle system - multi-round skirmish between two commanded armies
//!
//! Each player action resolves one enemy counter-action:
//! selection -> {charge, defend, stratagem} -> selection, or
//! selection -> duel -> selection, until victory or defeat.

pub mod enemy_ai;
pub mod execution;
pub mod state;

pub use enemy_ai::{choose_counter_action, choose_duel_move};
pub use execution::{resolve_battle_round, resolve_duel_round};
pub use state::{BattleAction, BattleEvent, BattleEventType, BattlePhase, BattleState};
