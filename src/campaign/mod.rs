//! Campaign layer - the world map, AI factions and diplomacy
//!
//! Every entry point takes the current `WorldState` by reference and
//! returns the next one.

pub mod analysis;
pub mod controller;
pub mod diplomacy;
pub mod domestic;
pub mod events;
pub mod faction;
pub mod general;
pub mod orders;
pub mod personality;
pub mod region;
pub mod relations;
pub mod turn;
pub mod world;

pub use analysis::{analyze_factions, find_analysis, FactionAnalysis};
pub use controller::{find_best_attack, process_faction_turn, AttackPlan};
pub use diplomacy::{
    declare_war, decide_ai_diplomacy, decide_ai_war_declaration, process_ai_to_ai_diplomacy, propose_to_ai,
    respond_to_proposal, should_accept_proposal,
};
pub use domestic::{execute_domestic, DomesticCommand, OrderOutcome};
pub use events::{FactionTurnLog, TurnEvent, TurnEventType, TurnOutcome};
pub use faction::Faction;
pub use general::General;
pub use orders::{conclude_battle, issue_order, release_prisoner, IssuedOrder, PlayerOrder};
pub use personality::{FactionPersonality, Personality, PersonalityTable};
pub use region::Region;
pub use relations::{DiplomaticProposal, DiplomaticRelation, ProposalStatus, RelationBook, RelationType};
pub use turn::{end_turn, process_all_ai_turns};
pub use world::{Prisoner, WorldState};
