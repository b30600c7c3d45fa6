//! Turn pipeline
//!
//! A campaign turn runs: player orders, then `process_all_ai_turns`,
//! then `end_turn`. AI factions act one after another in id order and
//! each sees the world as the previous faction left it.

use crate::campaign::analysis::{analyze_factions, find_analysis};
use crate::campaign::controller::process_faction_turn;
use crate::campaign::diplomacy::{decide_ai_diplomacy, decide_ai_war_declaration, process_ai_to_ai_diplomacy};
use crate::campaign::events::{TurnEventType, TurnOutcome};
use crate::campaign::relations::{ProposalStatus, RelationType};
use crate::campaign::world::WorldState;
use crate::core::rng::RandomSource;
use crate::rules::Rules;

pub fn process_all_ai_turns(world: &WorldState, rules: &Rules, rng: &mut impl RandomSource) -> TurnOutcome {
    let config = &rules.config;
    let personalities = &rules.data.personalities;
    let mut next = world.clone();
    let mut logs = Vec::new();

    for faction in world.ai_factions() {
        let analyses = analyze_factions(&next);
        let Some(analysis) = find_analysis(&analyses, faction) else {
            continue;
        };
        if !analysis.is_alive() {
            continue;
        }

        let (after, mut log) = process_faction_turn(&next, faction, analysis, config);
        next = after;

        let analyses = analyze_factions(&next);
        if let Some(proposal) =
            decide_ai_diplomacy(&next, &analyses, faction, personalities, &config.diplomacy, rng)
        {
            log.push(
                next.turn,
                TurnEventType::ProposalSent {
                    to: proposal.to,
                    proposal_type: proposal.proposal_type,
                },
                format!("{} proposes a {:?}", faction, proposal.proposal_type),
            );
            next.proposals.push(proposal);
        }

        if let Some(target) = decide_ai_war_declaration(&next, &analyses, faction, personalities, &config.diplomacy, rng)
        {
            let turn = next.turn;
            next.relations.set(faction, target, RelationType::Hostile, turn, None);
            log.push(
                turn,
                TurnEventType::WarDeclared { against: target },
                format!("{} declares war on {}", faction, target),
            );
        }

        logs.push(log);
    }

    let analyses = analyze_factions(&next);
    let (next, diplomacy) = process_ai_to_ai_diplomacy(&next, &analyses, &config.diplomacy, rng);

    tracing::info!(turn = next.turn, factions = logs.len(), "AI phase complete");
    TurnOutcome {
        world: next,
        logs,
        diplomacy,
    }
}

/// Income, upkeep, growth and relation expiry, then advance the turn
pub fn end_turn(world: &WorldState, rules: &Rules) -> WorldState {
    let economy = &rules.config.economy;
    let mut next = world.clone();

    for region in &mut next.regions {
        let tax = region.population / 1000 * economy.tax_per_thousand;
        region.gold = region
            .gold
            .saturating_add(region.commerce * economy.gold_per_commerce)
            .saturating_add(tax);
        region.food = region.food.saturating_add(region.agriculture * economy.food_per_agriculture);

        let upkeep = region.troops / economy.troops_per_food.max(1);
        region.food = region.food.saturating_sub(upkeep);

        let growth = (region.population as f64 * economy.growth_rate).floor() as u32;
        region.population = region.population.saturating_add(growth).min(economy.population_cap.max(region.population));
    }

    next.turn += 1;
    let expired = next.relations.expire(next.turn);
    for relation in &expired {
        tracing::debug!(a = %relation.faction1, b = %relation.faction2, kind = ?relation.relation_type, "Relation expired");
    }
    let turn = next.turn;
    next.proposals
        .retain(|p| p.status == ProposalStatus::Pending && p.turn + 1 >= turn);
    next.player_actions = rules.config.controller.action_budget;

    tracing::info!(turn = next.turn, expired = expired.len(), "Turn ended");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::faction::Faction;
    use crate::campaign::region::Region;
    use crate::campaign::relations::DiplomaticProposal;
    use crate::core::rng::ScriptedRng;
    use crate::core::types::{FactionId, RegionId};

    fn world() -> WorldState {
        let mut home = Region::new(RegionId(1), "Xuchang", FactionId(1));
        home.gold = 100;
        home.food = 100;
        home.population = 20000;
        home.troops = 5000;
        home.agriculture = 50;
        home.commerce = 40;
        home.adjacent = vec![RegionId(2)];
        let mut other = Region::new(RegionId(2), "Hanzhong", FactionId(2));
        other.troops = 1000;
        other.adjacent = vec![RegionId(1)];
        WorldState::new(
            1,
            FactionId(1),
            vec![Faction::new(FactionId(1), "Wei"), Faction::new(FactionId(2), "Shu")],
            vec![home, other],
        )
    }

    #[test]
    fn test_end_turn_economy() {
        let next = end_turn(&world(), &Rules::default());
        let home = next.region(RegionId(1)).unwrap();
        // 100 + 40*10 + 20*5
        assert_eq!(home.gold, 600);
        // 100 + 50*20 - 5000/100
        assert_eq!(home.food, 1050);
        assert_eq!(home.population, 20200);
        assert_eq!(next.turn, 2);
        assert_eq!(next.player_actions, 3);
    }

    #[test]
    fn test_upkeep_never_negative() {
        let mut w = world();
        w.region_mut(RegionId(1)).unwrap().agriculture = 0;
        w.region_mut(RegionId(1)).unwrap().food = 10;
        let next = end_turn(&w, &Rules::default());
        assert_eq!(next.region(RegionId(1)).unwrap().food, 0);
    }

    #[test]
    fn test_population_cap() {
        let mut w = world();
        w.region_mut(RegionId(1)).unwrap().population = 99_900;
        let next = end_turn(&w, &Rules::default());
        assert_eq!(next.region(RegionId(1)).unwrap().population, 100_000);
    }

    #[test]
    fn test_relations_and_proposals_expire() {
        let mut w = world();
        w.turn = 7;
        w.relations.set(FactionId(1), FactionId(2), RelationType::Truce, 3, Some(5));
        w.proposals
            .push(DiplomaticProposal::new(FactionId(2), FactionId(1), RelationType::Truce, 6, Some(5)));
        w.proposals
            .push(DiplomaticProposal::new(FactionId(2), FactionId(1), RelationType::Alliance, 7, None));
        let mut answered = DiplomaticProposal::new(FactionId(2), FactionId(1), RelationType::Truce, 7, Some(5));
        answered.status = ProposalStatus::Rejected;
        w.proposals.push(answered);

        let next = end_turn(&w, &Rules::default());
        assert_eq!(next.relation(FactionId(1), FactionId(2)), RelationType::Neutral);
        assert_eq!(next.proposals.len(), 1);
        assert_eq!(next.proposals[0].turn, 7);
    }

    #[test]
    fn test_ai_phase_skips_player() {
        let w = world();
        let mut rng = ScriptedRng::constant(0.99);
        let outcome = process_all_ai_turns(&w, &Rules::default(), &mut rng);
        assert_eq!(outcome.logs.len(), 1);
        assert_eq!(outcome.logs[0].faction, FactionId(2));
        assert_eq!(outcome.world.region(RegionId(1)), w.region(RegionId(1)));
    }
}
