//! Diplomacy engine
//!
//! Personality-weighted decisions on proposals, war declarations and
//! background AI-to-AI relations. Every decision past the hard
//! exclusions consults the random source.

use crate::campaign::analysis::{find_analysis, FactionAnalysis};
use crate::campaign::domestic::OrderOutcome;
use crate::campaign::events::{TurnEvent, TurnEventType};
use crate::campaign::personality::PersonalityTable;
use crate::campaign::relations::{DiplomaticProposal, ProposalStatus, RelationType};
use crate::campaign::world::WorldState;
use crate::core::config::DiplomacyConfig;
use crate::core::rng::RandomSource;
use crate::core::types::FactionId;
use crate::rules::Rules;

/// Whether the addressee of a proposal agrees to it
pub fn should_accept_proposal(
    world: &WorldState,
    analyses: &[FactionAnalysis],
    proposal: &DiplomaticProposal,
    personalities: &PersonalityTable,
    config: &DiplomacyConfig,
    rng: &mut impl RandomSource,
) -> bool {
    let (Some(proposer), Some(responder)) = (
        find_analysis(analyses, proposal.from),
        find_analysis(analyses, proposal.to),
    ) else {
        return false;
    };
    if proposal.from == proposal.to || !world.has_faction(proposal.from) || !world.has_faction(proposal.to) {
        return false;
    }

    let current = world.relation(proposal.from, proposal.to);
    let personality = personalities.get(proposal.to);

    let threshold = match proposal.proposal_type {
        RelationType::Alliance => {
            if matches!(current, RelationType::Alliance | RelationType::Hostile) {
                return false;
            }
            let mut p = config.alliance_base_acceptance;
            if proposer.power_rank < responder.power_rank {
                p += config.alliance_outranked_bonus;
            }
            if share_enemy(world, proposal.from, proposal.to) {
                p += config.alliance_common_enemy_bonus;
            }
            if responder.threat_level >= config.high_threat_level {
                p += config.alliance_threat_bonus;
            }
            p - personality.aggressiveness * config.aggression_rejection_weight
        }
        RelationType::Truce => {
            if matches!(current, RelationType::Alliance | RelationType::Truce) {
                return false;
            }
            let losing = (responder.total_troops as f64) < proposer.total_troops as f64 * config.losing_ratio;
            if current == RelationType::Hostile && losing {
                config.truce_losing_acceptance
            } else if responder.bordering_factions.len() >= config.many_borders {
                config.truce_many_borders_acceptance
            } else if personality.pragmatism > config.pragmatic_threshold {
                config.truce_pragmatic_acceptance
            } else {
                config.truce_default_acceptance
            }
        }
        RelationType::Tribute => {
            if current == RelationType::Tribute {
                return false;
            }
            // Only a clearly weaker faction agrees to pay
            if (responder.power() as f64) < proposer.power() as f64 * config.losing_ratio {
                config.truce_pragmatic_acceptance * personality.pragmatism
            } else {
                0.0
            }
        }
        RelationType::Hostile | RelationType::Neutral => return false,
    };

    let accepted = rng.chance(threshold.clamp(0.0, 1.0));
    tracing::debug!(
        from = %proposal.from,
        to = %proposal.to,
        kind = ?proposal.proposal_type,
        threshold,
        accepted,
        "Proposal answered"
    );
    accepted
}

/// True if some third faction is hostile to both
fn share_enemy(world: &WorldState, a: FactionId, b: FactionId) -> bool {
    let b_enemies = world.relations.enemies_of(b);
    world
        .relations
        .enemies_of(a)
        .into_iter()
        .any(|enemy| enemy != a && enemy != b && b_enemies.contains(&enemy))
}

/// At most one outbound proposal from an AI faction to the player
pub fn decide_ai_diplomacy(
    world: &WorldState,
    analyses: &[FactionAnalysis],
    faction: FactionId,
    personalities: &PersonalityTable,
    config: &DiplomacyConfig,
    rng: &mut impl RandomSource,
) -> Option<DiplomaticProposal> {
    let player = world.player_faction;
    if faction == player {
        return None;
    }
    let own = find_analysis(analyses, faction)?;
    let theirs = find_analysis(analyses, player)?;
    if !own.is_alive() || !own.borders(player) {
        return None;
    }

    let current = world.relation(faction, player);
    if current.is_peaceful() {
        return None;
    }

    let personality = personalities.get(faction);
    let truce = || DiplomaticProposal::new(faction, player, RelationType::Truce, world.turn, Some(config.truce_duration));

    let losing = (own.total_troops as f64) < theirs.total_troops as f64 * config.losing_ratio;
    if current == RelationType::Hostile && losing {
        if rng.chance(config.truce_offer_base + personality.pragmatism * config.truce_offer_pragmatism_weight) {
            tracing::info!(faction = %faction, "Suing for peace");
            return Some(truce());
        }
        return None;
    }

    let mut p = config.proposal_base_chance + own.threat_level as f64 / 100.0 * config.proposal_threat_weight;
    if theirs.power_rank < own.power_rank {
        p += config.proposal_outranked_bonus;
    }
    if !rng.chance(p.clamp(0.0, 1.0)) {
        return None;
    }

    let proposal = if current != RelationType::Hostile
        && personality.trustworthiness >= config.trustworthy_threshold
        && rng.chance(config.alliance_offer_chance)
    {
        DiplomaticProposal::new(faction, player, RelationType::Alliance, world.turn, None)
    } else {
        truce()
    };
    tracing::info!(faction = %faction, kind = ?proposal.proposal_type, "Proposal to player");
    Some(proposal)
}

/// A bordering, neutral faction this one decides to attack, if any
pub fn decide_ai_war_declaration(
    world: &WorldState,
    analyses: &[FactionAnalysis],
    faction: FactionId,
    personalities: &PersonalityTable,
    config: &DiplomacyConfig,
    rng: &mut impl RandomSource,
) -> Option<FactionId> {
    let personality = personalities.get(faction);
    if personality.aggressiveness < config.war_min_aggressiveness {
        return None;
    }
    let own = find_analysis(analyses, faction)?;
    let required_ratio = config.war_base_ratio + (1.0 - personality.aggressiveness) * config.war_aggression_span;

    for target in &own.bordering_factions {
        if world.relation(faction, *target) != RelationType::Neutral {
            continue;
        }
        let Some(theirs) = find_analysis(analyses, *target) else {
            continue;
        };
        if (own.total_troops as f64) <= theirs.total_troops as f64 * required_ratio {
            continue;
        }
        if rng.chance(personality.aggressiveness * config.war_declare_scale) {
            tracing::info!(faction = %faction, target = %target, "War declared");
            return Some(*target);
        }
    }
    None
}

/// Background relation forming between bordering AI factions
pub fn process_ai_to_ai_diplomacy(
    world: &WorldState,
    analyses: &[FactionAnalysis],
    config: &DiplomacyConfig,
    rng: &mut impl RandomSource,
) -> (WorldState, Vec<TurnEvent>) {
    let mut next = world.clone();
    let mut events = Vec::new();
    let ai = world.ai_factions();

    for (i, a) in ai.iter().enumerate() {
        for b in &ai[i + 1..] {
            let (Some(left), Some(right)) = (find_analysis(analyses, *a), find_analysis(analyses, *b)) else {
                continue;
            };
            if !left.is_alive() || !right.is_alive() || !left.borders(*b) {
                continue;
            }
            if next.relation(*a, *b) != RelationType::Neutral {
                continue;
            }

            let roll = rng.next_f64();
            let formed = if roll < config.ai_truce_chance {
                Some((RelationType::Truce, Some(config.truce_duration)))
            } else if roll < config.ai_truce_chance + config.ai_alliance_chance {
                Some((RelationType::Alliance, None))
            } else {
                None
            };

            if let Some((relation_type, duration)) = formed {
                next.relations.set(*a, *b, relation_type, world.turn, duration);
                tracing::debug!(a = %a, b = %b, kind = ?relation_type, "AI relation formed");
                events.push(TurnEvent {
                    turn: world.turn,
                    event_type: TurnEventType::RelationFormed {
                        faction1: *a,
                        faction2: *b,
                        relation_type,
                    },
                    description: format!("{} and {} formed a {:?}", a, b, relation_type),
                });
            }
        }
    }

    (next, events)
}

/// The player proposes to an AI faction, which answers at once
pub fn propose_to_ai(
    world: &WorldState,
    proposal: &DiplomaticProposal,
    analyses: &[FactionAnalysis],
    rules: &Rules,
    rng: &mut impl RandomSource,
) -> (WorldState, OrderOutcome) {
    if proposal.from != world.player_faction {
        return (world.clone(), OrderOutcome::failed("only the player may propose here"));
    }
    if proposal.to == world.player_faction || !world.has_faction(proposal.to) {
        return (world.clone(), OrderOutcome::failed(format!("cannot propose to {}", proposal.to)));
    }

    let accepted = should_accept_proposal(
        world,
        analyses,
        proposal,
        &rules.data.personalities,
        &rules.config.diplomacy,
        rng,
    );
    if !accepted {
        return (world.clone(), OrderOutcome::failed(format!("{} rejected the proposal", proposal.to)));
    }

    let mut next = world.clone();
    next.relations.set(
        proposal.from,
        proposal.to,
        proposal.proposal_type,
        world.turn,
        proposal.duration,
    );
    (next, OrderOutcome::ok(format!("{} accepted a {:?}", proposal.to, proposal.proposal_type)))
}

/// Answer a pending proposal addressed to the player. The answered
/// proposal stays on record with its status until the turn ends.
pub fn respond_to_proposal(world: &WorldState, index: usize, accept: bool) -> (WorldState, OrderOutcome) {
    let Some(proposal) = world.proposals.get(index) else {
        return (world.clone(), OrderOutcome::failed(format!("no proposal at {}", index)));
    };
    if proposal.to != world.player_faction || proposal.status != ProposalStatus::Pending {
        return (world.clone(), OrderOutcome::failed("proposal is not awaiting the player"));
    }

    let mut next = world.clone();
    let proposal = proposal.clone();
    if let Some(slot) = next.proposals.get_mut(index) {
        slot.status = if accept {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Rejected
        };
    }
    if !accept {
        return (next, OrderOutcome::ok(format!("Rejected {:?} from {}", proposal.proposal_type, proposal.from)));
    }
    next.relations.set(
        proposal.from,
        proposal.to,
        proposal.proposal_type,
        world.turn,
        proposal.duration,
    );
    (next, OrderOutcome::ok(format!("Accepted {:?} from {}", proposal.proposal_type, proposal.from)))
}

pub fn declare_war(world: &WorldState, aggressor: FactionId, target: FactionId) -> WorldState {
    let mut next = world.clone();
    next.relations.set(aggressor, target, RelationType::Hostile, world.turn, None);
    tracing::info!(aggressor = %aggressor, target = %target, "War declared");
    next
}
