//! AI faction controller
//!
//! Each AI faction spends a small action budget per turn. It tries one
//! attack first, then falls back to domestic work in its most pressing
//! regions. The controller is deterministic; randomness only enters
//! through diplomacy.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::campaign::analysis::FactionAnalysis;
use crate::campaign::domestic::{check_command, execute_domestic, DomesticCommand};
use crate::campaign::events::{FactionTurnLog, TurnEventType};
use crate::campaign::region::Region;
use crate::campaign::relations::RelationType;
use crate::campaign::world::WorldState;
use crate::core::config::{ControllerConfig, DomesticCosts, GameConfig};
use crate::core::types::{FactionId, GeneralId, RegionId};

/// A candidate invasion
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPlan {
    pub from: RegionId,
    pub to: RegionId,
    pub defender: FactionId,
    pub committed: u32,
    pub power_ratio: f64,
    pub score: f64,
}

/// Run one AI faction's turn
pub fn process_faction_turn(
    world: &WorldState,
    faction: FactionId,
    analysis: &FactionAnalysis,
    config: &GameConfig,
) -> (WorldState, FactionTurnLog) {
    let mut next = world.clone();
    let mut log = FactionTurnLog::new(faction);
    if !analysis.is_alive() {
        return (next, log);
    }

    let budget = config.controller.action_budget;
    let mut attack_tried = false;

    while log.actions_used < budget {
        if !attack_tried {
            attack_tried = true;
            if let Some(plan) = find_best_attack(&next, faction, &config.controller) {
                let (event, description) = execute_attack(&mut next, faction, &plan, &config.controller);
                log.push(next.turn, event, description);
                log.actions_used += 1;
                continue;
            }
        }

        let Some((region_id, command)) = choose_domestic(&next, faction, config) else {
            break;
        };
        let Some(region) = next.region(region_id) else {
            break;
        };
        let (updated, result) = execute_domestic(region, command, &config.domestic);
        if !result.success {
            break;
        }
        if let Some(slot) = next.region_mut(region_id) {
            *slot = updated;
        }
        log.push(
            next.turn,
            TurnEventType::Domestic {
                region: region_id,
                command,
            },
            result.message,
        );
        log.actions_used += 1;
    }

    tracing::debug!(faction = %faction, actions = log.actions_used, "AI faction turn complete");
    (next, log)
}

/// Best invasion available to a faction, if any clears the power ratio
pub fn find_best_attack(world: &WorldState, faction: FactionId, config: &ControllerConfig) -> Option<AttackPlan> {
    let mut plans = Vec::new();
    for source in world.regions_of(faction) {
        if source.troops < config.min_attack_troops {
            continue;
        }
        let committed = (source.troops as f64 * config.attack_commit_share).floor() as u32;
        for target in source.adjacent.iter().filter_map(|id| world.region(*id)) {
            if target.owner == faction || world.relation(faction, target.owner).is_peaceful() {
                continue;
            }
            let power_ratio = committed as f64 / target.troops.max(1) as f64;
            if power_ratio < config.min_power_ratio {
                continue;
            }
            plans.push(AttackPlan {
                from: source.id,
                to: target.id,
                defender: target.owner,
                committed,
                power_ratio,
                score: power_ratio * 100.0 - target.defense as f64,
            });
        }
    }

    plans
        .into_iter()
        .max_by_key(|p| (OrderedFloat(p.score), Reverse(p.from), Reverse(p.to)))
}

/// Resolve an invasion abstractly and apply it to the world
pub fn execute_attack(
    world: &mut WorldState,
    faction: FactionId,
    plan: &AttackPlan,
    config: &ControllerConfig,
) -> (TurnEventType, String) {
    let Some(target) = world.region(plan.to) else {
        return (
            attack_event(plan, false, 0, 0, Vec::new()),
            format!("{} vanished before the attack", plan.to),
        );
    };
    let target_name = target.name.clone();
    let target_troops = target.troops;
    let defense_power =
        target_troops as f64 * config.defense_troop_multiplier + target.defense as f64 * config.defense_stat_multiplier;
    let success = defense_power <= 0.0 || plan.committed as f64 / defense_power > config.success_ratio;

    let turn = world.turn;
    world.relations.set(faction, plan.defender, RelationType::Hostile, turn, None);

    if success {
        let losses = (plan.committed as f64 * config.success_loss_share).floor() as u32;
        // The whole committed force marches out; the 20% losses come off
        // the troops that arrive, not off the source a second time
        if let Some(source) = world.region_mut(plan.from) {
            source.troops = source.troops.saturating_sub(plan.committed);
        }
        let mut garrison = Vec::new();
        if let Some(target) = world.region_mut(plan.to) {
            target.owner = faction;
            target.troops = plan.committed - losses;
            garrison = std::mem::take(&mut target.generals);
        }
        let captured: Vec<_> = garrison
            .into_iter()
            .filter(|g| world.take_prisoner(*g, faction, plan.to))
            .collect();

        tracing::info!(faction = %faction, target = %plan.to, "AI conquest");
        let description = format!(
            "{} took {} with {} troops, losing {}",
            faction, target_name, plan.committed, losses
        );
        (attack_event(plan, true, losses, target_troops, captured), description)
    } else {
        let attacker_losses = (plan.committed as f64 * config.failure_loss_share).floor() as u32;
        let defender_losses = (target_troops as f64 * config.defender_loss_share).floor() as u32;
        if let Some(source) = world.region_mut(plan.from) {
            source.troops = source.troops.saturating_sub(attacker_losses);
        }
        if let Some(target) = world.region_mut(plan.to) {
            target.troops = target.troops.saturating_sub(defender_losses);
        }

        tracing::info!(faction = %faction, target = %plan.to, "AI attack repelled");
        let description = format!(
            "{} was repelled at {}, losing {} against {}",
            faction, target_name, attacker_losses, defender_losses
        );
        (
            attack_event(plan, false, attacker_losses, defender_losses, Vec::new()),
            description,
        )
    }
}

fn attack_event(
    plan: &AttackPlan,
    success: bool,
    attacker_losses: u32,
    defender_losses: u32,
    captured: Vec<GeneralId>,
) -> TurnEventType {
    TurnEventType::Attack {
        from: plan.from,
        to: plan.to,
        defender: plan.defender,
        committed: plan.committed,
        success,
        attacker_losses,
        defender_losses,
        captured,
    }
}

/// Urgency of domestic work in a region. Higher goes first.
pub fn region_priority(world: &WorldState, region: &Region) -> u32 {
    let mut score = 0;
    let exposed = region
        .adjacent
        .iter()
        .filter_map(|id| world.region(*id))
        .any(|r| r.owner != region.owner);
    if exposed {
        score += 40;
    }
    if region.troops < 5000 {
        score += 20;
    }
    score += (200u32.saturating_sub(region.agriculture + region.commerce)) / 10;
    score += 100u32.saturating_sub(region.training) / 10;
    score
}

/// First allowed command in the most urgent region
pub fn choose_domestic(world: &WorldState, faction: FactionId, config: &GameConfig) -> Option<(RegionId, DomesticCommand)> {
    let mut regions: Vec<&Region> = world.regions_of(faction).collect();
    regions.sort_by_key(|r| (Reverse(region_priority(world, r)), r.id));

    regions.into_iter().find_map(|region| {
        DomesticCommand::priority_order()
            .into_iter()
            .find(|command| wants_command(region, *command, &config.controller, &config.domestic))
            .map(|command| (region.id, command))
    })
}

fn wants_command(region: &Region, command: DomesticCommand, controller: &ControllerConfig, costs: &DomesticCosts) -> bool {
    let wanted = match command {
        DomesticCommand::Recruit => {
            region.troops < controller.recruit_troop_ceiling && region.population > controller.recruit_min_population
        }
        DomesticCommand::Train => region.training < controller.training_ceiling,
        DomesticCommand::DevelopAgriculture => region.agriculture < controller.develop_ceiling,
        DomesticCommand::DevelopCommerce => region.commerce < controller.develop_ceiling,
        DomesticCommand::ReinforceDefense => region.defense < controller.defense_ceiling,
    };
    wanted && check_command(region, command, costs).is_ok()
}
