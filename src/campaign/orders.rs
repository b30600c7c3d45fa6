//! Player orders
//!
//! Domestic orders apply at once. An attack order spends the action,
//! marches the committed troops out of the source and hands back a fresh
//! battle; once that battle finishes, `conclude_battle` writes its result
//! into the world.

use serde::{Deserialize, Serialize};

use crate::battle::state::BattleState;
use crate::campaign::domestic::{execute_domestic, DomesticCommand, OrderOutcome};
use crate::campaign::general::General;
use crate::campaign::relations::RelationType;
use crate::campaign::world::WorldState;
use crate::combat::fate::Fate;
use crate::combat::unit::BattleUnit;
use crate::core::types::{FactionId, GeneralId, RegionId, Side};
use crate::rules::{GameData, Rules};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerOrder {
    Domestic {
        region: RegionId,
        command: DomesticCommand,
    },
    Attack {
        from: RegionId,
        to: RegionId,
        /// Garrison general to lead; the first available when omitted
        general: Option<GeneralId>,
    },
}

#[derive(Debug, Clone)]
pub struct IssuedOrder {
    pub world: WorldState,
    pub outcome: OrderOutcome,
    /// Set when an attack order opens a battle
    pub battle: Option<BattleState>,
}

impl IssuedOrder {
    fn rejected(world: &WorldState, message: impl Into<String>) -> Self {
        Self {
            world: world.clone(),
            outcome: OrderOutcome::failed(message),
            battle: None,
        }
    }
}

pub fn issue_order(world: &WorldState, order: &PlayerOrder, rules: &Rules) -> IssuedOrder {
    if world.player_actions == 0 {
        return IssuedOrder::rejected(world, "no actions left this turn");
    }
    match order {
        PlayerOrder::Domestic { region, command } => issue_domestic(world, *region, *command, rules),
        PlayerOrder::Attack { from, to, general } => issue_attack(world, *from, *to, *general, rules),
    }
}

fn issue_domestic(world: &WorldState, region_id: RegionId, command: DomesticCommand, rules: &Rules) -> IssuedOrder {
    let Some(region) = world.region(region_id) else {
        return IssuedOrder::rejected(world, format!("unknown region {}", region_id));
    };
    if region.owner != world.player_faction {
        return IssuedOrder::rejected(world, format!("{} is not yours", region.name));
    }

    let (updated, outcome) = execute_domestic(region, command, &rules.config.domestic);
    if !outcome.success {
        return IssuedOrder::rejected(world, outcome.message);
    }
    let mut next = world.clone();
    if let Some(slot) = next.region_mut(region_id) {
        *slot = updated;
    }
    next.player_actions -= 1;
    IssuedOrder {
        world: next,
        outcome,
        battle: None,
    }
}

fn issue_attack(
    world: &WorldState,
    from: RegionId,
    to: RegionId,
    general: Option<GeneralId>,
    rules: &Rules,
) -> IssuedOrder {
    let player = world.player_faction;
    let (Some(source), Some(target)) = (world.region(from), world.region(to)) else {
        return IssuedOrder::rejected(world, "unknown region");
    };
    if source.owner != player {
        return IssuedOrder::rejected(world, format!("{} is not yours", source.name));
    }
    if !source.is_adjacent(to) {
        return IssuedOrder::rejected(world, format!("{} does not border {}", target.name, source.name));
    }
    if target.owner == player {
        return IssuedOrder::rejected(world, format!("{} is already yours", target.name));
    }
    if world.relation(player, target.owner).is_peaceful() {
        return IssuedOrder::rejected(world, format!("{} is bound by treaty", target.name));
    }
    let controller = &rules.config.controller;
    if source.troops < controller.min_attack_troops {
        return IssuedOrder::rejected(
            world,
            format!("{} needs at least {} troops to attack", source.name, controller.min_attack_troops),
        );
    }

    let commander = source
        .generals
        .iter()
        .copied()
        .filter(|id| general.map_or(true, |wanted| wanted == *id))
        .find_map(|id| rules.data.general(id));
    let Some(commander) = commander else {
        return IssuedOrder::rejected(world, format!("no general in {} to lead the attack", source.name));
    };

    let defender = target
        .generals
        .iter()
        .filter_map(|id| rules.data.general(*id))
        .max_by_key(|g| (g.might, std::cmp::Reverse(g.id)))
        .cloned()
        .unwrap_or_else(|| General::militia_captain(target.owner));

    let committed = (source.troops as f64 * controller.attack_commit_share).floor() as u32;
    let player_unit = BattleUnit::new(commander.clone(), committed).with_training(source.training);
    let enemy_unit = BattleUnit::new(defender, target.troops).with_training(target.training);
    let battle = BattleState::new(player_unit, enemy_unit, Side::Player, &rules.config.battle);

    let mut next = world.clone();
    next.player_actions -= 1;
    if let Some(source) = next.region_mut(from) {
        source.troops = source.troops.saturating_sub(committed);
    }
    next.relations.set(player, target.owner, RelationType::Hostile, world.turn, None);

    tracing::info!(from = %from, to = %to, committed, "Player attack launched");
    IssuedOrder {
        outcome: OrderOutcome::ok(format!(
            "{} marches on {} with {} troops",
            commander.name, target.name, committed
        )),
        world: next,
        battle: Some(battle),
    }
}

/// Write a finished battle back into the world. An unfinished battle
/// changes nothing.
///
/// The committed troops already left `from` when the order was issued;
/// survivors of a failed attack return there.
pub fn conclude_battle(world: &WorldState, from: RegionId, to: RegionId, battle: &BattleState) -> WorldState {
    let mut next = world.clone();
    let Some(winner) = battle.winner else {
        return next;
    };
    let Some(defender_faction) = world.region(to).map(|r| r.owner) else {
        return next;
    };
    let player = world.player_faction;
    let commander = battle.player.general.id;
    let commander_fate = battle.fate_of(Side::Player).map(|f| f.fate);
    let enemy_general = battle.enemy.general.id;
    let enemy_fate = battle.fate_of(Side::Enemy).map(|f| f.fate);

    match winner {
        Side::Player => {
            let mut garrison = Vec::new();
            if let Some(target) = next.region_mut(to) {
                target.owner = player;
                target.troops = battle.player.troops;
                garrison = std::mem::take(&mut target.generals);
            }
            for general in garrison {
                let fallen = general == enemy_general && matches!(enemy_fate, Some(Fate::Dead | Fate::Escaped));
                if !fallen {
                    next.take_prisoner(general, player, to);
                }
            }
            // A commander taken in a duel is held in what the defender still owns
            let held_at = next.regions_of(defender_faction).map(|r| r.id).next().unwrap_or(to);
            settle_commander(&mut next, commander, from, commander_fate, defender_faction, held_at);
            tracing::info!(region = %to, "Region conquered");
        }
        Side::Enemy => {
            if let Some(source) = next.region_mut(from) {
                source.troops += battle.player.troops;
            }
            if let Some(target) = next.region_mut(to) {
                target.troops = battle.enemy.troops;
            }
            settle_commander(&mut next, commander, from, commander_fate, defender_faction, to);
            settle_commander(&mut next, enemy_general, to, enemy_fate, player, from);
            tracing::info!(region = %to, "Attack repelled");
        }
    }
    next
}

/// Dead commanders leave their station; captured ones become prisoners.
/// Generals not stationed there (the militia captain) are untouched.
fn settle_commander(
    world: &mut WorldState,
    general: GeneralId,
    station: RegionId,
    fate: Option<Fate>,
    captor: FactionId,
    held_at: RegionId,
) {
    let stationed = world.region(station).is_some_and(|r| r.generals.contains(&general));
    if !stationed {
        return;
    }
    match fate {
        Some(Fate::Captured) => {
            remove_from_garrison(world, station, general);
            world.take_prisoner(general, captor, held_at);
        }
        Some(Fate::Dead) => remove_from_garrison(world, station, general),
        _ => {}
    }
}

fn remove_from_garrison(world: &mut WorldState, region: RegionId, general: GeneralId) {
    if let Some(region) = world.region_mut(region) {
        region.generals.retain(|g| *g != general);
    }
}

/// Free a prisoner. They return to the first region their home faction
/// still holds, or leave the map if it holds none.
pub fn release_prisoner(world: &WorldState, general: GeneralId, data: &GameData) -> (WorldState, OrderOutcome) {
    let Some(index) = world.prisoners.iter().position(|p| p.general == general) else {
        return (world.clone(), OrderOutcome::failed(format!("{} is not held", general)));
    };

    let mut next = world.clone();
    next.prisoners.remove(index);

    let home = data
        .general(general)
        .and_then(|g| world.regions_of(g.faction).next())
        .map(|r| r.id);
    let message = match home.and_then(|id| next.region_mut(id)) {
        Some(region) => {
            region.generals.push(general);
            format!("{} returned to {}", general, region.name)
        }
        None => format!("{} released with nowhere to go", general),
    };
    (next, OrderOutcome::ok(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::BattlePhase;
    use crate::campaign::faction::Faction;
    use crate::campaign::region::Region;
    use crate::combat::fate::GeneralFate;

    fn setup() -> (WorldState, Rules) {
        let mut home = Region::new(RegionId(1), "Xuchang", FactionId(1));
        home.troops = 10000;
        home.gold = 1000;
        home.food = 1000;
        home.population = 20000;
        home.adjacent = vec![RegionId(2)];
        home.generals = vec![GeneralId(1)];
        let mut enemy = Region::new(RegionId(2), "Hanzhong", FactionId(2));
        enemy.troops = 4000;
        enemy.adjacent = vec![RegionId(1)];
        enemy.generals = vec![GeneralId(2), GeneralId(3)];

        let mut world = WorldState::new(
            1,
            FactionId(1),
            vec![Faction::new(FactionId(1), "Wei"), Faction::new(FactionId(2), "Shu")],
            vec![home, enemy],
        );
        world.player_actions = 3;

        let mut rules = Rules::default();
        rules
            .data
            .add_general(General::new(GeneralId(1), "Xiahou Dun", FactionId(1)).with_stats(90, 60, 40, 70));
        rules
            .data
            .add_general(General::new(GeneralId(2), "Wei Yan", FactionId(2)).with_stats(85, 50, 30, 40));
        rules
            .data
            .add_general(General::new(GeneralId(3), "Ma Su", FactionId(2)).with_stats(40, 80, 60, 50));
        (world, rules)
    }

    fn attack() -> PlayerOrder {
        PlayerOrder::Attack {
            from: RegionId(1),
            to: RegionId(2),
            general: None,
        }
    }

    #[test]
    fn test_domestic_order_spends_action() {
        let (world, rules) = setup();
        let order = PlayerOrder::Domestic {
            region: RegionId(1),
            command: DomesticCommand::Train,
        };
        let issued = issue_order(&world, &order, &rules);
        assert!(issued.outcome.success);
        assert_eq!(issued.world.player_actions, 2);
        assert_eq!(issued.world.region(RegionId(1)).unwrap().training, 60);
    }

    #[test]
    fn test_no_actions_left() {
        let (mut world, rules) = setup();
        world.player_actions = 0;
        let issued = issue_order(&world, &attack(), &rules);
        assert!(!issued.outcome.success);
        assert!(issued.battle.is_none());
    }

    #[test]
    fn test_foreign_region_rejected() {
        let (world, rules) = setup();
        let order = PlayerOrder::Domestic {
            region: RegionId(2),
            command: DomesticCommand::Train,
        };
        let issued = issue_order(&world, &order, &rules);
        assert!(!issued.outcome.success);
        assert_eq!(issued.world, world);
    }

    #[test]
    fn test_attack_through_truce_rejected() {
        let (mut world, rules) = setup();
        world.relations.set(FactionId(1), FactionId(2), RelationType::Truce, 1, Some(5));
        assert!(!issue_order(&world, &attack(), &rules).outcome.success);
    }

    #[test]
    fn test_attack_opens_battle() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        assert!(issued.outcome.success);
        assert_eq!(issued.world.player_actions, 2);

        let battle = issued.battle.unwrap();
        assert_eq!(battle.player.troops, 7000);
        assert_eq!(battle.player.general.id, GeneralId(1));
        // Strongest garrison general defends
        assert_eq!(battle.enemy.general.id, GeneralId(2));
        assert_eq!(battle.enemy.troops, 4000);
        assert_eq!(issued.world.region(RegionId(1)).unwrap().troops, 3000);
        assert_eq!(issued.world.relation(FactionId(1), FactionId(2)), RelationType::Hostile);
    }

    #[test]
    fn test_second_attack_commits_what_is_left() {
        let (world, rules) = setup();
        let first = issue_order(&world, &attack(), &rules);
        let second = issue_order(&first.world, &attack(), &rules);
        assert!(second.outcome.success);

        let committed = first.battle.unwrap().player.troops + second.battle.unwrap().player.troops;
        assert_eq!(committed, 9100);
        assert_eq!(second.world.region(RegionId(1)).unwrap().troops, 900);
        assert_eq!(committed + 900, 10000);
    }

    #[test]
    fn test_undefended_region_uses_militia() {
        let (mut world, rules) = setup();
        world.region_mut(RegionId(2)).unwrap().generals.clear();
        let battle = issue_order(&world, &attack(), &rules).battle.unwrap();
        assert_eq!(battle.enemy.general.id, GeneralId(0));
        assert_eq!(battle.enemy.general.faction, FactionId(2));
    }

    fn finished(mut battle: BattleState, winner: Side, survivors: u32, fate: Fate) -> BattleState {
        let loser = winner.opponent();
        battle.winner = Some(winner);
        battle.phase = if winner == Side::Player {
            BattlePhase::Victory
        } else {
            BattlePhase::Defeat
        };
        battle.unit_mut(winner).troops = survivors;
        let general_id = battle.unit(loser).general.id;
        battle.fates.push(GeneralFate {
            general_id,
            fate,
            message: None,
        });
        battle
    }

    #[test]
    fn test_conclude_victory() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let battle = finished(issued.battle.unwrap(), Side::Player, 5500, Fate::Dead);

        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &battle);
        let taken = next.region(RegionId(2)).unwrap();
        assert_eq!(taken.owner, FactionId(1));
        assert_eq!(taken.troops, 5500);
        assert!(taken.generals.is_empty());
        assert_eq!(next.region(RegionId(1)).unwrap().troops, 3000);
        // Fallen commander is gone; the rest of the garrison is captured
        assert!(!next.is_prisoner(GeneralId(2)));
        assert!(next.is_prisoner(GeneralId(3)));
    }

    #[test]
    fn test_conclude_defeat_with_captured_commander() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let mut battle = finished(issued.battle.unwrap(), Side::Enemy, 3500, Fate::Captured);
        battle.player.troops = 2000;

        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &battle);
        assert_eq!(next.region(RegionId(1)).unwrap().troops, 5000);
        assert_eq!(next.region(RegionId(2)).unwrap().troops, 3500);
        assert_eq!(next.region(RegionId(2)).unwrap().owner, FactionId(2));
        assert!(next.region(RegionId(1)).unwrap().generals.is_empty());
        let prisoner = &next.prisoners[0];
        assert_eq!(prisoner.general, GeneralId(1));
        assert_eq!(prisoner.captor, FactionId(2));
    }

    fn commander_fell(mut battle: BattleState, side: Side, fate: Fate) -> BattleState {
        battle.unit_mut(side).commander_lost = true;
        let general_id = battle.unit(side).general.id;
        battle.fates.push(GeneralFate {
            general_id,
            fate,
            message: None,
        });
        battle
    }

    #[test]
    fn test_victory_after_commander_died_in_duel() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let battle = finished(issued.battle.unwrap(), Side::Player, 5500, Fate::Captured);
        let battle = commander_fell(battle, Side::Player, Fate::Dead);

        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &battle);
        assert_eq!(next.region(RegionId(2)).unwrap().owner, FactionId(1));
        assert!(next.region(RegionId(1)).unwrap().generals.is_empty());
        assert!(!next.is_prisoner(GeneralId(1)));
        assert!(next.is_prisoner(GeneralId(2)));
    }

    #[test]
    fn test_victory_after_commander_captured_in_duel() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let battle = finished(issued.battle.unwrap(), Side::Player, 5500, Fate::Dead);
        let battle = commander_fell(battle, Side::Player, Fate::Captured);

        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &battle);
        assert!(next.region(RegionId(1)).unwrap().generals.is_empty());
        let prisoner = next.prisoners.iter().find(|p| p.general == GeneralId(1)).unwrap();
        assert_eq!(prisoner.captor, FactionId(2));
    }

    #[test]
    fn test_defeat_after_defender_fell_in_duel() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let battle = finished(issued.battle.clone().unwrap(), Side::Enemy, 3500, Fate::Escaped);
        let dead = commander_fell(battle.clone(), Side::Enemy, Fate::Dead);

        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &dead);
        assert_eq!(next.region(RegionId(2)).unwrap().generals, vec![GeneralId(3)]);
        assert_eq!(next.region(RegionId(1)).unwrap().generals, vec![GeneralId(1)]);
        assert!(next.prisoners.is_empty());

        let captured = commander_fell(battle, Side::Enemy, Fate::Captured);
        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), &captured);
        assert_eq!(next.region(RegionId(2)).unwrap().generals, vec![GeneralId(3)]);
        let prisoner = &next.prisoners[0];
        assert_eq!(prisoner.general, GeneralId(2));
        assert_eq!(prisoner.captor, FactionId(1));
        assert_eq!(prisoner.location, RegionId(1));
    }

    #[test]
    fn test_unfinished_battle_changes_nothing() {
        let (world, rules) = setup();
        let issued = issue_order(&world, &attack(), &rules);
        let next = conclude_battle(&issued.world, RegionId(1), RegionId(2), issued.battle.as_ref().unwrap());
        assert_eq!(next, issued.world);
    }

    #[test]
    fn test_release_prisoner_returns_home() {
        let (mut world, rules) = setup();
        world.take_prisoner(GeneralId(3), FactionId(1), RegionId(1));
        world.region_mut(RegionId(2)).unwrap().generals.retain(|g| *g != GeneralId(3));

        let (next, outcome) = release_prisoner(&world, GeneralId(3), &rules.data);
        assert!(outcome.success);
        assert!(next.prisoners.is_empty());
        assert!(next.region(RegionId(2)).unwrap().generals.contains(&GeneralId(3)));

        let (_, again) = release_prisoner(&next, GeneralId(3), &rules.data);
        assert!(!again.success);
    }
}
