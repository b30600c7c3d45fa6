//! Domestic commands - recruit, train and develop a region

use serde::{Deserialize, Serialize};

use crate::campaign::region::Region;
use crate::core::config::DomesticCosts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomesticCommand {
    Recruit,
    Train,
    DevelopAgriculture,
    DevelopCommerce,
    ReinforceDefense,
}

impl DomesticCommand {
    /// Order the AI tries commands in
    pub fn priority_order() -> [DomesticCommand; 5] {
        [
            DomesticCommand::Recruit,
            DomesticCommand::Train,
            DomesticCommand::DevelopAgriculture,
            DomesticCommand::DevelopCommerce,
            DomesticCommand::ReinforceDefense,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DomesticCommand::Recruit => "recruit",
            DomesticCommand::Train => "train",
            DomesticCommand::DevelopAgriculture => "develop agriculture",
            DomesticCommand::DevelopCommerce => "develop commerce",
            DomesticCommand::ReinforceDefense => "reinforce defense",
        }
    }
}

/// Result of an order: whether it took effect and a human-readable note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub success: bool,
    pub message: String,
}

impl OrderOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn recruit_amount(region: &Region, costs: &DomesticCosts) -> u32 {
    let share = (region.population as f64 * costs.recruit_population_share).floor() as u32;
    share.min(costs.recruit_max)
}

/// Why a command cannot run in this region, if it cannot
pub fn check_command(region: &Region, command: DomesticCommand, costs: &DomesticCosts) -> Result<(), String> {
    let (gold, food) = match command {
        DomesticCommand::Recruit => (costs.recruit_gold, costs.recruit_food),
        DomesticCommand::Train => (costs.train_gold, costs.train_food),
        _ => (costs.develop_gold, 0),
    };
    if region.gold < gold {
        return Err(format!("{} needs {} gold, have {}", command.label(), gold, region.gold));
    }
    if region.food < food {
        return Err(format!("{} needs {} food, have {}", command.label(), food, region.food));
    }

    let capped = match command {
        DomesticCommand::Recruit => {
            if recruit_amount(region, costs) == 0 {
                return Err("no population left to recruit".into());
            }
            false
        }
        DomesticCommand::Train => region.training >= costs.stat_cap,
        DomesticCommand::DevelopAgriculture => region.agriculture >= costs.stat_cap,
        DomesticCommand::DevelopCommerce => region.commerce >= costs.stat_cap,
        DomesticCommand::ReinforceDefense => region.defense >= costs.stat_cap,
    };
    if capped {
        return Err(format!("{} is already at its cap", command.label()));
    }
    Ok(())
}

/// Run a command against a region. A failed command leaves the region
/// untouched.
pub fn execute_domestic(region: &Region, command: DomesticCommand, costs: &DomesticCosts) -> (Region, OrderOutcome) {
    if let Err(reason) = check_command(region, command, costs) {
        return (region.clone(), OrderOutcome::failed(reason));
    }

    let mut next = region.clone();
    let raise = |stat: &mut u32| {
        *stat = (*stat + costs.develop_gain).min(costs.stat_cap);
        *stat
    };
    let message = match command {
        DomesticCommand::Recruit => {
            let amount = recruit_amount(region, costs);
            next.gold -= costs.recruit_gold;
            next.food -= costs.recruit_food;
            next.troops += amount;
            next.population -= amount;
            format!("Recruited {} troops in {}", amount, region.name)
        }
        DomesticCommand::Train => {
            next.gold -= costs.train_gold;
            next.food -= costs.train_food;
            next.training = (next.training + costs.train_gain).min(costs.stat_cap);
            format!("Training in {} rose to {}", region.name, next.training)
        }
        DomesticCommand::DevelopAgriculture => {
            next.gold -= costs.develop_gold;
            format!("Agriculture in {} rose to {}", region.name, raise(&mut next.agriculture))
        }
        DomesticCommand::DevelopCommerce => {
            next.gold -= costs.develop_gold;
            format!("Commerce in {} rose to {}", region.name, raise(&mut next.commerce))
        }
        DomesticCommand::ReinforceDefense => {
            next.gold -= costs.develop_gold;
            format!("Defense in {} rose to {}", region.name, raise(&mut next.defense))
        }
    };

    tracing::debug!(region = %region.id, command = command.label(), "Domestic command executed");
    (next, OrderOutcome::ok(message))
}
