//! Stratagem catalog and application
//!
//! A stratagem is a once-per-battle action gated on the caster's
//! intellect. Unknown, locked or spent stratagems are not errors: they
//! leave both units untouched and explain why in the outcome message.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::math::{apply_morale_change, apply_troop_damage};
use crate::combat::unit::BattleUnit;

/// Effects beyond damage and morale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratagemSpecial {
    /// Target loses its next action
    DisableTurn,
    /// Caster's next charge is empowered
    EmpowerNextAttack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratagem {
    pub id: String,
    pub name: String,
    pub required_intellect: u32,
    /// Morale change applied to the target
    #[serde(default)]
    pub morale_impact: i32,
    /// Morale change applied to the caster
    #[serde(default)]
    pub caster_morale: i32,
    /// Percent of the target's troops destroyed
    #[serde(default)]
    pub damage_percent: Option<f64>,
    /// Uses before the stratagem recharges. Battles are short enough
    /// that every stratagem is effectively once per battle.
    #[serde(default = "default_cooldown")]
    pub cooldown: u32,
    #[serde(default)]
    pub special: Option<StratagemSpecial>,
}

fn default_cooldown() -> u32 {
    1
}

/// Static table of stratagems, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StratagemCatalog {
    entries: BTreeMap<String, Stratagem>,
}

impl StratagemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = Stratagem>) -> Self {
        Self {
            entries: entries.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// The stock table used when a scenario ships none
    pub fn standard() -> Self {
        Self::from_entries([
            Stratagem {
                id: "fire_attack".into(),
                name: "Fire Attack".into(),
                required_intellect: 70,
                morale_impact: -10,
                caster_morale: 0,
                damage_percent: Some(15.0),
                cooldown: 3,
                special: None,
            },
            Stratagem {
                id: "ambush".into(),
                name: "Ambush".into(),
                required_intellect: 60,
                morale_impact: -15,
                caster_morale: 0,
                damage_percent: Some(10.0),
                cooldown: 2,
                special: None,
            },
            Stratagem {
                id: "confusion".into(),
                name: "Sow Confusion".into(),
                required_intellect: 75,
                morale_impact: -5,
                caster_morale: 0,
                damage_percent: None,
                cooldown: 3,
                special: Some(StratagemSpecial::DisableTurn),
            },
            Stratagem {
                id: "rally".into(),
                name: "Rally the Troops".into(),
                required_intellect: 50,
                morale_impact: 0,
                caster_morale: 15,
                damage_percent: None,
                cooldown: 2,
                special: None,
            },
            Stratagem {
                id: "provoke".into(),
                name: "Provoke".into(),
                required_intellect: 55,
                morale_impact: -20,
                caster_morale: 0,
                damage_percent: None,
                cooldown: 2,
                special: None,
            },
            Stratagem {
                id: "feigned_retreat".into(),
                name: "Feigned Retreat".into(),
                required_intellect: 65,
                morale_impact: -5,
                caster_morale: 0,
                damage_percent: None,
                cooldown: 3,
                special: Some(StratagemSpecial::EmpowerNextAttack),
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Stratagem> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stratagem> {
        self.entries.values()
    }

    /// Stratagems the unit can still cast this battle, in id order
    pub fn available_for<'a>(&'a self, unit: &'a BattleUnit) -> impl Iterator<Item = &'a Stratagem> + 'a {
        self.entries
            .values()
            .filter(move |s| unit.intellect() >= s.required_intellect && !unit.has_used(&s.id))
    }
}

/// Result of attempting a stratagem
#[derive(Debug, Clone, PartialEq)]
pub struct StratagemOutcome {
    pub caster: BattleUnit,
    pub target: BattleUnit,
    pub applied: bool,
    /// Troops the target lost
    pub damage: u32,
    pub message: String,
}

/// Attempt a stratagem. Pure: returns updated copies of both units.
pub fn apply_stratagem(
    caster: &BattleUnit,
    target: &BattleUnit,
    stratagem_id: &str,
    catalog: &StratagemCatalog,
) -> StratagemOutcome {
    let rejected = |message: String| StratagemOutcome {
        caster: caster.clone(),
        target: target.clone(),
        applied: false,
        damage: 0,
        message,
    };

    let Some(stratagem) = catalog.get(stratagem_id) else {
        return rejected(format!("{} knows no stratagem called '{}'", caster.general.name, stratagem_id));
    };

    if caster.intellect() < stratagem.required_intellect {
        return rejected(format!(
            "{} lacks the intellect for {} ({} < {})",
            caster.general.name,
            stratagem.name,
            caster.intellect(),
            stratagem.required_intellect
        ));
    }

    if caster.has_used(&stratagem.id) {
        return rejected(format!("{} has already used {} this battle", caster.general.name, stratagem.name));
    }

    let mut new_caster = caster.clone();
    let mut new_target = target.clone();

    let damage = stratagem
        .damage_percent
        .map(|percent| (target.troops as f64 * percent / 100.0).floor() as u32)
        .unwrap_or(0);
    new_target.troops = apply_troop_damage(&new_target, damage as i64);
    new_target.morale = apply_morale_change(&new_target, stratagem.morale_impact);
    new_caster.morale = apply_morale_change(&new_caster, stratagem.caster_morale);

    match stratagem.special {
        Some(StratagemSpecial::DisableTurn) => new_target.disabled_turns += 1,
        Some(StratagemSpecial::EmpowerNextAttack) => new_caster.empowered = true,
        None => {}
    }

    new_caster.used_stratagems.push(stratagem.id.clone());

    let mut message = format!("{} uses {}", caster.general.name, stratagem.name);
    if damage > 0 {
        message.push_str(&format!(", destroying {} troops", damage));
    }
    match stratagem.special {
        Some(StratagemSpecial::DisableTurn) => {
            message.push_str(&format!(", {} is thrown into confusion", target.general.name))
        }
        Some(StratagemSpecial::EmpowerNextAttack) => message.push_str(", the next charge will strike hard"),
        None => {}
    }

    StratagemOutcome {
        caster: new_caster,
        target: new_target,
        applied: true,
        damage,
        message,
    }
}
