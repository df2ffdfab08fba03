use crate::battle_data::StatKind;
use crate::calculators::{DamageCalculator, HealingCalculator, SuccessCalculator, TargetCalculator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The effect an action applies to each living target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionEffect {
    Damage(DamageCalculator),
    Heal(HealingCalculator),
    /// Adds `amount` to the stat's multiplier.
    Buff { stat: StatKind, amount: f64 },
    /// Raises one protection shield.
    Protect,
    /// Adds `amount` to the protect limit.
    ProtectLimitChange { amount: i32 },
    Flinch,
}

impl ActionEffect {
    pub fn name(&self) -> &'static str {
        match self {
            ActionEffect::Damage(_) => "Damage",
            ActionEffect::Heal(_) => "Heal",
            ActionEffect::Buff { .. } => "Buff",
            ActionEffect::Protect => "Protect",
            ActionEffect::ProtectLimitChange { .. } => "ProtectLimitChange",
            ActionEffect::Flinch => "Flinch",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionData {
    pub targets: TargetCalculator,
    pub effect: ActionEffect,
    /// Checked once per use, after targets resolve.
    #[serde(default)]
    pub success: SuccessCalculator,
    /// Narrative/UI labels copied onto every result.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_uses: u32,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub success: SuccessCalculator,
    pub actions: Vec<ActionData>,
}
