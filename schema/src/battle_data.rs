use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The three stats every combatant carries.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter,
)]
pub enum StatKind {
    Attack,
    Defence,
    Speed,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatKind::Attack => "Attack",
            StatKind::Defence => "Defence",
            StatKind::Speed => "Speed",
        };
        write!(f, "{}", display_name)
    }
}

/// A base-value transform contributed by an equipped item.
/// Transforms are applied left to right, before the stat multiplier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Add(i32),
    Multiply(f64),
    Set(i32),
}

impl Transform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::Add(amount) => value + *amount as f64,
            Transform::Multiply(factor) => value * factor,
            Transform::Set(amount) => *amount as f64,
        }
    }

    /// Runs `base` through every transform in order.
    pub fn apply_all(base: f64, transforms: &[Transform]) -> f64 {
        transforms
            .iter()
            .fold(base, |value, transform| transform.apply(value))
    }
}

/// Outcome of a move's success check.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The move executed and its actions ran.
    Success,
    /// The move executed but missed; no action ran.
    Miss,
    /// The move could not execute at all (e.g. the user is defeated).
    Failure,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Why an action produced no effect. These are ordinary battle outcomes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionFailure {
    NoTargetsSet,
    /// The action's own success check failed.
    Missed,
    DamageCalculationFailed,
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            ActionFailure::NoTargetsSet => "no targets set",
            ActionFailure::Missed => "missed",
            ActionFailure::DamageCalculationFailed => "damage calculation failed",
        };
        write!(f, "{}", display_name)
    }
}
