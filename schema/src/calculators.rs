//! Calculator definitions.
//!
//! These are plain data: they say *which* rule applies and carry its
//! parameters. The engine crate implements the rules themselves.

use serde::{Deserialize, Serialize};

/// Candidate pool for the random and player-driven target calculators.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidatePool {
    /// The user and every other character.
    Any,
    /// Characters on the user's team, excluding the user.
    Ally,
    /// Characters on any other team.
    Enemy,
    /// Every character except the user.
    Other,
}

/// Strategy selecting which characters an action affects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetCalculator {
    /// Only the user.
    User,
    /// Every character passed as `others`.
    AllOthers,
    /// Everyone on the user's team except the user.
    Allies,
    /// Everyone on another team.
    Enemies,
    /// The user's whole team, the user included.
    Team,
    FirstEnemy,
    FirstAlly,
    /// A uniformly random living member of the pool.
    Random(CandidatePool),
    /// Asks the external target selector to choose from the pool.
    Player(CandidatePool),
    /// Whoever last landed damage on the user this turn. Reactive.
    LastAttacker,
}

impl TargetCalculator {
    /// Reactive calculators resolve immediately before the effect is applied
    /// instead of when targets are set at dispatch time.
    pub fn is_reactive(&self) -> bool {
        matches!(self, TargetCalculator::LastAttacker)
    }
}

/// Strategy deciding whether a move or action lands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SuccessCalculator {
    #[default]
    Always,
    /// Succeeds when a 1..=100 roll is at most `accuracy`.
    Accuracy { accuracy: u8 },
    /// Accuracy that decays with every consecutive success:
    /// `max(minimum, base - linear_factor * streak)`.
    ComboAccuracy {
        base: u8,
        linear_factor: u8,
        minimum: u8,
    },
}

/// Per-target damage formula.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCalculator {
    Absolute { amount: i32 },
    /// Percentage of the target's maximum health.
    Percentage { percentage: i32 },
    /// Power scaled by attack minus defence with an 80-100% spread.
    BasePower { base_power: i32 },
    /// `BasePower` without the random spread.
    StatDifference { base_power: i32 },
    /// `BasePower` whose power grows with the action's success streak.
    ComboScaling {
        starting_base_power: i32,
        linear_factor: i32,
    },
    /// Percentage of the last damage the user took this turn.
    PercentageOfLastReceived { percentage: i32 },
}

/// Per-target healing formula.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealingCalculator {
    Absolute { amount: i32 },
    /// Percentage of the target's maximum health.
    Percentage { percentage: i32 },
}
