//! Actions: the atomic effects a move applies.
//!
//! Every action shares one target lifecycle, tracked in `TargetState`:
//! `Unset -> Established -> Used`. `use_action` always leaves the action in
//! `Used` once it has consumed a successful resolution, so a stale target set
//! can never leak into the next use.

use crate::battle::calculators::{
    CalculatedAmount, DamageCalculatorExt, HealingCalculatorExt, SuccessCalculatorExt,
    SuccessSubject,
};
use crate::battle::context::BattleContext;
use crate::battle::targets::{TargetCalculatorExt, TargetResolution};
use crate::character::{Character, CharacterId};
use crate::moves::MoveId;
use schema::{
    ActionData, ActionEffect, ActionFailure, StatKind, SuccessCalculator, TargetCalculator,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Identity of an action for history queries: its move and its position in that move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionKey {
    pub move_id: MoveId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetState {
    Unset,
    Established(TargetResolution),
    /// Targets were consumed by a use and cleared.
    Used,
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSource {
    /// Used on its own, outside any move.
    Direct,
    Move(MoveId),
}

/// A damage hit absorbed by a protection shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectInterception {
    pub shields_before: u32,
    pub shields_after: u32,
}

/// Variant-specific before/after values of one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectChange {
    Damage {
        health_before: i32,
        health_after: i32,
    },
    Heal {
        health_before: i32,
        health_after: i32,
    },
    Buff {
        stat: StatKind,
        multiplier_before: f64,
        multiplier_after: f64,
    },
    Protect {
        count_before: u32,
        count_after: u32,
    },
    ProtectLimitChange {
        limit_before: i32,
        limit_after: i32,
    },
    Flinch,
}

impl EffectChange {
    /// Magnitude derived from the before/after pair. `None` for variants
    /// without an integer magnitude.
    pub fn amount(&self) -> Option<i32> {
        match self {
            EffectChange::Damage {
                health_before,
                health_after,
            } => Some(health_before - health_after),
            EffectChange::Heal {
                health_before,
                health_after,
            } => Some(health_after - health_before),
            EffectChange::Protect {
                count_before,
                count_after,
            } => Some(*count_after as i32 - *count_before as i32),
            EffectChange::ProtectLimitChange {
                limit_before,
                limit_after,
            } => Some(limit_after - limit_before),
            EffectChange::Buff { .. } | EffectChange::Flinch => None,
        }
    }
}

/// The outcome of an action against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub applied: bool,
    pub user: CharacterId,
    pub target: CharacterId,
    pub source: ActionSource,
    pub protect: Option<ProtectInterception>,
    pub labels: BTreeSet<String>,
    pub change: EffectChange,
}

impl ActionResult {
    pub fn amount(&self) -> Option<i32> {
        self.change.amount()
    }

    pub fn is_damage(&self) -> bool {
        matches!(self.change, EffectChange::Damage { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub failure: Option<ActionFailure>,
    pub results: Vec<ActionResult>,
}

impl ActionOutcome {
    pub fn failed(failure: ActionFailure) -> Self {
        Self {
            success: false,
            failure: Some(failure),
            results: Vec::new(),
        }
    }

    pub fn succeeded(results: Vec<ActionResult>) -> Self {
        Self {
            success: true,
            failure: None,
            results,
        }
    }

    /// Counts toward a success streak: the action ran and affected someone.
    pub fn was_applied(&self) -> bool {
        self.success && self.results.iter().any(|result| result.applied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub targets: TargetCalculator,
    pub effect: ActionEffect,
    pub success: SuccessCalculator,
    pub labels: BTreeSet<String>,
    state: TargetState,
}

impl Action {
    pub fn new(targets: TargetCalculator, effect: ActionEffect) -> Self {
        Self {
            targets,
            effect,
            success: SuccessCalculator::Always,
            labels: BTreeSet::new(),
            state: TargetState::Unset,
        }
    }

    pub fn from_data(data: &ActionData) -> Self {
        Self {
            success: data.success,
            labels: data.labels.clone(),
            ..Self::new(data.targets, data.effect.clone())
        }
    }

    pub fn with_success(mut self, success: SuccessCalculator) -> Self {
        self.success = success;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn state(&self) -> &TargetState {
        &self.state
    }

    pub fn is_reactive(&self) -> bool {
        self.targets.is_reactive()
    }

    /// True when a successful resolution is waiting to be used.
    pub fn has_established_targets(&self) -> bool {
        matches!(&self.state, TargetState::Established(resolution) if resolution.success)
    }

    /// Resolves and stores targets. Reactive actions defer resolution to `use_action`.
    pub fn set_targets(
        &mut self,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) {
        if self.is_reactive() {
            return;
        }
        self.state = TargetState::Established(self.targets.calculate(user, others, ctx));
    }

    /// Drops targets that were established but never used.
    pub fn clear_targets(&mut self) {
        if matches!(self.state, TargetState::Established(_)) {
            self.state = TargetState::Unset;
        }
    }

    pub fn use_action(
        &mut self,
        key: ActionKey,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> ActionOutcome {
        let resolution = if self.is_reactive() {
            self.targets.calculate(user, others, ctx)
        } else {
            match &self.state {
                TargetState::Established(resolution) => resolution.clone(),
                TargetState::Unset | TargetState::Used => TargetResolution::failed(),
            }
        };
        if !resolution.success {
            debug!(?key, ?user, effect = self.effect.name(), "action has no targets");
            return ActionOutcome::failed(ActionFailure::NoTargetsSet);
        }

        // From here on the resolution is consumed, whatever happens.
        self.state = TargetState::Used;

        if !self.success.succeeds(user, SuccessSubject::Action(key), ctx) {
            debug!(?key, ?user, effect = self.effect.name(), "action missed");
            return ActionOutcome::failed(ActionFailure::Missed);
        }

        let living: Vec<CharacterId> = resolution
            .targets
            .into_iter()
            .filter(|id| ctx.roster.is_alive(*id))
            .collect();

        match &self.effect {
            ActionEffect::Damage(calculator) => {
                let amounts = calculator.calculate(user, key, &living, ctx);
                if amounts.iter().any(|amount| !amount.success) {
                    debug!(?key, ?user, "damage calculation failed, no target is affected");
                    return ActionOutcome::failed(ActionFailure::DamageCalculationFailed);
                }
                ActionOutcome::succeeded(self.apply_damage(user, &amounts, ctx))
            }
            ActionEffect::Heal(calculator) => {
                let amounts = calculator.calculate(&living, ctx);
                ActionOutcome::succeeded(self.apply_healing(user, &amounts, ctx))
            }
            ActionEffect::Buff { stat, amount } => {
                ActionOutcome::succeeded(self.apply_each(user, &living, ctx, |character| {
                    let stat_value = character.stats.get_mut(*stat);
                    let multiplier_before = stat_value.multiplier;
                    stat_value.multiplier += amount;
                    EffectChange::Buff {
                        stat: *stat,
                        multiplier_before,
                        multiplier_after: stat_value.multiplier,
                    }
                }))
            }
            ActionEffect::Protect => {
                ActionOutcome::succeeded(self.apply_each(user, &living, ctx, |character| {
                    let count_before = character.protect_count;
                    character.protect_count = count_before.saturating_add(1);
                    EffectChange::Protect {
                        count_before,
                        count_after: character.protect_count,
                    }
                }))
            }
            ActionEffect::ProtectLimitChange { amount } => {
                ActionOutcome::succeeded(self.apply_each(user, &living, ctx, |character| {
                    let limit_before = character.protect_limit;
                    character.protect_limit = limit_before.saturating_add(*amount);
                    EffectChange::ProtectLimitChange {
                        limit_before,
                        limit_after: character.protect_limit,
                    }
                }))
            }
            ActionEffect::Flinch => {
                ActionOutcome::succeeded(self.apply_each(user, &living, ctx, |character| {
                    character.will_flinch = true;
                    EffectChange::Flinch
                }))
            }
        }
    }

    fn result(&self, user: CharacterId, target: CharacterId, change: EffectChange) -> ActionResult {
        ActionResult {
            applied: true,
            user,
            target,
            source: ActionSource::Direct,
            protect: None,
            labels: self.labels.clone(),
            change,
        }
    }

    /// Damage is the only effect a shield stops: an active shield absorbs the whole hit.
    fn apply_damage(
        &self,
        user: CharacterId,
        amounts: &[CalculatedAmount],
        ctx: &mut BattleContext,
    ) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(amounts.len());
        for calculated in amounts {
            let Some(target) = ctx.roster.get_mut(calculated.target) else {
                continue;
            };
            if target.active_shields() > 0 {
                let shields_before = target.active_shields();
                target.protect_count -= 1;
                let health = target.current_health();
                results.push(ActionResult {
                    applied: false,
                    protect: Some(ProtectInterception {
                        shields_before,
                        shields_after: target.active_shields(),
                    }),
                    ..self.result(
                        user,
                        calculated.target,
                        EffectChange::Damage {
                            health_before: health,
                            health_after: health,
                        },
                    )
                });
                continue;
            }
            let (health_before, health_after) = target.take_damage(calculated.amount);
            results.push(self.result(
                user,
                calculated.target,
                EffectChange::Damage {
                    health_before,
                    health_after,
                },
            ));
        }
        results
    }

    fn apply_healing(
        &self,
        user: CharacterId,
        amounts: &[CalculatedAmount],
        ctx: &mut BattleContext,
    ) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(amounts.len());
        for calculated in amounts.iter().filter(|amount| amount.success) {
            let Some(target) = ctx.roster.get_mut(calculated.target) else {
                continue;
            };
            let (health_before, health_after) = target.heal(calculated.amount);
            results.push(self.result(
                user,
                calculated.target,
                EffectChange::Heal {
                    health_before,
                    health_after,
                },
            ));
        }
        results
    }

    fn apply_each(
        &self,
        user: CharacterId,
        targets: &[CharacterId],
        ctx: &mut BattleContext,
        mut apply: impl FnMut(&mut Character) -> EffectChange,
    ) -> Vec<ActionResult> {
        targets
            .iter()
            .filter_map(|target_id| {
                let character = ctx.roster.get_mut(*target_id)?;
                Some(self.result(user, *target_id, apply(character)))
            })
            .collect()
    }
}
