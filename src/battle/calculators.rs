use crate::battle::actions::ActionKey;
use crate::battle::context::BattleContext;
use crate::battle::rng::RandomSource;
use crate::character::{Character, CharacterId};
use crate::moves::MoveId;
use schema::{DamageCalculator, HealingCalculator, MoveOutcome, SuccessCalculator, Transform};
use serde::{Deserialize, Serialize};

/// What a success check is about; combo accuracy reads the matching streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuccessSubject {
    Move(MoveId),
    Action(ActionKey),
}

pub trait SuccessCalculatorExt {
    fn calculate(
        &self,
        user: CharacterId,
        subject: SuccessSubject,
        ctx: &mut BattleContext,
    ) -> MoveOutcome;

    /// The single-action form of `calculate`.
    fn succeeds(
        &self,
        user: CharacterId,
        subject: SuccessSubject,
        ctx: &mut BattleContext,
    ) -> bool {
        self.calculate(user, subject, ctx) == MoveOutcome::Success
    }
}

impl SuccessCalculatorExt for SuccessCalculator {
    fn calculate(
        &self,
        user: CharacterId,
        subject: SuccessSubject,
        ctx: &mut BattleContext,
    ) -> MoveOutcome {
        match self {
            SuccessCalculator::Always => MoveOutcome::Success,
            SuccessCalculator::Accuracy { accuracy } => accuracy_roll(*accuracy as i32, ctx.rng),
            SuccessCalculator::ComboAccuracy {
                base,
                linear_factor,
                minimum,
            } => {
                let streak = match subject {
                    SuccessSubject::Move(move_id) => {
                        ctx.history.consecutive_move_success_count(move_id, user)
                    }
                    SuccessSubject::Action(key) => ctx.history.consecutive_success_count(key, user),
                };
                let accuracy =
                    combo_accuracy(*base as i32, *linear_factor as i32, *minimum as i32, streak);
                accuracy_roll(accuracy, ctx.rng)
            }
        }
    }
}

/// Rolls 1..=100 and succeeds when the roll is at most `accuracy`.
pub fn accuracy_roll(accuracy: i32, rng: &mut dyn RandomSource) -> MoveOutcome {
    let roll = rng.next(100) + 1;
    if roll <= accuracy {
        MoveOutcome::Success
    } else {
        MoveOutcome::Miss
    }
}

pub fn combo_accuracy(base: i32, linear_factor: i32, minimum: i32, streak: usize) -> i32 {
    let streak = i32::try_from(streak).unwrap_or(i32::MAX);
    base.saturating_sub(linear_factor.saturating_mul(streak))
        .max(minimum)
}

/// A per-target magnitude. `success == false` means the formula could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedAmount {
    pub target: CharacterId,
    pub success: bool,
    pub amount: i32,
}

impl CalculatedAmount {
    pub fn of(target: CharacterId, amount: i32) -> Self {
        Self {
            target,
            success: true,
            amount,
        }
    }

    pub fn failed(target: CharacterId) -> Self {
        Self {
            target,
            success: false,
            amount: 0,
        }
    }
}

pub trait DamageCalculatorExt {
    /// Computes damage for every target in one batch.
    fn calculate(
        &self,
        user: CharacterId,
        action: ActionKey,
        targets: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> Vec<CalculatedAmount>;
}

impl DamageCalculatorExt for DamageCalculator {
    fn calculate(
        &self,
        user: CharacterId,
        action: ActionKey,
        targets: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> Vec<CalculatedAmount> {
        let Some(attacker) = ctx.roster.get(user).cloned() else {
            return targets.iter().map(|t| CalculatedAmount::failed(*t)).collect();
        };

        // Streak and retaliation amounts depend only on the user, so read them once.
        let last_received = match self {
            DamageCalculator::PercentageOfLastReceived { .. } => ctx
                .history
                .last_damage_result_against(user)
                .and_then(|result| result.amount()),
            _ => None,
        };
        let streak = match self {
            DamageCalculator::ComboScaling { .. } => {
                ctx.history.consecutive_success_count(action, user)
            }
            _ => 0,
        };

        let mut amounts = Vec::with_capacity(targets.len());
        for target_id in targets {
            let Some(target) = ctx.roster.get(*target_id) else {
                amounts.push(CalculatedAmount::failed(*target_id));
                continue;
            };
            let amount = match self {
                DamageCalculator::Absolute { amount } => Some(*amount),
                DamageCalculator::Percentage { percentage } => {
                    Some(percentage_of(target.max_health(), *percentage))
                }
                DamageCalculator::BasePower { base_power } => {
                    let defence = target.stats.defence.current();
                    let range = range_factor(ctx.rng);
                    Some(base_power_damage(&attacker, defence, *base_power, range))
                }
                DamageCalculator::StatDifference { base_power } => Some(base_power_damage(
                    &attacker,
                    target.stats.defence.current(),
                    *base_power,
                    1.0,
                )),
                DamageCalculator::ComboScaling {
                    starting_base_power,
                    linear_factor,
                } => {
                    let streak = i32::try_from(streak).unwrap_or(i32::MAX);
                    let base_power =
                        starting_base_power.saturating_add(linear_factor.saturating_mul(streak));
                    let defence = target.stats.defence.current();
                    let range = range_factor(ctx.rng);
                    Some(base_power_damage(&attacker, defence, base_power, range))
                }
                DamageCalculator::PercentageOfLastReceived { percentage } => {
                    last_received.map(|last| percentage_of(last, *percentage))
                }
            };
            amounts.push(match amount {
                Some(amount) => CalculatedAmount::of(*target_id, amount),
                None => CalculatedAmount::failed(*target_id),
            });
        }
        amounts
    }
}

pub trait HealingCalculatorExt {
    fn calculate(&self, targets: &[CharacterId], ctx: &mut BattleContext) -> Vec<CalculatedAmount>;
}

impl HealingCalculatorExt for HealingCalculator {
    fn calculate(&self, targets: &[CharacterId], ctx: &mut BattleContext) -> Vec<CalculatedAmount> {
        targets
            .iter()
            .map(|target_id| match ctx.roster.get(*target_id) {
                Some(target) => CalculatedAmount::of(
                    *target_id,
                    match self {
                        HealingCalculator::Absolute { amount } => *amount,
                        HealingCalculator::Percentage { percentage } => {
                            percentage_of(target.max_health(), *percentage)
                        }
                    },
                ),
                None => CalculatedAmount::failed(*target_id),
            })
            .collect()
    }
}

/// `max(1, value * percentage / 100)`
pub fn percentage_of(value: i32, percentage: i32) -> i32 {
    let scaled = value as i64 * percentage as i64 / 100;
    (scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32).max(1)
}

/// The 80-100% spread applied by the random power formulas.
fn range_factor(rng: &mut dyn RandomSource) -> f64 {
    rng.next_range(80, 101) as f64 / 100.0
}

/// `max(1, trunc(item-transformed power * (attack - defence) * range))`
///
/// A defence above the attack drives the power negative; the floor still applies.
pub fn base_power_damage(
    attacker: &Character,
    defence: i32,
    base_power: i32,
    range_factor: f64,
) -> i32 {
    let power_transforms = attacker
        .item()
        .map(|item| item.power_transforms())
        .unwrap_or(&[]);
    let transformed_power = Transform::apply_all(base_power as f64, power_transforms);
    let normalised_power = transformed_power * (attacker.stats.attack.current() - defence) as f64;
    ((normalised_power * range_factor) as i32).max(1)
}
