use crate::battle::actions::{Action, ActionKey, ActionResult, ActionSource};
use crate::battle::calculators::{SuccessCalculatorExt, SuccessSubject};
use crate::battle::context::BattleContext;
use crate::battle::history::{ActionUse, MoveUse};
use crate::character::{CharacterId, Roster};
use crate::errors::{BattleStateError, MoveDataError, MoveDataResult};
use schema::{
    ActionData, ActionEffect, DamageCalculator, HealingCalculator, MoveData, MoveOutcome,
    SuccessCalculator,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Index of a move instance in its `MoveSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub usize);

/// A move instance: an ordered list of actions behind one success check and a use counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    pub name: String,
    pub description: String,
    max_uses: u32,
    remaining_uses: u32,
    pub priority: i8,
    pub success: SuccessCalculator,
    actions: Vec<Action>,
}

impl Move {
    /// Validates `data` and builds a fresh instance with every use available.
    pub fn from_data(id: MoveId, data: &MoveData) -> MoveDataResult<Self> {
        validate_move_data(data)?;
        Ok(Self {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            max_uses: data.max_uses,
            remaining_uses: data.max_uses,
            priority: data.priority,
            success: data.success,
            actions: data.actions.iter().map(Action::from_data).collect(),
        })
    }

    pub fn max_uses(&self) -> u32 {
        self.max_uses
    }

    pub fn remaining_uses(&self) -> u32 {
        self.remaining_uses
    }

    /// Clamped to `max_uses`.
    pub fn set_remaining_uses(&mut self, uses: u32) {
        self.remaining_uses = uses.min(self.max_uses);
    }

    pub fn can_use(&self) -> bool {
        self.remaining_uses > 0
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action_key(&self, index: usize) -> ActionKey {
        ActionKey {
            move_id: self.id,
            index,
        }
    }

    /// Establishes targets for every action at dispatch time.
    pub fn set_targets(
        &mut self,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) {
        for action in &mut self.actions {
            action.set_targets(user, others, ctx);
        }
    }

    /// Runs the move.
    ///
    /// The success check runs once. On success the actions run in declared
    /// order against a candidate set that starts as `others` and is narrowed
    /// after each action; the first unsuccessful action stops the sequence.
    /// A use is consumed whatever the outcome.
    pub fn use_move(
        &mut self,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> MoveUse {
        let outcome = if ctx.roster.is_alive(user) {
            self.success
                .calculate(user, SuccessSubject::Move(self.id), ctx)
        } else {
            MoveOutcome::Failure
        };

        let mut action_uses = Vec::new();
        if outcome == MoveOutcome::Success {
            let mut targets = others.to_vec();
            for (index, action) in self.actions.iter_mut().enumerate() {
                let key = ActionKey {
                    move_id: self.id,
                    index,
                };
                // Actions without dispatch-time targets resolve against the narrowed set.
                if !action.is_reactive() && !action.has_established_targets() {
                    action.set_targets(user, &targets, ctx);
                }
                let mut action_outcome = action.use_action(key, user, &targets, ctx);
                for result in &mut action_outcome.results {
                    result.source = ActionSource::Move(self.id);
                }

                let succeeded = action_outcome.success;
                if succeeded {
                    targets = narrow_targets(&targets, &action_outcome.results, ctx.roster);
                }
                action_uses.push(ActionUse {
                    key,
                    user,
                    outcome: action_outcome,
                });
                if !succeeded {
                    debug!(move_name = %self.name, index, "action failed, stopping move");
                    break;
                }
            }
        }

        // Targets set for this use must not carry over to the next one.
        for action in &mut self.actions {
            action.clear_targets();
        }
        self.remaining_uses = self.remaining_uses.saturating_sub(1);
        MoveUse {
            move_id: self.id,
            user,
            outcome,
            actions: action_uses,
        }
    }
}

/// Candidates for the next action: everyone this action did not address,
/// plus everyone it addressed and actually affected. Defeated characters drop out.
pub fn narrow_targets(
    targets: &[CharacterId],
    results: &[ActionResult],
    roster: &Roster,
) -> Vec<CharacterId> {
    let was_hit = |id: &CharacterId| results.iter().any(|result| result.target == *id);
    let was_applied = |id: &CharacterId| {
        results
            .iter()
            .any(|result| result.target == *id && result.applied)
    };

    let mut next: Vec<CharacterId> = targets
        .iter()
        .copied()
        .filter(|id| !was_hit(id) || was_applied(id))
        .collect();
    for result in results.iter().filter(|result| result.applied) {
        if !next.contains(&result.target) {
            next.push(result.target);
        }
    }
    next.retain(|id| roster.is_alive(*id));
    next
}

fn validate_move_data(data: &MoveData) -> MoveDataResult<()> {
    if data.name.trim().is_empty() {
        return Err(MoveDataError::MissingName);
    }
    if data.max_uses == 0 {
        return Err(MoveDataError::NoUses(data.name.clone()));
    }
    if data.actions.is_empty() {
        return Err(MoveDataError::NoActions(data.name.clone()));
    }
    validate_success(&data.name, &data.success)?;
    for action in &data.actions {
        validate_action_data(&data.name, action)?;
    }
    Ok(())
}

fn validate_success(name: &str, success: &SuccessCalculator) -> MoveDataResult<()> {
    match *success {
        SuccessCalculator::Accuracy { accuracy }
        | SuccessCalculator::ComboAccuracy {
            base: accuracy, ..
        } if accuracy > 100 => Err(MoveDataError::InvalidAccuracy {
            name: name.to_string(),
            accuracy,
        }),
        _ => Ok(()),
    }
}

fn validate_action_data(name: &str, action: &ActionData) -> MoveDataResult<()> {
    validate_success(name, &action.success)?;
    let percentage = match &action.effect {
        ActionEffect::Damage(DamageCalculator::Percentage { percentage })
        | ActionEffect::Damage(DamageCalculator::PercentageOfLastReceived { percentage })
        | ActionEffect::Heal(HealingCalculator::Percentage { percentage }) => Some(*percentage),
        _ => None,
    };
    if let Some(percentage) = percentage.filter(|p| *p <= 0) {
        return Err(MoveDataError::InvalidPercentage {
            name: name.to_string(),
            percentage,
        });
    }

    let amount = match &action.effect {
        ActionEffect::Damage(DamageCalculator::Absolute { amount })
        | ActionEffect::Heal(HealingCalculator::Absolute { amount }) => Some(*amount),
        _ => None,
    };
    if let Some(amount) = amount.filter(|a| *a < 0) {
        return Err(MoveDataError::NegativeAmount {
            name: name.to_string(),
            amount,
        });
    }
    Ok(())
}

/// Arena of move instances, indexed by `MoveId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveSet {
    moves: Vec<Move>,
}

impl MoveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, data: &MoveData) -> MoveDataResult<MoveId> {
        let id = MoveId(self.moves.len());
        self.moves.push(Move::from_data(id, data)?);
        Ok(id)
    }

    pub fn get(&self, id: MoveId) -> Option<&Move> {
        self.moves.get(id.0)
    }

    pub fn get_mut(&mut self, id: MoveId) -> Option<&mut Move> {
        self.moves.get_mut(id.0)
    }

    pub fn move_ref(&self, id: MoveId) -> Result<&Move, BattleStateError> {
        self.get(id).ok_or(BattleStateError::UnknownMove(id))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
