//! Target calculators: `(user, others) -> (success, targets)`.
//!
//! An empty candidate pool is a normal outcome (`success == false`), not an error.

use crate::battle::context::BattleContext;
use crate::character::{CharacterId, Roster};
use schema::{CandidatePool, TargetCalculator};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResolution {
    pub success: bool,
    pub targets: Vec<CharacterId>,
}

impl TargetResolution {
    pub fn failed() -> Self {
        Self {
            success: false,
            targets: Vec::new(),
        }
    }

    /// Succeeds only when `targets` is non-empty.
    pub fn from_pool(targets: Vec<CharacterId>) -> Self {
        Self {
            success: !targets.is_empty(),
            targets,
        }
    }

    pub fn single(target: CharacterId) -> Self {
        Self {
            success: true,
            targets: vec![target],
        }
    }
}

pub trait TargetCalculatorExt {
    fn calculate(
        &self,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> TargetResolution;
}

impl TargetCalculatorExt for TargetCalculator {
    fn calculate(
        &self,
        user: CharacterId,
        others: &[CharacterId],
        ctx: &mut BattleContext,
    ) -> TargetResolution {
        let Some(user_team) = ctx.roster.get(user).map(|character| character.team) else {
            return TargetResolution::failed();
        };
        let others = distinct_others(user, others, ctx.roster);
        let on_team = |roster: &Roster, id: &CharacterId| {
            roster.get(*id).is_some_and(|c| c.team == user_team)
        };

        match self {
            TargetCalculator::User => TargetResolution::single(user),
            TargetCalculator::AllOthers => TargetResolution::from_pool(others),
            TargetCalculator::Allies => TargetResolution::from_pool(
                others
                    .into_iter()
                    .filter(|id| on_team(ctx.roster, id))
                    .collect(),
            ),
            TargetCalculator::Enemies => TargetResolution::from_pool(
                others
                    .into_iter()
                    .filter(|id| !on_team(ctx.roster, id))
                    .collect(),
            ),
            TargetCalculator::Team => {
                let mut targets = vec![user];
                targets.extend(others.into_iter().filter(|id| on_team(ctx.roster, id)));
                TargetResolution::from_pool(targets)
            }
            TargetCalculator::FirstEnemy => others
                .into_iter()
                .find(|id| !on_team(ctx.roster, id) && ctx.roster.is_alive(*id))
                .map(TargetResolution::single)
                .unwrap_or_else(TargetResolution::failed),
            TargetCalculator::FirstAlly => others
                .into_iter()
                .find(|id| on_team(ctx.roster, id) && ctx.roster.is_alive(*id))
                .map(TargetResolution::single)
                .unwrap_or_else(TargetResolution::failed),
            TargetCalculator::Random(pool) => {
                let candidates = living_pool(*pool, user, user_team, &others, ctx.roster);
                if candidates.is_empty() {
                    return TargetResolution::failed();
                }
                let index = ctx.rng.next(candidates.len() as i32) as usize;
                candidates
                    .get(index)
                    .copied()
                    .map(TargetResolution::single)
                    .unwrap_or_else(TargetResolution::failed)
            }
            TargetCalculator::Player(pool) => {
                let candidates = living_pool(*pool, user, user_team, &others, ctx.roster);
                if candidates.is_empty() {
                    return TargetResolution::failed();
                }
                let Some(selector) = ctx.selector.as_deref_mut() else {
                    debug!(?user, "no target selector available for a player-chosen target");
                    return TargetResolution::failed();
                };
                match selector.select_target(ctx.roster, &candidates) {
                    Some(choice) if candidates.contains(&choice) => {
                        TargetResolution::single(choice)
                    }
                    _ => TargetResolution::failed(),
                }
            }
            TargetCalculator::LastAttacker => ctx
                .history
                .last_damage_result_against(user)
                .map(|result| TargetResolution::single(result.user))
                .unwrap_or_else(TargetResolution::failed),
        }
    }
}

/// `others` in order, without the user, duplicates or unknown ids.
fn distinct_others(user: CharacterId, others: &[CharacterId], roster: &Roster) -> Vec<CharacterId> {
    let mut distinct = Vec::with_capacity(others.len());
    for id in others {
        if *id != user && roster.get(*id).is_some() && !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    distinct
}

fn living_pool(
    pool: CandidatePool,
    user: CharacterId,
    user_team: u32,
    others: &[CharacterId],
    roster: &Roster,
) -> Vec<CharacterId> {
    let same_team = |id: &CharacterId| roster.get(*id).is_some_and(|c| c.team == user_team);
    let candidates: Vec<CharacterId> = match pool {
        CandidatePool::Any => std::iter::once(user).chain(others.iter().copied()).collect(),
        CandidatePool::Ally => others.iter().copied().filter(same_team).collect(),
        CandidatePool::Enemy => others.iter().copied().filter(|id| !same_team(id)).collect(),
        CandidatePool::Other => others.to_vec(),
    };
    candidates
        .into_iter()
        .filter(|id| roster.is_alive(*id))
        .collect()
}
