//! Move choice for characters no player controls.

use crate::battle::move_processor::MoveRequest;
use crate::battle::state::BattleState;
use crate::character::CharacterId;
use crate::moves::MoveId;

/// A trait for any system that can pick a move for a character.
pub trait Behavior {
    /// Picks the next move for `user`, or `None` when it has nothing usable.
    fn decide_move(&self, user: CharacterId, battle_state: &mut BattleState) -> Option<MoveRequest>;
}

/// Picks uniformly among the user's usable moves and offers every other
/// living character as a candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBehavior;

impl RandomBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for RandomBehavior {
    fn decide_move(
        &self,
        user: CharacterId,
        battle_state: &mut BattleState,
    ) -> Option<MoveRequest> {
        let character = battle_state.roster.get(user)?;
        if character.is_dead() {
            return None;
        }
        let usable: Vec<MoveId> = character
            .moves
            .iter()
            .copied()
            .filter(|move_id| battle_state.moves.get(*move_id).is_some_and(|m| m.can_use()))
            .collect();
        if usable.is_empty() {
            return None;
        }
        let others: Vec<CharacterId> = battle_state
            .roster
            .living_ids()
            .filter(|id| *id != user)
            .collect();

        let roll = battle_state.rng_mut().next(usable.len() as i32);
        let move_id = usable[roll.clamp(0, usable.len() as i32 - 1) as usize];
        Some(MoveRequest {
            user,
            move_id,
            others,
        })
    }
}
