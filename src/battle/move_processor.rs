use crate::battle::history::MoveUse;
use crate::battle::state::BattleState;
use crate::character::{CharacterId, Roster};
use crate::errors::BattleStateError;
use crate::moves::MoveId;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::VecDeque;
use tracing::warn;

/// A request to use a move this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub user: CharacterId,
    pub move_id: MoveId,
    /// The initial candidate set handed to the move.
    pub others: Vec<CharacterId>,
}

/// Queue of the moves requested for a turn.
#[derive(Debug, Clone, Default)]
pub struct MoveProcessor {
    queue: VecDeque<MoveRequest>,
}

impl MoveProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &MoveRequest> {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Queues a request. Only moves the user knows and can still use are accepted.
    pub fn push(
        &mut self,
        request: MoveRequest,
        state: &BattleState,
    ) -> Result<(), BattleStateError> {
        let user = state.roster.character(request.user)?;
        let move_instance = state.moves.move_ref(request.move_id)?;
        if !user.moves.contains(&request.move_id) {
            return Err(BattleStateError::MoveNotKnown {
                character: request.user,
                move_id: request.move_id,
            });
        }
        if !move_instance.can_use() {
            return Err(BattleStateError::NoRemainingUses {
                move_id: request.move_id,
            });
        }
        self.queue.push_back(request);
        Ok(())
    }

    /// Sorts the queue by the users' current speed, fastest first.
    /// The sort is stable: on a tie the request queued first goes first.
    pub fn order_by_speed(&mut self, roster: &Roster) {
        self.queue.make_contiguous().sort_by_key(|request| {
            Reverse(
                roster
                    .get(request.user)
                    .map(|character| character.stats.speed.current())
                    .unwrap_or(i32::MIN),
            )
        });
    }

    /// Removes and returns the next request to apply.
    pub fn pop_next(&mut self) -> Option<MoveRequest> {
        self.queue.pop_front()
    }

    /// Orders the queue by speed and applies every request in turn, recording
    /// each use in the history. Later moves see the effects of earlier ones.
    pub fn apply(&mut self, state: &mut BattleState) -> Vec<MoveUse> {
        self.order_by_speed(&state.roster);
        let mut applied = Vec::with_capacity(self.queue.len());
        while let Some(request) = self.pop_next() {
            match state.use_move(&request) {
                Ok(move_use) => applied.push(move_use),
                Err(err) => warn!(%err, "skipping queued move"),
            }
        }
        applied
    }
}
