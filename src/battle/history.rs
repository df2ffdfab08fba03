//! The action history: an append-only, turn-scoped ledger of move uses.
//!
//! Entries are never rewritten. Queries scan backward from the latest entry.
//! A per-action index is kept alongside the entries and only ever grows with them.

use crate::battle::actions::{ActionKey, ActionOutcome, ActionResult};
use crate::character::CharacterId;
use crate::moves::MoveId;
use schema::MoveOutcome;
use serde::{Deserialize, Serialize};

/// One use of one action inside a move use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionUse {
    pub key: ActionKey,
    pub user: CharacterId,
    pub outcome: ActionOutcome,
}

/// One call to `Move::use_move` and everything it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveUse {
    pub move_id: MoveId,
    pub user: CharacterId,
    pub outcome: MoveOutcome,
    pub actions: Vec<ActionUse>,
}

impl MoveUse {
    pub fn results(&self) -> impl Iterator<Item = &ActionResult> {
        self.actions
            .iter()
            .flat_map(|action| action.outcome.results.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: u32,
    pub move_use: MoveUse,
}

/// Position of an `ActionUse` inside `entries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ActionIndexEntry {
    turn: u32,
    entry: usize,
    action: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionHistory {
    turn: u32,
    entries: Vec<HistoryEntry>,
    action_index: Vec<ActionIndexEntry>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only called at battle start.
    pub fn clear(&mut self) {
        self.turn = 0;
        self.entries.clear();
        self.action_index.clear();
    }

    pub fn start_turn(&mut self) {
        self.turn += 1;
    }

    pub fn current_turn(&self) -> u32 {
        self.turn
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, move_use: MoveUse) {
        let entry = self.entries.len();
        for action in 0..move_use.actions.len() {
            self.action_index.push(ActionIndexEntry {
                turn: self.turn,
                entry,
                action,
            });
        }
        self.entries.push(HistoryEntry {
            turn: self.turn,
            move_use,
        });
    }

    fn action_use(&self, index: &ActionIndexEntry) -> &ActionUse {
        &self.entries[index.entry].move_use.actions[index.action]
    }

    /// The latest applied damage result against `character` in the current turn.
    pub fn last_damage_result_against(&self, character: CharacterId) -> Option<&ActionResult> {
        self.action_index
            .iter()
            .rev()
            .take_while(|index| index.turn == self.turn)
            .flat_map(|index| self.action_use(index).outcome.results.iter().rev())
            .find(|result| result.is_damage() && result.applied && result.target == character)
    }

    /// Trailing applied uses of `key` by `user`, across turns, up to the first failure.
    pub fn consecutive_success_count(&self, key: ActionKey, user: CharacterId) -> usize {
        self.action_index
            .iter()
            .rev()
            .map(|index| self.action_use(index))
            .filter(|action| action.key == key && action.user == user)
            .take_while(|action| action.outcome.was_applied())
            .count()
    }

    /// Trailing successful uses of `move_id` by `user` across turns, up to the
    /// first miss or failure.
    pub fn consecutive_move_success_count(&self, move_id: MoveId, user: CharacterId) -> usize {
        self.entries
            .iter()
            .rev()
            .map(|entry| &entry.move_use)
            .filter(|move_use| move_use.move_id == move_id && move_use.user == user)
            .take_while(|move_use| move_use.outcome == MoveOutcome::Success)
            .count()
    }
}
