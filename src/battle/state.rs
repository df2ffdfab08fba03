use crate::battle::actions::EffectChange;
use crate::battle::context::{BattleContext, TargetSelector};
use crate::battle::history::{ActionHistory, MoveUse};
use crate::battle::move_processor::MoveRequest;
use crate::battle::rng::{RandomSource, SeededRandom};
use crate::character::{CharacterId, Roster};
use crate::errors::BattleStateError;
use crate::moves::{MoveId, MoveSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Turns a battle is allowed to run before it is called a draw.
pub const DEFAULT_MAX_TURNS: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    /// Only this team has characters left standing.
    TeamWin(u32),
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::TeamWin(_) | GameState::Draw)
    }
}

/// Why a queued move did not run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UserDefeated,
    Flinched,
    NoRemainingUses,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
    },
    MoveResolved {
        move_use: MoveUse,
    },
    MoveSkipped {
        user: CharacterId,
        move_id: MoveId,
        reason: SkipReason,
    },
    CharacterDefeated {
        character: CharacterId,
    },
    ShieldsDropped {
        character: CharacterId,
        count: u32,
    },
    TurnEnded {
        turn_number: u32,
    },
    /// `winner` is `None` for a draw.
    BattleEnded {
        winner: Option<u32>,
    },
}

impl BattleEvent {
    /// Characters a resolved move took from alive to defeated.
    pub fn defeated_by(move_use: &MoveUse) -> Vec<CharacterId> {
        let mut defeated = Vec::new();
        for result in move_use.results() {
            if let EffectChange::Damage {
                health_before,
                health_after,
            } = result.change
            {
                if health_before > 0 && health_after == 0 && !defeated.contains(&result.target) {
                    defeated.push(result.target);
                }
            }
        }
        defeated
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Moves every event of `other` onto the end of this bus.
    pub fn append(&mut self, other: EventBus) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    /// Debug format of every event, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Everything a battle owns: characters, move instances, the action history
/// and the injected randomness.
pub struct BattleState {
    pub roster: Roster,
    pub moves: MoveSet,
    pub history: ActionHistory,
    pub turn_number: u32,
    pub game_state: GameState,
    pub max_turns: u32,
    rng: Box<dyn RandomSource>,
    selector: Option<Box<dyn TargetSelector>>,
}

impl BattleState {
    pub fn new(roster: Roster, moves: MoveSet, rng: Box<dyn RandomSource>) -> Self {
        Self {
            roster,
            moves,
            history: ActionHistory::new(),
            turn_number: 0,
            game_state: GameState::WaitingForActions,
            max_turns: DEFAULT_MAX_TURNS,
            rng,
            selector: None,
        }
    }

    /// A battle seeded for reproducible runs.
    pub fn seeded(roster: Roster, moves: MoveSet, seed: u64) -> Self {
        Self::new(roster, moves, Box::new(SeededRandom::new(seed)))
    }

    pub fn with_selector(mut self, selector: Box<dyn TargetSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn rng_mut(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Borrows the state as a resolution context for calculators and actions.
    pub fn context(&mut self) -> BattleContext<'_> {
        BattleContext {
            roster: &mut self.roster,
            history: &self.history,
            rng: self.rng.as_mut(),
            selector: self
                .selector
                .as_deref_mut()
                .map(|selector| selector as &mut dyn TargetSelector),
        }
    }

    /// Uses one move and appends the result to the history.
    pub fn use_move(&mut self, request: &MoveRequest) -> Result<MoveUse, BattleStateError> {
        let BattleState {
            roster,
            moves,
            history,
            rng,
            selector,
            ..
        } = self;

        roster.character(request.user)?;
        let move_instance = moves
            .get_mut(request.move_id)
            .ok_or(BattleStateError::UnknownMove(request.move_id))?;
        if !move_instance.can_use() {
            return Err(BattleStateError::NoRemainingUses {
                move_id: request.move_id,
            });
        }

        let move_use = {
            let mut ctx = BattleContext {
                roster,
                history,
                rng: rng.as_mut(),
                selector: selector
                    .as_deref_mut()
                    .map(|selector| selector as &mut dyn TargetSelector),
            };
            move_instance.use_move(request.user, &request.others, &mut ctx)
        };
        debug!(
            move_name = %move_instance.name,
            user = ?request.user,
            outcome = %move_use.outcome,
            "move used"
        );

        history.record(move_use.clone());
        Ok(move_use)
    }

    /// `TeamWin` when exactly one team is left standing, `Draw` when none is.
    pub fn standing_result(&self) -> Option<GameState> {
        match self.roster.teams_standing().as_slice() {
            [] => Some(GameState::Draw),
            [team] => Some(GameState::TeamWin(*team)),
            _ => None,
        }
    }
}

impl fmt::Debug for BattleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleState")
            .field("roster", &self.roster)
            .field("moves", &self.moves)
            .field("history", &self.history.len())
            .field("turn_number", &self.turn_number)
            .field("game_state", &self.game_state)
            .field("max_turns", &self.max_turns)
            .finish_non_exhaustive()
    }
}
