//! Skirmish combat engine
//!
//! A deterministic turn-based combat resolution engine. Moves are ordered
//! lists of actions; each action picks its targets, decides whether it lands
//! and applies its effect, and every result is appended to an action history
//! that later calculators read for combos and retaliation.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod character;
pub mod config;
pub mod errors;
pub mod items;
pub mod moves;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    ActionData, ActionEffect, ActionFailure, BattleConfig, CandidatePool, CharacterData,
    DamageCalculator, HealingCalculator, ItemData, MoveData, MoveOutcome, StatKind,
    SuccessCalculator, TargetCalculator, Transform,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{collect_npc_actions, ready_for_turn_resolution, resolve_turn, run_battle};
pub use battle::move_processor::{MoveProcessor, MoveRequest};
pub use battle::state::{BattleEvent, BattleState, EventBus, GameState};

// Core runtime types for a battle.
pub use battle::actions::{Action, ActionKey, ActionOutcome, ActionResult};
pub use battle::history::{ActionHistory, MoveUse};
pub use battle::rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use character::{Character, CharacterBuilder, CharacterId, Roster};
pub use items::{Ability, Item};
pub use moves::{Move, MoveId, MoveSet};

// Data loading.
pub use config::{load_battle_config, parse_battle_config};

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, BattleStateError, CharacterDataError, ConfigError,
    MoveDataError, MoveDataResult,
};
