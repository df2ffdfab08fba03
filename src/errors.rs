use crate::character::CharacterId;
use crate::moves::MoveId;
use thiserror::Error;

/// Main error type for the skirmish combat engine.
///
/// Every variant is a construction-time or API-misuse problem. Ordinary battle
/// outcomes (misses, missing targets, failed damage calculations) are result
/// values and never surface here.
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to move definitions
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to character or item definitions
    #[error("Character data error: {0}")]
    CharacterData(#[from] CharacterDataError),
    /// Error related to an invalid request against the battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error loading a battle description
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while validating a move definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    #[error("Move has no name")]
    MissingName,
    #[error("Move '{0}' must allow at least one use")]
    NoUses(String),
    #[error("Move '{0}' has no actions")]
    NoActions(String),
    #[error("Move '{name}' has accuracy {accuracy}, expected 0..=100")]
    InvalidAccuracy { name: String, accuracy: u8 },
    #[error("Move '{name}' has a non-positive percentage: {percentage}")]
    InvalidPercentage { name: String, percentage: i32 },
    #[error("Move '{name}' has a negative amount: {amount}")]
    NegativeAmount { name: String, amount: i32 },
    #[error("Move not found: {0}")]
    UnknownMove(String),
}

/// Errors raised while building a character or item
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterDataError {
    #[error("Character has no name")]
    MissingName,
    #[error("Character '{name}' has non-positive max health: {max_health}")]
    InvalidHealth { name: String, max_health: i32 },
    #[error("Item has no name")]
    MissingItemName,
    #[error("Item not found: {0}")]
    UnknownItem(String),
}

/// Errors raised when a request refers to state that cannot honour it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("Unknown character: {0:?}")]
    UnknownCharacter(CharacterId),
    #[error("Unknown move: {0:?}")]
    UnknownMove(MoveId),
    #[error("Move {move_id:?} has no remaining uses")]
    NoRemainingUses { move_id: MoveId },
    #[error("Character {character:?} does not know move {move_id:?}")]
    MoveNotKnown {
        character: CharacterId,
        move_id: MoveId,
    },
    #[error("Battle is already over")]
    BattleOver,
}

/// Errors loading a RON battle description
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read battle file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse battle file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;
