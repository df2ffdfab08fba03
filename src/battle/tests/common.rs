use crate::battle::rng::ScriptedRandom;
use crate::battle::state::BattleState;
use crate::character::{CharacterBuilder, CharacterId, Roster};
use crate::errors::BattleResult;
use crate::moves::{MoveId, MoveSet};
use schema::{
    ActionData, ActionEffect, DamageCalculator, MoveData, SuccessCalculator, TargetCalculator,
};

/// An action definition with no labels.
pub fn action(targets: TargetCalculator, effect: ActionEffect) -> ActionData {
    ActionData {
        targets,
        effect,
        success: SuccessCalculator::Always,
        labels: Default::default(),
    }
}

/// A move definition with ten uses and no priority.
pub fn move_data(name: &str, success: SuccessCalculator, actions: Vec<ActionData>) -> MoveData {
    MoveData {
        name: name.to_string(),
        description: String::new(),
        max_uses: 10,
        priority: 0,
        success,
        actions,
    }
}

/// A move that always lands and deals `amount` to the first enemy.
pub fn strike(amount: i32) -> MoveData {
    move_data(
        "Strike",
        SuccessCalculator::Always,
        vec![action(
            TargetCalculator::FirstEnemy,
            ActionEffect::Damage(DamageCalculator::Absolute { amount }),
        )],
    )
}

/// A builder for test battles: characters and moves are registered in order
/// and the RNG replays a fixed script.
///
/// # Example
/// ```ignore
/// let mut builder = TestBattleBuilder::new();
/// let strike = builder.add_move(strike(10));
/// let hero = builder.add_character(CharacterBuilder::new("Hero", 1).with_moves(vec![strike]));
/// let mut battle_state = builder.build(vec![]);
/// ```
#[derive(Default)]
pub struct TestBattleBuilder {
    roster: Roster,
    moves: MoveSet,
}

impl TestBattleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh move instance.
    pub fn add_move(&mut self, data: MoveData) -> MoveId {
        match self.moves.add(&data) {
            Ok(id) => id,
            Err(err) => panic!("Failed to build test move '{}': {}", data.name, err),
        }
    }

    pub fn add_character(&mut self, builder: CharacterBuilder) -> CharacterId {
        match self.roster.add(builder) {
            Ok(id) => id,
            Err(err) => panic!("Failed to build test character: {}", err),
        }
    }

    pub fn build(self, rng_values: Vec<i32>) -> BattleState {
        BattleState::new(self.roster, self.moves, Box::new(ScriptedRandom::new(rng_values)))
    }
}

/// A fighter with 100 health and the given stats.
pub fn fighter(name: &str, team: u32, attack: i32, defence: i32, speed: i32) -> CharacterBuilder {
    CharacterBuilder::new(name, team)
        .with_health(100)
        .with_stats(attack, defence, speed)
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
