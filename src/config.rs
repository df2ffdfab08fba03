//! Loading battles from RON descriptions.

use crate::battle::rng::{RandomSource, SeededRandom};
use crate::battle::state::BattleState;
use crate::character::{CharacterBuilder, Roster};
use crate::errors::{BattleResult, CharacterDataError, ConfigError, MoveDataError};
use crate::items::{Ability, Item};
use crate::moves::MoveSet;
use schema::{BattleConfig, ItemData, MoveData};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Parses a battle description from RON text.
pub fn parse_battle_config(source: &str) -> Result<BattleConfig, ConfigError> {
    Ok(ron::from_str(source)?)
}

/// Reads and parses a battle description file.
pub fn load_battle_config(path: &Path) -> Result<BattleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_battle_config(&content)?;
    info!(
        path = %path.display(),
        characters = config.characters.len(),
        moves = config.moves.len(),
        "loaded battle config"
    );
    Ok(config)
}

impl BattleState {
    /// Builds a battle from a description. Every move and item definition is
    /// validated, and every name a character refers to must resolve.
    ///
    /// Each character gets its own instance of each move it knows, so uses
    /// are never shared between characters.
    pub fn from_config(config: &BattleConfig) -> BattleResult<Self> {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_os_rng()),
        };
        Self::from_config_with_rng(config, rng)
    }

    pub fn from_config_with_rng(
        config: &BattleConfig,
        rng: Box<dyn RandomSource>,
    ) -> BattleResult<Self> {
        let move_data: HashMap<&str, &MoveData> = config
            .moves
            .iter()
            .map(|data| (data.name.as_str(), data))
            .collect();
        let item_data: HashMap<&str, &ItemData> = config
            .items
            .iter()
            .map(|data| (data.name.as_str(), data))
            .collect();

        // Surface bad definitions even when no character uses them.
        let mut validation = MoveSet::new();
        for data in &config.moves {
            validation.add(data)?;
        }
        for data in &config.items {
            Item::from_data(data)?;
        }

        let mut moves = MoveSet::new();
        let mut roster = Roster::new();
        for character in &config.characters {
            let mut known = Vec::with_capacity(character.moves.len());
            for name in &character.moves {
                let data = move_data
                    .get(name.as_str())
                    .ok_or_else(|| MoveDataError::UnknownMove(name.clone()))?;
                known.push(moves.add(data)?);
            }

            let mut builder = CharacterBuilder::new(character.name.clone(), character.team)
                .with_health(character.max_health)
                .with_stats(character.attack, character.defence, character.speed)
                .with_moves(known);
            if let Some(item_name) = &character.item {
                let data = item_data
                    .get(item_name.as_str())
                    .ok_or_else(|| CharacterDataError::UnknownItem(item_name.clone()))?;
                builder = builder.with_item(Item::from_data(data)?);
            }
            if let Some(ability) = &character.ability {
                builder = builder.with_ability(Ability::from(ability));
            }
            let id = roster.add(builder)?;
            debug!(?id, name = %character.name, team = character.team, "character added");
        }

        Ok(Self::new(roster, moves, rng).with_max_turns(config.max_turns))
    }
}
