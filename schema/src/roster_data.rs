use crate::battle_data::{StatKind, Transform};
use crate::move_types::MoveData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stat_transforms: BTreeMap<StatKind, Vec<Transform>>,
    /// Applied to the base power of power-based damage formulas.
    #[serde(default)]
    pub power_transforms: Vec<Transform>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AbilityData {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterData {
    pub name: String,
    pub team: u32,
    pub max_health: i32,
    pub attack: i32,
    pub defence: i32,
    pub speed: i32,
    /// Names of entries in `BattleConfig::moves`.
    pub moves: Vec<String>,
    /// Name of an entry in `BattleConfig::items`.
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub ability: Option<AbilityData>,
}

fn default_max_turns() -> u32 {
    100
}

/// A complete battle description, as stored in a RON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleConfig {
    /// Seed for the battle RNG; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default)]
    pub items: Vec<ItemData>,
    pub moves: Vec<MoveData>,
    pub characters: Vec<CharacterData>,
}
