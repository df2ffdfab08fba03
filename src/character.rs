use crate::battle::stats::StatSet;
use crate::errors::{BattleStateError, CharacterDataError};
use crate::items::{Ability, Item};
use crate::moves::MoveId;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

pub const DEFAULT_PROTECT_LIMIT: i32 = 1;

/// Index of a character in its `Roster`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub usize);

/// A battle participant. Characters are never removed mid-battle; defeated
/// ones stay in the roster as inert targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub team: u32,
    current_health: i32,
    max_health: i32,
    pub stats: StatSet,
    pub moves: Vec<MoveId>,
    item: Option<Item>,
    pub ability: Option<Ability>,
    /// Raised protection shields.
    pub protect_count: u32,
    /// How many raised shields are effective at once.
    pub protect_limit: i32,
    pub will_flinch: bool,
}

impl Character {
    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.current_health <= 0
    }

    /// Sets health, clamped to `0..=max_health`.
    pub fn set_health(&mut self, health: i32) {
        self.current_health = health.clamp(0, self.max_health);
    }

    /// Returns (health before, health after).
    pub fn take_damage(&mut self, amount: i32) -> (i32, i32) {
        let before = self.current_health;
        self.set_health(before.saturating_sub(amount));
        (before, self.current_health)
    }

    /// Returns (health before, health after).
    pub fn heal(&mut self, amount: i32) -> (i32, i32) {
        let before = self.current_health;
        self.set_health(before.saturating_add(amount));
        (before, self.current_health)
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Equips `item`, returning the one it replaces.
    pub fn equip_item(&mut self, item: Item) -> Option<Item> {
        let previous = self.unequip_item();
        for stat in schema::StatKind::iter() {
            self.stats
                .get_mut(stat)
                .receive_transforms(item.stat_transforms(stat));
        }
        self.item = Some(item);
        previous
    }

    pub fn unequip_item(&mut self) -> Option<Item> {
        let previous = self.item.take();
        if previous.is_some() {
            for stat in schema::StatKind::iter() {
                self.stats.get_mut(stat).clear_transforms();
            }
        }
        previous
    }

    /// Shields that will actually intercept the next hit.
    pub fn active_shields(&self) -> u32 {
        let limit = self.protect_limit.max(0) as u32;
        self.protect_count.min(limit)
    }

    pub fn is_ally_of(&self, other: &Character) -> bool {
        self.team == other.team
    }
}

/// Builder for `Character`. Validation happens in `build`, never mid-battle.
///
/// # Example
/// ```
/// use skirmish::character::{CharacterBuilder, CharacterId};
///
/// let hero = CharacterBuilder::new("Hero", 1)
///     .with_health(100)
///     .with_stats(12, 8, 10)
///     .build(CharacterId(0))
///     .unwrap();
/// assert_eq!(hero.current_health(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    name: String,
    team: u32,
    max_health: i32,
    current_health: Option<i32>,
    stats: StatSet,
    moves: Vec<MoveId>,
    item: Option<Item>,
    ability: Option<Ability>,
}

impl CharacterBuilder {
    pub fn new(name: impl Into<String>, team: u32) -> Self {
        Self {
            name: name.into(),
            team,
            max_health: 100,
            current_health: None,
            stats: StatSet::new(1, 1, 1),
            moves: Vec::new(),
            item: None,
            ability: None,
        }
    }

    pub fn with_health(mut self, max_health: i32) -> Self {
        self.max_health = max_health;
        self
    }

    /// Starting health; defaults to max.
    pub fn with_current_health(mut self, health: i32) -> Self {
        self.current_health = Some(health);
        self
    }

    pub fn with_stats(mut self, attack: i32, defence: i32, speed: i32) -> Self {
        self.stats = StatSet::new(attack, defence, speed);
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveId>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn build(self, id: CharacterId) -> Result<Character, CharacterDataError> {
        if self.name.trim().is_empty() {
            return Err(CharacterDataError::MissingName);
        }
        if self.max_health <= 0 {
            return Err(CharacterDataError::InvalidHealth {
                name: self.name,
                max_health: self.max_health,
            });
        }

        let mut character = Character {
            id,
            name: self.name,
            team: self.team,
            current_health: self.max_health,
            max_health: self.max_health,
            stats: self.stats,
            moves: self.moves,
            item: None,
            ability: self.ability,
            protect_count: 0,
            protect_limit: DEFAULT_PROTECT_LIMIT,
            will_flinch: false,
        };
        if let Some(health) = self.current_health {
            character.set_health(health);
        }
        if let Some(item) = self.item {
            character.equip_item(item);
        }
        Ok(character)
    }
}

/// Arena of every battle participant, indexed by `CharacterId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, builder: CharacterBuilder) -> Result<CharacterId, CharacterDataError> {
        let id = CharacterId(self.characters.len());
        let character = builder.build(id)?;
        self.characters.push(character);
        Ok(id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.0)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id.0)
    }

    pub fn character(&self, id: CharacterId) -> Result<&Character, BattleStateError> {
        self.get(id).ok_or(BattleStateError::UnknownCharacter(id))
    }

    pub fn is_alive(&self, id: CharacterId) -> bool {
        self.get(id).is_some_and(|character| !character.is_dead())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.characters.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.characters.iter().map(|character| character.id)
    }

    pub fn living_ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.characters
            .iter()
            .filter(|character| !character.is_dead())
            .map(|character| character.id)
    }

    /// Teams that still have a living member, in roster order.
    pub fn teams_standing(&self) -> Vec<u32> {
        let mut teams = Vec::new();
        for character in self.characters.iter().filter(|c| !c.is_dead()) {
            if !teams.contains(&character.team) {
                teams.push(character.team);
            }
        }
        teams
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
