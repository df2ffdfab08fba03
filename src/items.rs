use crate::errors::CharacterDataError;
use schema::{AbilityData, ItemData, StatKind, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An equippable item. Its transforms are pushed into the wearer's stats while equipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    stat_transforms: BTreeMap<StatKind, Vec<Transform>>,
    power_transforms: Vec<Transform>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Result<Self, CharacterDataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CharacterDataError::MissingItemName);
        }
        Ok(Self {
            name,
            description: String::new(),
            stat_transforms: BTreeMap::new(),
            power_transforms: Vec::new(),
        })
    }

    pub fn from_data(data: &ItemData) -> Result<Self, CharacterDataError> {
        let mut item = Self::new(data.name.clone())?;
        item.description = data.description.clone();
        item.stat_transforms = data.stat_transforms.clone();
        item.power_transforms = data.power_transforms.clone();
        Ok(item)
    }

    pub fn with_stat_transform(mut self, stat: StatKind, transform: Transform) -> Self {
        self.stat_transforms.entry(stat).or_default().push(transform);
        self
    }

    pub fn with_power_transform(mut self, transform: Transform) -> Self {
        self.power_transforms.push(transform);
        self
    }

    pub fn stat_transforms(&self, stat: StatKind) -> &[Transform] {
        self.stat_transforms
            .get(&stat)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn power_transforms(&self) -> &[Transform] {
        &self.power_transforms
    }
}

/// Carried for display only; abilities have no battle effect yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
}

impl From<&AbilityData> for Ability {
    fn from(data: &AbilityData) -> Self {
        Self {
            name: data.name.clone(),
            description: data.description.clone(),
        }
    }
}
