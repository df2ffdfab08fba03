use schema::{StatKind, Transform};
use serde::{Deserialize, Serialize};

/// A stat value with a multiplier and the ordered transforms of the equipped item.
///
/// current value = floor(transforms applied to base * multiplier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    base: i32,
    pub multiplier: f64,
    transforms: Vec<Transform>,
}

impl Stat {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            multiplier: 1.0,
            transforms: Vec::new(),
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// The value calculators read.
    pub fn current(&self) -> i32 {
        let transformed = Transform::apply_all(self.base as f64, &self.transforms);
        (transformed * self.multiplier).floor() as i32
    }

    pub fn receive_transforms(&mut self, transforms: &[Transform]) {
        self.transforms.extend_from_slice(transforms);
    }

    pub fn clear_transforms(&mut self) {
        self.transforms.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSet {
    pub attack: Stat,
    pub defence: Stat,
    pub speed: Stat,
}

impl StatSet {
    pub fn new(attack: i32, defence: i32, speed: i32) -> Self {
        Self {
            attack: Stat::new(attack),
            defence: Stat::new(defence),
            speed: Stat::new(speed),
        }
    }

    pub fn get(&self, kind: StatKind) -> &Stat {
        match kind {
            StatKind::Attack => &self.attack,
            StatKind::Defence => &self.defence,
            StatKind::Speed => &self.speed,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut Stat {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Defence => &mut self.defence,
            StatKind::Speed => &mut self.speed,
        }
    }
}
