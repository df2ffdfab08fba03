use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of bounded random integers. Every probabilistic calculator draws
/// from one of these, never from global random state.
pub trait RandomSource {
    /// A value in `0..max_exclusive`.
    fn next(&mut self, max_exclusive: i32) -> i32;

    /// A value in `min_inclusive..max_exclusive`.
    fn next_range(&mut self, min_inclusive: i32, max_exclusive: i32) -> i32;
}

#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self, max_exclusive: i32) -> i32 {
        self.next_range(0, max_exclusive)
    }

    fn next_range(&mut self, min_inclusive: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min_inclusive {
            return min_inclusive;
        }
        self.rng.random_range(min_inclusive..max_exclusive)
    }
}

/// Replays a fixed sequence of values, for deterministic tests and replays.
///
/// Values are returned as given; callers script values inside the range they ask for.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    outcomes: VecDeque<i32>,
    consumed: usize,
}

impl ScriptedRandom {
    pub fn new(outcomes: Vec<i32>) -> Self {
        Self {
            outcomes: outcomes.into(),
            consumed: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }

    fn take(&mut self, reason: &str) -> i32 {
        let Some(outcome) = self.outcomes.pop_front() else {
            panic!(
                "ScriptedRandom exhausted after {} values! Tried to get a value for: '{}'.",
                self.consumed, reason
            );
        };
        self.consumed += 1;
        outcome
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self, max_exclusive: i32) -> i32 {
        self.take(&format!("next({})", max_exclusive))
    }

    fn next_range(&mut self, min_inclusive: i32, max_exclusive: i32) -> i32 {
        self.take(&format!("next_range({}, {})", min_inclusive, max_exclusive))
    }
}
