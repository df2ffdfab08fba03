use crate::battle::history::ActionHistory;
use crate::battle::rng::RandomSource;
use crate::character::{CharacterId, Roster};

/// Externally driven target choice ("ask the player"). Blocking by contract.
pub trait TargetSelector {
    /// Picks one of `candidates`, or `None` to decline.
    fn select_target(&mut self, roster: &Roster, candidates: &[CharacterId]) -> Option<CharacterId>;
}

/// Everything an action needs while it resolves: the mutable character state,
/// the ledger of earlier results, and the injected randomness.
pub struct BattleContext<'a> {
    pub roster: &'a mut Roster,
    pub history: &'a ActionHistory,
    pub rng: &'a mut dyn RandomSource,
    pub selector: Option<&'a mut dyn TargetSelector>,
}

impl<'a> BattleContext<'a> {
    pub fn new(
        roster: &'a mut Roster,
        history: &'a ActionHistory,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            roster,
            history,
            rng,
            selector: None,
        }
    }

    pub fn with_selector(mut self, selector: &'a mut dyn TargetSelector) -> Self {
        self.selector = Some(selector);
        self
    }
}
