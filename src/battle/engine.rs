use crate::battle::ai::Behavior;
use crate::battle::move_processor::{MoveProcessor, MoveRequest};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, SkipReason};
use crate::errors::{BattleResult, BattleStateError};
use tracing::{debug, info, warn};

/// Asks `behavior` for one move per living character and queues it.
/// Characters with nothing usable are left out of the turn.
pub fn collect_npc_actions(
    battle_state: &mut BattleState,
    processor: &mut MoveProcessor,
    behavior: &dyn Behavior,
) -> BattleResult<()> {
    if battle_state.game_state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }
    let living: Vec<_> = battle_state.roster.living_ids().collect();
    for user in living {
        match behavior.decide_move(user, battle_state) {
            Some(request) => processor.push(request, battle_state)?,
            None => debug!(?user, "no usable move, sitting out"),
        }
    }
    Ok(())
}

/// True when the battle is waiting for a turn and has moves queued.
pub fn ready_for_turn_resolution(battle_state: &BattleState, processor: &MoveProcessor) -> bool {
    battle_state.game_state == GameState::WaitingForActions && !processor.is_empty()
}

/// Executes one complete turn from the queued moves.
/// Returns every event the turn produced.
pub fn resolve_turn(battle_state: &mut BattleState, processor: &mut MoveProcessor) -> EventBus {
    let mut bus = EventBus::new();
    if battle_state.game_state.is_over() {
        warn!("turn requested after the battle ended");
        processor.clear();
        return bus;
    }

    // 1. Initialization
    if battle_state.turn_number == 0 {
        // Anything recorded before the first turn belongs to no battle.
        battle_state.history.clear();
    }
    battle_state.game_state = GameState::TurnInProgress;
    battle_state.turn_number += 1;
    battle_state.history.start_turn();
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
    info!(turn = battle_state.turn_number, "turn started");

    // 2. Moves, fastest first
    processor.order_by_speed(&battle_state.roster);
    while let Some(request) = processor.pop_next() {
        execute_request(battle_state, &request, &mut bus);
        if battle_state.standing_result().is_some() {
            break;
        }
    }
    processor.clear();

    // 3. End of turn
    execute_end_turn_phase(battle_state, &mut bus);
    finalize_turn(battle_state, &mut bus);
    bus
}

fn execute_request(battle_state: &mut BattleState, request: &MoveRequest, bus: &mut EventBus) {
    let skip = |reason| BattleEvent::MoveSkipped {
        user: request.user,
        move_id: request.move_id,
        reason,
    };

    let Some(user) = battle_state.roster.get_mut(request.user) else {
        warn!(user = ?request.user, "queued move for an unknown character");
        return;
    };
    if user.is_dead() {
        debug!(user = ?request.user, "user defeated before acting");
        bus.push(skip(SkipReason::UserDefeated));
        return;
    }
    if user.will_flinch {
        user.will_flinch = false;
        debug!(user = ?request.user, "user flinched");
        bus.push(skip(SkipReason::Flinched));
        return;
    }

    match battle_state.use_move(request) {
        Ok(move_use) => {
            let defeated = BattleEvent::defeated_by(&move_use);
            bus.push(BattleEvent::MoveResolved { move_use });
            for character in defeated {
                info!(?character, "character defeated");
                bus.push(BattleEvent::CharacterDefeated { character });
            }
        }
        Err(BattleStateError::NoRemainingUses { .. }) => {
            bus.push(skip(SkipReason::NoRemainingUses));
        }
        Err(err) => warn!(%err, "skipping queued move"),
    }
}

/// Shields only last for the turn they were raised in.
pub fn execute_end_turn_phase(battle_state: &mut BattleState, bus: &mut EventBus) {
    for character in battle_state.roster.iter_mut() {
        if character.protect_count > 0 {
            bus.push(BattleEvent::ShieldsDropped {
                character: character.id,
                count: character.protect_count,
            });
            character.protect_count = 0;
        }
    }
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    bus.push(BattleEvent::TurnEnded {
        turn_number: battle_state.turn_number,
    });

    let result = battle_state.standing_result().or_else(|| {
        (battle_state.turn_number >= battle_state.max_turns).then_some(GameState::Draw)
    });
    match result {
        Some(end_state) => {
            battle_state.game_state = end_state;
            let winner = match end_state {
                GameState::TeamWin(team) => Some(team),
                _ => None,
            };
            info!(?winner, turn = battle_state.turn_number, "battle ended");
            bus.push(BattleEvent::BattleEnded { winner });
        }
        None => battle_state.game_state = GameState::WaitingForActions,
    }
}

/// Runs turns with `behavior` choosing every move until the battle ends.
pub fn run_battle(
    battle_state: &mut BattleState,
    behavior: &dyn Behavior,
) -> BattleResult<EventBus> {
    let mut processor = MoveProcessor::new();
    let mut events = EventBus::new();

    // A roster that is already decided never starts a turn.
    if let Some(end_state) = battle_state.standing_result() {
        battle_state.game_state = end_state;
    }

    while !battle_state.game_state.is_over() {
        collect_npc_actions(battle_state, &mut processor, behavior)?;
        if !ready_for_turn_resolution(battle_state, &processor) {
            // Nobody can act any more.
            battle_state.game_state = GameState::Draw;
            events.push(BattleEvent::BattleEnded { winner: None });
            info!(turn = battle_state.turn_number, "no usable moves left, battle drawn");
            break;
        }
        events.append(resolve_turn(battle_state, &mut processor));
    }
    Ok(events)
}
