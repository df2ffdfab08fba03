#[cfg(test)]
mod tests {
    use crate::battle::move_processor::{MoveProcessor, MoveRequest};
    use crate::battle::tests::common::{fighter, strike, TestBattleBuilder};
    use crate::character::CharacterId;
    use crate::errors::BattleStateError;
    use crate::moves::MoveId;
    use pretty_assertions::assert_eq;
    use schema::StatKind;

    fn request(user: CharacterId, move_id: MoveId, others: Vec<CharacterId>) -> MoveRequest {
        MoveRequest {
            user,
            move_id,
            others,
        }
    }

    #[test]
    fn test_moves_apply_fastest_first_and_ties_keep_queue_order() {
        let mut builder = TestBattleBuilder::new();
        let moves: Vec<MoveId> = (0..4).map(|_| builder.add_move(strike(1))).collect();
        let slow = builder.add_character(fighter("Slow", 1, 1, 1, 2).with_moves(vec![moves[0]]));
        let tie_a = builder.add_character(fighter("Tie A", 1, 1, 1, 5).with_moves(vec![moves[1]]));
        let fast = builder.add_character(fighter("Fast", 2, 1, 1, 9).with_moves(vec![moves[2]]));
        let tie_b = builder.add_character(fighter("Tie B", 2, 1, 1, 5).with_moves(vec![moves[3]]));
        let mut battle_state = builder.build(vec![]);

        let mut processor = MoveProcessor::new();
        let queued = [
            (slow, moves[0]),
            (tie_a, moves[1]),
            (fast, moves[2]),
            (tie_b, moves[3]),
        ];
        for (user, move_id) in queued {
            let others = battle_state.roster.ids().filter(|id| *id != user).collect();
            processor.push(request(user, move_id, others), &battle_state).unwrap();
        }
        let applied = processor.apply(&mut battle_state);

        let order: Vec<CharacterId> = applied.iter().map(|move_use| move_use.user).collect();
        assert_eq!(order, vec![fast, tie_a, tie_b, slow]);
        assert!(processor.is_empty());
        assert_eq!(battle_state.history.len(), 4);
    }

    #[test]
    fn test_ordering_reads_current_speed() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(1));
        let other_jab = builder.add_move(strike(1));
        let a = builder.add_character(fighter("A", 1, 1, 1, 5).with_moves(vec![jab]));
        let b = builder.add_character(fighter("B", 2, 1, 1, 6).with_moves(vec![other_jab]));
        let mut battle_state = builder.build(vec![]);
        battle_state.roster.get_mut(a).unwrap().stats.get_mut(StatKind::Speed).multiplier = 2.0;

        let mut processor = MoveProcessor::new();
        processor.push(request(b, other_jab, vec![a]), &battle_state).unwrap();
        processor.push(request(a, jab, vec![b]), &battle_state).unwrap();
        processor.order_by_speed(&battle_state.roster);

        assert_eq!(processor.pop_next().map(|r| r.user), Some(a));
        assert_eq!(processor.pop_next().map(|r| r.user), Some(b));
        assert_eq!(processor.pop_next(), None);
    }

    #[test]
    fn test_later_moves_see_earlier_effects() {
        let mut builder = TestBattleBuilder::new();
        let finisher = builder.add_move(strike(100));
        let counter = builder.add_move(strike(10));
        let fast = builder.add_character(fighter("Fast", 1, 1, 1, 9).with_moves(vec![finisher]));
        let slow = builder.add_character(fighter("Slow", 2, 1, 1, 1).with_moves(vec![counter]));
        let mut battle_state = builder.build(vec![]);

        let mut processor = MoveProcessor::new();
        processor.push(request(slow, counter, vec![fast]), &battle_state).unwrap();
        processor.push(request(fast, finisher, vec![slow]), &battle_state).unwrap();
        let applied = processor.apply(&mut battle_state);

        assert_eq!(applied[1].outcome, schema::MoveOutcome::Failure);
        assert_eq!(battle_state.roster.get(fast).unwrap().current_health(), 100);
    }

    #[test]
    fn test_push_rejects_exhausted_moves() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(1));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let mut battle_state = builder.build(vec![]);
        battle_state.moves.get_mut(jab).unwrap().set_remaining_uses(0);

        let mut processor = MoveProcessor::new();
        let err = processor.push(request(user, jab, vec![]), &battle_state).unwrap_err();

        assert_eq!(err, BattleStateError::NoRemainingUses { move_id: jab });
        assert!(processor.is_empty());
    }

    #[test]
    fn test_push_rejects_unknown_and_unlearned_moves() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(1));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1));
        let battle_state = builder.build(vec![]);
        let mut processor = MoveProcessor::new();

        assert_eq!(
            processor.push(request(user, jab, vec![]), &battle_state),
            Err(BattleStateError::MoveNotKnown {
                character: user,
                move_id: jab
            })
        );
        assert_eq!(
            processor.push(request(user, MoveId(7), vec![]), &battle_state),
            Err(BattleStateError::UnknownMove(MoveId(7)))
        );
        assert_eq!(
            processor.push(request(CharacterId(9), jab, vec![]), &battle_state),
            Err(BattleStateError::UnknownCharacter(CharacterId(9)))
        );
    }

    #[test]
    fn test_the_same_move_queued_twice_runs_out_of_uses() {
        let mut builder = TestBattleBuilder::new();
        let mut data = strike(1);
        data.max_uses = 1;
        let jab = builder.add_move(data);
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        let mut processor = MoveProcessor::new();
        processor.push(request(user, jab, vec![foe]), &battle_state).unwrap();
        processor.push(request(user, jab, vec![foe]), &battle_state).unwrap();
        let applied = processor.apply(&mut battle_state);

        assert_eq!(applied.len(), 1);
        assert_eq!(battle_state.roster.get(foe).unwrap().current_health(), 99);
    }
}
