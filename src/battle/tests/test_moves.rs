#[cfg(test)]
mod tests {
    use crate::battle::actions::{ActionResult, ActionSource, EffectChange};
    use crate::battle::move_processor::MoveRequest;
    use crate::battle::state::BattleState;
    use crate::battle::tests::common::{action, fighter, move_data, strike, TestBattleBuilder};
    use crate::character::CharacterId;
    use crate::errors::MoveDataError;
    use crate::moves::{narrow_targets, MoveId, MoveSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{
        ActionEffect, ActionFailure, DamageCalculator, HealingCalculator, MoveData, MoveOutcome,
        SuccessCalculator, TargetCalculator,
    };

    #[test]
    fn test_second_action_sees_only_the_survivor() {
        let mut builder = TestBattleBuilder::new();
        let sweep = builder.add_move(move_data(
            "Execute and Sweep",
            SuccessCalculator::Always,
            vec![
                action(
                    TargetCalculator::FirstEnemy,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 50 }),
                ),
                action(
                    TargetCalculator::Enemies,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 5 }),
                ),
            ],
        ));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![sweep]));
        let weak = builder.add_character(fighter("Weak", 2, 1, 1, 1).with_current_health(30));
        let sturdy = builder.add_character(fighter("Sturdy", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        let move_use = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: sweep,
                others: vec![weak,
                sturdy],
            })
            .unwrap();

        assert_eq!(move_use.actions.len(), 2);
        let second: Vec<CharacterId> = move_use.actions[1]
            .outcome
            .results
            .iter()
            .map(|result| result.target)
            .collect();
        assert_eq!(second, vec![sturdy]);
        assert_eq!(battle_state.roster.get(weak).unwrap().current_health(), 0);
        assert_eq!(battle_state.roster.get(sturdy).unwrap().current_health(), 95);
    }

    #[test]
    fn test_protected_target_is_dropped_for_later_actions() {
        let mut builder = TestBattleBuilder::new();
        let combo = builder.add_move(move_data(
            "One Two",
            SuccessCalculator::Always,
            vec![
                action(
                    TargetCalculator::Enemies,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 10 }),
                ),
                action(
                    TargetCalculator::Enemies,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 10 }),
                ),
            ],
        ));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![combo]));
        let guarded = builder.add_character(fighter("Guarded", 2, 1, 1, 1));
        let open = builder.add_character(fighter("Open", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);
        battle_state.roster.get_mut(guarded).unwrap().protect_count = 1;

        battle_state
            .use_move(&MoveRequest {
                user,
                move_id: combo,
                others: vec![guarded,
                open],
            })
            .unwrap();

        // The shield stops the first hit and the second never addresses it.
        assert_eq!(battle_state.roster.get(guarded).unwrap().current_health(), 100);
        assert_eq!(battle_state.roster.get(open).unwrap().current_health(), 80);
    }

    #[test]
    fn test_self_targeted_action_keeps_the_candidates() {
        let mut builder = TestBattleBuilder::new();
        let rally = builder.add_move(move_data(
            "Brace and Strike",
            SuccessCalculator::Always,
            vec![
                action(TargetCalculator::User, ActionEffect::Protect),
                action(
                    TargetCalculator::FirstEnemy,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 7 }),
                ),
            ],
        ));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![rally]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        battle_state
            .use_move(&MoveRequest {
                user,
                move_id: rally,
                others: vec![foe],
            })
            .unwrap();

        assert_eq!(battle_state.roster.get(user).unwrap().protect_count, 1);
        assert_eq!(battle_state.roster.get(foe).unwrap().current_health(), 93);
    }

    #[test]
    fn test_failed_action_stops_the_move_but_not_its_success() {
        let mut builder = TestBattleBuilder::new();
        let reckless = builder.add_move(move_data(
            "Reckless",
            SuccessCalculator::Always,
            vec![
                action(
                    TargetCalculator::Allies,
                    ActionEffect::Heal(HealingCalculator::Absolute { amount: 5 }),
                ),
                action(
                    TargetCalculator::FirstEnemy,
                    ActionEffect::Damage(DamageCalculator::Absolute { amount: 5 }),
                ),
            ],
        ));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![reckless]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        let move_use = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: reckless,
                others: vec![foe],
            })
            .unwrap();

        assert_eq!(move_use.outcome, MoveOutcome::Success);
        assert_eq!(move_use.actions.len(), 1);
        assert_eq!(
            move_use.actions[0].outcome.failure,
            Some(ActionFailure::NoTargetsSet)
        );
        assert_eq!(battle_state.roster.get(foe).unwrap().current_health(), 100);
    }

    /// Establishes dispatch-time targets on a registered move.
    fn set_move_targets(
        battle_state: &mut BattleState,
        move_id: MoveId,
        user: CharacterId,
        others: &[CharacterId],
    ) {
        let mut moves = std::mem::take(&mut battle_state.moves);
        moves
            .get_mut(move_id)
            .unwrap()
            .set_targets(user, others, &mut battle_state.context());
        battle_state.moves = moves;
    }

    fn health(battle_state: &BattleState, id: CharacterId) -> i32 {
        battle_state.roster.get(id).unwrap().current_health()
    }

    #[test]
    fn test_dispatch_targets_are_used_by_the_next_use() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(10));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let chosen = builder.add_character(fighter("Chosen", 2, 1, 1, 1));
        let other = builder.add_character(fighter("Other", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        set_move_targets(&mut battle_state, jab, user, &[chosen]);
        battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![other, chosen],
            })
            .unwrap();

        assert_eq!(health(&battle_state, chosen), 90);
        assert_eq!(health(&battle_state, other), 100);
    }

    #[test]
    fn test_targets_set_before_a_miss_do_not_carry_over() {
        let mut builder = TestBattleBuilder::new();
        let mut data = strike(10);
        data.success = SuccessCalculator::Accuracy { accuracy: 50 };
        let jab = builder.add_move(data);
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let old = builder.add_character(fighter("Old", 2, 1, 1, 1));
        let new = builder.add_character(fighter("New", 2, 1, 1, 1));
        // 99 misses at accuracy 50, 0 lands.
        let mut battle_state = builder.build(vec![99, 0]);

        set_move_targets(&mut battle_state, jab, user, &[old]);
        let missed = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![old],
            })
            .unwrap();
        assert_eq!(missed.outcome, MoveOutcome::Miss);

        let landed = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![new],
            })
            .unwrap();
        let hit: Vec<CharacterId> = landed.results().map(|result| result.target).collect();

        assert_eq!(hit, vec![new]);
        assert_eq!(health(&battle_state, old), 100);
        assert_eq!(health(&battle_state, new), 90);
    }

    #[test]
    fn test_actions_skipped_by_a_failure_do_not_keep_their_targets() {
        let mut builder = TestBattleBuilder::new();
        let mut opener = action(
            TargetCalculator::FirstEnemy,
            ActionEffect::Damage(DamageCalculator::Absolute { amount: 10 }),
        );
        opener.success = SuccessCalculator::Accuracy { accuracy: 50 };
        let feint = builder.add_move(move_data(
            "Feint",
            SuccessCalculator::Always,
            vec![
                opener,
                action(TargetCalculator::FirstEnemy, ActionEffect::Flinch),
            ],
        ));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![feint]));
        let old = builder.add_character(fighter("Old", 2, 1, 1, 1));
        let new = builder.add_character(fighter("New", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![99, 0]);

        set_move_targets(&mut battle_state, feint, user, &[old]);
        let first = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: feint,
                others: vec![old],
            })
            .unwrap();
        assert_eq!(first.actions.len(), 1);
        assert_eq!(
            first.actions[0].outcome.failure,
            Some(ActionFailure::Missed)
        );

        battle_state
            .use_move(&MoveRequest {
                user,
                move_id: feint,
                others: vec![new],
            })
            .unwrap();

        assert!(!battle_state.roster.get(old).unwrap().will_flinch);
        assert!(battle_state.roster.get(new).unwrap().will_flinch);
        assert_eq!(health(&battle_state, new), 90);
    }

    #[rstest]
    #[case(SuccessCalculator::Always, vec![], MoveOutcome::Success)]
    #[case(SuccessCalculator::Accuracy { accuracy: 50 }, vec![99], MoveOutcome::Miss)]
    fn test_every_use_consumes_one(
        #[case] success: SuccessCalculator,
        #[case] rolls: Vec<i32>,
        #[case] expected: MoveOutcome,
    ) {
        let mut builder = TestBattleBuilder::new();
        let mut data = strike(5);
        data.success = success;
        data.max_uses = 3;
        let jab = builder.add_move(data);
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(rolls);

        let move_use = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![foe],
            })
            .unwrap();

        assert_eq!(move_use.outcome, expected);
        assert_eq!(battle_state.moves.get(jab).unwrap().remaining_uses(), 2);
    }

    #[test]
    fn test_defeated_user_fails_and_still_consumes_a_use() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(5));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);
        battle_state.roster.get_mut(user).unwrap().set_health(0);

        let move_use = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![foe],
            })
            .unwrap();

        assert_eq!(move_use.outcome, MoveOutcome::Failure);
        assert!(move_use.actions.is_empty());
        assert_eq!(battle_state.moves.get(jab).unwrap().remaining_uses(), 9);
    }

    #[test]
    fn test_results_are_tagged_with_the_move() {
        let mut builder = TestBattleBuilder::new();
        let jab = builder.add_move(strike(5));
        let user = builder.add_character(fighter("User", 1, 1, 1, 1).with_moves(vec![jab]));
        let foe = builder.add_character(fighter("Foe", 2, 1, 1, 1));
        let mut battle_state = builder.build(vec![]);

        let move_use = battle_state
            .use_move(&MoveRequest {
                user,
                move_id: jab,
                others: vec![foe],
            })
            .unwrap();

        let result = move_use.results().next().unwrap();
        assert_eq!(result.source, ActionSource::Move(jab));
        assert_eq!(battle_state.history.len(), 1);
    }

    #[test]
    fn test_narrowing_appends_affected_outsiders() {
        let mut builder = TestBattleBuilder::new();
        let a = builder.add_character(fighter("A", 1, 1, 1, 1));
        let b = builder.add_character(fighter("B", 2, 1, 1, 1));
        let c = builder.add_character(fighter("C", 2, 1, 1, 1));
        let battle_state = builder.build(vec![]);

        let result = |target, applied| ActionResult {
            applied,
            user: a,
            target,
            source: ActionSource::Direct,
            protect: None,
            labels: Default::default(),
            change: EffectChange::Flinch,
        };
        let results = vec![result(b, false), result(a, true)];

        assert_eq!(narrow_targets(&[b, c], &results, &battle_state.roster), vec![c, a]);
    }

    fn with_effect(effect: ActionEffect) -> MoveData {
        move_data(
            "Broken",
            SuccessCalculator::Always,
            vec![action(TargetCalculator::FirstEnemy, effect)],
        )
    }

    #[test]
    fn test_invalid_definitions_are_rejected_at_build_time() {
        let mut moves = MoveSet::new();

        let mut no_uses = strike(1);
        no_uses.max_uses = 0;
        assert_eq!(moves.add(&no_uses), Err(MoveDataError::NoUses("Strike".to_string())));

        let no_actions = move_data("Idle", SuccessCalculator::Always, vec![]);
        assert_eq!(moves.add(&no_actions), Err(MoveDataError::NoActions("Idle".to_string())));

        let mut unnamed = strike(1);
        unnamed.name = "  ".to_string();
        assert_eq!(moves.add(&unnamed), Err(MoveDataError::MissingName));

        let mut wild = strike(1);
        wild.success = SuccessCalculator::Accuracy { accuracy: 101 };
        assert!(matches!(
            moves.add(&wild),
            Err(MoveDataError::InvalidAccuracy { accuracy: 101, .. })
        ));

        let mut shaky = strike(1);
        shaky.actions[0].success = SuccessCalculator::ComboAccuracy {
            base: 120,
            linear_factor: 10,
            minimum: 0,
        };
        assert!(matches!(
            moves.add(&shaky),
            Err(MoveDataError::InvalidAccuracy { accuracy: 120, .. })
        ));

        let zero = with_effect(ActionEffect::Heal(HealingCalculator::Percentage { percentage: 0 }));
        assert!(matches!(moves.add(&zero), Err(MoveDataError::InvalidPercentage { .. })));

        let negative = with_effect(ActionEffect::Damage(DamageCalculator::Absolute { amount: -3 }));
        assert!(matches!(
            moves.add(&negative),
            Err(MoveDataError::NegativeAmount { amount: -3, .. })
        ));

        assert!(moves.is_empty());
    }
}
