#[cfg(test)]
mod tests {
    use crate::battle::engine::CombatEngine;
    use crate::battle::state::{BattleEvent, BattleOutcome, GameState, TurnRng};
    use crate::battle::tests::common::{assert_ok, create_test_battle, TestCreatureBuilder};
    use crate::catalog::Catalog;
    use crate::creature::CreatureInstance;
    use crate::side::{PlayerAction, SlotRef};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Move, Species};

    fn rolls(leading: &[u8]) -> TurnRng {
        let mut outcomes = leading.to_vec();
        outcomes.extend([50; 40]);
        TurnRng::new_for_test(outcomes)
    }

    fn hits_on_enemy(engine: &CombatEngine) -> Vec<u16> {
        engine
            .events()
            .iter()
            .filter_map(|e| match e {
                BattleEvent::DamageDealt { target, damage, .. } if *target == SlotRef::enemy(0) => Some(*damage),
                _ => None,
            })
            .collect()
    }

    fn swipes_into(defender: CreatureInstance, rng: TurnRng) -> CombatEngine<'static> {
        let rattata = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_moves(vec![Move::FurySwipes])
            .build();
        let mut engine = CombatEngine::new(create_test_battle(rattata, defender), Catalog::standard(), rng);
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::Pass),
        ]));
        engine
    }

    #[rstest]
    #[case(1, 2)]
    #[case(36, 3)]
    #[case(71, 4)]
    #[case(86, 5)]
    fn test_hit_count_roll(#[case] roll: u8, #[case] expected_hits: usize) {
        // Arrange: Snorlax takes 11 per swipe at 92% variance
        let snorlax = TestCreatureBuilder::new(Species::Snorlax, 50).build();

        // Act
        let engine = swipes_into(snorlax, rolls(&[roll]));

        // Assert
        let hits = hits_on_enemy(&engine);
        assert_eq!(hits, vec![11; expected_hits]);
        let snorlax = engine.state().creature_at(SlotRef::enemy(0)).unwrap();
        assert_eq!(snorlax.current_hp(), 220 - 11 * expected_hits as u16);
    }

    #[test]
    fn test_missed_first_hit_cancels_the_rest() {
        // Five hits rolled, then an accuracy roll of 81 against 80
        let snorlax = TestCreatureBuilder::new(Species::Snorlax, 50).build();

        let engine = swipes_into(snorlax, rolls(&[86, 81]));

        assert!(hits_on_enemy(&engine).is_empty());
        let misses = engine
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::MoveMissed { .. }))
            .count();
        assert_eq!(misses, 1);
    }

    #[test]
    fn test_hits_stop_when_target_faints() {
        let snorlax = TestCreatureBuilder::new(Species::Snorlax, 50).with_hp(15).build();

        let engine = swipes_into(snorlax, rolls(&[86]));

        assert_eq!(hits_on_enemy(&engine), vec![11, 4]);
        assert_eq!(engine.state().game_state, GameState::Finished(BattleOutcome::Victory));
    }

    #[test]
    fn test_fixed_hit_count_draws_no_count() {
        // Double Kick: accuracy, then crit and variance for each of two hits
        let machamp = TestCreatureBuilder::new(Species::Machamp, 50)
            .with_moves(vec![Move::DoubleKick])
            .build();
        let snorlax = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = CombatEngine::new(
            create_test_battle(machamp, snorlax),
            Catalog::standard(),
            rolls(&[]),
        );

        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::Pass),
        ]));

        assert_eq!(hits_on_enemy(&engine).len(), 2);
        assert_eq!(engine.rng().draws(), 5);
    }
}
