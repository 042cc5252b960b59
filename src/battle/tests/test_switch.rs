#[cfg(test)]
mod tests {
    use crate::battle::action_stack::DamageSource;
    use crate::battle::engine::CombatEngine;
    use crate::battle::state::{BattleEvent, BattleState, GameState};
    use crate::battle::tests::common::{
        assert_ok, create_test_battle_with, predictable_rng, TestCreatureBuilder,
    };
    use crate::catalog::Catalog;
    use crate::config::BattleRules;
    use crate::errors::{BattleEngineError, BattleStateError};
    use crate::side::{PlayerAction, SideConditionState, SideId, SlotRef};
    use pretty_assertions::assert_eq;
    use schema::{Move, SideCondition, Species, StatType};

    fn two_on_one(bench: Species, enemy_moves: Vec<Move>) -> BattleState {
        let lead = TestCreatureBuilder::new(Species::Pikachu, 50).build();
        let bench = TestCreatureBuilder::new(bench, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Tyranitar, 50)
            .with_moves(enemy_moves)
            .with_ability(None)
            .build();
        create_test_battle_with(vec![lead, bench], vec![enemy], BattleRules::default())
    }

    fn switch_against_move(engine: &mut CombatEngine) {
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::Switch { party_index: 1 }),
            (SlotRef::enemy(0), PlayerAction::use_move(0)),
        ]));
    }

    #[test]
    fn test_switch_happens_before_moves() {
        // Arrange
        let state = two_on_one(Species::Snorlax, vec![Move::Tackle]);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        // Act
        switch_against_move(&mut engine);

        // Assert: the incoming Snorlax takes the hit
        let party = &engine.state().side(SideId::Player).party;
        assert!(party[0].is_at_full_hp());
        assert!(!party[1].is_at_full_hp());
        assert_eq!(engine.state().slot(SlotRef::player(0)).unwrap().active, Some(1));
    }

    #[test]
    fn test_pursuit_catches_the_outgoing_creature() {
        let state = two_on_one(Species::Snorlax, vec![Move::Pursuit]);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        switch_against_move(&mut engine);

        let party = &engine.state().side(SideId::Player).party;
        assert!(!party[0].is_at_full_hp(), "Pikachu was hit on the way out");
        assert!(party[1].is_at_full_hp());
        assert_eq!(engine.state().slot(SlotRef::player(0)).unwrap().active, Some(1));
    }

    #[test]
    fn test_spikes_hurt_grounded_switch_ins_only() {
        // Arrange: one layer of Spikes on the player side
        let state = two_on_one(Species::Snorlax, vec![Move::Growl]);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());
        engine.state_mut().side_mut(SideId::Player).conditions.insert(
            SideCondition::Spikes,
            SideConditionState {
                turns_remaining: None,
                layers: 1,
            },
        );

        // Act
        switch_against_move(&mut engine);

        // Assert: 220 / 8
        let snorlax = &engine.state().side(SideId::Player).party[1];
        assert_eq!(snorlax.current_hp(), 220 - 27);
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::DamageDealt {
                source: DamageSource::Hazard(SideCondition::Spikes),
                ..
            }
        )));
    }

    #[test]
    fn test_flying_switch_in_ignores_spikes() {
        let state = two_on_one(Species::Gyarados, vec![Move::Growl]);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());
        engine.state_mut().side_mut(SideId::Player).conditions.insert(
            SideCondition::Spikes,
            SideConditionState {
                turns_remaining: None,
                layers: 3,
            },
        );

        switch_against_move(&mut engine);

        assert!(engine.state().side(SideId::Player).party[1].is_at_full_hp());
    }

    #[test]
    fn test_intimidate_on_switch_in() {
        let state = two_on_one(Species::Gyarados, vec![Move::Growl]);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        switch_against_move(&mut engine);

        let enemy_slot = engine.state().slot(SlotRef::enemy(0)).unwrap();
        assert_eq!(enemy_slot.get_stat_stage(StatType::Attack), -1);
    }

    #[test]
    fn test_replacement_after_faint() {
        // Arrange: Pikachu knocks out a 1 HP lead with a Snorlax on the bench
        let pikachu = TestCreatureBuilder::new(Species::Pikachu, 50).build();
        let lead = TestCreatureBuilder::new(Species::Rattata, 50).with_hp(1).build();
        let bench = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let state = create_test_battle_with(vec![pikachu], vec![lead, bench], BattleRules::default());
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::use_move(0)),
        ]));
        assert_eq!(engine.state().game_state, GameState::WaitingForReplacements);

        // Act / Assert: no turn can start until the slot is refilled
        let blocked = engine.resolve_turn(&[(SlotRef::player(0), PlayerAction::Pass)]);
        assert_eq!(
            blocked,
            Err(BattleEngineError::BattleState(BattleStateError::AwaitingReplacements))
        );
        assert_eq!(
            engine.apply_replacement(SlotRef::player(0), 0),
            Err(BattleEngineError::BattleState(BattleStateError::NoReplacementPending(
                SlotRef::player(0)
            )))
        );

        assert_ok(engine.apply_replacement(SlotRef::enemy(0), 1));

        assert_eq!(engine.state().game_state, GameState::WaitingForActions);
        assert_eq!(engine.state().slot(SlotRef::enemy(0)).unwrap().active, Some(1));
        assert!(matches!(
            engine.events().last(),
            Some(BattleEvent::CreatureSwitchedIn {
                species: Species::Snorlax,
                ..
            })
        ));
    }
}
