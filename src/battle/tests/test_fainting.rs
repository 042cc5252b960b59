#[cfg(test)]
mod tests {
    use crate::battle::action_stack::{BattleAction, DamageSource};
    use crate::battle::commands::ExecutionContext;
    use crate::battle::engine::CombatEngine;
    use crate::battle::state::{BattleEvent, BattleOutcome, EventBus, GameState};
    use crate::battle::tests::common::{assert_ok, create_test_battle, predictable_rng, TestCreatureBuilder};
    use crate::catalog::Catalog;
    use crate::creature::StatusCondition;
    use crate::side::{PlayerAction, SlotRef};
    use pretty_assertions::assert_eq;
    use schema::{Ability, HeldItem, Move, Species};

    fn seismic_toss_user() -> crate::creature::CreatureInstance {
        // 50 fixed damage at level 50
        TestCreatureBuilder::new(Species::Snorlax, 50)
            .with_moves(vec![Move::SeismicToss])
            .build()
    }

    fn toss_and_pass() -> [(SlotRef, PlayerAction); 2] {
        [
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::Pass),
        ]
    }

    #[test]
    fn test_focus_sash_survives_once() {
        // Arrange
        let holder = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_max_hp(40)
            .with_item(HeldItem::FocusSash)
            .build();
        let state = create_test_battle(seismic_toss_user(), holder);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        // Act: first lethal hit
        assert_ok(engine.resolve_turn(&toss_and_pass()));

        // Assert
        let rattata = engine.state().creature_at(SlotRef::enemy(0)).unwrap();
        assert_eq!(rattata.current_hp(), 1);
        assert_eq!(rattata.item(), None, "Focus Sash is used up");
        assert!(engine
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::Endured { target, .. } if *target == SlotRef::enemy(0))));
        assert_eq!(engine.state().game_state, GameState::WaitingForActions);

        // Act: second lethal hit has nothing to stop it
        assert_ok(engine.resolve_turn(&toss_and_pass()));

        // Assert
        assert!(engine.state().side(crate::side::SideId::Enemy).party[0].is_fainted());
        assert_eq!(engine.state().game_state, GameState::Finished(BattleOutcome::Victory));
    }

    #[test]
    fn test_sturdy_intercepts_before_focus_sash() {
        // Arrange: Skarmory has Sturdy and also holds a sash
        let skarmory = TestCreatureBuilder::new(Species::Skarmory, 50)
            .with_max_hp(40)
            .with_item(HeldItem::FocusSash)
            .build();
        let state = create_test_battle(seismic_toss_user(), skarmory);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        // Act
        assert_ok(engine.resolve_turn(&toss_and_pass()));

        // Assert
        let skarmory = engine.state().creature_at(SlotRef::enemy(0)).unwrap();
        assert_eq!(skarmory.current_hp(), 1);
        assert_eq!(skarmory.item(), Some(HeldItem::FocusSash), "Only the first interceptor acts");
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::AbilityActivated {
                ability: Ability::Sturdy,
                ..
            }
        )));
    }

    #[test]
    fn test_sash_ignores_non_move_damage() {
        let holder = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_max_hp(40)
            .with_item(HeldItem::FocusSash)
            .build();
        let mut state = create_test_battle(seismic_toss_user(), holder);
        let (mut rng, mut bus) = (predictable_rng(), EventBus::new());
        let mut ctx = ExecutionContext::new(&mut state, Catalog::standard(), &mut rng, &mut bus);

        let reactions = assert_ok(
            BattleAction::Damage {
                target: SlotRef::enemy(0),
                amount: 60,
                source: DamageSource::Status(StatusCondition::Poison),
            }
            .execute_logic(&mut ctx),
        );

        assert_eq!(
            reactions,
            vec![BattleAction::Faint {
                target: SlotRef::enemy(0),
                by: None,
            }]
        );
    }

    #[test]
    fn test_simultaneous_knockout_is_a_draw() {
        // Arrange: both sides at 1 HP and burned
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_hp(1)
            .with_status(StatusCondition::Burn)
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_hp(1)
            .with_status(StatusCondition::Burn)
            .build();
        let state = create_test_battle(player, enemy);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        // Act
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::Pass),
            (SlotRef::enemy(0), PlayerAction::Pass),
        ]));

        // Assert
        assert_eq!(engine.state().game_state, GameState::Finished(BattleOutcome::Draw));
        let faints = engine
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::CreatureFainted { .. }))
            .count();
        assert_eq!(faints, 2);
        assert_eq!(
            engine.events().last(),
            Some(&BattleEvent::BattleEnded {
                outcome: BattleOutcome::Draw
            })
        );
    }

    #[test]
    fn test_fainted_creature_loses_its_action() {
        // Arrange: Pikachu outspeeds and knocks out a 1 HP Rattata
        let pikachu = TestCreatureBuilder::new(Species::Pikachu, 50).build();
        let rattata = TestCreatureBuilder::new(Species::Rattata, 50).with_hp(1).build();
        let backup = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut state = create_test_battle(pikachu, rattata);
        state.side_mut(crate::side::SideId::Enemy).party.push(backup);
        let mut engine = CombatEngine::new(state, Catalog::standard(), predictable_rng());

        // Act
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::use_move(0)),
        ]));

        // Assert
        let moves_used: Vec<SlotRef> = engine
            .events()
            .iter()
            .filter_map(|e| match e {
                BattleEvent::MoveUsed { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(moves_used, vec![SlotRef::player(0)]);
        assert_eq!(engine.state().game_state, GameState::WaitingForReplacements);
        assert_eq!(engine.pending_replacements(), vec![SlotRef::enemy(0)]);
    }
}
