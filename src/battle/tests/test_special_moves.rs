#[cfg(test)]
mod tests {
    use crate::battle::action_stack::DamageSource;
    use crate::battle::conditions::VolatileKind;
    use crate::battle::engine::CombatEngine;
    use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, WeatherState};
    use crate::battle::tests::common::{
        assert_ok, create_test_battle, predictable_rng, TestCreatureBuilder,
    };
    use crate::catalog::Catalog;
    use crate::side::{PlayerAction, SlotRef};
    use pretty_assertions::assert_eq;
    use schema::{Move, Species, Weather};

    fn engine_for(state: BattleState) -> CombatEngine<'static> {
        CombatEngine::new(state, Catalog::standard(), predictable_rng())
    }

    fn attack_vs(engine: &mut CombatEngine, enemy: PlayerAction) {
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), enemy),
        ]));
    }

    fn failed(engine: &CombatEngine, slot: SlotRef, reason: ActionFailureReason) -> bool {
        engine.events().iter().any(|e| {
            matches!(e, BattleEvent::ActionFailed { slot: s, reason: r, .. } if *s == slot && *r == reason)
        })
    }

    fn hp(engine: &CombatEngine, slot: SlotRef) -> u16 {
        engine.state().creature_at(slot).map(|c| c.current_hp()).unwrap_or(0)
    }

    fn pp(engine: &CombatEngine, slot: SlotRef, index: usize) -> u8 {
        engine
            .state()
            .creature_at(slot)
            .and_then(|c| c.moves[index].as_ref())
            .map(|m| m.pp)
            .unwrap_or(0)
    }

    #[test]
    fn test_counter_returns_double_physical_damage() {
        // Arrange
        let player = TestCreatureBuilder::new(Species::Machamp, 50)
            .with_moves(vec![Move::Counter])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        // Act
        attack_vs(&mut engine, PlayerAction::use_move(0));

        // Assert: Tackle moves first despite Machamp's speed and deals 19
        assert_eq!(hp(&engine, SlotRef::player(0)), 150 - 19);
        assert_eq!(hp(&engine, SlotRef::enemy(0)), 90 - 38);
        // Tackle: accuracy, crit, variance. Counter: accuracy only.
        assert_eq!(engine.rng().draws(), 4);
    }

    #[test]
    fn test_counter_with_nothing_to_return_fails() {
        let player = TestCreatureBuilder::new(Species::Machamp, 50)
            .with_moves(vec![Move::Counter])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        attack_vs(&mut engine, PlayerAction::Pass);

        assert!(failed(&engine, SlotRef::player(0), ActionFailureReason::NothingToCounter));
        assert!(engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
    }

    #[test]
    fn test_focus_punch_fails_after_being_hit() {
        // Arrange
        let player = TestCreatureBuilder::new(Species::Machamp, 50)
            .with_moves(vec![Move::FocusPunch])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        // Act
        attack_vs(&mut engine, PlayerAction::use_move(0));

        // Assert
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::VolatileApplied {
                kind: VolatileKind::Focusing,
                ..
            }
        )));
        assert!(failed(&engine, SlotRef::player(0), ActionFailureReason::LostFocus));
        assert!(engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
        assert_eq!(pp(&engine, SlotRef::player(0), 0), 19, "the attempt still costs PP");
        assert!(!engine.state().has_volatile(SlotRef::player(0), VolatileKind::Focusing));
    }

    #[test]
    fn test_focus_punch_lands_when_undisturbed() {
        let player = TestCreatureBuilder::new(Species::Machamp, 50)
            .with_moves(vec![Move::FocusPunch])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        attack_vs(&mut engine, PlayerAction::Pass);

        assert!(engine.state().side(crate::side::SideId::Enemy).party[0].is_fainted());
    }

    #[test]
    fn test_solar_beam_charges_then_fires() {
        // Arrange
        let player = TestCreatureBuilder::new(Species::Venusaur, 50)
            .with_moves(vec![Move::SolarBeam])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        // Act: turn one charges
        attack_vs(&mut engine, PlayerAction::Pass);

        // Assert
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::ChargingMove {
                move_used: Move::SolarBeam,
                ..
            }
        )));
        assert!(engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
        assert_eq!(pp(&engine, SlotRef::player(0), 0), 9);

        // Act: no choice is needed for the locked slot
        assert_ok(engine.resolve_turn(&[(SlotRef::enemy(0), PlayerAction::Pass)]));

        // Assert: the release spends no extra PP
        assert!(!engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
        assert_eq!(pp(&engine, SlotRef::player(0), 0), 9);
        assert!(!engine.state().has_volatile(SlotRef::player(0), VolatileKind::Charging));
    }

    #[test]
    fn test_solar_beam_skips_charge_in_sun() {
        let player = TestCreatureBuilder::new(Species::Venusaur, 50)
            .with_moves(vec![Move::SolarBeam])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));
        engine.state_mut().weather = WeatherState {
            kind: Weather::Sun,
            turns_remaining: 5,
            source: None,
        };

        attack_vs(&mut engine, PlayerAction::Pass);

        assert!(!engine
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::ChargingMove { .. })));
        assert!(!engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
    }

    #[test]
    fn test_hyper_beam_forces_a_recharge_turn() {
        // Arrange
        let player = TestCreatureBuilder::new(Species::Snorlax, 50)
            .with_moves(vec![Move::HyperBeam])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        // Act
        attack_vs(&mut engine, PlayerAction::Pass);

        // Assert
        assert_eq!(hp(&engine, SlotRef::enemy(0)), 220 - 57);
        assert!(engine.state().has_volatile(SlotRef::player(0), VolatileKind::MustRecharge));

        // Act: a submitted attack is ignored
        assert_ok(engine.resolve_turn(&[
            (SlotRef::player(0), PlayerAction::use_move(0)),
            (SlotRef::enemy(0), PlayerAction::Pass),
        ]));

        // Assert
        assert!(failed(&engine, SlotRef::player(0), ActionFailureReason::MustRecharge));
        assert_eq!(hp(&engine, SlotRef::enemy(0)), 220 - 57);
        assert_eq!(pp(&engine, SlotRef::player(0), 0), 4);
        assert!(!engine.state().has_volatile(SlotRef::player(0), VolatileKind::MustRecharge));
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        // Arrange
        let mut player = TestCreatureBuilder::new(Species::Rattata, 50).build();
        if let Some(tackle) = player.moves[0].as_mut() {
            tackle.pp = 0;
        }
        let enemy = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        // Act
        attack_vs(&mut engine, PlayerAction::Pass);

        // Assert: 19 dealt, a quarter of 90 max HP taken back
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::MoveUsed {
                move_used: Move::Struggle,
                ..
            }
        )));
        assert_eq!(hp(&engine, SlotRef::enemy(0)), 220 - 19);
        assert_eq!(hp(&engine, SlotRef::player(0)), 90 - 22);
        assert!(engine.events().iter().any(|e| matches!(
            e,
            BattleEvent::DamageDealt {
                target,
                source: DamageSource::Recoil,
                damage: 22,
                ..
            } if *target == SlotRef::player(0)
        )));
    }

    #[test]
    fn test_fixed_damage_ignores_stats() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::SonicBoom])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        attack_vs(&mut engine, PlayerAction::Pass);

        assert_eq!(hp(&engine, SlotRef::enemy(0)), 200);
    }

    #[test]
    fn test_fixed_damage_respects_immunity() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::SonicBoom])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Gengar, 50).build();
        let mut engine = engine_for(create_test_battle(player, enemy));

        attack_vs(&mut engine, PlayerAction::Pass);

        assert!(failed(&engine, SlotRef::enemy(0), ActionFailureReason::Immune));
        assert!(engine.state().creature_at(SlotRef::enemy(0)).unwrap().is_at_full_hp());
    }
}
