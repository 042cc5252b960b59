use super::{fraction_of_max, ListenerContext, Trigger, TriggerKind, TriggerListener};
use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::stats::{has_type, is_grounded};
use schema::{CreatureType, Terrain, Weather};

impl TriggerListener for Weather {
    type Owner = ();

    fn listens_to(&self, kind: TriggerKind) -> bool {
        matches!(self, Weather::Sandstorm | Weather::Hail) && kind == TriggerKind::OnTurnEnd
    }

    /// Chip damage to every active creature the weather does not spare.
    fn react(&self, _owner: (), trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        let exempt: &[CreatureType] = match (self, trigger) {
            (Weather::Sandstorm, Trigger::TurnEnd) => &[CreatureType::Rock, CreatureType::Ground, CreatureType::Steel],
            (Weather::Hail, Trigger::TurnEnd) => &[CreatureType::Ice],
            _ => return Vec::new(),
        };
        let state = ctx.state;
        state
            .active_slots()
            .into_iter()
            .filter(|slot| !exempt.iter().any(|t| has_type(state, *slot, *t)))
            .map(|slot| BattleAction::Damage {
                target: slot,
                amount: fraction_of_max(state, slot, 16),
                source: DamageSource::Weather(*self),
            })
            .collect()
    }
}

impl TriggerListener for Terrain {
    type Owner = ();

    fn listens_to(&self, kind: TriggerKind) -> bool {
        *self == Terrain::Grassy && kind == TriggerKind::OnTurnEnd
    }

    /// Grassy Terrain heals grounded creatures that are missing HP.
    fn react(&self, _owner: (), trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        if !matches!((self, trigger), (Terrain::Grassy, Trigger::TurnEnd)) {
            return Vec::new();
        }
        let state = ctx.state;
        state
            .active_slots()
            .into_iter()
            .filter(|slot| is_grounded(state, *slot))
            .filter(|slot| state.active_battler(*slot).is_some_and(|c| !c.is_at_full_hp()))
            .map(|slot| BattleAction::Heal {
                target: slot,
                amount: fraction_of_max(state, slot, 16),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::action_stack::{BattleAction, DamageSource};
    use crate::battle::tests::common::{create_test_battle, TestCreatureBuilder};
    use crate::battle::triggers::{process, process_in, Scope, Trigger};
    use crate::catalog::Catalog;
    use crate::side::SlotRef;
    use pretty_assertions::assert_eq;
    use schema::{HeldItem, Species, Terrain, Weather};

    #[test]
    fn test_weather_scans_after_creatures() {
        // Arrange: Leftovers heals first, then hail chips both Rattata
        let player = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_item(HeldItem::Leftovers)
            .with_max_hp(160)
            .with_hp(100)
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).with_max_hp(160).build();
        let mut state = create_test_battle(player, enemy);
        state.weather.kind = Weather::Hail;
        state.weather.turns_remaining = 3;

        // Act
        let actions = process(&Trigger::TurnEnd, &state, Catalog::standard());

        // Assert
        let heal = actions.iter().position(|a| matches!(a, BattleAction::Heal { .. }));
        let first_chip = actions.iter().position(|a| matches!(a, BattleAction::Damage { .. }));
        assert!(heal.is_some() && heal < first_chip, "{:?}", actions);
        let chip: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                BattleAction::Damage {
                    target,
                    amount,
                    source: DamageSource::Weather(Weather::Hail),
                } => Some((*target, *amount)),
                _ => None,
            })
            .collect();
        assert_eq!(chip, vec![(SlotRef::player(0), 10), (SlotRef::enemy(0), 10)]);
    }

    #[test]
    fn test_terrain_scans_after_weather() {
        // Arrange
        let player = TestCreatureBuilder::new(Species::Rattata, 50)
            .with_max_hp(160)
            .with_hp(100)
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).with_max_hp(160).build();
        let mut state = create_test_battle(player, enemy);
        state.weather.kind = Weather::Sandstorm;
        state.weather.turns_remaining = 3;
        state.terrain.kind = Terrain::Grassy;
        state.terrain.turns_remaining = 3;

        // Act
        let actions = process(&Trigger::TurnEnd, &state, Catalog::standard());

        // Assert
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], BattleAction::Damage { .. }));
        assert!(matches!(actions[1], BattleAction::Damage { .. }));
        assert_eq!(
            actions[2],
            BattleAction::Heal {
                target: SlotRef::player(0),
                amount: 10,
            }
        );
    }

    #[test]
    fn test_participant_scope_leaves_out_the_field() {
        let player = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut state = create_test_battle(player, enemy);
        state.weather.kind = Weather::Sandstorm;
        state.weather.turns_remaining = 3;

        let participants = process_in(Scope::Participants, &Trigger::TurnEnd, &state, Catalog::standard());
        let weather = process_in(Scope::Weather, &Trigger::TurnEnd, &state, Catalog::standard());

        assert!(participants.is_empty());
        assert_eq!(weather.len(), 2);
    }
}
