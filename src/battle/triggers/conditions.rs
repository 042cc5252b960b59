use super::{fraction_of_max, ListenerContext, Trigger, TriggerKind, TriggerListener};
use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::conditions::VolatileStatus;
use crate::battle::stats::is_grounded;
use crate::creature::StatusCondition;
use crate::side::{SideId, SlotRef};
use schema::{CreatureType, SideCondition, StatType};

impl TriggerListener for StatusCondition {
    type Owner = SlotRef;

    fn listens_to(&self, kind: TriggerKind) -> bool {
        matches!(self, StatusCondition::Freeze) && kind == TriggerKind::OnDamageTaken
    }

    /// A Fire-type hit thaws a frozen target.
    fn react(&self, owner: SlotRef, trigger: &Trigger, _ctx: &ListenerContext) -> Vec<BattleAction> {
        match trigger {
            Trigger::DamageTaken {
                target,
                source:
                    DamageSource::Move {
                        move_type: CreatureType::Fire,
                        ..
                    },
                ..
            } if *target == owner => vec![BattleAction::CureStatus { target: owner }],
            _ => Vec::new(),
        }
    }
}

impl TriggerListener for VolatileStatus {
    type Owner = SlotRef;

    fn listens_to(&self, kind: TriggerKind) -> bool {
        matches!(self, VolatileStatus::Seeded { .. }) && kind == TriggerKind::OnTurnEnd
    }

    fn react(&self, owner: SlotRef, trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        let (VolatileStatus::Seeded { by }, Trigger::TurnEnd) = (self, trigger) else {
            return Vec::new();
        };
        let Some(victim) = ctx.state.active_battler(owner) else {
            return Vec::new();
        };
        let drained = fraction_of_max(ctx.state, owner, 8).min(victim.current_hp());
        let mut actions = vec![BattleAction::Damage {
            target: owner,
            amount: drained,
            source: DamageSource::LeechSeed,
        }];
        // The seeder's slot may have changed occupant; whoever stands there now is healed.
        if ctx.state.active_battler(*by).is_some() {
            actions.push(BattleAction::Heal {
                target: *by,
                amount: drained,
            });
        }
        actions
    }
}

impl TriggerListener for SideCondition {
    type Owner = SideId;

    fn listens_to(&self, kind: TriggerKind) -> bool {
        self.is_hazard() && kind == TriggerKind::OnSwitchIn
    }

    fn react(&self, owner: SideId, trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        let Trigger::SwitchIn { slot } = trigger else {
            return Vec::new();
        };
        if slot.side != owner || !is_grounded(ctx.state, *slot) {
            return Vec::new();
        }
        match self {
            SideCondition::Spikes => {
                let divisor = match ctx.state.side(owner).condition_layers(*self) {
                    0 => return Vec::new(),
                    1 => 8,
                    2 => 6,
                    _ => 4,
                };
                vec![BattleAction::Damage {
                    target: *slot,
                    amount: fraction_of_max(ctx.state, *slot, divisor),
                    source: DamageSource::Hazard(*self),
                }]
            }
            SideCondition::StickyWeb => vec![BattleAction::StatStage {
                target: *slot,
                stat: StatType::Speed,
                delta: -1,
                source: None,
            }],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCreatureBuilder};
    use crate::battle::triggers::process;
    use crate::catalog::Catalog;
    use crate::side::SideConditionState;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::Species;

    #[rstest]
    #[case(1, 12)]
    #[case(2, 16)]
    #[case(3, 25)]
    fn test_spikes_scale_with_layers(#[case] layers: u8, #[case] expected: u16) {
        let player = TestCreatureBuilder::new(Species::Rattata, 50).with_max_hp(100).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut state = create_test_battle(player, enemy);
        state.side_mut(SideId::Player).conditions.insert(
            SideCondition::Spikes,
            SideConditionState {
                turns_remaining: None,
                layers,
            },
        );

        let actions = process(
            &Trigger::SwitchIn {
                slot: SlotRef::player(0),
            },
            &state,
            Catalog::standard(),
        );
        assert_eq!(
            actions,
            vec![BattleAction::Damage {
                target: SlotRef::player(0),
                amount: expected,
                source: DamageSource::Hazard(SideCondition::Spikes),
            }]
        );
    }

    #[test]
    fn test_hazards_skip_flying_types() {
        let player = TestCreatureBuilder::new(Species::Charizard, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut state = create_test_battle(player, enemy);
        state.side_mut(SideId::Player).conditions.insert(
            SideCondition::StickyWeb,
            SideConditionState {
                turns_remaining: None,
                layers: 1,
            },
        );

        let trigger = Trigger::SwitchIn {
            slot: SlotRef::player(0),
        };
        assert!(process(&trigger, &state, Catalog::standard()).is_empty());
    }
}
