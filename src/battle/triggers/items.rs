use super::{fraction_of_max, ListenerContext, Trigger, TriggerKind, TriggerListener};
use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::state::BattleEvent;
use crate::side::SlotRef;
use schema::{HeldItem, StatType};

fn activated(item: HeldItem, owner: SlotRef, ctx: &ListenerContext) -> BattleAction {
    BattleAction::Message(BattleEvent::ItemActivated {
        slot: owner,
        name: ctx.state.name_at(owner),
        item,
    })
}

impl TriggerListener for HeldItem {
    type Owner = SlotRef;

    fn listens_to(&self, kind: TriggerKind) -> bool {
        use TriggerKind::*;
        match self {
            HeldItem::FocusSash => kind == OnWouldFaint,
            HeldItem::Leftovers => kind == OnTurnEnd,
            HeldItem::SitrusBerry => kind == OnLowHp,
            HeldItem::LifeOrb => kind == OnAfterMove,
            HeldItem::ShellBell => kind == OnDamageDealt,
            HeldItem::RockyHelmet => kind == OnContactReceived,
            HeldItem::WeaknessPolicy => kind == OnDamageTaken,
            HeldItem::ChoiceScarf
            | HeldItem::IronBall
            | HeldItem::Charcoal
            | HeldItem::MysticWater
            | HeldItem::Magnet
            | HeldItem::MiracleSeed => false,
        }
    }

    fn react(&self, owner: SlotRef, trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        let state = ctx.state;
        let Some(holder) = state.active_battler(owner) else {
            return Vec::new();
        };

        match (self, trigger) {
            (HeldItem::FocusSash, Trigger::WouldFaint { target, source, .. })
                if *target == owner && holder.is_at_full_hp() && source.is_move() =>
            {
                vec![
                    BattleAction::ConsumeItem { target: owner },
                    activated(*self, owner, ctx),
                    BattleAction::Damage {
                        target: owner,
                        amount: holder.current_hp() - 1,
                        source: source.clone(),
                    },
                    BattleAction::Message(BattleEvent::Endured {
                        target: owner,
                        name: holder.name.clone(),
                    }),
                ]
            }

            (HeldItem::Leftovers, Trigger::TurnEnd) if !holder.is_at_full_hp() => vec![
                activated(*self, owner, ctx),
                BattleAction::Heal {
                    target: owner,
                    amount: fraction_of_max(state, owner, 16),
                },
            ],

            (HeldItem::SitrusBerry, Trigger::LowHp { target, .. })
                if *target == owner && holder.current_hp() as u32 * 2 <= holder.max_hp() as u32 =>
            {
                vec![
                    BattleAction::ConsumeItem { target: owner },
                    activated(*self, owner, ctx),
                    BattleAction::Heal {
                        target: owner,
                        amount: fraction_of_max(state, owner, 4),
                    },
                ]
            }

            (HeldItem::LifeOrb, Trigger::AfterMove { slot, .. }) if *slot == owner => {
                let dealt = state.slot(owner).map(|s| s.damage_dealt_this_move).unwrap_or(0);
                if dealt == 0 {
                    return Vec::new();
                }
                vec![BattleAction::Damage {
                    target: owner,
                    amount: fraction_of_max(state, owner, 10),
                    source: DamageSource::Item(*self),
                }]
            }

            (HeldItem::ShellBell, Trigger::DamageDealt { attacker, amount, .. })
                if *attacker == owner && !holder.is_at_full_hp() =>
            {
                let heal = amount / 8;
                if heal == 0 {
                    return Vec::new();
                }
                vec![
                    activated(*self, owner, ctx),
                    BattleAction::Heal {
                        target: owner,
                        amount: heal,
                    },
                ]
            }

            (HeldItem::RockyHelmet, Trigger::ContactReceived { attacker, defender })
                if *defender == owner && state.active_battler(*attacker).is_some() =>
            {
                vec![BattleAction::Damage {
                    target: *attacker,
                    amount: fraction_of_max(state, *attacker, 6),
                    source: DamageSource::Item(*self),
                }]
            }

            (
                HeldItem::WeaknessPolicy,
                Trigger::DamageTaken {
                    target,
                    source: DamageSource::Move { effectiveness, .. },
                    ..
                },
            ) if *target == owner && *effectiveness > 1.0 => vec![
                BattleAction::ConsumeItem { target: owner },
                activated(*self, owner, ctx),
                BattleAction::StatStage {
                    target: owner,
                    stat: StatType::Attack,
                    delta: 2,
                    source: Some(owner),
                },
                BattleAction::StatStage {
                    target: owner,
                    stat: StatType::SpecialAttack,
                    delta: 2,
                    source: Some(owner),
                },
            ],

            _ => Vec::new(),
        }
    }
}
