use super::EffectContext;
use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::conditions::VolatileStatus;
use crate::battle::state::BattleState;
use crate::battle::triggers::fraction_of_max;

// Recoil and drain are sized from the hit that just landed, so they resolve
// against `last_hit_damage` when executed rather than here.

pub(super) fn recoil_effect(percent: u8, context: &EffectContext) -> Vec<BattleAction> {
    vec![BattleAction::Recoil {
        target: context.attacker,
        percent,
    }]
}

pub(super) fn drain_effect(percent: u8, context: &EffectContext) -> Vec<BattleAction> {
    vec![BattleAction::Drain {
        target: context.attacker,
        percent,
    }]
}

/// A quarter of the user's max HP, regardless of damage dealt.
pub(super) fn struggle_recoil_effect(context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    if state.active_battler(context.attacker).is_none() {
        return Vec::new();
    }
    vec![BattleAction::Damage {
        target: context.attacker,
        amount: fraction_of_max(state, context.attacker, 4),
        source: DamageSource::Recoil,
    }]
}

pub(super) fn recharge_effect(context: &EffectContext) -> Vec<BattleAction> {
    if context.hit_number > 0 {
        return Vec::new();
    }
    vec![BattleAction::ApplyVolatile {
        target: context.attacker,
        status: VolatileStatus::MustRecharge,
        source: None,
    }]
}
