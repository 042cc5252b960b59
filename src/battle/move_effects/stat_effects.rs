use super::{chance_wrap, EffectContext};
use crate::battle::action_stack::BattleAction;
use crate::battle::state::{ActionFailureReason, BattleState};
use schema::{StatType, Target};

pub(super) fn stat_change_effect(
    target: &Target,
    stat: StatType,
    delta: i8,
    chance: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleAction> {
    let slot = context.target_slot(target);
    if state.active_battler(slot).is_none() {
        return Vec::new();
    }
    chance_wrap(
        chance,
        "stat change",
        vec![BattleAction::StatStage {
            target: slot,
            stat,
            delta,
            source: Some(context.attacker),
        }],
    )
}

/// Restores a percentage of the user's max HP.
pub(super) fn heal_effect(percent: u8, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    let Some(user) = state.active_battler(context.attacker) else {
        return Vec::new();
    };
    if user.is_at_full_hp() {
        return context.failure(state, ActionFailureReason::MoveFailed);
    }
    let amount = ((user.max_hp() as u32 * percent as u32) / 100).max(1) as u16;
    vec![BattleAction::Heal {
        target: context.attacker,
        amount,
    }]
}
