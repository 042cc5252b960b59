use super::{chance_wrap, EffectContext};
use crate::battle::action_stack::BattleAction;
use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::state::{ActionFailureReason, BattleState};
use crate::battle::stats::{current_types, has_type};
use crate::creature::StatusCondition;
use schema::{CreatureType, MoveEffect};

fn status_for(effect: &MoveEffect) -> Option<StatusCondition> {
    match effect {
        MoveEffect::Burn(_) => Some(StatusCondition::Burn),
        MoveEffect::Paralyze(_) => Some(StatusCondition::Paralysis),
        MoveEffect::Poison(_) => Some(StatusCondition::Poison),
        // Counters are filled in when the status lands
        MoveEffect::BadlyPoison(_) => Some(StatusCondition::BadlyPoisoned(0)),
        MoveEffect::Sleep(_) => Some(StatusCondition::Sleep(0)),
        MoveEffect::Freeze(_) => Some(StatusCondition::Freeze),
        _ => None,
    }
}

pub(super) fn status_effect(
    effect: &MoveEffect,
    chance: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleAction> {
    let Some(status) = status_for(effect) else {
        return Vec::new();
    };
    let Some(target) = state.active_battler(context.defender) else {
        return Vec::new();
    };

    // Checked before rolling so a blocked secondary never draws
    if target.status.is_some() {
        return context.failure(state, ActionFailureReason::MoveFailed);
    }
    let types = current_types(state, context.defender);
    if status.immune_types().iter().any(|t| types.contains(t)) {
        return context.failure(state, ActionFailureReason::Immune);
    }

    chance_wrap(
        chance,
        "secondary status",
        vec![BattleAction::ApplyStatus {
            target: context.defender,
            status,
            source: Some(context.attacker),
        }],
    )
}

pub(super) fn flinch_effect(chance: u8, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    if state.active_battler(context.defender).is_none()
        || state.has_volatile(context.defender, VolatileKind::Flinched)
    {
        return Vec::new();
    }
    chance_wrap(
        chance,
        "flinch",
        vec![BattleAction::ApplyVolatile {
            target: context.defender,
            status: VolatileStatus::Flinched,
            source: Some(context.attacker),
        }],
    )
}

pub(super) fn confuse_effect(chance: u8, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    if state.active_battler(context.defender).is_none() {
        return Vec::new();
    }
    if state.has_volatile(context.defender, VolatileKind::Confused) {
        return context.failure(state, ActionFailureReason::MoveFailed);
    }
    chance_wrap(
        chance,
        "confusion",
        vec![BattleAction::ApplyVolatile {
            target: context.defender,
            status: VolatileStatus::Confused { turns_remaining: 0 },
            source: Some(context.attacker),
        }],
    )
}

pub(super) fn leech_seed_effect(context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    if state.active_battler(context.defender).is_none() {
        return Vec::new();
    }
    if has_type(state, context.defender, CreatureType::Grass) {
        return context.failure(state, ActionFailureReason::Immune);
    }
    if state.has_volatile(context.defender, VolatileKind::Seeded) {
        return context.failure(state, ActionFailureReason::MoveFailed);
    }
    vec![BattleAction::ApplyVolatile {
        target: context.defender,
        status: VolatileStatus::Seeded { by: context.attacker },
        source: Some(context.attacker),
    }]
}
