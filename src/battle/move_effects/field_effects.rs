use super::EffectContext;
use crate::battle::action_stack::BattleAction;
use crate::battle::state::{ActionFailureReason, BattleState};
use schema::{SideCondition, Terrain, Weather};

pub(super) fn weather_effect(weather: Weather, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    vec![BattleAction::SetWeather {
        weather,
        turns: state.rules.weather_turns,
        source: Some(context.attacker),
    }]
}

pub(super) fn terrain_effect(terrain: Terrain, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    vec![BattleAction::SetTerrain {
        terrain,
        turns: state.rules.terrain_turns,
        source: Some(context.attacker),
    }]
}

/// Hazards land on the opposing side, everything else on the user's.
pub(super) fn side_condition_effect(
    condition: SideCondition,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleAction> {
    let side = if condition.is_hazard() {
        context.attacker.side.opponent()
    } else {
        context.attacker.side
    };
    let layers = state.side(side).condition_layers(condition);
    let already_full = if condition.is_hazard() {
        layers >= condition.max_layers()
    } else {
        state.side(side).has_condition(condition)
    };
    if already_full {
        return context.failure(state, ActionFailureReason::MoveFailed);
    }
    vec![BattleAction::AddSideCondition { side, condition }]
}
