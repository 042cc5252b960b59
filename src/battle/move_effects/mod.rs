// Secondary effects of moves, converted into battle actions.

mod damage_effects;
mod field_effects;
mod stat_effects;
mod status_effects;

use crate::battle::action_stack::BattleAction;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState};
use crate::side::SlotRef;
use schema::{Move, MoveData, MoveEffect, Target};

use self::{damage_effects::*, field_effects::*, stat_effects::*, status_effects::*};

#[derive(Debug, Clone)]
pub struct EffectContext {
    pub attacker: SlotRef,
    pub defender: SlotRef,
    pub move_used: Move,
    /// Status moves report failures; secondary effects of attacks fail silently.
    pub is_status_move: bool,
    pub hit_number: u8,
}

impl EffectContext {
    pub fn new(attacker: SlotRef, defender: SlotRef, move_used: Move, data: &MoveData, hit_number: u8) -> Self {
        Self {
            attacker,
            defender,
            move_used,
            is_status_move: !data.is_damaging(),
            hit_number,
        }
    }

    pub fn target_slot(&self, target: &Target) -> SlotRef {
        match target {
            Target::User => self.attacker,
            Target::Target => self.defender,
        }
    }

    /// "But it failed!" for status moves, nothing for secondary effects.
    pub fn failure(&self, state: &BattleState, reason: ActionFailureReason) -> Vec<BattleAction> {
        if !self.is_status_move {
            return Vec::new();
        }
        let slot = match reason {
            ActionFailureReason::Immune => self.defender,
            _ => self.attacker,
        };
        vec![BattleAction::Message(BattleEvent::ActionFailed {
            slot,
            name: state.name_at(slot),
            reason,
        })]
    }
}

/// Wraps actions in a roll unless they always happen.
pub(crate) fn chance_wrap(percent: u8, reason: &'static str, actions: Vec<BattleAction>) -> Vec<BattleAction> {
    if actions.is_empty() || percent == 0 {
        Vec::new()
    } else if percent >= 100 {
        actions
    } else {
        vec![BattleAction::Chance {
            percent,
            reason,
            actions,
        }]
    }
}

pub trait MoveEffectExt {
    fn to_actions(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleAction>;
}

impl MoveEffectExt for MoveEffect {
    fn to_actions(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
        match self {
            MoveEffect::Burn(chance)
            | MoveEffect::Paralyze(chance)
            | MoveEffect::Poison(chance)
            | MoveEffect::BadlyPoison(chance)
            | MoveEffect::Sleep(chance)
            | MoveEffect::Freeze(chance) => status_effect(self, *chance, context, state),
            MoveEffect::Flinch(chance) => flinch_effect(*chance, context, state),
            MoveEffect::Confuse(chance) => confuse_effect(*chance, context, state),
            MoveEffect::LeechSeed => leech_seed_effect(context, state),

            MoveEffect::StatChange(target, stat, delta, chance) => {
                stat_change_effect(target, *stat, *delta, *chance, context, state)
            }
            MoveEffect::Heal(percent) => heal_effect(*percent, context, state),

            MoveEffect::Recoil(percent) => recoil_effect(*percent, context),
            MoveEffect::Drain(percent) => drain_effect(*percent, context),
            MoveEffect::StruggleRecoil => struggle_recoil_effect(context, state),
            MoveEffect::Recharge => recharge_effect(context),

            MoveEffect::SetWeather(weather) => weather_effect(*weather, context, state),
            MoveEffect::SetTerrain(terrain) => terrain_effect(*terrain, context, state),
            MoveEffect::SetSideCondition(condition) => side_condition_effect(*condition, context, state),

            // Resolved by move execution itself
            MoveEffect::Priority(_)
            | MoveEffect::MultiHit(..)
            | MoveEffect::HighCrit
            | MoveEffect::Protect
            | MoveEffect::ChargeUp
            | MoveEffect::SemiInvulnerable
            | MoveEffect::FocusPunch
            | MoveEffect::Pursuit
            | MoveEffect::Counter
            | MoveEffect::MirrorCoat
            | MoveEffect::FixedDamage(_)
            | MoveEffect::LevelDamage => Vec::new(),
        }
    }
}

/// Actions for every effect of a move that has just connected.
pub fn effects_for_hit(data: &MoveData, context: &EffectContext, state: &BattleState) -> Vec<BattleAction> {
    data.effects
        .iter()
        .flat_map(|effect| effect.to_actions(context, state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCreatureBuilder};
    use crate::catalog::Catalog;
    use crate::creature::StatusCondition;
    use pretty_assertions::assert_eq;
    use schema::Species;

    fn context_for(move_used: Move) -> EffectContext {
        let data = Catalog::standard().move_data(move_used).unwrap();
        EffectContext::new(SlotRef::player(0), SlotRef::enemy(0), move_used, data, 0)
    }

    #[test]
    fn test_secondary_status_is_rolled() {
        let state = create_test_battle(
            TestCreatureBuilder::new(Species::Charizard, 50).build(),
            TestCreatureBuilder::new(Species::Snorlax, 50).build(),
        );
        let actions = MoveEffect::Burn(10).to_actions(&context_for(Move::Flamethrower), &state);
        assert_eq!(
            actions,
            vec![BattleAction::Chance {
                percent: 10,
                reason: "secondary status",
                actions: vec![BattleAction::ApplyStatus {
                    target: SlotRef::enemy(0),
                    status: StatusCondition::Burn,
                    source: Some(SlotRef::player(0)),
                }],
            }]
        );
    }

    #[test]
    fn test_secondary_status_on_immune_target_draws_nothing() {
        let state = create_test_battle(
            TestCreatureBuilder::new(Species::Charizard, 50).build(),
            TestCreatureBuilder::new(Species::Ninetales, 50).build(),
        );
        let actions = MoveEffect::Burn(10).to_actions(&context_for(Move::Flamethrower), &state);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_status_move_on_statused_target_fails_with_message() {
        let state = create_test_battle(
            TestCreatureBuilder::new(Species::Pikachu, 50).build(),
            TestCreatureBuilder::new(Species::Snorlax, 50)
                .with_status(StatusCondition::Burn)
                .build(),
        );
        let actions = MoveEffect::Paralyze(100).to_actions(&context_for(Move::ThunderWave), &state);
        assert!(matches!(
            actions.as_slice(),
            [BattleAction::Message(BattleEvent::ActionFailed {
                reason: ActionFailureReason::MoveFailed,
                ..
            })]
        ));
    }

    #[test]
    fn test_chance_wrap_skips_certain_rolls() {
        let action = BattleAction::Pass { slot: SlotRef::player(0) };
        assert_eq!(chance_wrap(100, "always", vec![action.clone()]), vec![action.clone()]);
        assert!(chance_wrap(0, "never", vec![action]).is_empty());
    }
}
