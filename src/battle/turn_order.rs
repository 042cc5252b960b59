//! Ordering of the actions submitted for a turn.

use crate::battle::action_stack::BattleAction;
use crate::battle::state::{BattleState, TurnRng};
use crate::battle::stats::effective_speed;
use crate::catalog::Catalog;
use crate::side::SlotRef;
use schema::MoveEffect;
use std::cmp::Ordering;

/// Sort key of a top-level action. Compared field by field, larger goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub tier: u8,
    pub priority: i8,
    pub speed: u32,
}

impl OrderKey {
    pub fn of(action: &BattleAction, state: &BattleState, catalog: &Catalog) -> Self {
        Self {
            tier: action.tier(),
            priority: action.priority(catalog),
            speed: action
                .source()
                .map(|slot| effective_speed(state, slot))
                .unwrap_or(0),
        }
    }
}

/// The slot a Pursuit in `action` is aimed at, if it is one.
fn pursuit_target(action: &BattleAction, state: &BattleState, catalog: &Catalog) -> Option<SlotRef> {
    let BattleAction::UseMove {
        slot,
        move_used,
        target,
        ..
    } = action
    else {
        return None;
    };
    let data = catalog.move_data(*move_used).ok()?;
    if !data.has_effect(&MoveEffect::Pursuit) {
        return None;
    }
    target.or_else(|| state.opponents_of(*slot).first().copied())
}

/// Picks the index of the action that runs next, evaluated against the current state.
///
/// Exact ties are settled uniformly: the n-th action found tied with the leader takes
/// over with probability 1/n, so two tied actions cost one coin flip. A Pursuit aimed
/// at a slot that is about to switch out jumps ahead of that switch.
pub fn select_next(
    actions: &[BattleAction],
    state: &BattleState,
    catalog: &Catalog,
    rng: &mut TurnRng,
) -> Option<usize> {
    let mut best = 0;
    let mut best_key = OrderKey::of(actions.first()?, state, catalog);
    let mut tied = 1;

    for (index, action) in actions.iter().enumerate().skip(1) {
        let key = OrderKey::of(action, state, catalog);
        match key.cmp(&best_key) {
            Ordering::Greater => {
                best = index;
                best_key = key;
                tied = 1;
            }
            Ordering::Equal => {
                tied += 1;
                if rng.one_in(tied, "speed tie") {
                    best = index;
                }
            }
            Ordering::Less => {}
        }
    }

    if let BattleAction::Switch { slot: switching, .. } = &actions[best] {
        let pursuer = actions.iter().position(|action| {
            action.source().is_some_and(|s| s.side != switching.side)
                && pursuit_target(action, state, catalog) == Some(*switching)
        });
        if let Some(pursuer) = pursuer {
            tracing::debug!(slot = %switching, "pursuit strikes before the switch");
            return Some(pursuer);
        }
    }
    Some(best)
}

/// Full ordering of a set of actions against an unchanging state.
pub fn sort(
    mut actions: Vec<BattleAction>,
    state: &BattleState,
    catalog: &Catalog,
    rng: &mut TurnRng,
) -> Vec<BattleAction> {
    let mut ordered = Vec::with_capacity(actions.len());
    while let Some(index) = select_next(&actions, state, catalog, rng) {
        ordered.push(actions.remove(index));
    }
    ordered
}
