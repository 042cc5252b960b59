//! Trigger processor.
//!
//! A trigger names a point in resolution. Every passive source on the field that
//! listens to it contributes actions, which the engine then executes as reactions.
//! Scanning only reads state; nothing here mutates the battle.

mod abilities;
mod conditions;
mod field;
mod items;

use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::state::BattleState;
use crate::catalog::Catalog;
use crate::side::{SideId, SlotRef};
use schema::{Move, Weather};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    OnSwitchIn,
    OnBeforeMove,
    OnContactReceived,
    OnDamageDealt,
    OnDamageTaken,
    OnWouldFaint,
    OnAfterMove,
    OnTurnEnd,
    OnWeatherChange,
    OnLowHp,
    OnFaint,
}

/// A trigger together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    SwitchIn {
        slot: SlotRef,
    },
    BeforeMove {
        slot: SlotRef,
        move_used: Move,
    },
    ContactReceived {
        attacker: SlotRef,
        defender: SlotRef,
    },
    DamageDealt {
        attacker: SlotRef,
        target: SlotRef,
        amount: u16,
    },
    DamageTaken {
        target: SlotRef,
        amount: u16,
        source: DamageSource,
    },
    /// `damage` is the unclamped amount that would have been dealt.
    WouldFaint {
        target: SlotRef,
        damage: u32,
        source: DamageSource,
    },
    AfterMove {
        slot: SlotRef,
        move_used: Move,
    },
    TurnEnd,
    WeatherChange {
        weather: Weather,
    },
    LowHp {
        target: SlotRef,
        previous_hp: u16,
    },
    Faint {
        target: SlotRef,
        by: Option<SlotRef>,
    },
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::SwitchIn { .. } => TriggerKind::OnSwitchIn,
            Trigger::BeforeMove { .. } => TriggerKind::OnBeforeMove,
            Trigger::ContactReceived { .. } => TriggerKind::OnContactReceived,
            Trigger::DamageDealt { .. } => TriggerKind::OnDamageDealt,
            Trigger::DamageTaken { .. } => TriggerKind::OnDamageTaken,
            Trigger::WouldFaint { .. } => TriggerKind::OnWouldFaint,
            Trigger::AfterMove { .. } => TriggerKind::OnAfterMove,
            Trigger::TurnEnd => TriggerKind::OnTurnEnd,
            Trigger::WeatherChange { .. } => TriggerKind::OnWeatherChange,
            Trigger::LowHp { .. } => TriggerKind::OnLowHp,
            Trigger::Faint { .. } => TriggerKind::OnFaint,
        }
    }
}

/// Read-only view handed to listeners.
pub struct ListenerContext<'a> {
    pub state: &'a BattleState,
    pub catalog: &'a Catalog,
}

/// Implemented by every closed family of passive effects.
pub trait TriggerListener {
    /// What the listener is attached to: a slot for creature-borne effects, a side for side
    /// conditions, nothing for weather and terrain.
    type Owner: Copy;

    fn listens_to(&self, kind: TriggerKind) -> bool;

    fn react(&self, owner: Self::Owner, trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction>;
}

fn contribute<L: TriggerListener>(
    listener: &L,
    owner: L::Owner,
    trigger: &Trigger,
    ctx: &ListenerContext,
) -> Vec<BattleAction> {
    if listener.listens_to(trigger.kind()) {
        listener.react(owner, trigger, ctx)
    } else {
        Vec::new()
    }
}

/// Which passive sources a scan visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Creature-borne effects and side conditions.
    Participants,
    Weather,
    Terrain,
}

/// Every contribution in scan order.
fn contributions(scope: Scope, trigger: &Trigger, state: &BattleState, catalog: &Catalog) -> Vec<Vec<BattleAction>> {
    let ctx = ListenerContext { state, catalog };
    let mut all = Vec::new();

    if matches!(scope, Scope::All | Scope::Participants) {
        for slot in state.active_slots() {
            let (Some(creature), Some(battle_slot)) = (state.active_battler(slot), state.slot(slot)) else {
                continue;
            };
            if let Some(ability) = creature.ability {
                all.push(contribute(&ability, slot, trigger, &ctx));
            }
            if let Some(item) = creature.item() {
                all.push(contribute(&item, slot, trigger, &ctx));
            }
            if let Some(status) = creature.status {
                all.push(contribute(&status, slot, trigger, &ctx));
            }
            for volatile in battle_slot.volatiles.values() {
                all.push(contribute(volatile, slot, trigger, &ctx));
            }
        }

        for side in SideId::ALL {
            for condition in state.side(side).conditions.keys() {
                all.push(contribute(condition, side, trigger, &ctx));
            }
        }
    }

    if matches!(scope, Scope::All | Scope::Weather) {
        all.push(contribute(&state.weather.kind, (), trigger, &ctx));
    }
    if matches!(scope, Scope::All | Scope::Terrain) {
        all.push(contribute(&state.terrain.kind, (), trigger, &ctx));
    }

    all.retain(|actions| !actions.is_empty());
    all
}

/// Collects the actions of every listener, in scan order.
pub fn process(trigger: &Trigger, state: &BattleState, catalog: &Catalog) -> Vec<BattleAction> {
    process_in(Scope::All, trigger, state, catalog)
}

/// Like `process`, restricted to one group of sources.
pub fn process_in(scope: Scope, trigger: &Trigger, state: &BattleState, catalog: &Catalog) -> Vec<BattleAction> {
    let actions: Vec<BattleAction> = contributions(scope, trigger, state, catalog)
        .into_iter()
        .flatten()
        .collect();
    if !actions.is_empty() {
        tracing::debug!(trigger = ?trigger.kind(), ?scope, reactions = actions.len(), "trigger fired");
    }
    actions
}

/// Only the first contributing listener. Used where one source pre-empts the rest.
pub fn process_first(trigger: &Trigger, state: &BattleState, catalog: &Catalog) -> Vec<BattleAction> {
    contributions(Scope::All, trigger, state, catalog)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// `max_hp / divisor`, never less than 1.
pub(crate) fn fraction_of_max(state: &BattleState, slot: SlotRef, divisor: u16) -> u16 {
    state
        .creature_at(slot)
        .map(|creature| (creature.max_hp() / divisor).max(1))
        .unwrap_or(0)
}
