//! Recurring effects resolved after every action of a turn.
//!
//! Stages run in a fixed order. Each stage's actions are collected from the state the
//! previous stage left behind and fully drained before the next stage is collected.

use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::state::BattleState;
use crate::battle::triggers::{self, fraction_of_max, Scope, Trigger};
use crate::catalog::Catalog;
use crate::creature::StatusCondition;
use crate::side::SideId;
use schema::{Terrain, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTurnStage {
    WeatherDamage,
    TerrainEffects,
    StatusDamage,
    StatusCure,
    TurnEndTriggers,
    Durations,
}

impl EndOfTurnStage {
    pub const ORDER: [EndOfTurnStage; 6] = [
        EndOfTurnStage::WeatherDamage,
        EndOfTurnStage::TerrainEffects,
        EndOfTurnStage::StatusDamage,
        EndOfTurnStage::StatusCure,
        EndOfTurnStage::TurnEndTriggers,
        EndOfTurnStage::Durations,
    ];
}

/// Actions for one stage, read from the current state.
pub fn stage_actions(stage: EndOfTurnStage, state: &BattleState, catalog: &Catalog) -> Vec<BattleAction> {
    match stage {
        EndOfTurnStage::WeatherDamage => triggers::process_in(Scope::Weather, &Trigger::TurnEnd, state, catalog),
        EndOfTurnStage::TerrainEffects => triggers::process_in(Scope::Terrain, &Trigger::TurnEnd, state, catalog),
        EndOfTurnStage::StatusDamage => status_damage(state),
        EndOfTurnStage::StatusCure => status_cure(state),
        EndOfTurnStage::TurnEndTriggers => {
            triggers::process_in(Scope::Participants, &Trigger::TurnEnd, state, catalog)
        }
        EndOfTurnStage::Durations => Vec::new(),
    }
}

fn status_damage(state: &BattleState) -> Vec<BattleAction> {
    let mut actions = Vec::new();
    for slot in state.active_slots() {
        let Some(creature) = state.active_battler(slot) else {
            continue;
        };
        let Some(status) = creature.status else {
            continue;
        };
        match status {
            StatusCondition::Burn => actions.push(BattleAction::Damage {
                target: slot,
                amount: fraction_of_max(state, slot, 16),
                source: DamageSource::Status(status),
            }),
            StatusCondition::Poison => actions.push(BattleAction::Damage {
                target: slot,
                amount: fraction_of_max(state, slot, 8),
                source: DamageSource::Status(status),
            }),
            StatusCondition::BadlyPoisoned(counter) => {
                let amount = ((creature.max_hp() as u32 * counter as u32) / 16).max(1) as u16;
                actions.push(BattleAction::Damage {
                    target: slot,
                    amount,
                    source: DamageSource::Status(status),
                });
                actions.push(BattleAction::SetStatus {
                    target: slot,
                    status: Some(StatusCondition::BadlyPoisoned(
                        counter.saturating_add(1).min(state.rules.toxic_cap),
                    )),
                });
            }
            _ => {}
        }
    }
    actions
}

fn status_cure(state: &BattleState) -> Vec<BattleAction> {
    state
        .active_slots()
        .into_iter()
        .filter(|slot| {
            state
                .active_battler(*slot)
                .is_some_and(|c| c.status == Some(StatusCondition::Freeze))
        })
        .map(|slot| BattleAction::Chance {
            percent: state.rules.freeze_thaw_chance,
            reason: "freeze thaw",
            actions: vec![BattleAction::CureStatus { target: slot }],
        })
        .collect()
}

/// Clears per-turn state and counts down timed field effects.
/// Expiries come back as actions so they report and trigger like anything else.
pub fn tick_durations(state: &mut BattleState) -> Vec<BattleAction> {
    let mut expired = Vec::new();

    for slot in state.all_slots() {
        if let Some(battle_slot) = state.slot_mut(slot) {
            battle_slot.volatiles.retain(|kind, _| !kind.is_single_turn());
            battle_slot.damage_taken = Default::default();
        }
    }

    for side in SideId::ALL {
        for (condition, entry) in state.side_mut(side).conditions.iter_mut() {
            if let Some(turns) = entry.turns_remaining.as_mut() {
                *turns = turns.saturating_sub(1);
                if *turns == 0 {
                    expired.push(BattleAction::RemoveSideCondition {
                        side,
                        condition: *condition,
                    });
                }
            }
        }
    }

    if state.weather.kind != Weather::None {
        state.weather.turns_remaining = state.weather.turns_remaining.saturating_sub(1);
        if state.weather.turns_remaining == 0 {
            expired.push(BattleAction::SetWeather {
                weather: Weather::None,
                turns: 0,
                source: None,
            });
        }
    }
    if state.terrain.kind != Terrain::None {
        state.terrain.turns_remaining = state.terrain.turns_remaining.saturating_sub(1);
        if state.terrain.turns_remaining == 0 {
            expired.push(BattleAction::SetTerrain {
                terrain: Terrain::None,
                turns: 0,
                source: None,
            });
        }
    }

    tracing::debug!(expired = expired.len(), "ticked durations");
    expired
}
