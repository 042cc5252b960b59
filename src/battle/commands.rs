//! Execution of individual battle actions.
//!
//! `execute_logic` applies one action to the state, records what happened on the
//! event bus and hands back the reactions it caused. It never talks to a view.

use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::move_execution;
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleOutcome, BattleState, EventBus, GameState, TerrainState,
    TurnRng, WeatherState,
};
use crate::battle::stats::{current_types, is_grounded};
use crate::battle::triggers::{self, Trigger};
use crate::catalog::Catalog;
use crate::creature::StatusCondition;
use crate::errors::{BattleResult, BattleStateError};
use crate::side::{SideConditionState, SideId, SlotRef};
use schema::{CreatureType, MoveCategory, SideCondition, StatType, Terrain, Weather};

/// Everything an action may touch while it executes.
pub struct ExecutionContext<'a> {
    pub state: &'a mut BattleState,
    pub catalog: &'a Catalog,
    pub rng: &'a mut TurnRng,
    pub bus: &'a mut EventBus,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        state: &'a mut BattleState,
        catalog: &'a Catalog,
        rng: &'a mut TurnRng,
        bus: &'a mut EventBus,
    ) -> Self {
        Self {
            state,
            catalog,
            rng,
            bus,
        }
    }

    pub(crate) fn fail(&mut self, slot: SlotRef, reason: ActionFailureReason) {
        let name = self.state.name_at(slot);
        self.bus.push(BattleEvent::ActionFailed { slot, name, reason });
    }
}

impl BattleAction {
    /// Applies the action and returns its reactions, to be executed before anything else queued.
    pub fn execute_logic(self, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
        tracing::debug!(action = ?self, "executing action");
        match self {
            BattleAction::Forfeit { side } => execute_forfeit(side, ctx),
            BattleAction::Switch { slot, party_index } => execute_switch(slot, party_index, ctx),
            BattleAction::UseMove {
                slot,
                move_index,
                move_used,
                target,
            } => move_execution::execute_use_move(slot, move_index, move_used, target, ctx),
            BattleAction::Pass { slot } => execute_pass(slot, ctx),
            BattleAction::Recharge { slot } => move_execution::execute_recharge(slot, ctx),
            BattleAction::AttackHit {
                attacker,
                defender,
                move_used,
                hit_number,
            } => move_execution::execute_attack_hit(attacker, defender, move_used, hit_number, ctx),

            BattleAction::Damage {
                target,
                amount,
                source,
            } => execute_damage(target, amount, source, ctx),
            BattleAction::Heal { target, amount } => execute_heal(target, amount, ctx),

            BattleAction::ApplyStatus {
                target,
                status,
                source,
            } => execute_apply_status(target, status, source, ctx),
            BattleAction::SetStatus { target, status } => {
                if let Some(creature) = ctx.state.creature_at_mut(target).filter(|c| c.can_battle()) {
                    creature.status = status;
                }
                Ok(Vec::new())
            }
            BattleAction::CureStatus { target } => execute_cure_status(target, ctx),

            BattleAction::ApplyVolatile {
                target,
                status,
                source,
            } => execute_apply_volatile(target, status, source, ctx),
            BattleAction::RemoveVolatile { target, kind } => {
                let removed = ctx
                    .state
                    .slot_mut(target)
                    .and_then(|slot| slot.remove_volatile(kind))
                    .is_some();
                if removed && ctx.state.active_battler(target).is_some() {
                    let name = ctx.state.name_at(target);
                    ctx.bus.push(BattleEvent::VolatileRemoved { target, name, kind });
                }
                Ok(Vec::new())
            }

            BattleAction::StatStage {
                target,
                stat,
                delta,
                source,
            } => execute_stat_stage(target, stat, delta, source, ctx),

            BattleAction::Faint { target, by } => execute_faint(target, by, ctx),

            BattleAction::SetWeather {
                weather,
                turns,
                source,
            } => execute_set_weather(weather, turns, source, ctx),
            BattleAction::SetTerrain {
                terrain,
                turns,
                source,
            } => execute_set_terrain(terrain, turns, source, ctx),
            BattleAction::AddSideCondition { side, condition } => {
                execute_add_side_condition(side, condition, ctx)
            }
            BattleAction::RemoveSideCondition { side, condition } => {
                if ctx.state.side_mut(side).conditions.remove(&condition).is_some() {
                    ctx.bus.push(BattleEvent::SideConditionEnded { side, condition });
                }
                Ok(Vec::new())
            }

            BattleAction::ConsumeItem { target } => {
                if let Some(creature) = ctx.state.creature_at_mut(target) {
                    if let Some(item) = creature.consume_item() {
                        let name = creature.name.clone();
                        ctx.bus.push(BattleEvent::ItemConsumed {
                            slot: target,
                            name,
                            item,
                        });
                    }
                }
                Ok(Vec::new())
            }
            BattleAction::ChangeType { target, types } => execute_change_type(target, types, ctx),

            BattleAction::Recoil { target, percent } => Ok(share_of_last_hit(target, percent, ctx)
                .map(|amount| BattleAction::Damage {
                    target,
                    amount,
                    source: DamageSource::Recoil,
                })
                .into_iter()
                .collect()),
            BattleAction::Drain { target, percent } => Ok(share_of_last_hit(target, percent, ctx)
                .map(|amount| BattleAction::Heal { target, amount })
                .into_iter()
                .collect()),

            BattleAction::Message(event) => {
                ctx.bus.push(event);
                Ok(Vec::new())
            }
            BattleAction::Trigger(trigger) => Ok(triggers::process(&trigger, ctx.state, ctx.catalog)),
            BattleAction::Chance {
                percent,
                reason,
                actions,
            } => {
                if ctx.rng.roll_percent(percent, reason) {
                    Ok(actions)
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }
}

fn execute_forfeit(side: SideId, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.is_finished() {
        return Ok(Vec::new());
    }
    let outcome = match side {
        SideId::Player => BattleOutcome::Defeat,
        SideId::Enemy => BattleOutcome::Victory,
    };
    ctx.bus.push(BattleEvent::SideForfeited { side });
    ctx.state.game_state = GameState::Finished(outcome);
    ctx.bus.push(BattleEvent::BattleEnded { outcome });
    Ok(Vec::new())
}

/// Passing is not a move, so it breaks a Protect chain.
fn execute_pass(slot: SlotRef, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    if let Some(battle_slot) = ctx.state.slot_mut(slot) {
        battle_slot.protect_streak = 0;
    }
    Ok(Vec::new())
}

fn execute_switch(slot: SlotRef, party_index: usize, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.slot(slot).is_none() {
        return Err(BattleStateError::InvalidSlot(slot).into());
    }
    let side = ctx.state.side(slot.side);
    let incoming = side
        .party
        .get(party_index)
        .ok_or(BattleStateError::InvalidPartyIndex {
            side: slot.side,
            index: party_index,
        })?;
    if !incoming.can_battle() || side.is_active(party_index) {
        // Another slot on the same side may already have sent it in this turn
        tracing::warn!(%slot, party_index, "switch target unavailable, skipping");
        return Ok(Vec::new());
    }
    let (incoming_name, species) = (incoming.name.clone(), incoming.species);

    if let Some(outgoing) = ctx.state.active_battler(slot) {
        let name = outgoing.name.clone();
        ctx.bus.push(BattleEvent::CreatureWithdrawn { slot, name });
    }
    if let Some(outgoing) = ctx.state.creature_at_mut(slot) {
        if let Some(StatusCondition::BadlyPoisoned(_)) = outgoing.status {
            outgoing.status = Some(StatusCondition::BadlyPoisoned(1));
        }
    }

    let battle_slot = ctx
        .state
        .slot_mut(slot)
        .ok_or(BattleStateError::InvalidSlot(slot))?;
    battle_slot.reset_for_switch();
    battle_slot.active = Some(party_index);

    ctx.bus.push(BattleEvent::CreatureSwitchedIn {
        slot,
        name: incoming_name,
        species,
    });
    Ok(vec![BattleAction::Trigger(Trigger::SwitchIn { slot })])
}

fn execute_damage(
    target: SlotRef,
    amount: u16,
    source: DamageSource,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    let Some(creature) = ctx.state.active_battler(target) else {
        return Ok(Vec::new());
    };
    if amount == 0 {
        return Ok(Vec::new());
    }
    let previous_hp = creature.current_hp();

    // --- Step 1: Lethal damage may be intercepted ---
    if amount >= previous_hp {
        let trigger = Trigger::WouldFaint {
            target,
            damage: amount as u32,
            source: source.clone(),
        };
        let interception = triggers::process_first(&trigger, ctx.state, ctx.catalog);
        if !interception.is_empty() {
            return Ok(interception);
        }
    }

    // --- Step 2: Commit HP loss ---
    let creature = ctx
        .state
        .creature_at_mut(target)
        .ok_or(BattleStateError::NoActiveCreature(target))?;
    let dealt = creature.take_damage(amount);
    let remaining_hp = creature.current_hp();
    let max_hp = creature.max_hp();
    let name = creature.name.clone();

    // --- Step 3: Per-turn trackers ---
    let attacker = source.attacker().filter(|attacker| *attacker != target);
    if let (Some(attacker), DamageSource::Move { category, .. }) = (attacker, &source) {
        if let Some(slot) = ctx.state.slot_mut(target) {
            match category {
                MoveCategory::Physical => {
                    slot.damage_taken.physical = slot.damage_taken.physical.saturating_add(dealt)
                }
                MoveCategory::Special => {
                    slot.damage_taken.special = slot.damage_taken.special.saturating_add(dealt)
                }
                MoveCategory::Status => {}
            }
            slot.damage_taken.last_attacker = Some(attacker);
        }
        if let Some(slot) = ctx.state.slot_mut(attacker) {
            slot.damage_dealt_this_move = slot.damage_dealt_this_move.saturating_add(dealt);
            slot.last_hit_damage = dealt;
        }
    }

    ctx.bus.push(BattleEvent::DamageDealt {
        target,
        name,
        damage: dealt,
        remaining_hp,
        max_hp,
        source: source.clone(),
    });

    // --- Step 4: Reactions ---
    let mut reactions = Vec::new();
    if remaining_hp == 0 {
        reactions.push(BattleAction::Faint {
            target,
            by: source.attacker(),
        });
        if let Some(attacker) = attacker {
            reactions.push(BattleAction::Trigger(Trigger::DamageDealt {
                attacker,
                target,
                amount: dealt,
            }));
        }
        return Ok(reactions);
    }

    reactions.push(BattleAction::Trigger(Trigger::DamageTaken {
        target,
        amount: dealt,
        source: source.clone(),
    }));
    if let (
        Some(attacker),
        DamageSource::Move {
            contact: true, ..
        },
    ) = (attacker, &source)
    {
        reactions.push(BattleAction::Trigger(Trigger::ContactReceived {
            attacker,
            defender: target,
        }));
    }
    if let Some(attacker) = attacker {
        reactions.push(BattleAction::Trigger(Trigger::DamageDealt {
            attacker,
            target,
            amount: dealt,
        }));
    }
    if remaining_hp as u32 * 2 <= max_hp as u32 {
        reactions.push(BattleAction::Trigger(Trigger::LowHp { target, previous_hp }));
    }
    Ok(reactions)
}

fn execute_heal(target: SlotRef, amount: u16, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(target).is_none() {
        return Ok(Vec::new());
    }
    let creature = ctx
        .state
        .creature_at_mut(target)
        .ok_or(BattleStateError::NoActiveCreature(target))?;
    let gained = creature.heal(amount);
    if gained > 0 {
        let event = BattleEvent::CreatureHealed {
            target,
            name: creature.name.clone(),
            amount: gained,
            new_hp: creature.current_hp(),
            max_hp: creature.max_hp(),
        };
        ctx.bus.push(event);
    }
    Ok(Vec::new())
}

fn execute_apply_status(
    target: SlotRef,
    status: StatusCondition,
    source: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    let Some(creature) = ctx.state.active_battler(target) else {
        return Ok(Vec::new());
    };
    if creature.status.is_some() {
        return Ok(Vec::new());
    }
    let types = current_types(ctx.state, target);
    if status.immune_types().iter().any(|t| types.contains(t)) {
        return Ok(Vec::new());
    }

    let from_opponent = source.is_some_and(|s| s.side != target.side);
    if from_opponent && ctx.state.side(target.side).has_condition(SideCondition::Safeguard) {
        ctx.fail(target, ActionFailureReason::ProtectedBySafeguard);
        return Ok(Vec::new());
    }
    if is_grounded(ctx.state, target) {
        let blocked = match ctx.state.terrain.kind {
            Terrain::Misty => true,
            Terrain::Electric => matches!(status, StatusCondition::Sleep(_)),
            _ => false,
        };
        if blocked {
            ctx.fail(target, ActionFailureReason::ProtectedByTerrain);
            return Ok(Vec::new());
        }
    }

    let status = match status {
        StatusCondition::Sleep(0) => {
            let (lo, hi) = ctx.state.rules.sleep_turns;
            StatusCondition::Sleep(ctx.rng.range_inclusive(lo, hi, "sleep duration"))
        }
        StatusCondition::BadlyPoisoned(0) => StatusCondition::BadlyPoisoned(1),
        other => other,
    };

    let creature = ctx
        .state
        .creature_at_mut(target)
        .ok_or(BattleStateError::NoActiveCreature(target))?;
    creature.status = Some(status);
    let name = creature.name.clone();
    ctx.bus.push(BattleEvent::StatusApplied { target, name, status });
    Ok(Vec::new())
}

fn execute_cure_status(target: SlotRef, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    let Some(creature) = ctx.state.creature_at_mut(target).filter(|c| c.can_battle()) else {
        return Ok(Vec::new());
    };
    if let Some(status) = creature.status.take() {
        let name = creature.name.clone();
        ctx.bus.push(BattleEvent::StatusCured { target, name, status });
    }
    Ok(Vec::new())
}

fn execute_apply_volatile(
    target: SlotRef,
    status: VolatileStatus,
    source: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(target).is_none() {
        return Ok(Vec::new());
    }
    let kind = status.kind();
    if matches!(kind, VolatileKind::Confused | VolatileKind::Seeded) && ctx.state.has_volatile(target, kind) {
        return Ok(Vec::new());
    }

    if kind == VolatileKind::Confused && source.is_some_and(|s| s.side != target.side) {
        if ctx.state.terrain.is(Terrain::Misty) && is_grounded(ctx.state, target) {
            ctx.fail(target, ActionFailureReason::ProtectedByTerrain);
            return Ok(Vec::new());
        }
        if ctx.state.side(target.side).has_condition(SideCondition::Safeguard) {
            ctx.fail(target, ActionFailureReason::ProtectedBySafeguard);
            return Ok(Vec::new());
        }
    }

    let status = match status {
        VolatileStatus::Confused { turns_remaining: 0 } => {
            let (lo, hi) = ctx.state.rules.confusion_turns;
            VolatileStatus::Confused {
                turns_remaining: ctx.rng.range_inclusive(lo, hi, "confusion duration"),
            }
        }
        other => other,
    };

    let name = ctx.state.name_at(target);
    let slot = ctx
        .state
        .slot_mut(target)
        .ok_or(BattleStateError::InvalidSlot(target))?;
    slot.add_volatile(status);
    ctx.bus.push(BattleEvent::VolatileApplied { target, name, kind });
    Ok(Vec::new())
}

fn execute_stat_stage(
    target: SlotRef,
    stat: StatType,
    delta: i8,
    source: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(target).is_none() || delta == 0 {
        return Ok(Vec::new());
    }
    let name = ctx.state.name_at(target);

    let from_opponent = source.is_some_and(|s| s.side != target.side);
    if delta < 0 && from_opponent && ctx.state.side(target.side).has_condition(SideCondition::Mist) {
        ctx.fail(target, ActionFailureReason::ProtectedByMist);
        return Ok(Vec::new());
    }

    let slot = ctx
        .state
        .slot_mut(target)
        .ok_or(BattleStateError::InvalidSlot(target))?;
    let old_stage = slot.get_stat_stage(stat);
    let new_stage = old_stage.saturating_add(delta).clamp(-6, 6);
    if new_stage == old_stage {
        ctx.bus.push(BattleEvent::StatChangeBlocked {
            target,
            name,
            stat,
            rising: delta > 0,
        });
        return Ok(Vec::new());
    }
    slot.set_stat_stage(stat, new_stage);
    ctx.bus.push(BattleEvent::StatStageChanged {
        target,
        name,
        stat,
        old_stage,
        new_stage,
    });
    Ok(Vec::new())
}

fn execute_faint(target: SlotRef, by: Option<SlotRef>, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    let Some(creature) = ctx.state.creature_at_mut(target) else {
        return Ok(Vec::new());
    };
    if !creature.mark_fainted() {
        return Ok(Vec::new());
    }
    let name = creature.name.clone();
    if let Some(slot) = ctx.state.slot_mut(target) {
        slot.reset_for_switch();
    }
    ctx.bus.push(BattleEvent::CreatureFainted { target, name });
    Ok(vec![BattleAction::Trigger(Trigger::Faint { target, by })])
}

fn execute_set_weather(
    weather: Weather,
    turns: u8,
    source: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if weather == Weather::None {
        let previous = ctx.state.weather.kind;
        if previous == Weather::None {
            return Ok(Vec::new());
        }
        ctx.state.weather = WeatherState::default();
        ctx.bus.push(BattleEvent::WeatherEnded { weather: previous });
        return Ok(vec![BattleAction::Trigger(Trigger::WeatherChange { weather })]);
    }

    if ctx.state.weather.is(weather) {
        if let Some(source) = source {
            ctx.fail(source, ActionFailureReason::MoveFailed);
        }
        return Ok(Vec::new());
    }
    ctx.state.weather = WeatherState {
        kind: weather,
        turns_remaining: turns,
        source,
    };
    ctx.bus.push(BattleEvent::WeatherStarted { weather });
    Ok(vec![BattleAction::Trigger(Trigger::WeatherChange { weather })])
}

fn execute_set_terrain(
    terrain: Terrain,
    turns: u8,
    source: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if terrain == Terrain::None {
        let previous = ctx.state.terrain.kind;
        if previous != Terrain::None {
            ctx.state.terrain = TerrainState::default();
            ctx.bus.push(BattleEvent::TerrainEnded { terrain: previous });
        }
        return Ok(Vec::new());
    }

    if ctx.state.terrain.is(terrain) {
        if let Some(source) = source {
            ctx.fail(source, ActionFailureReason::MoveFailed);
        }
        return Ok(Vec::new());
    }
    ctx.state.terrain = TerrainState {
        kind: terrain,
        turns_remaining: turns,
        source,
    };
    ctx.bus.push(BattleEvent::TerrainStarted { terrain });
    Ok(Vec::new())
}

fn execute_add_side_condition(
    side: SideId,
    condition: SideCondition,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    let rules = &ctx.state.rules;
    let turns = match condition {
        SideCondition::Reflect | SideCondition::LightScreen => rules.screen_turns,
        SideCondition::Tailwind => rules.tailwind_turns,
        _ => rules.side_condition_turns,
    };

    let conditions = &mut ctx.state.side_mut(side).conditions;
    if condition.is_hazard() {
        let entry = conditions.entry(condition).or_insert(SideConditionState {
            turns_remaining: None,
            layers: 0,
        });
        if entry.layers >= condition.max_layers() {
            return Ok(Vec::new());
        }
        entry.layers += 1;
    } else {
        if conditions.contains_key(&condition) {
            return Ok(Vec::new());
        }
        conditions.insert(
            condition,
            SideConditionState {
                turns_remaining: Some(turns),
                layers: 1,
            },
        );
    }
    ctx.bus.push(BattleEvent::SideConditionStarted { side, condition });
    Ok(Vec::new())
}

fn execute_change_type(
    target: SlotRef,
    types: Vec<CreatureType>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(target).is_none() {
        return Ok(Vec::new());
    }
    let name = ctx.state.name_at(target);
    let slot = ctx
        .state
        .slot_mut(target)
        .ok_or(BattleStateError::InvalidSlot(target))?;
    slot.add_volatile(VolatileStatus::TypeChanged { types: types.clone() });
    ctx.bus.push(BattleEvent::TypeChanged { target, name, types });
    Ok(Vec::new())
}

/// `percent` of the damage the slot's last hit dealt, at least 1. None if nothing landed.
fn share_of_last_hit(target: SlotRef, percent: u8, ctx: &ExecutionContext) -> Option<u16> {
    ctx.state.active_battler(target)?;
    let last_hit = ctx.state.slot(target)?.last_hit_damage;
    if last_hit == 0 {
        return None;
    }
    Some(((last_hit as u32 * percent as u32) / 100).max(1) as u16)
}
