//! Resolution of a move from the moment it is chosen to its last hit.

use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::commands::ExecutionContext;
use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::damage::{build_context, compute, roll_critical, roll_variance};
use crate::battle::move_effects::{effects_for_hit, EffectContext};
use crate::battle::state::{ActionFailureReason, BattleEvent, TurnRng};
use crate::battle::stats::{current_types, hit_threshold, is_grounded};
use crate::battle::triggers::Trigger;
use crate::creature::StatusCondition;
use crate::errors::{BattleResult, BattleStateError};
use crate::side::SlotRef;
use schema::{CreatureType, Move, MoveData, MoveEffect, StatType, Terrain, Weather};

pub(crate) fn execute_use_move(
    slot: SlotRef,
    move_index: Option<usize>,
    move_used: Move,
    target: Option<SlotRef>,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(slot).is_none() {
        return Ok(Vec::new());
    }
    if let Some(battle_slot) = ctx.state.slot_mut(slot) {
        battle_slot.damage_dealt_this_move = 0;
        battle_slot.last_hit_damage = 0;
    }

    // --- Step 1: Conditions that stop the user from acting ---
    if let Some(reactions) = check_action_preventing_conditions(slot, ctx)? {
        if let Some(battle_slot) = ctx.state.slot_mut(slot) {
            battle_slot.remove_volatile(VolatileKind::Charging);
            battle_slot.remove_volatile(VolatileKind::SemiInvulnerable);
            battle_slot.protect_streak = 0;
        }
        return Ok(reactions);
    }

    // --- Step 2: PP ---
    let mut move_used = move_used;
    if let Some(index) = move_index {
        let creature = ctx
            .state
            .creature_at_mut(slot)
            .ok_or(BattleStateError::NoActiveCreature(slot))?;
        if !creature.use_pp(index) {
            tracing::debug!(%slot, index, "no PP left, struggling");
            move_used = Move::Struggle;
        }
    }
    let catalog = ctx.catalog;
    let data = catalog.move_data(move_used)?;

    if let Some(battle_slot) = ctx.state.slot_mut(slot) {
        battle_slot.last_move = Some(move_used);
        if !data.has_effect(&MoveEffect::Protect) {
            battle_slot.protect_streak = 0;
        }
    }

    let name = ctx.state.name_at(slot);
    ctx.bus.push(BattleEvent::MoveUsed {
        slot,
        name: name.clone(),
        move_used,
    });

    // --- Step 3: Focus Punch ---
    if data.has_effect(&MoveEffect::FocusPunch) {
        let hit_this_turn = match ctx.state.slot_mut(slot) {
            Some(battle_slot) => {
                battle_slot.remove_volatile(VolatileKind::Focusing);
                battle_slot.damage_taken.total() > 0
            }
            None => false,
        };
        if hit_this_turn {
            ctx.fail(slot, ActionFailureReason::LostFocus);
            return Ok(Vec::new());
        }
    }

    // --- Step 4: Targeting ---
    let defender = if data.has_effect(&MoveEffect::Counter) || data.has_effect(&MoveEffect::MirrorCoat) {
        let last_attacker = ctx
            .state
            .slot(slot)
            .and_then(|s| s.damage_taken.last_attacker)
            .filter(|attacker| ctx.state.active_battler(*attacker).is_some());
        match last_attacker {
            Some(attacker) => attacker,
            None => {
                ctx.fail(slot, ActionFailureReason::NothingToCounter);
                return Ok(Vec::new());
            }
        }
    } else if data.targets_opponent() {
        let chosen = target.filter(|t| *t != slot && ctx.state.active_battler(*t).is_some());
        // A fainted or empty target is replaced by the first opponent still standing
        match chosen.or_else(|| ctx.state.opponents_of(slot).first().copied()) {
            Some(defender) => defender,
            None => {
                ctx.fail(slot, ActionFailureReason::NoTarget);
                return Ok(Vec::new());
            }
        }
    } else {
        slot
    };

    // --- Step 5: Two-turn moves ---
    let sun_skips_charge = ctx.state.weather.is(Weather::Sun) && data.move_type == CreatureType::Grass;
    let charges = data.has_effect(&MoveEffect::ChargeUp) && !sun_skips_charge;
    let vanishes = data.has_effect(&MoveEffect::SemiInvulnerable);
    if charges || vanishes {
        let battle_slot = ctx
            .state
            .slot_mut(slot)
            .ok_or(BattleStateError::InvalidSlot(slot))?;
        if battle_slot.locked_move() == Some(move_used) {
            battle_slot.remove_volatile(VolatileKind::Charging);
            battle_slot.remove_volatile(VolatileKind::SemiInvulnerable);
        } else {
            battle_slot.add_volatile(if vanishes {
                VolatileStatus::SemiInvulnerable { move_: move_used }
            } else {
                VolatileStatus::Charging { move_: move_used }
            });
            ctx.bus.push(BattleEvent::ChargingMove { slot, name, move_used });
            return Ok(Vec::new());
        }
    }

    // --- Step 6: Protect ---
    if data.has_effect(&MoveEffect::Protect) {
        let streak = ctx.state.slot(slot).map(|s| s.protect_streak).unwrap_or(0);
        let succeeded = streak == 0 || ctx.rng.roll_percent(protect_chance(streak), "protect");
        if let Some(battle_slot) = ctx.state.slot_mut(slot) {
            battle_slot.protect_streak = streak.saturating_add(1);
        }
        if !succeeded {
            ctx.fail(slot, ActionFailureReason::ProtectFailed);
            return Ok(Vec::new());
        }
        return Ok(vec![
            BattleAction::Trigger(Trigger::BeforeMove { slot, move_used }),
            BattleAction::ApplyVolatile {
                target: slot,
                status: VolatileStatus::Protected,
                source: Some(slot),
            },
            BattleAction::Trigger(Trigger::AfterMove { slot, move_used }),
        ]);
    }

    // --- Step 7: Hits ---
    let hits = roll_hit_count(data, ctx.rng);
    let mut reactions = vec![BattleAction::Trigger(Trigger::BeforeMove { slot, move_used })];
    reactions.extend((0..hits).map(|hit_number| BattleAction::AttackHit {
        attacker: slot,
        defender,
        move_used,
        hit_number,
    }));
    reactions.push(BattleAction::Trigger(Trigger::AfterMove { slot, move_used }));
    Ok(reactions)
}

/// 100 / 3^streak percent, rounded down.
fn protect_chance(streak: u8) -> u8 {
    (100 / 3u32.saturating_pow(streak as u32)) as u8
}

/// One draw: 2 and 3 hits at 35% each, 4 and 5 hits at 15% each.
fn roll_hit_count(data: &MoveData, rng: &mut TurnRng) -> u8 {
    let (min, max) = data.hit_range();
    if min >= max {
        return min.max(1);
    }
    let hits = match rng.next_outcome("multi-hit count") {
        0..=35 => 2,
        36..=70 => 3,
        71..=85 => 4,
        _ => 5,
    };
    hits.clamp(min, max)
}

/// Returns Some(reactions) if the user cannot act this turn.
fn check_action_preventing_conditions(
    slot: SlotRef,
    ctx: &mut ExecutionContext,
) -> BattleResult<Option<Vec<BattleAction>>> {
    let creature = ctx.state.require_battler(slot)?;
    let status = creature.status;

    if ctx.state.has_volatile(slot, VolatileKind::Flinched) {
        ctx.fail(slot, ActionFailureReason::IsFlinching);
        return Ok(Some(Vec::new()));
    }

    match status {
        Some(StatusCondition::Sleep(turns)) if turns > 0 => {
            if let Some(creature) = ctx.state.creature_at_mut(slot) {
                creature.status = Some(StatusCondition::Sleep(turns - 1));
            }
            ctx.fail(slot, ActionFailureReason::IsAsleep);
            return Ok(Some(Vec::new()));
        }
        Some(StatusCondition::Sleep(_)) => {
            // Wakes up and acts this turn
            if let Some(creature) = ctx.state.creature_at_mut(slot) {
                creature.status = None;
            }
            let name = ctx.state.name_at(slot);
            ctx.bus.push(BattleEvent::StatusCured {
                target: slot,
                name,
                status: StatusCondition::Sleep(0),
            });
        }
        Some(StatusCondition::Freeze) => {
            ctx.fail(slot, ActionFailureReason::IsFrozen);
            return Ok(Some(Vec::new()));
        }
        Some(StatusCondition::Paralysis) => {
            let chance = ctx.state.rules.full_paralysis_chance;
            if ctx.rng.roll_percent(chance, "full paralysis") {
                ctx.fail(slot, ActionFailureReason::IsParalyzed);
                return Ok(Some(Vec::new()));
            }
        }
        _ => {}
    }

    let confusion = ctx
        .state
        .slot(slot)
        .and_then(|s| s.volatile(VolatileKind::Confused))
        .cloned();
    if let Some(VolatileStatus::Confused { turns_remaining }) = confusion {
        if turns_remaining == 0 {
            if let Some(battle_slot) = ctx.state.slot_mut(slot) {
                battle_slot.remove_volatile(VolatileKind::Confused);
            }
            let name = ctx.state.name_at(slot);
            ctx.bus.push(BattleEvent::VolatileRemoved {
                target: slot,
                name,
                kind: VolatileKind::Confused,
            });
        } else {
            if let Some(battle_slot) = ctx.state.slot_mut(slot) {
                battle_slot.add_volatile(VolatileStatus::Confused {
                    turns_remaining: turns_remaining - 1,
                });
            }
            let chance = ctx.state.rules.confusion_self_hit_chance;
            if ctx.rng.roll_percent(chance, "confusion self-hit") {
                ctx.fail(slot, ActionFailureReason::HurtItself);
                return Ok(Some(vec![BattleAction::AttackHit {
                    attacker: slot,
                    defender: slot,
                    move_used: Move::HittingItself,
                    hit_number: 0,
                }]));
            }
        }
    }

    Ok(None)
}

/// The forced idle turn after a recharge move.
pub(crate) fn execute_recharge(slot: SlotRef, ctx: &mut ExecutionContext) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(slot).is_none() {
        return Ok(Vec::new());
    }
    if let Some(battle_slot) = ctx.state.slot_mut(slot) {
        battle_slot.remove_volatile(VolatileKind::MustRecharge);
        battle_slot.protect_streak = 0;
    }
    ctx.fail(slot, ActionFailureReason::MustRecharge);
    Ok(Vec::new())
}

pub(crate) fn execute_attack_hit(
    attacker: SlotRef,
    defender: SlotRef,
    move_used: Move,
    hit_number: u8,
    ctx: &mut ExecutionContext,
) -> BattleResult<Vec<BattleAction>> {
    if ctx.state.active_battler(attacker).is_none() || ctx.state.active_battler(defender).is_none() {
        return Ok(Vec::new());
    }
    // Later hits of a multi-hit move only follow a hit that landed
    if hit_number > 0 && ctx.state.slot(attacker).map(|s| s.damage_dealt_this_move).unwrap_or(0) == 0 {
        return Ok(Vec::new());
    }

    let catalog = ctx.catalog;
    let data = catalog.move_data(move_used)?;
    let self_hit = attacker == defender;
    let defender_name = ctx.state.name_at(defender);

    // --- Step 1: Protect ---
    let action = BattleAction::AttackHit {
        attacker,
        defender,
        move_used,
        hit_number,
    };
    if action.blockable_by_protect(catalog) && ctx.state.has_volatile(defender, VolatileKind::Protected) {
        ctx.bus.push(BattleEvent::ProtectedFromMove {
            target: defender,
            name: defender_name,
        });
        return Ok(Vec::new());
    }

    // --- Step 2: Semi-invulnerable targets ---
    if !self_hit && ctx.state.has_volatile(defender, VolatileKind::SemiInvulnerable) {
        let name = ctx.state.name_at(attacker);
        ctx.bus.push(BattleEvent::MoveMissed { attacker, name });
        return Ok(Vec::new());
    }

    // --- Step 3: Psychic Terrain blocks priority moves ---
    if ctx.state.terrain.is(Terrain::Psychic)
        && data.priority() > 0
        && attacker.side != defender.side
        && is_grounded(ctx.state, defender)
    {
        ctx.fail(defender, ActionFailureReason::ProtectedByTerrain);
        return Ok(Vec::new());
    }

    // --- Step 4: Accuracy ---
    if hit_number == 0 && !self_hit {
        if let Some(accuracy) = data.accuracy {
            let evasion = ctx
                .state
                .slot(defender)
                .map(|s| s.get_stat_stage(StatType::Evasion))
                .unwrap_or(0);
            let roll = ctx.rng.next_outcome("accuracy") as u16;
            if roll > hit_threshold(accuracy, evasion) {
                let name = ctx.state.name_at(attacker);
                ctx.bus.push(BattleEvent::MoveMissed { attacker, name });
                return Ok(Vec::new());
            }
        }
    }

    let mut reactions = Vec::new();

    if data.is_damaging() {
        // --- Step 5: Immunity ---
        let effectiveness = if self_hit {
            1.0
        } else {
            CreatureType::effectiveness_against(data.move_type, &current_types(ctx.state, defender))
        };
        let ground_immune = data.move_type == CreatureType::Ground && !is_grounded(ctx.state, defender);
        if effectiveness == 0.0 || ground_immune {
            ctx.fail(defender, ActionFailureReason::Immune);
            return Ok(Vec::new());
        }

        // --- Step 6: Damage ---
        let Some(damage) = hit_damage(attacker, defender, move_used, data, self_hit, ctx)? else {
            ctx.fail(attacker, ActionFailureReason::NothingToCounter);
            return Ok(Vec::new());
        };
        if hit_number == 0 && !self_hit {
            ctx.bus.push(BattleEvent::AttackTypeEffectiveness {
                target: defender,
                multiplier: effectiveness,
            });
        }
        reactions.push(BattleAction::Damage {
            target: defender,
            amount: damage.min(u16::MAX as u32) as u16,
            source: DamageSource::Move {
                attacker,
                move_used,
                move_type: data.move_type,
                category: data.category,
                contact: data.makes_contact,
                effectiveness,
            },
        });
    }

    // --- Step 7: Secondary effects ---
    let context = EffectContext::new(attacker, defender, move_used, data, hit_number);
    reactions.extend(effects_for_hit(data, &context, ctx.state));
    Ok(reactions)
}

/// Damage for one hit. None when a counter move has nothing to return.
fn hit_damage(
    attacker: SlotRef,
    defender: SlotRef,
    move_used: Move,
    data: &MoveData,
    self_hit: bool,
    ctx: &mut ExecutionContext,
) -> BattleResult<Option<u32>> {
    let taken = ctx
        .state
        .slot(attacker)
        .map(|s| s.damage_taken.clone())
        .unwrap_or_default();
    for effect in &data.effects {
        match effect {
            MoveEffect::FixedDamage(amount) => return Ok(Some(*amount as u32)),
            MoveEffect::LevelDamage => {
                let level = ctx.state.require_battler(attacker)?.level;
                return Ok(Some(level as u32));
            }
            MoveEffect::Counter => {
                return Ok(Some(taken.physical as u32 * 2).filter(|d| *d > 0));
            }
            MoveEffect::MirrorCoat => {
                return Ok(Some(taken.special as u32 * 2).filter(|d| *d > 0));
            }
            _ => {}
        }
    }

    let critical = !self_hit && roll_critical(ctx.catalog, move_used, ctx.rng)?;
    let variance = roll_variance(ctx.rng);
    let damage_context = build_context(ctx.state, ctx.catalog, attacker, defender, move_used, critical, variance)?;
    if critical {
        ctx.bus.push(BattleEvent::CriticalHit { target: defender });
    }
    Ok(Some(compute(&damage_context)))
}
