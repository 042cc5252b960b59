use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::state::BattleState;
use crate::creature::StatusCondition;
use crate::side::SlotRef;
use schema::{Ability, CreatureType, HeldItem, MoveCategory, SideCondition, StatType, Weather};

/// Apply a stat stage multiplier: +s gives (2+s)/2, -s gives 2/(2+s).
pub fn apply_stat_stage(stat: u16, stage: i8) -> u16 {
    let stage = stage.clamp(-6, 6) as i32;
    let stat = stat as i32;
    let value = if stage >= 0 {
        stat * (2 + stage) / 2
    } else {
        stat * 2 / (2 - stage)
    };
    value as u16
}

/// Types of the slot's occupant, honoring any in-battle type change.
pub fn current_types(state: &BattleState, slot: SlotRef) -> Vec<CreatureType> {
    if let Some(VolatileStatus::TypeChanged { types }) = state
        .slot(slot)
        .and_then(|s| s.volatile(VolatileKind::TypeChanged))
    {
        return types.clone();
    }
    state
        .creature_at(slot)
        .map(|creature| creature.types.clone())
        .unwrap_or_default()
}

pub fn has_type(state: &BattleState, slot: SlotRef, creature_type: CreatureType) -> bool {
    current_types(state, slot).contains(&creature_type)
}

pub fn ability_at(state: &BattleState, slot: SlotRef) -> Option<Ability> {
    state.active_battler(slot).and_then(|creature| creature.ability)
}

pub fn item_at(state: &BattleState, slot: SlotRef) -> Option<HeldItem> {
    state.active_battler(slot).and_then(|creature| creature.item())
}

/// Grounded creatures are touched by terrain, Spikes and Ground moves.
pub fn is_grounded(state: &BattleState, slot: SlotRef) -> bool {
    if item_at(state, slot) == Some(HeldItem::IronBall) {
        return true;
    }
    if state.has_volatile(slot, VolatileKind::SemiInvulnerable) {
        return false;
    }
    !has_type(state, slot, CreatureType::Flying) && ability_at(state, slot) != Some(Ability::Levitate)
}

/// Speed after stage, paralysis, weather abilities, Tailwind and held items, in that order.
pub fn effective_speed(state: &BattleState, slot: SlotRef) -> u32 {
    let Some(creature) = state.active_battler(slot) else {
        return 0;
    };
    let stage = state
        .slot(slot)
        .map(|s| s.get_stat_stage(StatType::Speed))
        .unwrap_or(0);
    let mut speed = apply_stat_stage(creature.stats.speed, stage) as u32;

    if creature.status == Some(StatusCondition::Paralysis) {
        speed /= 2;
    }

    let weather_doubles = match creature.ability {
        Some(Ability::SwiftSwim) => state.weather.is(Weather::Rain),
        Some(Ability::Chlorophyll) => state.weather.is(Weather::Sun),
        Some(Ability::SandRush) => state.weather.is(Weather::Sandstorm),
        _ => false,
    };
    if weather_doubles {
        speed *= 2;
    }

    if state.side(slot.side).has_condition(SideCondition::Tailwind) {
        speed *= 2;
    }

    match creature.item() {
        Some(HeldItem::ChoiceScarf) => speed * 3 / 2,
        Some(HeldItem::IronBall) => speed / 2,
        _ => speed,
    }
}

/// Attacking stat for the move's category, with stages applied.
pub fn effective_attack(state: &BattleState, slot: SlotRef, category: MoveCategory) -> u16 {
    let Some(creature) = state.creature_at(slot) else {
        return 0;
    };
    let (base, stat) = match category {
        MoveCategory::Physical => (creature.stats.attack, StatType::Attack),
        MoveCategory::Special => (creature.stats.sp_attack, StatType::SpecialAttack),
        MoveCategory::Status => return 0,
    };
    let stage = state.slot(slot).map(|s| s.get_stat_stage(stat)).unwrap_or(0);
    apply_stat_stage(base, stage)
}

/// Defending stat for the move's category, with stages and the sandstorm boost to Rock types.
pub fn effective_defense(state: &BattleState, slot: SlotRef, category: MoveCategory) -> u16 {
    let Some(creature) = state.creature_at(slot) else {
        return 0;
    };
    let (base, stat) = match category {
        MoveCategory::Physical => (creature.stats.defense, StatType::Defense),
        MoveCategory::Special => (creature.stats.sp_defense, StatType::SpecialDefense),
        MoveCategory::Status => return 0,
    };
    let stage = state.slot(slot).map(|s| s.get_stat_stage(stat)).unwrap_or(0);
    let defense = apply_stat_stage(base, stage);

    if category == MoveCategory::Special
        && state.weather.is(Weather::Sandstorm)
        && has_type(state, slot, CreatureType::Rock)
    {
        return defense.saturating_mul(3) / 2;
    }
    defense
}

/// Hit threshold (compared against a 1..=100 roll) after the defender's evasion stage.
pub fn hit_threshold(accuracy: u8, evasion_stage: i8) -> u16 {
    let accuracy = accuracy as u16;
    let stage = evasion_stage.clamp(-6, 6);
    if stage >= 0 {
        accuracy * 3 / (3 + stage as u16)
    } else {
        accuracy * (3 + stage.unsigned_abs() as u16) / 3
    }
}

/// Percent chance of a critical hit at the given stage.
pub fn crit_chance(stage: u8) -> u8 {
    match stage {
        0 => 4,
        1 => 13,
        2 => 50,
        _ => 100,
    }
}
