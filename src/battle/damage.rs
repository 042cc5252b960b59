//! Damage calculation.
//!
//! `build_context` snapshots everything the formula needs from the field into a
//! `DamageContext`; `compute` is a pure function of that snapshot. The unclamped figure
//! is what lethal-damage interception sees.

use crate::battle::conditions::VolatileKind;
use crate::battle::state::{BattleState, TurnRng};
use crate::battle::stats::{
    crit_chance, current_types, effective_attack, effective_defense, is_grounded,
};
use crate::catalog::Catalog;
use crate::creature::StatusCondition;
use crate::errors::{BattleResult, BattleStateError};
use crate::side::SlotRef;
use schema::{
    CreatureType, HeldItem, Move, MoveCategory, MoveEffect, SideCondition, Terrain, Weather,
};

/// One named multiplier in the final stage of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageModifier {
    pub name: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageContext {
    pub attacker: SlotRef,
    pub defender: SlotRef,
    pub move_used: Move,
    pub move_type: CreatureType,
    pub category: MoveCategory,
    pub base_power: i32,
    pub attack: u16,
    pub defense: u16,
    pub level: u8,
    pub stab: bool,
    pub effectiveness: f64,
    pub critical: bool,
    /// Percentage in 85..=100.
    pub variance: u8,
    pub modifiers: Vec<DamageModifier>,
}

impl DamageContext {
    pub fn add_modifier(&mut self, name: &'static str, multiplier: f64) {
        self.modifiers.push(DamageModifier { name, multiplier });
    }

    pub fn modifier_product(&self) -> f64 {
        self.modifiers.iter().map(|m| m.multiplier).product()
    }

    /// Damage before it is limited by the defender's remaining HP.
    pub fn final_damage(&self) -> u32 {
        compute(self)
    }

    /// Damage limited to what the defender can actually lose.
    pub fn clamped_damage(&self, defender_hp: u16) -> u16 {
        self.final_damage().min(defender_hp as u32) as u16
    }
}

/// The damage formula. Each step floors; modifiers compose by multiplication.
pub fn compute(context: &DamageContext) -> u32 {
    let power = context.base_power.max(0) as u64;
    if power == 0 || context.effectiveness <= 0.0 {
        return 0;
    }
    let attack = context.attack.max(1) as u64;
    let defense = context.defense.max(1) as u64;

    // --- Step 1: Base damage ---
    let level_term = 2 * context.level as u64 / 5 + 2;
    let mut damage = (level_term * power * attack / defense) / 50 + 2;

    // --- Step 2: STAB ---
    if context.stab {
        damage = damage * 3 / 2;
    }

    // --- Step 3: Type effectiveness ---
    damage = (damage as f64 * context.effectiveness).floor() as u64;

    // --- Step 4: Critical hit ---
    if context.critical {
        damage = damage * 3 / 2;
    }

    // --- Step 5: Random variance ---
    damage = damage * context.variance as u64 / 100;

    // --- Step 6: Field, ability, item and status modifiers ---
    damage = (damage as f64 * context.modifier_product()).floor() as u64;

    damage.max(1) as u32
}

/// Rolls for a critical hit. High-crit moves start one stage up.
pub fn roll_critical(catalog: &Catalog, move_used: Move, rng: &mut TurnRng) -> BattleResult<bool> {
    let data = catalog.move_data(move_used)?;
    let stage = if data.has_effect(&MoveEffect::HighCrit) { 1 } else { 0 };
    Ok(rng.roll_percent(crit_chance(stage), "critical hit"))
}

pub fn roll_variance(rng: &mut TurnRng) -> u8 {
    rng.range_inclusive(85, 100, "damage variance")
}

pub fn build_context(
    state: &BattleState,
    catalog: &Catalog,
    attacker: SlotRef,
    defender: SlotRef,
    move_used: Move,
    critical: bool,
    variance: u8,
) -> BattleResult<DamageContext> {
    let data = catalog.move_data(move_used)?;
    let attacker_creature = state
        .creature_at(attacker)
        .ok_or(BattleStateError::NoActiveCreature(attacker))?;
    let defender_creature = state
        .creature_at(defender)
        .ok_or(BattleStateError::NoActiveCreature(defender))?;

    let move_type = data.move_type;
    let mut base_power = data.power.unwrap_or(0) as i32;
    if data.has_effect(&MoveEffect::Pursuit) && state.has_volatile(defender, VolatileKind::SwitchingOut) {
        base_power *= 2;
    }

    let attacker_types = current_types(state, attacker);
    let defender_types = current_types(state, defender);

    let mut context = DamageContext {
        attacker,
        defender,
        move_used,
        move_type,
        category: data.category,
        base_power,
        attack: effective_attack(state, attacker, data.category),
        defense: effective_defense(state, defender, data.category),
        level: attacker_creature.level,
        stab: move_type != CreatureType::Typeless && attacker_types.contains(&move_type),
        effectiveness: CreatureType::effectiveness_against(move_type, &defender_types),
        critical,
        variance,
        modifiers: Vec::new(),
    };

    // Weather
    match (state.weather.kind, move_type) {
        (Weather::Sun, CreatureType::Fire) | (Weather::Rain, CreatureType::Water) => {
            context.add_modifier("weather", 1.5)
        }
        (Weather::Sun, CreatureType::Water) | (Weather::Rain, CreatureType::Fire) => {
            context.add_modifier("weather", 0.5)
        }
        _ => {}
    }

    // Terrain
    let boosted_by_terrain = match state.terrain.kind {
        Terrain::Electric => move_type == CreatureType::Electric,
        Terrain::Grassy => move_type == CreatureType::Grass,
        Terrain::Psychic => move_type == CreatureType::Psychic,
        _ => false,
    };
    if boosted_by_terrain && is_grounded(state, attacker) {
        context.add_modifier("terrain", 1.3);
    }
    if state.terrain.is(Terrain::Misty) && move_type == CreatureType::Dragon && is_grounded(state, defender) {
        context.add_modifier("terrain", 0.5);
    }
    if state.terrain.is(Terrain::Grassy) && move_used == Move::Earthquake && is_grounded(state, defender) {
        context.add_modifier("terrain", 0.5);
    }

    // Screens
    if !critical && attacker.side != defender.side {
        let screen = match data.category {
            MoveCategory::Physical => SideCondition::Reflect,
            _ => SideCondition::LightScreen,
        };
        if state.side(defender.side).has_condition(screen) {
            let multiplier = if state.rules.format.active_slots() > 1 {
                2.0 / 3.0
            } else {
                0.5
            };
            context.add_modifier("screen", multiplier);
        }
    }

    // Abilities
    if let Some(pinch_type) = attacker_creature.ability.and_then(|a| a.pinch_type()) {
        let at_pinch = attacker_creature.current_hp() as u32 * 3 <= attacker_creature.max_hp() as u32;
        if pinch_type == move_type && at_pinch {
            context.add_modifier("pinch ability", 1.5);
        }
    }

    // Items
    match attacker_creature.item() {
        Some(HeldItem::LifeOrb) => context.add_modifier("life orb", 1.3),
        Some(item) if item.boosted_type() == Some(move_type) => {
            context.add_modifier("type item", 1.2)
        }
        _ => {}
    }

    // Burn
    if attacker_creature.status == Some(StatusCondition::Burn) && data.category == MoveCategory::Physical {
        context.add_modifier("burn", 0.5);
    }

    tracing::trace!(
        move_used = ?move_used,
        defender = defender_creature.name.as_str(),
        base_power,
        effectiveness = context.effectiveness,
        modifiers = context.modifiers.len(),
        "built damage context"
    );
    Ok(context)
}
