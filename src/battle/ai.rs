//! Built-in action providers.

use crate::battle::engine::{valid_actions, ActionProvider};
use crate::battle::state::BattleState;
use crate::battle::stats::{current_types, effective_attack};
use crate::catalog::Catalog;
use crate::errors::BattleResult;
use crate::side::{PlayerAction, SlotRef};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{CreatureType, MoveCategory, MoveEffect, Target};
use std::collections::VecDeque;

/// Scores every legal action and picks the best one.
pub struct ScoringAI {
    catalog: &'static Catalog,
    rng: StdRng,
}

impl ScoringAI {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::standard(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Same choices for the same seed and battle.
    pub fn seeded(seed: u64) -> Self {
        Self {
            catalog: Catalog::standard(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn score_action(&mut self, action: &PlayerAction, slot: SlotRef, state: &BattleState) -> f32 {
        match action {
            PlayerAction::UseMove { move_index, .. } => {
                self.score_move(*move_index, slot, state).unwrap_or(0.0)
            }
            PlayerAction::Switch { .. } => self.score_switch(),
            PlayerAction::Pass => -500.0,
            // Never chosen unless it is the only option
            PlayerAction::Forfeit => -1000.0,
        }
    }

    fn score_move(&mut self, move_index: usize, slot: SlotRef, state: &BattleState) -> BattleResult<f32> {
        let attacker = state.require_battler(slot)?;
        let Some(defender_slot) = state.opponents_of(slot).first().copied() else {
            return Ok(0.0);
        };
        let defender = state.require_battler(defender_slot)?;
        let Some(instance) = attacker.moves.get(move_index).and_then(|m| m.as_ref()) else {
            // Struggle
            return Ok(1.0);
        };
        let data = self.catalog.move_data(instance.move_)?;

        // --- Step 1: Damage score ---
        let mut damage_score = 0.0;
        if data.is_damaging() {
            let base_power = data.power.unwrap_or(0) as f32;
            let effectiveness = CreatureType::effectiveness_against(
                data.move_type,
                &current_types(state, defender_slot),
            ) as f32;
            if effectiveness < 0.1 {
                return Ok(-1.0);
            }
            let stab = if current_types(state, slot).contains(&data.move_type) {
                1.5
            } else {
                1.0
            };
            let level_scalar = (attacker.level as f32 * 2.0).max(1.0);
            let normalized_power = effective_attack(state, slot, data.category) as f32 / level_scalar;
            // Fixed-damage moves have no listed power
            let power = if base_power > 0.0 { base_power } else { 40.0 };
            damage_score = power * effectiveness * stab * normalized_power;
        }

        // --- Step 2: Utility score ---
        let own_slot = state.slot(slot);
        let their_slot = state.slot(defender_slot);
        let mut utility_score = 0.0;
        for effect in &data.effects {
            match effect {
                MoveEffect::StatChange(Target::User, stat, stages, chance) if *stages > 0 => {
                    let current = own_slot.map(|s| s.get_stat_stage(*stat)).unwrap_or(0);
                    if current < 6 {
                        let potential_gain = 1.0 - (current as f32 / 6.0);
                        utility_score += 20.0 * (*stages as f32) * potential_gain * (*chance as f32 / 100.0);
                    }
                }
                MoveEffect::StatChange(Target::Target, stat, stages, chance) if *stages < 0 => {
                    let current = their_slot.map(|s| s.get_stat_stage(*stat)).unwrap_or(0);
                    if current > -6 {
                        utility_score += 15.0 * (stages.abs() as f32) * (*chance as f32 / 100.0);
                    }
                }
                MoveEffect::Sleep(chance)
                | MoveEffect::Paralyze(chance)
                | MoveEffect::Poison(chance)
                | MoveEffect::BadlyPoison(chance)
                | MoveEffect::Burn(chance)
                | MoveEffect::Freeze(chance) => {
                    if defender.status.is_none() {
                        utility_score += 45.0 * (*chance as f32 / 100.0);
                    }
                }
                MoveEffect::Flinch(chance) | MoveEffect::Confuse(chance) => {
                    utility_score += 30.0 * (*chance as f32 / 100.0);
                }
                MoveEffect::Heal(percent) => {
                    let missing = 100 - attacker.hp_percent().min(100);
                    utility_score += missing.min(*percent as u16) as f32;
                }
                MoveEffect::Protect => {
                    let streak = own_slot.map(|s| s.protect_streak).unwrap_or(0);
                    if streak == 0 {
                        utility_score += 5.0;
                    }
                }
                MoveEffect::SetWeather(weather) => {
                    if !state.weather.is(*weather) {
                        utility_score += 10.0;
                    }
                }
                MoveEffect::SetTerrain(terrain) => {
                    if !state.terrain.is(*terrain) {
                        utility_score += 10.0;
                    }
                }
                MoveEffect::SetSideCondition(_) | MoveEffect::LeechSeed => utility_score += 10.0,
                _ => {}
            }
        }

        // --- Step 3: Combine ---
        let mut final_score = damage_score + utility_score;
        if data.category == MoveCategory::Status && utility_score < 1.0 {
            return Ok(-1.0);
        }
        if data.category != MoveCategory::Status {
            let accuracy = data.accuracy.unwrap_or(101);
            final_score *= accuracy as f32 / 100.0;
        }

        // +/- 5% to avoid repeating the same line forever
        final_score *= 1.0 + (self.rng.random::<f32>() * 0.1 - 0.05);
        Ok(final_score)
    }

    fn score_switch(&mut self) -> f32 {
        1.0 + self.rng.random::<f32>() * 0.1
    }
}

impl Default for ScoringAI {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionProvider for ScoringAI {
    fn choose_action(&mut self, state: &BattleState, slot: SlotRef) -> PlayerAction {
        let best = valid_actions(state, slot)
            .into_iter()
            .map(|action| {
                let score = self.score_action(&action, slot, state);
                (action, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score));
        match best {
            Some((action, score)) => {
                tracing::debug!(%slot, ?action, score, "ai chose action");
                action
            }
            None => PlayerAction::Pass,
        }
    }

    /// Sends in the healthiest creature left.
    fn choose_replacement(&mut self, state: &BattleState, slot: SlotRef) -> Option<usize> {
        let side = state.side(slot.side);
        side.available_switches()
            .into_iter()
            .max_by_key(|index| side.party.get(*index).map(|c| c.hp_percent()).unwrap_or(0))
    }
}

/// Plays back a fixed list of choices, then passes.
#[derive(Debug, Default, Clone)]
pub struct ScriptedProvider {
    actions: VecDeque<PlayerAction>,
    replacements: VecDeque<usize>,
}

impl ScriptedProvider {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self {
            actions: actions.into(),
            replacements: VecDeque::new(),
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<usize>) -> Self {
        self.replacements = replacements.into();
        self
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionProvider for ScriptedProvider {
    fn choose_action(&mut self, _state: &BattleState, slot: SlotRef) -> PlayerAction {
        self.actions.pop_front().unwrap_or_else(|| {
            tracing::warn!(%slot, "script exhausted, passing");
            PlayerAction::Pass
        })
    }

    fn choose_replacement(&mut self, state: &BattleState, slot: SlotRef) -> Option<usize> {
        self.replacements
            .pop_front()
            .or_else(|| state.available_switches(slot.side).first().copied())
    }
}

/// Always the first legal action: in practice the first move with PP.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstMoveProvider;

impl ActionProvider for FirstMoveProvider {
    fn choose_action(&mut self, state: &BattleState, slot: SlotRef) -> PlayerAction {
        valid_actions(state, slot)
            .first()
            .copied()
            .unwrap_or(PlayerAction::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCreatureBuilder};
    use pretty_assertions::assert_eq;
    use schema::{Move, Species};

    #[test]
    fn test_ai_avoids_immune_moves() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::Thunderbolt, Move::QuickAttack])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Mudsdale, 50).build();
        let state = create_test_battle(player, enemy);
        let mut ai = ScoringAI::seeded(7);

        assert_eq!(ai.choose_action(&state, SlotRef::player(0)), PlayerAction::use_move(1));
    }

    #[test]
    fn test_ai_prefers_super_effective_move() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::Tackle, Move::Thunderbolt])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Gyarados, 50).build();
        let state = create_test_battle(player, enemy);
        let mut ai = ScoringAI::seeded(7);

        assert_eq!(ai.choose_action(&state, SlotRef::player(0)), PlayerAction::use_move(1));
    }

    #[test]
    fn test_scripted_provider_then_passes() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let state = create_test_battle(player, enemy);
        let mut script = ScriptedProvider::new(vec![PlayerAction::use_move(2)]);

        assert_eq!(script.choose_action(&state, SlotRef::player(0)), PlayerAction::use_move(2));
        assert_eq!(script.choose_action(&state, SlotRef::player(0)), PlayerAction::Pass);
        assert_eq!(script.remaining(), 0);
    }
}
