//! Turn resolution.
//!
//! A turn runs `collect -> order -> execute -> end of turn -> terminal check -> replacement`.
//! Each top-level action is drained depth-first through an `ActionStack` before the next
//! one is selected against the state it left behind.

use crate::battle::action_stack::{ActionStack, BattleAction};
use crate::battle::commands::ExecutionContext;
use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::end_of_turn::{stage_actions, tick_durations, EndOfTurnStage};
use crate::battle::state::{BattleEvent, BattleOutcome, BattleState, EventBus, GameState, TurnRng};
use crate::battle::triggers::Trigger;
use crate::battle::turn_order::select_next;
use crate::battle::view::{present, BattleView, NullView};
use crate::catalog::Catalog;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::side::{BattleSide, PlayerAction, SideId, SlotRef};
use schema::{Move, MoveEffect};

/// Source of decisions for one side of the battle.
pub trait ActionProvider {
    fn choose_action(&mut self, state: &BattleState, slot: SlotRef) -> PlayerAction;

    /// Party index to send into a slot whose occupant fainted.
    fn choose_replacement(&mut self, state: &BattleState, slot: SlotRef) -> Option<usize> {
        state.available_switches(slot.side).first().copied()
    }
}

pub struct CombatEngine<'c, V: BattleView = NullView> {
    state: BattleState,
    catalog: &'c Catalog,
    rng: TurnRng,
    bus: EventBus,
    view: V,
    /// Number of bus events already handed to the view.
    presented: usize,
    started: bool,
}

impl<'c> CombatEngine<'c, NullView> {
    pub fn new(state: BattleState, catalog: &'c Catalog, rng: TurnRng) -> Self {
        Self::with_view(state, catalog, rng, NullView)
    }
}

impl<'c, V: BattleView> CombatEngine<'c, V> {
    pub fn with_view(state: BattleState, catalog: &'c Catalog, rng: TurnRng, view: V) -> Self {
        Self {
            state,
            catalog,
            rng,
            bus: EventBus::new(),
            view,
            presented: 0,
            started: false,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.bus.events()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn rng(&self) -> &TurnRng {
        &self.rng
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Announces the leads and runs their switch-in effects. Safe to call more than once.
    pub fn start_battle(&mut self) -> BattleResult<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        tracing::info!(battle_id = %self.state.battle_id, "battle started");

        self.bus.push(BattleEvent::BattleStarted);
        let leads = self.state.active_slots();
        for slot in &leads {
            if let Some(creature) = self.state.active_battler(*slot) {
                let event = BattleEvent::CreatureSwitchedIn {
                    slot: *slot,
                    name: creature.name.clone(),
                    species: creature.species,
                };
                self.bus.push(event);
            }
        }
        self.present_pending();

        let entries = leads
            .into_iter()
            .map(|slot| BattleAction::Trigger(Trigger::SwitchIn { slot }))
            .collect();
        self.drain(entries)?;
        self.check_terminal();
        Ok(())
    }

    /// Resolves one full turn from the choices submitted for the active slots.
    ///
    /// Every choice is validated before anything changes. Slots locked into a
    /// continuation (recharge, second turn of a two-turn move) ignore their choice.
    pub fn resolve_turn(&mut self, choices: &[(SlotRef, PlayerAction)]) -> BattleResult<()> {
        if !self.started {
            self.start_battle()?;
        }
        match self.state.game_state {
            GameState::Finished(_) => return Err(BattleStateError::BattleFinished.into()),
            GameState::WaitingForReplacements => {
                return Err(BattleStateError::AwaitingReplacements.into())
            }
            _ => {}
        }

        // --- Step 1: Collect ---
        for (slot, choice) in choices {
            if forced_action(&self.state, *slot).is_none() {
                validate_player_action(&self.state, self.catalog, *slot, choice)?;
            }
        }
        let mut pending = Vec::new();
        for slot in self.state.active_slots() {
            if let Some(forced) = forced_action(&self.state, slot) {
                tracing::debug!(%slot, "slot is locked into a continuation");
                pending.push(forced);
                continue;
            }
            let (_, choice) = choices
                .iter()
                .find(|(chosen_for, _)| *chosen_for == slot)
                .ok_or(ActionError::MissingAction(slot))?;
            pending.push(to_battle_action(&self.state, slot, choice)?);
        }

        self.state.game_state = GameState::TurnInProgress;
        tracing::debug!(turn = self.state.turn_number, actions = pending.len(), "turn started");
        self.bus.push(BattleEvent::TurnStarted {
            turn_number: self.state.turn_number,
        });
        self.present_pending();

        // --- Step 2: Turn-start flags ---
        let mut flags = Vec::new();
        for action in &pending {
            match action {
                BattleAction::Switch { slot, .. } => {
                    if let Some(battle_slot) = self.state.slot_mut(*slot) {
                        battle_slot.add_volatile(VolatileStatus::SwitchingOut);
                    }
                }
                BattleAction::UseMove { slot, move_used, .. } => {
                    if self.catalog.move_data(*move_used)?.has_effect(&MoveEffect::FocusPunch) {
                        flags.push(BattleAction::ApplyVolatile {
                            target: *slot,
                            status: VolatileStatus::Focusing,
                            source: Some(*slot),
                        });
                    }
                }
                _ => {}
            }
        }
        self.drain(flags)?;

        // --- Step 3: Execute in order ---
        while !pending.is_empty() {
            let state = &self.state;
            pending.retain(|action| {
                matches!(action, BattleAction::Forfeit { .. })
                    || action
                        .source()
                        .is_some_and(|slot| state.active_battler(slot).is_some())
            });
            let Some(index) = select_next(&pending, &self.state, self.catalog, &mut self.rng) else {
                break;
            };
            let action = pending.remove(index);
            self.drain(vec![action])?;
            if self.check_terminal() {
                return Ok(());
            }
        }

        // --- Step 4: End of turn ---
        for stage in EndOfTurnStage::ORDER {
            let actions = match stage {
                EndOfTurnStage::Durations => tick_durations(&mut self.state),
                _ => stage_actions(stage, &self.state, self.catalog),
            };
            tracing::debug!(?stage, actions = actions.len(), "end of turn stage");
            self.drain(actions)?;
            if self.check_terminal() {
                return Ok(());
            }
        }

        // --- Step 5: Finalize ---
        self.bus.push(BattleEvent::TurnEnded);
        self.state.turn_number += 1;
        self.present_pending();

        if let Some(limit) = self.state.rules.max_turns {
            if self.state.turn_number > limit {
                tracing::info!(limit, "turn limit reached");
                self.finish(BattleOutcome::Draw);
                return Ok(());
            }
        }
        self.settle_waiting_state();
        Ok(())
    }

    /// Asks the providers for every open decision and resolves it: replacements when
    /// slots are waiting to be refilled, a full turn otherwise.
    ///
    /// Illegal provider choices are logged and replaced by the first legal one.
    pub fn run_turn(
        &mut self,
        player: &mut dyn ActionProvider,
        enemy: &mut dyn ActionProvider,
    ) -> BattleResult<()> {
        if !self.started {
            self.start_battle()?;
        }
        if self.state.is_finished() {
            return Err(BattleStateError::BattleFinished.into());
        }

        if self.state.game_state == GameState::WaitingForReplacements {
            for slot in self.pending_replacements() {
                let provider: &mut dyn ActionProvider = if slot.side == SideId::Player {
                    &mut *player
                } else {
                    &mut *enemy
                };
                let available = self.state.available_switches(slot.side);
                let chosen = provider
                    .choose_replacement(&self.state, slot)
                    .filter(|index| available.contains(index));
                let party_index = match chosen {
                    Some(index) => index,
                    None => match available.first() {
                        Some(index) => {
                            tracing::warn!(%slot, "provider gave no usable replacement");
                            *index
                        }
                        None => continue,
                    },
                };
                self.apply_replacement(slot, party_index)?;
                if self.state.is_finished() {
                    break;
                }
            }
            return Ok(());
        }

        let mut choices = Vec::new();
        for slot in self.state.active_slots() {
            if forced_action(&self.state, slot).is_some() {
                continue;
            }
            let provider: &mut dyn ActionProvider = if slot.side == SideId::Player {
                &mut *player
            } else {
                &mut *enemy
            };
            let mut choice = provider.choose_action(&self.state, slot);
            if let Err(err) = validate_player_action(&self.state, self.catalog, slot, &choice) {
                tracing::warn!(%slot, %err, ?choice, "provider chose an illegal action");
                choice = valid_actions(&self.state, slot)
                    .first()
                    .copied()
                    .unwrap_or(PlayerAction::Pass);
            }
            choices.push((slot, choice));
        }
        self.resolve_turn(&choices)
    }

    /// Plays turns until the battle is decided.
    pub fn run_battle(
        &mut self,
        player: &mut dyn ActionProvider,
        enemy: &mut dyn ActionProvider,
    ) -> BattleResult<BattleOutcome> {
        self.start_battle()?;
        loop {
            if let GameState::Finished(outcome) = self.state.game_state {
                return Ok(outcome);
            }
            self.run_turn(player, enemy)?;
        }
    }

    /// Slots that must be refilled before the next turn.
    pub fn pending_replacements(&self) -> Vec<SlotRef> {
        if self.state.game_state == GameState::WaitingForReplacements {
            self.state.slots_needing_replacement()
        } else {
            Vec::new()
        }
    }

    /// Sends `party_index` into a slot whose occupant fainted.
    pub fn apply_replacement(&mut self, slot: SlotRef, party_index: usize) -> BattleResult<()> {
        if !self.pending_replacements().contains(&slot) {
            return Err(BattleStateError::NoReplacementPending(slot).into());
        }
        validate_switch_target(self.state.side(slot.side), party_index)?;

        self.drain(vec![BattleAction::Switch { slot, party_index }])?;
        if self.check_terminal() {
            return Ok(());
        }
        self.settle_waiting_state();
        Ok(())
    }

    fn settle_waiting_state(&mut self) {
        self.state.game_state = if self.state.slots_needing_replacement().is_empty() {
            GameState::WaitingForActions
        } else {
            GameState::WaitingForReplacements
        };
    }

    /// Executes `actions` and everything they cause, depth-first.
    fn drain(&mut self, actions: Vec<BattleAction>) -> BattleResult<()> {
        let mut stack = ActionStack::new();
        stack.push_reactions(actions);
        while let Some(action) = stack.pop_front() {
            let reactions = {
                let mut ctx =
                    ExecutionContext::new(&mut self.state, self.catalog, &mut self.rng, &mut self.bus);
                action.execute_logic(&mut ctx)?
            };
            self.present_pending();
            stack.push_reactions(reactions);
        }
        Ok(())
    }

    fn present_pending(&mut self) {
        for event in self.bus.events_since(self.presented) {
            present(&mut self.view, event, &self.state);
        }
        self.presented = self.bus.len();
    }

    /// Ends the battle if a side has nothing left. Returns true once the battle is over.
    fn check_terminal(&mut self) -> bool {
        if self.state.is_finished() {
            return true;
        }
        match self.state.check_outcome() {
            Some(outcome) => {
                self.finish(outcome);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        tracing::info!(?outcome, turn = self.state.turn_number, "battle ended");
        self.state.game_state = GameState::Finished(outcome);
        self.bus.push(BattleEvent::BattleEnded { outcome });
        self.present_pending();
    }
}

/// The action a slot must take regardless of what was chosen for it.
fn forced_action(state: &BattleState, slot: SlotRef) -> Option<BattleAction> {
    let battle_slot = state.slot(slot)?;
    state.active_battler(slot)?;
    if battle_slot.has_volatile(VolatileKind::MustRecharge) {
        return Some(BattleAction::Recharge { slot });
    }
    battle_slot.locked_move().map(|move_used| BattleAction::UseMove {
        slot,
        move_index: None,
        move_used,
        target: None,
    })
}

fn to_battle_action(state: &BattleState, slot: SlotRef, choice: &PlayerAction) -> BattleResult<BattleAction> {
    Ok(match *choice {
        PlayerAction::UseMove { move_index, target } => {
            let creature = state.require_battler(slot)?;
            if !creature.has_usable_move() {
                // Nothing left to spend PP on
                BattleAction::UseMove {
                    slot,
                    move_index: None,
                    move_used: Move::Struggle,
                    target,
                }
            } else {
                let instance = creature
                    .moves
                    .get(move_index)
                    .and_then(|m| m.as_ref())
                    .ok_or(ActionError::NoMoveInSlot(move_index))?;
                BattleAction::UseMove {
                    slot,
                    move_index: Some(move_index),
                    move_used: instance.move_,
                    target,
                }
            }
        }
        PlayerAction::Switch { party_index } => BattleAction::Switch { slot, party_index },
        PlayerAction::Pass => BattleAction::Pass { slot },
        PlayerAction::Forfeit => BattleAction::Forfeit { side: slot.side },
    })
}

fn validate_switch_target(side: &BattleSide, party_index: usize) -> Result<(), ActionError> {
    let creature = side
        .party
        .get(party_index)
        .ok_or(ActionError::InvalidPartyIndex(party_index))?;
    if !creature.can_battle() {
        return Err(ActionError::SwitchTargetFainted(party_index));
    }
    if side.is_active(party_index) {
        return Err(ActionError::AlreadyActive(party_index));
    }
    Ok(())
}

/// Checks a submitted action against the current state.
/// A creature with no PP anywhere may still choose to attack; it will struggle.
pub fn validate_player_action(
    state: &BattleState,
    catalog: &Catalog,
    slot: SlotRef,
    action: &PlayerAction,
) -> BattleResult<()> {
    if state.slot(slot).is_none() {
        return Err(BattleStateError::InvalidSlot(slot).into());
    }
    let creature = state
        .active_battler(slot)
        .ok_or(ActionError::SlotNotActive(slot))?;

    match *action {
        PlayerAction::UseMove { move_index, target } => {
            if !creature.has_usable_move() {
                return Ok(());
            }
            let instance = creature
                .moves
                .get(move_index)
                .ok_or(ActionError::InvalidMoveIndex(move_index))?
                .as_ref()
                .ok_or(ActionError::NoMoveInSlot(move_index))?;
            if instance.pp == 0 {
                return Err(ActionError::NoPpRemaining(move_index).into());
            }
            if let Some(target) = target {
                let aims_at_target = catalog.move_data(instance.move_)?.targets_opponent();
                if aims_at_target && (target == slot || state.active_battler(target).is_none()) {
                    return Err(ActionError::InvalidTarget(target).into());
                }
            }
        }
        PlayerAction::Switch { party_index } => {
            validate_switch_target(state.side(slot.side), party_index)?;
        }
        PlayerAction::Pass | PlayerAction::Forfeit => {}
    }
    Ok(())
}

/// Every action a slot could legally submit this turn, moves first.
pub fn valid_actions(state: &BattleState, slot: SlotRef) -> Vec<PlayerAction> {
    let Some(creature) = state.active_battler(slot) else {
        return Vec::new();
    };
    let mut actions: Vec<PlayerAction> = creature
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| m.as_ref().is_some_and(|instance| instance.pp > 0))
        .map(|(index, _)| PlayerAction::use_move(index))
        .collect();
    if actions.is_empty() {
        // Becomes Struggle
        actions.push(PlayerAction::use_move(0));
    }
    actions.extend(
        state
            .available_switches(slot.side)
            .into_iter()
            .map(|party_index| PlayerAction::Switch { party_index }),
    );
    actions.push(PlayerAction::Forfeit);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCreatureBuilder};
    use crate::errors::BattleEngineError;
    use pretty_assertions::assert_eq;
    use schema::Species;

    #[test]
    fn test_validate_rejects_empty_move_slot_and_missing_pp() {
        let mut player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::Tackle, Move::ThunderShock])
            .build();
        if let Some(instance) = player.moves[1].as_mut() {
            instance.pp = 0;
        }
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let state = create_test_battle(player, enemy);
        let catalog = Catalog::standard();
        let slot = SlotRef::player(0);

        assert!(validate_player_action(&state, catalog, slot, &PlayerAction::use_move(0)).is_ok());
        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::use_move(1)),
            Err(BattleEngineError::Action(ActionError::NoPpRemaining(1)))
        );
        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::use_move(3)),
            Err(BattleEngineError::Action(ActionError::NoMoveInSlot(3)))
        );
        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::use_move(7)),
            Err(BattleEngineError::Action(ActionError::InvalidMoveIndex(7)))
        );
    }

    #[test]
    fn test_validate_switch_targets() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut state = create_test_battle(player, enemy);
        let mut fainted = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        fainted.set_hp(0);
        state.side_mut(SideId::Player).party.push(fainted);
        let catalog = Catalog::standard();
        let slot = SlotRef::player(0);

        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::Switch { party_index: 0 }),
            Err(BattleEngineError::Action(ActionError::AlreadyActive(0)))
        );
        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::Switch { party_index: 1 }),
            Err(BattleEngineError::Action(ActionError::SwitchTargetFainted(1)))
        );
        assert_eq!(
            validate_player_action(&state, catalog, slot, &PlayerAction::Switch { party_index: 5 }),
            Err(BattleEngineError::Action(ActionError::InvalidPartyIndex(5)))
        );
    }

    #[test]
    fn test_validate_rejects_bad_target_and_missing_slot() {
        let player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::Tackle])
            .build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let state = create_test_battle(player, enemy);
        let catalog = Catalog::standard();
        let aimed_at_self = PlayerAction::UseMove {
            move_index: 0,
            target: Some(SlotRef::player(0)),
        };

        assert_eq!(
            validate_player_action(&state, catalog, SlotRef::player(0), &aimed_at_self),
            Err(BattleEngineError::Action(ActionError::InvalidTarget(SlotRef::player(0))))
        );
        assert_eq!(
            validate_player_action(&state, catalog, SlotRef::player(1), &PlayerAction::Pass),
            Err(BattleEngineError::BattleState(BattleStateError::InvalidSlot(SlotRef::player(1))))
        );
    }

    #[test]
    fn test_valid_actions_fall_back_to_struggle() {
        let mut player = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_moves(vec![Move::Tackle])
            .build();
        if let Some(instance) = player.moves[0].as_mut() {
            instance.pp = 0;
        }
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let state = create_test_battle(player, enemy);

        let actions = valid_actions(&state, SlotRef::player(0));
        assert_eq!(actions, vec![PlayerAction::use_move(0), PlayerAction::Forfeit]);

        let action = to_battle_action(&state, SlotRef::player(0), &PlayerAction::use_move(0)).unwrap();
        assert_eq!(
            action,
            BattleAction::UseMove {
                slot: SlotRef::player(0),
                move_index: None,
                move_used: Move::Struggle,
                target: None,
            }
        );
    }

    #[test]
    fn test_recharge_is_forced() {
        let player = TestCreatureBuilder::new(Species::Snorlax, 50).build();
        let enemy = TestCreatureBuilder::new(Species::Rattata, 50).build();
        let mut state = create_test_battle(player, enemy);
        state
            .slot_mut(SlotRef::player(0))
            .unwrap()
            .add_volatile(VolatileStatus::MustRecharge);

        assert_eq!(
            forced_action(&state, SlotRef::player(0)),
            Some(BattleAction::Recharge {
                slot: SlotRef::player(0)
            })
        );
        assert_eq!(forced_action(&state, SlotRef::enemy(0)), None);
    }
}
