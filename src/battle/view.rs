//! Presentation of battle events.
//!
//! The engine replays the events each action produced to a `BattleView` after that
//! action's logic has run. Views only observe; nothing here touches the state.

use crate::battle::state::{BattleEvent, BattleState};
use crate::creature::StatusCondition;
use crate::side::SlotRef;
use schema::{Move, Species, StatType, Weather};
use std::io;

/// Callbacks a front end can implement. Every method defaults to doing nothing.
pub trait BattleView {
    fn message(&mut self, _text: &str) {}
    fn move_animation(&mut self, _attacker: SlotRef, _move_used: Move) {}
    fn damage_animation(&mut self, _target: SlotRef, _amount: u16) {}
    fn hp_bar(&mut self, _target: SlotRef, _current: u16, _max: u16) {}
    fn faint(&mut self, _target: SlotRef) {}
    fn switch(&mut self, _slot: SlotRef, _species: Species) {}
    fn status(&mut self, _target: SlotRef, _status: Option<StatusCondition>) {}
    fn stat_change(&mut self, _target: SlotRef, _stat: StatType, _delta: i8) {}
    fn weather(&mut self, _weather: Weather) {}
}

/// Headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl BattleView for NullView {}

/// Writes the formatted text of every event, one line each.
#[derive(Debug)]
pub struct TextView<W: io::Write> {
    out: W,
}

impl<W: io::Write> TextView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> BattleView for TextView<W> {
    fn message(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            tracing::warn!(%err, "could not write battle text");
        }
    }
}

/// Sends one event to the view: its text first, then the matching visual.
/// Visuals for empty slots or zero amounts are skipped.
pub fn present<V: BattleView + ?Sized>(view: &mut V, event: &BattleEvent, state: &BattleState) {
    if let Some(text) = event.format(state) {
        view.message(&text);
    }
    if let Some(slot) = event.subject() {
        if state.creature_at(slot).is_none() {
            return;
        }
    }

    match event {
        BattleEvent::MoveUsed { slot, move_used, .. } => view.move_animation(*slot, *move_used),
        BattleEvent::DamageDealt {
            target,
            damage,
            remaining_hp,
            max_hp,
            ..
        } => {
            if *damage > 0 {
                view.damage_animation(*target, *damage);
                view.hp_bar(*target, *remaining_hp, *max_hp);
            }
        }
        BattleEvent::CreatureHealed {
            target,
            amount,
            new_hp,
            max_hp,
            ..
        } => {
            if *amount > 0 {
                view.hp_bar(*target, *new_hp, *max_hp);
            }
        }
        BattleEvent::CreatureFainted { target, .. } => view.faint(*target),
        BattleEvent::CreatureSwitchedIn { slot, species, .. } => view.switch(*slot, *species),
        BattleEvent::StatusApplied { target, status, .. } => view.status(*target, Some(*status)),
        BattleEvent::StatusCured { target, .. } => view.status(*target, None),
        BattleEvent::StatStageChanged {
            target,
            stat,
            old_stage,
            new_stage,
            ..
        } => {
            let delta = new_stage - old_stage;
            if delta != 0 {
                view.stat_change(*target, *stat, delta);
            }
        }
        BattleEvent::WeatherStarted { weather } => view.weather(*weather),
        BattleEvent::WeatherEnded { .. } => view.weather(Weather::None),
        _ => {}
    }
}
