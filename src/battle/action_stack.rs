use std::collections::VecDeque;

use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::battle::state::BattleEvent;
use crate::battle::triggers::Trigger;
use crate::catalog::Catalog;
use crate::creature::StatusCondition;
use crate::side::{SideId, SlotRef};
use schema::{
    Ability, CreatureType, HeldItem, Move, MoveCategory, SideCondition, StatType, Terrain, Weather,
};
use serde::{Deserialize, Serialize};

/// Where a point of damage came from. Carried on damage actions and events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum DamageSource {
    Move {
        attacker: SlotRef,
        move_used: Move,
        move_type: CreatureType,
        category: MoveCategory,
        contact: bool,
        effectiveness: f64,
    },
    Status(StatusCondition),
    Weather(Weather),
    Recoil,
    Item(HeldItem),
    Ability(Ability),
    Hazard(SideCondition),
    LeechSeed,
}

impl DamageSource {
    /// The attacking slot, for damage dealt by a move.
    pub fn attacker(&self) -> Option<SlotRef> {
        match self {
            DamageSource::Move { attacker, .. } => Some(*attacker),
            _ => None,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, DamageSource::Move { .. })
    }
}

/// Internal action types for the action stack.
/// These represent atomic actions that can be executed during battle resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleAction {
    /// A side gives up the battle
    Forfeit { side: SideId },

    /// Withdraw the occupant of `slot` and send in a party member
    Switch { slot: SlotRef, party_index: usize },

    /// Use a move. `move_index` is None for forced continuations that spend no PP.
    UseMove {
        slot: SlotRef,
        move_index: Option<usize>,
        move_used: Move,
        target: Option<SlotRef>,
    },

    Pass { slot: SlotRef },

    /// Forced turn of inaction after a recharge move
    Recharge { slot: SlotRef },

    /// Execute a single hit of a move (for multi-hit moves, multiple actions are pushed)
    AttackHit {
        attacker: SlotRef,
        defender: SlotRef,
        move_used: Move,
        hit_number: u8,
    },

    Damage {
        target: SlotRef,
        amount: u16,
        source: DamageSource,
    },
    Heal { target: SlotRef, amount: u16 },

    ApplyStatus {
        target: SlotRef,
        status: StatusCondition,
        source: Option<SlotRef>,
    },
    /// Overwrites the persistent status without immunity checks (counter updates, thawing)
    SetStatus {
        target: SlotRef,
        status: Option<StatusCondition>,
    },
    CureStatus { target: SlotRef },

    ApplyVolatile {
        target: SlotRef,
        status: VolatileStatus,
        source: Option<SlotRef>,
    },
    RemoveVolatile { target: SlotRef, kind: VolatileKind },

    StatStage {
        target: SlotRef,
        stat: StatType,
        delta: i8,
        source: Option<SlotRef>,
    },

    Faint { target: SlotRef, by: Option<SlotRef> },

    /// `Weather::None` clears the current weather
    SetWeather {
        weather: Weather,
        turns: u8,
        source: Option<SlotRef>,
    },
    SetTerrain {
        terrain: Terrain,
        turns: u8,
        source: Option<SlotRef>,
    },
    AddSideCondition {
        side: SideId,
        condition: SideCondition,
    },
    RemoveSideCondition {
        side: SideId,
        condition: SideCondition,
    },

    ConsumeItem { target: SlotRef },
    ChangeType {
        target: SlotRef,
        types: Vec<CreatureType>,
    },

    /// Damage to the user as a percentage of its last hit
    Recoil { target: SlotRef, percent: u8 },
    /// Healing for the user as a percentage of its last hit
    Drain { target: SlotRef, percent: u8 },

    Message(BattleEvent),
    Trigger(Trigger),

    /// Rolls once when executed; on success the inner actions become reactions
    Chance {
        percent: u8,
        reason: &'static str,
        actions: Vec<BattleAction>,
    },
}

impl BattleAction {
    /// The slot acting, if any. Field effects have none.
    pub fn source(&self) -> Option<SlotRef> {
        match self {
            BattleAction::Switch { slot, .. }
            | BattleAction::UseMove { slot, .. }
            | BattleAction::Pass { slot }
            | BattleAction::Recharge { slot } => Some(*slot),
            BattleAction::AttackHit { attacker, .. } => Some(*attacker),
            BattleAction::Damage { source, .. } => source.attacker(),
            BattleAction::ApplyStatus { source, .. }
            | BattleAction::ApplyVolatile { source, .. }
            | BattleAction::StatStage { source, .. }
            | BattleAction::SetWeather { source, .. }
            | BattleAction::SetTerrain { source, .. } => *source,
            BattleAction::Faint { by, .. } => *by,
            _ => None,
        }
    }

    /// Fixed ordering tier: forfeits, then switches, then everything else.
    pub fn tier(&self) -> u8 {
        match self {
            BattleAction::Forfeit { .. } => 2,
            BattleAction::Switch { .. } => 1,
            _ => 0,
        }
    }

    /// Move priority bracket used within the move tier.
    pub fn priority(&self, catalog: &Catalog) -> i8 {
        match self {
            BattleAction::UseMove { move_used, .. } => catalog
                .move_data(*move_used)
                .map(|data| data.priority())
                .unwrap_or(0),
            BattleAction::Recharge { .. } => -6,
            _ => 0,
        }
    }

    /// Whether a Protect on the target stops this action.
    pub fn blockable_by_protect(&self, catalog: &Catalog) -> bool {
        match self {
            BattleAction::AttackHit {
                attacker,
                defender,
                move_used,
                ..
            } => {
                attacker != defender
                    && catalog
                        .move_data(*move_used)
                        .map(|data| data.targets_opponent())
                        .unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ActionStack {
    actions: VecDeque<BattleAction>,
}

impl ActionStack {
    /// Creates a new, empty ActionStack.
    pub fn new() -> Self {
        Self {
            actions: VecDeque::new(),
        }
    }

    /// Puts reactions ahead of everything queued, keeping their relative order.
    /// Applied after each action this drains the stack depth-first.
    pub fn push_reactions(&mut self, reactions: Vec<BattleAction>) {
        for reaction in reactions.into_iter().rev() {
            self.actions.push_front(reaction);
        }
    }

    /// Removes and returns the next action to be executed from the front of the queue.
    pub fn pop_front(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(turn_number: u32) -> BattleAction {
        BattleAction::Message(BattleEvent::TurnStarted { turn_number })
    }

    #[test]
    fn test_reactions_run_before_queued_siblings() {
        let mut stack = ActionStack::new();
        stack.push_reactions(vec![message(9)]);
        stack.push_reactions(vec![message(1), message(2)]);

        // First reaction produces its own nested reaction
        let first = stack.pop_front();
        assert_eq!(first, Some(message(1)));
        stack.push_reactions(vec![message(3)]);

        assert_eq!(stack.pop_front(), Some(message(3)));
        assert_eq!(stack.pop_front(), Some(message(2)));
        assert_eq!(stack.pop_front(), Some(message(9)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_metadata() {
        let catalog = Catalog::standard();
        let protect = BattleAction::UseMove {
            slot: SlotRef::player(0),
            move_index: Some(0),
            move_used: Move::Protect,
            target: None,
        };
        assert_eq!(protect.priority(catalog), 4);
        assert_eq!(protect.source(), Some(SlotRef::player(0)));

        let hit = BattleAction::AttackHit {
            attacker: SlotRef::player(0),
            defender: SlotRef::enemy(0),
            move_used: Move::Tackle,
            hit_number: 0,
        };
        assert!(hit.blockable_by_protect(catalog));

        let self_hit = BattleAction::AttackHit {
            attacker: SlotRef::player(0),
            defender: SlotRef::player(0),
            move_used: Move::HittingItself,
            hit_number: 0,
        };
        assert!(!self_hit.blockable_by_protect(catalog));

        let weather = BattleAction::SetWeather {
            weather: Weather::Rain,
            turns: 5,
            source: None,
        };
        assert_eq!(weather.source(), None);
        assert_eq!(BattleAction::Forfeit { side: SideId::Enemy }.tier(), 2);
    }
}
