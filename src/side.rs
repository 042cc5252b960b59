use crate::battle::conditions::{VolatileKind, VolatileStatus};
use crate::creature::CreatureInstance;
use schema::{Move, SideCondition, StatType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SideId {
    Player,
    Enemy,
}

impl SideId {
    pub const ALL: [SideId; 2] = [SideId::Player, SideId::Enemy];

    pub fn to_index(self) -> usize {
        match self {
            SideId::Player => 0,
            SideId::Enemy => 1,
        }
    }

    pub fn opponent(self) -> SideId {
        match self {
            SideId::Player => SideId::Enemy,
            SideId::Enemy => SideId::Player,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideId::Player => write!(f, "player"),
            SideId::Enemy => write!(f, "enemy"),
        }
    }
}

/// Address of one battle position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotRef {
    pub side: SideId,
    pub slot: usize,
}

impl SlotRef {
    pub fn new(side: SideId, slot: usize) -> Self {
        Self { side, slot }
    }

    pub fn player(slot: usize) -> Self {
        Self::new(SideId::Player, slot)
    }

    pub fn enemy(slot: usize) -> Self {
        Self::new(SideId::Enemy, slot)
    }

    pub fn is_ally_of(&self, other: SlotRef) -> bool {
        self.side == other.side
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} slot {}", self.side, self.slot)
    }
}

/// What an action provider submits for one active slot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    UseMove {
        move_index: usize,
        target: Option<SlotRef>,
    },
    Switch {
        party_index: usize,
    },
    Pass,
    Forfeit,
}

impl PlayerAction {
    pub fn use_move(move_index: usize) -> Self {
        PlayerAction::UseMove {
            move_index,
            target: None,
        }
    }
}

/// Damage received by the slot's occupant during the current turn.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DamageTracker {
    pub physical: u16,
    pub special: u16,
    pub last_attacker: Option<SlotRef>,
}

impl DamageTracker {
    pub fn total(&self) -> u16 {
        self.physical.saturating_add(self.special)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleSlot {
    /// Party index of the occupant.
    pub active: Option<usize>,
    pub volatiles: BTreeMap<VolatileKind, VolatileStatus>,
    pub stat_stages: HashMap<StatType, i8>,
    pub protect_streak: u8,
    pub damage_taken: DamageTracker,
    /// Total damage the occupant has dealt with the move it is executing.
    pub damage_dealt_this_move: u16,
    /// Damage dealt by the occupant's most recent hit, read by drain and recoil.
    pub last_hit_damage: u16,
    pub last_move: Option<Move>,
}

impl BattleSlot {
    pub fn with_active(party_index: usize) -> Self {
        Self {
            active: Some(party_index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Sets a stage, clamped to -6..=6.
    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let clamped = stage.clamp(-6, 6);
        if clamped == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, clamped);
        }
    }

    pub fn has_volatile(&self, kind: VolatileKind) -> bool {
        self.volatiles.contains_key(&kind)
    }

    pub fn volatile(&self, kind: VolatileKind) -> Option<&VolatileStatus> {
        self.volatiles.get(&kind)
    }

    pub fn add_volatile(&mut self, status: VolatileStatus) {
        self.volatiles.insert(status.kind(), status);
    }

    pub fn remove_volatile(&mut self, kind: VolatileKind) -> Option<VolatileStatus> {
        self.volatiles.remove(&kind)
    }

    /// The move this slot is locked into by a charge or semi-invulnerable turn.
    pub fn locked_move(&self) -> Option<Move> {
        self.volatiles.values().find_map(|v| v.locked_move())
    }

    /// Clears everything tied to the current occupant. Persistent status lives on the creature.
    pub fn reset_for_switch(&mut self) {
        self.volatiles.clear();
        self.stat_stages.clear();
        self.protect_streak = 0;
        self.damage_taken = DamageTracker::default();
        self.damage_dealt_this_move = 0;
        self.last_hit_damage = 0;
        self.last_move = None;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideConditionState {
    /// `None` for conditions that last until removed.
    pub turns_remaining: Option<u8>,
    pub layers: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSide {
    pub name: String,
    pub party: Vec<CreatureInstance>,
    pub slots: Vec<BattleSlot>,
    pub conditions: BTreeMap<SideCondition, SideConditionState>,
}

impl BattleSide {
    /// Fills the slots with the first creatures able to battle, in party order.
    pub fn new(name: impl Into<String>, party: Vec<CreatureInstance>, slot_count: usize) -> Self {
        let mut leads = party
            .iter()
            .enumerate()
            .filter(|(_, creature)| creature.can_battle())
            .map(|(index, _)| index);
        let slots = (0..slot_count)
            .map(|_| match leads.next() {
                Some(index) => BattleSlot::with_active(index),
                None => BattleSlot::default(),
            })
            .collect();

        Self {
            name: name.into(),
            party,
            slots,
            conditions: BTreeMap::new(),
        }
    }

    pub fn is_active(&self, party_index: usize) -> bool {
        self.slots.iter().any(|slot| slot.active == Some(party_index))
    }

    /// Party indices that could be switched in right now.
    pub fn available_switches(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(index, creature)| creature.can_battle() && !self.is_active(*index))
            .map(|(index, _)| index)
            .collect()
    }

    /// A side is defeated once no creature in its party can battle.
    pub fn is_defeated(&self) -> bool {
        self.party.iter().all(|creature| !creature.can_battle())
    }

    pub fn has_condition(&self, condition: SideCondition) -> bool {
        self.conditions.contains_key(&condition)
    }

    pub fn condition_layers(&self, condition: SideCondition) -> u8 {
        self.conditions.get(&condition).map(|c| c.layers).unwrap_or(0)
    }
}
