use crate::catalog::Catalog;
use crate::errors::{BattleResult, SpeciesDataError};
use schema::{Ability, BaseStats, CreatureType, HeldItem, Move, Species};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistent status. Survives switching out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Burn,
    Poison,
    BadlyPoisoned(u8), // escalating damage counter
    Paralysis,
    Sleep(u8), // turns remaining
    Freeze,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCondition::Burn => "burn",
            StatusCondition::Poison | StatusCondition::BadlyPoisoned(_) => "poison",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Sleep(_) => "sleep",
            StatusCondition::Freeze => "freeze",
        };
        write!(f, "{}", name)
    }
}

impl StatusCondition {
    /// Types that can never receive this status.
    pub fn immune_types(&self) -> &'static [CreatureType] {
        match self {
            StatusCondition::Burn => &[CreatureType::Fire],
            StatusCondition::Poison | StatusCondition::BadlyPoisoned(_) => {
                &[CreatureType::Poison, CreatureType::Steel]
            }
            StatusCondition::Paralysis => &[CreatureType::Electric],
            StatusCondition::Freeze => &[CreatureType::Ice],
            StatusCondition::Sleep(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub fn from_base(base: &BaseStats, level: u8) -> Self {
        let level = level as u32;
        let other = |b: u8| ((2 * b as u32 * level) / 100 + 5) as u16;
        Self {
            hp: ((2 * base.hp as u32 * level) / 100 + level + 10) as u16,
            attack: other(base.attack),
            defense: other(base.defense),
            sp_attack: other(base.sp_attack),
            sp_defense: other(base.sp_defense),
            speed: other(base.speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_: Move,
    pub pp: u8,
    pub max_pp: u8,
}

/// A live battler built from a species blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInstance {
    pub name: String,
    pub species: Species,
    pub level: u8,
    pub types: Vec<CreatureType>,
    pub stats: Stats,
    curr_hp: u16,
    pub status: Option<StatusCondition>,
    pub held_item: Option<HeldItem>,
    pub item_consumed: bool,
    pub ability: Option<Ability>,
    pub moves: [Option<MoveInstance>; 4],
    fainted: bool,
}

impl CreatureInstance {
    pub fn new(species: Species, level: u8, moves: &[Move], catalog: &Catalog) -> BattleResult<Self> {
        let data = catalog.species_data(species)?;
        if moves.len() > 4 {
            return Err(SpeciesDataError::TooManyMoves(species).into());
        }

        let mut move_slots: [Option<MoveInstance>; 4] = [None, None, None, None];
        for (slot, move_) in move_slots.iter_mut().zip(moves) {
            let max_pp = catalog.move_data(*move_)?.max_pp;
            *slot = Some(MoveInstance {
                move_: *move_,
                pp: max_pp,
                max_pp,
            });
        }

        let stats = Stats::from_base(&data.base_stats, level);
        Ok(Self {
            name: species.to_string(),
            species,
            level,
            types: data.types.clone(),
            stats,
            curr_hp: stats.hp,
            status: None,
            held_item: None,
            item_consumed: false,
            ability: data.ability,
            moves: move_slots,
            fainted: false,
        })
    }

    pub fn with_item(mut self, item: HeldItem) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn with_ability(mut self, ability: Option<Ability>) -> Self {
        self.ability = ability;
        self
    }

    pub fn with_nickname(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn current_hp(&self) -> u16 {
        self.curr_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    /// Sets current HP directly, clamped to max. Does not faint.
    pub fn set_hp(&mut self, hp: u16) {
        self.curr_hp = hp.min(self.stats.hp);
    }

    pub fn set_hp_to_max(&mut self) {
        self.curr_hp = self.stats.hp;
    }

    /// Overrides max HP and refills. Used to build exact-number scenarios.
    pub fn set_max_hp(&mut self, max_hp: u16) {
        self.stats.hp = max_hp;
        self.curr_hp = max_hp;
    }

    /// Removes up to `amount` HP, returning the HP actually lost.
    /// Reaching 0 HP is not fainting; that is the Faint action's job.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.curr_hp);
        self.curr_hp -= dealt;
        dealt
    }

    /// Restores HP up to max, returning the HP actually gained. Fainted creatures cannot heal.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.fainted {
            return 0;
        }
        let healed = amount.min(self.stats.hp - self.curr_hp);
        self.curr_hp += healed;
        healed
    }

    /// Commits a faint. Returns false if the creature had already fainted.
    pub fn mark_fainted(&mut self) -> bool {
        if self.fainted {
            return false;
        }
        self.fainted = true;
        self.curr_hp = 0;
        self.status = None;
        true
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    /// True while the creature can still take part in the battle.
    pub fn can_battle(&self) -> bool {
        !self.fainted && self.curr_hp > 0
    }

    pub fn is_at_full_hp(&self) -> bool {
        self.curr_hp == self.stats.hp
    }

    /// The held item, unless it has been used up.
    pub fn item(&self) -> Option<HeldItem> {
        if self.item_consumed {
            None
        } else {
            self.held_item
        }
    }

    pub fn consume_item(&mut self) -> Option<HeldItem> {
        let item = self.item()?;
        self.item_consumed = true;
        Some(item)
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().flatten().any(|m| m.pp > 0)
    }

    /// Spends one PP from the given move slot. Returns false if it had none.
    pub fn use_pp(&mut self, move_index: usize) -> bool {
        match self.moves.get_mut(move_index).and_then(|slot| slot.as_mut()) {
            Some(instance) if instance.pp > 0 => {
                instance.pp -= 1;
                true
            }
            _ => false,
        }
    }

    /// HP as a fraction of max, in percent.
    pub fn hp_percent(&self) -> u16 {
        if self.stats.hp == 0 {
            return 0;
        }
        ((self.curr_hp as u32 * 100) / self.stats.hp as u32) as u16
    }
}
