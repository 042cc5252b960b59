use crate::{split_camel_case, Ability, CreatureType};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Species {
    Pikachu,
    Rattata,
    Charizard,
    Blastoise,
    Venusaur,
    Gengar,
    Snorlax,
    Gyarados,
    Garchomp,
    Tyranitar,
    Politoed,
    Ninetales,
    Abomasnow,
    Kingdra,
    Castform,
    Ninjask,
    Skarmory,
    Machamp,
    Alakazam,
    Greninja,
    Salamence,
    TapuKoko,
    Rillaboom,
    Mudsdale,
    Drampa,
    Excadrill,
    Ludicolo,
    Glalie,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", split_camel_case(&format!("{:?}", self)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub const fn new(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub types: Vec<CreatureType>,
    pub base_stats: BaseStats,
    pub ability: Option<Ability>,
}
