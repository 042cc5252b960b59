use crate::{split_camel_case, CreatureType};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Stats that carry a battle stage counter (-6..=+6).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Ability {
    Intimidate,
    Drizzle,
    Drought,
    SandStream,
    SnowWarning,
    ElectricSurge,
    GrassySurge,
    Protean,
    Static,
    RoughSkin,
    Stamina,
    Sturdy,
    SpeedBoost,
    RainDish,
    IceBody,
    Forecast,
    Berserk,
    Moxie,
    SwiftSwim,
    Chlorophyll,
    SandRush,
    Levitate,
    Blaze,
    Torrent,
    Overgrow,
}

impl Ability {
    /// The move type a pinch ability (Blaze and friends) boosts at low HP.
    pub fn pinch_type(&self) -> Option<CreatureType> {
        match self {
            Ability::Blaze => Some(CreatureType::Fire),
            Ability::Torrent => Some(CreatureType::Water),
            Ability::Overgrow => Some(CreatureType::Grass),
            _ => None,
        }
    }

    /// The weather summoned on switch-in, if this is a weather ability.
    pub fn summoned_weather(&self) -> Option<Weather> {
        match self {
            Ability::Drizzle => Some(Weather::Rain),
            Ability::Drought => Some(Weather::Sun),
            Ability::SandStream => Some(Weather::Sandstorm),
            Ability::SnowWarning => Some(Weather::Hail),
            _ => None,
        }
    }

    pub fn summoned_terrain(&self) -> Option<Terrain> {
        match self {
            Ability::ElectricSurge => Some(Terrain::Electric),
            Ability::GrassySurge => Some(Terrain::Grassy),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", split_camel_case(&format!("{:?}", self)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum HeldItem {
    FocusSash,
    Leftovers,
    SitrusBerry,
    LifeOrb,
    ShellBell,
    RockyHelmet,
    WeaknessPolicy,
    ChoiceScarf,
    IronBall,
    Charcoal,
    MysticWater,
    Magnet,
    MiracleSeed,
}

impl HeldItem {
    /// The move type boosted by a type-enhancing item.
    pub fn boosted_type(&self) -> Option<CreatureType> {
        match self {
            HeldItem::Charcoal => Some(CreatureType::Fire),
            HeldItem::MysticWater => Some(CreatureType::Water),
            HeldItem::Magnet => Some(CreatureType::Electric),
            HeldItem::MiracleSeed => Some(CreatureType::Grass),
            _ => None,
        }
    }

    /// Single-use items are marked consumed by the action they produce.
    pub fn is_consumable(&self) -> bool {
        matches!(
            self,
            HeldItem::FocusSash | HeldItem::SitrusBerry | HeldItem::WeaknessPolicy
        )
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", split_camel_case(&format!("{:?}", self)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weather {
    #[default]
    None,
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weather::None => "clear skies",
            Weather::Sun => "harsh sunlight",
            Weather::Rain => "rain",
            Weather::Sandstorm => "sandstorm",
            Weather::Hail => "hail",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Terrain {
    #[default]
    None,
    Electric,
    Grassy,
    Psychic,
    Misty,
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::None => "no terrain",
            Terrain::Electric => "Electric Terrain",
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Psychic => "Psychic Terrain",
            Terrain::Misty => "Misty Terrain",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    Safeguard,
    Tailwind,
    Mist,
    Spikes,
    StickyWeb,
}

impl SideCondition {
    /// Hazards are laid on the opposing side and never expire on their own.
    pub fn is_hazard(&self) -> bool {
        matches!(self, SideCondition::Spikes | SideCondition::StickyWeb)
    }

    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for SideCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::Safeguard => "Safeguard",
            SideCondition::Tailwind => "Tailwind",
            SideCondition::Mist => "Mist",
            SideCondition::Spikes => "Spikes",
            SideCondition::StickyWeb => "Sticky Web",
        };
        write!(f, "{}", display_name)
    }
}
