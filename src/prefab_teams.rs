use crate::catalog::Catalog;
use crate::creature::CreatureInstance;
use crate::errors::BattleResult;
use schema::{HeldItem, Move, Species};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Ready-made parties for demos and smoke tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PrefabTeam {
    Rain,
    Sun,
    Sand,
    Terrain,
    Hazards,
}

/// One party member: species, moves and an optional held item.
#[derive(Debug, Clone, Copy)]
pub struct PrefabMember {
    pub species: Species,
    pub moves: &'static [Move],
    pub item: Option<HeldItem>,
}

const fn member(species: Species, moves: &'static [Move], item: Option<HeldItem>) -> PrefabMember {
    PrefabMember { species, moves, item }
}

const RAIN: &[PrefabMember] = &[
    member(Species::Politoed, &[Move::Surf, Move::IceBeam, Move::Protect, Move::Toxic], Some(HeldItem::Leftovers)),
    member(Species::Kingdra, &[Move::Surf, Move::DragonClaw, Move::DragonDance, Move::IceBeam], Some(HeldItem::MysticWater)),
    member(Species::Ludicolo, &[Move::GigaDrain, Move::Surf, Move::LeechSeed, Move::Protect], Some(HeldItem::ShellBell)),
    member(Species::Gyarados, &[Move::Bite, Move::DragonDance, Move::Earthquake, Move::IronHead], Some(HeldItem::SitrusBerry)),
];

const SUN: &[PrefabMember] = &[
    member(Species::Ninetales, &[Move::Flamethrower, Move::WillOWisp, Move::SolarBeam, Move::Protect], Some(HeldItem::Charcoal)),
    member(Species::Venusaur, &[Move::SolarBeam, Move::Spore, Move::LeechSeed, Move::Earthquake], Some(HeldItem::MiracleSeed)),
    member(Species::Charizard, &[Move::Flamethrower, Move::Fly, Move::DragonClaw, Move::SunnyDay], Some(HeldItem::LifeOrb)),
    member(Species::Machamp, &[Move::FocusPunch, Move::KarateChop, Move::RockSlide, Move::Counter], Some(HeldItem::FocusSash)),
];

const SAND: &[PrefabMember] = &[
    member(Species::Tyranitar, &[Move::Crunch, Move::RockSlide, Move::Earthquake, Move::Pursuit], Some(HeldItem::WeaknessPolicy)),
    member(Species::Excadrill, &[Move::Earthquake, Move::IronHead, Move::SwordsDance, Move::RockSlide], Some(HeldItem::ChoiceScarf)),
    member(Species::Garchomp, &[Move::DragonClaw, Move::Dig, Move::Earthquake, Move::SwordsDance], Some(HeldItem::RockyHelmet)),
    member(Species::Skarmory, &[Move::Spikes, Move::WingAttack, Move::Counter, Move::Protect], Some(HeldItem::Leftovers)),
];

const TERRAIN: &[PrefabMember] = &[
    member(Species::TapuKoko, &[Move::Thunderbolt, Move::Moonblast, Move::LightScreen, Move::Protect], Some(HeldItem::Magnet)),
    member(Species::Rillaboom, &[Move::BulletSeed, Move::DoubleKick, Move::Tailwind, Move::GrassyTerrain], Some(HeldItem::MiracleSeed)),
    member(Species::Alakazam, &[Move::Psychic, Move::MirrorCoat, Move::PsychicTerrain, Move::Recover], Some(HeldItem::LifeOrb)),
    member(Species::Drampa, &[Move::HyperBeam, Move::DragonRage, Move::MistyTerrain, Move::Safeguard], None),
];

const HAZARDS: &[PrefabMember] = &[
    member(Species::Ninjask, &[Move::StickyWeb, Move::Spikes, Move::FurySwipes, Move::Protect], Some(HeldItem::FocusSash)),
    member(Species::Gengar, &[Move::ConfuseRay, Move::Psychic, Move::Toxic, Move::SeismicToss], Some(HeldItem::IronBall)),
    member(Species::Snorlax, &[Move::BodySlam, Move::DoubleEdge, Move::Recover, Move::Counter], Some(HeldItem::Leftovers)),
    member(Species::Glalie, &[Move::IceBeam, Move::Hail, Move::Mist, Move::Reflect], Some(HeldItem::SitrusBerry)),
];

impl PrefabTeam {
    pub fn description(&self) -> &'static str {
        match self {
            PrefabTeam::Rain => "Drizzle lead with Swift Swim and Rain Dish support",
            PrefabTeam::Sun => "Drought lead with instant Solar Beams",
            PrefabTeam::Sand => "Sand Stream lead with Sand Rush and Rough Skin",
            PrefabTeam::Terrain => "Electric and Grassy Surge with terrain-setting moves",
            PrefabTeam::Hazards => "Spikes and Sticky Web behind a bulky core",
        }
    }

    pub fn members(&self) -> &'static [PrefabMember] {
        match self {
            PrefabTeam::Rain => RAIN,
            PrefabTeam::Sun => SUN,
            PrefabTeam::Sand => SAND,
            PrefabTeam::Terrain => TERRAIN,
            PrefabTeam::Hazards => HAZARDS,
        }
    }

    /// Builds the party at the given level.
    pub fn build(&self, level: u8, catalog: &Catalog) -> BattleResult<Vec<CreatureInstance>> {
        self.members()
            .iter()
            .map(|m| {
                let creature = CreatureInstance::new(m.species, level, m.moves, catalog)?;
                Ok(match m.item {
                    Some(item) => creature.with_item(item),
                    None => creature,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_prefab_team_builds() {
        for team in PrefabTeam::iter() {
            let party = team.build(50, Catalog::standard()).unwrap();
            assert_eq!(party.len(), 4, "{} should have four members", team);
            assert!(party.iter().all(|c| c.can_battle()));
        }
    }

    #[test]
    fn test_names_parse_in_kebab_case() {
        assert_eq!(PrefabTeam::from_str("rain").unwrap(), PrefabTeam::Rain);
        assert_eq!(PrefabTeam::Hazards.to_string(), "hazards");
        assert!(PrefabTeam::from_str("snow").is_err());
    }
}
