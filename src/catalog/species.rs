use schema::{Ability, BaseStats, CreatureType, Species, SpeciesData};
use std::collections::HashMap;

use Ability::*;
use CreatureType::*;

fn entry(types: &[CreatureType], base_stats: BaseStats, ability: Option<Ability>) -> SpeciesData {
    SpeciesData {
        types: types.to_vec(),
        base_stats,
        ability,
    }
}

pub(super) fn standard_species() -> HashMap<Species, SpeciesData> {
    HashMap::from([
        (Species::Pikachu, entry(&[Electric], BaseStats::new(35, 55, 40, 50, 50, 90), Some(Static))),
        (Species::Rattata, entry(&[Normal], BaseStats::new(30, 56, 35, 25, 35, 72), None)),
        (Species::Charizard, entry(&[Fire, Flying], BaseStats::new(78, 84, 78, 109, 85, 100), Some(Blaze))),
        (Species::Blastoise, entry(&[Water], BaseStats::new(79, 83, 100, 85, 105, 78), Some(Torrent))),
        (Species::Venusaur, entry(&[Grass, Poison], BaseStats::new(80, 82, 83, 100, 100, 80), Some(Overgrow))),
        (Species::Gengar, entry(&[Ghost, Poison], BaseStats::new(60, 65, 60, 130, 75, 110), Some(Levitate))),
        (Species::Snorlax, entry(&[Normal], BaseStats::new(160, 110, 65, 65, 110, 30), None)),
        (Species::Gyarados, entry(&[Water, Flying], BaseStats::new(95, 125, 79, 60, 100, 81), Some(Intimidate))),
        (Species::Garchomp, entry(&[Dragon, Ground], BaseStats::new(108, 130, 95, 80, 85, 102), Some(RoughSkin))),
        (Species::Tyranitar, entry(&[Rock, Dark], BaseStats::new(100, 134, 110, 95, 100, 61), Some(SandStream))),
        (Species::Politoed, entry(&[Water], BaseStats::new(90, 75, 75, 90, 100, 70), Some(Drizzle))),
        (Species::Ninetales, entry(&[Fire], BaseStats::new(73, 76, 75, 81, 100, 100), Some(Drought))),
        (Species::Abomasnow, entry(&[Grass, Ice], BaseStats::new(90, 92, 75, 92, 85, 60), Some(SnowWarning))),
        (Species::Kingdra, entry(&[Water, Dragon], BaseStats::new(75, 95, 95, 95, 95, 85), Some(SwiftSwim))),
        (Species::Castform, entry(&[Normal], BaseStats::new(70, 70, 70, 70, 70, 70), Some(Forecast))),
        (Species::Ninjask, entry(&[Bug, Flying], BaseStats::new(61, 90, 45, 50, 50, 160), Some(SpeedBoost))),
        (Species::Skarmory, entry(&[Steel, Flying], BaseStats::new(65, 80, 140, 40, 70, 70), Some(Sturdy))),
        (Species::Machamp, entry(&[Fighting], BaseStats::new(90, 130, 80, 65, 85, 55), None)),
        (Species::Alakazam, entry(&[Psychic], BaseStats::new(55, 50, 45, 135, 95, 120), None)),
        (Species::Greninja, entry(&[Water, Dark], BaseStats::new(72, 95, 67, 103, 71, 122), Some(Protean))),
        (Species::Salamence, entry(&[Dragon, Flying], BaseStats::new(95, 135, 80, 110, 80, 100), Some(Moxie))),
        (Species::TapuKoko, entry(&[Electric, Fairy], BaseStats::new(70, 115, 85, 95, 75, 130), Some(ElectricSurge))),
        (Species::Rillaboom, entry(&[Grass], BaseStats::new(100, 125, 90, 60, 70, 85), Some(GrassySurge))),
        (Species::Mudsdale, entry(&[Ground], BaseStats::new(100, 125, 100, 55, 85, 35), Some(Stamina))),
        (Species::Drampa, entry(&[Normal, Dragon], BaseStats::new(78, 60, 85, 135, 91, 36), Some(Berserk))),
        (Species::Excadrill, entry(&[Ground, Steel], BaseStats::new(110, 135, 60, 50, 65, 88), Some(SandRush))),
        (Species::Ludicolo, entry(&[Water, Grass], BaseStats::new(80, 70, 70, 90, 100, 70), Some(RainDish))),
        (Species::Glalie, entry(&[Ice], BaseStats::new(80, 80, 80, 80, 80, 80), Some(IceBody))),
    ])
}
