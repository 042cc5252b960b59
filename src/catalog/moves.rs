use schema::{
    CreatureType, Move, MoveCategory, MoveData, MoveEffect, SideCondition, StatType, Target,
    Terrain, Weather,
};
use std::collections::HashMap;

use CreatureType::*;
use MoveCategory::{Physical, Special, Status};
use MoveEffect::{
    BadlyPoison, Burn, ChargeUp, Confuse, Counter, Drain, FixedDamage, Flinch, FocusPunch, Freeze,
    Heal, HighCrit, LeechSeed, LevelDamage, MirrorCoat, MultiHit, Paralyze, Priority, Protect,
    Pursuit, Recharge, Recoil, SemiInvulnerable, SetSideCondition, SetTerrain, SetWeather, Sleep,
    StatChange, StruggleRecoil,
};

fn damaging(
    move_type: CreatureType,
    category: MoveCategory,
    power: Option<u8>,
    accuracy: Option<u8>,
    max_pp: u8,
    makes_contact: bool,
    effects: Vec<MoveEffect>,
) -> MoveData {
    MoveData {
        makes_contact,
        effects,
        ..MoveData::new(move_type, category, power, accuracy, max_pp)
    }
}

fn status(
    move_type: CreatureType,
    accuracy: Option<u8>,
    max_pp: u8,
    target: Target,
    effects: Vec<MoveEffect>,
) -> MoveData {
    MoveData {
        target,
        effects,
        ..MoveData::new(move_type, Status, None, accuracy, max_pp)
    }
}

pub(super) fn standard_moves() -> HashMap<Move, MoveData> {
    let foe = Target::Target;
    let user = Target::User;

    HashMap::from([
        // Normal
        (Move::Tackle, damaging(Normal, Physical, Some(40), Some(100), 35, true, vec![])),
        (Move::Scratch, damaging(Normal, Physical, Some(40), Some(100), 35, true, vec![])),
        (Move::QuickAttack, damaging(Normal, Physical, Some(40), Some(100), 30, true, vec![Priority(1)])),
        (Move::ExtremeSpeed, damaging(Normal, Physical, Some(80), Some(100), 5, true, vec![Priority(2)])),
        (Move::BodySlam, damaging(Normal, Physical, Some(85), Some(100), 15, true, vec![Paralyze(30)])),
        (Move::DoubleEdge, damaging(Normal, Physical, Some(120), Some(100), 15, true, vec![Recoil(33)])),
        (Move::HyperBeam, damaging(Normal, Special, Some(150), Some(90), 5, false, vec![Recharge])),
        (Move::FurySwipes, damaging(Normal, Physical, Some(18), Some(80), 15, true, vec![MultiHit(2, 5)])),
        (Move::SonicBoom, damaging(Normal, Special, None, Some(90), 20, false, vec![FixedDamage(20)])),
        // Fire
        (Move::Ember, damaging(Fire, Special, Some(40), Some(100), 25, false, vec![Burn(10)])),
        (Move::Flamethrower, damaging(Fire, Special, Some(90), Some(100), 15, false, vec![Burn(10)])),
        (Move::WillOWisp, status(Fire, Some(85), 15, foe, vec![Burn(100)])),
        // Water
        (Move::WaterGun, damaging(Water, Special, Some(40), Some(100), 25, false, vec![])),
        (Move::Surf, damaging(Water, Special, Some(90), Some(100), 15, false, vec![])),
        // Electric
        (Move::ThunderShock, damaging(Electric, Special, Some(40), Some(100), 30, false, vec![Paralyze(10)])),
        (Move::Thunderbolt, damaging(Electric, Special, Some(90), Some(100), 15, false, vec![Paralyze(10)])),
        (Move::ThunderWave, status(Electric, Some(90), 20, foe, vec![Paralyze(100)])),
        // Grass
        (Move::VineWhip, damaging(Grass, Physical, Some(45), Some(100), 25, true, vec![])),
        (Move::RazorLeaf, damaging(Grass, Physical, Some(55), Some(95), 25, false, vec![HighCrit])),
        (Move::SolarBeam, damaging(Grass, Special, Some(120), Some(100), 10, false, vec![ChargeUp])),
        (Move::GigaDrain, damaging(Grass, Special, Some(75), Some(100), 10, false, vec![Drain(50)])),
        (Move::BulletSeed, damaging(Grass, Physical, Some(25), Some(100), 30, false, vec![MultiHit(2, 5)])),
        (Move::Spore, status(Grass, Some(100), 15, foe, vec![Sleep(100)])),
        (Move::LeechSeed, status(Grass, Some(90), 10, foe, vec![LeechSeed])),
        // Ice
        (Move::IceBeam, damaging(Ice, Special, Some(90), Some(100), 10, false, vec![Freeze(10)])),
        (Move::IcePunch, damaging(Ice, Physical, Some(75), Some(100), 15, true, vec![Freeze(10)])),
        // Fighting
        (Move::KarateChop, damaging(Fighting, Physical, Some(50), Some(100), 25, true, vec![HighCrit])),
        (Move::DoubleKick, damaging(Fighting, Physical, Some(30), Some(100), 30, true, vec![MultiHit(2, 2)])),
        (Move::FocusPunch, damaging(Fighting, Physical, Some(150), Some(100), 20, true, vec![Priority(-3), FocusPunch])),
        (Move::Counter, damaging(Fighting, Physical, None, Some(100), 20, true, vec![Priority(-5), Counter])),
        (Move::SeismicToss, damaging(Fighting, Physical, None, Some(100), 20, true, vec![LevelDamage])),
        // Poison
        (Move::PoisonSting, damaging(Poison, Physical, Some(15), Some(100), 35, false, vec![MoveEffect::Poison(30)])),
        (Move::Toxic, status(Poison, Some(90), 10, foe, vec![BadlyPoison(100)])),
        // Ground
        (Move::Earthquake, damaging(Ground, Physical, Some(100), Some(100), 10, false, vec![])),
        (Move::Dig, damaging(Ground, Physical, Some(80), Some(100), 10, true, vec![SemiInvulnerable])),
        // Flying
        (Move::Fly, damaging(Flying, Physical, Some(90), Some(95), 15, true, vec![SemiInvulnerable])),
        (Move::WingAttack, damaging(Flying, Physical, Some(60), Some(100), 35, true, vec![])),
        // Psychic
        (
            Move::Psychic,
            damaging(Psychic, Special, Some(90), Some(100), 10, false, vec![StatChange(foe, StatType::SpecialDefense, -1, 10)]),
        ),
        (Move::MirrorCoat, damaging(Psychic, Special, None, Some(100), 20, false, vec![Priority(-5), MirrorCoat])),
        // Ghost
        (Move::ConfuseRay, status(Ghost, Some(100), 10, foe, vec![Confuse(100)])),
        // Dark
        (Move::Bite, damaging(Dark, Physical, Some(60), Some(100), 25, true, vec![Flinch(30)])),
        (
            Move::Crunch,
            damaging(Dark, Physical, Some(80), Some(100), 15, true, vec![StatChange(foe, StatType::Defense, -1, 20)]),
        ),
        (Move::Pursuit, damaging(Dark, Physical, Some(40), Some(100), 20, true, vec![Pursuit])),
        // Rock / Steel / Dragon / Fairy
        (Move::RockSlide, damaging(Rock, Physical, Some(75), Some(90), 10, false, vec![Flinch(30)])),
        (Move::IronHead, damaging(Steel, Physical, Some(80), Some(100), 15, true, vec![Flinch(30)])),
        (Move::DragonClaw, damaging(Dragon, Physical, Some(80), Some(100), 15, true, vec![])),
        (Move::DragonRage, damaging(Dragon, Special, None, Some(100), 10, false, vec![FixedDamage(40)])),
        (
            Move::Moonblast,
            damaging(Fairy, Special, Some(95), Some(100), 15, false, vec![StatChange(foe, StatType::SpecialAttack, -1, 30)]),
        ),
        // Self-targeting status
        (Move::Protect, status(Normal, None, 10, user, vec![Priority(4), Protect])),
        (Move::SwordsDance, status(Normal, None, 20, user, vec![StatChange(user, StatType::Attack, 2, 100)])),
        (
            Move::DragonDance,
            status(
                Dragon,
                None,
                20,
                user,
                vec![
                    StatChange(user, StatType::Attack, 1, 100),
                    StatChange(user, StatType::Speed, 1, 100),
                ],
            ),
        ),
        (Move::Growl, status(Normal, Some(100), 40, foe, vec![StatChange(foe, StatType::Attack, -1, 100)])),
        (Move::DoubleTeam, status(Normal, None, 15, user, vec![StatChange(user, StatType::Evasion, 1, 100)])),
        (Move::Recover, status(Normal, None, 10, user, vec![Heal(50)])),
        // Field setters
        (Move::RainDance, status(Water, None, 5, user, vec![SetWeather(Weather::Rain)])),
        (Move::SunnyDay, status(Fire, None, 5, user, vec![SetWeather(Weather::Sun)])),
        (Move::Sandstorm, status(Rock, None, 10, user, vec![SetWeather(Weather::Sandstorm)])),
        (Move::Hail, status(Ice, None, 10, user, vec![SetWeather(Weather::Hail)])),
        (Move::ElectricTerrain, status(Electric, None, 10, user, vec![SetTerrain(Terrain::Electric)])),
        (Move::GrassyTerrain, status(Grass, None, 10, user, vec![SetTerrain(Terrain::Grassy)])),
        (Move::PsychicTerrain, status(Psychic, None, 10, user, vec![SetTerrain(Terrain::Psychic)])),
        (Move::MistyTerrain, status(Fairy, None, 10, user, vec![SetTerrain(Terrain::Misty)])),
        (Move::Reflect, status(Psychic, None, 20, user, vec![SetSideCondition(SideCondition::Reflect)])),
        (Move::LightScreen, status(Psychic, None, 30, user, vec![SetSideCondition(SideCondition::LightScreen)])),
        (Move::Safeguard, status(Normal, None, 25, user, vec![SetSideCondition(SideCondition::Safeguard)])),
        (Move::Tailwind, status(Flying, None, 15, user, vec![SetSideCondition(SideCondition::Tailwind)])),
        (Move::Mist, status(Ice, None, 30, user, vec![SetSideCondition(SideCondition::Mist)])),
        (Move::Spikes, status(Ground, None, 20, user, vec![SetSideCondition(SideCondition::Spikes)])),
        (Move::StickyWeb, status(Bug, None, 20, user, vec![SetSideCondition(SideCondition::StickyWeb)])),
        // Fallbacks
        (Move::Struggle, damaging(Typeless, Physical, Some(50), None, 1, true, vec![StruggleRecoil])),
        (Move::HittingItself, damaging(Typeless, Physical, Some(40), None, 1, false, vec![])),
    ])
}
