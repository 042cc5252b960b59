use crate::{split_camel_case, CreatureType, SideCondition, StatType, Terrain, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Move {
    Tackle,
    Scratch,
    QuickAttack,
    ExtremeSpeed,
    BodySlam,
    DoubleEdge,
    HyperBeam,
    Ember,
    Flamethrower,
    WillOWisp,
    WaterGun,
    Surf,
    ThunderShock,
    Thunderbolt,
    ThunderWave,
    VineWhip,
    RazorLeaf,
    SolarBeam,
    GigaDrain,
    IceBeam,
    IcePunch,
    KarateChop,
    DoubleKick,
    FocusPunch,
    Counter,
    MirrorCoat,
    PoisonSting,
    Toxic,
    Earthquake,
    Dig,
    Fly,
    WingAttack,
    Psychic,
    ConfuseRay,
    Spore,
    Bite,
    Crunch,
    Pursuit,
    RockSlide,
    IronHead,
    DragonClaw,
    Moonblast,
    FurySwipes,
    BulletSeed,
    Protect,
    SwordsDance,
    DragonDance,
    Growl,
    DoubleTeam,
    Recover,
    RainDance,
    SunnyDay,
    Sandstorm,
    Hail,
    ElectricTerrain,
    GrassyTerrain,
    PsychicTerrain,
    MistyTerrain,
    Reflect,
    LightScreen,
    Safeguard,
    Tailwind,
    Mist,
    Spikes,
    StickyWeb,
    LeechSeed,
    SonicBoom,
    DragonRage,
    SeismicToss,
    Struggle,
    // Special "move" for confusion self-damage
    HittingItself,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::DoubleEdge => write!(f, "Double-Edge"),
            Move::WillOWisp => write!(f, "Will-O-Wisp"),
            Move::ExtremeSpeed => write!(f, "Extreme Speed"),
            _ => write!(f, "{}", split_camel_case(&format!("{:?}", self))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    User,
    Target,
}

/// Effects a move carries beyond its base damage. Chances are percentages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MoveEffect {
    Priority(i8),
    Burn(u8),
    Paralyze(u8),
    Poison(u8),
    BadlyPoison(u8),
    Sleep(u8),
    Freeze(u8),
    Flinch(u8),
    Confuse(u8),
    StatChange(Target, StatType, i8, u8),
    MultiHit(u8, u8), // min hits, max hits
    HighCrit,
    Heal(u8),   // percent of max HP
    Recoil(u8), // percent of damage dealt
    Drain(u8),  // percent of damage dealt
    SetWeather(Weather),
    SetTerrain(Terrain),
    SetSideCondition(SideCondition),
    Protect,
    ChargeUp,
    SemiInvulnerable,
    Recharge,
    FocusPunch,
    Pursuit,
    Counter,
    MirrorCoat,
    FixedDamage(u16),
    LevelDamage,
    LeechSeed,
    StruggleRecoil,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveData {
    pub move_type: CreatureType,
    pub category: MoveCategory,
    pub power: Option<u8>,
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    pub target: Target,
    pub makes_contact: bool,
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn new(
        move_type: CreatureType,
        category: MoveCategory,
        power: Option<u8>,
        accuracy: Option<u8>,
        max_pp: u8,
    ) -> Self {
        let target = if category == MoveCategory::Status {
            Target::User
        } else {
            Target::Target
        };
        Self {
            move_type,
            category,
            power,
            accuracy,
            max_pp,
            target,
            makes_contact: false,
            effects: Vec::new(),
        }
    }

    pub fn priority(&self) -> i8 {
        self.effects
            .iter()
            .find_map(|effect| match effect {
                MoveEffect::Priority(p) => Some(*p),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn has_effect(&self, wanted: &MoveEffect) -> bool {
        self.effects
            .iter()
            .any(|effect| std::mem::discriminant(effect) == std::mem::discriminant(wanted))
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }

    pub fn targets_opponent(&self) -> bool {
        self.target == Target::Target
    }

    /// Hit count bounds, (1, 1) for single-hit moves.
    pub fn hit_range(&self) -> (u8, u8) {
        self.effects
            .iter()
            .find_map(|effect| match effect {
                MoveEffect::MultiHit(min, max) => Some((*min, *max)),
                _ => None,
            })
            .unwrap_or((1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display_names() {
        assert_eq!(Move::SwordsDance.to_string(), "Swords Dance");
        assert_eq!(Move::DoubleEdge.to_string(), "Double-Edge");
        assert_eq!(Move::Tackle.to_string(), "Tackle");
    }

    #[test]
    fn test_priority_defaults_to_zero() {
        let mut data = MoveData::new(CreatureType::Normal, MoveCategory::Physical, Some(40), Some(100), 30);
        assert_eq!(data.priority(), 0);
        data.effects.push(MoveEffect::Priority(1));
        assert_eq!(data.priority(), 1);
        assert!(data.has_effect(&MoveEffect::Priority(0)));
    }

    #[test]
    fn test_status_moves_default_to_user_target() {
        let data = MoveData::new(CreatureType::Normal, MoveCategory::Status, None, None, 20);
        assert_eq!(data.target, Target::User);
        assert!(!data.is_damaging());
        assert_eq!(data.hit_range(), (1, 1));
    }
}
