use crate::side::SlotRef;
use schema::{CreatureType, Move};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Battle-temporary conditions held by a slot. Cleared whenever the occupant changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum VolatileStatus {
    Confused { turns_remaining: u8 },
    Protected,
    Flinched,
    Charging { move_: Move },
    SemiInvulnerable { move_: Move },
    Focusing,
    SwitchingOut,
    MustRecharge,
    Seeded { by: SlotRef },
    TypeChanged { types: Vec<CreatureType> },
}

/// Discriminant of a volatile status, used as the key in a slot's volatile map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VolatileKind {
    Confused,
    Protected,
    Flinched,
    Charging,
    SemiInvulnerable,
    Focusing,
    SwitchingOut,
    MustRecharge,
    Seeded,
    TypeChanged,
}

impl VolatileStatus {
    pub fn kind(&self) -> VolatileKind {
        match self {
            VolatileStatus::Confused { .. } => VolatileKind::Confused,
            VolatileStatus::Protected => VolatileKind::Protected,
            VolatileStatus::Flinched => VolatileKind::Flinched,
            VolatileStatus::Charging { .. } => VolatileKind::Charging,
            VolatileStatus::SemiInvulnerable { .. } => VolatileKind::SemiInvulnerable,
            VolatileStatus::Focusing => VolatileKind::Focusing,
            VolatileStatus::SwitchingOut => VolatileKind::SwitchingOut,
            VolatileStatus::MustRecharge => VolatileKind::MustRecharge,
            VolatileStatus::Seeded { .. } => VolatileKind::Seeded,
            VolatileStatus::TypeChanged { .. } => VolatileKind::TypeChanged,
        }
    }

    /// The move a slot is locked into next turn, if any.
    pub fn locked_move(&self) -> Option<Move> {
        match self {
            VolatileStatus::Charging { move_ } | VolatileStatus::SemiInvulnerable { move_ } => {
                Some(*move_)
            }
            _ => None,
        }
    }
}

impl VolatileKind {
    /// Conditions that only last until the end of the turn they were applied.
    pub fn is_single_turn(&self) -> bool {
        matches!(
            self,
            VolatileKind::Protected
                | VolatileKind::Flinched
                | VolatileKind::Focusing
                | VolatileKind::SwitchingOut
        )
    }
}

impl fmt::Display for VolatileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolatileKind::Confused => "confusion",
            VolatileKind::Protected => "protection",
            VolatileKind::Flinched => "flinching",
            VolatileKind::Charging => "charging",
            VolatileKind::SemiInvulnerable => "semi-invulnerability",
            VolatileKind::Focusing => "focus",
            VolatileKind::SwitchingOut => "switching out",
            VolatileKind::MustRecharge => "recharging",
            VolatileKind::Seeded => "Leech Seed",
            VolatileKind::TypeChanged => "type change",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            VolatileStatus::Confused { turns_remaining: 3 }.kind(),
            VolatileKind::Confused
        );
        assert_eq!(
            VolatileStatus::Charging { move_: Move::SolarBeam }.locked_move(),
            Some(Move::SolarBeam)
        );
        assert_eq!(VolatileStatus::Protected.locked_move(), None);
    }

    #[test]
    fn test_single_turn_kinds() {
        assert!(VolatileKind::Protected.is_single_turn());
        assert!(VolatileKind::Flinched.is_single_turn());
        assert!(!VolatileKind::Confused.is_single_turn());
        assert!(!VolatileKind::Seeded.is_single_turn());
    }
}
