// Creature Battle Schema - Shared content definitions
// This crate holds the closed enumerations and blueprint records that the
// battle engine reads but never mutates: types, moves, species, abilities,
// held items and field conditions.

pub use battle_data::*;
pub use creature_types::*;
pub use moves::*;
pub use species::*;

pub mod battle_data;
pub mod creature_types;
pub mod moves;
pub mod species;

/// Turns a CamelCase variant name into spaced words ("SwordsDance" -> "Swords Dance").
pub fn split_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::split_camel_case;

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("Tackle"), "Tackle");
        assert_eq!(split_camel_case("SwordsDance"), "Swords Dance");
        assert_eq!(split_camel_case("FocusSash"), "Focus Sash");
    }
}
