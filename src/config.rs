//! Battle rules, loaded from RON.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleFormat {
    #[default]
    Singles,
    Doubles,
}

impl BattleFormat {
    /// Number of active slots each side fields.
    pub fn active_slots(&self) -> usize {
        match self {
            BattleFormat::Singles => 1,
            BattleFormat::Doubles => 2,
        }
    }
}

/// Tunable mechanics. Anything omitted from a rules file keeps its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BattleRules {
    pub format: BattleFormat,
    /// Turn limit after which the battle is declared a draw.
    pub max_turns: Option<u32>,
    pub weather_turns: u8,
    pub terrain_turns: u8,
    pub screen_turns: u8,
    pub tailwind_turns: u8,
    pub side_condition_turns: u8,
    pub toxic_cap: u8,
    pub confusion_self_hit_chance: u8,
    pub full_paralysis_chance: u8,
    pub freeze_thaw_chance: u8,
    pub sleep_turns: (u8, u8),
    pub confusion_turns: (u8, u8),
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            format: BattleFormat::Singles,
            max_turns: None,
            weather_turns: 5,
            terrain_turns: 5,
            screen_turns: 5,
            tailwind_turns: 4,
            side_condition_turns: 5,
            toxic_cap: 15,
            confusion_self_hit_chance: 33,
            full_paralysis_chance: 25,
            freeze_thaw_chance: 20,
            sleep_turns: (1, 3),
            confusion_turns: (2, 5),
        }
    }
}

impl BattleRules {
    pub fn doubles() -> Self {
        Self {
            format: BattleFormat::Doubles,
            ..Self::default()
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let rules = Self::from_ron_str(&source)?;
        tracing::debug!(path = %path.display(), format = ?rules.format, "loaded battle rules");
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_rules_keep_defaults() {
        let rules = BattleRules::from_ron_str("(format: Doubles, weather_turns: 8)").unwrap();
        assert_eq!(rules.format, BattleFormat::Doubles);
        assert_eq!(rules.weather_turns, 8);
        assert_eq!(rules.toxic_cap, 15);
        assert_eq!(rules.max_turns, None);
    }

    #[test]
    fn test_empty_rules_equal_default() {
        assert_eq!(BattleRules::from_ron_str("()").unwrap(), BattleRules::default());
    }

    #[test]
    fn test_malformed_rules_are_rejected() {
        let err = BattleRules::from_ron_str("(format: Triples)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = BattleRules::load("/definitely/not/here.ron").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("here.ron")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
