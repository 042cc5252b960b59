//! Creature Battle Engine
//!
//! Turn resolution and effect triggers for two-sided creature battles in singles or
//! doubles. Actions execute through a depth-first action/reaction stack; abilities,
//! held items, statuses and field conditions react through a shared trigger scan.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod creature;
pub mod errors;
pub mod prefab_teams;
pub mod side;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ability, BaseStats, CreatureType, HeldItem, Move, MoveCategory, MoveData, MoveEffect,
    SideCondition, Species, SpeciesData, StatType, Target, Terrain, Weather,
};

// --- From this crate's modules (`src/`) ---
pub use battle::ai::{FirstMoveProvider, ScoringAI, ScriptedProvider};
pub use battle::engine::{validate_player_action, valid_actions, ActionProvider, CombatEngine};
pub use battle::state::{BattleEvent, BattleOutcome, BattleState, EventBus, GameState, TurnRng};
pub use battle::view::{BattleView, NullView, TextView};
pub use catalog::Catalog;
pub use config::{BattleFormat, BattleRules};
pub use creature::{CreatureInstance, StatusCondition};
pub use prefab_teams::PrefabTeam;
pub use side::{PlayerAction, SideId, SlotRef};

pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, MoveDataError,
    MoveDataResult, SpeciesDataError, SpeciesDataResult,
};
