use crate::side::{SideId, SlotRef};
use schema::{Move, Species};
use thiserror::Error;

/// Main error type for the creature battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to move data lookup or processing
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to species data lookup or processing
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to loading battle rules
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to move data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the catalog
    #[error("Move not found: {0:?}")]
    MoveNotFound(Move),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the catalog
    #[error("Species not found: {0:?}")]
    SpeciesNotFound(Species),
    #[error("Species {0:?} cannot know more than four moves")]
    TooManyMoves(Species),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// No active creature found when one was expected
    #[error("No active creature at {0}")]
    NoActiveCreature(SlotRef),
    #[error("Slot {0} does not exist in this format")]
    InvalidSlot(SlotRef),
    #[error("Invalid party index {index} for {side:?}")]
    InvalidPartyIndex { side: SideId, index: usize },
    #[error("The battle is already over")]
    BattleFinished,
    #[error("Fainted creatures must be replaced before the next turn")]
    AwaitingReplacements,
    #[error("No replacement is pending for {0}")]
    NoReplacementPending(SlotRef),
    /// Battle state is in an inconsistent or corrupted state
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    #[error("No move in slot {0}")]
    NoMoveInSlot(usize),
    #[error("Move in slot {0} has no PP remaining")]
    NoPpRemaining(usize),
    /// Party index is out of bounds
    #[error("Invalid party index: {0}")]
    InvalidPartyIndex(usize),
    #[error("Cannot switch to fainted creature at party index {0}")]
    SwitchTargetFainted(usize),
    #[error("Creature at party index {0} is already active")]
    AlreadyActive(usize),
    #[error("Invalid target: {0}")]
    InvalidTarget(SlotRef),
    #[error("Slot {0} has no creature able to act")]
    SlotNotActive(SlotRef),
    #[error("No action submitted for {0}")]
    MissingAction(SlotRef),
}

/// Errors related to loading battle rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Malformed rules: {0}")]
    Parse(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Type alias for Results using SpeciesDataError
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_convert_and_display() {
        let err: BattleEngineError = MoveDataError::MoveNotFound(Move::Tackle).into();
        assert_eq!(err.to_string(), "Move data error: Move not found: Tackle");

        let slot = SlotRef::new(SideId::Enemy, 1);
        let err: BattleEngineError = BattleStateError::NoActiveCreature(slot).into();
        assert_eq!(
            err.to_string(),
            "Battle state error: No active creature at enemy slot 1"
        );
    }
}
