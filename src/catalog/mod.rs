//! Immutable blueprint records for species and moves.

mod moves;
mod species;

use crate::errors::{MoveDataError, MoveDataResult, SpeciesDataError, SpeciesDataResult};
use schema::{Move, MoveData, Species, SpeciesData};
use std::collections::HashMap;
use std::sync::OnceLock;

static STANDARD_CATALOG: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    moves: HashMap<Move, MoveData>,
    species: HashMap<Species, SpeciesData>,
}

impl Catalog {
    pub fn new(moves: HashMap<Move, MoveData>, species: HashMap<Species, SpeciesData>) -> Self {
        Self { moves, species }
    }

    /// The built-in content, constructed on first use and shared for the life of the process.
    pub fn standard() -> &'static Catalog {
        STANDARD_CATALOG.get_or_init(|| {
            let catalog = Catalog::new(moves::standard_moves(), species::standard_species());
            tracing::debug!(
                moves = catalog.moves.len(),
                species = catalog.species.len(),
                "built standard catalog"
            );
            catalog
        })
    }

    pub fn move_data(&self, move_: Move) -> MoveDataResult<&MoveData> {
        self.moves
            .get(&move_)
            .ok_or(MoveDataError::MoveNotFound(move_))
    }

    pub fn species_data(&self, species: Species) -> SpeciesDataResult<&SpeciesData> {
        self.species
            .get(&species)
            .ok_or(SpeciesDataError::SpeciesNotFound(species))
    }

    /// Replaces or adds one move record. Used to stage custom scenarios.
    pub fn with_move(mut self, move_: Move, data: MoveData) -> Self {
        self.moves.insert(move_, data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::MoveCategory;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_move_has_data() {
        let catalog = Catalog::standard();
        for move_ in Move::iter() {
            assert!(catalog.move_data(move_).is_ok(), "missing data for {:?}", move_);
        }
    }

    #[test]
    fn test_every_species_has_data() {
        let catalog = Catalog::standard();
        for species in Species::iter() {
            let data = catalog.species_data(species).unwrap();
            assert!(!data.types.is_empty(), "{:?} has no types", species);
        }
    }

    #[test]
    fn test_missing_records_are_errors() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.move_data(Move::Tackle),
            Err(MoveDataError::MoveNotFound(Move::Tackle))
        );
        assert_eq!(
            catalog.species_data(Species::Pikachu),
            Err(SpeciesDataError::SpeciesNotFound(Species::Pikachu))
        );
    }

    #[test]
    fn test_with_move_overrides_record() {
        let catalog = Catalog::standard().clone().with_move(
            Move::Tackle,
            MoveData::new(schema::CreatureType::Normal, MoveCategory::Physical, Some(200), None, 5),
        );
        assert_eq!(catalog.move_data(Move::Tackle).unwrap().power, Some(200));
    }
}
