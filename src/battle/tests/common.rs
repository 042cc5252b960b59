use crate::battle::state::{BattleState, TurnRng};
use crate::catalog::Catalog;
use crate::config::BattleRules;
use crate::creature::{CreatureInstance, StatusCondition};
use crate::errors::BattleResult;
use schema::{Ability, HeldItem, Move, Species};

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let pikachu = TestCreatureBuilder::new(Species::Pikachu, 50)
///     .with_moves(vec![Move::Thunderbolt])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    species: Species,
    level: u8,
    moves: Option<Vec<Move>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    max_hp: Option<u16>,
    item: Option<HeldItem>,
    ability: Option<Option<Ability>>,
}

impl TestCreatureBuilder {
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            moves: None,
            status: None,
            current_hp: None,
            max_hp: None,
            item: None,
            ability: None,
        }
    }

    /// Defaults to Tackle alone.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Overrides max HP for round-number scenarios. Applied before `with_hp`.
    pub fn with_max_hp(mut self, max_hp: u16) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    pub fn with_item(mut self, item: HeldItem) -> Self {
        self.item = Some(item);
        self
    }

    /// Replaces the species ability. `None` strips it.
    pub fn with_ability(mut self, ability: Option<Ability>) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn build(self) -> CreatureInstance {
        let moves = self.moves.unwrap_or_else(|| vec![Move::Tackle]);
        let mut creature = match CreatureInstance::new(self.species, self.level, &moves, Catalog::standard()) {
            Ok(creature) => creature,
            Err(err) => panic!("Failed to build {:?}: {}", self.species, err),
        };

        if let Some(max_hp) = self.max_hp {
            creature.set_max_hp(max_hp);
        }
        if let Some(hp) = self.current_hp {
            creature.set_hp(hp);
        }
        creature.status = self.status;
        creature.held_item = self.item;
        if let Some(ability) = self.ability {
            creature.ability = ability;
        }
        creature
    }
}

/// Creates a standard 1v1 singles battle for testing.
pub fn create_test_battle(player: CreatureInstance, enemy: CreatureInstance) -> BattleState {
    create_test_battle_with(vec![player], vec![enemy], BattleRules::default())
}

/// Creates a battle with full parties and custom rules.
pub fn create_test_battle_with(
    player_party: Vec<CreatureInstance>,
    enemy_party: Vec<CreatureInstance>,
    rules: BattleRules,
) -> BattleState {
    BattleState::new("test_battle", "Player", player_party, "Rival", enemy_party, rules)
}

/// A `TurnRng` with a long list of default values (50).
/// 50 hits every accuracy check, never crits and gives 92% damage variance.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Asserts that a Result is Ok and returns the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
