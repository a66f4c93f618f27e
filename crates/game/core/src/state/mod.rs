//! Authoritative game state representation.
//!
//! This module owns the grid, the unit roster and turn bookkeeping. Other
//! components read it freely; only [`crate::engine::GameEngine`] mutates it.
//! Callers that want "what-if" exploration clone the whole state.
pub mod grid;
pub mod types;

use std::collections::HashMap;

pub use grid::Grid;
pub use types::{
    CoverKind, Faction, Phase, Position, Tile, TurnState, UnitFlags, UnitId, UnitState, UnitStats,
};

use crate::env::ScenarioSpec;
use crate::error::{ErrorSeverity, GameError};

/// Errors raised while turning a scenario blueprint into a playable state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("map dimensions {width}x{height} are empty")]
    EmptyMap { width: u32, height: u32 },

    #[error("tile override at {position} lies outside the map")]
    TileOutOfBounds { position: Position },

    #[error("roster references unknown archetype `{name}`")]
    UnknownArchetype { name: String },

    #[error("faction {faction} has no units")]
    EmptyRoster { faction: Faction },

    #[error("faction {faction} needs {required} spawn tiles but only {available} are usable")]
    NotEnoughSpawnTiles {
        faction: Faction,
        required: usize,
        available: usize,
    },
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMap { .. } => "INIT_EMPTY_MAP",
            Self::TileOutOfBounds { .. } => "INIT_TILE_OUT_OF_BOUNDS",
            Self::UnknownArchetype { .. } => "INIT_UNKNOWN_ARCHETYPE",
            Self::EmptyRoster { .. } => "INIT_EMPTY_ROSTER",
            Self::NotEnoughSpawnTiles { .. } => "INIT_NOT_ENOUGH_SPAWN_TILES",
        }
    }
}

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed, set once at scenario construction.
    pub seed: u64,
    /// Number of hit rolls taken so far. Mixed into every roll seed.
    pub nonce: u64,
    pub grid: Grid,
    /// Every unit ever spawned, in ascending id order. Dead units stay here.
    units: Vec<UnitState>,
    pub turn: TurnState,
}

impl GameState {
    /// Creates an empty battle on the given grid. Units are added with [`Self::spawn_unit`].
    pub fn new(grid: Grid, player_faction: Faction, seed: u64) -> Self {
        Self {
            seed,
            nonce: 0,
            grid,
            units: Vec::new(),
            turn: TurnState::new(player_faction),
        }
    }

    /// Builds the initial state from a scenario blueprint.
    ///
    /// Units are placed on the walkable spawn-zone tiles of their faction in
    /// row-major order, in the order they appear in the roster.
    pub fn from_scenario(spec: &ScenarioSpec) -> Result<Self, InitializationError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(InitializationError::EmptyMap {
                width: spec.width,
                height: spec.height,
            });
        }

        let mut grid = Grid::new(spec.width, spec.height);
        for tile in &spec.tiles {
            let position = tile.position();
            if !grid.set_tile(position, tile.to_tile()) {
                return Err(InitializationError::TileOutOfBounds { position });
            }
        }

        let archetypes: HashMap<&str, _> = spec
            .archetypes
            .iter()
            .map(|archetype| (archetype.name.as_str(), archetype))
            .collect();

        let mut state = Self::new(grid, spec.player_faction, spec.seed);

        for faction in Faction::ALL {
            let entries: Vec<_> = spec
                .rosters
                .iter()
                .filter(|entry| entry.faction == faction)
                .collect();
            if entries.is_empty() {
                return Err(InitializationError::EmptyRoster { faction });
            }

            let spawns: Vec<Position> = state
                .grid
                .positions()
                .filter(|&position| {
                    state.grid.tile(position).is_some_and(|tile| {
                        tile.spawn_zone == Some(faction) && tile.is_passable()
                    })
                })
                .collect();
            if spawns.len() < entries.len() {
                return Err(InitializationError::NotEnoughSpawnTiles {
                    faction,
                    required: entries.len(),
                    available: spawns.len(),
                });
            }

            for (entry, position) in entries.into_iter().zip(spawns) {
                let archetype = archetypes.get(entry.archetype.as_str()).ok_or_else(|| {
                    InitializationError::UnknownArchetype {
                        name: entry.archetype.clone(),
                    }
                })?;
                state.spawn_unit(
                    faction,
                    &archetype.name,
                    archetype.stats(),
                    position,
                    entry.facing_degrees.to_radians(),
                );
            }
        }

        Ok(state)
    }

    /// Adds a unit on a passable tile and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the tile is outside the grid, blocked, or already occupied.
    pub fn spawn_unit(
        &mut self,
        faction: Faction,
        archetype: &str,
        stats: UnitStats,
        position: Position,
        facing: f32,
    ) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.grid.place_occupant(position, id);
        self.units
            .push(UnitState::new(id, faction, archetype, stats, position).with_facing(facing));
        id
    }

    pub fn units(&self) -> &[UnitState] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id.0 as usize)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(id.0 as usize)
    }

    pub(crate) fn units_mut(&mut self) -> &mut [UnitState] {
        &mut self.units
    }

    /// Unit record for an id the caller already validated.
    pub(crate) fn expect_unit(&self, id: UnitId) -> &UnitState {
        self.unit(id)
            .unwrap_or_else(|| panic!("unit {id} is not part of this battle"))
    }

    pub(crate) fn expect_unit_mut(&mut self, id: UnitId) -> &mut UnitState {
        self.unit_mut(id)
            .unwrap_or_else(|| panic!("unit {id} is not part of this battle"))
    }

    /// Living unit standing on the given tile.
    pub fn unit_at(&self, position: Position) -> Option<&UnitState> {
        self.grid
            .occupant(position)
            .and_then(|id| self.unit(id))
    }

    pub fn living_units(&self, faction: Faction) -> impl Iterator<Item = &UnitState> + '_ {
        self.units
            .iter()
            .filter(move |unit| unit.faction == faction && unit.is_alive())
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.living_units(faction).count()
    }

    /// Whether the faction still has a living unit that has not activated this turn.
    pub fn has_ready_unit(&self, faction: Faction) -> bool {
        self.living_units(faction).any(UnitState::is_ready)
    }

    /// Verifies the tile→unit and unit→tile bookkeeping agree.
    ///
    /// # Panics
    ///
    /// Panics on the first disagreement found.
    pub fn assert_consistent(&self) {
        for unit in &self.units {
            let occupant = self.grid.occupant(unit.position);
            if unit.is_alive() {
                assert_eq!(
                    occupant,
                    Some(unit.id),
                    "living unit {} not registered on its tile {}",
                    unit.id,
                    unit.position
                );
            } else {
                assert_ne!(
                    occupant,
                    Some(unit.id),
                    "dead unit {} still occupies {}",
                    unit.id,
                    unit.position
                );
            }
        }
        for position in self.grid.positions() {
            if let Some(id) = self.grid.occupant(position) {
                let unit = self.expect_unit(id);
                assert!(
                    unit.is_alive() && unit.position == position,
                    "tile {position} references unit {id} located at {}",
                    unit.position
                );
            }
        }
    }
}
