//! Scenario blueprints supplied by the map loader.
//!
//! A scenario is consumed exactly once by [`crate::GameState::from_scenario`].
//! The core performs no I/O; `tactics-content` builds these from data files.

use crate::state::{CoverKind, Faction, Position, Tile, UnitStats};

/// Complete description of a battle before it starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioSpec {
    pub width: u32,
    pub height: u32,
    /// Tiles that differ from open floor. Unlisted tiles are walkable with no cover.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tiles: Vec<TileSpec>,
    pub archetypes: Vec<ArchetypeSpec>,
    /// Units to spawn, assigned to their faction's spawn-zone tiles in row-major order.
    pub rosters: Vec<RosterEntry>,
    pub player_faction: Faction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
}

/// Per-tile layout override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_walkable"))]
    pub walkable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover: CoverKind,
    /// Facing of directional cover in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover_facing_degrees: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawn_zone: Option<Faction>,
}

#[cfg(feature = "serde")]
fn default_walkable() -> bool {
    true
}

impl TileSpec {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn to_tile(&self) -> Tile {
        Tile {
            walkable: self.walkable,
            cover: self.cover,
            cover_facing: self.cover_facing_degrees.map(f32::to_radians),
            elevation: self.elevation,
            spawn_zone: self.spawn_zone,
            occupant: None,
        }
    }
}

/// Named stat template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeSpec {
    pub name: String,
    pub max_hp: u32,
    pub max_action_points: u32,
    pub movement: u32,
    pub ranged_damage: u32,
    pub melee_damage: u32,
    pub ranged_accuracy: i32,
    pub melee_accuracy: i32,
    pub ranged_range: u32,
}

impl ArchetypeSpec {
    /// Fresh stats at full HP and AP.
    pub fn stats(&self) -> UnitStats {
        UnitStats {
            max_hp: self.max_hp,
            current_hp: self.max_hp,
            action_points: self.max_action_points,
            max_action_points: self.max_action_points,
            movement: self.movement,
            ranged_damage: self.ranged_damage,
            melee_damage: self.melee_damage,
            ranged_accuracy: self.ranged_accuracy,
            melee_accuracy: self.melee_accuracy,
            ranged_range: self.ranged_range,
        }
    }
}

/// One unit to place at scenario start.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    pub faction: Faction,
    pub archetype: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub facing_degrees: f32,
}
