use std::collections::BTreeSet;

use super::{Faction, Position, UnitId};

bitflags::bitflags! {
    /// Lifecycle and stance flags carried by every unit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u8 {
        const ALIVE = 1 << 0;
        /// Already took its activation this turn.
        const ACTIVATED = 1 << 1;
        /// Holds one reactive shot against enemies entering its watch set.
        const OVERWATCHING = 1 << 2;
        /// Doubles cover-derived penalties against incoming fire.
        const HUNKERED = 1 << 3;
    }
}

/// Numeric stat block instantiated from an archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub max_hp: u32,
    pub current_hp: u32,
    pub action_points: u32,
    pub max_action_points: u32,
    /// Maximum number of steps a single move may take.
    pub movement: u32,
    pub ranged_damage: u32,
    pub melee_damage: u32,
    /// Base ranged hit chance in percentage points.
    pub ranged_accuracy: i32,
    /// Base melee hit chance in percentage points.
    pub melee_accuracy: i32,
    /// Maximum Chebyshev distance for ranged attacks.
    pub ranged_range: u32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_hp: 100,
            current_hp: 100,
            action_points: 2,
            max_action_points: 2,
            movement: 4,
            ranged_damage: 30,
            melee_damage: 40,
            ranged_accuracy: 70,
            melee_accuracy: 80,
            ranged_range: 8,
        }
    }
}

/// Gameplay record of a single unit. Rendering handles live outside the core,
/// keyed by [`UnitId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub faction: Faction,
    pub archetype: String,
    pub stats: UnitStats,
    pub position: Position,
    /// Facing angle in radians (`atan2` convention over grid coordinates).
    pub facing: f32,
    pub flags: UnitFlags,
    /// Tiles that trigger the reactive shot while `OVERWATCHING` is set.
    pub watched_tiles: BTreeSet<Position>,
}

impl UnitState {
    pub fn new(
        id: UnitId,
        faction: Faction,
        archetype: impl Into<String>,
        stats: UnitStats,
        position: Position,
    ) -> Self {
        Self {
            id,
            faction,
            archetype: archetype.into(),
            stats,
            position,
            facing: 0.0,
            flags: UnitFlags::ALIVE,
            watched_tiles: BTreeSet::new(),
        }
    }

    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = facing;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.flags.contains(UnitFlags::ALIVE)
    }

    pub fn is_activated(&self) -> bool {
        self.flags.contains(UnitFlags::ACTIVATED)
    }

    pub fn is_overwatching(&self) -> bool {
        self.flags.contains(UnitFlags::OVERWATCHING)
    }

    pub fn is_hunkered(&self) -> bool {
        self.flags.contains(UnitFlags::HUNKERED)
    }

    /// Living and still waiting for its activation this turn.
    pub fn is_ready(&self) -> bool {
        self.is_alive() && !self.is_activated()
    }

    pub fn is_enemy_of(&self, other: &UnitState) -> bool {
        self.faction != other.faction
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.stats.action_points > 0 && self.stats.action_points >= cost
    }

    /// Deducts action points. Callers check [`Self::can_afford`] first.
    pub(crate) fn spend_ap(&mut self, cost: u32) {
        assert!(
            self.stats.action_points >= cost,
            "unit {} cannot spend {} AP with {} remaining",
            self.id,
            cost,
            self.stats.action_points
        );
        self.stats.action_points -= cost;
    }

    /// Removes overwatch and hunker stances together with the watch set.
    pub(crate) fn clear_stances(&mut self) {
        self.flags.remove(UnitFlags::OVERWATCHING | UnitFlags::HUNKERED);
        self.watched_tiles.clear();
    }

    pub(crate) fn clear_overwatch(&mut self) {
        self.flags.remove(UnitFlags::OVERWATCHING);
        self.watched_tiles.clear();
    }
}
