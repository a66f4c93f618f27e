//! Read-only view of the battle from one AI unit's point of view.

use tactics_core::{
    GameState, Position, TacticsConfig, TargetInfo, UnitId, UnitState, valid_targets,
};

/// Context for AI decision-making about a single unit.
///
/// The `'a` lifetime ties the context to the state snapshot it was built
/// from; planning is synchronous, so nothing outlives the call.
pub struct AiContext<'a> {
    /// The unit making the decision.
    pub unit: &'a UnitState,

    /// Read-only access to the current game state.
    pub state: &'a GameState,

    pub config: &'a TacticsConfig,
}

impl<'a> AiContext<'a> {
    /// Builds a context for `id`, or `None` if no such unit exists.
    pub fn new(id: UnitId, state: &'a GameState, config: &'a TacticsConfig) -> Option<Self> {
        let unit = state.unit(id)?;
        Some(Self {
            unit,
            state,
            config,
        })
    }

    /// Living enemies in unit-id order.
    pub fn enemies(&self) -> impl Iterator<Item = &'a UnitState> + '_ {
        self.state
            .living_units(self.unit.faction.opponent())
    }

    /// Straight-line distance from `from` to the closest living enemy.
    pub fn nearest_enemy_distance(&self, from: Position) -> Option<f32> {
        self.enemies()
            .map(|enemy| from.euclidean_distance(enemy.position))
            .min_by(f32::total_cmp)
    }

    /// Smallest Chebyshev distance from the unit to a living enemy.
    pub fn min_enemy_distance(&self) -> Option<u32> {
        self.enemies()
            .map(|enemy| self.unit.position.chebyshev_distance(enemy.position))
            .min()
    }

    /// Legal melee targets, in the shared hit-chance order.
    pub fn melee_targets(&self) -> Vec<TargetInfo> {
        self.targets(true)
    }

    /// Legal ranged targets, in the shared hit-chance order.
    pub fn ranged_targets(&self) -> Vec<TargetInfo> {
        self.targets(false)
    }

    /// Current HP of a target, or `u32::MAX` if it cannot be found.
    pub fn target_hp(&self, target: &TargetInfo) -> u32 {
        self.state
            .unit(target.unit)
            .map_or(u32::MAX, |unit| unit.stats.current_hp)
    }

    /// Whether the unit's own tile offers no cover.
    pub fn is_exposed(&self) -> bool {
        self.state
            .grid
            .tile(self.unit.position)
            .is_some_and(|tile| !tile.has_cover())
    }

    fn targets(&self, melee: bool) -> Vec<TargetInfo> {
        valid_targets(
            self.unit,
            self.state.units(),
            &self.state.grid,
            &self.config.combat,
            melee,
        )
    }
}
