//! Utility scores used by the tactical AI.
//!
//! Two questions get scored:
//!
//! 1. **Which unit acts?** [`score_unit`] rates every ready unit of the
//!    AI faction and the highest total wins.
//! 2. **Where does it move?** [`score_tile`] rates each reachable tile when the
//!    unit has nothing to attack from where it stands.
//!
//! Both keep their components separate so decisions can be logged and tested
//! term by term.

use tactics_core::{Position, UnitId, trace_line};

use super::AiContext;

/// Breakdown of a unit-selection score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitScore {
    /// Awarded when a melee target is available.
    pub melee: i32,
    /// Awarded when only ranged targets are available, larger for weaker targets.
    pub ranged: i32,
    /// Closer units score higher. Negative at long range.
    pub proximity: i32,
    /// Awarded when the unit's own tile has no cover.
    pub exposed: i32,
}

impl UnitScore {
    pub const fn value(&self) -> i32 {
        self.melee + self.ranged + self.proximity + self.exposed
    }
}

/// Scores one unit for activation priority.
pub fn score_unit(ctx: &AiContext) -> UnitScore {
    let weights = &ctx.config.ai;
    let mut score = UnitScore::default();

    if !ctx.melee_targets().is_empty() {
        score.melee = weights.melee_target_score;
    } else {
        let weakest = ctx
            .ranged_targets()
            .iter()
            .map(|target| ctx.target_hp(target))
            .min();
        if let Some(hp) = weakest {
            let hp = i32::try_from(hp).unwrap_or(i32::MAX);
            score.ranged =
                weights.ranged_target_score + weights.finishing_hp_reference.saturating_sub(hp);
        }
    }

    if let Some(distance) = ctx.min_enemy_distance() {
        let distance = i32::try_from(distance).unwrap_or(i32::MAX);
        score.proximity = weights
            .proximity_base
            .saturating_sub(distance)
            .saturating_mul(weights.proximity_scale);
    }

    if ctx.is_exposed() {
        score.exposed = weights.exposed_bonus;
    }

    score
}

/// Score of a candidate destination tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileScore {
    pub position: Position,
    pub value: f32,
    /// First enemy that could be shot from the tile.
    pub follow_up: Option<UnitId>,
}

/// Scores a tile the unit could move to.
///
/// Terms: distance to the nearest enemy times `distance_weight`, the full
/// `cover_weight` when any neighbouring tile has cover, half of it when the
/// tile itself has cover, and `los_weight` when some enemy is within ranged
/// range with an unblocked sightline.
pub fn score_tile(ctx: &AiContext, position: Position) -> TileScore {
    let weights = &ctx.config.ai;
    let grid = &ctx.state.grid;
    let mut value = 0.0;

    if let Some(distance) = ctx.nearest_enemy_distance(position) {
        value += distance * weights.distance_weight;
    }

    let sheltered = grid
        .neighbors(position)
        .into_iter()
        .any(|neighbor| grid.tile(neighbor).is_some_and(|tile| tile.has_cover()));
    if sheltered {
        value += weights.cover_weight;
    }
    if grid.tile(position).is_some_and(|tile| tile.has_cover()) {
        value += weights.cover_weight * 0.5;
    }

    let follow_up = ctx
        .enemies()
        .find(|enemy| {
            position.chebyshev_distance(enemy.position) <= ctx.unit.stats.ranged_range
                && !trace_line(grid, position, enemy.position, &ctx.config.combat).is_blocked()
        })
        .map(|enemy| enemy.id);
    if follow_up.is_some() {
        value += weights.los_weight;
    }

    TileScore {
        position,
        value,
        follow_up,
    }
}
