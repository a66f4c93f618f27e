//! Pathfinding and movement range.
//!
//! Both searches share the 8-directional step rule: every step costs 1, and a
//! diagonal step is forbidden when either orthogonal tile shared by its two
//! endpoints is not walkable.

mod astar;
mod range;

pub use astar::{PathOptions, TIE_BREAK_SCALE, find_path, find_path_with};
pub use range::movement_range;

use crate::state::{Grid, Position};

/// Whether a single step from `from` to the adjacent `to` respects the corner rule.
pub(crate) fn step_allowed(grid: &Grid, from: Position, to: Position) -> bool {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 || dy == 0 {
        return true;
    }
    grid.is_walkable(from.offset(dx, 0)) && grid.is_walkable(from.offset(0, dy))
}

/// Number of steps in a path (its tile count minus the start).
pub fn path_length(path: &[Position]) -> u32 {
    path.len().saturating_sub(1) as u32
}
