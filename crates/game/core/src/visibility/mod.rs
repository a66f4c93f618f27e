//! Line of sight and cover.
//!
//! Both queries are pure reads of the [`Grid`](crate::state::Grid). Units never
//! obstruct sightlines; only non-walkable tiles carrying cover do.

mod cover;
mod line;

pub use cover::{CoverInfo, DIRECTIONAL_COVER_ARC, cover_at};
pub use line::{LineStatus, LineTrace, crossed_tiles, trace_line};

use std::f32::consts::{PI, TAU};

/// Absolute difference between two angles, normalised to `[0, π]`.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI { TAU - diff } else { diff }
}
