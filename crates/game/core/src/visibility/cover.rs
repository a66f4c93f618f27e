//! Cover a defender draws from the tiles around it.

use std::f32::consts::PI;

use arrayvec::ArrayVec;

use super::angle_diff;
use crate::config::CombatTables;
use crate::state::{CoverKind, Grid, Position};

/// Directional cover only protects when the attack is within this angle of its facing.
pub const DIRECTIONAL_COVER_ARC: f32 = 0.75 * PI;

/// Cover granted to a target against one attacker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverInfo {
    pub kind: CoverKind,
    /// Accuracy penalty in percentage points (non-negative).
    pub penalty: i32,
    /// Angle from the target toward the attacker, in radians.
    pub attack_angle: f32,
}

impl CoverInfo {
    pub fn is_covered(&self) -> bool {
        self.kind != CoverKind::None
    }
}

/// Computes the cover `target` enjoys against fire coming from `attacker`.
///
/// Only tiles on the attacker's side are considered: the horizontal and
/// vertical neighbours toward the attacker, plus the diagonal between them when
/// the attacker is off both axes. Walkable tiles never provide cover.
pub fn cover_at(
    grid: &Grid,
    target: Position,
    attacker: Position,
    tables: &CombatTables,
) -> CoverInfo {
    let attack_angle = target.angle_to(attacker);
    let sx = (attacker.x - target.x).signum();
    let sy = (attacker.y - target.y).signum();

    let mut candidates: ArrayVec<Position, 3> = ArrayVec::new();
    if sx != 0 {
        candidates.push(target.offset(sx, 0));
    }
    if sy != 0 {
        candidates.push(target.offset(0, sy));
    }
    if sx != 0 && sy != 0 {
        candidates.push(target.offset(sx, sy));
    }

    let mut kind = CoverKind::None;
    for candidate in candidates {
        let Some(tile) = grid.tile(candidate) else {
            continue;
        };
        if tile.walkable {
            continue;
        }
        match tile.cover {
            CoverKind::Full => {
                let faces_attack = tile
                    .cover_facing
                    .is_none_or(|facing| angle_diff(attack_angle, facing) < DIRECTIONAL_COVER_ARC);
                if faces_attack {
                    kind = CoverKind::Full;
                }
            }
            CoverKind::Half => {
                if kind != CoverKind::Full {
                    kind = CoverKind::Half;
                }
            }
            CoverKind::None => {}
        }
    }

    let penalty = match kind {
        CoverKind::None => 0,
        CoverKind::Half => tables.half_cover_penalty,
        CoverKind::Full => tables.full_cover_penalty,
    };

    CoverInfo {
        kind,
        penalty,
        attack_angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tile;

    fn tables() -> CombatTables {
        CombatTables::default()
    }

    #[test]
    fn open_ground_gives_no_cover() {
        let grid = Grid::new(10, 10);
        let cover = cover_at(&grid, Position::new(5, 5), Position::new(0, 0), &tables());

        assert_eq!(cover.kind, CoverKind::None);
        assert_eq!(cover.penalty, 0);
    }

    #[test]
    fn only_tiles_facing_the_attacker_count() {
        let mut grid = Grid::new(10, 10);
        grid.set_tile(Position::new(6, 5), Tile::obstacle(CoverKind::Half));

        let from_east = cover_at(&grid, Position::new(5, 5), Position::new(9, 5), &tables());
        let from_west = cover_at(&grid, Position::new(5, 5), Position::new(1, 5), &tables());

        assert_eq!(from_east.kind, CoverKind::Half);
        assert_eq!(from_east.penalty, 20);
        assert_eq!(from_west.kind, CoverKind::None);
    }

    #[test]
    fn full_cover_outranks_half_cover() {
        let mut grid = Grid::new(10, 10);
        grid.set_tile(Position::new(6, 5), Tile::obstacle(CoverKind::Full));
        grid.set_tile(Position::new(5, 6), Tile::obstacle(CoverKind::Half));

        let cover = cover_at(&grid, Position::new(5, 5), Position::new(9, 9), &tables());

        assert_eq!(cover.kind, CoverKind::Full);
        assert_eq!(cover.penalty, 40);
    }

    #[test]
    fn directional_wall_depends_on_attack_angle() {
        let mut grid = Grid::new(10, 10);
        grid.set_tile(Position::new(5, 4), Tile::wall(0.0));
        let target = Position::new(5, 5);

        let from_north = cover_at(&grid, target, Position::new(5, 0), &tables());
        assert_eq!(from_north.kind, CoverKind::Full);
        assert_eq!(from_north.penalty, 40);

        let from_west = cover_at(&grid, target, Position::new(0, 5), &tables());
        assert_eq!(from_west.kind, CoverKind::None);

        // North-west, but steep enough that the wall sits edge-on to the shot.
        let grazing = cover_at(&grid, target, Position::new(0, 1), &tables());
        assert!(angle_diff(grazing.attack_angle, 0.0) >= DIRECTIONAL_COVER_ARC);
        assert_eq!(grazing.kind, CoverKind::None);
    }

    #[test]
    fn walkable_cover_is_ignored() {
        let mut grid = Grid::new(10, 10);
        let mut crate_tile = Tile::open();
        crate_tile.cover = CoverKind::Half;
        grid.set_tile(Position::new(4, 5), crate_tile);

        let cover = cover_at(&grid, Position::new(5, 5), Position::new(0, 5), &tables());
        assert!(!cover.is_covered());
    }
}
