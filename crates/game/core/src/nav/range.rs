//! Reachable-tile computation for move legality.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::state::{Grid, Position, UnitState};

/// Tiles a unit can reach with a single move, excluding its own tile.
///
/// Step cost is uniform, so a depth-bounded breadth-first expansion suffices.
/// Only walkable, unoccupied tiles are entered and diagonal steps obey the same
/// corner rule as [`super::find_path`]. This set is the authoritative check for
/// move targets.
pub fn movement_range(grid: &Grid, unit: &UnitState) -> BTreeSet<Position> {
    let mut reachable = BTreeSet::new();
    if !unit.is_alive() {
        return reachable;
    }

    let origin = unit.position;
    let allowance = unit.stats.movement;
    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([(origin, 0u32)]);

    while let Some((position, depth)) = queue.pop_front() {
        if depth >= allowance {
            continue;
        }
        for neighbor in grid.neighbors(position) {
            if visited.contains(&neighbor)
                || !grid.is_passable(neighbor)
                || !super::step_allowed(grid, position, neighbor)
            {
                continue;
            }
            visited.insert(neighbor);
            reachable.insert(neighbor);
            queue.push_back((neighbor, depth + 1));
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{find_path, path_length};
    use crate::state::{CoverKind, Faction, GameState, Tile, UnitFlags, UnitId, UnitStats};

    fn state_with_unit(movement: u32) -> (GameState, UnitId) {
        let mut grid = Grid::new(9, 9);
        for y in 1..8 {
            grid.set_tile(Position::new(5, y), Tile::obstacle(CoverKind::Full));
        }
        grid.set_tile(Position::new(2, 3), Tile::obstacle(CoverKind::Half));
        let mut state = GameState::new(grid, Faction::Blue, 0);
        let stats = UnitStats {
            movement,
            ..UnitStats::default()
        };
        let id = state.spawn_unit(Faction::Blue, "scout", stats, Position::new(3, 4), 0.0);
        state.spawn_unit(
            Faction::Red,
            "scout",
            UnitStats::default(),
            Position::new(4, 4),
            0.0,
        );
        (state, id)
    }

    #[test]
    fn open_field_range_is_a_square() {
        let mut state = GameState::new(Grid::new(11, 11), Faction::Blue, 0);
        let id = state.spawn_unit(
            Faction::Blue,
            "scout",
            UnitStats {
                movement: 2,
                ..UnitStats::default()
            },
            Position::new(5, 5),
            0.0,
        );

        let range = movement_range(&state.grid, state.unit(id).unwrap());

        assert_eq!(range.len(), 24);
        assert!(!range.contains(&Position::new(5, 5)));
        assert!(range.contains(&Position::new(7, 7)));
        assert!(!range.contains(&Position::new(8, 5)));
    }

    #[test]
    fn every_reachable_tile_has_a_short_enough_path() {
        let (state, id) = state_with_unit(3);
        let unit = state.unit(id).unwrap();

        let range = movement_range(&state.grid, unit);

        assert!(!range.is_empty());
        for tile in &range {
            assert!(state.grid.is_passable(*tile));
            let path = find_path(&state.grid, unit.position, *tile).expect("reachable tile");
            assert!(path_length(&path) <= unit.stats.movement);
        }
    }

    #[test]
    fn occupied_and_blocked_tiles_are_excluded() {
        let (state, id) = state_with_unit(3);
        let range = movement_range(&state.grid, state.unit(id).unwrap());

        assert!(!range.contains(&Position::new(4, 4)));
        assert!(!range.contains(&Position::new(2, 3)));
        assert!(!range.contains(&Position::new(5, 4)));
    }

    #[test]
    fn range_is_idempotent() {
        let (state, id) = state_with_unit(4);
        let unit = state.unit(id).unwrap();

        assert_eq!(
            movement_range(&state.grid, unit),
            movement_range(&state.grid, unit)
        );
    }

    #[test]
    fn dead_units_cannot_move() {
        let (mut state, id) = state_with_unit(4);
        state.expect_unit_mut(id).flags.remove(UnitFlags::ALIVE);

        assert!(movement_range(&state.grid, state.unit(id).unwrap()).is_empty());
    }
}
