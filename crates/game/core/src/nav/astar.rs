//! A* search over the tile grid.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::state::{Grid, Position};

/// Scale of the cross-product tie-break added to the heuristic.
///
/// The term only orders entries whose integer cost is equal, so it biases the
/// search toward the straight start→goal line without ever trading path length
/// for straightness.
pub const TIE_BREAK_SCALE: f64 = 0.001;

/// Search switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathOptions {
    /// Lets the goal tile hold a living unit (used to path "into" a target).
    pub allow_occupied_goal: bool,
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    position: Position,
    /// `g + chebyshev(position, goal)`.
    cost: u32,
    tie_break: f64,
    g: u32,
    order: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier insertions win remaining ties.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.tie_break.total_cmp(&self.tie_break))
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest path from `start` to `goal`, both included.
///
/// Returns `None` when either end lies outside the grid, the goal is not
/// walkable or occupied, or no route exists.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Option<Vec<Position>> {
    find_path_with(grid, start, goal, PathOptions::default())
}

/// [`find_path`] with explicit [`PathOptions`].
pub fn find_path_with(
    grid: &Grid,
    start: Position,
    goal: Position,
    options: PathOptions,
) -> Option<Vec<Position>> {
    if !grid.contains(start) || !grid.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }
    if !options.allow_occupied_goal && !grid.is_passable(goal) {
        return None;
    }

    let heuristic = |position: Position| -> (u32, f64) {
        let dx1 = (position.x - goal.x) as f64;
        let dy1 = (position.y - goal.y) as f64;
        let dx2 = (start.x - goal.x) as f64;
        let dy2 = (start.y - goal.y) as f64;
        let cross = (dx1 * dy2 - dx2 * dy1).abs();
        (position.chebyshev_distance(goal), cross * TIE_BREAK_SCALE)
    };

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_scores: HashMap<Position, u32> = HashMap::new();
    let mut order = 0u64;

    let (h, tie_break) = heuristic(start);
    g_scores.insert(start, 0);
    open.push(OpenNode {
        position: start,
        cost: h,
        tie_break,
        g: 0,
        order,
    });

    while let Some(current) = open.pop() {
        if current.position == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        if g_scores
            .get(&current.position)
            .is_some_and(|&best| current.g > best)
        {
            continue;
        }

        for neighbor in grid.neighbors(current.position) {
            if !super::step_allowed(grid, current.position, neighbor) {
                continue;
            }
            let enterable = grid.is_passable(neighbor)
                || (neighbor == goal && options.allow_occupied_goal);
            if !enterable {
                continue;
            }

            let tentative = current.g + 1;
            if g_scores
                .get(&neighbor)
                .is_some_and(|&best| tentative >= best)
            {
                continue;
            }

            came_from.insert(neighbor, current.position);
            g_scores.insert(neighbor, tentative);
            order += 1;
            let (h, tie_break) = heuristic(neighbor);
            open.push(OpenNode {
                position: neighbor,
                cost: tentative + h,
                tie_break,
                g: tentative,
                order,
            });
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CoverKind, Tile, UnitId};

    fn assert_well_formed(grid: &Grid, path: &[Position], start: Position, goal: Position) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1, "non-adjacent step");
            assert!(super::super::step_allowed(grid, pair[0], pair[1]), "corner cut");
        }
    }

    #[test]
    fn diagonal_path_on_open_grid() {
        let grid = Grid::new(10, 10);
        let path = find_path(&grid, Position::new(0, 0), Position::new(3, 3)).unwrap();

        assert_eq!(
            path,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 2),
                Position::new(3, 3),
            ]
        );
    }

    #[test]
    fn tie_break_prefers_the_straight_line() {
        let grid = Grid::new(10, 10);
        let path = find_path(&grid, Position::new(0, 0), Position::new(6, 0)).unwrap();

        assert!(path.iter().all(|position| position.y == 0));
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn avoids_cutting_corners() {
        let mut grid = Grid::new(3, 3);
        grid.set_tile(Position::new(1, 0), Tile::obstacle(CoverKind::Full));

        let path = find_path(&grid, Position::new(0, 0), Position::new(1, 1)).unwrap();

        assert_eq!(path.len(), 3);
        assert_well_formed(&grid, &path, Position::new(0, 0), Position::new(1, 1));
    }

    #[test]
    fn routes_around_walls() {
        let mut grid = Grid::new(7, 7);
        for y in 0..6 {
            grid.set_tile(Position::new(3, y), Tile::obstacle(CoverKind::Full));
        }
        let start = Position::new(0, 0);
        let goal = Position::new(6, 0);

        let path = find_path(&grid, start, goal).unwrap();

        assert_well_formed(&grid, &path, start, goal);
        assert!(path.contains(&Position::new(3, 6)));
    }

    #[test]
    fn rejects_invalid_endpoints() {
        let mut grid = Grid::new(5, 5);
        grid.set_tile(Position::new(4, 4), Tile::obstacle(CoverKind::Half));

        assert!(find_path(&grid, Position::new(0, 0), Position::new(9, 9)).is_none());
        assert!(find_path(&grid, Position::new(-1, 0), Position::new(2, 2)).is_none());
        assert!(find_path(&grid, Position::new(0, 0), Position::new(4, 4)).is_none());
    }

    #[test]
    fn returns_none_when_enclosed() {
        let mut grid = Grid::new(5, 5);
        for position in grid.neighbors(Position::new(2, 2)) {
            grid.set_tile(position, Tile::obstacle(CoverKind::Full));
        }

        assert!(find_path(&grid, Position::new(0, 0), Position::new(2, 2)).is_none());
    }

    #[test]
    fn occupied_goal_requires_opt_in() {
        let mut grid = Grid::new(5, 5);
        grid.place_occupant(Position::new(3, 0), UnitId(1));
        let start = Position::new(0, 0);
        let goal = Position::new(3, 0);

        assert!(find_path(&grid, start, goal).is_none());

        let options = PathOptions {
            allow_occupied_goal: true,
        };
        let path = find_path_with(&grid, start, goal, options).unwrap();
        assert_well_formed(&grid, &path, start, goal);
    }

    #[test]
    fn every_reachable_pair_yields_a_well_formed_path() {
        let mut grid = Grid::new(6, 6);
        for (x, y) in [(2, 1), (2, 2), (2, 3), (4, 4), (1, 4)] {
            grid.set_tile(Position::new(x, y), Tile::obstacle(CoverKind::Full));
        }
        let positions: Vec<_> = grid.positions().collect();

        for &start in &positions {
            for &goal in &positions {
                if let Some(path) = find_path(&grid, start, goal) {
                    assert_well_formed(&grid, &path, start, goal);
                }
            }
        }
    }
}
