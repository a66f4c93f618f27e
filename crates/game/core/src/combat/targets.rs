//! Enumeration of attackable enemies.

use crate::config::CombatTables;
use crate::state::{Grid, Position, UnitId, UnitState};
use crate::visibility::{CoverInfo, LineTrace};

use super::hit::{evaluate_melee, evaluate_ranged};

/// An enemy the attacker could legally attack right now.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetInfo {
    pub unit: UnitId,
    pub position: Position,
    /// Chebyshev distance from the attacker.
    pub distance: u32,
    /// Would-be clamped accuracy.
    pub hit_chance: i32,
    pub cover: Option<CoverInfo>,
    pub line: Option<LineTrace>,
}

/// Lists living enemies that pass the attack precheck.
///
/// Results are sorted by hit chance (highest first), then distance (closest
/// first). The sort is stable, so remaining ties keep `units` order. Both the
/// player-facing target picker and the AI rely on this order.
///
/// # Arguments
///
/// * `attacker` - Unit that would attack
/// * `units` - Every unit in the battle; dead units and allies are skipped
/// * `grid` - Map used for sightlines and cover
/// * `tables` - Combat tunables
/// * `melee` - Evaluate melee instead of ranged attacks
pub fn valid_targets(
    attacker: &UnitState,
    units: &[UnitState],
    grid: &Grid,
    tables: &CombatTables,
    melee: bool,
) -> Vec<TargetInfo> {
    let mut targets: Vec<TargetInfo> = units
        .iter()
        .filter(|unit| unit.is_alive() && unit.is_enemy_of(attacker))
        .filter_map(|target| {
            let evaluation = if melee {
                evaluate_melee(attacker, target, tables)
            } else {
                evaluate_ranged(attacker, target, grid, tables)
            };
            evaluation.feasible.then(|| TargetInfo {
                unit: target.id,
                position: target.position,
                distance: evaluation.distance,
                hit_chance: evaluation.accuracy,
                cover: evaluation.cover,
                line: evaluation.line,
            })
        })
        .collect();

    targets.sort_by(|a, b| {
        b.hit_chance
            .cmp(&a.hit_chance)
            .then_with(|| a.distance.cmp(&b.distance))
    });
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CoverKind, Faction, Tile, UnitFlags, UnitStats};

    fn unit(id: u32, faction: Faction, x: i32, y: i32) -> UnitState {
        UnitState::new(
            UnitId(id),
            faction,
            "rifleman",
            UnitStats::default(),
            Position::new(x, y),
        )
        .with_facing(std::f32::consts::PI)
    }

    #[test]
    fn targets_sorted_by_hit_chance_then_distance() {
        let mut grid = Grid::new(12, 12);
        grid.set_tile(Position::new(5, 2), Tile::obstacle(CoverKind::Half));
        let units = vec![
            unit(0, Faction::Blue, 0, 2),
            unit(1, Faction::Red, 6, 2),
            unit(2, Faction::Red, 4, 0),
            unit(3, Faction::Red, 2, 0),
            unit(4, Faction::Blue, 1, 1),
        ];

        let targets = valid_targets(&units[0], &units, &grid, &CombatTables::default(), false);

        let ids: Vec<_> = targets.iter().map(|target| target.unit).collect();
        assert_eq!(ids, vec![UnitId(3), UnitId(2), UnitId(1)]);
        assert!(targets[2].hit_chance < targets[1].hit_chance);
    }

    #[test]
    fn excludes_dead_blocked_and_out_of_range_enemies() {
        let mut grid = Grid::new(20, 20);
        grid.set_tile(Position::new(0, 4), Tile::obstacle(CoverKind::Full));
        let mut dead = unit(2, Faction::Red, 3, 3);
        dead.flags.remove(UnitFlags::ALIVE);
        let units = vec![
            unit(0, Faction::Blue, 0, 0),
            unit(1, Faction::Red, 0, 6),
            dead,
            unit(3, Faction::Red, 15, 0),
            unit(4, Faction::Red, 5, 5),
        ];

        let targets = valid_targets(&units[0], &units, &grid, &CombatTables::default(), false);

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].unit, UnitId(4));
        assert!(targets[0].line.is_some());
    }

    #[test]
    fn melee_targets_are_adjacent() {
        let grid = Grid::new(5, 5);
        let units = vec![
            unit(0, Faction::Blue, 2, 2),
            unit(1, Faction::Red, 3, 3),
            unit(2, Faction::Red, 4, 2),
        ];

        let targets = valid_targets(&units[0], &units, &grid, &CombatTables::default(), true);

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].unit, UnitId(1));
        assert!(targets[0].cover.is_none());
    }
}
