//! Tile-by-tile movement with reactive fire.

use crate::combat::{AttackResult, evaluate_ranged};
use crate::nav::{find_path, movement_range, path_length};
use crate::state::{Phase, Position, UnitId};

use super::{ActionError, EventKind, GameEngine, REACTION_ROLL, check_action_points};

/// A reactive shot taken while a unit was moving.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactionShot {
    pub shooter: UnitId,
    /// Tile the mover had just entered.
    pub tile: Position,
    pub result: AttackResult,
}

/// Result of a move request.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub unit: UnitId,
    /// Planned path, start tile included.
    pub path: Vec<Position>,
    /// Last tile the mover entered.
    pub reached: Position,
    /// `true` when reactive fire killed the mover before the destination.
    pub halted: bool,
    pub reactions: Vec<ReactionShot>,
}

impl MoveOutcome {
    pub fn completed(&self) -> bool {
        !self.halted && self.path.last() == Some(&self.reached)
    }
}

impl GameEngine<'_> {
    /// Moves the selected unit to `destination`.
    ///
    /// The destination must be in the unit's movement range. The move costs
    /// `move_cost` AP regardless of its length. Afterwards the unit goes to
    /// the action phase, or its activation ends if it has no AP left or did
    /// not survive the walk.
    pub fn move_selected(&mut self, destination: Position) -> Result<MoveOutcome, ActionError> {
        self.ensure_phase("move", &[Phase::PlayerMove])?;
        let id = self.selected_unit()?;

        let outcome = self.perform_move(id, destination)?;

        if self.state.turn.phase.is_terminal() {
            return Ok(outcome);
        }
        let unit = self.state.expect_unit(id);
        if !unit.is_alive() || unit.stats.action_points == 0 {
            self.finish_activation(id);
        } else {
            self.set_phase(Phase::PlayerAction);
        }
        Ok(outcome)
    }

    /// Validates and executes a move for any unit, without touching the phase.
    pub(super) fn perform_move(
        &mut self,
        id: UnitId,
        destination: Position,
    ) -> Result<MoveOutcome, ActionError> {
        let cost = self.config.actions.move_cost;
        let unit = self.state.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        check_action_points(unit, cost)?;

        let unreachable = ActionError::Unreachable {
            unit: id,
            destination,
        };
        if !movement_range(&self.state.grid, unit).contains(&destination) {
            return Err(unreachable);
        }
        let path = find_path(&self.state.grid, unit.position, destination).ok_or(unreachable)?;
        let steps = path_length(&path);
        if steps > unit.stats.movement {
            return Err(ActionError::PathTooLong {
                unit: id,
                steps,
                allowance: unit.stats.movement,
            });
        }
        assert_eq!(
            path.first(),
            Some(&unit.position),
            "path for unit {id} omits its start"
        );

        self.state.expect_unit_mut(id).spend_ap(cost);

        let mut reached = path[0];
        let mut halted = false;
        let mut reactions = Vec::new();
        for &step in &path[1..] {
            self.state.grid.move_occupant(id, reached, step);
            let unit = self.state.expect_unit_mut(id);
            unit.facing = reached.angle_to(step);
            unit.position = step;
            reached = step;

            if let Some(shot) = self.reactive_fire(id, step) {
                reactions.push(shot);
                if !self.state.expect_unit(id).is_alive() {
                    halted = true;
                    break;
                }
            }
        }

        tracing::debug!(
            "Unit {} moved {} steps to {} ({} reactions)",
            id,
            steps,
            reached,
            reactions.len()
        );
        self.emit_unit(EventKind::UnitMoved, id);

        Ok(MoveOutcome {
            unit: id,
            path,
            reached,
            halted,
            reactions,
        })
    }

    /// Lets the first eligible overwatcher fire on a unit that just entered `tile`.
    ///
    /// Overwatchers are tried in ascending id order; one whose shot fails the
    /// range or sightline precheck is skipped and keeps its stance.
    fn reactive_fire(&mut self, mover: UnitId, tile: Position) -> Option<ReactionShot> {
        let mover_faction = self.state.expect_unit(mover).faction;
        let watchers: Vec<UnitId> = self
            .state
            .units()
            .iter()
            .filter(|unit| {
                unit.is_alive()
                    && unit.faction != mover_faction
                    && unit.is_overwatching()
                    && unit.watched_tiles.contains(&tile)
            })
            .map(|unit| unit.id)
            .collect();

        for shooter in watchers {
            let attacker = self.state.expect_unit(shooter);
            let evaluation = evaluate_ranged(
                attacker,
                self.state.expect_unit(mover),
                &self.state.grid,
                &self.config.combat,
            );
            if !evaluation.feasible {
                continue;
            }
            let damage = attacker.stats.ranged_damage;

            let result = evaluation.roll(damage, || self.roll_percent(shooter, REACTION_ROLL));

            let unit = self.state.expect_unit_mut(shooter);
            unit.clear_overwatch();
            unit.facing = unit.position.angle_to(tile);
            tracing::debug!(
                "Unit {} reacts to unit {} at {}: {} ({}%)",
                shooter,
                mover,
                tile,
                if result.hit { "hit" } else { "miss" },
                result.accuracy
            );
            self.emit_unit(EventKind::ReactionFired, shooter);
            self.apply_hit(mover, &result);

            return Some(ReactionShot {
                shooter,
                tile,
                result,
            });
        }
        None
    }
}
