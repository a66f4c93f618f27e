//! Terminal actions: attacks, overwatch and hunker down.

use std::collections::BTreeSet;

use crate::combat::{
    AttackEvaluation, AttackKind, AttackResult, apply_damage, evaluate_melee, evaluate_ranged,
};
use crate::config::TacticsConfig;
use crate::state::{Grid, Phase, Position, UnitFlags, UnitId, UnitState};
use crate::visibility::{angle_diff, trace_line};

use super::{ATTACK_ROLL, ActionError, EventKind, GameEngine, check_action_points};

/// Tiles a unit would watch if it went on overwatch now.
///
/// The cone is centred on the unit's facing, `overwatch_cone_degrees` wide,
/// limited to its ranged range, and keeps only walkable tiles with an
/// unblocked sightline.
pub fn overwatch_cone(grid: &Grid, unit: &UnitState, config: &TacticsConfig) -> BTreeSet<Position> {
    let half_cone = config.actions.overwatch_cone_degrees.to_radians() / 2.0;
    let origin = unit.position;

    grid.positions()
        .filter(|&tile| tile != origin && grid.is_walkable(tile))
        .filter(|&tile| origin.chebyshev_distance(tile) <= unit.stats.ranged_range)
        .filter(|&tile| angle_diff(origin.angle_to(tile), unit.facing) <= half_cone)
        .filter(|&tile| !trace_line(grid, origin, tile, &config.combat).is_blocked())
        .collect()
}

impl GameEngine<'_> {
    /// Ranged attack by the selected unit. Ends the activation.
    pub fn shoot_selected(&mut self, target: UnitId) -> Result<AttackResult, ActionError> {
        self.attack_selected(target, AttackKind::Ranged)
    }

    /// Melee attack by the selected unit. Ends the activation.
    pub fn melee_selected(&mut self, target: UnitId) -> Result<AttackResult, ActionError> {
        self.attack_selected(target, AttackKind::Melee)
    }

    /// Puts the selected unit on overwatch over its facing cone. Ends the activation.
    ///
    /// Returns the watched tiles.
    pub fn overwatch_selected(&mut self) -> Result<BTreeSet<Position>, ActionError> {
        self.ensure_phase("overwatch", &[Phase::PlayerAction])?;
        let id = self.selected_unit()?;

        let tiles = overwatch_cone(&self.state.grid, self.state.expect_unit(id), self.config);
        self.perform_overwatch(id, tiles.clone())?;
        self.finish_activation(id);
        Ok(tiles)
    }

    /// Puts the selected unit on overwatch over an explicit tile set. Ends the activation.
    pub fn overwatch_selected_tiles(
        &mut self,
        tiles: impl IntoIterator<Item = Position>,
    ) -> Result<(), ActionError> {
        self.ensure_phase("overwatch", &[Phase::PlayerAction])?;
        let id = self.selected_unit()?;

        self.perform_overwatch(id, tiles.into_iter().collect())?;
        self.finish_activation(id);
        Ok(())
    }

    /// Hunkers the selected unit down. Ends the activation.
    pub fn hunker_selected(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("hunker", &[Phase::PlayerAction])?;
        let id = self.selected_unit()?;

        let cost = self.config.actions.hunker_cost;
        check_action_points(self.state.expect_unit(id), cost)?;
        let unit = self.state.expect_unit_mut(id);
        unit.spend_ap(cost);
        unit.flags.insert(UnitFlags::HUNKERED);
        tracing::debug!("Unit {} hunkers down", id);

        self.finish_activation(id);
        Ok(())
    }

    fn attack_selected(
        &mut self,
        target: UnitId,
        kind: AttackKind,
    ) -> Result<AttackResult, ActionError> {
        let operation = match kind {
            AttackKind::Ranged => "shoot",
            AttackKind::Melee => "melee",
        };
        self.ensure_phase(operation, &[Phase::PlayerAction])?;
        let id = self.selected_unit()?;

        let result = self.perform_attack(id, target, kind)?;
        if !self.state.turn.phase.is_terminal() {
            self.finish_activation(id);
        }
        Ok(result)
    }

    /// Validates, rolls and applies one attack.
    ///
    /// A failed precheck is an illegal action: nothing is spent or rolled.
    pub(super) fn perform_attack(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        kind: AttackKind,
    ) -> Result<AttackResult, ActionError> {
        let cost = self.config.actions.attack_cost;
        let shooter = self
            .state
            .unit(attacker)
            .ok_or(ActionError::UnknownUnit(attacker))?;
        check_action_points(shooter, cost)?;
        let victim = self
            .state
            .unit(target)
            .filter(|victim| victim.is_alive() && victim.is_enemy_of(shooter))
            .ok_or(ActionError::InvalidTarget { attacker, target })?;

        let (evaluation, damage) = match kind {
            AttackKind::Ranged => (
                evaluate_ranged(shooter, victim, &self.state.grid, &self.config.combat),
                shooter.stats.ranged_damage,
            ),
            AttackKind::Melee => (
                evaluate_melee(shooter, victim, &self.config.combat),
                shooter.stats.melee_damage,
            ),
        };
        if !evaluation.feasible {
            return Err(rejection(attacker, target, &evaluation));
        }
        let victim_position = victim.position;

        let unit = self.state.expect_unit_mut(attacker);
        unit.spend_ap(cost);
        unit.facing = unit.position.angle_to(victim_position);

        let result = evaluation.roll(damage, || self.roll_percent(attacker, ATTACK_ROLL));
        tracing::debug!(
            "Unit {} {} attack on unit {}: {} ({}%, roll {:?})",
            attacker,
            kind,
            target,
            if result.hit { "hit" } else { "miss" },
            result.accuracy,
            result.roll
        );
        self.emit_unit(EventKind::AttackResolved, attacker);
        self.apply_hit(target, &result);
        Ok(result)
    }

    pub(super) fn perform_overwatch(
        &mut self,
        id: UnitId,
        tiles: BTreeSet<Position>,
    ) -> Result<(), ActionError> {
        let cost = self.config.actions.overwatch_cost;
        check_action_points(self.state.expect_unit(id), cost)?;

        tracing::debug!("Unit {} overwatches {} tiles", id, tiles.len());
        let unit = self.state.expect_unit_mut(id);
        unit.spend_ap(cost);
        unit.flags.insert(UnitFlags::OVERWATCHING);
        unit.watched_tiles = tiles;
        Ok(())
    }

    /// Applies a resolved attack's damage and handles a resulting death.
    pub(super) fn apply_hit(&mut self, target: UnitId, result: &AttackResult) {
        if result.damage == 0 {
            return;
        }
        if apply_damage(self.state.expect_unit_mut(target), result.damage) {
            self.on_unit_killed(target);
        }
    }
}

fn rejection(attacker: UnitId, target: UnitId, evaluation: &AttackEvaluation) -> ActionError {
    match evaluation.line {
        Some(line) if line.is_blocked() => ActionError::LineOfSightBlocked {
            attacker,
            target,
            blocking_tile: line.blocking_tile,
        },
        _ => ActionError::TargetOutOfRange {
            attacker,
            target,
            distance: evaluation.distance,
        },
    }
}
