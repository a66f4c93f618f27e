//! Computer-controlled activations.
//!
//! The engine does not decide anything for the AI faction. A host supplies an
//! [`ActivationPlanner`] that picks the unit and its action; the engine then
//! executes the plan through the same entry points the player uses.

use crate::combat::{AttackKind, AttackResult};
use crate::config::TacticsConfig;
use crate::state::{Faction, GameState, Phase, Position, UnitId};

use super::{ActionError, GameEngine, MoveOutcome};

/// The single action an AI unit takes in its activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiAction {
    Melee { target: UnitId },
    Shoot { target: UnitId },
    Move { to: Position },
    /// Move, then shoot if the shot is still legal from the new tile.
    MoveThenShoot { to: Position, target: UnitId },
    EndActivation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationPlan {
    pub unit: UnitId,
    pub action: AiAction,
}

/// Decision policy for computer-controlled factions.
///
/// Implementations read the state and must not assume anything about the
/// order in which they are consulted beyond one `select_unit` followed by one
/// `plan` per activation.
pub trait ActivationPlanner {
    /// Picks the unit to activate, or `None` when the faction has nobody ready.
    fn select_unit(
        &self,
        state: &GameState,
        config: &TacticsConfig,
        faction: Faction,
    ) -> Option<UnitId>;

    /// Chooses the action for a unit that has just been activated.
    fn plan(&self, state: &GameState, config: &TacticsConfig, unit: UnitId) -> ActivationPlan;
}

/// What happened during one AI activation.
#[derive(Clone, Debug, PartialEq)]
pub struct AiActivationReport {
    pub unit: UnitId,
    pub action: AiAction,
    pub movement: Option<MoveOutcome>,
    pub attack: Option<AttackResult>,
    /// Set when the engine refused the planned action; the activation still ends.
    pub rejected: Option<ActionError>,
}

impl AiActivationReport {
    fn new(unit: UnitId, action: AiAction) -> Self {
        Self {
            unit,
            action,
            movement: None,
            attack: None,
            rejected: None,
        }
    }
}

impl GameEngine<'_> {
    /// Runs one activation for the faction holding the AI window.
    pub fn run_ai_activation(
        &mut self,
        planner: &dyn ActivationPlanner,
    ) -> Result<AiActivationReport, ActionError> {
        self.ensure_phase("run_ai_activation", &[Phase::AiTurn])?;
        let faction = self.state.turn.active_faction;

        let id = planner
            .select_unit(self.state, self.config, faction)
            .ok_or(ActionError::NoReadyUnit { faction })?;
        let unit = self.state.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        if unit.faction != faction {
            return Err(ActionError::NotOwnUnit {
                unit: id,
                faction: unit.faction,
            });
        }
        if !unit.is_ready() {
            return Err(ActionError::UnitNotReady(id));
        }

        self.begin_activation(id);
        let plan = planner.plan(self.state, self.config, id);
        assert_eq!(plan.unit, id, "planner returned a plan for another unit");
        tracing::debug!("AI unit {} plans {:?}", id, plan.action);

        let mut report = AiActivationReport::new(id, plan.action);
        if let Err(err) = self.execute_plan(id, plan.action, &mut report) {
            tracing::debug!("AI plan for unit {} rejected: {}", id, err);
            report.rejected = Some(err);
        }

        if !self.state.turn.phase.is_terminal() {
            self.finish_activation(id);
        }
        Ok(report)
    }

    fn execute_plan(
        &mut self,
        id: UnitId,
        action: AiAction,
        report: &mut AiActivationReport,
    ) -> Result<(), ActionError> {
        match action {
            AiAction::Melee { target } => {
                report.attack = Some(self.perform_attack(id, target, AttackKind::Melee)?);
            }
            AiAction::Shoot { target } => {
                report.attack = Some(self.perform_attack(id, target, AttackKind::Ranged)?);
            }
            AiAction::Move { to } => {
                report.movement = Some(self.perform_move(id, to)?);
            }
            AiAction::MoveThenShoot { to, target } => {
                report.movement = Some(self.perform_move(id, to)?);
                if self.state.turn.phase.is_terminal() || !self.state.expect_unit(id).is_alive() {
                    return Ok(());
                }
                // The follow-up shot is re-validated from the new tile and
                // silently dropped if it is no longer legal.
                match self.perform_attack(id, target, AttackKind::Ranged) {
                    Ok(result) => report.attack = Some(result),
                    Err(err) => tracing::debug!("AI unit {} drops follow-up shot: {}", id, err),
                }
            }
            AiAction::EndActivation => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{Scripted, battle, sure_hit_config};
    use crate::state::{CoverKind, Tile};

    /// Blue player at (0,0); red AI at (9,0). Red has the window after blue ends.
    fn ai_window(config: &TacticsConfig, setup: impl FnOnce(&mut GameState)) -> GameState {
        let mut state = battle(
            10,
            10,
            &[(Faction::Blue, 0, 0), (Faction::Red, 9, 0), (Faction::Blue, 0, 9)],
        );
        setup(&mut state);
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, config, &mut events);
        engine.start().unwrap();
        engine.select_unit(UnitId(0)).unwrap();
        engine.end_activation().unwrap();
        assert_eq!(engine.phase(), Phase::AiTurn);
        state
    }

    #[test]
    fn ai_move_then_shoot_fires_when_legal() {
        let config = sure_hit_config();
        let mut state = ai_window(&config, |state| {
            state.expect_unit_mut(UnitId(1)).stats.ranged_accuracy = 100;
        });
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);

        let planner = Scripted(AiAction::MoveThenShoot {
            to: Position::new(6, 0),
            target: UnitId(0),
        });
        let report = engine.run_ai_activation(&planner).unwrap();

        assert_eq!(report.unit, UnitId(1));
        assert_eq!(report.movement.as_ref().unwrap().reached, Position::new(6, 0));
        assert!(report.attack.as_ref().unwrap().hit);
        assert!(report.rejected.is_none());
        let red = engine.state().unit(UnitId(1)).unwrap();
        assert_eq!(red.stats.action_points, 0);
        assert!(red.is_activated());
        assert_eq!(engine.phase(), Phase::PlayerSelectUnit);
    }

    #[test]
    fn follow_up_shot_is_dropped_when_blocked() {
        let config = TacticsConfig::default();
        let mut state = ai_window(&config, |state| {
            state
                .grid
                .set_tile(Position::new(3, 0), Tile::obstacle(CoverKind::Full));
        });
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);

        let planner = Scripted(AiAction::MoveThenShoot {
            to: Position::new(6, 0),
            target: UnitId(0),
        });
        let report = engine.run_ai_activation(&planner).unwrap();

        assert!(report.movement.is_some());
        assert!(report.attack.is_none());
        assert!(report.rejected.is_none());
        assert_eq!(engine.state().nonce, 0);
        assert!(engine.state().unit(UnitId(1)).unwrap().is_activated());
    }

    #[test]
    fn rejected_plan_still_ends_the_activation() {
        let config = TacticsConfig::default();
        let mut state = ai_window(&config, |_| {});
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);

        let report = engine
            .run_ai_activation(&Scripted(AiAction::Melee { target: UnitId(0) }))
            .unwrap();

        assert!(matches!(
            report.rejected,
            Some(ActionError::TargetOutOfRange { distance: 9, .. })
        ));
        assert!(engine.state().unit(UnitId(1)).unwrap().is_activated());
        assert_eq!(engine.state().unit(UnitId(1)).unwrap().stats.action_points, 2);
    }

    #[test]
    fn ai_activation_requires_ai_window() {
        let mut state = battle(10, 10, &[(Faction::Blue, 0, 0), (Faction::Red, 9, 0)]);
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);
        engine.start().unwrap();

        assert!(matches!(
            engine.run_ai_activation(&Scripted(AiAction::EndActivation)),
            Err(ActionError::WrongPhase {
                phase: Phase::PlayerSelectUnit,
                ..
            })
        ));
    }
}
