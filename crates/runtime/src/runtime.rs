//! Synchronous session host.
//!
//! The runtime owns the battle state, the rules configuration, the event queue
//! and the planner driving the AI faction. Every call runs one engine
//! operation to completion; presentation layers drain events in between.

use std::collections::BTreeSet;

use tactics_core::{
    ActionError, ActivationPlanner, AiAction, AiActivationReport, AttackResult, EventQueue,
    Faction, GameEngine, GameEvent, GameState, MoveOutcome, Phase, Position, ScenarioSpec,
    TacticsConfig, UnitId,
};

use crate::api::{Result, RuntimeError};
use crate::providers::TacticalAi;

/// Outcome of a headless [`Runtime::autoplay`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoplaySummary {
    /// Activations played across both factions.
    pub activations: u32,
    /// Turn number when the run stopped.
    pub turn: u32,
    pub winner: Option<Faction>,
}

/// Main runtime that hosts one battle.
///
/// Design: the runtime owns all mutable data and builds a short-lived
/// [`GameEngine`] over it for each call.
pub struct Runtime {
    state: GameState,
    config: TacticsConfig,
    events: EventQueue,
    planner: Box<dyn ActivationPlanner>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &TacticsConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    pub fn winner(&self) -> Option<Faction> {
        self.state.turn.winner
    }

    /// Deep copy of the state for what-if exploration.
    pub fn preview(&self) -> GameState {
        self.state.clone()
    }

    /// Removes and returns every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Removes the oldest pending event, for hosts that animate one at a time.
    pub fn next_event(&mut self) -> Option<GameEvent> {
        self.events.pop()
    }

    /// Pending events in emission order, left in the queue.
    pub fn peek_events(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.events.iter()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Replace the AI planner
    pub fn set_planner(&mut self, planner: impl ActivationPlanner + 'static) {
        self.planner = Box::new(planner);
    }

    fn engine(&mut self) -> GameEngine<'_> {
        GameEngine::new(&mut self.state, &self.config, &mut self.events)
    }

    // ========================================================================
    // Player operations
    // ========================================================================

    /// Starts turn 1. If the AI faction somehow holds the first window it
    /// is played immediately.
    pub fn start(&mut self) -> Result<Vec<AiActivationReport>> {
        self.engine().start()?;
        tracing::info!(
            "Battle started: {} units, player faction {}",
            self.state.units().len(),
            self.state.turn.player_faction
        );
        self.advance_ai()
    }

    pub fn select_unit(&mut self, id: UnitId) -> Result<()> {
        Ok(self.engine().select_unit(id)?)
    }

    pub fn deselect(&mut self) -> Result<()> {
        Ok(self.engine().deselect()?)
    }

    pub fn begin_action(&mut self) -> Result<()> {
        Ok(self.engine().begin_action()?)
    }

    pub fn begin_move(&mut self) -> Result<()> {
        Ok(self.engine().begin_move()?)
    }

    pub fn move_selected(&mut self, destination: Position) -> Result<MoveOutcome> {
        Ok(self.engine().move_selected(destination)?)
    }

    pub fn shoot_selected(&mut self, target: UnitId) -> Result<AttackResult> {
        Ok(self.engine().shoot_selected(target)?)
    }

    pub fn melee_selected(&mut self, target: UnitId) -> Result<AttackResult> {
        Ok(self.engine().melee_selected(target)?)
    }

    pub fn overwatch_selected(&mut self) -> Result<BTreeSet<Position>> {
        Ok(self.engine().overwatch_selected()?)
    }

    pub fn overwatch_selected_tiles(
        &mut self,
        tiles: impl IntoIterator<Item = Position>,
    ) -> Result<()> {
        Ok(self.engine().overwatch_selected_tiles(tiles)?)
    }

    pub fn hunker_selected(&mut self) -> Result<()> {
        Ok(self.engine().hunker_selected()?)
    }

    pub fn end_activation(&mut self) -> Result<()> {
        Ok(self.engine().end_activation()?)
    }

    // ========================================================================
    // AI driving
    // ========================================================================

    /// Plays AI activations until the window returns to the player or the battle ends.
    pub fn advance_ai(&mut self) -> Result<Vec<AiActivationReport>> {
        let mut reports = Vec::new();
        while self.state.turn.phase == Phase::AiTurn {
            let report = GameEngine::new(&mut self.state, &self.config, &mut self.events)
                .run_ai_activation(self.planner.as_ref())?;
            reports.push(report);
        }
        Ok(reports)
    }

    /// Lets the planner drive both factions until the battle ends or
    /// `max_activations` activations have been played.
    ///
    /// Player-faction activations go through the same selection and action
    /// calls a human player would use.
    pub fn autoplay(&mut self, max_activations: u32) -> Result<AutoplaySummary> {
        if self.state.turn.phase == Phase::Loading {
            self.engine().start()?;
        }

        let mut activations = 0;
        while activations < max_activations && !self.state.turn.phase.is_terminal() {
            match self.state.turn.phase {
                Phase::AiTurn => {
                    GameEngine::new(&mut self.state, &self.config, &mut self.events)
                        .run_ai_activation(self.planner.as_ref())?;
                }
                Phase::PlayerSelectUnit => self.play_player_activation()?,
                // A half-finished manual activation is closed before autoplay takes over.
                Phase::PlayerMove | Phase::PlayerAction => {
                    self.engine().end_activation()?;
                    continue;
                }
                Phase::Loading | Phase::GameOver => break,
            }
            activations += 1;
        }

        let summary = AutoplaySummary {
            activations,
            turn: self.state.turn.number,
            winner: self.state.turn.winner,
        };
        tracing::info!(
            "Autoplay stopped after {} activations on turn {} (winner: {:?})",
            summary.activations,
            summary.turn,
            summary.winner
        );
        Ok(summary)
    }

    fn play_player_activation(&mut self) -> Result<()> {
        let faction = self.state.turn.active_faction;
        let id = self
            .planner
            .select_unit(&self.state, &self.config, faction)
            .ok_or(ActionError::NoReadyUnit { faction })?;
        self.engine().select_unit(id)?;

        let plan = self.planner.plan(&self.state, &self.config, id);
        tracing::debug!("Autoplay unit {} plans {:?}", id, plan.action);

        if let Err(err) = self.execute_player_plan(plan.action) {
            tracing::debug!("Autoplay plan for unit {} rejected: {}", id, err);
        }

        // Close the activation if the plan left it open.
        if self.state.turn.selected == Some(id) && !self.state.turn.phase.is_terminal() {
            self.engine().end_activation()?;
        }
        Ok(())
    }

    fn execute_player_plan(&mut self, action: AiAction) -> std::result::Result<(), ActionError> {
        let mut engine = GameEngine::new(&mut self.state, &self.config, &mut self.events);
        match action {
            AiAction::Melee { target } => {
                engine.begin_action()?;
                engine.melee_selected(target)?;
            }
            AiAction::Shoot { target } => {
                engine.begin_action()?;
                engine.shoot_selected(target)?;
            }
            AiAction::Move { to } => {
                engine.move_selected(to)?;
            }
            AiAction::MoveThenShoot { to, target } => {
                engine.move_selected(to)?;
                if engine.phase() == Phase::PlayerAction {
                    engine.shoot_selected(target)?;
                }
            }
            AiAction::EndActivation => {}
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: TacticsConfig,
    state: Option<GameState>,
    scenario: Option<ScenarioSpec>,
    planner: Option<Box<dyn ActivationPlanner>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: TacticsConfig::default(),
            state: None,
            scenario: None,
            planner: None,
        }
    }

    /// Override rules configuration
    pub fn config(mut self, config: TacticsConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide a ready-made initial state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the initial state from a scenario blueprint
    ///
    /// Ignored when an initial state is also provided.
    pub fn scenario(mut self, scenario: ScenarioSpec) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Set the AI planner (defaults to [`TacticalAi`])
    pub fn planner(mut self, planner: impl ActivationPlanner + 'static) -> Self {
        self.planner = Some(Box::new(planner));
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let state = match (self.state, self.scenario) {
            (Some(state), _) => state,
            (None, Some(scenario)) => GameState::from_scenario(&scenario)?,
            (None, None) => return Err(RuntimeError::MissingState),
        };
        let planner = self
            .planner
            .unwrap_or_else(|| Box::new(TacticalAi::new()));

        tracing::debug!(
            "Runtime built: {}x{} grid, seed {}",
            state.grid.width(),
            state.grid.height(),
            state.seed
        );

        Ok(Runtime {
            state,
            config: self.config,
            events: EventQueue::new(),
            planner,
        })
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{EventKind, Grid, UnitStats};

    use super::*;

    fn duel() -> GameState {
        let mut state = GameState::new(Grid::new(10, 10), Faction::Blue, 3);
        for (faction, x, y) in [(Faction::Blue, 0, 0), (Faction::Red, 9, 9)] {
            state.spawn_unit(
                faction,
                "rifleman",
                UnitStats::default(),
                Position::new(x, y),
                0.0,
            );
        }
        state
    }

    #[test]
    fn build_requires_state() {
        assert!(matches!(
            Runtime::builder().build(),
            Err(RuntimeError::MissingState)
        ));
    }

    #[test]
    fn player_turn_hands_over_to_ai() {
        let mut runtime = Runtime::builder().initial_state(duel()).build().unwrap();
        assert!(runtime.start().unwrap().is_empty());
        assert_eq!(runtime.phase(), Phase::PlayerSelectUnit);

        runtime.select_unit(UnitId(0)).unwrap();
        runtime.end_activation().unwrap();
        assert_eq!(runtime.phase(), Phase::AiTurn);

        let reports = runtime.advance_ai().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].unit, UnitId(1));
        assert_eq!(runtime.phase(), Phase::PlayerSelectUnit);
        assert_eq!(runtime.state().turn.number, 2);

        let events = runtime.drain_events();
        assert!(events.iter().any(|e| e.kind == EventKind::TurnStarted && e.turn == 2));
        assert_eq!(runtime.pending_events(), 0);
    }

    #[test]
    fn rejected_player_action_surfaces_as_action_error() {
        let mut runtime = Runtime::builder().initial_state(duel()).build().unwrap();
        runtime.start().unwrap();

        let err = runtime.shoot_selected(UnitId(1)).unwrap_err();
        assert!(matches!(
            err.as_action(),
            Some(ActionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn events_can_be_consumed_one_at_a_time() {
        let mut runtime = Runtime::builder().initial_state(duel()).build().unwrap();
        runtime.start().unwrap();

        let pending = runtime.pending_events();
        assert!(pending > 0);
        let first = runtime.peek_events().next().cloned().unwrap();
        assert_eq!(runtime.pending_events(), pending);
        assert_eq!(first.kind, EventKind::TurnStarted);

        assert_eq!(runtime.next_event(), Some(first));
        assert_eq!(runtime.pending_events(), pending - 1);

        let rest = runtime.drain_events();
        assert_eq!(rest.len(), pending - 1);
        assert_eq!(runtime.next_event(), None);
    }

    #[test]
    fn preview_is_detached() {
        let mut runtime = Runtime::builder().initial_state(duel()).build().unwrap();
        runtime.start().unwrap();

        let mut preview = runtime.preview();
        preview.nonce = 99;
        assert_eq!(runtime.state().nonce, 0);
    }
}
