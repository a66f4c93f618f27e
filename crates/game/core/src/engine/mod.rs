//! Activation state machine.
//!
//! The [`GameEngine`] is the only writer of [`GameState`]. It validates every
//! request against the current phase, the acting unit's AP, and the same nav,
//! visibility and combat queries exposed to the rest of the crate, then
//! applies the change and reports it through an [`EventSink`].
//!
//! Illegal requests come back as [`ActionError`] with the state untouched.
//! Broken bookkeeping (selecting a dead unit, occupancy desync) panics.

mod actions;
mod errors;
mod events;
mod movement;
mod planner;
mod turns;

pub use actions::overwatch_cone;
pub use errors::ActionError;
pub use events::{EventKind, EventQueue, EventSink, GameEvent};
pub use movement::{MoveOutcome, ReactionShot};
pub use planner::{ActivationPlan, ActivationPlanner, AiAction, AiActivationReport};

use crate::config::TacticsConfig;
use crate::env::{PcgRng, RngOracle, compute_seed};
use crate::state::{GameState, Phase, UnitId, UnitState};

/// Roll context for an attack taken during the attacker's own activation.
const ATTACK_ROLL: u32 = 0;
/// Roll context for a reactive overwatch shot.
const REACTION_ROLL: u32 = 1;

/// Borrowing facade that applies operations to a [`GameState`].
///
/// The engine holds no state of its own beyond the borrowed references, so
/// hosts may construct one per call.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a TacticsConfig,
    events: &'a mut dyn EventSink,
    rng: PcgRng,
}

impl<'a> GameEngine<'a> {
    pub fn new(
        state: &'a mut GameState,
        config: &'a TacticsConfig,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            state,
            config,
            events,
            rng: PcgRng,
        }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    pub fn config(&self) -> &TacticsConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    /// Player unit currently selected, if any.
    pub fn selected(&self) -> Option<UnitId> {
        self.state.turn.selected
    }

    fn ensure_phase(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), ActionError> {
        let phase = self.state.turn.phase;
        if phase.is_terminal() {
            return Err(ActionError::GameOver);
        }
        if !allowed.contains(&phase) {
            return Err(ActionError::WrongPhase { operation, phase });
        }
        Ok(())
    }

    fn selected_unit(&self) -> Result<UnitId, ActionError> {
        self.state.turn.selected.ok_or(ActionError::NoSelection)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.emit(event);
    }

    fn event(&self, kind: EventKind) -> GameEvent {
        GameEvent::new(kind, self.state.turn.number, self.state.turn.active_faction)
    }

    fn emit_unit(&mut self, kind: EventKind, unit: UnitId) {
        let event = self.event(kind).with_unit(unit);
        self.emit(event);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.turn.phase == phase {
            return;
        }
        tracing::debug!("Phase {} -> {}", self.state.turn.phase, phase);
        self.state.turn.phase = phase;
        let event = self.event(EventKind::PhaseChanged).with_phase(phase);
        self.emit(event);
    }

    /// Draws the next percentile roll and advances the nonce.
    fn roll_percent(&mut self, unit: UnitId, context: u32) -> u32 {
        let seed = compute_seed(self.state.seed, self.state.nonce, unit.0, context);
        self.state.nonce += 1;
        self.rng.roll_percent(seed)
    }
}

fn check_action_points(unit: &UnitState, cost: u32) -> Result<(), ActionError> {
    if unit.can_afford(cost) {
        Ok(())
    } else {
        Err(ActionError::InsufficientActionPoints {
            unit: unit.id,
            required: cost,
            available: unit.stats.action_points,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::TacticsConfig;
    use crate::state::{Faction, GameState, Grid, Phase, Position, UnitId, UnitStats};

    use super::{ActivationPlan, ActivationPlanner, AiAction};

    /// Blue-vs-red battle with default stats, blue as the player.
    pub fn battle(width: u32, height: u32, roster: &[(Faction, i32, i32)]) -> GameState {
        let mut state = GameState::new(Grid::new(width, height), Faction::Blue, 7);
        for &(faction, x, y) in roster {
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

    /// Hit chance pinned to 100%: every feasible attack hits.
    pub fn sure_hit_config() -> TacticsConfig {
        let mut config = TacticsConfig::default();
        config.combat.max_hit_chance = 100;
        config
    }

    /// Hit chance pinned to 0% for units with hopeless base accuracy.
    pub fn sure_miss_config() -> TacticsConfig {
        let mut config = TacticsConfig::default();
        config.combat.min_hit_chance = 0;
        config
    }

    pub fn phase_changes(events: &[super::GameEvent]) -> Vec<Phase> {
        events.iter().filter_map(|event| event.phase).collect()
    }

    /// Picks the first ready unit and always plays the same action.
    pub struct Scripted(pub AiAction);

    impl ActivationPlanner for Scripted {
        fn select_unit(
            &self,
            state: &GameState,
            _config: &TacticsConfig,
            faction: Faction,
        ) -> Option<UnitId> {
            state
                .living_units(faction)
                .find(|unit| unit.is_ready())
                .map(|unit| unit.id)
        }

        fn plan(&self, _state: &GameState, _config: &TacticsConfig, unit: UnitId) -> ActivationPlan {
            ActivationPlan {
                unit,
                action: self.0,
            }
        }
    }
}
