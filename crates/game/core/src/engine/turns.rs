//! Turn start, activation windows, rollover and victory.

use crate::state::{Faction, Phase, UnitFlags, UnitId};

use super::{ActionError, EventKind, GameEngine};

impl GameEngine<'_> {
    /// Starts turn 1 with the player faction's activation window.
    pub fn start(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("start", &[Phase::Loading])?;

        let player = self.state.turn.player_faction;
        self.state.turn.number = 1;
        self.state.turn.activations = [0; 2];
        self.state.turn.active_faction = player;
        self.refresh_units();
        tracing::debug!("Battle started with {} units", self.state.units().len());
        self.emit(self.event(EventKind::TurnStarted));

        if self.check_victory() {
            return Ok(());
        }
        self.open_turn_window();
        Ok(())
    }

    /// Selects a player unit and opens its activation.
    ///
    /// Any overwatch or hunker stance the unit still holds from an earlier
    /// activation is dropped here.
    ///
    /// # Panics
    ///
    /// Panics if the unit is dead or already activated this turn.
    pub fn select_unit(&mut self, id: UnitId) -> Result<(), ActionError> {
        self.ensure_phase("select_unit", &[Phase::PlayerSelectUnit])?;

        let unit = self.state.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        if unit.faction != self.state.turn.player_faction {
            return Err(ActionError::NotOwnUnit {
                unit: id,
                faction: unit.faction,
            });
        }
        assert!(unit.is_alive(), "cannot select dead unit {id}");
        assert!(
            !unit.is_activated(),
            "unit {id} already activated in turn {}",
            self.state.turn.number
        );

        self.begin_activation(id);
        self.state.turn.selected = Some(id);
        self.set_phase(Phase::PlayerMove);
        Ok(())
    }

    /// Returns to unit selection. Only allowed before the unit spends any AP.
    pub fn deselect(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("deselect", &[Phase::PlayerMove, Phase::PlayerAction])?;
        let id = self.selected_unit()?;

        let stats = &self.state.expect_unit(id).stats;
        if stats.action_points < stats.max_action_points {
            return Err(ActionError::ActionPointsSpent(id));
        }

        self.state.turn.selected = None;
        self.set_phase(Phase::PlayerSelectUnit);
        Ok(())
    }

    /// Switches the selected unit from moving to acting.
    pub fn begin_action(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("begin_action", &[Phase::PlayerMove])?;
        self.selected_unit()?;
        self.set_phase(Phase::PlayerAction);
        Ok(())
    }

    /// Switches the selected unit back to moving.
    pub fn begin_move(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("begin_move", &[Phase::PlayerAction])?;
        self.selected_unit()?;
        self.set_phase(Phase::PlayerMove);
        Ok(())
    }

    /// Ends the selected unit's activation, keeping any AP it has left unused.
    pub fn end_activation(&mut self) -> Result<(), ActionError> {
        self.ensure_phase("end_activation", &[Phase::PlayerMove, Phase::PlayerAction])?;
        let id = self.selected_unit()?;
        self.finish_activation(id);
        Ok(())
    }

    pub(super) fn begin_activation(&mut self, id: UnitId) {
        self.state.expect_unit_mut(id).clear_stances();
        tracing::debug!(
            "Turn {}: {} activates unit {}",
            self.state.turn.number,
            self.state.turn.active_faction,
            id
        );
        self.emit_unit(EventKind::ActivationStarted, id);
    }

    /// Marks the unit activated and hands control to the next faction.
    pub(super) fn finish_activation(&mut self, id: UnitId) {
        let unit = self.state.expect_unit_mut(id);
        unit.flags.insert(UnitFlags::ACTIVATED);
        let faction = unit.faction;

        self.state.turn.activations[faction.index()] += 1;
        if self.state.turn.selected == Some(id) {
            self.state.turn.selected = None;
        }
        self.emit_unit(EventKind::ActivationEnded, id);

        if self.state.turn.phase.is_terminal() {
            return;
        }

        let opponent = faction.opponent();
        if self.state.has_ready_unit(opponent) {
            self.open_window(opponent);
        } else if self.state.has_ready_unit(faction) {
            self.open_window(faction);
        } else {
            self.rollover();
        }
    }

    fn open_window(&mut self, faction: Faction) {
        self.state.turn.active_faction = faction;
        let phase = if faction == self.state.turn.player_faction {
            Phase::PlayerSelectUnit
        } else {
            Phase::AiTurn
        };
        self.set_phase(phase);
    }

    /// Opens the first window of a turn: the player's, unless it has nobody ready.
    fn open_turn_window(&mut self) {
        let player = self.state.turn.player_faction;
        if self.state.has_ready_unit(player) {
            self.open_window(player);
        } else {
            self.open_window(player.opponent());
        }
    }

    fn rollover(&mut self) {
        self.state.turn.number += 1;
        self.state.turn.activations = [0; 2];
        self.state.turn.active_faction = self.state.turn.player_faction;
        self.refresh_units();
        tracing::debug!("Turn {} begins", self.state.turn.number);
        self.emit(self.event(EventKind::TurnStarted));
        self.open_turn_window();
    }

    /// Clears activation marks and refills AP. Stances are left alone.
    fn refresh_units(&mut self) {
        for unit in self.state.units_mut() {
            if unit.is_alive() {
                unit.flags.remove(UnitFlags::ACTIVATED);
                unit.stats.action_points = unit.stats.max_action_points;
            }
        }
    }

    /// Releases the tile of a freshly killed unit and checks for a winner.
    pub(super) fn on_unit_killed(&mut self, id: UnitId) {
        let position = self.state.expect_unit(id).position;
        self.state.grid.clear_occupant(position, id);
        tracing::debug!("Unit {} killed at {}", id, position);
        self.emit_unit(EventKind::UnitKilled, id);
        self.check_victory();
    }

    /// Ends the game once a faction has no living units. Returns whether the game is over.
    fn check_victory(&mut self) -> bool {
        if self.state.turn.phase.is_terminal() {
            return true;
        }
        let Some(loser) = Faction::ALL
            .into_iter()
            .find(|&faction| self.state.living_count(faction) == 0)
        else {
            return false;
        };

        let winner = loser.opponent();
        self.state.turn.winner = Some(winner);
        self.state.turn.selected = None;
        self.set_phase(Phase::GameOver);
        tracing::info!("Game over in turn {}: {} wins", self.state.turn.number, winner);
        let event = self.event(EventKind::GameOver).with_winner(winner);
        self.emit(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TacticsConfig;
    use crate::engine::fixtures::{Scripted, battle, phase_changes};
    use crate::engine::{ActionError, AiAction, EventKind, GameEngine, GameEvent};
    use crate::state::{Faction, Phase, UnitFlags, UnitId};

    #[test]
    fn start_opens_player_window_in_turn_one() {
        let mut state = battle(8, 8, &[(Faction::Blue, 0, 0), (Faction::Red, 7, 7)]);
        let config = TacticsConfig::default();
        let mut events: Vec<GameEvent> = Vec::new();

        GameEngine::new(&mut state, &config, &mut events).start().unwrap();

        assert_eq!(state.turn.number, 1);
        assert_eq!(state.turn.phase, Phase::PlayerSelectUnit);
        assert_eq!(state.turn.active_faction, Faction::Blue);
        assert_eq!(events[0].kind, EventKind::TurnStarted);
        assert_eq!(phase_changes(&events), vec![Phase::PlayerSelectUnit]);
    }

    #[test]
    fn operations_require_matching_phase() {
        let mut state = battle(8, 8, &[(Faction::Blue, 0, 0), (Faction::Red, 7, 7)]);
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);

        assert!(matches!(
            engine.select_unit(UnitId(0)),
            Err(ActionError::WrongPhase { phase: Phase::Loading, .. })
        ));
        engine.start().unwrap();
        assert!(matches!(engine.end_activation(), Err(ActionError::WrongPhase { .. })));
        assert_eq!(
            engine.select_unit(UnitId(1)),
            Err(ActionError::NotOwnUnit {
                unit: UnitId(1),
                faction: Faction::Red,
            })
        );
        assert_eq!(engine.select_unit(UnitId(9)), Err(ActionError::UnknownUnit(UnitId(9))));
    }

    #[test]
    #[should_panic(expected = "cannot select dead unit")]
    fn selecting_dead_unit_panics() {
        let mut state = battle(
            8,
            8,
            &[(Faction::Blue, 0, 0), (Faction::Blue, 1, 0), (Faction::Red, 7, 7)],
        );
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        GameEngine::new(&mut state, &config, &mut events).start().unwrap();
        state.expect_unit_mut(UnitId(1)).flags.remove(UnitFlags::ALIVE);

        let _ = GameEngine::new(&mut state, &config, &mut events).select_unit(UnitId(1));
    }

    #[test]
    fn deselect_only_before_spending_ap() {
        let mut state = battle(8, 8, &[(Faction::Blue, 0, 0), (Faction::Red, 7, 7)]);
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);
        engine.start().unwrap();

        engine.select_unit(UnitId(0)).unwrap();
        engine.deselect().unwrap();
        assert_eq!(engine.phase(), Phase::PlayerSelectUnit);

        engine.select_unit(UnitId(0)).unwrap();
        engine.move_selected(crate::state::Position::new(1, 1)).unwrap();
        assert_eq!(engine.deselect(), Err(ActionError::ActionPointsSpent(UnitId(0))));
    }

    #[test]
    fn factions_alternate_and_same_side_continues_when_opponent_is_done() {
        let mut state = battle(
            10,
            10,
            &[(Faction::Blue, 0, 0), (Faction::Red, 9, 9), (Faction::Red, 8, 9)],
        );
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);
        let idle = Scripted(AiAction::EndActivation);
        engine.start().unwrap();

        engine.select_unit(UnitId(0)).unwrap();
        engine.end_activation().unwrap();
        assert_eq!(engine.phase(), Phase::AiTurn);

        let report = engine.run_ai_activation(&idle).unwrap();
        assert_eq!(report.unit, UnitId(1));
        // Blue has nobody left, so red keeps the window.
        assert_eq!(engine.phase(), Phase::AiTurn);
        assert_eq!(engine.state().turn.active_faction, Faction::Red);
        assert_eq!(engine.state().turn.activations_of(Faction::Red), 1);

        engine.run_ai_activation(&idle).unwrap();
        assert_eq!(engine.state().turn.number, 2);
        assert_eq!(engine.phase(), Phase::PlayerSelectUnit);
    }

    #[test]
    fn rollover_refills_ap_and_keeps_stances() {
        let mut state = battle(10, 10, &[(Faction::Blue, 0, 0), (Faction::Red, 9, 9)]);
        let config = TacticsConfig::default();
        let mut events = Vec::new();
        let mut engine = GameEngine::new(&mut state, &config, &mut events);
        engine.start().unwrap();

        engine.select_unit(UnitId(0)).unwrap();
        engine.begin_action().unwrap();
        engine.hunker_selected().unwrap();
        engine
            .run_ai_activation(&Scripted(AiAction::EndActivation))
            .unwrap();

        let unit = engine.state().unit(UnitId(0)).unwrap();
        assert_eq!(engine.state().turn.number, 2);
        assert_eq!(engine.state().turn.activations, [0, 0]);
        assert!(!unit.is_activated());
        assert_eq!(unit.stats.action_points, unit.stats.max_action_points);
        assert!(unit.is_hunkered());

        engine.select_unit(UnitId(0)).unwrap();
        assert!(!engine.state().unit(UnitId(0)).unwrap().is_hunkered());
        let turn_starts = events_of(&events, EventKind::TurnStarted);
        assert_eq!(turn_starts, 2);
    }

    fn events_of(events: &[GameEvent], kind: EventKind) -> usize {
        events.iter().filter(|event| event.kind == kind).count()
    }
}
