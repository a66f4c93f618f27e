//! Typed notifications for presentation layers.
//!
//! The engine pushes events into an [`EventSink`] handed to it at
//! construction. There is no global subscriber list; hosts drain whatever
//! sink they own.

use std::collections::VecDeque;

use crate::state::{Faction, Phase, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    TurnStarted,
    PhaseChanged,
    ActivationStarted,
    ActivationEnded,
    UnitMoved,
    AttackResolved,
    ReactionFired,
    UnitKilled,
    GameOver,
}

/// One engine notification.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEvent {
    pub kind: EventKind,
    pub turn: u32,
    /// Faction whose activation window was open when the event fired.
    pub faction: Faction,
    pub unit: Option<UnitId>,
    /// New phase, for [`EventKind::PhaseChanged`].
    pub phase: Option<Phase>,
    pub winner: Option<Faction>,
}

impl GameEvent {
    pub fn new(kind: EventKind, turn: u32, faction: Faction) -> Self {
        Self {
            kind,
            turn,
            faction,
            unit: None,
            phase: None,
            winner: None,
        }
    }

    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_winner(mut self, winner: Faction) -> Self {
        self.winner = Some(winner);
        self
    }
}

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// FIFO buffer the host drains between operations.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Removes and returns every queued event in emission order.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.events.iter()
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }
}
