use super::{Faction, UnitId};

/// Phases of the activation state machine.
///
/// Presentation layers may observe additional "animating" intervals between
/// calls, but the core finishes every operation synchronously and never sits
/// in such a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Loading,
    PlayerSelectUnit,
    PlayerMove,
    PlayerAction,
    AiTurn,
    GameOver,
}

impl Phase {
    /// Phases in which a player unit is selected.
    pub const fn has_selection(self) -> bool {
        matches!(self, Phase::PlayerMove | Phase::PlayerAction)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver)
    }
}

/// Turn bookkeeping: phase, counters, and whose activation window it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: Phase,
    /// Turn counter, starting at 1 once the scenario starts.
    pub number: u32,
    /// Faction whose activation window is open.
    pub active_faction: Faction,
    /// Faction driven by the human player. Fixed at scenario start.
    pub player_faction: Faction,
    /// Activations consumed this turn, indexed by [`Faction::index`].
    pub activations: [u32; 2],
    pub winner: Option<Faction>,
    /// Player unit currently selected; only set in move/action phases.
    pub selected: Option<UnitId>,
}

impl TurnState {
    pub fn new(player_faction: Faction) -> Self {
        Self {
            phase: Phase::Loading,
            number: 0,
            active_faction: player_faction,
            player_faction,
            activations: [0; 2],
            winner: None,
            selected: None,
        }
    }

    pub fn ai_faction(&self) -> Faction {
        self.player_faction.opponent()
    }

    pub fn activations_of(&self, faction: Faction) -> u32 {
        self.activations[faction.index()]
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(Faction::Blue)
    }
}
