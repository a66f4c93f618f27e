//! Illegal-action errors returned by the engine.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Faction, Phase, Position, UnitId};

/// Why the engine refused an operation.
///
/// A refusal leaves the state untouched: no AP is spent, no roll is taken and
/// no event is emitted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("{operation} is not allowed during {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("unit {0} is not part of this battle")]
    UnknownUnit(UnitId),

    #[error("unit {unit} belongs to {faction}, not the acting faction")]
    NotOwnUnit { unit: UnitId, faction: Faction },

    #[error("unit {0} is not ready to activate")]
    UnitNotReady(UnitId),

    #[error("no unit is selected")]
    NoSelection,

    #[error("{faction} has no unit ready to activate")]
    NoReadyUnit { faction: Faction },

    #[error("unit {unit} needs {required} AP but has {available}")]
    InsufficientActionPoints {
        unit: UnitId,
        required: u32,
        available: u32,
    },

    #[error("unit {0} already spent AP this activation")]
    ActionPointsSpent(UnitId),

    #[error("unit {unit} cannot reach {destination}")]
    Unreachable { unit: UnitId, destination: Position },

    #[error("path of {steps} steps exceeds movement {allowance} of unit {unit}")]
    PathTooLong {
        unit: UnitId,
        steps: u32,
        allowance: u32,
    },

    #[error("unit {target} is not a living enemy of unit {attacker}")]
    InvalidTarget { attacker: UnitId, target: UnitId },

    #[error("unit {target} is out of range of unit {attacker} ({distance} tiles)")]
    TargetOutOfRange {
        attacker: UnitId,
        target: UnitId,
        distance: u32,
    },

    #[error("line of sight from unit {attacker} to unit {target} is blocked")]
    LineOfSightBlocked {
        attacker: UnitId,
        target: UnitId,
        blocking_tile: Option<Position>,
    },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. }
            | Self::NoSelection
            | Self::InsufficientActionPoints { .. }
            | Self::ActionPointsSpent(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GameOver => "ACTION_GAME_OVER",
            Self::WrongPhase { .. } => "ACTION_WRONG_PHASE",
            Self::UnknownUnit(_) => "ACTION_UNKNOWN_UNIT",
            Self::NotOwnUnit { .. } => "ACTION_NOT_OWN_UNIT",
            Self::UnitNotReady(_) => "ACTION_UNIT_NOT_READY",
            Self::NoSelection => "ACTION_NO_SELECTION",
            Self::NoReadyUnit { .. } => "ACTION_NO_READY_UNIT",
            Self::InsufficientActionPoints { .. } => "ACTION_INSUFFICIENT_AP",
            Self::ActionPointsSpent(_) => "ACTION_AP_SPENT",
            Self::Unreachable { .. } => "ACTION_UNREACHABLE",
            Self::PathTooLong { .. } => "ACTION_PATH_TOO_LONG",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::TargetOutOfRange { .. } => "ACTION_TARGET_OUT_OF_RANGE",
            Self::LineOfSightBlocked { .. } => "ACTION_LOS_BLOCKED",
        }
    }
}
