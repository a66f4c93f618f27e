//! Unified error types surfaced by the runtime API.
//!
//! Wraps rejected actions and scenario construction failures so clients can
//! bubble them up with consistent context.

use tactics_core::{ActionError, ErrorSeverity, GameError, InitializationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires an initial state or scenario before building")]
    MissingState,

    #[error("failed to initialize game state from scenario")]
    InitialState(#[from] InitializationError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl RuntimeError {
    /// The rejected action, if this error came from the rules engine.
    pub fn as_action(&self) -> Option<&ActionError> {
        match self {
            Self::Action(err) => Some(err),
            _ => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingState => ErrorSeverity::Internal,
            Self::InitialState(err) => err.severity(),
            Self::Action(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingState => "RUNTIME_MISSING_STATE",
            Self::InitialState(err) => err.error_code(),
            Self::Action(err) => err.error_code(),
        }
    }
}
