//! Common error infrastructure for tactics-core.
//!
//! Rejected actions are ordinary returned values: the input layer and the AI
//! both probe legality before committing, so domain errors (e.g.
//! [`crate::ActionError`]) are classified rather than escalated. Broken
//! bookkeeping (tile/unit disagreement, activating a dead unit) is not
//! represented here at all; those paths panic.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (e.g. after AP refill)
/// - **Validation**: the request itself is wrong and should not be retried unchanged
/// - **Internal**: inconsistent input data detected while building state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: insufficient AP, wrong phase
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown unit, unreachable tile, target out of range
    Validation,

    /// Internal error - inconsistent data supplied by a collaborator.
    ///
    /// Examples: spawn tile outside the map, unknown archetype
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all tactics-core errors.
///
/// Provides uniform classification so hosts can decide between showing
/// feedback, dropping the request, or surfacing a data problem.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
