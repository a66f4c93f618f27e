//! Session host and tactical AI for the squad tactics rules core.
//!
//! This crate wires the rules engine from `tactics-core` to an AI planner and
//! an event queue. Consumers embed [`Runtime`] to drive activations, drain
//! events between calls, and let the AI play its faction.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session and its builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`providers`] contains the rule-based AI planner
pub mod api;
pub mod providers;
pub mod runtime;

pub use api::{Result, RuntimeError};
pub use providers::TacticalAi;
pub use providers::ai::{AiContext, MoveSelector, TargetSelector, UnitSelector};
pub use runtime::{AutoplaySummary, Runtime, RuntimeBuilder};
