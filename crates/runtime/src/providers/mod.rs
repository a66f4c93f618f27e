//! Activation planners for computer-controlled factions.

pub mod ai;

pub use ai::TacticalAi;
