//! Rule-based tactical AI for computer-controlled factions.
//!
//! One activation is decided in two steps:
//!
//! 1. **Unit selection**: score every ready unit and activate the best one
//!    ([`UnitSelector`]).
//! 2. **Action planning**: attack if possible, otherwise move to the best
//!    reachable tile, otherwise end the activation ([`TacticalAi`]).
//!
//! # Core Components
//!
//! - [`TacticalAi`]: planner implementing [`tactics_core::ActivationPlanner`]
//! - [`AiContext`]: per-unit view with target and distance helpers
//! - [`scoring`]: unit and tile utility scores
//! - [`selector`]: deterministic argmax over units, targets and tiles

pub mod context;
pub mod provider;
pub mod scoring;
pub mod selector;

pub use context::AiContext;
pub use provider::TacticalAi;
pub use scoring::{TileScore, UnitScore, score_tile, score_unit};
pub use selector::{MoveSelector, TargetSelector, UnitSelector};
