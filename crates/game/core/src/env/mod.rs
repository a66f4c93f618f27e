//! Inputs supplied by collaborators outside the rules: scenario blueprints and
//! the deterministic random source.

pub mod rng;
pub mod scenario;

pub use rng::{PcgRng, RngOracle, compute_seed};
pub use scenario::{ArchetypeSpec, RosterEntry, ScenarioSpec, TileSpec};
