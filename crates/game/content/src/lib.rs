//! Data-driven battle content and loaders.
//!
//! This crate turns data files into the plain values the rules core consumes:
//! - Scenario layouts and rosters (data-driven via RON)
//! - Archetype stat templates (data-driven via RON)
//! - Rules tunables (data-driven via TOML)
//!
//! The core never performs I/O itself; everything here ends up as a
//! [`tactics_core::ScenarioSpec`] or [`tactics_core::TacticsConfig`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeLoader, ConfigLoader, ContentFactory, LoadResult, ScenarioLoader, parse_layout,
};
