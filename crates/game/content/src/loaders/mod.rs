//! Content loaders for reading battle data from files.
//!
//! Each loader exposes `load(path)` for files and `parse(str)` for in-memory
//! sources, both returning [`LoadResult`].

pub mod archetypes;
pub mod config;
pub mod factory;
pub mod scenario;

pub use archetypes::ArchetypeLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::{ScenarioLoader, parse_layout};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
