//! Content factory for assembling battles from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::{ArchetypeSpec, ScenarioSpec, TacticsConfig};

use crate::loaders::{ArchetypeLoader, ConfigLoader, LoadResult, ScenarioLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml        (optional, defaults apply when missing)
/// ├── archetypes.ron     (optional shared catalog)
/// └── scenarios/
///     ├── skirmish.ron
///     └── ambush.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rules configuration from `config.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<TacticsConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(TacticsConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the shared archetype catalog from `archetypes.ron`, or nothing if absent.
    pub fn load_archetypes(&self) -> LoadResult<Vec<ArchetypeSpec>> {
        let path = self.data_dir.join("archetypes.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ArchetypeLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    ///
    /// Archetypes from the shared catalog are appended unless the scenario
    /// defines one with the same name, in which case the scenario wins.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the scenario file (without `.ron` extension)
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioSpec> {
        let path = self
            .data_dir
            .join("scenarios")
            .join(format!("{}.ron", name));
        let mut spec = ScenarioLoader::load(&path)?;

        for archetype in self.load_archetypes()? {
            if !spec.archetypes.iter().any(|own| own.name == archetype.name) {
                spec.archetypes.push(archetype);
            }
        }

        Ok(spec)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
