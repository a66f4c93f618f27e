//! Rules configuration loader.

use std::path::Path;

use tactics_core::TacticsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`TacticsConfig`] from TOML files.
///
/// Every section and field is optional; anything left out keeps its default.
///
/// ```toml
/// [combat]
/// min_hit_chance = 10
///
/// [actions]
/// overwatch_cone_degrees = 90.0
///
/// [ai]
/// cover_weight = 12.0
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a TacticsConfig
    pub fn load(path: &Path) -> LoadResult<TacticsConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<TacticsConfig> {
        let config: TacticsConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let combat = &config.combat;
        if combat.min_hit_chance > combat.max_hit_chance {
            anyhow::bail!(
                "min_hit_chance {} exceeds max_hit_chance {}",
                combat.min_hit_chance,
                combat.max_hit_chance
            );
        }

        Ok(config)
    }
}
