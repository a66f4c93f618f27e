//! Archetype catalog loader.

use std::collections::HashSet;
use std::path::Path;

use tactics_core::ArchetypeSpec;

use crate::loaders::{LoadResult, read_file};

/// Loader for archetype catalogs from RON files.
///
/// RON format: `Vec<ArchetypeSpec>`
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    /// Load an archetype catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ArchetypeSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an archetype catalog, rejecting duplicate names.
    pub fn parse(content: &str) -> LoadResult<Vec<ArchetypeSpec>> {
        let archetypes: Vec<ArchetypeSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype RON: {}", e))?;

        let mut seen = HashSet::new();
        for archetype in &archetypes {
            if !seen.insert(archetype.name.as_str()) {
                anyhow::bail!("Duplicate archetype '{}'", archetype.name);
            }
        }

        Ok(archetypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        (
            name: "rifleman",
            max_hp: 100,
            max_action_points: 2,
            movement: 4,
            ranged_damage: 30,
            melee_damage: 40,
            ranged_accuracy: 70,
            melee_accuracy: 80,
            ranged_range: 8,
        ),
        (
            name: "brute",
            max_hp: 160,
            max_action_points: 2,
            movement: 5,
            ranged_damage: 10,
            melee_damage: 70,
            ranged_accuracy: 40,
            melee_accuracy: 90,
            ranged_range: 3,
        ),
    ]"#;

    #[test]
    fn parses_catalog() {
        let archetypes = ArchetypeLoader::parse(CATALOG).unwrap();

        assert_eq!(archetypes.len(), 2);
        assert_eq!(archetypes[1].name, "brute");
        assert_eq!(archetypes[1].stats().current_hp, 160);
    }

    #[test]
    fn rejects_duplicate_names() {
        let doubled = CATALOG.replace("\"brute\"", "\"rifleman\"");
        let err = ArchetypeLoader::parse(&doubled).unwrap_err();
        assert!(err.to_string().contains("Duplicate archetype 'rifleman'"));
    }
}
