//! Scenario loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tactics_core::{ArchetypeSpec, CoverKind, Faction, RosterEntry, ScenarioSpec, TileSpec};

use crate::loaders::{LoadResult, read_file};

/// Loader for [`ScenarioSpec`] from RON files.
///
/// The map can be given as explicit `tiles`, as an ASCII `layout`, or both.
/// When both are present, explicit tiles replace the layout cell at the same
/// coordinate. See [`parse_layout`] for the legend.
pub struct ScenarioLoader;

/// On-disk shape of a scenario file.
#[derive(Deserialize)]
struct ScenarioFile {
    /// Required only when no layout is given.
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    layout: Vec<String>,
    #[serde(default)]
    tiles: Vec<TileSpec>,
    #[serde(default)]
    archetypes: Vec<ArchetypeSpec>,
    rosters: Vec<RosterEntry>,
    player_faction: Faction,
    #[serde(default)]
    seed: u64,
}

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let file: ScenarioFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let (layout_width, layout_height, layout_tiles) = parse_layout(&file.layout)?;

        let width = resolve_dimension("width", file.width, layout_width)?;
        let height = resolve_dimension("height", file.height, layout_height)?;

        let mut tiles: BTreeMap<(i32, i32), TileSpec> = layout_tiles
            .into_iter()
            .map(|tile| ((tile.y, tile.x), tile))
            .collect();
        for tile in file.tiles {
            tiles.insert((tile.y, tile.x), tile);
        }

        tracing::debug!(
            "Loaded scenario {}x{} with {} tile overrides and {} roster entries",
            width,
            height,
            tiles.len(),
            file.rosters.len()
        );

        Ok(ScenarioSpec {
            width,
            height,
            tiles: tiles.into_values().collect(),
            archetypes: file.archetypes,
            rosters: file.rosters,
            player_faction: file.player_faction,
            seed: file.seed,
        })
    }
}

/// Picks the declared dimension or the one implied by the layout.
fn resolve_dimension(name: &str, declared: u32, from_layout: u32) -> LoadResult<u32> {
    if from_layout == 0 || declared == from_layout {
        return Ok(declared.max(from_layout));
    }
    if declared != 0 {
        anyhow::bail!(
            "{} {} disagrees with layout {} {}",
            name,
            declared,
            name,
            from_layout
        );
    }
    Ok(from_layout)
}

/// Converts ASCII rows into map dimensions and tile overrides.
///
/// Row `0` is `y = 0`. Legend:
///
/// | glyph | tile                                      |
/// |-------|-------------------------------------------|
/// | `.`   | open floor                                |
/// | `#`   | full-cover obstacle                       |
/// | `+`   | half-cover obstacle                       |
/// | `B`   | blue spawn zone                           |
/// | `R`   | red spawn zone                            |
/// | `0-9` | open floor at that elevation              |
/// | `\|`  | full-cover wall facing 0° (east/west)     |
/// | `-`   | full-cover wall facing 90° (north/south)  |
///
/// Open floor produces no override. An empty layout returns `(0, 0, [])`.
pub fn parse_layout(rows: &[String]) -> LoadResult<(u32, u32, Vec<TileSpec>)> {
    let Some(first) = rows.first() else {
        return Ok((0, 0, Vec::new()));
    };
    let width = first.chars().count();

    let mut tiles = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            anyhow::bail!(
                "layout row {} has {} columns, expected {}",
                y,
                row.chars().count(),
                width
            );
        }

        for (x, glyph) in row.chars().enumerate() {
            let mut tile = TileSpec {
                x: x as i32,
                y: y as i32,
                walkable: true,
                cover: CoverKind::None,
                cover_facing_degrees: None,
                elevation: 0,
                spawn_zone: None,
            };
            match glyph {
                '.' => continue,
                '#' => {
                    tile.walkable = false;
                    tile.cover = CoverKind::Full;
                }
                '+' => {
                    tile.walkable = false;
                    tile.cover = CoverKind::Half;
                }
                'B' => tile.spawn_zone = Some(Faction::Blue),
                'R' => tile.spawn_zone = Some(Faction::Red),
                '|' | '-' => {
                    tile.walkable = false;
                    tile.cover = CoverKind::Full;
                    tile.cover_facing_degrees = Some(if glyph == '|' { 0.0 } else { 90.0 });
                }
                digit @ '0'..='9' => {
                    // Ground level is plain floor.
                    if digit == '0' {
                        continue;
                    }
                    tile.elevation = digit as i32 - '0' as i32;
                }
                other => anyhow::bail!("unknown layout glyph '{}' at ({}, {})", other, x, y),
            }
            tiles.push(tile);
        }
    }

    Ok((width as u32, rows.len() as u32, tiles))
}

#[cfg(test)]
mod tests {
    use tactics_core::{GameState, Position};

    use super::*;

    const SKIRMISH: &str = r#"(
        layout: [
            "B...#",
            "B.+..",
            "..|.R",
            "...2R",
        ],
        tiles: [
            (x: 1, y: 1, cover: Half, walkable: false),
        ],
        archetypes: [
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
        ],
        rosters: [
            (faction: Blue, archetype: "rifleman"),
            (faction: Blue, archetype: "rifleman"),
            (faction: Red, archetype: "rifleman", facing_degrees: 180.0),
        ],
        player_faction: Blue,
        seed: 42,
    )"#;

    fn tile_at(spec: &ScenarioSpec, x: i32, y: i32) -> Option<&TileSpec> {
        spec.tiles.iter().find(|tile| tile.x == x && tile.y == y)
    }

    #[test]
    fn layout_sets_dimensions_and_tiles() {
        let spec = ScenarioLoader::parse(SKIRMISH).unwrap();

        assert_eq!((spec.width, spec.height), (5, 4));
        assert_eq!(spec.seed, 42);
        assert_eq!(tile_at(&spec, 4, 0).unwrap().cover, CoverKind::Full);
        assert_eq!(tile_at(&spec, 2, 1).unwrap().cover, CoverKind::Half);
        assert_eq!(tile_at(&spec, 2, 2).unwrap().cover_facing_degrees, Some(0.0));
        assert_eq!(tile_at(&spec, 3, 3).unwrap().elevation, 2);
        assert!(tile_at(&spec, 1, 0).is_none());
    }

    #[test]
    fn explicit_tiles_override_layout() {
        let spec = ScenarioLoader::parse(SKIRMISH).unwrap();
        let overridden = tile_at(&spec, 1, 1).unwrap();

        assert!(!overridden.walkable);
        assert_eq!(overridden.cover, CoverKind::Half);
    }

    #[test]
    fn loaded_scenario_builds_a_state() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("skirmish.ron");
        std::fs::write(&path, SKIRMISH).unwrap();

        let spec = ScenarioLoader::load(&path).unwrap();
        let state = GameState::from_scenario(&spec).unwrap();

        let positions: Vec<_> = state.units().iter().map(|unit| unit.position).collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(4, 2)]
        );
        assert_eq!(state.units()[2].facing, 180f32.to_radians());
    }

    #[test]
    fn ragged_layout_is_rejected() {
        let rows = vec!["...".to_string(), "..".to_string()];
        let err = parse_layout(&rows).unwrap_err();
        assert!(err.to_string().contains("layout row 1"));
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let rows = vec!["..x".to_string()];
        let err = parse_layout(&rows).unwrap_err();
        assert!(err.to_string().contains("'x' at (2, 0)"));
    }

    #[test]
    fn explicit_dimensions_without_layout() {
        let spec = ScenarioLoader::parse(
            r#"(
                width: 6,
                height: 3,
                tiles: [(x: 0, y: 0, spawn_zone: Some(Blue)), (x: 5, y: 2, spawn_zone: Some(Red))],
                rosters: [],
                player_faction: Red,
            )"#,
        )
        .unwrap();

        assert_eq!((spec.width, spec.height), (6, 3));
        assert_eq!(spec.player_faction, Faction::Red);
        assert_eq!(spec.tiles.len(), 2);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let err = ScenarioLoader::parse(
            r#"(width: 3, layout: ["..", ".."], rosters: [], player_faction: Blue)"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("disagrees"));
    }
}
