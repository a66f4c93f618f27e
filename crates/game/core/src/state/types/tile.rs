use super::{Faction, UnitId};

/// Strength of the protection a tile offers to units next to it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CoverKind {
    #[default]
    None,
    Half,
    Full,
}

/// Single map cell with its static layout and dynamic occupant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub walkable: bool,
    pub cover: CoverKind,
    /// Facing of directional cover (walls), in radians. `None` for boulders and other
    /// cover that protects from every side.
    pub cover_facing: Option<f32>,
    pub elevation: i32,
    pub spawn_zone: Option<Faction>,
    /// Living unit standing on this tile. Written only by the engine.
    pub(crate) occupant: Option<UnitId>,
}

impl Tile {
    /// Open floor: walkable, no cover, ground level.
    pub const fn open() -> Self {
        Self {
            walkable: true,
            cover: CoverKind::None,
            cover_facing: None,
            elevation: 0,
            spawn_zone: None,
            occupant: None,
        }
    }

    /// Non-walkable obstacle providing cover from all sides.
    pub const fn obstacle(cover: CoverKind) -> Self {
        Self {
            walkable: false,
            cover,
            cover_facing: None,
            elevation: 0,
            spawn_zone: None,
            occupant: None,
        }
    }

    /// Non-walkable wall that only protects across its face.
    pub const fn wall(facing: f32) -> Self {
        Self {
            walkable: false,
            cover: CoverKind::Full,
            cover_facing: Some(facing),
            elevation: 0,
            spawn_zone: None,
            occupant: None,
        }
    }

    pub const fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub const fn with_spawn_zone(mut self, faction: Faction) -> Self {
        self.spawn_zone = Some(faction);
        self
    }

    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn has_cover(&self) -> bool {
        self.cover != CoverKind::None
    }

    /// Walkable and free of living units.
    pub fn is_passable(&self) -> bool {
        self.walkable && self.occupant.is_none()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::open()
    }
}
