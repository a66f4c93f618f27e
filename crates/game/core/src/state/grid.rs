//! Tile grid: bounds, adjacency and occupancy bookkeeping.

use arrayvec::ArrayVec;

use super::types::{Position, Tile, UnitId};

/// Offsets of the eight neighbours, cardinals first. The order is part of the
/// deterministic tie-breaking of every search built on top of the grid.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Dense row-major tile storage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid filled with open floor.
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![Tile::open(); count],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        Some(position.y as usize * self.width as usize + position.x as usize)
    }

    /// Looks up a tile. Out-of-bounds probes return `None` rather than failing,
    /// since neighbour scans routinely step past the map edge.
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.index(position).map(move |index| &mut self.tiles[index])
    }

    /// Replaces the layout of a tile, keeping its occupant.
    ///
    /// Returns `false` when the position lies outside the grid.
    pub fn set_tile(&mut self, position: Position, tile: Tile) -> bool {
        let Some(slot) = self.tile_mut(position) else {
            return false;
        };
        let occupant = slot.occupant;
        assert!(
            occupant.is_none() || tile.walkable,
            "cannot make occupied tile {position} non-walkable"
        );
        *slot = Tile { occupant, ..tile };
        true
    }

    /// In-bounds 8-directional neighbours in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(&self, position: Position) -> ArrayVec<Position, 8> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| position.offset(dx, dy))
            .filter(|&candidate| self.contains(candidate))
            .collect()
    }

    /// Walkable tile inside the grid (occupancy ignored).
    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(|tile| tile.walkable)
    }

    /// Walkable tile inside the grid with no living occupant.
    pub fn is_passable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_passable)
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.tile(position).and_then(Tile::occupant)
    }

    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    pub(crate) fn place_occupant(&mut self, position: Position, unit: UnitId) {
        let tile = self
            .tile_mut(position)
            .unwrap_or_else(|| panic!("unit {unit} placed outside the grid at {position}"));
        assert!(tile.walkable, "unit {unit} placed on blocked tile {position}");
        assert!(
            tile.occupant.is_none(),
            "unit {unit} placed on tile {position} occupied by {:?}",
            tile.occupant
        );
        tile.occupant = Some(unit);
    }

    pub(crate) fn clear_occupant(&mut self, position: Position, unit: UnitId) {
        let tile = self
            .tile_mut(position)
            .unwrap_or_else(|| panic!("unit {unit} cleared outside the grid at {position}"));
        assert_eq!(
            tile.occupant,
            Some(unit),
            "occupancy desync at {position}: expected unit {unit}"
        );
        tile.occupant = None;
    }

    pub(crate) fn move_occupant(&mut self, unit: UnitId, from: Position, to: Position) {
        self.clear_occupant(from, unit);
        self.place_occupant(to, unit);
    }
}
