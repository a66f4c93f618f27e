use std::fmt;

/// Unique identifier for a unit tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two opposing sides.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    Blue,
    Red,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Blue, Faction::Red];

    pub const fn opponent(self) -> Self {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
        }
    }

    /// Stable slot used for per-faction counters.
    pub const fn index(self) -> usize {
        match self {
            Faction::Blue => 0,
            Faction::Red => 1,
        }
    }
}

/// Discrete grid position expressed in tile coordinates (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Movement metric: diagonal steps cost the same as cardinal ones.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Straight-line distance. Scoring heuristics only, never movement legality.
    pub fn euclidean_distance(self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Taxicab distance. Scoring heuristics only, never movement legality.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Angle in radians of the vector from `self` to `other` (`atan2(dy, dx)`).
    pub fn angle_to(self, other: Position) -> f32 {
        ((other.y - self.y) as f32).atan2((other.x - self.x) as f32)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_counts_diagonals_as_single_steps() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev_distance(Position::new(3, 3)), 3);
        assert_eq!(a.chebyshev_distance(Position::new(-2, 5)), 5);
        assert_eq!(a.manhattan_distance(Position::new(3, 3)), 6);
        assert!((a.euclidean_distance(Position::new(3, 4)) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn opponent_round_trips() {
        for faction in Faction::ALL {
            assert_ne!(faction, faction.opponent());
            assert_eq!(faction, faction.opponent().opponent());
        }
    }
}
