pub mod common;
pub mod tile;
pub mod turn;
pub mod unit;

pub use common::{Faction, Position, UnitId};
pub use tile::{CoverKind, Tile};
pub use turn::{Phase, TurnState};
pub use unit::{UnitFlags, UnitState, UnitStats};
