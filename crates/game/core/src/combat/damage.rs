//! Hit point bookkeeping.

use crate::state::{UnitFlags, UnitState};

/// Applies damage to a unit, clamping HP at zero.
///
/// Returns `true` when this call killed the unit. Tile occupancy is left to
/// the engine, which owns the grid.
pub fn apply_damage(unit: &mut UnitState, damage: u32) -> bool {
    if !unit.is_alive() {
        return false;
    }
    unit.stats.current_hp = unit.stats.current_hp.saturating_sub(damage);
    if unit.stats.current_hp == 0 {
        unit.flags.remove(UnitFlags::ALIVE);
        unit.clear_stances();
        return true;
    }
    false
}
