//! Attack results and dice resolution.

use crate::config::CombatTables;
use crate::state::{Grid, UnitState};

use super::hit::{AttackEvaluation, AttackKind, Modifier, evaluate_melee, evaluate_ranged};

/// Outcome of a resolved attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub kind: AttackKind,
    pub hit: bool,
    /// Damage dealt; 0 on a miss.
    pub damage: u32,
    /// Final clamped hit chance the roll was compared against.
    pub accuracy: i32,
    pub modifiers: Vec<Modifier>,
    /// Percentile roll in `[0, 100)`, or `None` when the precheck failed.
    pub roll: Option<u32>,
}

impl AttackEvaluation {
    /// Rolls against this evaluation.
    ///
    /// `roll` is only invoked for feasible attacks, so callers that draw from
    /// a stateful source never consume a roll on a rejected shot.
    ///
    /// # Arguments
    ///
    /// * `damage` - Damage dealt on a hit
    /// * `roll` - Percentile source in `[0, 100)`
    pub fn roll(self, damage: u32, roll: impl FnOnce() -> u32) -> AttackResult {
        if !self.feasible {
            return AttackResult {
                kind: self.kind,
                hit: false,
                damage: 0,
                accuracy: 0,
                modifiers: self.modifiers,
                roll: None,
            };
        }

        let value = roll();
        let hit = (value as i64) < self.accuracy as i64;
        AttackResult {
            kind: self.kind,
            hit,
            damage: if hit { damage } else { 0 },
            accuracy: self.accuracy,
            modifiers: self.modifiers,
            roll: Some(value),
        }
    }
}

/// Evaluates and rolls a ranged attack. Hit iff `roll < accuracy`.
pub fn resolve_ranged(
    attacker: &UnitState,
    target: &UnitState,
    grid: &Grid,
    tables: &CombatTables,
    roll: impl FnOnce() -> u32,
) -> AttackResult {
    evaluate_ranged(attacker, target, grid, tables).roll(attacker.stats.ranged_damage, roll)
}

/// Evaluates and rolls a melee attack. Hit iff `roll < accuracy`.
pub fn resolve_melee(
    attacker: &UnitState,
    target: &UnitState,
    tables: &CombatTables,
    roll: impl FnOnce() -> u32,
) -> AttackResult {
    evaluate_melee(attacker, target, tables).roll(attacker.stats.melee_damage, roll)
}
