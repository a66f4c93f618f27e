//! Accuracy pipeline shared by resolution, target listing and the AI.

use std::f32::consts::PI;

use crate::config::CombatTables;
use crate::state::{Grid, UnitState};
use crate::visibility::{CoverInfo, LineStatus, LineTrace, angle_diff, cover_at, trace_line};

/// Melee reach in Chebyshev tiles.
pub const MELEE_RANGE: u32 = 1;

/// Ranged or melee attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Ranged,
    Melee,
}

/// Source of one line in the accuracy breakdown.
///
/// `Display` yields the label shown to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    #[strum(serialize = "Base accuracy")]
    BaseAccuracy,
    #[strum(serialize = "Out of range")]
    OutOfRange,
    #[strum(serialize = "Line of sight blocked")]
    BlockedLineOfSight,
    #[strum(serialize = "Cover")]
    Cover,
    #[strum(serialize = "Hunkered down")]
    Hunkered,
    #[strum(serialize = "Partial cover")]
    PartialCover,
    #[strum(serialize = "Flanking")]
    Flanking,
    #[strum(serialize = "High ground")]
    HighGround,
}

/// Signed contribution to hit chance, in percentage points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    pub value: i32,
}

impl Modifier {
    pub const fn new(kind: ModifierKind, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Would-be attack, evaluated without rolling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackEvaluation {
    pub kind: AttackKind,
    /// `false` when the range or sightline precheck failed. No dice are rolled then.
    pub feasible: bool,
    /// Clamped hit chance; 0 when not feasible.
    pub accuracy: i32,
    /// Breakdown in pipeline order, base accuracy first. A failed precheck
    /// leaves a single entry naming the reason.
    pub modifiers: Vec<Modifier>,
    pub distance: u32,
    /// Target's cover (ranged only, once past the sightline check).
    pub cover: Option<CoverInfo>,
    /// Sightline trace (ranged only).
    pub line: Option<LineTrace>,
}

impl AttackEvaluation {
    /// Failed precheck: the log holds only the reason, at zero weight.
    fn rejected(
        kind: AttackKind,
        reason: ModifierKind,
        distance: u32,
        line: Option<LineTrace>,
    ) -> Self {
        Self {
            kind,
            feasible: false,
            accuracy: 0,
            modifiers: vec![Modifier::new(reason, 0)],
            distance,
            cover: None,
            line,
        }
    }
}

/// Evaluates a ranged attack from `attacker` on `target`.
///
/// # Pipeline
///
/// ```text
/// base accuracy
///   -> range precheck (chebyshev <= ranged_range)
///   -> sightline precheck (not blocked)
///   -> cover penalty, doubled when the target is hunkered
///   -> partial-cover penalty from the sightline
///   -> flanking bonus
///   -> high-ground bonus
///   -> clamp to [min_hit_chance, max_hit_chance]
/// ```
///
/// A failed precheck yields accuracy 0 and `feasible == false`.
pub fn evaluate_ranged(
    attacker: &UnitState,
    target: &UnitState,
    grid: &Grid,
    tables: &CombatTables,
) -> AttackEvaluation {
    let kind = AttackKind::Ranged;
    let base = attacker.stats.ranged_accuracy;
    let distance = attacker.position.chebyshev_distance(target.position);

    if distance > attacker.stats.ranged_range {
        return AttackEvaluation::rejected(kind, ModifierKind::OutOfRange, distance, None);
    }

    let line = trace_line(grid, attacker.position, target.position, tables);
    if line.is_blocked() {
        return AttackEvaluation::rejected(
            kind,
            ModifierKind::BlockedLineOfSight,
            distance,
            Some(line),
        );
    }

    let mut modifiers = vec![Modifier::new(ModifierKind::BaseAccuracy, base)];

    let cover = cover_at(grid, target.position, attacker.position, tables);
    if cover.penalty > 0 {
        modifiers.push(Modifier::new(ModifierKind::Cover, -cover.penalty));
        if target.is_hunkered() {
            modifiers.push(Modifier::new(ModifierKind::Hunkered, -cover.penalty));
        }
    }

    if line.status == LineStatus::Partial && line.cover_penalty > 0 {
        modifiers.push(Modifier::new(ModifierKind::PartialCover, -line.cover_penalty));
    }

    if is_flanking(attacker, target, tables) {
        modifiers.push(Modifier::new(ModifierKind::Flanking, tables.flanking_bonus));
    }

    if has_high_ground(attacker, target, grid) {
        modifiers.push(Modifier::new(ModifierKind::HighGround, tables.high_ground_bonus));
    }

    AttackEvaluation {
        kind,
        feasible: true,
        accuracy: clamp_total(&modifiers, tables),
        modifiers,
        distance,
        cover: Some(cover),
        line: Some(line),
    }
}

/// Evaluates a melee attack: adjacency precheck, then flanking, then clamp.
pub fn evaluate_melee(
    attacker: &UnitState,
    target: &UnitState,
    tables: &CombatTables,
) -> AttackEvaluation {
    let kind = AttackKind::Melee;
    let base = attacker.stats.melee_accuracy;
    let distance = attacker.position.chebyshev_distance(target.position);

    if distance > MELEE_RANGE {
        return AttackEvaluation::rejected(kind, ModifierKind::OutOfRange, distance, None);
    }

    let mut modifiers = vec![Modifier::new(ModifierKind::BaseAccuracy, base)];
    if is_flanking(attacker, target, tables) {
        modifiers.push(Modifier::new(ModifierKind::Flanking, tables.flanking_bonus));
    }

    AttackEvaluation {
        kind,
        feasible: true,
        accuracy: clamp_total(&modifiers, tables),
        modifiers,
        distance,
        cover: None,
        line: None,
    }
}

/// Whether the attack arrives inside the defender's rear arc.
pub fn is_flanking(attacker: &UnitState, target: &UnitState, tables: &CombatTables) -> bool {
    let attack_angle = target.position.angle_to(attacker.position);
    let rear = target.facing + PI;
    angle_diff(attack_angle, rear) <= tables.flanking_threshold() / 2.0
}

fn has_high_ground(attacker: &UnitState, target: &UnitState, grid: &Grid) -> bool {
    let elevation = |unit: &UnitState| grid.tile(unit.position).map_or(0, |tile| tile.elevation);
    elevation(attacker) > elevation(target)
}

fn clamp_total(modifiers: &[Modifier], tables: &CombatTables) -> i32 {
    let total: i32 = modifiers.iter().map(|modifier| modifier.value).sum();
    tables.clamp_accuracy(total)
}
