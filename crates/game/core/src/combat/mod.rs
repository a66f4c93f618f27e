//! Attack resolution.
//!
//! Pure functions over unit records and the grid. Evaluation runs the full
//! accuracy pipeline without touching dice; resolution takes the roll as a
//! closure so the engine can feed its deterministic RNG and tests can pin
//! exact values.
//!
//! - `evaluate_ranged` / `evaluate_melee`: would-be hit chance and breakdown
//! - `resolve_ranged` / `resolve_melee`: evaluation plus roll
//! - `valid_targets`: legal targets in preference order
//! - `apply_damage`: HP reduction (clamped to 0)

pub mod damage;
pub mod hit;
pub mod result;
pub mod targets;

pub use damage::apply_damage;
pub use hit::{
    AttackEvaluation, AttackKind, MELEE_RANGE, Modifier, ModifierKind, evaluate_melee,
    evaluate_ranged, is_flanking,
};
pub use result::{AttackResult, resolve_melee, resolve_ranged};
pub use targets::{TargetInfo, valid_targets};
