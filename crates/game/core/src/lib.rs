//! Deterministic rules core for squad-level turn-based tactics.
//!
//! `tactics-core` defines the canonical rules (grid, pathfinding, visibility,
//! combat, activation state machine) and exposes pure APIs that the runtime,
//! the AI, and presentation layers reuse. All state mutation flows through
//! [`engine::GameEngine`]; every other module is a pure function over
//! [`GameState`] data.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod nav;
pub mod state;
pub mod visibility;

pub use combat::{
    AttackEvaluation, AttackKind, AttackResult, Modifier, ModifierKind, TargetInfo, apply_damage,
    evaluate_melee, evaluate_ranged, resolve_melee, resolve_ranged, valid_targets,
};
pub use config::{ActionCosts, AiWeights, CombatTables, TacticsConfig};
pub use engine::{
    ActionError, ActivationPlan, ActivationPlanner, AiAction, AiActivationReport, EventKind,
    EventQueue, EventSink, GameEngine, GameEvent, MoveOutcome, ReactionShot, overwatch_cone,
};
pub use env::{
    ArchetypeSpec, PcgRng, RngOracle, RosterEntry, ScenarioSpec, TileSpec, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use nav::{PathOptions, find_path, find_path_with, movement_range, path_length};
pub use state::{
    CoverKind, Faction, GameState, Grid, InitializationError, Phase, Position, Tile, TurnState,
    UnitFlags, UnitId, UnitState, UnitStats,
};
pub use visibility::{CoverInfo, LineStatus, LineTrace, angle_diff, cover_at, trace_line};
