//! Selection logic: which unit acts, whom it attacks and where it moves.
//!
//! Every selector is deterministic. Ties go to the first candidate in a fixed
//! order (unit-id order for units, the shared target order for targets,
//! `BTreeSet` order for tiles).

use std::cmp::Reverse;

use tactics_core::{Faction, GameState, TacticsConfig, TargetInfo, UnitId, movement_range};

use super::AiContext;
use super::scoring::{TileScore, UnitScore, score_tile, score_unit};

/// Picks the unit to activate for a faction.
pub struct UnitSelector;

impl UnitSelector {
    /// Returns the highest-scoring ready unit of `faction` and its score.
    pub fn select(
        state: &GameState,
        config: &TacticsConfig,
        faction: Faction,
    ) -> Option<(UnitId, UnitScore)> {
        let mut best: Option<(UnitId, UnitScore)> = None;

        for unit in state.living_units(faction).filter(|unit| unit.is_ready()) {
            let Some(ctx) = AiContext::new(unit.id, state, config) else {
                continue;
            };
            let score = score_unit(&ctx);

            tracing::debug!(
                "  Unit {}: score={} (melee={}, ranged={}, proximity={}, exposed={})",
                unit.id,
                score.value(),
                score.melee,
                score.ranged,
                score.proximity,
                score.exposed
            );

            // Strictly greater, so ties keep the earlier unit
            if best.is_none_or(|(_, current)| score.value() > current.value()) {
                best = Some((unit.id, score));
            }
        }

        best
    }
}

/// Picks attack targets from the shared target list.
pub struct TargetSelector;

impl TargetSelector {
    /// Lowest HP first, then highest hit chance.
    pub fn best_melee(ctx: &AiContext, targets: &[TargetInfo]) -> Option<UnitId> {
        targets
            .iter()
            .min_by_key(|target| (ctx.target_hp(target), Reverse(target.hit_chance)))
            .map(|target| target.unit)
    }

    /// Lowest HP first, then closest, then highest hit chance.
    pub fn best_ranged(ctx: &AiContext, targets: &[TargetInfo]) -> Option<UnitId> {
        targets
            .iter()
            .min_by_key(|target| {
                (
                    ctx.target_hp(target),
                    target.distance,
                    Reverse(target.hit_chance),
                )
            })
            .map(|target| target.unit)
    }
}

/// Picks a destination tile.
pub struct MoveSelector;

impl MoveSelector {
    /// Best-scoring tile of the unit's movement range, or `None` when it cannot move.
    pub fn best_tile(ctx: &AiContext) -> Option<TileScore> {
        let mut best: Option<TileScore> = None;

        for position in movement_range(&ctx.state.grid, ctx.unit) {
            let score = score_tile(ctx, position);
            if best.is_none_or(|current| score.value > current.value) {
                best = Some(score);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{Grid, Position, UnitStats};

    use super::*;

    fn spawn(state: &mut GameState, faction: Faction, x: i32, y: i32, hp: u32) -> UnitId {
        let stats = UnitStats {
            current_hp: hp,
            ..UnitStats::default()
        };
        state.spawn_unit(faction, "rifleman", stats, Position::new(x, y), 0.0)
    }

    #[test]
    fn ties_go_to_the_lower_unit_id() {
        let mut state = GameState::new(Grid::new(20, 20), Faction::Blue, 1);
        spawn(&mut state, Faction::Blue, 10, 10, 100);
        let first = spawn(&mut state, Faction::Red, 10, 0, 100);
        spawn(&mut state, Faction::Red, 0, 10, 100);
        let config = TacticsConfig::default();

        let (unit, _) = UnitSelector::select(&state, &config, Faction::Red).unwrap();
        assert_eq!(unit, first);
    }

    #[test]
    fn selection_skips_activated_units() {
        let mut state = GameState::new(Grid::new(10, 10), Faction::Blue, 1);
        spawn(&mut state, Faction::Blue, 0, 0, 100);
        spawn(&mut state, Faction::Red, 1, 0, 100);
        let config = TacticsConfig::default();
        let mut engine_events = Vec::new();
        let mut engine = tactics_core::GameEngine::new(&mut state, &config, &mut engine_events);
        engine.start().unwrap();
        engine.select_unit(UnitId(0)).unwrap();
        engine.end_activation().unwrap();

        // Red is in its window with its only unit ready; blue has none left.
        assert!(UnitSelector::select(&state, &config, Faction::Blue).is_none());
        assert!(UnitSelector::select(&state, &config, Faction::Red).is_some());
    }

    #[test]
    fn melee_prefers_wounded_then_accurate() {
        let mut state = GameState::new(Grid::new(10, 10), Faction::Blue, 1);
        let red = spawn(&mut state, Faction::Red, 5, 5, 100);
        spawn(&mut state, Faction::Blue, 4, 5, 60);
        let wounded = spawn(&mut state, Faction::Blue, 6, 5, 40);
        let config = TacticsConfig::default();
        let ctx = AiContext::new(red, &state, &config).unwrap();

        let targets = ctx.melee_targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(TargetSelector::best_melee(&ctx, &targets), Some(wounded));
    }

    #[test]
    fn ranged_prefers_wounded_then_closest() {
        let mut state = GameState::new(Grid::new(12, 12), Faction::Blue, 1);
        let red = spawn(&mut state, Faction::Red, 0, 0, 100);
        spawn(&mut state, Faction::Blue, 6, 0, 50);
        let near = spawn(&mut state, Faction::Blue, 0, 3, 50);
        spawn(&mut state, Faction::Blue, 2, 2, 90);
        let config = TacticsConfig::default();
        let ctx = AiContext::new(red, &state, &config).unwrap();

        let targets = ctx.ranged_targets();
        assert_eq!(TargetSelector::best_ranged(&ctx, &targets), Some(near));
    }

    #[test]
    fn boxed_in_unit_has_no_tile() {
        let mut state = GameState::new(Grid::new(3, 1), Faction::Blue, 1);
        let red = spawn(&mut state, Faction::Red, 1, 0, 100);
        spawn(&mut state, Faction::Blue, 0, 0, 100);
        spawn(&mut state, Faction::Blue, 2, 0, 100);
        let config = TacticsConfig::default();
        let ctx = AiContext::new(red, &state, &config).unwrap();

        assert!(MoveSelector::best_tile(&ctx).is_none());
    }
}
