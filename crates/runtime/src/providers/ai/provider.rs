//! Rule-based activation planner.

use tactics_core::{
    ActivationPlan, ActivationPlanner, AiAction, Faction, GameState, TacticsConfig, UnitId,
};

use super::AiContext;
use super::selector::{MoveSelector, TargetSelector, UnitSelector};

/// Rule-based tactical AI.
///
/// Planning follows a strict priority order:
///
/// 1. Melee the best adjacent target.
/// 2. Shoot the best visible target.
/// 3. Move to the best-scoring reachable tile, shooting afterwards if the
///    tile offers a shot.
/// 4. End the activation when the unit cannot move at all.
///
/// All legality questions go through the same core queries the player's
/// actions are validated with, so the AI never plans something the engine
/// would consider out of range or out of sight.
#[derive(Debug, Clone, Copy, Default)]
pub struct TacticalAi;

impl TacticalAi {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationPlanner for TacticalAi {
    fn select_unit(
        &self,
        state: &GameState,
        config: &TacticsConfig,
        faction: Faction,
    ) -> Option<UnitId> {
        tracing::debug!("TacticalAi: Scoring ready {} units", faction);

        let (unit, score) = UnitSelector::select(state, config, faction)?;
        tracing::debug!(
            "TacticalAi: Selected unit {} (score={})",
            unit,
            score.value()
        );
        Some(unit)
    }

    fn plan(&self, state: &GameState, config: &TacticsConfig, unit: UnitId) -> ActivationPlan {
        let action = match AiContext::new(unit, state, config) {
            Some(ctx) => choose_action(&ctx),
            None => {
                tracing::warn!("Unit {} not found, ending activation", unit);
                AiAction::EndActivation
            }
        };

        tracing::debug!("Unit {} selected Action: {:?}", unit, action);
        ActivationPlan { unit, action }
    }
}

fn choose_action(ctx: &AiContext) -> AiAction {
    let melee = ctx.melee_targets();
    if let Some(target) = TargetSelector::best_melee(ctx, &melee) {
        return AiAction::Melee { target };
    }

    let ranged = ctx.ranged_targets();
    if let Some(target) = TargetSelector::best_ranged(ctx, &ranged) {
        return AiAction::Shoot { target };
    }

    match MoveSelector::best_tile(ctx) {
        Some(tile) => {
            tracing::debug!(
                "Unit {} moving to {} (score={:.2})",
                ctx.unit.id,
                tile.position,
                tile.value
            );
            match tile.follow_up {
                Some(target) => AiAction::MoveThenShoot {
                    to: tile.position,
                    target,
                },
                None => AiAction::Move { to: tile.position },
            }
        }
        None => {
            tracing::debug!("Unit {} has nowhere to go", ctx.unit.id);
            AiAction::EndActivation
        }
    }
}
