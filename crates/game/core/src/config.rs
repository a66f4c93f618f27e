//! Scenario-level tunables consumed by the rules.
//!
//! The algorithms never hardcode game-specific numbers: accuracy bands, cover
//! penalties, action costs and AI weights all arrive through
//! [`TacticsConfig`]. Defaults are provided for tests and quick setups.

/// Complete configuration object handed to the engine, combat and AI.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    pub combat: CombatTables,
    pub actions: ActionCosts,
    pub ai: AiWeights,
}

impl TacticsConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Accuracy band, cover penalties and positional bonuses.
///
/// All values are percentage points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatTables {
    /// Lower bound of the clamped hit chance.
    pub min_hit_chance: i32,
    /// Upper bound of the clamped hit chance.
    pub max_hit_chance: i32,
    /// Penalty applied when the target sits behind half cover.
    pub half_cover_penalty: i32,
    /// Penalty applied when the target sits behind full cover.
    pub full_cover_penalty: i32,
    /// Bonus for attacking into the defender's rear arc.
    pub flanking_bonus: i32,
    /// Width of the rear arc, in degrees. Half of it is allowed on each side.
    pub flanking_threshold_degrees: f32,
    /// Bonus for shooting from a higher tile.
    pub high_ground_bonus: i32,
}

impl CombatTables {
    pub const DEFAULT_MIN_HIT_CHANCE: i32 = 5;
    pub const DEFAULT_MAX_HIT_CHANCE: i32 = 95;
    pub const DEFAULT_HALF_COVER_PENALTY: i32 = 20;
    pub const DEFAULT_FULL_COVER_PENALTY: i32 = 40;
    pub const DEFAULT_FLANKING_BONUS: i32 = 25;
    pub const DEFAULT_FLANKING_THRESHOLD_DEGREES: f32 = 90.0;
    pub const DEFAULT_HIGH_GROUND_BONUS: i32 = 15;

    /// Width of the rear arc converted to radians.
    pub fn flanking_threshold(&self) -> f32 {
        self.flanking_threshold_degrees.to_radians()
    }

    /// Clamps a raw accuracy sum into the configured band.
    pub fn clamp_accuracy(&self, accuracy: i32) -> i32 {
        accuracy.clamp(self.min_hit_chance, self.max_hit_chance)
    }
}

impl Default for CombatTables {
    fn default() -> Self {
        Self {
            min_hit_chance: Self::DEFAULT_MIN_HIT_CHANCE,
            max_hit_chance: Self::DEFAULT_MAX_HIT_CHANCE,
            half_cover_penalty: Self::DEFAULT_HALF_COVER_PENALTY,
            full_cover_penalty: Self::DEFAULT_FULL_COVER_PENALTY,
            flanking_bonus: Self::DEFAULT_FLANKING_BONUS,
            flanking_threshold_degrees: Self::DEFAULT_FLANKING_THRESHOLD_DEGREES,
            high_ground_bonus: Self::DEFAULT_HIGH_GROUND_BONUS,
        }
    }
}

/// Action point prices and the overwatch cone width.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionCosts {
    pub move_cost: u32,
    pub attack_cost: u32,
    pub overwatch_cost: u32,
    pub hunker_cost: u32,
    /// Full width of the watch cone computed when overwatch is declared.
    pub overwatch_cone_degrees: f32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            move_cost: 1,
            attack_cost: 1,
            overwatch_cost: 1,
            hunker_cost: 1,
            overwatch_cone_degrees: 120.0,
        }
    }
}

/// Weights for the rule-based opponent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiWeights {
    /// Multiplier on distance to the nearest enemy. Negative rewards closeness.
    pub distance_weight: f32,
    /// Added when a neighbouring tile provides cover; half of it when the tile itself does.
    pub cover_weight: f32,
    /// Added when an enemy can be shot from the tile.
    pub los_weight: f32,
    /// Unit selection: score for having a melee target.
    pub melee_target_score: i32,
    /// Unit selection: score for having a ranged target (before the low-HP bonus).
    pub ranged_target_score: i32,
    /// Unit selection: HP reference the weakest ranged target is subtracted from.
    pub finishing_hp_reference: i32,
    /// Unit selection: proximity reference distance.
    pub proximity_base: i32,
    /// Unit selection: multiplier applied to the proximity term.
    pub proximity_scale: i32,
    /// Unit selection: bonus for units standing without cover.
    pub exposed_bonus: i32,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            distance_weight: -1.0,
            cover_weight: 10.0,
            los_weight: 15.0,
            melee_target_score: 150,
            ranged_target_score: 100,
            finishing_hp_reference: 100,
            proximity_base: 20,
            proximity_scale: 2,
            exposed_bonus: 5,
        }
    }
}
