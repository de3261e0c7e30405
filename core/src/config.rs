//! Tunable configuration, loaded from TOML with per-field defaults for
//! anything the file omits.

use serde::Deserialize;

use crate::error::SimError;
use crate::material::MaterialKind;

/// Grid dimensions and the game seed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in columns.
    pub width: u32,
    /// Grid height in rows.
    pub height: u32,
    /// Base RNG seed, fanned out into labeled sub-streams.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 128,
            seed: 0x5EED_0000_0000_0001,
        }
    }
}

/// Physics tuning: gravity, buoyancy, and step-up.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in world units/s^2 outside water.
    pub gravity: f32,
    /// Downward acceleration in world units/s^2 while submerged.
    pub buoyant_gravity: f32,
    /// Per-second velocity damping factor applied while submerged.
    pub water_damping: f32,
    /// Instantaneous upward speed applied by a jump.
    pub jump_speed: f32,
    /// Largest single tick delta time accepted before clamping.
    pub max_delta_time: f32,
    /// Max height (as a fraction of entity height) steppable without
    /// friction.
    pub step_tier1_max_height_factor: f32,
    /// Max height (as a fraction of entity height) steppable with friction.
    pub step_tier2_max_height_factor: f32,
    /// Horizontal speed multiplier applied while performing a tier-2 step.
    pub step_tier2_horizontal_friction: f32,
    /// Epsilon below which a velocity component is treated as resolved to
    /// avoid infinite swept-collision retries.
    pub collision_epsilon: f32,
    /// Vertical climb speed while on a rope.
    pub rope_climb_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            buoyant_gravity: 6.0,
            water_damping: 0.85,
            jump_speed: 11.0,
            max_delta_time: 0.05,
            step_tier1_max_height_factor: 0.5,
            step_tier2_max_height_factor: 1.0,
            step_tier2_horizontal_friction: 0.5,
            collision_epsilon: 1e-4,
            rope_climb_speed: 4.0,
        }
    }
}

/// A single row of the generic aging rule table: a `source` kind that, when
/// ring-weighted `influence_kind` presence surrounds it, rolls
/// `base_probability` scaled by that influence fraction each pass, and on
/// success is replaced by `target`. Drives border-cell erosion/infection for
/// every kind that isn't handled by one of the dedicated pattern rules
/// (dirt seeding, vegetation decay/tree-formation, stone compression).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
pub struct AgingRule {
    /// The kind this rule evaluates.
    pub source: MaterialKind,
    /// The neighbor kind whose ring-weighted presence drives the roll.
    pub influence_kind: MaterialKind,
    /// Probability rolled when influence is present, in millionths so the
    /// field can stay an integer in TOML (divided by 1_000_000 at use).
    pub base_probability_per_million: u32,
    /// The kind a successful roll replaces the cell with.
    pub target: MaterialKind,
}

impl AgingRule {
    /// `base_probability_per_million` as a `[0, 1]` probability.
    #[must_use]
    pub fn base_probability(&self) -> f64 {
        f64::from(self.base_probability_per_million) / 1_000_000.0
    }
}

/// Aging rule probabilities and structural constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgingConfig {
    /// Probability per aging pass that a lit dirt cell grows vegetation.
    pub p_dirt_grows_vegetation: f64,
    /// Probability per aging pass that a deep stone cell compresses into
    /// diamond.
    pub p_diamond_formation: f64,
    /// Probability that a vegetation cell fully surrounded by vegetation
    /// forms a tree once a qualifying dirt anchor and spacing are found.
    pub prob_vegetation_to_wood_surrounded: f64,
    /// Minimum Chebyshev spacing between two tree formation sites.
    pub min_tree_spacing_radius: u32,
    /// Maximum cells scanned downward while looking for the ground a tree
    /// forms on.
    pub max_tree_scan_depth: u32,
    /// Fraction of unlit vegetation cells that decay to air per pass.
    pub unlit_vegetation_decay_fraction_to_air: f64,
    /// Remaining fraction of unlit vegetation cells that decay to dirt per
    /// pass.
    pub unlit_vegetation_decay_fraction_to_dirt: f64,
    /// Ring-weighted influence weight at Chebyshev radius 3.
    pub ring_weight_radius_3: f32,
    /// Ring-weighted influence weight at Chebyshev radius 5.
    pub ring_weight_radius_5: f32,
    /// Ring-weighted influence weight at Chebyshev radius 7.
    pub ring_weight_radius_7: f32,
    /// The generic per-kind erosion/infection rule table, covering every
    /// material kind not driven by a dedicated rule.
    pub rules: Vec<AgingRule>,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            p_dirt_grows_vegetation: 0.02,
            p_diamond_formation: 0.0005,
            prob_vegetation_to_wood_surrounded: 0.15,
            min_tree_spacing_radius: 4,
            max_tree_scan_depth: 6,
            unlit_vegetation_decay_fraction_to_air: 0.10,
            unlit_vegetation_decay_fraction_to_dirt: 0.90,
            ring_weight_radius_3: 1.0,
            ring_weight_radius_5: 0.5,
            ring_weight_radius_7: 0.25,
            rules: vec![
                AgingRule {
                    source: MaterialKind::Sand,
                    influence_kind: MaterialKind::Dirt,
                    base_probability_per_million: 2_000,
                    target: MaterialKind::Dirt,
                },
                AgingRule {
                    source: MaterialKind::Gravel,
                    influence_kind: MaterialKind::Stone,
                    base_probability_per_million: 1_000,
                    target: MaterialKind::Stone,
                },
                AgingRule {
                    source: MaterialKind::Wood,
                    influence_kind: MaterialKind::Vegetation,
                    base_probability_per_million: 1_500,
                    target: MaterialKind::Vegetation,
                },
                AgingRule {
                    source: MaterialKind::Metal,
                    influence_kind: MaterialKind::Gravel,
                    base_probability_per_million: 50,
                    target: MaterialKind::Gravel,
                },
                AgingRule {
                    source: MaterialKind::Bone,
                    influence_kind: MaterialKind::Vegetation,
                    base_probability_per_million: 3_000,
                    target: MaterialKind::Dirt,
                },
                AgingRule {
                    source: MaterialKind::Rope,
                    influence_kind: MaterialKind::Vegetation,
                    base_probability_per_million: 4_000,
                    target: MaterialKind::Vegetation,
                },
            ],
        }
    }
}

/// Lighting tuning: ray casting and the lit/unlit threshold.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Number of rays cast per sun column position.
    pub sun_rays_per_position: u32,
    /// Minimum accumulated light level a cell must reach to count as lit.
    pub min_light_threshold: f32,
    /// Maximum ray travel distance in blocks before it is discarded.
    pub max_light_ray_length_blocks: u32,
    /// Starting power of a cast ray before translucency attenuation.
    pub initial_light_ray_power: f32,
    /// Columns the sun source advances per tick.
    pub sun_movement_step_columns: u32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_rays_per_position: 9,
            min_light_threshold: 0.08,
            max_light_ray_length_blocks: 40,
            initial_light_ray_power: 1.0,
            sun_movement_step_columns: 1,
        }
    }
}

/// Portal/wave tuning.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaveConfig {
    /// Seconds of intermission before the first wave begins.
    pub wave_start_delay_seconds: f32,
    /// Seconds a warp-phase transition lasts.
    pub warp_phase_duration_seconds: f32,
    /// Portal safety-radius growth applied at the start of each wave.
    pub portal_radius_growth_per_wave: u32,
    /// Number of waves before victory.
    pub total_waves: u32,
    /// Portal starting health.
    pub portal_max_health: u32,
    /// Number of sub-waves enumerated within a single wave's active phase.
    pub sub_waves_per_wave: u32,
    /// Seconds between successive sub-wave starts within a wave.
    pub sub_wave_interval_seconds: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wave_start_delay_seconds: 10.0,
            warp_phase_duration_seconds: 3.0,
            portal_radius_growth_per_wave: 1,
            sub_waves_per_wave: 3,
            sub_wave_interval_seconds: 6.0,
            total_waves: 10,
            portal_max_health: 500,
        }
    }
}

/// Top-level configuration, composing every sub-config: grid size, physics
/// tuning, the aging rule table, lighting constants, and wave/portal
/// constants.
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid size and seed.
    pub world: WorldConfig,
    /// Physics constants.
    pub physics: PhysicsConfig,
    /// Aging rule constants.
    pub aging: AgingConfig,
    /// Lighting constants.
    pub lighting: LightingConfig,
    /// Wave/portal constants.
    pub waves: WaveConfig,
}

impl Config {
    /// Parses a [`Config`] from TOML text, falling back to per-field
    /// defaults for anything absent.
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        toml::from_str(text).map_err(|err| SimError::InvalidInputState(err.to_string()))
    }

    /// Reads and parses a [`Config`] from a TOML file on disk.
    pub fn from_file(path: &std::path::Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| SimError::InvalidInputState(format!("reading {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_every_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = Config::from_toml_str(
            r#"
            [world]
            width = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.height, WorldConfig::default().height);
    }

    #[test]
    fn malformed_toml_is_invalid_input_state() {
        let err = Config::from_toml_str("not valid toml [[[").unwrap_err();
        assert!(matches!(err, SimError::InvalidInputState(_)));
    }
}
