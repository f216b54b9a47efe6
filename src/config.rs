//! Game balance and tunables
//!
//! Every constant the engine reads lives in [`GameConfig`]. Defaults match the
//! reference game; hosts may load overrides from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::palette::ColorPalette;

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Player drops at their own pace
    #[default]
    Relax,
    /// Circles auto-drop on a cadence that speeds up with score
    Speed,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Relax => "relax",
            GameMode::Speed => "speed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "relax" => Some(GameMode::Relax),
            "speed" => Some(GameMode::Speed),
            _ => None,
        }
    }
}

/// Configuration loading/validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Particle burst tuning (destroy effect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles per burst
    pub count: usize,
    /// Radial speed band (pixels/second)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Lifetime in milliseconds
    pub lifetime_ms: f64,
    /// Particle radius relative to the destroyed circle
    pub size_ratio: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 10,
            min_speed: 100.0,
            max_speed: 200.0,
            lifetime_ms: 500.0,
            size_ratio: 0.25,
        }
    }
}

/// Speed-mode auto-drop cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Interval at score 0
    pub base_interval_ms: f64,
    /// Interval reduction per score band
    pub step_ms: f64,
    /// Points per band
    pub score_band: u64,
    /// Interval never drops below this
    pub min_interval_ms: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 2000.0,
            step_ms: 100.0,
            score_band: 100,
            min_interval_ms: 500.0,
        }
    }
}

impl SpeedConfig {
    /// Auto-drop interval for the given score (non-increasing step function)
    pub fn interval_ms(&self, score: u64) -> f64 {
        let bands = score / self.score_band.max(1);
        let reduction = bands as f64 * self.step_ms;
        (self.base_interval_ms - reduction).max(self.min_interval_ms)
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play field width (pixels)
    pub width: f32,
    /// Play field height (pixels)
    pub height: f32,
    /// Drop zone height; the danger boundary sits at its lower edge
    pub drop_zone_height: f32,

    /// Radius per level at [`REFERENCE_WIDTH`]
    pub base_radii: Vec<f32>,
    /// Points per merge, indexed by the pre-merge level
    pub merge_points: Vec<u64>,
    /// Preview levels are drawn uniformly from `[0, spawn_levels)`
    pub spawn_levels: u8,
    /// Merge distance multiplier on the sum of radii
    pub merge_tolerance: f32,

    /// How long a circle may sit above the danger line
    pub danger_timeout_ms: f64,

    /// Points per destroy-charge milestone
    pub power_up_threshold: u64,
    /// Charge cap
    pub max_power_ups: u32,

    pub particles: ParticleConfig,
    pub speed: SpeedConfig,

    pub palette: ColorPalette,
    /// RNG seed for preview levels and particle speeds
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            drop_zone_height: DROP_ZONE_HEIGHT,
            base_radii: vec![
                15.0, 20.0, 25.0, 32.0, 40.0, 50.0, 62.0, 75.0, 90.0, 110.0, 135.0,
            ],
            merge_points: vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024],
            spawn_levels: 5,
            merge_tolerance: 1.05,
            danger_timeout_ms: 2000.0,
            power_up_threshold: 1000,
            max_power_ups: 1,
            particles: ParticleConfig::default(),
            speed: SpeedConfig::default(),
            palette: ColorPalette::default(),
            seed: 0x5EED,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Number of tiers
    pub fn level_count(&self) -> usize {
        self.base_radii.len()
    }

    /// Danger boundary (y-down)
    pub fn danger_line_y(&self) -> f32 {
        self.drop_zone_height
    }

    /// Preview circle height
    pub fn preview_y(&self) -> f32 {
        self.drop_zone_height / 2.0
    }

    /// Radius table scaled to the configured field width
    pub fn scaled_radii(&self) -> Vec<f32> {
        let scale = self.width / REFERENCE_WIDTH;
        self.base_radii.iter().map(|r| r * scale).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0) {
            return Err(invalid("width", "must be positive"));
        }
        if !(self.height > 0.0) {
            return Err(invalid("height", "must be positive"));
        }
        if !(self.drop_zone_height > 0.0 && self.drop_zone_height < self.height) {
            return Err(invalid("drop_zone_height", "must be inside the field"));
        }
        if self.base_radii.len() < 2 {
            return Err(invalid("base_radii", "need at least two levels"));
        }
        if self.base_radii.windows(2).any(|w| w[1] <= w[0]) || self.base_radii[0] <= 0.0 {
            return Err(invalid("base_radii", "must be positive and strictly increasing"));
        }
        if self.merge_points.len() != self.base_radii.len() {
            return Err(invalid(
                "merge_points",
                format!(
                    "expected {} entries, got {}",
                    self.base_radii.len(),
                    self.merge_points.len()
                ),
            ));
        }
        if self.spawn_levels == 0 || self.spawn_levels as usize > self.base_radii.len() {
            return Err(invalid("spawn_levels", "must be within the level table"));
        }
        if !(self.merge_tolerance.is_finite() && self.merge_tolerance >= 1.0) {
            return Err(invalid("merge_tolerance", "must be finite and at least 1.0"));
        }
        if !(self.danger_timeout_ms.is_finite() && self.danger_timeout_ms > 0.0) {
            return Err(invalid("danger_timeout_ms", "must be finite and positive"));
        }
        if self.power_up_threshold == 0 {
            return Err(invalid("power_up_threshold", "must be non-zero"));
        }
        let p = &self.particles;
        if p.min_speed < 0.0 || p.max_speed < p.min_speed {
            return Err(invalid("particles", "speed band is inverted"));
        }
        if p.count == 0 {
            return Err(invalid("particles.count", "must be at least 1"));
        }
        if !(p.size_ratio >= 0.0) {
            return Err(invalid("particles.size_ratio", "must be non-negative"));
        }
        if !(p.lifetime_ms > 0.0) {
            return Err(invalid("particles.lifetime_ms", "must be positive"));
        }
        let s = &self.speed;
        if !(s.min_interval_ms > 0.0) || s.min_interval_ms > s.base_interval_ms {
            return Err(invalid(
                "speed.min_interval_ms",
                "must be positive and not above the base interval",
            ));
        }
        if s.step_ms < 0.0 || s.score_band == 0 {
            return Err(invalid("speed", "step must be non-negative and band non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level_count(), LEVEL_COUNT);
        assert_eq!(config.danger_line_y(), 80.0);
        assert_eq!(config.preview_y(), 40.0);
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = GameConfig::from_json(r#"{ "max_power_ups": 3, "speed": { "min_interval_ms": 800 } }"#)
            .expect("valid config");
        assert_eq!(config.max_power_ups, 3);
        assert_eq!(config.speed.min_interval_ms, 800.0);
        assert_eq!(config.speed.base_interval_ms, 2000.0);
        assert_eq!(config.width, FIELD_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_mismatched_tables() {
        let err = GameConfig::from_json(r#"{ "merge_points": [1, 2, 4] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "merge_points", .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    fn rejected_field(json: &str) -> &'static str {
        match GameConfig::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_rejects_non_positive_danger_timeout() {
        assert_eq!(rejected_field(r#"{ "danger_timeout_ms": -1 }"#), "danger_timeout_ms");
        assert_eq!(rejected_field(r#"{ "danger_timeout_ms": 0 }"#), "danger_timeout_ms");
    }

    #[test]
    fn test_from_json_rejects_low_merge_tolerance() {
        assert_eq!(rejected_field(r#"{ "merge_tolerance": 0.9 }"#), "merge_tolerance");
    }

    #[test]
    fn test_from_json_rejects_negative_size_ratio() {
        assert_eq!(
            rejected_field(r#"{ "particles": { "size_ratio": -0.5 } }"#),
            "particles.size_ratio"
        );
    }

    #[test]
    fn test_from_json_rejects_empty_burst() {
        assert_eq!(rejected_field(r#"{ "particles": { "count": 0 } }"#), "particles.count");
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        // JSON cannot carry infinities, so build these directly
        let config = GameConfig {
            merge_tolerance: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "merge_tolerance", .. })
        ));

        let config = GameConfig {
            danger_timeout_ms: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "danger_timeout_ms", .. })
        ));
    }

    #[test]
    fn test_scaled_radii() {
        let config = GameConfig {
            width: 800.0,
            ..Default::default()
        };
        let radii = config.scaled_radii();
        assert_eq!(radii[0], 30.0);
        assert_eq!(radii[10], 270.0);
    }

    #[test]
    fn test_interval_steps_and_floor() {
        let speed = SpeedConfig::default();
        assert_eq!(speed.interval_ms(0), 2000.0);
        assert_eq!(speed.interval_ms(99), 2000.0);
        assert_eq!(speed.interval_ms(100), 1900.0);
        assert_eq!(speed.interval_ms(1_000), 1000.0);
        assert_eq!(speed.interval_ms(1_000_000), 500.0);
    }

    #[test]
    fn test_game_mode_parse() {
        assert_eq!(GameMode::parse("Speed"), Some(GameMode::Speed));
        assert_eq!(GameMode::parse(" relax "), Some(GameMode::Relax));
        assert_eq!(GameMode::parse("turbo"), None);
        assert_eq!(GameMode::Speed.as_str(), "speed");
    }
}
