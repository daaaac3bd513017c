//! Spawn engine tuning
//!
//! Loaded from JSON by the content layer, or built from defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SpawnError;
use crate::sim::geometry::CurveShape;

/// A spawn region template, anchored at `offset` from the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSettings {
    pub name: String,
    pub shape: CurveShape,
    pub radius: f32,
    pub offset: Vec2,
}

impl RegionSettings {
    pub fn new(name: &str, shape: CurveShape, radius: f32, offset: Vec2) -> Self {
        Self {
            name: name.to_string(),
            shape,
            radius,
            offset,
        }
    }
}

/// Spawn engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Spawn table / pool ===
    /// Pool sizing constant K (pool = ceil(K / weight))
    pub pool_constant: f32,
    /// Lower bound of the tie-break perturbation
    pub perturbation_min: f32,
    /// Upper bound of the tie-break perturbation
    pub perturbation_max: f32,

    // === Difficulty ===
    /// Game seconds per unit of difficulty floor
    pub difficulty_window_seconds: f32,
    /// Gap kept between the floor and the total weight
    pub floor_margin: f32,

    // === Clock ===
    pub fast_tick_interval: f32,
    pub spawn_tick_interval: f32,
    pub game_tick_interval: f32,
    /// Maximum fast ticks per `advance` call
    pub max_substeps: u32,

    // === Culling ===
    /// Off-screen skip counter threshold
    pub offscreen_skip_threshold: u8,
    /// Recycle instances that stay off-screen this long (None = never)
    pub offscreen_despawn_seconds: Option<f32>,
    /// Window of the per-slot AI phase stagger
    pub ai_stagger_seconds: f32,

    // === Spawn regions ===
    /// Player travel that forces a re-center between spawn ticks
    pub recenter_distance: f32,
    pub regions: Vec<RegionSettings>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pool_constant: POOL_CONSTANT,
            perturbation_min: TIE_PERTURBATION_MIN,
            perturbation_max: TIE_PERTURBATION_MAX,

            difficulty_window_seconds: DIFFICULTY_WINDOW_SECONDS,
            floor_margin: FLOOR_MARGIN,

            fast_tick_interval: FAST_TICK_INTERVAL,
            spawn_tick_interval: SPAWN_TICK_INTERVAL,
            game_tick_interval: GAME_TICK_INTERVAL,
            max_substeps: MAX_SUBSTEPS,

            offscreen_skip_threshold: OFFSCREEN_SKIP_THRESHOLD,
            offscreen_despawn_seconds: Some(OFFSCREEN_DESPAWN_SECONDS),
            ai_stagger_seconds: AI_STAGGER_SECONDS,

            recenter_distance: RECENTER_DISTANCE,
            regions: default_regions(),
        }
    }
}

/// The five reference spawn regions
pub fn default_regions() -> Vec<RegionSettings> {
    vec![
        RegionSettings::new(
            "ring",
            CurveShape::Circle {
                segments: CIRCLE_SEGMENTS,
            },
            640.0,
            Vec2::ZERO,
        ),
        RegionSettings::new(
            "wide_ring",
            CurveShape::Circle {
                segments: CIRCLE_SEGMENTS,
            },
            960.0,
            Vec2::new(0.0, 40.0),
        ),
        RegionSettings::new("hexagon", CurveShape::Hexagon, 720.0, Vec2::new(-40.0, 0.0)),
        RegionSettings::new("diamond", CurveShape::Diamond, 800.0, Vec2::new(40.0, 0.0)),
        RegionSettings::new("star", CurveShape::Star, 880.0, Vec2::new(0.0, -40.0)),
    ]
}

impl EngineSettings {
    /// Decode settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SpawnError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpawnError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SpawnError::SettingsRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SpawnError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunables that would make the engine misbehave
    pub fn validate(&self) -> Result<(), SpawnError> {
        let positive = [
            ("pool_constant", self.pool_constant),
            ("difficulty_window_seconds", self.difficulty_window_seconds),
            ("fast_tick_interval", self.fast_tick_interval),
            ("spawn_tick_interval", self.spawn_tick_interval),
            ("game_tick_interval", self.game_tick_interval),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SpawnError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.floor_margin < 0.0 {
            return Err(SpawnError::InvalidSettings(format!(
                "floor_margin must not be negative, got {}",
                self.floor_margin
            )));
        }
        let finite_range = self.perturbation_min.is_finite() && self.perturbation_max.is_finite();
        if !(finite_range && self.perturbation_min > 0.0 && self.perturbation_min < self.perturbation_max) {
            return Err(SpawnError::InvalidSettings(format!(
                "perturbation range {}..{} is empty",
                self.perturbation_min, self.perturbation_max
            )));
        }
        if self.max_substeps == 0 {
            return Err(SpawnError::InvalidSettings(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(SpawnError::InvalidSettings(
                "at least one spawn region is required".to_string(),
            ));
        }
        if let Some(region) = self.regions.iter().find(|r| !(r.radius.is_finite() && r.radius > 0.0)) {
            return Err(SpawnError::InvalidSettings(format!(
                "region '{}' has non-positive radius {}",
                region.name, region.radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.regions.len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EngineSettings::from_json(r#"{ "pool_constant": 200.0 }"#).unwrap();
        assert_eq!(settings.pool_constant, 200.0);
        assert_eq!(settings.floor_margin, FLOOR_MARGIN);
        assert_eq!(settings.regions.len(), 5);
    }

    #[test]
    fn test_json_roundtrip_keeps_regions() {
        let settings = EngineSettings::default();
        let json = settings.to_json().unwrap();
        let back = EngineSettings::from_json(&json).unwrap();
        assert_eq!(back.regions, settings.regions);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let settings = EngineSettings {
            spawn_tick_interval: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SpawnError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_rejects_empty_regions() {
        let settings = EngineSettings {
            regions: Vec::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let settings = EngineSettings {
            perturbation_max: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SpawnError::InvalidSettings(_))
        ));

        let mut settings = EngineSettings::default();
        settings.regions[2].radius = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SpawnError::InvalidSettings(msg)) if msg.contains("hexagon")
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EngineSettings::from_file("no/such/dir/settings.json").unwrap_err();
        assert!(matches!(&err, SpawnError::SettingsRead { path, .. } if path.contains("settings.json")));
        assert!(err.to_string().contains("cannot read settings file"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            EngineSettings::from_json("{ not json"),
            Err(SpawnError::SettingsParse(_))
        ));
    }
}
