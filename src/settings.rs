//! Run settings and tunables
//!
//! Loaded from JSON (all fields optional, missing ones take the defaults in `consts`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};

/// Physics and scheduling tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Body radius
    pub radius: f32,
    /// Per-axis spawn velocity range, also used for anti-stall impulses
    pub spawn_speed: f32,
    /// Speed clamp applied after collisions
    pub max_speed: f32,
    /// Wall restitution (>= 1 keeps bodies from slowly losing energy)
    pub wall_restitution: f32,
    /// Body-body restitution
    pub body_restitution: f32,
    /// Thickness of the four boundary walls
    pub wall_thickness: f32,
    /// Anti-stall speed threshold
    pub stall_epsilon: f32,
    /// Integration step (simulation units)
    pub dt: f32,
    /// Fast tick period (seconds)
    pub fast_period: f32,
    /// Slow tick period (seconds)
    pub slow_period: f32,
    /// Clamp on host frame delta (seconds)
    pub max_frame_time: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            radius: BODY_RADIUS,
            spawn_speed: SPAWN_SPEED,
            max_speed: MAX_SPEED,
            wall_restitution: WALL_RESTITUTION,
            body_restitution: BODY_RESTITUTION,
            wall_thickness: WALL_THICKNESS,
            stall_epsilon: STALL_EPSILON,
            dt: SIM_DT,
            fast_period: FAST_PERIOD,
            slow_period: SLOW_PERIOD,
            max_frame_time: MAX_FRAME_TIME,
        }
    }
}

impl Tunables {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.radius) {
            return Err(ConfigError::InvalidTunable("radius must be positive"));
        }
        if !positive(self.spawn_speed) {
            return Err(ConfigError::InvalidTunable("spawn_speed must be positive"));
        }
        if !positive(self.max_speed) || self.max_speed < self.spawn_speed {
            return Err(ConfigError::InvalidTunable(
                "max_speed must be positive and at least spawn_speed",
            ));
        }
        if !positive(self.wall_restitution) || !positive(self.body_restitution) {
            return Err(ConfigError::InvalidTunable("restitution must be positive"));
        }
        if !positive(self.wall_thickness) {
            return Err(ConfigError::InvalidTunable("wall_thickness must be positive"));
        }
        if !self.stall_epsilon.is_finite() || self.stall_epsilon < 0.0 {
            return Err(ConfigError::InvalidTunable(
                "stall_epsilon must be non-negative",
            ));
        }
        if !positive(self.dt) {
            return Err(ConfigError::InvalidTunable("dt must be positive"));
        }
        if !positive(self.fast_period) || !positive(self.slow_period) {
            return Err(ConfigError::InvalidTunable("tick periods must be positive"));
        }
        if !positive(self.max_frame_time) {
            return Err(ConfigError::InvalidTunable("max_frame_time must be positive"));
        }
        Ok(())
    }
}

/// Configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bodies spawned per kind (total = 3x this)
    pub bodies_per_kind: u32,
    /// Arena width
    pub arena_width: f32,
    /// Arena height
    pub arena_height: f32,
    /// Optional RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Physics and scheduling tunables
    pub tunables: Tunables,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bodies_per_kind: BODIES_PER_KIND,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            seed: None,
            tunables: Tunables::default(),
        }
    }
}

impl Settings {
    /// Reject configurations a run cannot start from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bodies_per_kind == 0 {
            return Err(ConfigError::InvalidBodiesPerKind);
        }
        let (width, height) = (self.arena_width, self.arena_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidArena { width, height });
        }
        self.tunables.validate()?;
        let diameter = self.tunables.radius * 2.0;
        if width <= diameter || height <= diameter {
            return Err(ConfigError::ArenaTooSmall {
                width,
                height,
                radius: self.tunables.radius,
            });
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Total number of bodies in a run
    pub fn total_bodies(&self) -> usize {
        self.bodies_per_kind as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.total_bodies(), 30);
    }

    #[test]
    fn test_rejects_zero_bodies() {
        let settings = Settings {
            bodies_per_kind: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::InvalidBodiesPerKind));
    }

    #[test]
    fn test_rejects_non_positive_arena() {
        for (width, height) in [(0.0, 600.0), (800.0, -1.0), (f32::NAN, 600.0)] {
            let settings = Settings {
                arena_width: width,
                arena_height: height,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidArena { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_arena_smaller_than_body() {
        let settings = Settings {
            arena_width: 30.0,
            arena_height: 600.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_tunable() {
        let mut settings = Settings::default();
        settings.tunables.fast_period = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidTunable(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "bodies_per_kind": 4, "tunables": { "radius": 10.0 } }"#)
                .unwrap();
        assert_eq!(settings.bodies_per_kind, 4);
        assert_eq!(settings.arena_width, ARENA_WIDTH);
        assert_eq!(settings.tunables.radius, 10.0);
        assert_eq!(settings.tunables.spawn_speed, SPAWN_SPEED);
    }

    #[test]
    fn test_json_validation_error_surfaces() {
        let err = Settings::from_json(r#"{ "bodies_per_kind": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::InvalidBodiesPerKind)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let written = Settings {
            bodies_per_kind: 6,
            seed: Some(77),
            ..Default::default()
        };
        serde_json::to_writer(&mut file, &written).unwrap();

        let loaded = Settings::load(file.path()).unwrap();
        assert_eq!(loaded, written);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{ "arena_height": 0.0 }"#).unwrap();
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::InvalidArena { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
