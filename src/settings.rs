//! Simulation tuning
//!
//! Every knob the mechanics read lives here so a level can be rebalanced from
//! a JSON file without recompiling. Missing fields fall back to defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Spline collector tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorSettings {
    /// Seconds to travel the whole path
    pub path_duration: f32,
    /// Orient carried bodies along the path tangent
    pub path_face_forward: bool,
    /// Vertical offset above the last path point on release (meters)
    pub final_drop_offset: f32,
    /// Local axis the collector parts spin around
    pub rotation_axis: Vec3,
    /// Collector part spin speed (degrees/sec)
    pub rotation_speed: f32,
    /// Always spinning; when false a toggle input controls it
    pub automatic_mode: bool,
    /// Log every carry start/release
    pub debug_logs: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            path_duration: 3.0,
            path_face_forward: true,
            final_drop_offset: 0.2, // 20 cm
            rotation_axis: Vec3::Y,
            rotation_speed: 50.0,
            automatic_mode: true,
            debug_logs: true,
        }
    }
}

/// Force-based intake tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeSettings {
    pub force: f32,
    /// Local push direction, transformed by the intake's rotation
    pub direction: Vec3,
    /// Roller spin speed (degrees/sec)
    pub roller_speed: f32,
    /// Analog grip value above which the intake counts as held
    pub grip_threshold: f32,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            force: 10.0,
            direction: Vec3::Z,
            roller_speed: 360.0,
            grip_threshold: 0.1,
        }
    }
}

/// Accelerator wheel tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratorSettings {
    /// Wheel speed while cranked (rotations per minute)
    pub target_rpm: f32,
    /// Continuous cranking needed for the Medium spawn state (seconds)
    pub medium_after: f32,
    /// Continuous cranking needed for the High spawn state (seconds)
    pub high_after: f32,
    /// Free-standing wheel axis
    pub wheel_axis: Vec3,
    /// Free-standing wheel speed (degrees/sec)
    pub wheel_speed: f32,
}

impl Default for AcceleratorSettings {
    fn default() -> Self {
        Self {
            target_rpm: 250.0,
            medium_after: 5.0,
            high_after: 10.0,
            wheel_axis: Vec3::X,
            wheel_speed: 100.0,
        }
    }
}

/// Dispenser tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispenserSettings {
    /// Seconds without cranking before the spawn state drops one level
    pub downgrade_delay: f32,
    /// Spawn period per state (seconds)
    pub low_interval: f32,
    pub medium_interval: f32,
    pub high_interval: f32,
    /// Horizontal jitter applied to spawn positions (meters)
    pub spawn_jitter: f32,
    /// Radius of spawned units (meters)
    pub unit_radius: f32,
    /// Dispenser stops spawning once this many of its units are alive
    pub max_units: usize,
}

impl Default for DispenserSettings {
    fn default() -> Self {
        Self {
            downgrade_delay: 3.0,
            low_interval: 4.0,
            medium_interval: 2.0,
            high_interval: 1.0,
            spawn_jitter: 0.1,
            unit_radius: 0.1,
            max_units: 32,
        }
    }
}

/// Full simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for dispenser jitter
    pub seed: u64,
    pub collector: CollectorSettings,
    pub intake: IntakeSettings,
    pub accelerator: AcceleratorSettings,
    pub dispenser: DispenserSettings,
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file. Falls back to defaults on any error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Settings file malformed, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Spin speed of accelerator wheels in degrees/sec
    pub fn accelerator_degrees_per_sec(&self) -> f32 {
        crate::rpm_to_degrees_per_sec(self.accelerator.target_rpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_tuning() {
        let s = Settings::default();
        assert_eq!(s.collector.path_duration, 3.0);
        assert!(s.collector.path_face_forward);
        assert!((s.collector.final_drop_offset - 0.2).abs() < f32::EPSILON);
        assert_eq!(s.intake.grip_threshold, 0.1);
        assert_eq!(s.accelerator.target_rpm, 250.0);
        assert!((s.accelerator_degrees_per_sec() - 1500.0).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "collector": { "path_duration": 5.0 } }"#).unwrap();
        assert_eq!(s.collector.path_duration, 5.0);
        assert!(s.collector.automatic_mode);
        assert_eq!(s.intake.force, 10.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("vr_collector_settings_does_not_exist.json");
        let s = Settings::load(&path);
        assert_eq!(s.seed, 0);
        assert_eq!(s.dispenser.max_units, 32);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "vr_collector_settings_{}.json",
            std::process::id()
        ));
        let mut s = Settings::default();
        s.seed = 42;
        s.intake.force = 25.0;
        s.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.seed, 42);
        assert_eq!(loaded.intake.force, 25.0);
        let _ = std::fs::remove_file(&path);
    }
}
