//! VR Collector - engine-independent gameplay mechanics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spline carry, intake, accelerator, world)
//! - `input`: XR controller abstraction (grip polling, device re-acquisition)
//! - `ui`: Main menu and tutorial flow
//! - `settings`: Data-driven tuning, persisted as JSON

pub mod input;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{Settings, SettingsError};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, matches the host engine's physics step)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity applied to dynamic bodies (m/s²)
    pub const GRAVITY: f32 = -9.81;

    /// Parametric look-ahead used to derive the facing direction on a path
    pub const LOOK_AHEAD: f32 = 0.01;
    /// Lower bound on path duration to avoid division by zero
    pub const MIN_PATH_DURATION: f32 = 0.0001;
}

/// Tags used to filter trigger events
pub mod tags {
    pub const BIODIVERSITY_UNIT: &str = "BiodiversityUnit";
    pub const ACCELERATOR_ZONE_1: &str = "AcceleratorZone1";
    pub const ACCELERATOR_ZONE_2: &str = "AcceleratorZone2";

    /// Returns true for either accelerator zone tag
    pub fn is_accelerator_zone(tag: &str) -> bool {
        tag == ACCELERATOR_ZONE_1 || tag == ACCELERATOR_ZONE_2
    }
}

/// Convert revolutions per minute to degrees per second
#[inline]
pub fn rpm_to_degrees_per_sec(rpm: f32) -> f32 {
    rpm * 360.0 / 60.0
}

/// Component-wise approximate equality (for tests and tolerance checks)
#[inline]
pub fn approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpm_conversion() {
        assert!((rpm_to_degrees_per_sec(250.0) - 1500.0).abs() < 1e-3);
        assert_eq!(rpm_to_degrees_per_sec(0.0), 0.0);
    }

    #[test]
    fn test_accelerator_tags() {
        assert!(tags::is_accelerator_zone("AcceleratorZone1"));
        assert!(tags::is_accelerator_zone("AcceleratorZone2"));
        assert!(!tags::is_accelerator_zone("BiodiversityUnit"));
    }
}
