//! Local-space rotation for wheels, rollers, and collector parts

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A part that spins about a local axis at a constant rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spinner {
    /// Local rotation axis (normalized on construction)
    pub axis: Vec3,
    /// Degrees per second
    pub speed_deg: f32,
    pub rotation: Quat,
}

impl Spinner {
    pub fn new(axis: Vec3, speed_deg: f32) -> Self {
        let axis = axis.try_normalize().unwrap_or_else(|| {
            log::warn!("Spinner axis {:?} has no length, falling back to +Y", axis);
            Vec3::Y
        });
        Self {
            axis,
            speed_deg,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotate by `speed_deg * dt` about the local axis
    pub fn spin(&mut self, dt: f32) {
        let angle = (self.speed_deg * dt).to_radians();
        if angle != 0.0 {
            self.rotation = (self.rotation * Quat::from_axis_angle(self.axis, angle)).normalize();
        }
    }

    /// Signed angle turned about the spin axis, in degrees [-180, 180]
    pub fn angle_deg(&self) -> f32 {
        let (axis, angle) = self.rotation.to_axis_angle();
        let signed = if axis.dot(self.axis) < 0.0 { -angle } else { angle };
        let deg = signed.to_degrees();
        if deg > 180.0 { deg - 360.0 } else if deg < -180.0 { deg + 360.0 } else { deg }
    }
}
