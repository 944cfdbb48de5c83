//! Force-based intake
//!
//! A simpler sibling of the spline collector: while the left grip is held,
//! tagged bodies inside the intake volume are pushed along the intake's
//! forward direction every fixed tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::detect::{OverlapTracker, TriggerEvent};
use super::spinner::Spinner;
use super::world::{Region, World};
use crate::input::GripReading;
use crate::settings::IntakeSettings;
use crate::tags::BIODIVERSITY_UNIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intake {
    pub region: Region,
    /// World orientation of the intake (transforms `settings.direction`)
    pub rotation: Quat,
    pub roller: Spinner,
    pub settings: IntakeSettings,
    active: bool,
    tracker: OverlapTracker,
}

impl Intake {
    pub fn new(region: Region, rotation: Quat, settings: IntakeSettings) -> Self {
        Self {
            region,
            rotation,
            roller: Spinner::new(Vec3::Z, settings.roller_speed),
            settings,
            active: false,
            tracker: OverlapTracker::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Variable-step update from the left grip.
    ///
    /// `None` (no valid device) keeps the previous state.
    pub fn update(&mut self, grip: Option<GripReading>, dt: f32) {
        if let Some(held) = grip.and_then(|g| g.held(self.settings.grip_threshold)) {
            if held != self.active {
                log::debug!("Intake {}", if held { "engaged" } else { "released" });
            }
            self.active = held;
        }

        if self.active {
            self.roller.spin(dt);
        }
    }

    /// World-space push applied to each body in the volume
    pub fn push_force(&self) -> Vec3 {
        self.rotation * self.settings.direction * self.settings.force
    }

    /// Fixed-step update: push every tagged body staying in the volume
    pub fn fixed_tick(&mut self, world: &mut World) {
        let events = self.tracker.scan(world, &self.region, BIODIVERSITY_UNIT);
        if !self.active {
            return;
        }
        let force = self.push_force();
        for event in events {
            match event {
                TriggerEvent::Enter(id) | TriggerEvent::Stay(id) => world.apply_force(id, force),
                TriggerEvent::Exit(_) => {}
            }
        }
    }
}
