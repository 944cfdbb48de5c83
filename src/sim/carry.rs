//! Spline collector: claims tagged bodies and carries them along a path
//!
//! Lifecycle of a carried body:
//! - `Idle`: free, simulated by the world as usual
//! - `Carrying`: every collider switched to trigger, body kinematic, position
//!   driven by the path each fixed tick while progress advances monotonically
//! - `Released`: original collider flags restored one by one, body dropped
//!   just above the path end and handed back to the world

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::detect::{OverlapTracker, TriggerEvent};
use super::spinner::Spinner;
use super::spline::{CatmullRomPath, PathError};
use super::state::SimEvent;
use super::world::{BodyId, CarrierId, Region, World};
use crate::consts::MIN_PATH_DURATION;
use crate::settings::CollectorSettings;
use crate::tags::BIODIVERSITY_UNIT;

/// Where a body stands relative to a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarryPhase {
    Idle,
    Carrying,
    Released,
}

/// Physics flags saved when carrying starts
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedPhysics {
    /// Per-collider trigger flag, indexed like `Body::colliders`
    is_trigger: Vec<bool>,
    kinematic: bool,
}

/// A body currently riding the path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carried {
    pub body: BodyId,
    /// Fraction of the path travelled, unclamped
    pub progress: f32,
    saved: SavedPhysics,
}

/// Spline intake mechanism
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    pub id: CarrierId,
    path: CatmullRomPath,
    pub detection: Region,
    pub parts: Vec<Spinner>,
    pub settings: CollectorSettings,
    spinning: bool,
    carried: Vec<Carried>,
    /// Released bodies still present in the world, for phase queries
    released: Vec<BodyId>,
    tracker: OverlapTracker,
}

impl Collector {
    pub fn new(
        id: CarrierId,
        control_points: Vec<Vec3>,
        detection: Region,
        part_count: usize,
        settings: CollectorSettings,
    ) -> Result<Self, PathError> {
        let path = CatmullRomPath::new(control_points).inspect_err(|e| {
            log::error!("Collector {:?}: {}", id, e);
        })?;

        if detection.is_degenerate() {
            log::error!(
                "Collector {:?}: detection region {:?} has no volume, nothing will be collected",
                id,
                detection
            );
        }

        let parts = (0..part_count)
            .map(|_| Spinner::new(settings.rotation_axis, settings.rotation_speed))
            .collect();

        Ok(Self {
            id,
            path,
            detection,
            parts,
            spinning: settings.automatic_mode,
            settings,
            carried: Vec::new(),
            released: Vec::new(),
            tracker: OverlapTracker::new(),
        })
    }

    pub fn path(&self) -> &CatmullRomPath {
        &self.path
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn carried(&self) -> &[Carried] {
        &self.carried
    }

    pub fn phase_of(&self, body: BodyId) -> CarryPhase {
        if self.carried.iter().any(|c| c.body == body) {
            CarryPhase::Carrying
        } else if self.released.contains(&body) {
            CarryPhase::Released
        } else {
            CarryPhase::Idle
        }
    }

    /// Variable-step update: spin collector parts.
    ///
    /// In automatic mode the parts always spin. Otherwise `toggle` flips the
    /// spinning flag and parts only turn while it is set.
    pub fn update_rotation(&mut self, dt: f32, toggle: bool) {
        if self.settings.automatic_mode {
            self.spinning = true;
        } else if toggle {
            self.spinning = !self.spinning;
            log::debug!("Collector {:?} spinning: {}", self.id, self.spinning);
        }

        if self.spinning {
            for part in &mut self.parts {
                part.spin(dt);
            }
        }
    }

    /// Scan the detection region and start carrying newly entered bodies
    pub fn detect(&mut self, world: &mut World, events: &mut Vec<SimEvent>) {
        for event in self.tracker.scan(world, &self.detection, BIODIVERSITY_UNIT) {
            if let TriggerEvent::Enter(id) = event {
                self.handle_detection_enter(world, id, events);
            }
        }
    }

    /// A body entered the detection volume
    pub fn handle_detection_enter(
        &mut self,
        world: &mut World,
        id: BodyId,
        events: &mut Vec<SimEvent>,
    ) {
        if !self.spinning {
            return;
        }
        let Some(body) = world.get(id) else {
            return;
        };
        if !body.compare_tag(BIODIVERSITY_UNIT) {
            return;
        }
        if let Some(owner) = body.carrier {
            log::debug!(
                "Collector {:?}: '{}' already claimed by {:?}, skipping",
                self.id,
                body.name,
                owner
            );
            return;
        }
        self.start_carry(world, id, events);
    }

    fn start_carry(&mut self, world: &mut World, id: BodyId, events: &mut Vec<SimEvent>) {
        let Some(body) = world.get_mut(id) else {
            return;
        };

        let saved = SavedPhysics {
            is_trigger: body.colliders.iter().map(|c| c.is_trigger).collect(),
            kinematic: body.kinematic,
        };
        for collider in &mut body.colliders {
            collider.is_trigger = true;
        }
        body.vel = Vec3::ZERO;
        body.ang_vel = Vec3::ZERO;
        body.kinematic = true;
        body.carrier = Some(self.id);

        if self.settings.debug_logs {
            log::info!("Collector {:?}: started carrying '{}'", self.id, body.name);
        }

        self.released.retain(|&b| b != id);
        self.carried.push(Carried {
            body: id,
            progress: 0.0,
            saved,
        });
        events.push(SimEvent::CarryStarted {
            collector: self.id,
            body: id,
        });
    }

    /// Fixed-step update: advance every carried body along the path
    pub fn fixed_tick(&mut self, world: &mut World, dt: f32, events: &mut Vec<SimEvent>) {
        let duration = self.settings.path_duration.max(MIN_PATH_DURATION);
        self.released.retain(|&id| world.get(id).is_some());

        for i in (0..self.carried.len()).rev() {
            let id = self.carried[i].body;
            let Some(rot) = world.get(id).map(|b| b.rot) else {
                log::warn!("Collector {:?}: carried body {:?} vanished", self.id, id);
                self.carried.remove(i);
                events.push(SimEvent::CarryLost {
                    collector: self.id,
                    body: id,
                });
                continue;
            };

            let carried = &mut self.carried[i];
            carried.progress += dt / duration;
            let t = carried.progress.clamp(0.0, 1.0);

            world.move_position(id, self.path.evaluate(t));
            if self.settings.path_face_forward {
                world.move_rotation(id, self.path.facing(t, rot));
            }

            if t >= 1.0 {
                let carried = self.carried.remove(i);
                self.release(world, carried, events);
            }
        }
    }

    fn release(&mut self, world: &mut World, carried: Carried, events: &mut Vec<SimEvent>) {
        let drop_pos = self.path.end() + Vec3::Y * self.settings.final_drop_offset;
        let Some(body) = world.get_mut(carried.body) else {
            return;
        };

        body.pos = drop_pos;
        for (collider, &was_trigger) in body.colliders.iter_mut().zip(&carried.saved.is_trigger) {
            collider.is_trigger = was_trigger;
        }
        body.kinematic = carried.saved.kinematic;
        body.vel = Vec3::ZERO;
        body.ang_vel = Vec3::ZERO;
        body.carrier = None;

        if self.settings.debug_logs {
            log::info!("Collector {:?}: '{}' physics restored", self.id, body.name);
        }
        world.wake_up(carried.body);

        self.released.push(carried.body);
        events.push(SimEvent::CarryReleased {
            collector: self.id,
            body: carried.body,
            pos: drop_pos,
        });
    }
}
