//! Rigid-body store standing in for the host physics engine
//!
//! The mechanics only need a handful of things from a physics body: where it
//! is, whether it is simulated, and whether its collision volumes block other
//! bodies. This module models exactly that and no more.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Stable body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Identifier of a mechanism that may claim bodies for exclusive control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierId(pub u32);

/// A single collision volume attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    /// Trigger volumes report overlaps but never obstruct
    pub is_trigger: bool,
}

impl Collider {
    pub fn solid() -> Self {
        Self { is_trigger: false }
    }

    pub fn trigger() -> Self {
        Self { is_trigger: true }
    }
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub tag: String,
    pub pos: Vec3,
    pub rot: Quat,
    pub vel: Vec3,
    pub ang_vel: Vec3,
    /// Bounding sphere radius used for overlap queries
    pub radius: f32,
    /// Kinematic bodies ignore gravity and forces
    pub kinematic: bool,
    pub colliders: Vec<Collider>,
    pub sleeping: bool,
    /// Mechanism currently in exclusive control of this body
    pub carrier: Option<CarrierId>,
    /// Force accumulated since the last integration step
    #[serde(skip)]
    force: Vec3,
}

impl Body {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, pos: Vec3, radius: f32) -> Self {
        Self {
            id: BodyId(0),
            name: name.into(),
            tag: tag.into(),
            pos,
            rot: Quat::IDENTITY,
            vel: Vec3::ZERO,
            ang_vel: Vec3::ZERO,
            radius,
            kinematic: false,
            colliders: vec![Collider::solid()],
            sleeping: false,
            carrier: None,
            force: Vec3::ZERO,
        }
    }

    pub fn with_colliders(mut self, colliders: Vec<Collider>) -> Self {
        self.colliders = colliders;
        self
    }

    pub fn compare_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Force waiting to be applied on the next integration step
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }
}

/// Axis-aligned box region used for trigger volumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Region {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// True for a region with no volume (never overlaps anything)
    pub fn is_degenerate(&self) -> bool {
        self.half_extents.min_element() <= 0.0 || !self.half_extents.is_finite()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        d.cmple(self.half_extents).all()
    }

    /// Sphere vs box overlap (closest point test)
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let closest = center.clamp(min, max);
        closest.distance_squared(center) <= radius * radius
    }
}

/// All bodies in the scene, kept sorted by id for deterministic iteration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    bodies: Vec<Body>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a body, assigning it a fresh id
    pub fn spawn(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => Some(&mut self.bodies[i]),
            Err(_) => None,
        }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let i = self.bodies.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(self.bodies.remove(i))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Accumulate a force on a dynamic body; ignored for kinematic bodies
    pub fn apply_force(&mut self, id: BodyId, force: Vec3) {
        if let Some(body) = self.get_mut(id) {
            if !body.kinematic {
                body.force += force;
                body.sleeping = false;
            }
        }
    }

    /// Teleport-style move used for kinematic bodies
    pub fn move_position(&mut self, id: BodyId, pos: Vec3) {
        if let Some(body) = self.get_mut(id) {
            body.pos = pos;
        }
    }

    pub fn move_rotation(&mut self, id: BodyId, rot: Quat) {
        if let Some(body) = self.get_mut(id) {
            body.rot = rot;
        }
    }

    pub fn wake_up(&mut self, id: BodyId) {
        if let Some(body) = self.get_mut(id) {
            body.sleeping = false;
        }
    }

    /// Ids of bodies with `tag` whose bounding sphere touches `region`
    pub fn bodies_overlapping(&self, region: &Region, tag: &str) -> Vec<BodyId> {
        if region.is_degenerate() {
            return Vec::new();
        }
        self.bodies
            .iter()
            .filter(|b| b.compare_tag(tag) && region.overlaps_sphere(b.pos, b.radius))
            .map(|b| b.id)
            .collect()
    }

    /// Semi-implicit Euler step for dynamic bodies (unit mass)
    pub fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            let force = std::mem::take(&mut body.force);
            if body.kinematic || body.sleeping {
                continue;
            }
            body.vel += (force + Vec3::new(0.0, GRAVITY, 0.0)) * dt;
            body.pos += body.vel * dt;
            let spin = body.ang_vel * dt;
            if spin.length_squared() > 0.0 {
                body.rot = (Quat::from_scaled_axis(spin) * body.rot).normalize();
            }
        }
    }
}
