//! Biodiversity unit dispenser
//!
//! Spawns units at a rate set by its spawn state. Cranking an accelerator
//! raises the state; without cranking it decays one level per
//! `downgrade_delay`.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::world::{Body, BodyId, World};
use crate::settings::DispenserSettings;
use crate::tags::BIODIVERSITY_UNIT;

/// Index of a dispenser inside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispenserId(pub usize);

/// Spawn rate level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SpawnState {
    #[default]
    Low,
    Medium,
    High,
}

impl SpawnState {
    /// One level down, saturating at Low
    pub fn downgraded(self) -> Self {
        match self {
            SpawnState::High => SpawnState::Medium,
            SpawnState::Medium | SpawnState::Low => SpawnState::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispenser {
    pub id: DispenserId,
    /// Spawn point
    pub outlet: Vec3,
    pub settings: DispenserSettings,
    state: SpawnState,
    /// Seconds since the last accelerator reset
    downgrade_timer: f32,
    /// Seconds since the last spawn
    spawn_timer: f32,
    spawned: Vec<BodyId>,
    spawn_count: u32,
}

impl Dispenser {
    pub fn new(id: DispenserId, outlet: Vec3, settings: DispenserSettings) -> Self {
        Self {
            id,
            outlet,
            settings,
            state: SpawnState::Low,
            downgrade_timer: 0.0,
            spawn_timer: 0.0,
            spawned: Vec::new(),
            spawn_count: 0,
        }
    }

    pub fn state(&self) -> SpawnState {
        self.state
    }

    /// Set the spawn state; returns true when it changed
    pub fn set_state(&mut self, state: SpawnState) -> bool {
        if state == self.state {
            return false;
        }
        log::info!("Dispenser {:?}: {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
        true
    }

    pub fn reset_downgrade_timer(&mut self) {
        self.downgrade_timer = 0.0;
    }

    pub fn spawn_interval(&self) -> f32 {
        match self.state {
            SpawnState::Low => self.settings.low_interval,
            SpawnState::Medium => self.settings.medium_interval,
            SpawnState::High => self.settings.high_interval,
        }
    }

    /// Units from this dispenser still present in the world
    pub fn live_units(&self) -> usize {
        self.spawned.len()
    }

    /// Advance timers, decay the state and spawn due units.
    ///
    /// Returns the ids spawned this tick and whether the state decayed.
    pub fn tick(&mut self, dt: f32, world: &mut World, rng: &mut Pcg32) -> (Vec<BodyId>, bool) {
        let mut decayed = false;
        self.downgrade_timer += dt;
        if self.state != SpawnState::Low && self.downgrade_timer >= self.settings.downgrade_delay {
            decayed = self.set_state(self.state.downgraded());
            self.downgrade_timer = 0.0;
        }

        self.spawned.retain(|&id| world.get(id).is_some());

        let mut new_units = Vec::new();
        let interval = self.spawn_interval();
        if interval <= 0.0 {
            return (new_units, decayed);
        }

        self.spawn_timer += dt;
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            if self.spawned.len() >= self.settings.max_units {
                continue;
            }
            let id = self.spawn_unit(world, rng);
            self.spawned.push(id);
            new_units.push(id);
        }
        (new_units, decayed)
    }

    fn spawn_unit(&mut self, world: &mut World, rng: &mut Pcg32) -> BodyId {
        let jitter = self.settings.spawn_jitter;
        let offset = if jitter > 0.0 {
            Vec3::new(
                rng.random_range(-jitter..jitter),
                0.0,
                rng.random_range(-jitter..jitter),
            )
        } else {
            Vec3::ZERO
        };
        self.spawn_count += 1;
        let name = format!("unit-{}-{}", self.id.0, self.spawn_count);
        world.spawn(Body::new(
            name,
            BIODIVERSITY_UNIT,
            self.outlet + offset,
            self.settings.unit_radius,
        ))
    }
}
