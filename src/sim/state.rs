//! Simulation state and core types
//!
//! `Simulation` owns every mechanism and the world they act on. Collaborators
//! are passed in explicitly; nothing is looked up through globals.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::accelerator::{Accelerator, AcceleratorZone, WheelRotator, ZoneId};
use super::carry::Collector;
use super::dispenser::{Dispenser, DispenserId, SpawnState};
use super::intake::Intake;
use super::spline::PathError;
use super::world::{BodyId, CarrierId, Region, World};
use crate::settings::Settings;

/// Something observable that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    CarryStarted {
        collector: CarrierId,
        body: BodyId,
    },
    CarryReleased {
        collector: CarrierId,
        body: BodyId,
        pos: Vec3,
    },
    /// Carried body disappeared mid-path
    CarryLost {
        collector: CarrierId,
        body: BodyId,
    },
    AcceleratorEntered {
        zone: ZoneId,
    },
    AcceleratorExited {
        zone: ZoneId,
    },
    DispenserChanged {
        dispenser: DispenserId,
        state: SpawnState,
    },
    UnitSpawned {
        dispenser: DispenserId,
        body: BodyId,
    },
    GameStarted,
}

/// Global simulation speed (0 = paused, 1 = real time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeControl {
    pub scale: f32,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl TimeControl {
    pub fn pause(&mut self) {
        self.scale = 0.0;
    }

    pub fn resume(&mut self) {
        self.scale = 1.0;
    }

    pub fn is_paused(&self) -> bool {
        self.scale <= 0.0
    }
}

/// Coarse game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the tutorial
    #[default]
    Briefing,
    Playing,
}

/// Owns the game flow; injected wherever the game must be started
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameManager {
    pub phase: GamePhase,
}

/// Complete simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    pub settings: Settings,
    pub world: World,
    pub collectors: Vec<Collector>,
    pub intakes: Vec<Intake>,
    pub accelerator: Accelerator,
    pub wheels: Vec<WheelRotator>,
    pub dispensers: Vec<Dispenser>,
    pub time: TimeControl,
    pub game: GameManager,
    /// Fixed ticks executed so far
    pub time_ticks: u64,
    pub(crate) accumulator: f32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(settings: Settings) -> Self {
        log::info!("Simulation created (seed {})", settings.seed);
        Self {
            world: World::new(),
            collectors: Vec::new(),
            intakes: Vec::new(),
            accelerator: Accelerator::new(Vec::new(), settings.accelerator.clone()),
            wheels: Vec::new(),
            dispensers: Vec::new(),
            time: TimeControl::default(),
            game: GameManager::default(),
            time_ticks: 0,
            accumulator: 0.0,
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            settings,
        }
    }

    pub fn add_collector(
        &mut self,
        control_points: Vec<Vec3>,
        detection: Region,
        part_count: usize,
    ) -> Result<CarrierId, PathError> {
        let id = CarrierId(self.collectors.len() as u32 + 1);
        let collector = Collector::new(
            id,
            control_points,
            detection,
            part_count,
            self.settings.collector.clone(),
        )?;
        self.collectors.push(collector);
        Ok(id)
    }

    pub fn add_intake(&mut self, region: Region, rotation: Quat) {
        self.intakes
            .push(Intake::new(region, rotation, self.settings.intake.clone()));
    }

    pub fn add_dispenser(&mut self, outlet: Vec3) -> DispenserId {
        let id = DispenserId(self.dispensers.len());
        self.dispensers
            .push(Dispenser::new(id, outlet, self.settings.dispenser.clone()));
        id
    }

    pub fn add_accelerator_zone(
        &mut self,
        tag: &str,
        region: Region,
        dispenser: Option<DispenserId>,
    ) -> ZoneId {
        self.accelerator
            .add_zone(AcceleratorZone::new(tag, region, dispenser))
    }

    pub fn add_wheel(&mut self) {
        let acc = &self.settings.accelerator;
        self.wheels
            .push(WheelRotator::new(acc.wheel_axis, acc.wheel_speed));
    }

    /// Events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_control() {
        let mut t = TimeControl::default();
        assert!(!t.is_paused());
        t.pause();
        assert!(t.is_paused());
        t.resume();
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_builders_assign_ids() {
        let mut sim = Simulation::new(Settings::default());
        let a = sim
            .add_collector(vec![Vec3::ZERO, Vec3::Y], Region::new(Vec3::ZERO, Vec3::ONE), 1)
            .unwrap();
        let b = sim
            .add_collector(vec![Vec3::ZERO, Vec3::X], Region::new(Vec3::ZERO, Vec3::ONE), 1)
            .unwrap();
        assert_ne!(a, b);
        assert!(sim.add_collector(vec![], Region::new(Vec3::ZERO, Vec3::ONE), 0).is_err());
        assert_eq!(sim.collectors.len(), 2);

        let d = sim.add_dispenser(Vec3::Y);
        let z = sim.add_accelerator_zone(crate::tags::ACCELERATOR_ZONE_1, Region::new(Vec3::ZERO, Vec3::ONE), Some(d));
        assert_eq!(z, ZoneId(0));
        assert_eq!(sim.accelerator.zones[0].dispenser, Some(d));
        assert!((sim.accelerator.zones[0].wheel.speed_deg - 1500.0).abs() < 1e-3);
    }
}
