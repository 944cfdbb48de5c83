//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep for physics-facing work
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or device dependencies

pub mod accelerator;
pub mod carry;
pub mod detect;
pub mod dispenser;
pub mod intake;
pub mod spinner;
pub mod spline;
pub mod state;
pub mod tick;
pub mod waypoint;
pub mod world;

pub use accelerator::{Accelerator, AcceleratorZone, WheelRotator, ZoneId};
pub use carry::{Carried, CarryPhase, Collector};
pub use detect::{OverlapTracker, TriggerEvent};
pub use dispenser::{Dispenser, DispenserId, SpawnState};
pub use intake::Intake;
pub use spinner::Spinner;
pub use spline::{CatmullRomPath, PathError, catmull_rom_point, look_rotation};
pub use state::{GameManager, GamePhase, SimEvent, Simulation, TimeControl};
pub use tick::{FrameInput, frame, tick};
pub use waypoint::{MoveStep, WaypointMover};
pub use world::{Body, BodyId, CarrierId, Collider, Region, World};
