//! Frame and fixed-timestep update
//!
//! `frame` runs once per rendered frame with a variable delta. It handles
//! input-driven work (spinning parts, grip state, the accelerator) and then
//! runs as many fixed `tick`s as the accumulated time allows.

use glam::Vec3;

use super::state::{SimEvent, Simulation};
use crate::consts::*;
use crate::input::GripInput;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub grips: GripInput,
    /// Collector toggle key pressed this frame (manual mode only)
    pub toggle_collector: bool,
    /// Right hand position, if tracked
    pub hand_pos: Option<Vec3>,
}

/// Advance one rendered frame. Returns the number of fixed ticks executed.
///
/// A non-finite frame delta or time scale counts as a zero-length frame.
pub fn frame(sim: &mut Simulation, input: &FrameInput, real_dt: f32) -> u32 {
    let dt = finite_or_zero(real_dt).clamp(0.0, MAX_FRAME_DT)
        * finite_or_zero(sim.time.scale).max(0.0);

    for collector in &mut sim.collectors {
        collector.update_rotation(dt, input.toggle_collector);
    }
    for intake in &mut sim.intakes {
        intake.update(input.grips.left, dt);
    }

    let right_pressed = input.grips.right_pressed();
    sim.accelerator.track_hand(input.hand_pos, &mut sim.events);
    sim.accelerator
        .update(right_pressed, dt, &mut sim.dispensers, &mut sim.events);
    for wheel in &mut sim.wheels {
        wheel.update(right_pressed, dt);
    }

    sim.accumulator += dt;
    let mut substeps = 0;
    while sim.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        tick(sim, SIM_DT);
        sim.accumulator -= SIM_DT;
        substeps += 1;
    }
    if substeps == MAX_SUBSTEPS && sim.accumulator >= SIM_DT {
        log::debug!("Dropping {:.3}s of simulation backlog", sim.accumulator);
        sim.accumulator = 0.0;
    }
    substeps
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Advance the simulation by one fixed timestep
pub fn tick(sim: &mut Simulation, dt: f32) {
    sim.time_ticks += 1;

    for collector in &mut sim.collectors {
        collector.detect(&mut sim.world, &mut sim.events);
        collector.fixed_tick(&mut sim.world, dt, &mut sim.events);
    }

    for intake in &mut sim.intakes {
        intake.fixed_tick(&mut sim.world);
    }

    for dispenser in &mut sim.dispensers {
        let (spawned, decayed) = dispenser.tick(dt, &mut sim.world, &mut sim.rng);
        if decayed {
            sim.events.push(SimEvent::DispenserChanged {
                dispenser: dispenser.id,
                state: dispenser.state(),
            });
        }
        sim.events.extend(spawned.into_iter().map(|body| SimEvent::UnitSpawned {
            dispenser: dispenser.id,
            body,
        }));
    }

    sim.world.integrate(dt);
}
