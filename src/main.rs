//! VR Collector entry point
//!
//! Runs a scripted headless session: tutorial, a hand walking over to an
//! accelerator wheel, cranking it, and the collector carrying spawned units
//! along its path. Pass a settings JSON path as the first argument to retune.

use std::path::PathBuf;

use glam::{Quat, Vec3};

use vr_collector::Settings;
use vr_collector::input::{ControllerRig, ScriptedDevice, ScriptedInput};
use vr_collector::sim::{FrameInput, MoveStep, Region, SimEvent, Simulation, WaypointMover, frame};
use vr_collector::tags::ACCELERATOR_ZONE_1;
use vr_collector::ui::{MainMenu, RecordingHost, Tutorial, TutorialUi};

/// Render rate of the scripted session
const FRAME_DT: f32 = 1.0 / 72.0;
/// Session length in seconds
const SESSION_SECS: f32 = 30.0;

#[derive(Debug, Default)]
struct Summary {
    spawned: usize,
    carried: usize,
    released: usize,
    lost: usize,
    state_changes: usize,
}

impl Summary {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::UnitSpawned { .. } => self.spawned += 1,
            SimEvent::CarryStarted { .. } => self.carried += 1,
            SimEvent::CarryReleased { body, pos, .. } => {
                self.released += 1;
                log::info!("Unit {:?} dropped at {:.2?}", body, pos);
            }
            SimEvent::CarryLost { .. } => self.lost += 1,
            SimEvent::DispenserChanged { dispenser, state } => {
                self.state_changes += 1;
                log::info!("Dispenser {:?} now {:?}", dispenser, state);
            }
            SimEvent::AcceleratorEntered { .. }
            | SimEvent::AcceleratorExited { .. }
            | SimEvent::GameStarted => {}
        }
    }
}

fn build_scene(settings: Settings) -> Simulation {
    let mut sim = Simulation::new(settings);

    // Units drop from the dispenser straight into the collector mouth
    let dispenser = sim.add_dispenser(Vec3::new(0.0, 1.5, 0.0));
    sim.add_accelerator_zone(
        ACCELERATOR_ZONE_1,
        Region::new(Vec3::new(2.0, 1.0, 0.0), Vec3::splat(0.3)),
        Some(dispenser),
    );

    let path = vec![
        Vec3::new(0.0, 0.2, 0.0),
        Vec3::new(0.0, 0.6, 0.8),
        Vec3::new(0.5, 1.2, 1.4),
        Vec3::new(1.2, 1.4, 1.6),
    ];
    if let Err(e) = sim.add_collector(path, Region::new(Vec3::new(0.0, 0.2, 0.0), Vec3::splat(0.4)), 3) {
        log::error!("Collector disabled: {}", e);
    }
    sim.add_intake(
        Region::new(Vec3::new(1.2, 1.0, 1.6), Vec3::new(0.4, 0.6, 0.4)),
        Quat::IDENTITY,
    );
    sim.add_wheel();
    sim
}

fn main() {
    env_logger::init();
    log::info!("VR Collector (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&PathBuf::from(path)),
        None => Settings::default(),
    };

    let mut host = RecordingHost::default();
    MainMenu.play(&mut host);

    let mut sim = build_scene(settings);
    let mut tutorial = Tutorial::new(TutorialUi {
        first_panel: Some("tutorial/first".into()),
        second_panel: Some("tutorial/second".into()),
        next_button: Some("tutorial/next".into()),
        start_button: Some("tutorial/start".into()),
    });
    tutorial.begin(&mut host, &mut sim.time);
    tutorial.next(&mut host);
    if let Some(event) = tutorial.start(&mut host, &mut sim.time, Some(&mut sim.game)) {
        sim.drain_events();
        log::info!("{:?}", event);
    }

    let mut xr = ScriptedInput {
        left: Some(ScriptedDevice::new(1)),
        right: Some(ScriptedDevice::new(2)),
    };
    let mut rig = ControllerRig::default();

    // Hand walks to the wheel, cranks for 12 seconds, then walks away
    let mut hand = Vec3::new(0.0, 1.0, -1.0);
    let mut approach = WaypointMover::new(vec![Vec3::new(1.0, 1.0, -0.5), Vec3::new(2.0, 1.0, 0.0)], 1.0, 0.02);
    let mut crank_time = 0.0;

    let mut summary = Summary::default();
    let frames = (SESSION_SECS / FRAME_DT) as usize;
    for _ in 0..frames {
        let at_wheel = match approach.advance(hand, FRAME_DT) {
            MoveStep::Moving { pos, .. } | MoveStep::Arrived { pos, .. } => {
                hand = pos;
                false
            }
            MoveStep::Finished => true,
        };

        let cranking = at_wheel && crank_time < 12.0;
        if cranking {
            crank_time += FRAME_DT;
        } else if at_wheel {
            hand = Vec3::new(0.0, 1.0, -1.0);
        }
        if let Some(right) = xr.right.as_mut() {
            right.button = Some(cranking);
        }
        if let Some(left) = xr.left.as_mut() {
            // Hold the intake grip half of the session
            left.analog = Some(if sim.time_ticks % 200 < 100 { 0.8 } else { 0.0 });
        }

        let input = FrameInput {
            grips: rig.sample(&xr),
            toggle_collector: false,
            hand_pos: Some(hand),
        };
        frame(&mut sim, &input, FRAME_DT);

        for event in sim.drain_events() {
            summary.record(&event);
        }
    }

    log::info!("Session summary: {:?}", summary);
    println!(
        "spawned={} carried={} released={} lost={} dispenser_changes={} bodies={}",
        summary.spawned,
        summary.carried,
        summary.released,
        summary.lost,
        summary.state_changes,
        sim.world.len()
    );
}
