//! Accelerator wheels
//!
//! The player's right hand enters an accelerator zone and cranks the wheel by
//! holding the grip. Continuous cranking pushes the linked dispenser to a
//! higher spawn state and keeps it from decaying.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::dispenser::{Dispenser, DispenserId, SpawnState};
use super::spinner::Spinner;
use super::state::SimEvent;
use super::world::Region;
use crate::rpm_to_degrees_per_sec;
use crate::settings::AcceleratorSettings;
use crate::tags;

/// Index of a zone inside the accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

/// A tagged trigger volume around one wheel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceleratorZone {
    pub tag: String,
    pub region: Region,
    pub wheel: Spinner,
    pub dispenser: Option<DispenserId>,
    /// Whether the hand was inside on the previous update
    #[serde(skip)]
    hand_inside: bool,
}

impl AcceleratorZone {
    pub fn new(tag: impl Into<String>, region: Region, dispenser: Option<DispenserId>) -> Self {
        Self {
            tag: tag.into(),
            region,
            wheel: Spinner::new(Vec3::X, 0.0),
            dispenser,
            hand_inside: false,
        }
    }
}

/// Hand-driven accelerator controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accelerator {
    pub zones: Vec<AcceleratorZone>,
    pub settings: AcceleratorSettings,
    active: Option<ZoneId>,
    /// Seconds of uninterrupted cranking
    rotation_timer: f32,
}

impl Accelerator {
    pub fn new(zones: Vec<AcceleratorZone>, settings: AcceleratorSettings) -> Self {
        let mut acc = Self {
            zones: Vec::with_capacity(zones.len()),
            settings,
            active: None,
            rotation_timer: 0.0,
        };
        for zone in zones {
            acc.add_zone(zone);
        }
        acc
    }

    /// Register a zone; its wheel spins at the configured rpm
    pub fn add_zone(&mut self, mut zone: AcceleratorZone) -> ZoneId {
        if !tags::is_accelerator_zone(&zone.tag) {
            log::warn!("Accelerator zone tagged '{}' will never activate", zone.tag);
        }
        zone.wheel.speed_deg = rpm_to_degrees_per_sec(self.settings.target_rpm);
        self.zones.push(zone);
        ZoneId(self.zones.len() - 1)
    }

    pub fn active_zone(&self) -> Option<ZoneId> {
        self.active
    }

    pub fn rotation_timer(&self) -> f32 {
        self.rotation_timer
    }

    /// Track the hand against every zone and emit enter/exit transitions.
    ///
    /// Exits are handled before enters so a hand crossing straight from one
    /// zone into another ends up with the new zone active.
    pub fn track_hand(&mut self, hand: Option<Vec3>, events: &mut Vec<SimEvent>) {
        let mut entered = Vec::new();
        for (i, zone) in self.zones.iter_mut().enumerate() {
            let inside = hand.is_some_and(|p| zone.region.contains_point(p));
            if inside == zone.hand_inside {
                continue;
            }
            zone.hand_inside = inside;
            if !tags::is_accelerator_zone(&zone.tag) {
                continue;
            }
            if inside {
                entered.push(i);
            } else {
                // Leaving any zone drops the active one
                log::info!("Exited accelerator zone '{}'", zone.tag);
                self.active = None;
                events.push(SimEvent::AcceleratorExited { zone: ZoneId(i) });
            }
        }

        for i in entered {
            log::info!("Entered accelerator zone '{}'. Ready to rotate.", self.zones[i].tag);
            self.active = Some(ZoneId(i));
            events.push(SimEvent::AcceleratorEntered { zone: ZoneId(i) });
        }
    }

    /// Variable-step update with the right grip button state
    pub fn update(
        &mut self,
        grip_pressed: bool,
        dt: f32,
        dispensers: &mut [Dispenser],
        events: &mut Vec<SimEvent>,
    ) {
        let zone = match self.active {
            Some(ZoneId(i)) if grip_pressed => self.zones.get_mut(i),
            _ => None,
        };

        let Some(zone) = zone else {
            if self.rotation_timer > 0.0 {
                log::info!("Rotation stopped after {:.2}s, timer reset", self.rotation_timer);
                self.rotation_timer = 0.0;
            }
            return;
        };

        zone.wheel.spin(dt);
        self.rotation_timer += dt;
        log::trace!("Accelerator rotating, {:.2}s", self.rotation_timer);

        let Some(dispenser) = zone.dispenser.and_then(|d| dispensers.get_mut(d.0)) else {
            return;
        };
        dispenser.reset_downgrade_timer();

        let target = if self.rotation_timer >= self.settings.high_after {
            Some(SpawnState::High)
        } else if self.rotation_timer >= self.settings.medium_after {
            Some(SpawnState::Medium)
        } else {
            None
        };
        if let Some(state) = target {
            if dispenser.set_state(state) {
                events.push(SimEvent::DispenserChanged {
                    dispenser: dispenser.id,
                    state,
                });
            }
        }
    }
}

/// A free-standing wheel turned while the right grip is held
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelRotator {
    pub wheel: Spinner,
}

impl WheelRotator {
    pub fn new(axis: Vec3, speed_deg: f32) -> Self {
        Self {
            wheel: Spinner::new(axis, speed_deg),
        }
    }

    pub fn update(&mut self, grip_pressed: bool, dt: f32) {
        if grip_pressed {
            self.wheel.spin(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DispenserSettings;
    use glam::Quat;

    fn setup() -> (Accelerator, Vec<Dispenser>) {
        let zones = vec![
            AcceleratorZone::new(
                tags::ACCELERATOR_ZONE_1,
                Region::new(Vec3::ZERO, Vec3::splat(0.5)),
                Some(DispenserId(0)),
            ),
            AcceleratorZone::new(
                tags::ACCELERATOR_ZONE_2,
                Region::new(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(0.5)),
                None,
            ),
        ];
        let dispensers = vec![Dispenser::new(
            DispenserId(0),
            Vec3::ZERO,
            DispenserSettings::default(),
        )];
        (Accelerator::new(zones, AcceleratorSettings::default()), dispensers)
    }

    fn crank(acc: &mut Accelerator, d: &mut [Dispenser], secs: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let steps = (secs / 0.1).round() as usize;
        for _ in 0..steps {
            acc.update(true, 0.1, d, &mut events);
        }
        events
    }

    #[test]
    fn test_enter_and_exit_zone() {
        let (mut acc, _) = setup();
        let mut events = Vec::new();
        acc.track_hand(Some(Vec3::ZERO), &mut events);
        assert_eq!(acc.active_zone(), Some(ZoneId(0)));
        acc.track_hand(Some(Vec3::ZERO), &mut events);
        assert_eq!(events.len(), 1);
        acc.track_hand(None, &mut events);
        assert_eq!(acc.active_zone(), None);
        assert_eq!(
            events,
            vec![
                SimEvent::AcceleratorEntered { zone: ZoneId(0) },
                SimEvent::AcceleratorExited { zone: ZoneId(0) },
            ]
        );
    }

    #[test]
    fn test_crossing_into_lower_zone_keeps_it_active() {
        let (mut acc, _) = setup();
        let mut events = Vec::new();
        acc.track_hand(Some(Vec3::new(5.0, 0.0, 0.0)), &mut events);
        assert_eq!(acc.active_zone(), Some(ZoneId(1)));

        acc.track_hand(Some(Vec3::ZERO), &mut events);
        assert_eq!(acc.active_zone(), Some(ZoneId(0)));
        assert_eq!(
            events,
            vec![
                SimEvent::AcceleratorEntered { zone: ZoneId(1) },
                SimEvent::AcceleratorExited { zone: ZoneId(1) },
                SimEvent::AcceleratorEntered { zone: ZoneId(0) },
            ]
        );
    }

    #[test]
    fn test_no_rotation_outside_zone() {
        let (mut acc, mut d) = setup();
        crank(&mut acc, &mut d, 1.0);
        assert_eq!(acc.rotation_timer(), 0.0);
        assert_eq!(acc.zones[0].wheel.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_thresholds_raise_dispenser() {
        let (mut acc, mut d) = setup();
        acc.track_hand(Some(Vec3::ZERO), &mut Vec::new());

        crank(&mut acc, &mut d, 4.0);
        assert_eq!(d[0].state(), SpawnState::Low);

        let events = crank(&mut acc, &mut d, 1.5);
        assert_eq!(d[0].state(), SpawnState::Medium);
        assert_eq!(
            events,
            vec![SimEvent::DispenserChanged {
                dispenser: DispenserId(0),
                state: SpawnState::Medium
            }]
        );

        crank(&mut acc, &mut d, 5.0);
        assert_eq!(d[0].state(), SpawnState::High);
        assert_ne!(acc.zones[0].wheel.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_release_resets_timer() {
        let (mut acc, mut d) = setup();
        acc.track_hand(Some(Vec3::ZERO), &mut Vec::new());
        crank(&mut acc, &mut d, 3.0);
        assert!(acc.rotation_timer() > 2.9);

        acc.update(false, 0.1, &mut d, &mut Vec::new());
        assert_eq!(acc.rotation_timer(), 0.0);
        crank(&mut acc, &mut d, 3.0);
        assert_eq!(d[0].state(), SpawnState::Low);
    }

    #[test]
    fn test_wheel_rotator_needs_grip() {
        let mut w = WheelRotator::new(Vec3::X, 100.0);
        w.update(false, 1.0);
        assert_eq!(w.wheel.rotation, Quat::IDENTITY);
        w.update(true, 0.9);
        assert!((w.wheel.angle_deg() - 90.0).abs() < 1e-2);
    }
}
