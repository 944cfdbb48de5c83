//! XR controller input
//!
//! The host implements `XrInput` over its device layer. Controllers cache a
//! device handle and re-acquire it whenever the device drops out, so a
//! transient disconnect never needs a restart.

use serde::{Deserialize, Serialize};

/// Which hand a controller is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// Opaque device handle handed out by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

/// Device queries the simulation needs from the host's XR layer
pub trait XrInput {
    /// First device currently bound to `hand`, if any
    fn device_at(&self, hand: Hand) -> Option<DeviceId>;
    fn is_valid(&self, device: DeviceId) -> bool;
    /// Binary grip button, if the device exposes one
    fn grip_button(&self, device: DeviceId) -> Option<bool>;
    /// Analog grip axis in [0, 1], if the device exposes one
    fn grip(&self, device: DeviceId) -> Option<f32>;
}

/// Raw grip features read from one device this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GripReading {
    pub button: Option<bool>,
    pub analog: Option<f32>,
}

impl GripReading {
    /// Button only; a missing feature reads as released
    pub fn button_pressed(&self) -> bool {
        self.button.unwrap_or(false)
    }

    /// Held state when both features may be present.
    ///
    /// The button value applies first and the analog value, when present,
    /// overrides it. `None` if the device exposes neither.
    pub fn held(&self, threshold: f32) -> Option<bool> {
        let mut held = self.button;
        if let Some(value) = self.analog {
            held = Some(value > threshold);
        }
        held
    }
}

/// A hand controller with a cached device handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    pub hand: Hand,
    device: Option<DeviceId>,
}

impl Controller {
    pub fn new(hand: Hand) -> Self {
        Self { hand, device: None }
    }

    pub fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Valid device for this hand, re-acquiring when the cached one is gone
    pub fn acquire(&mut self, xr: &dyn XrInput) -> Option<DeviceId> {
        let valid = self.device.is_some_and(|d| xr.is_valid(d));
        if !valid {
            self.device = xr.device_at(self.hand);
            if let Some(d) = self.device {
                log::debug!("{:?} controller acquired {:?}", self.hand, d);
            }
        }
        self.device.filter(|&d| xr.is_valid(d))
    }

    /// Read grip features; `None` while no valid device is bound
    pub fn read(&mut self, xr: &dyn XrInput) -> Option<GripReading> {
        let device = self.acquire(xr)?;
        Some(GripReading {
            button: xr.grip_button(device),
            analog: xr.grip(device),
        })
    }
}

/// Grip readings from both hands for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GripInput {
    pub left: Option<GripReading>,
    pub right: Option<GripReading>,
}

impl GripInput {
    /// Right grip button, released when no device is available
    pub fn right_pressed(&self) -> bool {
        self.right.is_some_and(|r| r.button_pressed())
    }
}

/// Both hand controllers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerRig {
    pub left: Controller,
    pub right: Controller,
}

impl Default for ControllerRig {
    fn default() -> Self {
        Self {
            left: Controller::new(Hand::Left),
            right: Controller::new(Hand::Right),
        }
    }
}

impl ControllerRig {
    pub fn sample(&mut self, xr: &dyn XrInput) -> GripInput {
        GripInput {
            left: self.left.read(xr),
            right: self.right.read(xr),
        }
    }
}

/// In-memory device state for scripted runs and tests
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pub left: Option<ScriptedDevice>,
    pub right: Option<ScriptedDevice>,
}

/// One simulated device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedDevice {
    pub id: DeviceId,
    pub valid: bool,
    pub button: Option<bool>,
    pub analog: Option<f32>,
}

impl ScriptedDevice {
    pub fn new(id: u32) -> Self {
        Self {
            id: DeviceId(id),
            valid: true,
            button: Some(false),
            analog: None,
        }
    }
}

impl ScriptedInput {
    fn find(&self, device: DeviceId) -> Option<&ScriptedDevice> {
        [self.left.as_ref(), self.right.as_ref()]
            .into_iter()
            .flatten()
            .find(|d| d.id == device)
    }
}

impl XrInput for ScriptedInput {
    fn device_at(&self, hand: Hand) -> Option<DeviceId> {
        let slot = match hand {
            Hand::Left => self.left.as_ref(),
            Hand::Right => self.right.as_ref(),
        };
        slot.filter(|d| d.valid).map(|d| d.id)
    }

    fn is_valid(&self, device: DeviceId) -> bool {
        self.find(device).is_some_and(|d| d.valid)
    }

    fn grip_button(&self, device: DeviceId) -> Option<bool> {
        self.find(device).and_then(|d| d.button)
    }

    fn grip(&self, device: DeviceId) -> Option<f32> {
        self.find(device).and_then(|d| d.analog)
    }
}
