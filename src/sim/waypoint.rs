//! Resumable waypoint traversal
//!
//! Moves toward each waypoint in turn at a constant speed, one step per tick,
//! and advances once within `arrive_distance`. All progress lives in the
//! struct, so a traversal can be paused, serialized, and resumed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Result of one traversal step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveStep {
    /// Still heading for waypoint `index`; `pos` is the new position
    Moving { index: usize, pos: Vec3 },
    /// Reached waypoint `index` this step
    Arrived { index: usize, pos: Vec3 },
    /// Past the last waypoint; position unchanged
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointMover {
    waypoints: Vec<Vec3>,
    index: usize,
    /// Units per second
    pub speed: f32,
    pub arrive_distance: f32,
}

impl WaypointMover {
    pub fn new(waypoints: Vec<Vec3>, speed: f32, arrive_distance: f32) -> Self {
        if waypoints.is_empty() {
            log::warn!("WaypointMover created without waypoints");
        }
        Self {
            waypoints,
            index: 0,
            speed,
            arrive_distance: arrive_distance.max(0.0),
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    /// Restart from the first waypoint
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Advance from `pos` by one tick of `dt` seconds
    pub fn advance(&mut self, pos: Vec3, dt: f32) -> MoveStep {
        let Some(&target) = self.waypoints.get(self.index) else {
            return MoveStep::Finished;
        };

        let pos = pos.move_towards(target, self.speed.max(0.0) * dt);
        let index = self.index;
        if pos.distance(target) <= self.arrive_distance {
            self.index += 1;
            MoveStep::Arrived { index, pos }
        } else {
            MoveStep::Moving { index, pos }
        }
    }
}
