//! Trigger events from overlap diffing
//!
//! The host engine reports enter/stay/exit callbacks for trigger volumes. Here
//! the same signals are derived by comparing this tick's overlap set against
//! the previous one.

use serde::{Deserialize, Serialize};

use super::world::{BodyId, Region, World};

/// Overlap transition for one body against one trigger volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Enter(BodyId),
    Stay(BodyId),
    Exit(BodyId),
}

/// Tracks which tagged bodies overlap a region across ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlapTracker {
    /// Bodies overlapping as of the last update (sorted)
    inside: Vec<BodyId>,
}

impl OverlapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inside(&self) -> &[BodyId] {
        &self.inside
    }

    /// Diff a fresh overlap set against the previous one.
    ///
    /// Events come out ordered by body id: exits first, then enters and stays.
    pub fn update(&mut self, mut current: Vec<BodyId>) -> Vec<TriggerEvent> {
        current.sort_unstable();
        current.dedup();

        let mut events: Vec<TriggerEvent> = self
            .inside
            .iter()
            .filter(|&&id| current.binary_search(&id).is_err())
            .map(|&id| TriggerEvent::Exit(id))
            .collect();

        events.extend(current.iter().map(|&id| {
            if self.inside.binary_search(&id).is_ok() {
                TriggerEvent::Stay(id)
            } else {
                TriggerEvent::Enter(id)
            }
        }));

        self.inside = current;
        events
    }

    /// Query `world` for bodies with `tag` in `region` and diff the result
    pub fn scan(&mut self, world: &World, region: &Region, tag: &str) -> Vec<TriggerEvent> {
        self.update(world.bodies_overlapping(region, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_stay_exit() {
        let mut tracker = OverlapTracker::new();
        let a = BodyId(1);
        let b = BodyId(2);

        assert_eq!(tracker.update(vec![a]), vec![TriggerEvent::Enter(a)]);
        assert_eq!(
            tracker.update(vec![b, a]),
            vec![TriggerEvent::Stay(a), TriggerEvent::Enter(b)]
        );
        assert_eq!(
            tracker.update(vec![b]),
            vec![TriggerEvent::Exit(a), TriggerEvent::Stay(b)]
        );
        assert_eq!(tracker.update(vec![]), vec![TriggerEvent::Exit(b)]);
        assert!(tracker.inside().is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut tracker = OverlapTracker::new();
        let a = BodyId(3);
        assert_eq!(tracker.update(vec![a, a]), vec![TriggerEvent::Enter(a)]);
    }
}
