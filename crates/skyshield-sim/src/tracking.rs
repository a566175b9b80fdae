//! Radar detection table.
//!
//! One `DetectionTable` component per radar site. Records are keyed by
//! missile handle; the radar system fills them in, fire control reads them.

use hecs::Entity;

use skyshield_core::constants::DETECTION_STALE_SECS;
use skyshield_core::types::{Position, Velocity};

/// Everything a radar knows about one missile.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    pub missile: Entity,
    pub position: Position,
    pub velocity: Velocity,
    pub predicted_position: Position,
    /// Range from the radar at the last detection.
    pub distance: f64,
    /// Composite threat score in [0, 1].
    pub threat_level: f64,
    /// Simulation seconds of the last detection.
    pub last_detection_time: f64,
    /// Saturates at `MAX_DETECTION_COUNT`.
    pub detection_count: u32,
    /// Set once the trajectory report has gone out. A latched record is
    /// never updated again, it only ages out.
    pub reported_trajectory: bool,
}

/// A radar's detection records.
#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    records: Vec<DetectionRecord>,
}

impl DetectionTable {
    pub fn records(&self) -> &[DetectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, missile: Entity) -> Option<&DetectionRecord> {
        self.records.iter().find(|r| r.missile == missile)
    }

    pub fn get_mut(&mut self, missile: Entity) -> Option<&mut DetectionRecord> {
        self.records.iter_mut().find(|r| r.missile == missile)
    }

    /// Add a record for a missile that is not yet tracked. Returns `None`
    /// (and leaves the table unchanged) if the missile already has one.
    pub fn insert(&mut self, record: DetectionRecord) -> Option<&mut DetectionRecord> {
        if self.get(record.missile).is_some() {
            return None;
        }
        self.records.push(record);
        self.records.last_mut()
    }

    /// Drop records not refreshed for more than `DETECTION_STALE_SECS`.
    /// Returns the handles that were removed.
    pub fn remove_stale(&mut self, now: f64) -> Vec<Entity> {
        let mut removed = Vec::new();
        self.records.retain(|r| {
            let keep = now - r.last_detection_time <= DETECTION_STALE_SECS;
            if !keep {
                removed.push(r.missile);
            }
            keep
        });
        removed
    }

    /// Order records by threat level, highest first. Equal scores keep
    /// their relative order.
    pub fn sort_by_threat(&mut self) {
        self.records
            .sort_by(|a, b| b.threat_level.total_cmp(&a.threat_level));
    }

    /// The first `n` records in table order.
    pub fn top(&self, n: usize) -> &[DetectionRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Handles of records seen at least `count` times, in table order.
    /// Liveness is not checked here.
    pub fn detected_at_least(&self, count: u32) -> impl Iterator<Item = Entity> + '_ {
        self.records
            .iter()
            .filter(move |r| r.detection_count >= count)
            .map(|r| r.missile)
    }
}
