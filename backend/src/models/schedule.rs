//! Course schedule and per-user milestone completion times.
//!
//! Both types are plain snapshots of contract reads. Field names serialize in
//! camelCase so they line up with the contract ABI names used by front ends.

use serde::{Deserialize, Serialize};

use super::time::UnixTimestamp;

/// Every course has exactly this many milestones.
pub const MILESTONE_COUNT: usize = 3;

/// Optional time gating attached to a course.
///
/// A zero in any field means "unconstrained".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSchedule {
    /// Whether gating applies at all.
    pub use_schedule: bool,
    /// Earliest completion time for each milestone.
    #[serde(default)]
    pub not_before: [UnixTimestamp; MILESTONE_COUNT],
    /// Minimum seconds between completing milestone `i - 1` and milestone `i`.
    #[serde(default)]
    pub min_gap: u64,
    /// Latest completion time for any milestone.
    #[serde(default)]
    pub deadline: UnixTimestamp,
}

impl CourseSchedule {
    /// A schedule that gates nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether the schedule is switched on.
    pub fn is_active(&self) -> bool {
        self.use_schedule
    }

    pub fn has_deadline(&self) -> bool {
        !self.deadline.is_unset()
    }

    /// `not_before` for milestone `index`, unset when out of range.
    pub fn not_before_for(&self, index: usize) -> UnixTimestamp {
        self.not_before.get(index).copied().unwrap_or_default()
    }
}

/// Completion timestamp of each milestone for one user; unset = not completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneTimes([UnixTimestamp; MILESTONE_COUNT]);

impl MilestoneTimes {
    pub fn new(times: [UnixTimestamp; MILESTONE_COUNT]) -> Self {
        Self(times)
    }

    /// Build from raw seconds, e.g. `MilestoneTimes::from_secs([t0, 0, 0])`.
    pub fn from_secs(secs: [u64; MILESTONE_COUNT]) -> Self {
        Self(secs.map(UnixTimestamp::new))
    }

    /// Timestamp recorded for milestone `index`, unset when out of range.
    pub fn get(&self, index: usize) -> UnixTimestamp {
        self.0.get(index).copied().unwrap_or_default()
    }

    /// Number of milestones with a recorded time, wherever they sit.
    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|t| !t.is_unset()).count()
    }

    pub fn as_array(&self) -> &[UnixTimestamp; MILESTONE_COUNT] {
        &self.0
    }
}

impl From<[u64; MILESTONE_COUNT]> for MilestoneTimes {
    fn from(secs: [u64; MILESTONE_COUNT]) -> Self {
        Self::from_secs(secs)
    }
}
