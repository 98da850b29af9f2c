//! Result types of the milestone eligibility evaluator.

use serde::{Deserialize, Serialize};

use super::time::UnixTimestamp;

/// Why the next milestone cannot be completed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockReason {
    NotRegistered,
    CourseCompleted,
    PreviousMilestoneMissingTimestamp,
    DeadlinePassed,
    NextWindowAfterDeadline,
    WaitUntilWindow,
}

impl LockReason {
    pub const ALL: [LockReason; 6] = [
        LockReason::NotRegistered,
        LockReason::CourseCompleted,
        LockReason::PreviousMilestoneMissingTimestamp,
        LockReason::DeadlinePassed,
        LockReason::NextWindowAfterDeadline,
        LockReason::WaitUntilWindow,
    ];

    /// User-facing text.
    pub fn message(&self) -> &'static str {
        match self {
            LockReason::NotRegistered => "Not registered",
            LockReason::CourseCompleted => "Course completed",
            LockReason::PreviousMilestoneMissingTimestamp => "Previous milestone missing timestamp",
            LockReason::DeadlinePassed => "Deadline passed",
            LockReason::NextWindowAfterDeadline => "Next window is after deadline",
            LockReason::WaitUntilWindow => "Wait until window",
        }
    }

    /// Inverse of [`LockReason::message`].
    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.message() == message)
    }
}

impl std::fmt::Display for LockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Whether a user may complete the next milestone of a course, and if not why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub can_complete: bool,
    /// When the lock lifts, unset when no waiting would help.
    pub next_available_at: UnixTimestamp,
    /// Serialized as the reason text, empty when unlocked.
    #[serde(with = "reason_text")]
    pub locked_reason: Option<LockReason>,
    /// Index of the next incomplete milestone; 3 means all done.
    pub next_index: usize,
}

impl EligibilityResult {
    pub fn unlocked(next_index: usize) -> Self {
        Self {
            can_complete: true,
            next_available_at: UnixTimestamp::UNSET,
            locked_reason: None,
            next_index,
        }
    }

    pub fn locked(reason: LockReason, next_index: usize) -> Self {
        Self::locked_until(reason, UnixTimestamp::UNSET, next_index)
    }

    pub fn locked_until(reason: LockReason, at: UnixTimestamp, next_index: usize) -> Self {
        Self {
            can_complete: false,
            next_available_at: at,
            locked_reason: Some(reason),
            next_index,
        }
    }

    /// The reason text, empty when unlocked.
    pub fn locked_reason_text(&self) -> &'static str {
        self.locked_reason.map(|r| r.message()).unwrap_or("")
    }
}

mod reason_text {
    use super::LockReason;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(reason: &Option<LockReason>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(reason.map(|r| r.message()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LockReason>, D::Error> {
        let text = String::deserialize(d)?;
        if text.is_empty() {
            return Ok(None);
        }
        LockReason::from_message(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown lock reason '{}'", text)))
    }
}
