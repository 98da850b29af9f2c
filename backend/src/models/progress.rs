//! Enrollment status and the contract's per-user progress record.

use serde::{Deserialize, Serialize};

use super::schedule::MILESTONE_COUNT;

/// Where a user stands with respect to a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrollmentStatus {
    NotRegistered,
    Registered,
    Completed,
}

impl EnrollmentStatus {
    /// Collapse the contract's two flags; `completed` wins over `registered`.
    pub fn from_flags(registered: bool, completed: bool) -> Self {
        if completed {
            EnrollmentStatus::Completed
        } else if registered {
            EnrollmentStatus::Registered
        } else {
            EnrollmentStatus::NotRegistered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::NotRegistered => "not-registered",
            EnrollmentStatus::Registered => "registered",
            EnrollmentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not-registered" | "not_registered" => Ok(EnrollmentStatus::NotRegistered),
            "registered" => Ok(EnrollmentStatus::Registered),
            "completed" => Ok(EnrollmentStatus::Completed),
            other => Err(format!("Unknown enrollment status '{}'", other)),
        }
    }
}

/// The `getMyCourseProgress` view: flags, counter and per-milestone done bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub registered: bool,
    pub completed: bool,
    pub completed_count: u8,
    pub done: [bool; MILESTONE_COUNT],
}

impl CourseProgress {
    pub fn status(&self) -> EnrollmentStatus {
        EnrollmentStatus::from_flags(self.registered, self.completed)
    }

    /// Share of milestones done, in percent.
    pub fn percent_complete(&self) -> f64 {
        let count = usize::from(self.completed_count).min(MILESTONE_COUNT);
        count as f64 / MILESTONE_COUNT as f64 * 100.0
    }
}
