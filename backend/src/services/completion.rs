//! Pre-flight checks for a "complete milestone" transaction.
//!
//! Run before submitting to the chain so an obviously doomed request is
//! rejected locally with a readable message.

use crate::models::{EligibilityResult, EnrollmentStatus, MILESTONE_COUNT};

/// Why a completion request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("Please register for this course first.")]
    NotRegistered,

    #[error("Course already completed.")]
    AlreadyCompleted,

    #[error("Invalid milestone index.")]
    InvalidIndex(i64),

    #[error("You must complete milestones in order.")]
    OutOfOrder { requested: usize, next: usize },

    #[error("{0}")]
    Locked(String),
}

/// Validate completing milestone `index` given the status and the current gating.
///
/// Returns the index narrowed to the `u8` the contract call takes.
pub fn check_completion(
    index: i64,
    status: EnrollmentStatus,
    gating: &EligibilityResult,
) -> Result<u8, CompletionError> {
    match status {
        EnrollmentStatus::NotRegistered => return Err(CompletionError::NotRegistered),
        EnrollmentStatus::Completed => return Err(CompletionError::AlreadyCompleted),
        EnrollmentStatus::Registered => {}
    }

    let idx = usize::try_from(index)
        .ok()
        .filter(|i| *i < MILESTONE_COUNT)
        .ok_or(CompletionError::InvalidIndex(index))?;

    if idx != gating.next_index {
        return Err(CompletionError::OutOfOrder {
            requested: idx,
            next: gating.next_index,
        });
    }

    if !gating.can_complete {
        let reason = gating
            .locked_reason
            .map(|r| r.message().to_string())
            .unwrap_or_else(|| "Not available yet.".to_string());
        return Err(CompletionError::Locked(reason));
    }

    u8::try_from(idx).map_err(|_| CompletionError::InvalidIndex(index))
}
