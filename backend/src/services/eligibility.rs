//! Milestone eligibility evaluation.
//!
//! Decides whether a user may complete the next milestone of a course, given the
//! course schedule, the user's completion timestamps and their enrollment status.
//! This is the single implementation every page and endpoint goes through.
//!
//! The evaluator is a total function: every input, including inconsistent chain
//! data, maps to an [`EligibilityResult`]. It never blocks, never logs and keeps
//! no state, so it can be called once per rendered course card without
//! coordination.

use crate::models::{
    CourseSchedule, EligibilityResult, EnrollmentStatus, LockReason, MilestoneTimes,
    UnixTimestamp, MILESTONE_COUNT,
};

/// Evaluate eligibility against the current wall clock.
pub fn evaluate(
    schedule: Option<&CourseSchedule>,
    times: &MilestoneTimes,
    status: EnrollmentStatus,
) -> EligibilityResult {
    evaluate_at(schedule, times, status, UnixTimestamp::now())
}

/// Evaluate eligibility at a fixed instant `now`.
///
/// Checks run in a fixed order: enrollment, course completion, schedule switch,
/// then the time windows. The lock time is the latest of every applicable lower
/// bound, and the deadline checks take precedence over a plain wait.
pub fn evaluate_at(
    schedule: Option<&CourseSchedule>,
    times: &MilestoneTimes,
    status: EnrollmentStatus,
    now: UnixTimestamp,
) -> EligibilityResult {
    let next_index = times.completed_count().min(MILESTONE_COUNT);

    if status != EnrollmentStatus::Registered {
        return EligibilityResult::locked(LockReason::NotRegistered, next_index);
    }
    if next_index >= MILESTONE_COUNT {
        return EligibilityResult::locked(LockReason::CourseCompleted, next_index);
    }

    let schedule = match schedule {
        Some(s) if s.is_active() => s,
        _ => return EligibilityResult::unlocked(next_index),
    };

    let mut lock_until = UnixTimestamp::UNSET;

    let not_before = schedule.not_before_for(next_index);
    if not_before > now {
        lock_until = lock_until.max(not_before);
    }

    if schedule.min_gap > 0 && next_index > 0 {
        let prev_at = times.get(next_index - 1);
        // The count says the previous milestone is done but it has no time on record.
        if prev_at.is_unset() {
            return EligibilityResult::locked(
                LockReason::PreviousMilestoneMissingTimestamp,
                next_index,
            );
        }
        let gap_ready_at = prev_at.saturating_add(schedule.min_gap);
        if now < gap_ready_at {
            lock_until = lock_until.max(gap_ready_at);
        }
    }

    if schedule.has_deadline() {
        if now > schedule.deadline {
            return EligibilityResult::locked(LockReason::DeadlinePassed, next_index);
        }
        if lock_until > schedule.deadline {
            return EligibilityResult::locked_until(
                LockReason::NextWindowAfterDeadline,
                lock_until,
                next_index,
            );
        }
    }

    if lock_until > now {
        return EligibilityResult::locked_until(LockReason::WaitUntilWindow, lock_until, next_index);
    }

    EligibilityResult::unlocked(next_index)
}

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod eligibility_tests;
