use super::{evaluate, evaluate_at};
use crate::models::{
    CourseSchedule, EligibilityResult, EnrollmentStatus, LockReason, MilestoneTimes,
    UnixTimestamp,
};
use proptest::prelude::*;

const NOW: u64 = 1_700_000_000;

fn now() -> UnixTimestamp {
    UnixTimestamp::new(NOW)
}

fn schedule(not_before: [u64; 3], min_gap: u64, deadline: u64) -> CourseSchedule {
    CourseSchedule {
        use_schedule: true,
        not_before: not_before.map(UnixTimestamp::new),
        min_gap,
        deadline: UnixTimestamp::new(deadline),
    }
}

fn registered(schedule: Option<&CourseSchedule>, times: [u64; 3]) -> EligibilityResult {
    evaluate_at(
        schedule,
        &MilestoneTimes::from_secs(times),
        EnrollmentStatus::Registered,
        now(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Short-circuits
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_not_registered_ignores_schedule() {
    let sched = schedule([NOW + 10, 0, 0], 0, NOW - 1);
    let result = evaluate_at(
        Some(&sched),
        &MilestoneTimes::from_secs([NOW - 5, 0, 0]),
        EnrollmentStatus::NotRegistered,
        now(),
    );
    assert_eq!(result, EligibilityResult::locked(LockReason::NotRegistered, 1));
}

#[test]
fn test_completed_status_reports_not_registered() {
    let result = evaluate_at(
        None,
        &MilestoneTimes::from_secs([1, 2, 3]),
        EnrollmentStatus::Completed,
        now(),
    );
    assert_eq!(result.locked_reason, Some(LockReason::NotRegistered));
    assert_eq!(result.next_index, 3);
}

#[test]
fn test_all_done_is_course_completed() {
    let sched = schedule([0, 0, 0], 3600, 0);
    let result = registered(Some(&sched), [NOW - 30, NOW - 20, NOW - 10]);
    assert_eq!(result, EligibilityResult::locked(LockReason::CourseCompleted, 3));
}

#[test]
fn test_no_schedule_is_open() {
    assert_eq!(registered(None, [0, 0, 0]), EligibilityResult::unlocked(0));
    assert_eq!(registered(None, [NOW, 0, 0]), EligibilityResult::unlocked(1));
}

#[test]
fn test_inactive_schedule_is_open() {
    let mut sched = schedule([NOW + 1000, NOW + 2000, 0], 99_999, NOW - 1);
    sched.use_schedule = false;
    assert_eq!(registered(Some(&sched), [NOW - 1, 0, 0]), EligibilityResult::unlocked(1));
}

// ─────────────────────────────────────────────────────────────────────────────
// Time windows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_not_before_in_past_is_open() {
    let sched = schedule([NOW - 1, 0, 0], 0, 0);
    assert_eq!(registered(Some(&sched), [0, 0, 0]), EligibilityResult::unlocked(0));
}

#[test]
fn test_not_before_equal_to_now_is_open() {
    let sched = schedule([NOW, 0, 0], 0, 0);
    assert_eq!(registered(Some(&sched), [0, 0, 0]), EligibilityResult::unlocked(0));
}

#[test]
fn test_not_before_uses_next_index_slot() {
    // Slot 0 is in the future but milestone 0 is already done.
    let sched = schedule([NOW + 500, NOW + 100, 0], 0, 0);
    let result = registered(Some(&sched), [NOW - 50, 0, 0]);
    assert_eq!(
        result,
        EligibilityResult::locked_until(LockReason::WaitUntilWindow, UnixTimestamp::new(NOW + 100), 1)
    );
}

#[test]
fn test_gap_exactly_elapsed_is_open() {
    let sched = schedule([0, 0, 0], 100, 0);
    assert_eq!(registered(Some(&sched), [NOW - 100, 0, 0]), EligibilityResult::unlocked(1));
}

#[test]
fn test_gap_ignored_for_first_milestone() {
    let sched = schedule([0, 0, 0], 3600, 0);
    assert_eq!(registered(Some(&sched), [0, 0, 0]), EligibilityResult::unlocked(0));
}

#[test]
fn test_latest_lower_bound_wins() {
    // Gap is ready at NOW + 200, window opens at NOW + 900.
    let sched = schedule([0, NOW + 900, 0], 300, 0);
    let result = registered(Some(&sched), [NOW - 100, 0, 0]);
    assert_eq!(result.next_available_at, UnixTimestamp::new(NOW + 900));

    // Window opens at NOW + 50, gap ready at NOW + 200.
    let sched = schedule([0, NOW + 50, 0], 300, 0);
    let result = registered(Some(&sched), [NOW - 100, 0, 0]);
    assert_eq!(result.next_available_at, UnixTimestamp::new(NOW + 200));
    assert_eq!(result.locked_reason, Some(LockReason::WaitUntilWindow));
}

#[test]
fn test_missing_previous_timestamp_guard() {
    let sched = schedule([0, 0, 0], 60, 0);
    let result = registered(Some(&sched), [0, 0, NOW - 10]);
    assert_eq!(
        result,
        EligibilityResult::locked(LockReason::PreviousMilestoneMissingTimestamp, 1)
    );
}

#[test]
fn test_missing_previous_timestamp_needs_gap() {
    // Without a gap constraint the inconsistency is not looked at.
    let sched = schedule([0, 0, 0], 0, 0);
    assert_eq!(registered(Some(&sched), [0, NOW - 10, 0]), EligibilityResult::unlocked(1));
}

#[test]
fn test_deadline_passed() {
    let sched = schedule([0, 0, 0], 0, NOW - 1);
    assert_eq!(
        registered(Some(&sched), [0, 0, 0]),
        EligibilityResult::locked(LockReason::DeadlinePassed, 0)
    );
}

#[test]
fn test_deadline_equal_to_now_is_open() {
    let sched = schedule([0, 0, 0], 0, NOW);
    assert_eq!(registered(Some(&sched), [0, 0, 0]), EligibilityResult::unlocked(0));
}

#[test]
fn test_deadline_passed_beats_window_after_deadline() {
    let sched = schedule([NOW + 100, 0, 0], 0, NOW - 1);
    assert_eq!(
        registered(Some(&sched), [0, 0, 0]).locked_reason,
        Some(LockReason::DeadlinePassed)
    );
}

#[test]
fn test_window_after_deadline() {
    let sched = schedule([NOW + 100, 0, 0], 0, NOW + 50);
    assert_eq!(
        registered(Some(&sched), [0, 0, 0]),
        EligibilityResult::locked_until(
            LockReason::NextWindowAfterDeadline,
            UnixTimestamp::new(NOW + 100),
            0
        )
    );
}

#[test]
fn test_window_on_deadline_waits() {
    let sched = schedule([NOW + 100, 0, 0], 0, NOW + 100);
    assert_eq!(
        registered(Some(&sched), [0, 0, 0]),
        EligibilityResult::locked_until(LockReason::WaitUntilWindow, UnixTimestamp::new(NOW + 100), 0)
    );
}

#[test]
fn test_gap_overflow_saturates() {
    let sched = schedule([0, 0, 0], u64::MAX, 0);
    let result = registered(Some(&sched), [NOW - 1, 0, 0]);
    assert_eq!(result.next_available_at, UnixTimestamp::new(u64::MAX));
    assert_eq!(result.locked_reason, Some(LockReason::WaitUntilWindow));
}

#[test]
fn test_evaluate_uses_wall_clock() {
    // A window far in the future stays locked whatever the wall clock says today.
    let sched = schedule([u64::MAX - 1, 0, 0], 0, 0);
    let result = evaluate(
        Some(&sched),
        &MilestoneTimes::from_secs([0, 0, 0]),
        EnrollmentStatus::Registered,
    );
    assert_eq!(result.locked_reason, Some(LockReason::WaitUntilWindow));
    assert_eq!(result.next_available_at, UnixTimestamp::new(u64::MAX - 1));
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-based tests
// ─────────────────────────────────────────────────────────────────────────────

fn status_strategy() -> impl Strategy<Value = EnrollmentStatus> {
    prop_oneof![
        Just(EnrollmentStatus::NotRegistered),
        Just(EnrollmentStatus::Registered),
        Just(EnrollmentStatus::Completed),
    ]
}

/// Timestamps around NOW, with a good share of zeros.
fn ts_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), (NOW - 10_000)..(NOW + 10_000)]
}

fn schedule_strategy() -> impl Strategy<Value = Option<CourseSchedule>> {
    proptest::option::of(
        (
            any::<bool>(),
            [ts_strategy(), ts_strategy(), ts_strategy()],
            prop_oneof![Just(0u64), 1u64..20_000],
            ts_strategy(),
        )
            .prop_map(|(use_schedule, not_before, min_gap, deadline)| CourseSchedule {
                use_schedule,
                not_before: not_before.map(UnixTimestamp::new),
                min_gap,
                deadline: UnixTimestamp::new(deadline),
            }),
    )
}

proptest! {
    #[test]
    fn prop_can_complete_has_no_lock(
        sched in schedule_strategy(),
        times in [ts_strategy(), ts_strategy(), ts_strategy()],
        status in status_strategy(),
    ) {
        let result = evaluate_at(sched.as_ref(), &MilestoneTimes::from_secs(times), status, now());
        if result.can_complete {
            prop_assert_eq!(result.locked_reason, None);
            prop_assert!(result.next_available_at.is_unset());
        } else {
            prop_assert!(result.locked_reason.is_some());
        }
    }

    #[test]
    fn prop_next_index_is_clamped_count(
        sched in schedule_strategy(),
        times in [ts_strategy(), ts_strategy(), ts_strategy()],
        status in status_strategy(),
    ) {
        let result = evaluate_at(sched.as_ref(), &MilestoneTimes::from_secs(times), status, now());
        let count = times.iter().filter(|t| **t > 0).count();
        prop_assert_eq!(result.next_index, count.min(3));
    }

    #[test]
    fn prop_unregistered_always_locked(
        sched in schedule_strategy(),
        times in [ts_strategy(), ts_strategy(), ts_strategy()],
        completed in any::<bool>(),
    ) {
        let status = if completed { EnrollmentStatus::Completed } else { EnrollmentStatus::NotRegistered };
        let result = evaluate_at(sched.as_ref(), &MilestoneTimes::from_secs(times), status, now());
        let next_index = result.next_index;
        prop_assert_eq!(result, EligibilityResult::locked(LockReason::NotRegistered, next_index));
    }

    #[test]
    fn prop_all_done_is_completed(
        sched in schedule_strategy(),
        times in [1u64..u64::MAX, 1u64..u64::MAX, 1u64..u64::MAX],
    ) {
        let result = evaluate_at(
            sched.as_ref(),
            &MilestoneTimes::from_secs(times),
            EnrollmentStatus::Registered,
            now(),
        );
        prop_assert_eq!(result, EligibilityResult::locked(LockReason::CourseCompleted, 3));
    }

    #[test]
    fn prop_without_active_schedule_is_open(
        sched in schedule_strategy(),
        times in [ts_strategy(), ts_strategy(), ts_strategy()],
    ) {
        prop_assume!(times.iter().any(|t| *t == 0));
        let inactive = sched.map(|s| CourseSchedule { use_schedule: false, ..s });
        let result = evaluate_at(
            inactive.as_ref(),
            &MilestoneTimes::from_secs(times),
            EnrollmentStatus::Registered,
            now(),
        );
        let next_index = result.next_index;
        prop_assert!(next_index < 3);
        prop_assert_eq!(result, EligibilityResult::unlocked(next_index));
    }

    #[test]
    fn prop_lock_is_in_the_future(
        sched in schedule_strategy(),
        times in [ts_strategy(), ts_strategy(), ts_strategy()],
    ) {
        let result = evaluate_at(
            sched.as_ref(),
            &MilestoneTimes::from_secs(times),
            EnrollmentStatus::Registered,
            now(),
        );
        if !result.next_available_at.is_unset() {
            prop_assert!(result.next_available_at > now());
        }
    }
}
