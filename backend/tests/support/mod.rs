#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use course_gate::chain::LocalCourseReader;
use course_gate::models::{CourseId, CourseInfo, CourseSchedule, UnixTimestamp, WalletAddress};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the process
/// environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn learner() -> WalletAddress {
    WalletAddress::parse("0x00000000000000000000000000000000000a11ce").unwrap()
}

pub fn course(id: u64, title: &str) -> CourseInfo {
    CourseInfo {
        id: CourseId::new(id),
        title: title.to_string(),
        description: format!("About {}", title),
        milestones: ["Intro".to_string(), "Build".to_string(), "Ship".to_string()],
        created_at: UnixTimestamp::new(1_700_000_000),
    }
}

pub fn schedule(not_before: [u64; 3], min_gap: u64, deadline: u64) -> CourseSchedule {
    CourseSchedule {
        use_schedule: true,
        not_before: not_before.map(UnixTimestamp::new),
        min_gap,
        deadline: UnixTimestamp::new(deadline),
    }
}

/// A reader with course 1 unscheduled and course 2 on a one-hour gap.
pub fn seeded_reader() -> LocalCourseReader {
    let reader = LocalCourseReader::new();
    reader.insert_course(course(1, "Blockchain Basics"), None);
    reader.insert_course(course(2, "Solidity 101"), Some(schedule([0, 0, 0], 3600, 0)));
    reader
}
