//! Countdown until a locked milestone opens.
//!
//! The evaluator only reports *when* the next window opens. Showing a live
//! "available in" timer is a polling concern, handled here: pure helpers for
//! the remaining time, and a ticker task that republishes the label on an
//! interval until the target passes or its handle is dropped.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::UnixTimestamp;

/// Seconds left until `next_available_at`, or `None` if unset or already reached.
pub fn remaining(next_available_at: UnixTimestamp, now: UnixTimestamp) -> Option<u64> {
    if next_available_at.is_unset() {
        return None;
    }
    next_available_at.seconds_since(now)
}

/// Format seconds as `HH:MM:SS`. Hours keep counting past 24.
pub fn format_hms(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Countdown label for `next_available_at` as seen at `now`.
pub fn countdown_label(next_available_at: UnixTimestamp, now: UnixTimestamp) -> Option<String> {
    remaining(next_available_at, now).map(format_hms)
}

/// Background timer publishing the countdown label.
///
/// The task is aborted when the ticker is dropped, so its lifetime follows
/// whatever view owns it.
pub struct CountdownTicker {
    rx: watch::Receiver<Option<String>>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    /// Start ticking every `period` until `next_available_at`.
    ///
    /// The first label is published immediately. Once the target is reached the
    /// ticker publishes `None` and its task ends.
    pub fn spawn(next_available_at: UnixTimestamp, period: Duration) -> Self {
        let (tx, rx) = watch::channel(countdown_label(next_available_at, UnixTimestamp::now()));
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let label = countdown_label(next_available_at, UnixTimestamp::now());
                let done = label.is_none();
                if tx.send(label).is_err() || done {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    /// Latest published label.
    pub fn current(&self) -> Option<String> {
        self.rx.borrow().clone()
    }

    /// A receiver that is notified on each tick.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.rx.clone()
    }

    /// Whether the countdown has run out.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
