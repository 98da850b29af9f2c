//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::chain::CourseReader;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Contract reads for tracker and dashboard snapshots
    pub reader: Arc<dyn CourseReader>,
    /// Tick period of the countdown stream
    pub countdown_interval: Duration,
}

impl AppState {
    pub fn new(reader: Arc<dyn CourseReader>) -> Self {
        Self {
            reader,
            countdown_interval: Duration::from_secs(1),
        }
    }

    pub fn with_countdown_interval(mut self, interval: Duration) -> Self {
        self.countdown_interval = interval;
        self
    }
}
