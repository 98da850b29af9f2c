use serde::{Deserialize, Serialize};

/// Whole seconds since 1970-01-01 00:00:00 UTC, as stored on chain.
/// `0` is the contract's "unset" value (no deadline, not completed, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// The unset timestamp.
    pub const UNSET: UnixTimestamp = UnixTimestamp(0);

    /// Create a new timestamp from seconds since the epoch.
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Sample the wall clock, truncated to whole seconds.
    pub fn now() -> Self {
        let secs = chrono::Utc::now().timestamp();
        Self(u64::try_from(secs).unwrap_or(0))
    }

    /// Raw seconds value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Whether the contract left this field at zero.
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }

    /// `self + seconds`, clamped at `u64::MAX`.
    pub fn saturating_add(self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds from `earlier` to `self`, or `None` if `self` is not after `earlier`.
    pub fn seconds_since(self, earlier: UnixTimestamp) -> Option<u64> {
        self.0.checked_sub(earlier.0).filter(|d| *d > 0)
    }

    /// Convert to chrono DateTime<Utc>.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>. Instants before the epoch clamp to zero.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(u64::try_from(dt.timestamp()).unwrap_or(0))
    }

    /// Render as `YYYY/MM/DD HH:MM UTC`, or an empty string when unset.
    pub fn format_utc(&self) -> String {
        if self.is_unset() {
            return String::new();
        }
        self.to_datetime().format("%Y/%m/%d %H:%M UTC").to_string()
    }
}

impl From<u64> for UnixTimestamp {
    fn from(v: u64) -> Self {
        UnixTimestamp::new(v)
    }
}

impl From<UnixTimestamp> for u64 {
    fn from(v: UnixTimestamp) -> Self {
        v.0
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
