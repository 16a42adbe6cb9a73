//! Launch countdown math.
//!
//! The landing page shows time remaining until launch, re-rendered by a
//! periodic timer the host schedules. Only the computation lives here.

use crate::types::Timestamp;

/// Launch is pinned three days out from first render.
pub const LAUNCH_OFFSET_MS: i64 = 3 * 24 * 60 * 60 * 1000;

/// Launch instant for a page first rendered at `now`.
pub fn launch_at(now: Timestamp) -> Timestamp {
    Timestamp(now.0 + LAUNCH_OFFSET_MS)
}

/// Remaining time split for display. Clamped at zero once launch passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// Split a remaining-milliseconds value.
    pub fn from_remaining_millis(remaining: i64) -> Self {
        let total_seconds = (remaining / 1000).max(0) as u64;
        Self {
            days: total_seconds / 86_400,
            hours: (total_seconds % 86_400) / 3_600,
            minutes: (total_seconds % 3_600) / 60,
            seconds: total_seconds % 60,
        }
    }

    /// Countdown from `now` to `launch`.
    pub fn between(now: Timestamp, launch: Timestamp) -> Self {
        Self::from_remaining_millis(now.millis_until(launch))
    }

    pub fn is_elapsed(&self) -> bool {
        *self == Self::default()
    }
}
