//! # Refresh Scheduler
//!
//! Rate-limits how often a consumer is told a new snapshot is worth
//! reading, decoupling packet arrival rate from display rate.

use std::time::{Duration, Instant};

/// Deadline-based refresh gate
///
/// Call [`should_emit`](RefreshScheduler::should_emit) once per processed
/// packet; it answers `true` at most `rate_hz` times per second. The first
/// call always emits.
#[derive(Debug)]
pub struct RefreshScheduler {
    period: Duration,
    next_refresh_at: Instant,
}

impl RefreshScheduler {
    /// Create a scheduler emitting at most `rate_hz` times per second
    ///
    /// Rates below 1 Hz are clamped up to 1 Hz so a misconfigured rate
    /// can never freeze the display.
    pub fn new(rate_hz: f64) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / rate_hz.max(1.0)),
            next_refresh_at: Instant::now(),
        }
    }

    /// Whether a refresh is due at `now`
    ///
    /// When the deadline has passed this returns `true` and re-arms the
    /// deadline one period from `now`, so bursts of late packets cannot
    /// queue up extra refreshes.
    pub fn should_emit(&mut self, now: Instant) -> bool {
        if now >= self.next_refresh_at {
            self.next_refresh_at = now + self.period;
            true
        } else {
            false
        }
    }
}
