//! # Rolling Window Buffers
//!
//! Fixed-capacity time series storage for live display.
//!
//! This module handles:
//! - Per-channel rolling windows with drop-oldest eviction
//! - Grouping the display channels into one buffer set
//! - Consistent copy-out snapshots with a rebased time axis

use std::collections::VecDeque;

use crate::mftl::protocol::TelemetrySample;

/// Smallest window retained regardless of configuration
const MIN_WINDOW_CAPACITY: usize = 10;

/// Display channels tracked per sample, in display order
///
/// Body rates and their setpoints, the rate tracking error, the first four
/// motor slots, and the thrust setpoint.
pub const DISPLAY_CHANNELS: &[&str] = &[
    "rate_p",
    "rate_q",
    "rate_r",
    "rate_sp_p",
    "rate_sp_q",
    "rate_sp_r",
    "rate_err_p",
    "rate_err_q",
    "rate_err_r",
    "m0",
    "m1",
    "m2",
    "m3",
    "thrust",
];

/// Window capacity for a time span at an expected sample rate
pub fn window_capacity(window_seconds: f64, expected_rate_hz: f64) -> usize {
    ((window_seconds * expected_rate_hz) as usize).max(MIN_WINDOW_CAPACITY)
}

/// One fixed-capacity, time-ordered channel of `(seconds, value)` points
///
/// Appending beyond capacity evicts the oldest point; eviction is O(1) and
/// never fails. Timestamps are stored as absolute device-clock seconds and
/// rebased at snapshot time.
#[derive(Debug)]
pub struct RollingWindow {
    points: VecDeque<(f64, f32)>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` points
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one point, evicting the oldest once full
    pub fn push(&mut self, seconds: f64, value: f32) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back((seconds, value));
    }

    /// Number of points currently retained
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy out the retained points, oldest first
    ///
    /// Times are rebased against the earliest retained point, so the first
    /// entry is always at 0.0 and the axis rolls forward as eviction
    /// advances the window.
    pub fn snapshot(&self) -> Vec<(f64, f32)> {
        let t0 = match self.points.front() {
            Some(&(t, _)) => t,
            None => return Vec::new(),
        };
        self.points.iter().map(|&(t, v)| (t - t0, v)).collect()
    }
}

/// The full set of display channels, keyed by channel name
///
/// Owned and mutated by the ingestion loop only; every reader goes through
/// [`ChannelBuffers::snapshot`] and never sees a partially appended sample.
#[derive(Debug)]
pub struct ChannelBuffers {
    channels: Vec<(&'static str, RollingWindow)>,
}

impl ChannelBuffers {
    /// Create one window per display channel, all with the same capacity
    pub fn new(capacity: usize) -> Self {
        let channels = DISPLAY_CHANNELS
            .iter()
            .map(|&name| (name, RollingWindow::new(capacity)))
            .collect();
        Self { channels }
    }

    /// Append one accepted sample across all channels
    ///
    /// Motor slots beyond `motor_count` chart as 0.0, matching how the
    /// sender pads them on the wire.
    pub fn append_sample(&mut self, sample: &TelemetrySample) {
        let t = sample.timestamp_us as f64 * 1e-6;
        let rates = sample.angular_velocity;
        let setpoints = sample.setpoint_body_rates;

        for (name, window) in &mut self.channels {
            let value = match *name {
                "rate_p" => rates[0],
                "rate_q" => rates[1],
                "rate_r" => rates[2],
                "rate_sp_p" => setpoints[0],
                "rate_sp_q" => setpoints[1],
                "rate_sp_r" => setpoints[2],
                "rate_err_p" => setpoints[0] - rates[0],
                "rate_err_q" => setpoints[1] - rates[1],
                "rate_err_r" => setpoints[2] - rates[2],
                "m0" => motor_or_zero(sample, 0),
                "m1" => motor_or_zero(sample, 1),
                "m2" => motor_or_zero(sample, 2),
                "m3" => motor_or_zero(sample, 3),
                "thrust" => sample.setpoint_thrust,
                _ => unreachable!("unknown display channel {name}"),
            };
            window.push(t, value);
        }
    }

    /// Snapshot one channel by name, or `None` for an unknown channel
    pub fn snapshot(&self, channel: &str) -> Option<Vec<(f64, f32)>> {
        self.channels
            .iter()
            .find(|(name, _)| *name == channel)
            .map(|(_, window)| window.snapshot())
    }

    /// Channel names in display order
    pub fn channel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.channels.iter().map(|(name, _)| *name)
    }
}

fn motor_or_zero(sample: &TelemetrySample, index: usize) -> f32 {
    if index < sample.motor_count as usize {
        sample.motor_outputs[index]
    } else {
        0.0
    }
}
