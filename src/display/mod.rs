//! # Display Module
//!
//! Console output for accepted telemetry samples.
//!
//! This module handles:
//! - One-line text formatting of a decoded sample
//! - Refresh-rate gating for live consumers

pub mod refresh;

pub use refresh::RefreshScheduler;

use crate::mftl::protocol::TelemetrySample;

/// Format one accepted sample as a single console line
///
/// Motor outputs are truncated to the meaningful slots; the ESC reading
/// prints as `none` when absent.
pub fn format_sample(sample: &TelemetrySample) -> String {
    let esc = match sample.esc {
        Some(esc) => format!(
            "ch={} data={} raw={} crc={}",
            esc.channel, esc.data, esc.raw, esc.crc_ok as u8
        ),
        None => "none".to_string(),
    };

    format!(
        "ts={} armed={} q=({}) rates=({}) vel=({}) set_vel=({}) set_rates=({}) thrust={:.3} motors=({}) esc={}",
        sample.timestamp_us,
        sample.armed as u8,
        join_floats(&sample.orientation),
        join_floats(&sample.angular_velocity),
        join_floats(&sample.velocity),
        join_floats(&sample.setpoint_velocity),
        join_floats(&sample.setpoint_body_rates),
        sample.setpoint_thrust,
        join_floats(sample.meaningful_motors()),
        esc
    )
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(", ")
}
