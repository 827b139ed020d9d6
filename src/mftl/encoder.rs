//! # MFTL Record Encoder
//!
//! Encodes a telemetry sample into the wire record. The monitor itself only
//! receives, but the encoder is the reference for the layout and feeds the
//! loopback path used by simulators and tests.

use bytes::BufMut;

use super::protocol::{TelemetrySample, MFTL_MAGIC, MFTL_RECORD_SIZE};

/// Encode a telemetry sample into one complete wire record
///
/// The output is always exactly `MFTL_RECORD_SIZE` bytes. When `esc` is
/// absent the ESC fields are zero-filled and the present flag is clear.
///
/// # Arguments
///
/// * `sample` - Sample to encode
///
/// # Returns
///
/// * `Vec<u8>` - Complete little-endian record
pub fn encode_sample(sample: &TelemetrySample) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MFTL_RECORD_SIZE);

    buf.put_u32_le(MFTL_MAGIC);
    buf.put_u8(sample.protocol_version);
    buf.put_u8(sample.motor_count);
    buf.put_u16_le(0); // reserved
    buf.put_u64_le(sample.timestamp_us);

    put_f32_slice(&mut buf, &sample.orientation);
    put_f32_slice(&mut buf, &sample.angular_velocity);
    put_f32_slice(&mut buf, &sample.position);
    put_f32_slice(&mut buf, &sample.velocity);
    put_f32_slice(&mut buf, &sample.setpoint_velocity);
    put_f32_slice(&mut buf, &sample.setpoint_body_rates);
    buf.put_f32_le(sample.setpoint_thrust);
    put_f32_slice(&mut buf, &sample.motor_outputs);

    match sample.esc {
        Some(esc) => {
            buf.put_u8(esc.channel);
            buf.put_u16_le(esc.data);
            buf.put_u16_le(esc.raw);
            buf.put_u8(esc.crc_ok as u8);
            buf.put_u8(1); // esc_present
        }
        None => {
            buf.put_u8(0);
            buf.put_u16_le(0);
            buf.put_u16_le(0);
            buf.put_u8(0);
            buf.put_u8(0); // esc_present
        }
    }

    buf.put_u8(sample.armed as u8);

    buf
}

fn put_f32_slice(buf: &mut Vec<u8>, values: &[f32]) {
    for &value in values {
        buf.put_f32_le(value);
    }
}
