//! # MFTL Record Decoder
//!
//! Decodes one fixed-size telemetry record from a raw datagram.

use bytes::Buf;

use super::protocol::{EscReading, TelemetrySample, MFTL_MAGIC, MFTL_MOTOR_SLOTS, MFTL_RECORD_SIZE};
use crate::error::PacketError;

/// Decode a telemetry record from a raw datagram
///
/// Only the leading `MFTL_RECORD_SIZE` bytes are interpreted; trailing
/// bytes are ignored so senders may append fields without breaking older
/// monitors. The decoder is pure and keeps no state between calls.
///
/// # Arguments
///
/// * `datagram` - Raw datagram bytes as received from the transport
///
/// # Returns
///
/// * `Result<TelemetrySample, PacketError>` - Decoded sample, or error if invalid
///
/// # Errors
///
/// Returns error if:
/// - The datagram is shorter than one record (`TooShort`)
/// - The magic prefix does not match (`BadMagic`)
///
/// Field ranges are not checked here: NaN floats and out-of-range motor
/// counts decode successfully and are the validator's concern.
pub fn decode_sample(datagram: &[u8]) -> Result<TelemetrySample, PacketError> {
    if datagram.len() < MFTL_RECORD_SIZE {
        return Err(PacketError::TooShort {
            got: datagram.len(),
            need: MFTL_RECORD_SIZE,
        });
    }

    let mut buf = &datagram[..MFTL_RECORD_SIZE];

    let magic = buf.get_u32_le();
    if magic != MFTL_MAGIC {
        return Err(PacketError::BadMagic { found: magic });
    }

    let protocol_version = buf.get_u8();
    let motor_count = buf.get_u8();
    let _reserved = buf.get_u16_le();
    let timestamp_us = buf.get_u64_le();

    let orientation = read_f32_array::<4>(&mut buf);
    let angular_velocity = read_f32_array::<3>(&mut buf);
    let position = read_f32_array::<3>(&mut buf);
    let velocity = read_f32_array::<3>(&mut buf);
    let setpoint_velocity = read_f32_array::<3>(&mut buf);
    let setpoint_body_rates = read_f32_array::<3>(&mut buf);
    let setpoint_thrust = buf.get_f32_le();
    let motor_outputs = read_f32_array::<MFTL_MOTOR_SLOTS>(&mut buf);

    let esc_channel = buf.get_u8();
    let esc_data = buf.get_u16_le();
    let esc_raw = buf.get_u16_le();
    let esc_crc_ok = buf.get_u8();
    let esc_present = buf.get_u8();
    let armed = buf.get_u8() != 0;

    // ESC bytes are garbage when the present flag is clear; represent the
    // reading as absent rather than as zeroes.
    let esc = if esc_present != 0 {
        Some(EscReading {
            channel: esc_channel,
            data: esc_data,
            raw: esc_raw,
            crc_ok: esc_crc_ok != 0,
        })
    } else {
        None
    };

    Ok(TelemetrySample {
        protocol_version,
        motor_count,
        timestamp_us,
        orientation,
        angular_velocity,
        position,
        velocity,
        setpoint_velocity,
        setpoint_body_rates,
        setpoint_thrust,
        motor_outputs,
        esc,
        armed,
    })
}

/// Read N consecutive little-endian f32 values
fn read_f32_array<const N: usize>(buf: &mut &[u8]) -> [f32; N] {
    let mut out = [0.0f32; N];
    for slot in out.iter_mut() {
        *slot = buf.get_f32_le();
    }
    out
}
