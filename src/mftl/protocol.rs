//! # MFTL Protocol Constants and Types
//!
//! Core definitions for the makeflight telemetry record. The wire layout is
//! shared with the flight controller firmware and must not change: a flat
//! concatenation of little-endian primitives, no padding between fields.

/// Record magic, the ASCII bytes "LTFM" read as a little-endian u32
pub const MFTL_MAGIC: u32 = 0x4D46544C;

/// The single protocol version this monitor understands
pub const MFTL_PROTOCOL_VERSION: u8 = 1;

/// Number of motor output slots carried by every record
///
/// Records always carry all 8 slots; only the first `motor_count` hold
/// live data, the rest are wire padding.
pub const MFTL_MOTOR_SLOTS: usize = 8;

/// Fixed record size in bytes, summed from the field layout
pub const MFTL_RECORD_SIZE: usize = 4   // magic
    + 1                                 // version
    + 1                                 // motor_count
    + 2                                 // reserved
    + 8                                 // timestamp_us
    + 4 * 4                             // orientation quaternion
    + 3 * 4                             // angular velocity
    + 3 * 4                             // position
    + 3 * 4                             // velocity
    + 3 * 4                             // setpoint velocity
    + 3 * 4                             // setpoint body rates
    + 4                                 // setpoint thrust
    + MFTL_MOTOR_SLOTS * 4              // motor outputs
    + 1                                 // esc_channel
    + 2                                 // esc_data
    + 2                                 // esc_raw
    + 1                                 // esc_crc_ok
    + 1                                 // esc_present
    + 1; // armed

/// One ESC telemetry reading forwarded by the flight controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscReading {
    /// ESC telemetry channel the reading came from
    pub channel: u8,

    /// Decoded telemetry value
    pub data: u16,

    /// Raw wire value before decoding
    pub raw: u16,

    /// Whether the ESC frame passed its CRC check
    pub crc_ok: bool,
}

/// One decoded telemetry record
///
/// Field semantics match the firmware sender: `timestamp_us` is the device
/// clock (monotonic on the device, not across reordered datagrams), the
/// quaternion is passed through without renormalization, and positions /
/// velocities are in whatever frame the estimator publishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Wire protocol version
    pub protocol_version: u8,

    /// Number of live motor slots (0-8)
    pub motor_count: u8,

    /// Device clock in microseconds
    pub timestamp_us: u64,

    /// Attitude quaternion
    pub orientation: [f32; 4],

    /// Body rates in rad/s
    pub angular_velocity: [f32; 3],

    /// Estimated position
    pub position: [f32; 3],

    /// Estimated velocity
    pub velocity: [f32; 3],

    /// Velocity setpoint
    pub setpoint_velocity: [f32; 3],

    /// Body rate setpoint in rad/s
    pub setpoint_body_rates: [f32; 3],

    /// Thrust setpoint
    pub setpoint_thrust: f32,

    /// All 8 motor output slots, including padding slots
    pub motor_outputs: [f32; MFTL_MOTOR_SLOTS],

    /// ESC telemetry, present iff the sender attached a reading
    pub esc: Option<EscReading>,

    /// Whether the vehicle was armed when the record was sent
    pub armed: bool,
}

impl TelemetrySample {
    /// The motor output slots that actually carry data
    ///
    /// Slots at or beyond `motor_count` are wire padding; consumers that
    /// respect the protocol read only this slice. The full `motor_outputs`
    /// array stays available for diagnostics.
    pub fn meaningful_motors(&self) -> &[f32] {
        let count = (self.motor_count as usize).min(MFTL_MOTOR_SLOTS);
        &self.motor_outputs[..count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_size() {
        // Must match the packed struct emitted by the firmware
        assert_eq!(MFTL_RECORD_SIZE, 136);
    }

    #[test]
    fn test_magic_spells_mftl() {
        assert_eq!(&MFTL_MAGIC.to_le_bytes(), b"LTFM");
    }

    #[test]
    fn test_meaningful_motors_respects_count() {
        let mut sample = sample_with_motor_count(2);
        sample.motor_outputs = [0.1, 0.2, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9];

        assert_eq!(sample.meaningful_motors(), &[0.1, 0.2]);
        // Raw slots stay retrievable
        assert_eq!(sample.motor_outputs[5], 0.9);
    }

    #[test]
    fn test_meaningful_motors_clamps_overlong_count() {
        let sample = sample_with_motor_count(12);
        assert_eq!(sample.meaningful_motors().len(), MFTL_MOTOR_SLOTS);
    }

    fn sample_with_motor_count(motor_count: u8) -> TelemetrySample {
        TelemetrySample {
            protocol_version: MFTL_PROTOCOL_VERSION,
            motor_count,
            timestamp_us: 0,
            orientation: [1.0, 0.0, 0.0, 0.0],
            angular_velocity: [0.0; 3],
            position: [0.0; 3],
            velocity: [0.0; 3],
            setpoint_velocity: [0.0; 3],
            setpoint_body_rates: [0.0; 3],
            setpoint_thrust: 0.0,
            motor_outputs: [0.0; MFTL_MOTOR_SLOTS],
            esc: None,
            armed: false,
        }
    }
}
