//! # Sample Validator
//!
//! Application-level checks applied after a record decodes cleanly. The
//! decoder guarantees syntactic well-formedness; this stage enforces the
//! invariants the wire format alone cannot express.

use super::protocol::{TelemetrySample, MFTL_MOTOR_SLOTS, MFTL_PROTOCOL_VERSION};
use crate::error::PacketError;

/// Check a decoded sample for acceptance
///
/// Accepted samples pass through unmodified; slots at or beyond
/// `motor_count` stay in the sample and are masked only at read time via
/// [`TelemetrySample::meaningful_motors`].
///
/// # Errors
///
/// Returns error if:
/// - The protocol version is not the one this monitor speaks; unknown
///   layouts are rejected rather than guessed at
/// - `motor_count` exceeds the 8 slots a record carries
pub fn check_sample(sample: &TelemetrySample) -> Result<(), PacketError> {
    if sample.protocol_version != MFTL_PROTOCOL_VERSION {
        return Err(PacketError::UnsupportedVersion {
            found: sample.protocol_version,
        });
    }

    if sample.motor_count as usize > MFTL_MOTOR_SLOTS {
        return Err(PacketError::InvalidMotorCount {
            found: sample.motor_count,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sample() -> TelemetrySample {
        TelemetrySample {
            protocol_version: MFTL_PROTOCOL_VERSION,
            motor_count: 4,
            timestamp_us: 1,
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

    #[test]
    fn test_accepts_valid_sample() {
        assert!(check_sample(&valid_sample()).is_ok());
    }

    #[test]
    fn test_accepts_zero_and_max_motor_count() {
        let mut sample = valid_sample();
        sample.motor_count = 0;
        assert!(check_sample(&sample).is_ok());

        sample.motor_count = 8;
        assert!(check_sample(&sample).is_ok());
    }

    #[test]
    fn test_rejects_motor_count_over_slots() {
        let mut sample = valid_sample();
        sample.motor_count = 9;
        assert_eq!(
            check_sample(&sample),
            Err(PacketError::InvalidMotorCount { found: 9 })
        );
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut sample = valid_sample();
        sample.protocol_version = 2;
        assert_eq!(
            check_sample(&sample),
            Err(PacketError::UnsupportedVersion { found: 2 })
        );
    }

    #[test]
    fn test_accepted_sample_is_unmodified() {
        let mut sample = valid_sample();
        sample.motor_count = 2;
        sample.motor_outputs = [0.1, 0.2, 0.7, 0.8, 0.0, 0.0, 0.0, 0.0];

        check_sample(&sample).unwrap();

        // Padding slots are not zeroed by validation
        assert_eq!(sample.motor_outputs[2], 0.7);
        assert_eq!(sample.meaningful_motors(), &[0.1, 0.2]);
    }
}
