//! # Error Types
//!
//! Custom error types for MFTL Monitor using `thiserror`.

use thiserror::Error;

/// Per-datagram decode and validation errors
///
/// Every variant is recoverable: the ingestion loop drops the offending
/// datagram, bumps a counter, and keeps receiving. Foreign traffic on the
/// telemetry port shows up here as `BadMagic`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    /// Datagram smaller than the fixed record size
    #[error("datagram too short: got {got} bytes, need {need}")]
    TooShort { got: usize, need: usize },

    /// First four bytes do not match the MFTL magic
    #[error("bad magic: 0x{found:08X}")]
    BadMagic { found: u32 },

    /// Record carries a protocol version this monitor does not understand
    #[error("unsupported protocol version: {found}")]
    UnsupportedVersion { found: u8 },

    /// Motor count exceeds the number of motor slots in the record
    #[error("invalid motor count: {found}")]
    InvalidMotorCount { found: u8 },
}

/// Main error type for MFTL Monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Telemetry packet errors
    #[error("telemetry packet error: {0}")]
    Packet(#[from] PacketError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MFTL Monitor
pub type Result<T> = std::result::Result<T, MonitorError>;
