//! # MFTL Protocol Module
//!
//! Implementation of the MFTL telemetry wire format spoken by makeflight
//! flight controllers over UDP.
//!
//! This module handles:
//! - Telemetry record decoding (fixed-size, little-endian, magic-prefixed)
//! - Record encoding for loopback and simulation use
//! - Application-level sample validation (version, motor count)

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod validator;
