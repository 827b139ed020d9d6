//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// UDP listen socket configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Rolling window configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BufferConfig {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,

    #[serde(default = "default_expected_rate_hz")]
    pub expected_rate_hz: f64,
}

/// Console display configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: f64,

    #[serde(default = "default_print_samples")]
    pub print_samples: bool,
}

/// Ingestion diagnostics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_log_interval_packets")]
    pub log_interval_packets: u64,
}

// Default value functions
fn default_bind() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 14560 }

fn default_window_seconds() -> f64 { 5.0 }
fn default_expected_rate_hz() -> f64 { 200.0 }

fn default_refresh_hz() -> f64 { 20.0 }
fn default_print_samples() -> bool { true }

fn default_log_interval_packets() -> u64 { 1000 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            expected_rate_hz: default_expected_rate_hz(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
            print_samples: default_print_samples(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_interval_packets: default_log_interval_packets(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.transport.bind.is_empty() {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("transport bind address cannot be empty")
            ));
        }

        if self.transport.port == 0 {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("transport port must be between 1 and 65535")
            ));
        }

        if self.buffer.window_seconds < 0.1 || self.buffer.window_seconds > 3600.0 {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("window_seconds must be between 0.1 and 3600")
            ));
        }

        if self.buffer.expected_rate_hz < 1.0 || self.buffer.expected_rate_hz > 10000.0 {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("expected_rate_hz must be between 1 and 10000")
            ));
        }

        if self.display.refresh_hz < 1.0 || self.display.refresh_hz > 1000.0 {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("refresh_hz must be between 1 and 1000")
            ));
        }

        if self.ingest.log_interval_packets == 0 {
            return Err(crate::error::MonitorError::Config(
                toml::de::Error::custom("log_interval_packets must be greater than 0")
            ));
        }

        Ok(())
    }
}
