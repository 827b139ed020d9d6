//! # Ingestion Module
//!
//! Turns the raw datagram stream into buffered telemetry samples.
//!
//! This module handles:
//! - Pulling raw datagrams from the transport
//! - Decoding and validating each datagram into a sample
//! - Appending accepted samples to the rolling windows
//! - Run/stop lifecycle and per-packet diagnostics

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::buffer::ChannelBuffers;
use crate::error::Result;
use crate::mftl::decoder::decode_sample;
use crate::mftl::protocol::TelemetrySample;
use crate::mftl::validator::check_sample;
use crate::transport::DatagramSource;

/// Lifecycle of the ingestion loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet running
    Idle,
    /// Blocking on the transport and processing datagrams
    Running,
    /// Exited, either on request or on a dead transport
    Stopped,
}

/// Per-run ingestion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Datagrams pulled off the transport
    pub received: u64,
    /// Datagrams that decoded and validated cleanly
    pub accepted: u64,
    /// Datagrams dropped by decode or validation
    pub rejected: u64,
}

/// Create a stop signal pair for an ingestion loop
///
/// Send `true` on the returned sender to stop the loop at its next
/// iteration boundary, whether or not a datagram is in flight.
pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// The telemetry ingestion loop
///
/// Owns the transport and the rolling windows. A malformed or foreign
/// datagram is dropped and counted; only a dead transport or a stop
/// request ends the loop.
pub struct IngestionLoop<S: DatagramSource> {
    source: S,
    buffers: Arc<RwLock<ChannelBuffers>>,
    stop_rx: watch::Receiver<bool>,
    log_interval: u64,
    state: LoopState,
    stats: IngestStats,
}

impl<S: DatagramSource> IngestionLoop<S> {
    /// Create an idle loop over a transport and buffer set
    ///
    /// # Arguments
    ///
    /// * `source` - Transport to pull datagrams from
    /// * `buffers` - Rolling windows accepted samples are appended to
    /// * `stop_rx` - Stop signal from [`stop_channel`]
    /// * `log_interval` - Accepted-packet count between status log lines
    pub fn new(
        source: S,
        buffers: Arc<RwLock<ChannelBuffers>>,
        stop_rx: watch::Receiver<bool>,
        log_interval: u64,
    ) -> Self {
        Self {
            source,
            buffers,
            stop_rx,
            log_interval: log_interval.max(1),
            state: LoopState::Idle,
            stats: IngestStats::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Counters for the current or finished run
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Run until stopped or the transport dies
    ///
    /// `on_sample` is invoked once per accepted sample, after the sample
    /// has been appended to the buffers. Rejected datagrams are invisible
    /// to the callback.
    ///
    /// # Errors
    ///
    /// Returns error only when the transport fails; a stop request ends
    /// the loop with `Ok(())`.
    pub async fn run<F>(&mut self, mut on_sample: F) -> Result<()>
    where
        F: FnMut(&TelemetrySample),
    {
        self.state = LoopState::Running;
        info!("Ingestion loop running");

        let mut last_log_count: u64 = 0;

        loop {
            tokio::select! {
                biased;

                // Stop requests win over a pending receive
                changed = self.stop_rx.changed() => {
                    if changed.is_err() || *self.stop_rx.borrow() {
                        info!("Stop requested, ending ingestion");
                        break;
                    }
                }

                received = self.source.recv() => {
                    let (datagram, peer) = match received {
                        Ok(received) => received,
                        Err(e) => {
                            warn!("Transport failed, ending ingestion: {}", e);
                            self.state = LoopState::Stopped;
                            return Err(e.into());
                        }
                    };

                    self.stats.received += 1;

                    let sample = match decode_sample(&datagram)
                        .and_then(|sample| check_sample(&sample).map(|()| sample))
                    {
                        Ok(sample) => sample,
                        Err(e) => {
                            self.stats.rejected += 1;
                            debug!("Dropping datagram from {}: {}", peer, e);
                            continue;
                        }
                    };

                    {
                        let mut buffers = match self.buffers.write() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        buffers.append_sample(&sample);
                    }

                    self.stats.accepted += 1;
                    on_sample(&sample);

                    if self.stats.accepted - last_log_count >= self.log_interval {
                        info!(
                            "Accepted {} telemetry packets ({} received, {} rejected)",
                            self.stats.accepted, self.stats.received, self.stats.rejected
                        );
                        last_log_count = self.stats.accepted;
                    }
                }
            }
        }

        self.state = LoopState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::window_capacity;
    use crate::mftl::encoder::encode_sample;
    use crate::mftl::protocol::{EscReading, MFTL_MOTOR_SLOTS, MFTL_PROTOCOL_VERSION};
    use crate::transport::source_trait::mocks::{EmptyBehavior, MockSource};
    use tokio_test::{assert_err, assert_ok};

    fn test_sample(timestamp_us: u64) -> TelemetrySample {
        TelemetrySample {
            protocol_version: MFTL_PROTOCOL_VERSION,
            motor_count: 4,
            timestamp_us,
            orientation: [1.0, 0.0, 0.0, 0.0],
            angular_velocity: [0.1, 0.2, 0.3],
            position: [0.0; 3],
            velocity: [0.0; 3],
            setpoint_velocity: [0.0; 3],
            setpoint_body_rates: [0.0; 3],
            setpoint_thrust: 0.5,
            motor_outputs: [0.2, 0.3, 0.4, 0.5, 0.0, 0.0, 0.0, 0.0],
            esc: None,
            armed: true,
        }
    }

    fn shared_buffers(capacity: usize) -> Arc<RwLock<ChannelBuffers>> {
        Arc::new(RwLock::new(ChannelBuffers::new(capacity)))
    }

    #[tokio::test]
    async fn test_single_accepted_sample() {
        let datagram = encode_sample(&test_sample(1_000_000));
        let source = MockSource::new(vec![datagram], EmptyBehavior::Close);
        let buffers = shared_buffers(100);
        let (_stop_tx, stop_rx) = stop_channel();

        let mut ingest = IngestionLoop::new(source, buffers.clone(), stop_rx, 1000);
        assert_eq!(ingest.state(), LoopState::Idle);

        let mut seen = Vec::new();
        let result = ingest.run(|sample| seen.push(*sample)).await;

        // The mock reports a closed transport once drained
        assert_err!(result);
        assert_eq!(ingest.state(), LoopState::Stopped);
        assert_eq!(ingest.stats().accepted, 1);

        assert_eq!(seen.len(), 1);
        assert!(seen[0].armed);
        assert_eq!(seen[0].meaningful_motors().len(), 4);

        let guard = buffers.read().unwrap();
        assert_eq!(guard.snapshot("rate_p").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupted_magic_is_invisible() {
        let mut bad = encode_sample(&test_sample(1_000_000));
        bad[1] ^= 0xFF;
        let good = encode_sample(&test_sample(2_000_000));

        let source = MockSource::new(vec![bad, good], EmptyBehavior::Close);
        let buffers = shared_buffers(100);
        let (_stop_tx, stop_rx) = stop_channel();
        let mut ingest = IngestionLoop::new(source, buffers.clone(), stop_rx, 1000);

        let mut seen = 0usize;
        let _ = ingest.run(|_| seen += 1).await;

        // Ingestion continued past the bad datagram
        let stats = ingest.stats();
        assert_eq!(stats.received, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn test_short_and_foreign_datagrams_are_dropped() {
        let datagrams = vec![
            vec![0u8; 4],                       // too short
            b"GET / HTTP/1.1\r\n".repeat(16),   // foreign traffic, long enough
            encode_sample(&test_sample(1)),
        ];
        let source = MockSource::new(datagrams, EmptyBehavior::Close);
        let buffers = shared_buffers(100);
        let (_stop_tx, stop_rx) = stop_channel();
        let mut ingest = IngestionLoop::new(source, buffers, stop_rx, 1000);

        let _ = ingest.run(|_| {}).await;
        assert_eq!(ingest.stats().rejected, 2);
        assert_eq!(ingest.stats().accepted, 1);
    }

    #[tokio::test]
    async fn test_unsupported_version_is_rejected() {
        let mut sample = test_sample(1);
        sample.protocol_version = 9;
        let source = MockSource::new(vec![encode_sample(&sample)], EmptyBehavior::Close);
        let buffers = shared_buffers(100);
        let (_stop_tx, stop_rx) = stop_channel();
        let mut ingest = IngestionLoop::new(source, buffers, stop_rx, 1000);

        let _ = ingest.run(|_| {}).await;
        assert_eq!(ingest.stats().rejected, 1);
        assert_eq!(ingest.stats().accepted, 0);
    }

    #[tokio::test]
    async fn test_stop_request_ends_idle_loop() {
        let source = MockSource::new(vec![], EmptyBehavior::Block);
        let buffers = shared_buffers(100);
        let (stop_tx, stop_rx) = stop_channel();
        let mut ingest = IngestionLoop::new(source, buffers, stop_rx, 1000);

        // Stop before any datagram arrives; the loop must not wait for one
        stop_tx.send(true).unwrap();
        let result = ingest.run(|_| {}).await;

        assert_ok!(result);
        assert_eq!(ingest.state(), LoopState::Stopped);
        assert_eq!(ingest.stats(), IngestStats::default());
    }

    #[tokio::test]
    async fn test_alternating_esc_presence() {
        let capacity = window_capacity(5.0, 200.0);
        let datagrams: Vec<_> = (0..50)
            .map(|i| {
                let mut sample = test_sample(i * 5_000);
                sample.motor_count = 8;
                if i % 2 == 1 {
                    sample.esc = Some(EscReading {
                        channel: (i % MFTL_MOTOR_SLOTS as u64) as u8,
                        data: i as u16,
                        raw: (i * 2) as u16,
                        crc_ok: true,
                    });
                }
                encode_sample(&sample)
            })
            .collect();

        let source = MockSource::new(datagrams, EmptyBehavior::Close);
        let buffers = shared_buffers(capacity);
        let (_stop_tx, stop_rx) = stop_channel();
        let mut ingest = IngestionLoop::new(source, buffers.clone(), stop_rx, 1000);

        let mut esc_count = 0usize;
        let _ = ingest.run(|sample| {
            if sample.esc.is_some() {
                esc_count += 1;
            }
        }).await;

        assert_eq!(ingest.stats().accepted, 50);
        assert_eq!(esc_count, 25);

        let guard = buffers.read().unwrap();
        let snapshot = guard.snapshot("rate_p").unwrap();
        assert_eq!(snapshot.len(), 50.min(capacity));
    }
}
