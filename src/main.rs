//! # MFTL Monitor
//!
//! Live UDP telemetry monitor for makeflight flight controllers.
//!
//! Binds the telemetry port, decodes and validates every incoming record,
//! keeps a rolling window of recent samples per display channel, and prints
//! accepted samples to the console at a rate-limited cadence.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging with tracing subscriber
//!    - Load configuration (optional TOML path as the first argument)
//!    - Bind the UDP listen socket
//!
//! 2. **Main Loop**
//!    - Receive, decode, validate, and buffer datagrams
//!    - Print accepted samples, gated to the configured refresh rate
//!    - Log ingestion counters every N accepted packets
//!
//! 3. **Graceful Shutdown**
//!    - Ctrl+C requests a cooperative stop
//!    - Final counters are logged before exit

use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use mftl_monitor::buffer::{window_capacity, ChannelBuffers};
use mftl_monitor::config::Config;
use mftl_monitor::display::{format_sample, RefreshScheduler};
use mftl_monitor::ingest::{stop_channel, IngestionLoop};
use mftl_monitor::mftl::protocol::MFTL_RECORD_SIZE;
use mftl_monitor::transport::UdpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("MFTL Monitor v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let transport = UdpTransport::bind(&config.transport.bind, config.transport.port).await?;
    info!(
        "Listening on UDP {} (record size {} bytes)",
        transport.local_addr(),
        MFTL_RECORD_SIZE
    );
    info!("Press Ctrl+C to exit");

    let capacity = window_capacity(config.buffer.window_seconds, config.buffer.expected_rate_hz);
    let buffers = Arc::new(RwLock::new(ChannelBuffers::new(capacity)));

    // Forward Ctrl+C to the ingestion loop as a cooperative stop
    let (stop_tx, stop_rx) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            let _ = stop_tx.send(true);
        }
    });

    let mut scheduler = RefreshScheduler::new(config.display.refresh_hz);
    let print_samples = config.display.print_samples;

    let mut ingest = IngestionLoop::new(
        transport,
        buffers,
        stop_rx,
        config.ingest.log_interval_packets,
    );

    let result = ingest
        .run(|sample| {
            if print_samples && scheduler.should_emit(Instant::now()) {
                println!("{}", format_sample(sample));
            }
        })
        .await;

    let stats = ingest.stats();
    info!(
        "Ingestion finished: {} received, {} accepted, {} rejected",
        stats.received, stats.accepted, stats.rejected
    );

    if let Err(e) = result {
        warn!("Ingestion ended on transport error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
