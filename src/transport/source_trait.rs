//! Trait abstraction for datagram input to enable testing

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;

/// Trait for receiving raw telemetry datagrams
///
/// The ingestion loop is written against this trait so tests can feed it
/// canned datagrams without a socket. `recv` blocks until a datagram
/// arrives; an `Err` means the transport is gone for good.
#[async_trait]
pub trait DatagramSource: Send {
    /// Receive one datagram and the address it came from
    async fn recv(&mut self) -> io::Result<(Vec<u8>, SocketAddr)>;
}
