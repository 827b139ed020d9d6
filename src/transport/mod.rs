//! # Transport Module
//!
//! UDP datagram input for the telemetry stream.
//!
//! This module handles:
//! - Binding the telemetry listen socket
//! - Receiving raw datagrams with their source address
//! - The `DatagramSource` seam the ingestion loop consumes

pub mod source_trait;

pub use source_trait::DatagramSource;

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::Result;

/// Largest datagram accepted off the socket
///
/// Telemetry records are far smaller; the headroom tolerates senders that
/// append fields the monitor does not yet know about.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

/// UDP listen socket for telemetry datagrams
pub struct UdpTransport {
    /// Bound socket
    socket: UdpSocket,
    /// Reusable receive buffer
    recv_buf: Vec<u8>,
    /// Address the socket actually bound to
    local_addr: SocketAddr,
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl UdpTransport {
    /// Bind the telemetry listen socket
    ///
    /// # Arguments
    ///
    /// * `bind` - Interface address to bind (e.g., "0.0.0.0")
    /// * `port` - UDP port to listen on
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound
    pub async fn bind(bind: &str, port: u16) -> Result<Self> {
        debug!("Binding UDP socket on {}:{}", bind, port);
        let socket = UdpSocket::bind((bind, port)).await?;
        let local_addr = socket.local_addr()?;
        info!("Listening for telemetry on UDP {}", local_addr);

        Ok(Self {
            socket,
            recv_buf: vec![0u8; MAX_DATAGRAM_SIZE],
            local_addr,
        })
    }

    /// Address the socket bound to, with the resolved port
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl DatagramSource for UdpTransport {
    async fn recv(&mut self) -> io::Result<(Vec<u8>, SocketAddr)> {
        let (len, peer) = self.socket.recv_from(&mut self.recv_buf).await?;
        Ok((self.recv_buf[..len].to_vec(), peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let transport = UdpTransport::bind("127.0.0.1", 0).await.unwrap();
        assert_ne!(transport.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_recv_loopback_datagram() {
        let mut transport = UdpTransport::bind("127.0.0.1", 0).await.unwrap();
        let target = transport.local_addr();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"hello telemetry", target).await.unwrap();

        let (datagram, peer) = transport.recv().await.unwrap();
        assert_eq!(datagram, b"hello telemetry");
        assert_eq!(peer, sender.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_recv_preserves_datagram_boundaries() {
        let mut transport = UdpTransport::bind("127.0.0.1", 0).await.unwrap();
        let target = transport.local_addr();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[1u8; 10], target).await.unwrap();
        sender.send_to(&[2u8; 20], target).await.unwrap();

        let (first, _) = transport.recv().await.unwrap();
        let (second, _) = transport.recv().await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 20);
    }
}
