//! Stream abstraction shared by the plain and mutual-TLS listeners

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A bidirectional byte stream to a single station
pub trait StationStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> StationStream for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

pub type BoxedStream = Box<dyn StationStream>;

/// Turns an accepted TCP connection into a station stream
#[async_trait]
pub trait StreamUpgrader: Send + Sync {
    /// Perform whatever handshake the transport requires
    async fn upgrade(&self, stream: TcpStream) -> Result<BoxedStream>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
