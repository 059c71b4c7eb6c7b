//! Protocol engine
//!
//! Owns the station connections: frames the byte stream, identifies the
//! station, correlates server calls with their replies and hands station
//! calls to a [`RequestHandler`]. Connection lifecycle is reported to a
//! [`ConnectionObserver`].

mod central;
mod connection;
mod outbound;

pub use central::CentralSystem;
pub use connection::{write_frames, FrameReader};
pub use outbound::{ConnectionHandle, Connections};

use async_trait::async_trait;
use csms_shared::{CallError, Request, Response};

/// Identifies one accepted connection for the lifetime of the process
pub type ConnectionId = u64;

/// Receives connect and disconnect events from the engine
#[async_trait]
pub trait ConnectionObserver: Send + Sync {
    /// A station was identified on a new connection
    async fn connected(&self, station_id: &str, connection_id: ConnectionId);

    /// The connection closed or was superseded
    async fn disconnected(&self, station_id: &str, connection_id: ConnectionId);
}

/// Answers calls initiated by stations
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, station_id: &str, request: Request) -> Result<Response, CallError>;
}
