//! Outbound command primitive used by the orchestrator

use crate::engine::ConnectionId;
use crate::error::CommandError;
use async_trait::async_trait;
use csms_shared::{CallError, Request, Response};
use tokio::sync::oneshot;

/// What a station answered to a call: a result or a call error
pub type Reply = Result<Response, CallError>;

/// A call that has been dispatched and awaits its correlated reply
#[derive(Debug)]
pub struct PendingResponse {
    station_id: String,
    message_id: String,
    rx: oneshot::Receiver<Reply>,
}

impl PendingResponse {
    pub fn new(
        station_id: impl Into<String>,
        message_id: impl Into<String>,
        rx: oneshot::Receiver<Reply>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            message_id: message_id.into(),
            rx,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Wait for the reply. Fails if the connection went away first.
    pub async fn wait(self) -> Result<Reply, CommandError> {
        self.rx
            .await
            .map_err(|_| CommandError::ConnectionClosed(self.station_id))
    }
}

/// Sends calls to a station over the connection that owns its session
#[async_trait]
pub trait CommandSender: Send + Sync {
    /// Dispatch `request` to the station on `connection_id`.
    ///
    /// An `Err` means the call never left the server. Calls for a connection
    /// that has closed or been superseded fail with
    /// [`CommandError::NotConnected`].
    async fn send(
        &self,
        station_id: &str,
        connection_id: ConnectionId,
        request: Request,
    ) -> Result<PendingResponse, CommandError>;
}
