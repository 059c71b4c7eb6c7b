//! Live connection table and outbound call correlation

use super::ConnectionId;
use crate::command::{CommandSender, PendingResponse, Reply};
use crate::error::CommandError;
use async_trait::async_trait;
use bytes::Bytes;
use csms_shared::{codec, Frame, Request};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type PendingCalls = Arc<Mutex<HashMap<String, oneshot::Sender<Reply>>>>;

/// Write side of one connection as seen by the rest of the server
#[derive(Clone)]
pub struct ConnectionHandle {
    connection_id: ConnectionId,
    outbound: mpsc::UnboundedSender<Bytes>,
    pending: PendingCalls,
    closed: CancellationToken,
}

impl ConnectionHandle {
    fn new(connection_id: ConnectionId, outbound: mpsc::UnboundedSender<Bytes>) -> Self {
        Self {
            connection_id,
            outbound,
            pending: Arc::new(Mutex::new(HashMap::new())),
            closed: CancellationToken::new(),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Queue an encoded frame for the writer
    pub fn send_frame(&self, frame: &Frame) -> Result<(), CommandError> {
        let bytes = codec::encode(frame)?;
        self.outbound
            .send(bytes)
            .map_err(|_| CommandError::ConnectionClosed(frame.station_id.clone()))
    }

    /// Resolve the pending call `message_id`. False if nothing was waiting.
    pub async fn resolve(&self, message_id: &str, reply: Reply) -> bool {
        match self.pending.lock().await.remove(message_id) {
            Some(tx) => tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Fail every call still awaiting a reply
    pub async fn fail_pending(&self) -> usize {
        let mut pending = self.pending.lock().await;
        let count = pending.len();
        // Dropping the senders resolves each waiter with ConnectionClosed
        pending.clear();
        count
    }

    /// Ask the connection's read loop to stop
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    pub async fn closed(&self) {
        self.closed.cancelled().await
    }
}

/// Connections keyed by station id, at most one per station
#[derive(Default)]
pub struct Connections {
    table: RwLock<HashMap<String, ConnectionHandle>>,
    next_connection_id: AtomicU64,
    next_message_id: AtomicU64,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for `station_id`, superseding and closing
    /// any connection it already had.
    ///
    /// Ids are assigned under the table lock, so a later attach for the same
    /// station always carries a larger id.
    pub async fn attach(
        &self,
        station_id: &str,
        outbound: mpsc::UnboundedSender<Bytes>,
    ) -> ConnectionHandle {
        let mut table = self.table.write().await;
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = ConnectionHandle::new(connection_id, outbound);
        if let Some(previous) = table.insert(station_id.to_string(), handle.clone()) {
            previous.close();
            warn!(
                station = station_id,
                "connection {} superseded by {}",
                previous.connection_id,
                connection_id
            );
        }
        handle
    }

    /// Remove the connection for `station_id` if it is still `connection_id`
    pub async fn detach(&self, station_id: &str, connection_id: ConnectionId) -> bool {
        let mut table = self.table.write().await;
        match table.get(station_id) {
            Some(handle) if handle.connection_id == connection_id => {
                table.remove(station_id);
                true
            }
            _ => false,
        }
    }

    pub async fn get(&self, station_id: &str) -> Option<ConnectionHandle> {
        self.table.read().await.get(station_id).cloned()
    }

    pub async fn is_connected(&self, station_id: &str) -> bool {
        self.table.read().await.contains_key(station_id)
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.len()
    }

    /// Close every connection
    pub async fn close_all(&self) {
        for handle in self.table.read().await.values() {
            handle.close();
        }
    }
}

#[async_trait]
impl CommandSender for Connections {
    async fn send(
        &self,
        station_id: &str,
        connection_id: ConnectionId,
        request: Request,
    ) -> Result<PendingResponse, CommandError> {
        let message_id = (self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1).to_string();
        let action = request.action();
        let bytes = codec::encode(&Frame::call(station_id, &message_id, request))?;

        // The read guard is held until the frame is queued, so a detach or a
        // replacing attach is ordered entirely before or after this send.
        let table = self.table.read().await;
        let handle = table
            .get(station_id)
            .filter(|h| h.connection_id == connection_id && !h.is_closed())
            .ok_or_else(|| CommandError::NotConnected(station_id.to_string()))?;

        let (tx, rx) = oneshot::channel();
        handle.pending.lock().await.insert(message_id.clone(), tx);
        if handle.outbound.send(bytes).is_err() {
            handle.pending.lock().await.remove(&message_id);
            warn!(station = station_id, action, "writer already gone");
            return Err(CommandError::ConnectionClosed(station_id.to_string()));
        }
        debug!(station = station_id, action, message_id = message_id.as_str(), "call queued");

        Ok(PendingResponse::new(station_id, message_id, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csms_shared::{
        FrameBody, GetLocalListVersionRequest, GetLocalListVersionResponse, Response,
    };

    fn request() -> Request {
        Request::GetLocalListVersion(GetLocalListVersionRequest {})
    }

    async fn attach(
        connections: &Connections,
        station_id: &str,
    ) -> (ConnectionHandle, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (connections.attach(station_id, tx).await, rx)
    }

    fn decode(bytes: Bytes) -> Frame {
        let mut buf = bytes::BytesMut::from(&bytes[..]);
        codec::decode(&mut buf).expect("decode").expect("complete frame")
    }

    #[tokio::test]
    async fn test_send_and_resolve() {
        let connections = Connections::new();
        let (conn, mut rx) = attach(&connections, "CS001").await;

        let pending = connections
            .send("CS001", conn.connection_id(), request())
            .await
            .expect("send");
        let frame = decode(rx.recv().await.expect("queued"));
        assert_eq!(frame.station_id, "CS001");
        assert_eq!(frame.message_id, pending.message_id());
        assert!(matches!(frame.body, Some(FrameBody::Call(_))));

        let reply = Ok(Response::GetLocalListVersion(GetLocalListVersionResponse {
            version_number: 4,
        }));
        assert!(conn.resolve(&frame.message_id, reply).await);
        assert!(!conn.resolve(&frame.message_id, Ok(Response::Heartbeat(Default::default()))).await);

        let reply = pending.wait().await.expect("reply");
        assert!(matches!(reply, Ok(Response::GetLocalListVersion(r)) if r.version_number == 4));
    }

    #[tokio::test]
    async fn test_message_ids_are_fresh() {
        let connections = Connections::new();
        let (conn, _rx) = attach(&connections, "CS001").await;

        let a = connections.send("CS001", conn.connection_id(), request()).await.expect("a");
        let b = connections.send("CS001", conn.connection_id(), request()).await.expect("b");
        assert_ne!(a.message_id(), b.message_id());
        assert_eq!(conn.fail_pending().await, 2);
    }

    #[tokio::test]
    async fn test_send_to_unknown_station() {
        let connections = Connections::new();
        let err = connections.send("CS404", 1, request()).await.err().expect("fails");
        assert!(matches!(err, CommandError::NotConnected(id) if id == "CS404"));
    }

    #[tokio::test]
    async fn test_superseded_connection_rejects_sends() {
        let connections = Connections::new();
        let (first, _rx1) = attach(&connections, "CS003").await;
        let (second, _rx2) = attach(&connections, "CS003").await;

        assert!(second.connection_id() > first.connection_id());
        assert!(first.is_closed());
        assert!(!second.is_closed());
        assert_eq!(connections.count().await, 1);

        let err = connections
            .send("CS003", first.connection_id(), request())
            .await
            .err()
            .expect("stale connection");
        assert!(matches!(err, CommandError::NotConnected(_)));
        assert!(connections.send("CS003", second.connection_id(), request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_stale_detach_is_ignored() {
        let connections = Connections::new();
        let (first, _rx1) = attach(&connections, "CS003").await;
        let (second, _rx2) = attach(&connections, "CS003").await;

        assert!(!connections.detach("CS003", first.connection_id()).await);
        assert!(connections.is_connected("CS003").await);
        assert!(connections.detach("CS003", second.connection_id()).await);
        assert!(!connections.is_connected("CS003").await);
    }

    #[tokio::test]
    async fn test_fail_pending_closes_waiters() {
        let connections = Connections::new();
        let (conn, _rx) = attach(&connections, "CS002").await;

        let pending = connections.send("CS002", conn.connection_id(), request()).await.expect("send");
        assert_eq!(conn.fail_pending().await, 1);
        assert!(matches!(pending.wait().await, Err(CommandError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn test_send_after_writer_dropped() {
        let connections = Connections::new();
        let (conn, rx) = attach(&connections, "CS001").await;
        drop(rx);

        let err = connections.send("CS001", conn.connection_id(), request()).await.err().expect("fails");
        assert!(matches!(err, CommandError::ConnectionClosed(_)));
        assert_eq!(conn.fail_pending().await, 0);
    }
}
