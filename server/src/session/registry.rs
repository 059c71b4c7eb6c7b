//! Session registry for tracking all connected stations

use super::state::StationSession;
use crate::command::{CommandSender, Orchestrator, RoutineConfig, RoutineOutcome};
use crate::engine::{ConnectionId, ConnectionObserver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Maps station ids to their live session and command routine
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    sender: Arc<dyn CommandSender>,
    routine: RoutineConfig,
}

struct SessionEntry {
    session: Arc<StationSession>,
    cancel: CancellationToken,
    routine: JoinHandle<RoutineOutcome>,
}

impl SessionEntry {
    /// Stop the routine without waiting for it
    fn stop(&self) {
        self.cancel.cancel();
        self.routine.abort();
    }
}

impl SessionRegistry {
    pub fn new(sender: Arc<dyn CommandSender>, routine: RoutineConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            sender,
            routine,
        }
    }

    /// Register a freshly connected station and start its command routine.
    ///
    /// An existing session for the same id is torn down first and its
    /// routine is guaranteed to have finished before the new one issues
    /// anything. A connect older than the registered session is ignored.
    pub async fn on_connect(&self, station_id: &str, connection_id: ConnectionId) -> Arc<StationSession> {
        let mut sessions = self.sessions.write().await;

        let previous = match sessions.remove(station_id) {
            Some(existing) if existing.session.connection_id() > connection_id => {
                warn!(
                    station = station_id,
                    connection_id,
                    "ignoring connect from superseded connection"
                );
                let session = existing.session.clone();
                sessions.insert(station_id.to_string(), existing);
                return session;
            }
            Some(existing) => {
                warn!(station = station_id, "station already connected, replacing session");
                existing.stop();
                info!(
                    station = station_id,
                    connection_id = existing.session.connection_id(),
                    "charging station disconnected"
                );
                Some(existing.routine)
            }
            None => None,
        };

        let session = Arc::new(StationSession::new(station_id, connection_id));
        let cancel = CancellationToken::new();
        let orchestrator = Orchestrator::new(
            self.sender.clone(),
            session.clone(),
            self.routine.clone(),
            cancel.clone(),
        );
        let routine = tokio::spawn(async move {
            if let Some(previous) = previous {
                // Aborted routines resolve with a JoinError
                let _ = previous.await;
            }
            orchestrator.run().await
        });

        sessions.insert(
            station_id.to_string(),
            SessionEntry {
                session: session.clone(),
                cancel,
                routine,
            },
        );
        info!(station = station_id, connection_id, "session registered");
        session
    }

    /// Drop the session of a closed connection and stop its routine.
    ///
    /// Returns false when the station is unknown or already belongs to a
    /// newer connection.
    pub async fn on_disconnect(&self, station_id: &str, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(station_id)
            .is_some_and(|e| e.session.connection_id() == connection_id);
        if !current {
            debug!(station = station_id, connection_id, "no session for this connection");
            return false;
        }

        let Some(entry) = sessions.remove(station_id) else {
            return false;
        };
        drop(sessions);

        entry.stop();
        info!(station = station_id, connection_id, "session removed");
        true
    }

    /// Get the live session for a station
    pub async fn lookup(&self, station_id: &str) -> Option<Arc<StationSession>> {
        self.sessions
            .read()
            .await
            .get(station_id)
            .map(|e| e.session.clone())
    }

    /// Get list of all connected station ids
    pub async fn connected_stations(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Get the number of connected stations
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop every routine and forget all sessions
    pub async fn shutdown(&self) {
        let drained: Vec<(String, SessionEntry)> = self.sessions.write().await.drain().collect();
        for (station_id, entry) in drained {
            entry.stop();
            let _ = entry.routine.await;
            debug!(station = station_id.as_str(), "routine stopped");
        }
    }
}

#[async_trait]
impl ConnectionObserver for SessionRegistry {
    async fn connected(&self, station_id: &str, connection_id: ConnectionId) {
        self.on_connect(station_id, connection_id).await;
    }

    async fn disconnected(&self, station_id: &str, connection_id: ConnectionId) {
        self.on_disconnect(station_id, connection_id).await;
    }
}
