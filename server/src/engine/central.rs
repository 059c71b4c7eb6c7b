//! Accept loop and per-connection frame processing

use super::connection::{write_frames, FrameReader};
use super::outbound::{ConnectionHandle, Connections};
use super::{ConnectionObserver, RequestHandler};
use crate::transport::StationListener;
use csms_shared::{CallError, ErrorCode, Frame, FrameBody};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Server side of the protocol: accepts stations and routes their frames
pub struct CentralSystem {
    connections: Arc<Connections>,
    observer: Arc<dyn ConnectionObserver>,
    handler: Arc<dyn RequestHandler>,
}

impl CentralSystem {
    pub fn new(
        connections: Arc<Connections>,
        observer: Arc<dyn ConnectionObserver>,
        handler: Arc<dyn RequestHandler>,
    ) -> Self {
        Self {
            connections,
            observer,
            handler,
        }
    }

    pub fn connections(&self) -> &Arc<Connections> {
        &self.connections
    }

    /// Accept stations until `shutdown` fires or the listener fails
    pub async fn run(
        self: Arc<Self>,
        listener: StationListener,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        let upgrader = listener.upgrader();

        loop {
            let (tcp, addr) = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => accepted?,
            };
            debug!(peer = %addr, "accepted connection");

            let central = self.clone();
            let upgrader = upgrader.clone();
            tokio::spawn(async move {
                match upgrader.upgrade(tcp).await {
                    Ok(stream) => central.serve_stream(stream, addr.to_string()).await,
                    Err(e) => warn!(peer = %addr, "{} handshake failed: {:#}", upgrader.name(), e),
                }
            });
        }

        self.connections.close_all().await;
        Ok(())
    }

    /// Serve one station over an established stream until it closes or is
    /// superseded by a newer connection for the same station.
    pub async fn serve_stream<S>(&self, stream: S, peer: String)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = FrameReader::new(read_half, peer.clone());

        let Some(first) = reader.recv().await else {
            debug!(peer = peer.as_str(), "closed before identifying itself");
            return;
        };
        if first.station_id.is_empty() {
            warn!(peer = peer.as_str(), "first frame carries no station id");
            return;
        }
        let station_id = first.station_id.clone();

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_frames(write_half, rx, peer.clone()));
        let handle = self.connections.attach(&station_id, tx).await;
        let connection_id = handle.connection_id();

        info!(
            station = station_id.as_str(),
            connection_id,
            peer = peer.as_str(),
            "new charging station connected"
        );
        self.observer.connected(&station_id, connection_id).await;

        self.process(&handle, &station_id, first).await;
        loop {
            let frame = tokio::select! {
                biased;
                _ = handle.closed() => break,
                frame = reader.recv() => match frame {
                    Some(frame) => frame,
                    None => break,
                },
            };
            self.process(&handle, &station_id, frame).await;
        }

        self.connections.detach(&station_id, connection_id).await;
        let failed = handle.fail_pending().await;
        info!(
            station = station_id.as_str(),
            connection_id,
            failed,
            "charging station disconnected"
        );
        self.observer.disconnected(&station_id, connection_id).await;
    }

    async fn process(&self, handle: &ConnectionHandle, station_id: &str, frame: Frame) {
        let Frame {
            station_id: claimed,
            message_id,
            body,
            ..
        } = frame;

        if claimed != station_id {
            warn!(station = station_id, claimed = claimed.as_str(), "station id mismatch");
            if matches!(body, Some(FrameBody::Call(_))) {
                let reply = Frame::error(
                    station_id,
                    &message_id,
                    CallError::new(ErrorCode::SecurityError, "station id does not match connection"),
                );
                if let Err(e) = handle.send_frame(&reply) {
                    warn!(station = station_id, "couldn't send reply: {}", e);
                }
            }
            return;
        }

        match body {
            Some(FrameBody::Call(call)) => {
                let reply = match call.request {
                    Some(request) => match self.handler.handle(station_id, request).await {
                        Ok(response) => Frame::result(station_id, &message_id, response),
                        Err(error) => Frame::error(station_id, &message_id, error),
                    },
                    None => Frame::error(
                        station_id,
                        &message_id,
                        CallError::new(ErrorCode::FormationViolation, "call without payload"),
                    ),
                };
                if let Err(e) = handle.send_frame(&reply) {
                    warn!(station = station_id, "couldn't send reply: {}", e);
                }
            }
            Some(FrameBody::CallResult(result)) => {
                let reply = result.response.ok_or_else(|| {
                    CallError::new(ErrorCode::FormationViolation, "result without payload")
                });
                if !handle.resolve(&message_id, reply).await {
                    warn!(station = station_id, message_id = message_id.as_str(), "unsolicited call result");
                }
            }
            Some(FrameBody::CallError(error)) => {
                if !handle.resolve(&message_id, Err(error)).await {
                    warn!(station = station_id, message_id = message_id.as_str(), "unsolicited call error");
                }
            }
            None => warn!(station = station_id, message_id = message_id.as_str(), "empty frame dropped"),
        }
    }
}
