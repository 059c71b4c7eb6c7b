//! Server context wiring the engine, registry and dispatcher together

use crate::config::ServerConfig;
use crate::engine::{CentralSystem, Connections};
use crate::handlers::InboundDispatcher;
use crate::session::SessionRegistry;
use crate::transport::StationListener;
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything one server instance owns. Built once in `main`.
pub struct ServerContext {
    config: ServerConfig,
    connections: Arc<Connections>,
    registry: Arc<SessionRegistry>,
    central: Arc<CentralSystem>,
}

impl ServerContext {
    pub fn new(config: ServerConfig) -> Self {
        let connections = Arc::new(Connections::new());
        let registry = Arc::new(SessionRegistry::new(
            connections.clone(),
            config.routine.clone(),
        ));
        let dispatcher = Arc::new(InboundDispatcher::new(
            registry.clone(),
            config.heartbeat_interval_secs,
        ));
        let central = Arc::new(CentralSystem::new(
            connections.clone(),
            registry.clone(),
            dispatcher,
        ));

        Self {
            config,
            connections,
            registry,
            central,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn connections(&self) -> &Arc<Connections> {
        &self.connections
    }

    /// Bind the configured listener and serve until `shutdown` fires
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let listener = StationListener::bind(&self.config).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve stations on an already bound listener
    pub async fn serve(&self, listener: StationListener, shutdown: CancellationToken) -> Result<()> {
        let result = self.central.clone().run(listener, shutdown).await;
        self.registry.shutdown().await;
        info!("all sessions closed");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{reply_for, RoutineConfig};
    use crate::engine::FrameReader;
    use crate::error::ConfigError;
    use csms_shared::{
        codec, BootNotificationRequest, BootReason, ChargingStation, Frame, FrameBody,
        RegistrationStatus, Request, Response,
    };
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::time::{sleep, timeout, Duration};

    fn test_config() -> ServerConfig {
        ServerConfig {
            listen_port: 0,
            heartbeat_interval_secs: 30,
            routine: RoutineConfig {
                initial_delay: Duration::from_millis(20),
                step_interval: Duration::from_millis(20),
                reservation_hold: Duration::from_millis(20),
                command_timeout: Some(Duration::from_secs(5)),
            },
            ..Default::default()
        }
    }

    async fn wait_for<F, Fut>(mut check: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        timeout(Duration::from_secs(5), async {
            while !check().await {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition reached in time");
    }

    #[tokio::test]
    async fn test_station_end_to_end() {
        let context = Arc::new(ServerContext::new(test_config()));
        let listener = StationListener::bind(context.config()).await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let shutdown = CancellationToken::new();

        let server = {
            let context = context.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move { context.serve(listener, shutdown).await })
        };

        let stream = TcpStream::connect(("127.0.0.1", port)).await.expect("connect");
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = FrameReader::new(read_half, "server");

        let boot = Frame::call(
            "CS001",
            "boot-1",
            Request::BootNotification(BootNotificationRequest {
                reason: BootReason::PowerUp.into(),
                charging_station: Some(ChargingStation {
                    model: "Wallbox".into(),
                    vendor_name: "Acme".into(),
                    firmware_version: "1.0".into(),
                }),
            }),
        );
        write_half
            .write_all(&codec::encode(&boot).expect("encode"))
            .await
            .expect("write");

        let mut actions = Vec::new();
        let mut booted = false;
        while actions.len() < 6 {
            let frame = timeout(Duration::from_secs(5), reader.recv())
                .await
                .expect("frame in time")
                .expect("connection open");
            match frame.body {
                Some(FrameBody::CallResult(result)) => {
                    assert_eq!(frame.message_id, "boot-1");
                    match result.response {
                        Some(Response::BootNotification(res)) => {
                            assert_eq!(res.status(), RegistrationStatus::Accepted);
                            assert_eq!(res.interval, 30);
                            booted = true;
                        }
                        other => panic!("unexpected result {:?}", other),
                    }
                }
                Some(FrameBody::Call(call)) => {
                    let request = call.request.expect("request");
                    actions.push(request.action());
                    let reply = Frame::result("CS001", frame.message_id, reply_for(&request, true));
                    write_half
                        .write_all(&codec::encode(&reply).expect("encode"))
                        .await
                        .expect("write");
                }
                other => panic!("unexpected frame {:?}", other),
            }
        }

        assert!(booted);
        assert_eq!(
            actions,
            [
                "ReserveNow",
                "CancelReservation",
                "GetLocalListVersion",
                "SetVariables",
                "TriggerMessage",
                "TriggerMessage"
            ]
        );

        let session = context.registry().lookup("CS001").await.expect("registered");
        wait_for(|| {
            let session = session.clone();
            async move {
                let version = session.state().await.local_list_version;
                version == Some(3)
            }
        })
        .await;
        {
            let state = session.state().await;
            assert!(state.connector(1).expect("connector 1").reservation.is_none());
            assert_eq!(state.boot_info.as_ref().map(|b| b.vendor_name.as_str()), Some("Acme"));
        }

        drop(write_half);
        drop(reader);
        let registry = context.registry().clone();
        wait_for(|| {
            let registry = registry.clone();
            async move { registry.count().await == 0 }
        })
        .await;
        assert!(!context.connections().is_connected("CS001").await);

        shutdown.cancel();
        server.await.expect("join").expect("clean shutdown");
    }

    #[tokio::test]
    async fn test_tls_without_certificate_never_listens() {
        let mut config = test_config();
        config.tls = Some(crate::config::TlsConfig {
            ca_certificate: None,
            server_certificate: "/nonexistent/server.pem".into(),
            server_key: "/nonexistent/server.key".into(),
        });
        let context = ServerContext::new(config);

        let err = context
            .run(CancellationToken::new())
            .await
            .err()
            .expect("fatal");
        assert!(err.downcast_ref::<ConfigError>().is_some());
        assert_eq!(context.registry().count().await, 0);
    }
}
