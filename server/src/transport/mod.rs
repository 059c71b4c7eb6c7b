//! Listener bootstrap
//!
//! Chooses between the plain and the mutually-authenticated transport from
//! configuration. All TLS material is loaded before the port is bound, so a
//! misconfigured server never listens in an inconsistent security state.

pub mod tcp;
pub mod tls;
pub mod traits;

pub use tcp::PlainUpgrader;
pub use tls::MutualTlsUpgrader;
pub use traits::{BoxedStream, StationStream, StreamUpgrader};

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

/// Bound listener plus the upgrade applied to every accepted connection
pub struct StationListener {
    tcp: TcpListener,
    upgrader: Arc<dyn StreamUpgrader>,
}

impl StationListener {
    /// Build the transport for `config` and bind its port
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let upgrader: Arc<dyn StreamUpgrader> = match &config.tls {
            Some(tls) => Arc::new(MutualTlsUpgrader::from_config(tls)?),
            None => Arc::new(PlainUpgrader),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
        let tcp = TcpListener::bind(addr)
            .await
            .with_context(|| format!("couldn't bind listener on {}", addr))?;
        info!("{} listener bound on {}", upgrader.name(), addr);

        Ok(Self { tcp, upgrader })
    }

    pub async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        self.tcp.accept().await
    }

    /// Shared handle to the upgrade applied to accepted connections
    pub fn upgrader(&self) -> Arc<dyn StreamUpgrader> {
        self.upgrader.clone()
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.tcp.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use crate::error::ConfigError;
    use std::path::PathBuf;

    fn free_port() -> u16 {
        let spare = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        spare.local_addr().expect("addr").port()
    }

    #[tokio::test]
    async fn test_bind_plain() {
        let config = ServerConfig {
            listen_port: 0,
            ..Default::default()
        };
        let listener = StationListener::bind(&config).await.expect("bind");
        assert_eq!(listener.upgrader().name(), "plain");
        assert_ne!(listener.local_addr().expect("addr").port(), 0);
    }

    #[tokio::test]
    async fn test_bad_tls_material_fails_before_binding() {
        let port = free_port();
        let config = ServerConfig {
            listen_port: port,
            tls: Some(TlsConfig {
                ca_certificate: Some(PathBuf::from("/nonexistent/ca.pem")),
                server_certificate: PathBuf::from("/nonexistent/server.pem"),
                server_key: PathBuf::from("/nonexistent/server.key"),
            }),
            ..Default::default()
        };

        let err = StationListener::bind(&config).await.err().expect("must fail");
        assert!(err.downcast_ref::<ConfigError>().is_some());

        // The port was never taken
        std::net::TcpListener::bind(("0.0.0.0", port)).expect("port still free");
    }
}
