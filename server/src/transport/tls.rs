//! Mutually-authenticated TLS transport
//!
//! The server presents its certificate chain and requires every station to
//! present a client certificate that chains to the configured CA bundle, or
//! to the platform trust store when no bundle is configured.

use crate::config::TlsConfig;
use crate::error::ConfigError;
use crate::transport::traits::{BoxedStream, StreamUpgrader};
use anyhow::Result;
use async_trait::async_trait;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

/// Performs the TLS handshake on accepted connections
pub struct MutualTlsUpgrader {
    acceptor: TlsAcceptor,
}

impl MutualTlsUpgrader {
    /// Load all key material up front; any failure is a configuration error
    pub fn from_config(config: &TlsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            acceptor: build_acceptor(config)?,
        })
    }
}

#[async_trait]
impl StreamUpgrader for MutualTlsUpgrader {
    async fn upgrade(&self, stream: TcpStream) -> Result<BoxedStream> {
        stream.set_nodelay(true)?;
        let tls = self.acceptor.accept(stream).await?;
        Ok(Box::new(tls))
    }

    fn name(&self) -> &'static str {
        "mutual-tls"
    }
}

fn build_acceptor(config: &TlsConfig) -> Result<TlsAcceptor, ConfigError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let roots = trust_pool(config.ca_certificate.as_deref())?;
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
        .build()
        .map_err(|e| ConfigError::Tls(e.to_string()))?;

    let chain = load_certs(&config.server_certificate, "server certificate")?;
    let key = load_key(&config.server_key)?;

    let server_config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ConfigError::Tls(e.to_string()))?
        .with_client_cert_verifier(verifier)
        .with_single_cert(chain, key)
        .map_err(|e| ConfigError::Tls(e.to_string()))?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

fn trust_pool(ca_certificate: Option<&Path>) -> Result<RootCertStore, ConfigError> {
    let mut roots = RootCertStore::empty();

    match ca_certificate {
        Some(path) => {
            for cert in load_certs(path, "CA certificate")? {
                roots
                    .add(cert)
                    .map_err(|e| ConfigError::Tls(format!("add CA certificate: {e}")))?;
            }
            info!("loaded {} CA certificate(s) from {}", roots.len(), path.display());
        }
        None => {
            let native = rustls_native_certs::load_native_certs();
            for err in &native.errors {
                warn!("error loading system CA certificate: {}", err);
            }
            if native.certs.is_empty() {
                return Err(ConfigError::SystemTrustStore(
                    "no certificates found in the platform trust store".into(),
                ));
            }
            let (added, ignored) = roots.add_parsable_certificates(native.certs);
            debug!("system CA pool: {} added, {} ignored", added, ignored);
        }
    }

    Ok(roots)
}

fn load_certs(path: &Path, what: &'static str) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let io_err = |source| ConfigError::Io {
        what,
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(io_err)?);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;

    if certs.is_empty() {
        return Err(ConfigError::EmptyPem {
            what,
            path: path.to_path_buf(),
        });
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, ConfigError> {
    let what = "server certificate key";
    let io_err = |source| ConfigError::Io {
        what,
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(io_err)?);
    rustls_pemfile::private_key(&mut reader)
        .map_err(io_err)?
        .ok_or_else(|| ConfigError::EmptyPem {
            what,
            path: path.to_path_buf(),
        })
}
