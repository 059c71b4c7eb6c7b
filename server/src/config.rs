//! Process configuration sourced from the environment

use crate::command::RoutineConfig;
use crate::error::ConfigError;
use csms_shared::defaults;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_SERVER_PORT: &str = "SERVER_LISTEN_PORT";
pub const ENV_TLS: &str = "TLS_ENABLED";
pub const ENV_CA_CERTIFICATE: &str = "CA_CERTIFICATE_PATH";
pub const ENV_SERVER_CERTIFICATE: &str = "SERVER_CERTIFICATE_PATH";
pub const ENV_SERVER_CERTIFICATE_KEY: &str = "SERVER_CERTIFICATE_KEY_PATH";
pub const ENV_HEARTBEAT_INTERVAL: &str = "HEARTBEAT_INTERVAL_SECS";
pub const ENV_ROUTINE_INITIAL_DELAY: &str = "ROUTINE_INITIAL_DELAY_MS";
pub const ENV_ROUTINE_STEP_INTERVAL: &str = "ROUTINE_STEP_INTERVAL_MS";
pub const ENV_ROUTINE_RESERVATION_HOLD: &str = "ROUTINE_RESERVATION_HOLD_MS";
pub const ENV_COMMAND_TIMEOUT: &str = "COMMAND_TIMEOUT_MS";

/// Material for the mutually-authenticated listener
#[derive(Debug, Clone, PartialEq)]
pub struct TlsConfig {
    /// Client CA bundle; the platform trust store is used when unset
    pub ca_certificate: Option<PathBuf>,
    pub server_certificate: PathBuf,
    pub server_key: PathBuf,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_port: u16,
    /// `None` selects the plain listener
    pub tls: Option<TlsConfig>,
    /// Heartbeat interval returned to booting stations, in seconds
    pub heartbeat_interval_secs: u32,
    pub routine: RoutineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: defaults::LISTEN_PORT,
            tls: None,
            heartbeat_interval_secs: defaults::HEARTBEAT_INTERVAL_SECS,
            routine: RoutineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(ENV_SERVER_PORT).and_then(|p| p.trim().parse::<u16>().ok()) {
            Some(port) => config.listen_port = port,
            None => warn!(
                "no valid {} environment variable found, using default port {}",
                ENV_SERVER_PORT, config.listen_port
            ),
        }

        let tls_enabled = lookup(ENV_TLS)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        if tls_enabled {
            config.tls = Some(tls_from_lookup(&lookup)?);
        }

        if let Some(secs) = parse_number::<u32, _>(&lookup, ENV_HEARTBEAT_INTERVAL)? {
            config.heartbeat_interval_secs = secs;
        }
        if let Some(ms) = parse_number::<u64, _>(&lookup, ENV_ROUTINE_INITIAL_DELAY)? {
            config.routine.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number::<u64, _>(&lookup, ENV_ROUTINE_STEP_INTERVAL)? {
            config.routine.step_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number::<u64, _>(&lookup, ENV_ROUTINE_RESERVATION_HOLD)? {
            config.routine.reservation_hold = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number::<u64, _>(&lookup, ENV_COMMAND_TIMEOUT)? {
            config.routine.command_timeout = Some(Duration::from_millis(ms));
        }

        Ok(config)
    }
}

fn tls_from_lookup<F>(lookup: &F) -> Result<TlsConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let ca_certificate = lookup(ENV_CA_CERTIFICATE).map(PathBuf::from);
    if ca_certificate.is_none() {
        info!("no {} found, using system CA pool", ENV_CA_CERTIFICATE);
    }
    let server_certificate = lookup(ENV_SERVER_CERTIFICATE)
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingVariable(ENV_SERVER_CERTIFICATE))?;
    let server_key = lookup(ENV_SERVER_CERTIFICATE_KEY)
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingVariable(ENV_SERVER_CERTIFICATE_KEY))?;

    Ok(TlsConfig {
        ca_certificate,
        server_certificate,
        server_key,
    })
}

fn parse_number<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

/// Anything other than a truthy spelling is false
fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "t" | "T" | "true" | "TRUE" | "True")
}
