//! Error types for the server

use csms_shared::codec::CodecError;
use csms_shared::{CallError, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

/// Invalid or missing startup material. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no required {0} found")]
    MissingVariable(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("couldn't read {what} from {path}: {source}")]
    Io {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {what} found in {path}")]
    EmptyPem { what: &'static str, path: PathBuf },

    #[error("couldn't get system CA pool: {0}")]
    SystemTrustStore(String),

    #[error("invalid TLS configuration: {0}")]
    Tls(String),
}

/// Failure of an outbound command before a response was received.
///
/// Every variant is a transport-level failure: the orchestrator aborts the
/// remaining workflow of that station when it sees one.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("station {0} is not connected")]
    NotConnected(String),

    #[error("connection to station {0} closed before a response arrived")]
    ConnectionClosed(String),

    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),

    #[error("couldn't encode request: {0}")]
    Codec(#[from] CodecError),
}

/// Failure of an inbound request; answered with a call error frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("unknown station {0}")]
    UnknownStation(String),

    #[error("{action} is not supported from stations")]
    NotSupported { action: &'static str },

    #[error("malformed {action}: {reason}")]
    Malformed { action: &'static str, reason: String },
}

impl From<DispatchError> for CallError {
    fn from(err: DispatchError) -> Self {
        let code = match err {
            DispatchError::UnknownStation(_) => ErrorCode::GenericError,
            DispatchError::NotSupported { .. } => ErrorCode::NotSupported,
            DispatchError::Malformed { .. } => ErrorCode::FormationViolation,
        };
        CallError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_to_call_error() {
        let err: CallError = DispatchError::UnknownStation("CS009".into()).into();
        assert_eq!(err.code(), ErrorCode::GenericError);
        assert_eq!(err.description, "unknown station CS009");

        let err: CallError = DispatchError::NotSupported {
            action: "ReserveNow",
        }
        .into();
        assert_eq!(err.code(), ErrorCode::NotSupported);

        let err: CallError = DispatchError::Malformed {
            action: "TransactionEvent",
            reason: "missing transaction info".into(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::FormationViolation);
        assert_eq!(err.description, "malformed TransactionEvent: missing transaction info");
    }

    #[test]
    fn test_missing_variable_message() {
        let err = ConfigError::MissingVariable("SERVER_CERTIFICATE_PATH");
        assert_eq!(err.to_string(), "no required SERVER_CERTIFICATE_PATH found");
    }
}
