//! Shared protocol types for the charging station management server
//!
//! This crate provides the protocol messages and codec used between charging
//! stations and the central server.

pub mod codec;
pub mod proto;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

// Re-export commonly used types at crate root
pub use proto::*;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Protocol defaults shared by stations and the server
pub mod defaults {
    /// Default TCP port the server listens on
    pub const LISTEN_PORT: u16 = 8887;

    /// Heartbeat interval handed to stations on boot, in seconds
    pub const HEARTBEAT_INTERVAL_SECS: u32 = 600;
}

/// Feature category an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Authorization,
    Availability,
    Diagnostics,
    Firmware,
    LocalAuthList,
    Meter,
    Provisioning,
    RemoteControl,
    Reservation,
    TariffCost,
    Transactions,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Authorization => "authorization",
            Category::Availability => "availability",
            Category::Diagnostics => "diagnostics",
            Category::Firmware => "firmware",
            Category::LocalAuthList => "local-auth-list",
            Category::Meter => "meter",
            Category::Provisioning => "provisioning",
            Category::RemoteControl => "remote-control",
            Category::Reservation => "reservation",
            Category::TariffCost => "tariff-cost",
            Category::Transactions => "transactions",
        };
        f.write_str(name)
    }
}

impl Request {
    /// Action name as it appears in logs
    pub fn action(&self) -> &'static str {
        match self {
            Request::ReserveNow(_) => "ReserveNow",
            Request::CancelReservation(_) => "CancelReservation",
            Request::GetLocalListVersion(_) => "GetLocalListVersion",
            Request::SetVariables(_) => "SetVariables",
            Request::TriggerMessage(_) => "TriggerMessage",
            Request::CostUpdated(_) => "CostUpdated",
            Request::Authorize(_) => "Authorize",
            Request::Heartbeat(_) => "Heartbeat",
            Request::StatusNotification(_) => "StatusNotification",
            Request::LogStatusNotification(_) => "LogStatusNotification",
            Request::NotifyEvent(_) => "NotifyEvent",
            Request::FirmwareStatusNotification(_) => "FirmwareStatusNotification",
            Request::MeterValues(_) => "MeterValues",
            Request::BootNotification(_) => "BootNotification",
            Request::NotifyReport(_) => "NotifyReport",
            Request::ReservationStatusUpdate(_) => "ReservationStatusUpdate",
            Request::TransactionEvent(_) => "TransactionEvent",
        }
    }

    /// Feature category of this action
    pub fn category(&self) -> Category {
        match self {
            Request::ReserveNow(_)
            | Request::CancelReservation(_)
            | Request::ReservationStatusUpdate(_) => Category::Reservation,
            Request::GetLocalListVersion(_) => Category::LocalAuthList,
            Request::SetVariables(_)
            | Request::BootNotification(_)
            | Request::NotifyReport(_) => Category::Provisioning,
            Request::TriggerMessage(_) => Category::RemoteControl,
            Request::CostUpdated(_) => Category::TariffCost,
            Request::Authorize(_) => Category::Authorization,
            Request::Heartbeat(_) | Request::StatusNotification(_) => Category::Availability,
            Request::LogStatusNotification(_) | Request::NotifyEvent(_) => Category::Diagnostics,
            Request::FirmwareStatusNotification(_) => Category::Firmware,
            Request::MeterValues(_) => Category::Meter,
            Request::TransactionEvent(_) => Category::Transactions,
        }
    }
}

impl Response {
    /// Action name of the request this response answers
    pub fn action(&self) -> &'static str {
        match self {
            Response::ReserveNow(_) => "ReserveNow",
            Response::CancelReservation(_) => "CancelReservation",
            Response::GetLocalListVersion(_) => "GetLocalListVersion",
            Response::SetVariables(_) => "SetVariables",
            Response::TriggerMessage(_) => "TriggerMessage",
            Response::CostUpdated(_) => "CostUpdated",
            Response::Authorize(_) => "Authorize",
            Response::Heartbeat(_) => "Heartbeat",
            Response::StatusNotification(_) => "StatusNotification",
            Response::LogStatusNotification(_) => "LogStatusNotification",
            Response::NotifyEvent(_) => "NotifyEvent",
            Response::FirmwareStatusNotification(_) => "FirmwareStatusNotification",
            Response::MeterValues(_) => "MeterValues",
            Response::BootNotification(_) => "BootNotification",
            Response::NotifyReport(_) => "NotifyReport",
            Response::ReservationStatusUpdate(_) => "ReservationStatusUpdate",
            Response::TransactionEvent(_) => "TransactionEvent",
        }
    }
}

/// Builder helpers for creating frames
impl Frame {
    /// Create a call frame
    pub fn call(
        station_id: impl Into<String>,
        message_id: impl Into<String>,
        request: Request,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            message_id: message_id.into(),
            timestamp_ms: now_ms(),
            body: Some(FrameBody::Call(Call {
                request: Some(request),
            })),
        }
    }

    /// Create a call result frame answering `message_id`
    pub fn result(
        station_id: impl Into<String>,
        message_id: impl Into<String>,
        response: Response,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            message_id: message_id.into(),
            timestamp_ms: now_ms(),
            body: Some(FrameBody::CallResult(CallResult {
                response: Some(response),
            })),
        }
    }

    /// Create a call error frame answering `message_id`
    pub fn error(
        station_id: impl Into<String>,
        message_id: impl Into<String>,
        error: CallError,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            message_id: message_id.into(),
            timestamp_ms: now_ms(),
            body: Some(FrameBody::CallError(error)),
        }
    }
}

impl CallError {
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code(), self.description)
    }
}

impl IdToken {
    pub fn new(id_token: impl Into<String>, kind: IdTokenType) -> Self {
        Self {
            id_token: id_token.into(),
            kind: kind.into(),
        }
    }
}

impl IdTokenInfo {
    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            status: status.into(),
        }
    }
}

impl SetVariableData {
    /// Target value for `component.variable`
    pub fn target(component: &str, variable: &str, value: impl Into<String>) -> Self {
        Self {
            attribute_type: AttributeType::Target.into(),
            attribute_value: value.into(),
            component: Some(Component {
                name: component.into(),
            }),
            variable: Some(Variable {
                name: variable.into(),
            }),
        }
    }
}

impl SetVariableResult {
    pub fn component_name(&self) -> &str {
        self.component.as_ref().map(|c| c.name.as_str()).unwrap_or_default()
    }

    pub fn variable_name(&self) -> &str {
        self.variable.as_ref().map(|v| v.name.as_str()).unwrap_or_default()
    }
}
