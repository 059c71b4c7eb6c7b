//! Inbound request handlers, one module per feature category

mod authorization;
mod availability;
mod diagnostics;
mod firmware;
mod local_auth_list;
mod meter;
mod provisioning;
mod remote_control;
mod reservation;
mod tariff_cost;
mod transactions;

pub use authorization::handle_authorize;
pub use availability::{handle_heartbeat, handle_status_notification};
pub use diagnostics::{handle_log_status_notification, handle_notify_event};
pub use firmware::handle_firmware_status_notification;
pub use meter::handle_meter_values;
pub use provisioning::{handle_boot_notification, handle_notify_report};
pub use reservation::handle_reservation_status_update;
pub use transactions::handle_transaction_event;

use crate::engine::RequestHandler;
use crate::error::DispatchError;
use crate::session::{SessionRegistry, StationSession};
use async_trait::async_trait;
use csms_shared::{CallError, Category, Request, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// Context passed to inbound handlers
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub station_id: String,
    pub session: Arc<StationSession>,
    pub heartbeat_interval_secs: u32,
}

impl HandlerContext {
    pub fn station(&self) -> &str {
        &self.station_id
    }
}

/// Routes station calls to the handler of their category
pub struct InboundDispatcher {
    registry: Arc<SessionRegistry>,
    heartbeat_interval_secs: u32,
}

impl InboundDispatcher {
    pub fn new(registry: Arc<SessionRegistry>, heartbeat_interval_secs: u32) -> Self {
        Self {
            registry,
            heartbeat_interval_secs,
        }
    }

    /// Handle one request from `station_id` against its live session
    pub async fn dispatch(&self, station_id: &str, request: Request) -> Result<Response, DispatchError> {
        let session = self
            .registry
            .lookup(station_id)
            .await
            .ok_or_else(|| DispatchError::UnknownStation(station_id.to_string()))?;

        let ctx = HandlerContext {
            station_id: station_id.to_string(),
            session,
            heartbeat_interval_secs: self.heartbeat_interval_secs,
        };

        let category = request.category();
        debug!(station = station_id, action = request.action(), %category, "inbound request");

        match category {
            Category::Authorization => authorization::handle(&ctx, request).await,
            Category::Availability => availability::handle(&ctx, request).await,
            Category::Diagnostics => diagnostics::handle(&ctx, request).await,
            Category::Firmware => firmware::handle(&ctx, request).await,
            Category::LocalAuthList => local_auth_list::handle(&ctx, request).await,
            Category::Meter => meter::handle(&ctx, request).await,
            Category::Provisioning => provisioning::handle(&ctx, request).await,
            Category::RemoteControl => remote_control::handle(&ctx, request).await,
            Category::Reservation => reservation::handle(&ctx, request).await,
            Category::TariffCost => tariff_cost::handle(&ctx, request).await,
            Category::Transactions => transactions::handle(&ctx, request).await,
        }
    }
}

#[async_trait]
impl RequestHandler for InboundDispatcher {
    async fn handle(&self, station_id: &str, request: Request) -> Result<Response, CallError> {
        let action = request.action();
        self.dispatch(station_id, request).await.map_err(|e| {
            warn!(station = station_id, action, "{}", e);
            e.into()
        })
    }
}

/// Rejection for actions a station is not allowed to initiate
pub(crate) fn not_supported(request: &Request) -> DispatchError {
    DispatchError::NotSupported {
        action: request.action(),
    }
}

#[cfg(test)]
pub(crate) fn test_context(station_id: &str) -> HandlerContext {
    HandlerContext {
        station_id: station_id.to_string(),
        session: Arc::new(StationSession::new(station_id, 1)),
        heartbeat_interval_secs: 600,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{RoutineConfig, ScriptedSender};
    use csms_shared::{
        CostUpdatedRequest, ErrorCode, GetLocalListVersionRequest, HeartbeatRequest,
        TriggerMessageRequest,
    };
    use tokio::time::Duration;

    fn idle_routine() -> RoutineConfig {
        RoutineConfig {
            initial_delay: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    async fn dispatcher_with(station_id: &str) -> InboundDispatcher {
        let registry = Arc::new(SessionRegistry::new(
            Arc::new(ScriptedSender::accepting()),
            idle_routine(),
        ));
        registry.on_connect(station_id, 1).await;
        InboundDispatcher::new(registry, 600)
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_station() {
        let dispatcher = dispatcher_with("CS001").await;
        let err = dispatcher
            .dispatch("CS404", Request::Heartbeat(HeartbeatRequest {}))
            .await
            .err()
            .expect("unknown");
        assert_eq!(err, DispatchError::UnknownStation("CS404".into()));

        let call_error = RequestHandler::handle(&dispatcher, "CS404", Request::Heartbeat(HeartbeatRequest {}))
            .await
            .err()
            .expect("call error");
        assert_eq!(call_error.description, "unknown station CS404");
    }

    #[tokio::test(start_paused = true)]
    async fn test_known_station_is_served() {
        let dispatcher = dispatcher_with("CS001").await;
        let response = dispatcher
            .dispatch("CS001", Request::Heartbeat(HeartbeatRequest {}))
            .await
            .expect("heartbeat");
        assert!(matches!(response, Response::Heartbeat(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_initiated_actions_rejected() {
        let dispatcher = dispatcher_with("CS001").await;
        let requests = [
            Request::GetLocalListVersion(GetLocalListVersionRequest {}),
            Request::TriggerMessage(TriggerMessageRequest::default()),
            Request::CostUpdated(CostUpdatedRequest::default()),
        ];
        for request in requests {
            let action = request.action();
            let err = RequestHandler::handle(&dispatcher, "CS001", request)
                .await
                .err()
                .expect("rejected");
            assert_eq!(err.code(), ErrorCode::NotSupported, "{}", action);
        }
    }
}
