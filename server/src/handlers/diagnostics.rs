//! Diagnostics handlers

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{
    LogStatusNotificationRequest, LogStatusNotificationResponse, NotifyEventRequest,
    NotifyEventResponse, Request, Response,
};
use tracing::info;

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::LogStatusNotification(req) => Ok(Response::LogStatusNotification(
            handle_log_status_notification(ctx, &req),
        )),
        Request::NotifyEvent(req) => Ok(Response::NotifyEvent(handle_notify_event(ctx, &req))),
        other => Err(not_supported(&other)),
    }
}

pub fn handle_log_status_notification(
    ctx: &HandlerContext,
    request: &LogStatusNotificationRequest,
) -> LogStatusNotificationResponse {
    info!(
        station = ctx.station(),
        "log upload status: {:?} (request {})",
        request.status(),
        request.request_id
    );
    LogStatusNotificationResponse {}
}

pub fn handle_notify_event(ctx: &HandlerContext, request: &NotifyEventRequest) -> NotifyEventResponse {
    for event in &request.event_data {
        let component = event.component.as_ref().map(|c| c.name.as_str()).unwrap_or_default();
        let variable = event.variable.as_ref().map(|v| v.name.as_str()).unwrap_or_default();
        info!(
            station = ctx.station(),
            "report part {} for event {} on {}.{}: {} = {}",
            request.seq_no,
            event.event_id,
            component,
            variable,
            event.trigger,
            event.actual_value
        );
    }
    NotifyEventResponse {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_context;
    use csms_shared::{Component, EventData, UploadLogStatus, Variable};

    #[tokio::test]
    async fn test_diagnostics_acknowledged() {
        let ctx = test_context("CS001");

        let request = Request::LogStatusNotification(LogStatusNotificationRequest {
            status: UploadLogStatus::Uploaded.into(),
            request_id: 3,
        });
        assert!(matches!(
            handle(&ctx, request).await,
            Ok(Response::LogStatusNotification(_))
        ));

        let request = Request::NotifyEvent(NotifyEventRequest {
            generated_at_ms: 1,
            seq_no: 0,
            tbc: false,
            event_data: vec![EventData {
                event_id: 1,
                trigger: "Alerting".into(),
                actual_value: "true".into(),
                component: Some(Component { name: "Connector".into() }),
                variable: Some(Variable { name: "Problem".into() }),
            }],
        });
        assert!(matches!(handle(&ctx, request).await, Ok(Response::NotifyEvent(_))));
    }
}
