//! Heartbeat and connector status handlers

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{
    now_ms, HeartbeatRequest, HeartbeatResponse, Request, Response, StatusNotificationRequest,
    StatusNotificationResponse,
};
use tracing::info;

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::Heartbeat(req) => Ok(Response::Heartbeat(handle_heartbeat(ctx, &req).await)),
        Request::StatusNotification(req) => Ok(Response::StatusNotification(
            handle_status_notification(ctx, &req).await,
        )),
        other => Err(not_supported(&other)),
    }
}

pub async fn handle_heartbeat(ctx: &HandlerContext, _request: &HeartbeatRequest) -> HeartbeatResponse {
    let now = now_ms();
    ctx.session.state_mut().await.last_heartbeat_ms = Some(now);
    info!(station = ctx.station(), "heartbeat handled");

    HeartbeatResponse { current_time_ms: now }
}

pub async fn handle_status_notification(
    ctx: &HandlerContext,
    request: &StatusNotificationRequest,
) -> StatusNotificationResponse {
    let status = request.connector_status();
    ctx.session
        .state_mut()
        .await
        .set_connector_status(request.connector_id, status);
    info!(
        station = ctx.station(),
        "updated connector {} status to {:?}",
        request.connector_id,
        status
    );
    StatusNotificationResponse {}
}
