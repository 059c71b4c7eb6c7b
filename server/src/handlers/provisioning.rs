//! Provisioning handlers

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{
    now_ms, BootNotificationRequest, BootNotificationResponse, NotifyReportRequest,
    NotifyReportResponse, RegistrationStatus, Request, Response,
};
use tracing::info;

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::BootNotification(req) => Ok(Response::BootNotification(
            handle_boot_notification(ctx, req).await,
        )),
        Request::NotifyReport(req) => Ok(Response::NotifyReport(handle_notify_report(ctx, &req))),
        other => Err(not_supported(&other)),
    }
}

/// Handle BootNotification. Stations are always accepted and told the
/// configured heartbeat interval.
pub async fn handle_boot_notification(
    ctx: &HandlerContext,
    request: BootNotificationRequest,
) -> BootNotificationResponse {
    let reason = request.reason();
    if let Some(station) = &request.charging_station {
        info!(
            station = ctx.station(),
            "boot confirmed for {} {} (firmware {}, reason {:?})",
            station.vendor_name,
            station.model,
            station.firmware_version,
            reason
        );
    } else {
        info!(station = ctx.station(), "boot confirmed (reason {:?})", reason);
    }
    ctx.session.state_mut().await.boot_info = request.charging_station;

    BootNotificationResponse {
        current_time_ms: now_ms(),
        interval: ctx.heartbeat_interval_secs,
        status: RegistrationStatus::Accepted.into(),
    }
}

pub fn handle_notify_report(ctx: &HandlerContext, request: &NotifyReportRequest) -> NotifyReportResponse {
    info!(
        station = ctx.station(),
        "report {} part {} received{}",
        request.request_id,
        request.seq_no,
        if request.tbc { ", more to follow" } else { "" }
    );
    NotifyReportResponse {}
}
