//! Firmware handler

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{
    FirmwareStatusNotificationRequest, FirmwareStatusNotificationResponse, Request, Response,
};
use tracing::info;

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::FirmwareStatusNotification(req) => Ok(Response::FirmwareStatusNotification(
            handle_firmware_status_notification(ctx, &req).await,
        )),
        other => Err(not_supported(&other)),
    }
}

pub async fn handle_firmware_status_notification(
    ctx: &HandlerContext,
    request: &FirmwareStatusNotificationRequest,
) -> FirmwareStatusNotificationResponse {
    let status = request.status();
    ctx.session.state_mut().await.firmware_status = Some(status);
    info!(station = ctx.station(), "updated firmware status to {:?}", status);
    FirmwareStatusNotificationResponse {}
}
