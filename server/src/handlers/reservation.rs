//! Reservation handler

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{
    Request, ReservationStatusUpdateRequest, ReservationStatusUpdateResponse, Response,
};
use tracing::{info, warn};

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::ReservationStatusUpdate(req) => Ok(Response::ReservationStatusUpdate(
            handle_reservation_status_update(ctx, &req).await,
        )),
        // ReserveNow and CancelReservation are only ever sent by the server
        other => Err(not_supported(&other)),
    }
}

/// Handle ReservationStatusUpdate. Both expiry and removal end the reservation.
pub async fn handle_reservation_status_update(
    ctx: &HandlerContext,
    request: &ReservationStatusUpdateRequest,
) -> ReservationStatusUpdateResponse {
    let status = request.status();
    match ctx.session.state_mut().await.cancel_reservation(request.reservation_id) {
        Some(reservation) => info!(
            station = ctx.station(),
            "reservation {} on connector {} ended: {:?}",
            reservation.id,
            reservation.connector_id,
            status
        ),
        None => warn!(
            station = ctx.station(),
            "status {:?} for unknown reservation {}",
            status,
            request.reservation_id
        ),
    }
    ReservationStatusUpdateResponse {}
}
