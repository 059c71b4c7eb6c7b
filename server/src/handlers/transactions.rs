//! Transaction event handler

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use crate::session::TransactionState;
use csms_shared::{
    AuthorizationStatus, IdTokenInfo, Request, Response, TransactionEventRequest,
    TransactionEventResponse, TransactionEventType,
};
use tracing::{info, warn};

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::TransactionEvent(req) => {
            handle_transaction_event(ctx, req).await.map(Response::TransactionEvent)
        }
        other => Err(not_supported(&other)),
    }
}

/// Handle TransactionEvent.
///
/// Started inserts the transaction unless the id is already known and
/// consumes the reservation it references. Updated refreshes the charging
/// state. Ended removes the transaction and frees its connector. Meter
/// values carried by any event are appended to the transaction.
pub async fn handle_transaction_event(
    ctx: &HandlerContext,
    request: TransactionEventRequest,
) -> Result<TransactionEventResponse, DispatchError> {
    let event_type = request.event_type();
    let tx_info = request.transaction_info.as_ref().ok_or_else(|| DispatchError::Malformed {
        action: "TransactionEvent",
        reason: "missing transaction info".into(),
    })?;
    let transaction_id = tx_info.transaction_id.clone();
    let charging_state = tx_info.charging_state();

    let mut state = ctx.session.state_mut().await;
    match event_type {
        TransactionEventType::Started => {
            if let Some(reservation_id) = request.reservation_id {
                match state.cancel_reservation(reservation_id) {
                    Some(_) => info!(station = ctx.station(), "reservation {} consumed", reservation_id),
                    None => warn!(station = ctx.station(), "reservation {} not held", reservation_id),
                }
            }

            let mut transaction =
                TransactionState::new(&transaction_id, request.connector_id, request.timestamp_ms);
            transaction.status = charging_state;
            transaction.meter_values = request.meter_value;
            if state.start_transaction(transaction) {
                info!(
                    station = ctx.station(),
                    "transaction {} started on connector {}",
                    transaction_id,
                    request.connector_id
                );
            } else {
                warn!(station = ctx.station(), "transaction {} already started", transaction_id);
            }
        }
        TransactionEventType::Updated => match state.transaction_mut(&transaction_id) {
            Some(transaction) => {
                transaction.status = charging_state;
                transaction.meter_values.extend(request.meter_value);
                info!(
                    station = ctx.station(),
                    "transaction {} updated: {:?}",
                    transaction_id,
                    charging_state
                );
            }
            None => warn!(station = ctx.station(), "update for unknown transaction {}", transaction_id),
        },
        TransactionEventType::Ended => {
            if let Some(transaction) = state.transaction_mut(&transaction_id) {
                transaction.meter_values.extend(request.meter_value);
            }
            match state.end_transaction(&transaction_id) {
                Some(ended) => info!(
                    station = ctx.station(),
                    "transaction {} ended with {} samples",
                    transaction_id,
                    ended.sample_count()
                ),
                None => warn!(station = ctx.station(), "end of unknown transaction {}", transaction_id),
            }
        }
    }

    Ok(TransactionEventResponse {
        id_token_info: request
            .id_token
            .as_ref()
            .map(|_| IdTokenInfo::with_status(AuthorizationStatus::Accepted)),
    })
}
