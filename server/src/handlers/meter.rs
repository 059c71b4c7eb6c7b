//! Metering handler

use super::{not_supported, HandlerContext};
use crate::error::DispatchError;
use csms_shared::{MeterValuesRequest, MeterValuesResponse, Request, Response};
use tracing::{debug, info};

pub async fn handle(ctx: &HandlerContext, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::MeterValues(req) => Ok(Response::MeterValues(handle_meter_values(ctx, req).await)),
        other => Err(not_supported(&other)),
    }
}

/// Handle MeterValues. Samples are kept on the transaction running on the
/// connector; without one they are only logged.
pub async fn handle_meter_values(ctx: &HandlerContext, request: MeterValuesRequest) -> MeterValuesResponse {
    let samples: usize = request.meter_value.iter().map(|m| m.sampled_value.len()).sum();
    let mut state = ctx.session.state_mut().await;

    match state.active_transaction_on(request.connector_id) {
        Some(transaction) => {
            transaction.meter_values.extend(request.meter_value);
            debug!(
                station = ctx.station(),
                "transaction {} now holds {} samples",
                transaction.transaction_id,
                transaction.sample_count()
            );
        }
        None => {
            for value in &request.meter_value {
                for sample in &value.sampled_value {
                    info!(
                        station = ctx.station(),
                        "connector {} {}: {}",
                        request.connector_id,
                        sample.measurand,
                        sample.value
                    );
                }
            }
        }
    }
    info!(
        station = ctx.station(),
        "received {} meter samples for connector {}",
        samples,
        request.connector_id
    );

    MeterValuesResponse {}
}
