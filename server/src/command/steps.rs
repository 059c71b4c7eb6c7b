//! The fixed workflow run against every newly connected station

use super::orchestrator::RoutineConfig;
use super::sender::Reply;
use crate::session::{Reservation, StationSession};
use csms_shared::{
    CancelReservationRequest, CancelReservationStatus, GetLocalListVersionRequest, IdToken,
    IdTokenType, MessageTrigger, Request, ReserveNowRequest, ReserveNowStatus, Response,
    SetVariableData, SetVariableStatus, SetVariablesRequest, TriggerMessageRequest,
    TriggerMessageStatus,
};
use std::time::Duration;
use tracing::{info, warn};

pub const RESERVATION_ID: i32 = 42;
pub const RESERVED_CONNECTOR_ID: i32 = 1;
pub const RESERVATION_ID_TOKEN: &str = "l33t";
pub const RESERVATION_TTL: Duration = Duration::from_secs(60 * 60);

/// One command of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ReserveNow,
    CancelReservation,
    GetLocalListVersion,
    SetVariables,
    TriggerHeartbeat,
    TriggerLogStatus,
}

/// Steps in the order they are issued
pub const WORKFLOW: [Step; 6] = [
    Step::ReserveNow,
    Step::CancelReservation,
    Step::GetLocalListVersion,
    Step::SetVariables,
    Step::TriggerHeartbeat,
    Step::TriggerLogStatus,
];

/// How the station answered a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted,
    /// Well-formed negative answer; the workflow carries on
    Rejected(String),
}

impl Step {
    /// Wait before issuing this step when it is not the first one
    pub fn delay(&self, config: &RoutineConfig) -> Duration {
        match self {
            Step::CancelReservation => config.reservation_hold,
            _ => config.step_interval,
        }
    }

    /// Build the request payload for this step
    pub fn request(&self, now_ms: u64) -> Request {
        match self {
            Step::ReserveNow => Request::ReserveNow(ReserveNowRequest {
                id: RESERVATION_ID,
                expiry_ms: now_ms + RESERVATION_TTL.as_millis() as u64,
                id_token: Some(IdToken::new(RESERVATION_ID_TOKEN, IdTokenType::KeyCode)),
                connector_id: RESERVED_CONNECTOR_ID,
            }),
            Step::CancelReservation => Request::CancelReservation(CancelReservationRequest {
                reservation_id: RESERVATION_ID,
            }),
            Step::GetLocalListVersion => {
                Request::GetLocalListVersion(GetLocalListVersionRequest {})
            }
            Step::SetVariables => Request::SetVariables(SetVariablesRequest {
                set_variable_data: vec![
                    SetVariableData::target("OCPPCommCtrlr", "HeartbeatInterval", "10"),
                    SetVariableData::target("AuthCtrlr", "Enabled", "true"),
                ],
            }),
            Step::TriggerHeartbeat => trigger(MessageTrigger::Heartbeat),
            Step::TriggerLogStatus => trigger(MessageTrigger::LogStatusNotification),
        }
    }

    /// Classify the station's reply and apply it to the session
    pub async fn apply(
        &self,
        session: &StationSession,
        request: &Request,
        reply: Reply,
    ) -> StepOutcome {
        let station = session.station_id();
        let action = request.action();

        let response = match reply {
            Ok(response) => response,
            Err(call_error) => return StepOutcome::Rejected(call_error.to_string()),
        };

        match (request, response) {
            (Request::ReserveNow(req), Response::ReserveNow(res)) => {
                let token = req
                    .id_token
                    .as_ref()
                    .map(|t| t.id_token.clone())
                    .unwrap_or_default();
                if res.status() != ReserveNowStatus::Accepted {
                    return StepOutcome::Rejected(format!(
                        "couldn't reserve connector {}: {:?}",
                        req.connector_id,
                        res.status()
                    ));
                }
                session.state_mut().await.reserve(Reservation {
                    id: req.id,
                    connector_id: req.connector_id,
                    id_token: token.clone(),
                    expiry_ms: req.expiry_ms,
                });
                info!(
                    station,
                    action,
                    "connector {} reserved for client {} until {} (reservation ID {})",
                    req.connector_id,
                    token,
                    req.expiry_ms,
                    req.id
                );
                StepOutcome::Accepted
            }
            (Request::CancelReservation(req), Response::CancelReservation(res)) => {
                if res.status() != CancelReservationStatus::Accepted {
                    return StepOutcome::Rejected(format!(
                        "couldn't cancel reservation {}",
                        req.reservation_id
                    ));
                }
                session.state_mut().await.cancel_reservation(req.reservation_id);
                info!(station, action, "reservation {} canceled successfully", req.reservation_id);
                StepOutcome::Accepted
            }
            (Request::GetLocalListVersion(_), Response::GetLocalListVersion(res)) => {
                session.state_mut().await.local_list_version = Some(res.version_number);
                info!(station, action, "current local list version: {}", res.version_number);
                StepOutcome::Accepted
            }
            (Request::SetVariables(_), Response::SetVariables(res)) => {
                let mut updated = 0;
                for result in &res.set_variable_result {
                    let component = result.component_name();
                    let variable = result.variable_name();
                    match result.attribute_status() {
                        SetVariableStatus::Accepted | SetVariableStatus::RebootRequired => {
                            updated += 1;
                            info!(station, action, "updated variable {} for component {}", variable, component);
                        }
                        SetVariableStatus::NotSupported => warn!(
                            station,
                            action,
                            "couldn't update variable {} for component {}: unsupported",
                            variable,
                            component
                        ),
                        SetVariableStatus::UnknownComponent => warn!(
                            station,
                            action,
                            "couldn't update variable for unknown component {}",
                            component
                        ),
                        SetVariableStatus::UnknownVariable => warn!(
                            station,
                            action,
                            "couldn't update unknown variable {} for component {}",
                            variable,
                            component
                        ),
                        SetVariableStatus::Rejected => warn!(
                            station,
                            action,
                            "couldn't update variable {} for component {}: rejected",
                            variable,
                            component
                        ),
                    }
                }
                if updated == 0 {
                    StepOutcome::Rejected("no variable was updated".into())
                } else {
                    StepOutcome::Accepted
                }
            }
            (Request::TriggerMessage(req), Response::TriggerMessage(res)) => {
                let requested = req.requested_message();
                if res.status() == TriggerMessageStatus::Accepted {
                    info!(station, action, "{:?} triggered successfully", requested);
                    StepOutcome::Accepted
                } else {
                    StepOutcome::Rejected(format!("{:?} trigger was rejected", requested))
                }
            }
            (_, response) => StepOutcome::Rejected(format!(
                "unexpected {} response",
                response.action()
            )),
        }
    }
}

fn trigger(message: MessageTrigger) -> Request {
    Request::TriggerMessage(TriggerMessageRequest {
        requested_message: message.into(),
    })
}
