//! Per-station command orchestrator
//!
//! Runs the fixed workflow against one station: each step is sent, its
//! correlated reply awaited and applied before the next step is issued.
//! A transport failure aborts the rest of the workflow; a negative answer
//! is logged and the workflow moves on.

use super::sender::CommandSender;
use super::steps::{Step, StepOutcome, WORKFLOW};
use super::timeout::await_reply;
use crate::session::StationSession;
use csms_shared::now_ms;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Pacing of the workflow
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineConfig {
    /// Wait before the first step
    pub initial_delay: Duration,
    /// Wait between consecutive steps
    pub step_interval: Duration,
    /// Wait between placing the reservation and cancelling it
    pub reservation_hold: Duration,
    /// Give up on a reply after this long; wait forever when unset
    pub command_timeout: Option<Duration>,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            step_interval: Duration::from_secs(5),
            reservation_hold: Duration::from_secs(1),
            command_timeout: None,
        }
    }
}

/// How a workflow run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineOutcome {
    /// Every step was issued and answered
    Completed { rejected: usize },
    /// The session went away; `step` was never issued
    Cancelled { step: usize },
    /// Transport failure on `step`; later steps were never issued
    Aborted { step: usize },
}

/// Drives the workflow for one station session
pub struct Orchestrator {
    sender: Arc<dyn CommandSender>,
    session: Arc<StationSession>,
    config: RoutineConfig,
    cancel: CancellationToken,
    steps: Vec<Step>,
}

impl Orchestrator {
    pub fn new(
        sender: Arc<dyn CommandSender>,
        session: Arc<StationSession>,
        config: RoutineConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sender,
            session,
            config,
            cancel,
            steps: WORKFLOW.to_vec(),
        }
    }

    /// Replace the workflow steps
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Run the workflow to completion, cancellation or the first transport failure
    pub async fn run(self) -> RoutineOutcome {
        let station = self.session.station_id();
        let connection_id = self.session.connection_id();
        let mut rejected = 0;

        for (index, step) in self.steps.iter().enumerate() {
            let delay = if index == 0 {
                self.config.initial_delay
            } else {
                step.delay(&self.config)
            };
            if !self.pace(delay).await || self.cancel.is_cancelled() {
                info!(station, "command routine cancelled before step {}", index + 1);
                return RoutineOutcome::Cancelled { step: index };
            }

            let request = step.request(now_ms());
            let action = request.action();
            let pending = match self.sender.send(station, connection_id, request.clone()).await {
                Ok(pending) => pending,
                Err(e) => {
                    error!(station, action, "couldn't send message: {}", e);
                    return RoutineOutcome::Aborted { step: index };
                }
            };
            debug!(station, action, message_id = pending.message_id(), "awaiting reply");

            let reply = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(station, action, "command routine cancelled while awaiting reply");
                    return RoutineOutcome::Cancelled { step: index + 1 };
                }
                reply = await_reply(pending, self.config.command_timeout) => reply,
            };

            let reply = match reply {
                Ok(reply) => reply,
                Err(e) => {
                    error!(station, action, "error on request: {}", e);
                    return RoutineOutcome::Aborted { step: index };
                }
            };

            if let StepOutcome::Rejected(reason) = step.apply(&self.session, &request, reply).await {
                warn!(station, action, "{}", reason);
                rejected += 1;
            }
        }

        info!(station, rejected, "command routine completed");
        RoutineOutcome::Completed { rejected }
    }

    /// Sleep for `delay`; false if cancelled first
    async fn pace(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = sleep(delay) => true,
        }
    }
}
