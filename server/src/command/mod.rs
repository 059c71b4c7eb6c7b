//! Server-initiated commands
//!
//! This module handles:
//! - The fixed workflow issued to each newly connected station
//! - Correlating calls with the station's replies
//! - Optional reply timeouts

mod orchestrator;
mod sender;
mod steps;
mod timeout;

pub use orchestrator::{Orchestrator, RoutineConfig, RoutineOutcome};
pub use sender::{CommandSender, PendingResponse, Reply};
pub use steps::{Step, StepOutcome, WORKFLOW};
pub use timeout::await_reply;

#[cfg(test)]
pub(crate) use orchestrator::tests::{reply_for, Script, ScriptedSender};
