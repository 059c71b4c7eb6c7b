//! Session tracking for connected charging stations
//!
//! This module handles:
//! - One live session per station id
//! - Replacing a session when a station reconnects
//! - Starting and stopping the per-session command routine

mod registry;
mod state;

pub use registry::SessionRegistry;
pub use state::{ConnectorState, Reservation, StationSession, StationState, TransactionState};
