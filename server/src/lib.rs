//! Charging station management server
//!
//! Accepts persistent station connections, keeps one session per station,
//! drives a fixed command routine against every new session and answers
//! the calls stations make.

pub mod app;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod session;
pub mod transport;

pub use app::ServerContext;
pub use config::ServerConfig;
