//! Error type for the few fallible surfaces of the simulation.
//!
//! Gameplay rule checks (boarding without cargo, full delivery slots …) are
//! not errors; they surface as [`crate::protocol::Feedback`] messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to serialise snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no {kind} agent at index {index}")]
    UnknownAgent { kind: &'static str, index: usize },

    #[error("simulation driver has shut down")]
    DriverClosed,
}

pub type Result<T> = std::result::Result<T, SimError>;
