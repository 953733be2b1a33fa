//! Store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Session file could not be read or written.
    #[error("Session I/O error: {0}")]
    SessionIo(#[from] std::io::Error),

    /// Session file exists but does not parse.
    #[error("Corrupt session file: {0}")]
    SessionCorrupt(#[from] serde_json::Error),

    /// No config directory could be resolved for session persistence.
    #[error("No user config directory available")]
    NoConfigDir,

    /// An action is already in flight.
    #[error("Action already in flight: {0}")]
    ActionInFlight(String),
}
