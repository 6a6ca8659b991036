//! Engine-facing error taxonomy.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the escalation engine.
///
/// Nothing here is fatal to the host process: storage trouble skips the
/// current sweep cycle and the scheduler retries on the next tick;
/// notification failures never affect persisted state.
#[derive(Debug, Error)]
pub enum Error {
    /// Complaint does not exist.
    #[error("Complaint not found: {0}")]
    NotFound(String),

    /// Manual action against a resolved complaint.
    #[error("Complaint already resolved: {0}")]
    AlreadyResolved(String),

    /// Store unreachable or a store operation failed. Transient from the
    /// scheduler's point of view.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A notification channel failed. Logged by the dispatcher, never
    /// propagated past it.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// A manual trigger arrived while a sweep was in flight.
    #[error("Sweep already in progress")]
    SweepInProgress,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
