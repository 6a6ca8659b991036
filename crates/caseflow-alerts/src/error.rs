//! Error types for the notification crate.

use thiserror::Error;

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while sending notices.
#[derive(Debug, Error)]
pub enum Error {
    /// Channel is disabled.
    #[error("Channel disabled: {0}")]
    ChannelDisabled(String),

    /// Send operation failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Invalid channel configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<Error> for caseflow_core::Error {
    fn from(e: Error) -> Self {
        caseflow_core::Error::Notification(e.to_string())
    }
}
