//! Router error types.
//!
//! [`RouterError`] is the central error type for the crate. Most variants
//! never escape the router: malformed frames are dropped and send failures
//! are logged. Configuration and setup failures surface to the binary.

/// Library-wide error enum.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Inbound frame was not a JSON object with the expected field types.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The socket's writer has gone away; the message was not queued.
    #[error("socket {0} is closed")]
    SocketClosed(uuid::Uuid),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A setup task failed before the `setup:complete` event.
    #[error("setup task `{task}` failed: {reason}")]
    Setup {
        /// Name of the failing task.
        task: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// I/O failure (binding, filesystem setup).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RouterError {
    /// Returns a short, stable identifier for the variant, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedMessage(_) => "malformed_message",
            Self::SocketClosed(_) => "socket_closed",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Setup { .. } => "setup",
            Self::Io(_) => "io",
        }
    }
}
