//! Client error taxonomy.

use thiserror::Error;

/// Everything that can go wrong between the site and its backends.
///
/// Configuration, connection and sign-in failures end the session and are
/// shown full screen with a reload affordance. The rest belong to a single
/// user action and are shown as a short-lived notice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("No configuration source provided a usable site configuration")]
    ConfigMissing,

    #[error("Failed to connect to the document store: {0}")]
    ConnectionInitFailed(String),

    #[error("Failed to sign in: {0}")]
    AuthFailed(String),

    /// Connection or identity not established yet
    #[error("Not connected yet, please wait a moment")]
    NotReady,

    /// Ownership check failed on delete
    #[error("You can only delete your own messages.")]
    Forbidden,

    #[error("Failed to save: {0}")]
    RemoteWriteFailed(String),

    #[error("Failed to load: {0}")]
    RemoteReadFailed(String),

    #[error("Chat assistant unavailable: {0}")]
    ChatRelayFailed(String),

    /// Local validation failure (empty message, malformed contact form, ...)
    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Whether the error ends the session (only a reload helps)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClientError::ConfigMissing
                | ClientError::ConnectionInitFailed(_)
                | ClientError::AuthFailed(_)
        )
    }
}
