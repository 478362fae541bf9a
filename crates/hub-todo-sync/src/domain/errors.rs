//! # Domain Errors
//!
//! Error types for Identity Hub sync.

use thiserror::Error;

/// Hub sync error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HubError {
    /// A DID could not be resolved, or resolved to no document.
    #[error("Failed to resolve DID {did}: {reason}")]
    Resolution {
        /// The DID that failed to resolve
        did: String,
        /// Why resolution failed
        reason: String,
    },

    /// A resolved document lacks required service metadata, or the
    /// connection options are incomplete.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The initial probe request to the Hub failed.
    #[error("Could not reach Hub: {0}")]
    Connectivity(String),

    /// A request to the Hub failed after the session was established.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Signing a commit failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The client private key is unusable.
    #[error("Invalid client key: {0}")]
    InvalidKey(String),

    /// To-do text was blank.
    #[error("To-do text must not be empty")]
    EmptyTodoText,

    /// The model has no item with the given local id.
    #[error("Unknown to-do: {0}")]
    UnknownTodo(String),

    /// The item has no Hub object yet, so it cannot be updated or deleted.
    #[error("To-do {0} has not been created on the Hub yet")]
    NotYetCreated(String),

    /// A caller-imposed page bound was hit before the server ran out of pages.
    #[error("Page limit exceeded: more than {limit} pages")]
    PageLimitExceeded {
        /// Maximum number of pages allowed
        limit: usize,
    },

    /// A commit envelope could not be decoded.
    #[error("Malformed commit: {0}")]
    MalformedCommit(String),
}

impl HubError {
    /// Create a resolution error for a DID.
    pub fn resolution(did: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            did: did.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call later might succeed.
    ///
    /// Network-bound failures are transient; bad input, bad keys and
    /// missing service metadata are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Resolution { .. } | Self::Connectivity(_) | Self::Transport(_) => true,

            // The collection outgrew the configured bound; a retry hits it again.
            Self::PageLimitExceeded { .. }
            | Self::Configuration(_)
            | Self::Signing(_)
            | Self::InvalidKey(_)
            | Self::EmptyTodoText
            | Self::UnknownTodo(_)
            | Self::NotYetCreated(_)
            | Self::MalformedCommit(_) => false,
        }
    }
}
