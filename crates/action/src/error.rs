//! Error type for handler execution.

use stratus_workflow::NodeKind;

use crate::adapters::AdapterError;

/// Error returned by a node handler.
///
/// Every variant fails the execution; the engine does not retry. Retries,
/// backoff and idempotency belong to adapter implementations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum HandlerError {
    /// A required node configuration field is missing or malformed.
    #[error("configuration: {0}")]
    Configuration(String),

    /// An external adapter reported a failure.
    #[error("adapter: {0}")]
    Adapter(String),

    /// Every provider in the fallback chain was unavailable.
    #[error("ai quota exhausted for task `{task}`")]
    QuotaExhausted {
        /// The task type that could not be served.
        task: String,
    },

    /// The `Action` handler saw an action type it does not implement.
    #[error("unknown action type `{0}`")]
    UnknownActionType(String),

    /// No handler is registered for the node kind.
    #[error("no handler registered for node kind `{0}`")]
    UnknownNodeKind(NodeKind),

    /// Timer delay was zero or negative.
    #[error("timer delay must be positive, got {0}")]
    InvalidDelay(i64),
}

impl HandlerError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an adapter error.
    pub fn adapter(msg: impl Into<String>) -> Self {
        Self::Adapter(msg.into())
    }

    /// Returns `true` for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` for adapter errors.
    #[must_use]
    pub fn is_adapter(&self) -> bool {
        matches!(self, Self::Adapter(_))
    }

    /// Returns `true` when the AI fallback chain was exhausted.
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Self::QuotaExhausted { .. })
    }
}

impl From<AdapterError> for HandlerError {
    fn from(err: AdapterError) -> Self {
        Self::Adapter(err.to_string())
    }
}
