//! Outbound email adapter.

use async_trait::async_trait;

use super::AdapterError;

/// Outbound transactional email, as consumed by the `Action` handler's
/// `email` action type.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one message. Returns whether the relay reported it sent.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<bool, AdapterError>;
}
