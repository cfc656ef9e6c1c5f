//! Operation-based service adapters.
//!
//! Five node kinds (file operations, form builder, data transform, push
//! notification, email automation) share one shape: a structured
//! `operation` plus configuration, delegated to a service. Each gets its
//! own trait so deployments can wire them independently, but all extend
//! the same [`ServiceAdapter`] contract.

use async_trait::async_trait;
use serde_json::Value;

use super::AdapterError;

/// Common contract of the operation-based services.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    /// Perform `operation` with the (already substituted) configuration,
    /// returning the service's result payload.
    async fn perform(&self, operation: &str, config: &Value) -> Result<Value, AdapterError>;
}

/// File operations service (`FileOperations` nodes).
#[async_trait]
pub trait FileService: ServiceAdapter {}

/// Form operations service (`FormBuilder` nodes).
#[async_trait]
pub trait FormService: ServiceAdapter {}

/// Data reshaping service (`DataTransform` nodes).
#[async_trait]
pub trait TransformService: ServiceAdapter {}

/// Push notification service (`PushNotification` nodes).
#[async_trait]
pub trait PushService: ServiceAdapter {}

/// Campaign email service (`EmailAutomation` nodes).
#[async_trait]
pub trait CampaignService: ServiceAdapter {}

/// Placeholder adapter used for slots the deployment has not wired.
///
/// Every call fails with a "not configured" adapter error, which the
/// owning handler surfaces as an execution failure.
#[derive(Debug, Clone)]
pub struct Unconfigured {
    name: &'static str,
}

impl Unconfigured {
    /// Create a placeholder for the named adapter slot.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    fn error(&self) -> AdapterError {
        AdapterError::new(format!("{} adapter not configured", self.name))
    }
}

#[async_trait]
impl ServiceAdapter for Unconfigured {
    async fn perform(&self, _operation: &str, _config: &Value) -> Result<Value, AdapterError> {
        Err(self.error())
    }
}

#[async_trait]
impl FileService for Unconfigured {}
#[async_trait]
impl FormService for Unconfigured {}
#[async_trait]
impl TransformService for Unconfigured {}
#[async_trait]
impl PushService for Unconfigured {}
#[async_trait]
impl CampaignService for Unconfigured {}

#[async_trait]
impl super::EmailSender for Unconfigured {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<bool, AdapterError> {
        Err(self.error())
    }
}

#[async_trait]
impl super::DatabaseWriter for Unconfigured {
    async fn insert(&self, _collection: &str, _document: &Value) -> Result<Value, AdapterError> {
        Err(self.error())
    }

    async fn update(
        &self,
        _collection: &str,
        _filter: &Value,
        _update: &Value,
    ) -> Result<Value, AdapterError> {
        Err(self.error())
    }
}
