//! Adapter contracts for external side effects.
//!
//! Handlers never talk to the outside world directly; they go through
//! these traits. Concrete integrations (SMTP relays, storage providers,
//! push gateways) implement them outside the core. The only concrete
//! adapter shipped here is the reqwest-backed [`HttpClient`].

mod database;
mod email;
mod http;
mod services;

use std::sync::Arc;

pub use database::DatabaseWriter;
pub use email::EmailSender;
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use services::{
    CampaignService, FileService, FormService, PushService, ServiceAdapter, TransformService,
};

use crate::ai::ProviderDirectory;

/// Error reported by an adapter implementation.
///
/// Handlers convert this into `HandlerError::Adapter`; the engine then
/// fails the execution. Retries and idempotency are the adapter's
/// business, not the engine's.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct AdapterError(pub String);

impl AdapterError {
    /// Create an adapter error.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// The bundle of adapters handed to every handler.
#[derive(Clone)]
pub struct Adapters {
    /// HTTP requests (`Action` / `http_request`).
    pub http: Arc<dyn HttpClient>,
    /// Outbound email (`Action` / `email`).
    pub email: Arc<dyn EmailSender>,
    /// Database writes (`Action` / `database`).
    pub database: Arc<dyn DatabaseWriter>,
    /// File operations (`FileOperations`).
    pub files: Arc<dyn FileService>,
    /// Form operations (`FormBuilder`).
    pub forms: Arc<dyn FormService>,
    /// Data reshaping (`DataTransform`).
    pub transforms: Arc<dyn TransformService>,
    /// Push notifications (`PushNotification`).
    pub push: Arc<dyn PushService>,
    /// Campaign email (`EmailAutomation`).
    pub campaigns: Arc<dyn CampaignService>,
    /// AI provider routing (`AIProcessor`).
    pub ai: Arc<ProviderDirectory>,
}

impl Adapters {
    /// Start building an adapter bundle.
    #[must_use]
    pub fn builder() -> AdaptersBuilder {
        AdaptersBuilder::default()
    }
}

impl std::fmt::Debug for Adapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapters").finish_non_exhaustive()
    }
}

/// Builder for [`Adapters`].
///
/// Unset adapters default to implementations that fail with a clear
/// "not configured" message on first use; the HTTP client defaults to
/// [`ReqwestClient`] and the AI directory to an empty
/// [`ProviderDirectory`].
#[derive(Default)]
pub struct AdaptersBuilder {
    http: Option<Arc<dyn HttpClient>>,
    email: Option<Arc<dyn EmailSender>>,
    database: Option<Arc<dyn DatabaseWriter>>,
    files: Option<Arc<dyn FileService>>,
    forms: Option<Arc<dyn FormService>>,
    transforms: Option<Arc<dyn TransformService>>,
    push: Option<Arc<dyn PushService>>,
    campaigns: Option<Arc<dyn CampaignService>>,
    ai: Option<Arc<ProviderDirectory>>,
}

impl AdaptersBuilder {
    /// Use a specific HTTP client.
    #[must_use]
    pub fn http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Use a specific email sender.
    #[must_use]
    pub fn email(mut self, email: Arc<dyn EmailSender>) -> Self {
        self.email = Some(email);
        self
    }

    /// Use a specific database writer.
    #[must_use]
    pub fn database(mut self, database: Arc<dyn DatabaseWriter>) -> Self {
        self.database = Some(database);
        self
    }

    /// Use a specific file service.
    #[must_use]
    pub fn files(mut self, files: Arc<dyn FileService>) -> Self {
        self.files = Some(files);
        self
    }

    /// Use a specific form service.
    #[must_use]
    pub fn forms(mut self, forms: Arc<dyn FormService>) -> Self {
        self.forms = Some(forms);
        self
    }

    /// Use a specific transform service.
    #[must_use]
    pub fn transforms(mut self, transforms: Arc<dyn TransformService>) -> Self {
        self.transforms = Some(transforms);
        self
    }

    /// Use a specific push service.
    #[must_use]
    pub fn push(mut self, push: Arc<dyn PushService>) -> Self {
        self.push = Some(push);
        self
    }

    /// Use a specific campaign service.
    #[must_use]
    pub fn campaigns(mut self, campaigns: Arc<dyn CampaignService>) -> Self {
        self.campaigns = Some(campaigns);
        self
    }

    /// Use a specific AI provider directory.
    #[must_use]
    pub fn ai(mut self, ai: Arc<ProviderDirectory>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Finish the bundle, filling gaps with defaults.
    #[must_use]
    pub fn build(self) -> Adapters {
        Adapters {
            http: self.http.unwrap_or_else(|| Arc::new(ReqwestClient::new())),
            email: self
                .email
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("email"))),
            database: self
                .database
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("database"))),
            files: self
                .files
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("file"))),
            forms: self
                .forms
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("form"))),
            transforms: self
                .transforms
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("transform"))),
            push: self
                .push
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("push"))),
            campaigns: self
                .campaigns
                .unwrap_or_else(|| Arc::new(services::Unconfigured::new("campaign"))),
            ai: self.ai.unwrap_or_else(|| Arc::new(ProviderDirectory::new())),
        }
    }
}
