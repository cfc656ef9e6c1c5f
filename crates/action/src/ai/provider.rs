//! The provider contract.

use async_trait::async_trait;

use crate::adapters::AdapterError;

/// A single completion request.
#[derive(Debug, Clone, Default)]
pub struct AiRequest {
    /// Fully substituted prompt text.
    pub prompt: String,
    /// Model override, when the node configuration names one.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Response token budget.
    pub max_tokens: Option<u32>,
}

impl AiRequest {
    /// Create a request from a prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// A provider's answer.
#[derive(Debug, Clone)]
pub struct AiCompletion {
    /// The response text.
    pub text: String,
    /// Tokens consumed by the call.
    pub tokens_used: u64,
    /// Cost of the call in the deployment's accounting unit.
    pub cost: f64,
    /// Which provider answered (set by the directory).
    pub provider: String,
}

/// One AI provider integration.
///
/// Implementations wrap a concrete service (a hosted chat model, a local
/// inference server). Failures are adapter errors; the directory decides
/// whether to walk the fallback chain.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Stable provider name used in policy tables and quota counters.
    fn name(&self) -> &str;

    /// Perform a completion.
    async fn complete(&self, request: &AiRequest) -> Result<AiCompletion, AdapterError>;
}
