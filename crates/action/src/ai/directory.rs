//! Provider registry, policy table, and fallback routing.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::provider::{AiCompletion, AiProvider, AiRequest};
use super::quota::{InMemoryQuota, QuotaTracker};
use super::task::TaskType;
use crate::error::HandlerError;

/// Routes completion requests to providers.
///
/// Selection order: the starting provider (explicit `aiProvider`
/// configuration or the policy table entry for the task type), then that
/// provider's fallback chain. A provider is skipped when its quota is
/// exhausted; a provider call failure also advances the chain. When the
/// whole chain is exhausted the request fails with
/// [`HandlerError::QuotaExhausted`].
pub struct ProviderDirectory {
    providers: HashMap<String, Arc<dyn AiProvider>>,
    policy: HashMap<TaskType, String>,
    fallbacks: HashMap<String, Vec<String>>,
    quota: Arc<dyn QuotaTracker>,
}

impl ProviderDirectory {
    /// Create an empty directory with unmetered quotas.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quota(Arc::new(InMemoryQuota::new()))
    }

    /// Create an empty directory with the given quota tracker.
    #[must_use]
    pub fn with_quota(quota: Arc<dyn QuotaTracker>) -> Self {
        Self {
            providers: HashMap::new(),
            policy: HashMap::new(),
            fallbacks: HashMap::new(),
            quota,
        }
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn AiProvider>) {
        self.providers.insert(provider.name().to_owned(), provider);
    }

    /// Route a task type to a primary provider.
    pub fn set_policy(&mut self, task: TaskType, provider: impl Into<String>) {
        self.policy.insert(task, provider.into());
    }

    /// Set the fallback chain tried after a provider (in order).
    pub fn set_fallbacks(&mut self, provider: impl Into<String>, chain: Vec<String>) {
        self.fallbacks.insert(provider.into(), chain);
    }

    /// Whether any provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The primary provider for a task type.
    ///
    /// Falls back to the content-generation route, then to any registered
    /// provider, so a partially configured policy table still serves.
    #[must_use]
    pub fn task_provider(&self, task: TaskType) -> Option<&str> {
        self.policy
            .get(&task)
            .or_else(|| self.policy.get(&TaskType::ContentGeneration))
            .map(String::as_str)
            .or_else(|| self.providers.keys().next().map(String::as_str))
    }

    /// Complete a request starting at `start_provider` and walking its
    /// fallback chain.
    pub async fn complete(
        &self,
        start_provider: &str,
        task: TaskType,
        request: &AiRequest,
    ) -> Result<AiCompletion, HandlerError> {
        let mut chain = vec![start_provider.to_owned()];
        if let Some(fallbacks) = self.fallbacks.get(start_provider) {
            chain.extend(fallbacks.iter().cloned());
        }

        for name in &chain {
            let Some(provider) = self.providers.get(name) else {
                warn!(provider = %name, "fallback chain names unknown provider");
                continue;
            };
            if !self.quota.try_consume(name) {
                debug!(provider = %name, task = %task, "provider over quota, falling back");
                continue;
            }
            match provider.complete(request).await {
                Ok(mut completion) => {
                    completion.provider = name.clone();
                    return Ok(completion);
                }
                Err(err) => {
                    warn!(provider = %name, task = %task, error = %err, "provider call failed, falling back");
                }
            }
        }

        Err(HandlerError::QuotaExhausted {
            task: task.to_string(),
        })
    }
}

impl Default for ProviderDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDirectory")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("policy", &self.policy.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapters::AdapterError;

    struct FakeProvider {
        name: String,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AiProvider for FakeProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn complete(&self, request: &AiRequest) -> Result<AiCompletion, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::new("provider unavailable"));
            }
            Ok(AiCompletion {
                text: format!("{}: {}", self.name, request.prompt),
                tokens_used: 10,
                cost: 0.001,
                provider: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn completes_with_start_provider() {
        let mut directory = ProviderDirectory::new();
        directory.register(FakeProvider::new("fast-chat"));

        let completion = directory
            .complete("fast-chat", TaskType::QuickDecision, &AiRequest::new("hi"))
            .await
            .unwrap();
        assert_eq!(completion.provider, "fast-chat");
        assert_eq!(completion.text, "fast-chat: hi");
    }

    #[tokio::test]
    async fn quota_exhaustion_walks_fallback_chain() {
        let quota = Arc::new(InMemoryQuota::new().with_limit("primary", 0));
        let mut directory = ProviderDirectory::with_quota(quota);
        let primary = FakeProvider::new("primary");
        let backup = FakeProvider::new("backup");
        directory.register(Arc::clone(&primary) as Arc<dyn AiProvider>);
        directory.register(Arc::clone(&backup) as Arc<dyn AiProvider>);
        directory.set_fallbacks("primary", vec!["backup".into()]);

        let completion = directory
            .complete("primary", TaskType::ContentGeneration, &AiRequest::new("x"))
            .await
            .unwrap();

        assert_eq!(completion.provider, "backup");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0, "over-quota provider was called");
        assert_eq!(backup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_walks_fallback_chain() {
        let mut directory = ProviderDirectory::new();
        directory.register(FakeProvider::failing("flaky"));
        directory.register(FakeProvider::new("steady"));
        directory.set_fallbacks("flaky", vec!["steady".into()]);

        let completion = directory
            .complete("flaky", TaskType::ContentGeneration, &AiRequest::new("x"))
            .await
            .unwrap();
        assert_eq!(completion.provider, "steady");
    }

    #[tokio::test]
    async fn exhausted_chain_is_quota_error() {
        let quota = Arc::new(InMemoryQuota::new().with_limit("only", 0));
        let mut directory = ProviderDirectory::with_quota(quota);
        directory.register(FakeProvider::new("only"));

        let err = directory
            .complete("only", TaskType::Summarization, &AiRequest::new("x"))
            .await
            .unwrap_err();
        assert!(err.is_quota_exhausted());
        assert!(err.to_string().contains("summarization"));
    }

    #[tokio::test]
    async fn unknown_fallback_entries_are_skipped() {
        let mut directory = ProviderDirectory::new();
        directory.register(FakeProvider::failing("flaky"));
        directory.register(FakeProvider::new("steady"));
        directory.set_fallbacks("flaky", vec!["ghost".into(), "steady".into()]);

        let completion = directory
            .complete("flaky", TaskType::ContentGeneration, &AiRequest::new("x"))
            .await
            .unwrap();
        assert_eq!(completion.provider, "steady");
    }

    #[test]
    fn task_provider_follows_policy_then_defaults() {
        let mut directory = ProviderDirectory::new();
        directory.register(FakeProvider::new("reasoner"));
        directory.register(FakeProvider::new("generalist"));
        directory.set_policy(TaskType::MathReasoning, "reasoner");
        directory.set_policy(TaskType::ContentGeneration, "generalist");

        assert_eq!(directory.task_provider(TaskType::MathReasoning), Some("reasoner"));
        // No explicit route: falls back to the content-generation route.
        assert_eq!(directory.task_provider(TaskType::Translation), Some("generalist"));
    }

    #[test]
    fn task_provider_last_resort_is_any_registered() {
        let mut directory = ProviderDirectory::new();
        directory.register(FakeProvider::new("solo"));
        assert_eq!(directory.task_provider(TaskType::QuickDecision), Some("solo"));

        let empty = ProviderDirectory::new();
        assert_eq!(empty.task_provider(TaskType::QuickDecision), None);
    }
}
