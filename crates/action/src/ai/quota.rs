//! Daily request quotas per provider.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Tracks per-provider request budgets.
///
/// The trait is the seam for sharing counters across engine replicas
/// (e.g. a Redis-backed implementation). The in-memory implementation is
/// process-local and correct only for single-replica deployments.
pub trait QuotaTracker: Send + Sync {
    /// Try to consume one request from the provider's budget.
    ///
    /// Returns `false` when the provider is over quota; the caller then
    /// walks its fallback chain. Providers without a configured limit are
    /// unmetered.
    fn try_consume(&self, provider: &str) -> bool;

    /// Requests remaining for a provider, `None` when unmetered.
    fn remaining(&self, provider: &str) -> Option<u64>;
}

/// Process-local quota counters.
///
/// Counters only ever grow; there is no daily rollover in-process, which
/// matches the observed behavior this engine replaces. Deployments that
/// need rollover put it behind [`QuotaTracker`] instead.
#[derive(Debug, Default)]
pub struct InMemoryQuota {
    limits: HashMap<String, u64>,
    used: Mutex<HashMap<String, u64>>,
}

impl InMemoryQuota {
    /// Create a tracker with no limits (every provider unmetered).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a provider's daily request limit (builder style).
    #[must_use]
    pub fn with_limit(mut self, provider: impl Into<String>, limit: u64) -> Self {
        self.limits.insert(provider.into(), limit);
        self
    }
}

impl QuotaTracker for InMemoryQuota {
    fn try_consume(&self, provider: &str) -> bool {
        let Some(&limit) = self.limits.get(provider) else {
            return true;
        };
        let mut used = self.used.lock();
        let count = used.entry(provider.to_owned()).or_insert(0);
        if *count >= limit {
            return false;
        }
        *count += 1;
        true
    }

    fn remaining(&self, provider: &str) -> Option<u64> {
        let limit = *self.limits.get(provider)?;
        let used = self.used.lock().get(provider).copied().unwrap_or(0);
        Some(limit.saturating_sub(used))
    }
}
