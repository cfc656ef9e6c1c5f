//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stratus_action::HandlerDefaults;

/// Tunables for the engine, serde-loadable from the server's
/// configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a step waits for the execution lock before failing.
    pub lock_acquire_timeout_ms: u64,
    /// TTL for cached execution documents.
    pub cache_ttl_secs: u64,
    /// Maximum cached execution documents.
    pub cache_capacity: u64,
    /// Default HTTP action timeout.
    pub http_timeout_ms: u64,
    /// Default human-task approval timeout.
    pub human_task_timeout_ms: u64,
    /// Timer delays at or above this pause instead of sleeping inline.
    pub inline_timer_threshold_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_acquire_timeout_ms: 30_000,
            cache_ttl_secs: 300,
            cache_capacity: 1_024,
            http_timeout_ms: 15_000,
            human_task_timeout_ms: 3_600_000,
            inline_timer_threshold_ms: 60_000,
        }
    }
}

impl EngineConfig {
    /// Lock acquisition timeout as a duration.
    #[must_use]
    pub fn lock_acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_acquire_timeout_ms)
    }

    /// Cache TTL as a duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// The timing defaults handed to handlers.
    #[must_use]
    pub fn handler_defaults(&self) -> HandlerDefaults {
        HandlerDefaults {
            http_timeout: Duration::from_millis(self.http_timeout_ms),
            human_task_timeout: Duration::from_millis(self.human_task_timeout_ms),
            inline_timer_threshold: Duration::from_millis(self.inline_timer_threshold_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = EngineConfig::default();
        assert_eq!(config.http_timeout_ms, 15_000);
        assert_eq!(config.human_task_timeout_ms, 3_600_000);
        assert_eq!(config.inline_timer_threshold_ms, 60_000);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"cache_ttl_secs": 60}"#).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.lock_acquire_timeout_ms, 30_000);
    }

    #[test]
    fn handler_defaults_follow_config() {
        let config = EngineConfig {
            inline_timer_threshold_ms: 10,
            ..EngineConfig::default()
        };
        let defaults = config.handler_defaults();
        assert_eq!(defaults.inline_timer_threshold, Duration::from_millis(10));
    }
}
