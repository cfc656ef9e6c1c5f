//! Named mutually-exclusive critical sections.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use stratus_core::ExecutionId;
use tokio::sync::Mutex;

/// Error from the lock service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LockError {
    /// The lock could not be acquired within the configured wait.
    #[error("timed out acquiring lock `{key}` after {waited_ms} ms")]
    AcquireTimeout {
        /// The contended lock key.
        key: String,
        /// How long the acquisition waited, in milliseconds.
        waited_ms: u64,
    },
}

/// Named async locks with a bounded acquisition wait.
///
/// One mutex per key, created on first use. The guard is released on
/// every exit path, including when the critical section's future is
/// dropped mid-way. Locks are not re-entrant: a critical section must
/// not call back into [`with_lock`](Self::with_lock) with its own key.
///
/// This is the single-process backend; a deployment with several engine
/// replicas replaces it with one backed by a shared coordination store.
#[derive(Debug)]
pub struct LockService {
    locks: DashMap<String, Arc<Mutex<()>>>,
    acquire_timeout: Duration,
}

impl LockService {
    /// Create a lock service with the given acquisition timeout.
    #[must_use]
    pub fn new(acquire_timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            acquire_timeout,
        }
    }

    /// The lock key serialising steps of one execution.
    #[must_use]
    pub fn execution_key(id: &ExecutionId) -> String {
        format!("execution:{id}")
    }

    /// Run `work` while holding the named lock.
    ///
    /// Fails with [`LockError::AcquireTimeout`] instead of waiting
    /// indefinitely on a contended key.
    pub async fn with_lock<T, F, Fut>(&self, key: &str, work: F) -> Result<T, LockError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mutex = Arc::clone(self.locks.entry(key.to_owned()).or_default().value());

        let guard = tokio::time::timeout(self.acquire_timeout, mutex.lock_owned())
            .await
            .map_err(|_| {
                tracing::warn!(key, timeout_ms = self.acquire_timeout.as_millis() as u64, "lock acquisition timed out");
                LockError::AcquireTimeout {
                    key: key.to_owned(),
                    waited_ms: self.acquire_timeout.as_millis() as u64,
                }
            })?;

        let result = work().await;
        drop(guard);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn with_lock_runs_the_critical_section() {
        let locks = LockService::new(Duration::from_secs(1));
        let result = locks.with_lock("k", || async { 41 + 1 }).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn same_key_serialises_critical_sections() {
        let locks = Arc::new(LockService::new(Duration::from_secs(5)));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                locks
                    .with_lock("execution:e1", || async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1, "critical sections overlapped");
    }

    #[tokio::test]
    async fn distinct_keys_run_concurrently() {
        let locks = Arc::new(LockService::new(Duration::from_millis(100)));

        // Hold `a`, then show `b` is still acquirable within the timeout.
        let locks_bg = Arc::clone(&locks);
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let holder = tokio::spawn(async move {
            locks_bg
                .with_lock("a", || async move {
                    let _ = started_tx.send(());
                    tokio::time::sleep(Duration::from_millis(50)).await;
                })
                .await
                .unwrap();
        });

        started_rx.await.unwrap();
        locks.with_lock("b", || async {}).await.unwrap();
        holder.await.unwrap();
    }

    #[tokio::test]
    async fn contended_acquisition_times_out() {
        let locks = Arc::new(LockService::new(Duration::from_millis(20)));

        let locks_bg = Arc::clone(&locks);
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let holder = tokio::spawn(async move {
            locks_bg
                .with_lock("busy", || async move {
                    let _ = started_tx.send(());
                    tokio::time::sleep(Duration::from_millis(200)).await;
                })
                .await
                .unwrap();
        });

        started_rx.await.unwrap();
        let err = locks.with_lock("busy", || async {}).await.unwrap_err();
        assert_eq!(
            err,
            LockError::AcquireTimeout {
                key: "busy".into(),
                waited_ms: 20
            }
        );
        holder.await.unwrap();
    }

    #[tokio::test]
    async fn lock_released_after_panic_free_exit() {
        let locks = LockService::new(Duration::from_millis(50));
        locks.with_lock("k", || async {}).await.unwrap();
        // Immediately reacquirable.
        locks.with_lock("k", || async {}).await.unwrap();
    }

    #[test]
    fn execution_key_format() {
        let id = ExecutionId::parse("exec_1_abcdefghi").unwrap();
        assert_eq!(LockService::execution_key(&id), "execution:exec_1_abcdefghi");
    }
}
