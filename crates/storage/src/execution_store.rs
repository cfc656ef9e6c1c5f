//! Durable persistence of execution documents.

use async_trait::async_trait;
use dashmap::DashMap;
use stratus_core::ExecutionId;
use stratus_execution::{ExecutionDocument, ExecutionStatus};

/// Error surfaced by an execution store backend.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutionStoreError {
    /// The backing store failed (connection, serialization, ...).
    #[error("execution store backend: {0}")]
    Backend(String),
}

/// Durable upsert/lookup of execution documents, one document per
/// execution id.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Insert or fully replace the document for its execution id.
    async fn upsert(&self, document: ExecutionDocument) -> Result<(), ExecutionStoreError>;

    /// Fetch a document by execution id.
    async fn find_by_id(
        &self,
        id: &ExecutionId,
    ) -> Result<Option<ExecutionDocument>, ExecutionStoreError>;

    /// Fetch every document with the given status.
    ///
    /// Boot recovery uses this to reload paused executions.
    async fn find_by_status(
        &self,
        status: ExecutionStatus,
    ) -> Result<Vec<ExecutionDocument>, ExecutionStoreError>;
}

/// In-memory execution store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryExecutionStore {
    documents: DashMap<ExecutionId, ExecutionDocument>,
}

impl MemoryExecutionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ExecutionStore for MemoryExecutionStore {
    async fn upsert(&self, document: ExecutionDocument) -> Result<(), ExecutionStoreError> {
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ExecutionId,
    ) -> Result<Option<ExecutionDocument>, ExecutionStoreError> {
        Ok(self.documents.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_status(
        &self,
        status: ExecutionStatus,
    ) -> Result<Vec<ExecutionDocument>, ExecutionStoreError> {
        Ok(self
            .documents
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect())
    }
}
