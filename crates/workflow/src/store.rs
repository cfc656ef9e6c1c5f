//! Read-only workflow retrieval.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use stratus_core::WorkflowId;

use crate::definition::Workflow;

/// Error surfaced by a workflow store backend.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WorkflowStoreError {
    /// The backing store failed (connection, serialization, ...).
    #[error("workflow store backend: {0}")]
    Backend(String),
}

/// Read-only lookup of workflow definitions by id.
///
/// The engine never mutates workflows through this interface; editing
/// surfaces own their write path.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Fetch a workflow by id. `Ok(None)` means not found.
    async fn find_by_id(
        &self,
        id: &WorkflowId,
    ) -> Result<Option<Arc<Workflow>>, WorkflowStoreError>;
}

/// In-memory workflow store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryWorkflowStore {
    workflows: DashMap<WorkflowId, Arc<Workflow>>,
}

impl MemoryWorkflowStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a workflow definition.
    pub fn insert(&self, workflow: Workflow) {
        self.workflows.insert(workflow.id.clone(), Arc::new(workflow));
    }

    /// Number of stored workflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn find_by_id(
        &self,
        id: &WorkflowId,
    ) -> Result<Option<Arc<Workflow>>, WorkflowStoreError> {
        Ok(self.workflows.get(id).map(|entry| Arc::clone(entry.value())))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::{NodeDefinition, NodeKind};

    fn sample(id: &str) -> Workflow {
        Workflow::new(WorkflowId::parse(id).unwrap(), "sample").with_node(NodeDefinition::new(
            stratus_core::NodeId::parse("t").unwrap(),
            NodeKind::Trigger,
        ))
    }

    #[tokio::test]
    async fn find_by_id_returns_inserted_workflow() {
        let store = MemoryWorkflowStore::new();
        store.insert(sample("wf_1"));

        let found = store
            .find_by_id(&WorkflowId::parse("wf_1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "sample");
    }

    #[tokio::test]
    async fn find_by_id_misses_unknown_workflow() {
        let store = MemoryWorkflowStore::new();
        let found = store
            .find_by_id(&WorkflowId::parse("nope").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn insert_replaces_existing() {
        let store = MemoryWorkflowStore::new();
        store.insert(sample("wf_1"));
        let mut updated = sample("wf_1");
        updated.name = "renamed".into();
        store.insert(updated);

        assert_eq!(store.len(), 1);
        let found = store
            .find_by_id(&WorkflowId::parse("wf_1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "renamed");
    }
}
