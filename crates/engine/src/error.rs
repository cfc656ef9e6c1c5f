//! Engine error type.

use stratus_core::{ExecutionId, WorkflowId};
use stratus_storage::{ExecutionStoreError, LockError};
use stratus_workflow::WorkflowStoreError;

/// Error surfaced by the engine's public operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// `start_workflow` on an unknown workflow id.
    #[error("workflow `{0}` not found")]
    WorkflowNotFound(WorkflowId),

    /// `start_workflow` on a workflow that is not active.
    #[error("workflow `{0}` is not active")]
    WorkflowNotActive(WorkflowId),

    /// `start_workflow` on a workflow without a trigger node.
    #[error("workflow `{0}` has no trigger node")]
    NoTriggerNode(WorkflowId),

    /// The execution id is unknown to memory, cache and store.
    #[error("execution `{0}` not found")]
    ExecutionNotFound(ExecutionId),

    /// `resume_workflow` on an execution that is not paused.
    #[error("execution `{0}` is not paused")]
    NotPaused(ExecutionId),

    /// Waiting on an execution outlived the caller's deadline.
    #[error("timed out waiting on execution `{0}`")]
    WaitTimeout(ExecutionId),

    /// Lock service failure.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Workflow store failure.
    #[error(transparent)]
    WorkflowStore(#[from] WorkflowStoreError),

    /// Execution store failure.
    #[error(transparent)]
    ExecutionStore(#[from] ExecutionStoreError),
}
