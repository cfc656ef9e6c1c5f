//! Structural validation errors.

use stratus_core::NodeId;

/// Error produced by [`Workflow::validate`](crate::Workflow::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum WorkflowError {
    /// The workflow has no Trigger node to start from.
    #[error("workflow has no trigger node")]
    MissingTrigger,

    /// Two nodes share the same identifier.
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(NodeId),

    /// An edge references a node that is not in the node set.
    #[error("edge references unknown node `{0}`")]
    DanglingEdge(NodeId),

    /// A conditioned edge leaves a node that is not a Decision.
    #[error("edge from `{0}` carries a condition but the node is not a decision")]
    ConditionOnNonDecision(NodeId),

    /// The graph contains a cycle.
    #[error("workflow graph contains a cycle")]
    CyclicGraph,
}
