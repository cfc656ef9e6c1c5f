//! Directed edges between workflow nodes.

use serde::{Deserialize, Serialize};
use stratus_core::NodeId;

/// A directed arc from one node to another.
///
/// The optional condition string is only meaningful when the source node
/// is a Decision: conditioned edges are followed when the condition
/// evaluates true against the step output, unconditioned edges are
/// default paths. For every other source kind all outgoing edges are
/// followed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Optional routing condition (Decision sources only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Edge {
    /// Create an unconditioned edge.
    #[must_use]
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            condition: None,
        }
    }

    /// Attach a routing condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Whether this edge is a default (unconditioned) path.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}
