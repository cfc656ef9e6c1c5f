//! The workflow aggregate: graph, status, version, timestamps.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use stratus_core::{NodeId, WorkflowId};

use crate::edge::Edge;
use crate::error::WorkflowError;
use crate::node::{NodeDefinition, NodeKind};

/// Publication status of a workflow definition.
///
/// Only `active` workflows may be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Being edited; not runnable.
    Draft,
    /// Published and runnable.
    Active,
    /// Retired; kept for history, not runnable.
    Archived,
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Active => f.write_str("active"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

/// A stored workflow definition: a directed graph of nodes and edges.
///
/// Immutable once an execution starts referencing it; the engine reads by
/// id and never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow identifier.
    pub id: WorkflowId,
    /// Human-readable name.
    pub name: String,
    /// Publication status.
    pub status: WorkflowStatus,
    /// Nodes in declaration order.
    pub nodes: Vec<NodeDefinition>,
    /// Edges in declaration order.
    pub edges: Vec<Edge>,
    /// Definition version, bumped by the editing surface on save.
    pub version: u32,
    /// When the definition was created.
    pub created_at: DateTime<Utc>,
    /// When the definition was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Create an empty active workflow.
    #[must_use]
    pub fn new(id: WorkflowId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            status: WorkflowStatus::Active,
            nodes: Vec::new(),
            edges: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a node (builder style).
    #[must_use]
    pub fn with_node(mut self, node: NodeDefinition) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append an edge (builder style).
    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Set the publication status (builder style).
    #[must_use]
    pub fn with_status(mut self, status: WorkflowStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the workflow may be started.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == WorkflowStatus::Active
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// The start node: the first Trigger in declaration order.
    #[must_use]
    pub fn start_node(&self) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Trigger)
    }

    /// Outgoing edges of a node, in declaration order.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Structural validation: trigger presence, unique node ids, edge
    /// endpoints, condition placement, and acyclicity.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(WorkflowError::DuplicateNodeId(node.id.clone()));
            }
        }

        if self.start_node().is_none() {
            return Err(WorkflowError::MissingTrigger);
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint) {
                    return Err(WorkflowError::DanglingEdge(endpoint.clone()));
                }
            }
            if edge.condition.is_some() {
                let source = self.node(&edge.source);
                if source.map(|n| n.kind) != Some(NodeKind::Decision) {
                    return Err(WorkflowError::ConditionOnNonDecision(edge.source.clone()));
                }
            }
        }

        let mut graph = DiGraph::<(), ()>::new();
        let indices: HashMap<&NodeId, _> = self
            .nodes
            .iter()
            .map(|n| (&n.id, graph.add_node(())))
            .collect();
        for edge in &self.edges {
            graph.add_edge(indices[&edge.source], indices[&edge.target], ());
        }
        if is_cyclic_directed(&graph) {
            return Err(WorkflowError::CyclicGraph);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn node_id(raw: &str) -> NodeId {
        NodeId::parse(raw).unwrap()
    }

    fn linear_workflow() -> Workflow {
        Workflow::new(WorkflowId::parse("wf_1").unwrap(), "linear")
            .with_node(NodeDefinition::new(node_id("t"), NodeKind::Trigger))
            .with_node(
                NodeDefinition::new(node_id("a"), NodeKind::Action)
                    .with_config(json!({"actionType": "log"})),
            )
            .with_edge(Edge::new(node_id("t"), node_id("a")))
    }

    #[test]
    fn valid_workflow_passes() {
        assert_eq!(linear_workflow().validate(), Ok(()));
    }

    #[test]
    fn start_node_is_first_trigger() {
        let wf = Workflow::new(WorkflowId::parse("wf").unwrap(), "two triggers")
            .with_node(NodeDefinition::new(node_id("a"), NodeKind::Action))
            .with_node(NodeDefinition::new(node_id("t1"), NodeKind::Trigger))
            .with_node(NodeDefinition::new(node_id("t2"), NodeKind::Trigger));

        assert_eq!(wf.start_node().unwrap().id, node_id("t1"));
    }

    #[test]
    fn missing_trigger_is_rejected() {
        let wf = Workflow::new(WorkflowId::parse("wf").unwrap(), "no trigger")
            .with_node(NodeDefinition::new(node_id("a"), NodeKind::Action));

        assert_eq!(wf.validate(), Err(WorkflowError::MissingTrigger));
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let wf = Workflow::new(WorkflowId::parse("wf").unwrap(), "dup")
            .with_node(NodeDefinition::new(node_id("t"), NodeKind::Trigger))
            .with_node(NodeDefinition::new(node_id("t"), NodeKind::Action));

        assert_eq!(
            wf.validate(),
            Err(WorkflowError::DuplicateNodeId(node_id("t")))
        );
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let wf = linear_workflow().with_edge(Edge::new(node_id("a"), node_id("ghost")));
        assert_eq!(
            wf.validate(),
            Err(WorkflowError::DanglingEdge(node_id("ghost")))
        );
    }

    #[test]
    fn condition_on_non_decision_is_rejected() {
        let wf = linear_workflow()
            .with_node(NodeDefinition::new(node_id("b"), NodeKind::Action))
            .with_edge(Edge::new(node_id("a"), node_id("b")).with_condition("x > 1"));

        assert_eq!(
            wf.validate(),
            Err(WorkflowError::ConditionOnNonDecision(node_id("a")))
        );
    }

    #[test]
    fn condition_on_decision_is_accepted() {
        let wf = Workflow::new(WorkflowId::parse("wf").unwrap(), "branch")
            .with_node(NodeDefinition::new(node_id("t"), NodeKind::Trigger))
            .with_node(NodeDefinition::new(node_id("d"), NodeKind::Decision))
            .with_node(NodeDefinition::new(node_id("b"), NodeKind::Action))
            .with_edge(Edge::new(node_id("t"), node_id("d")))
            .with_edge(Edge::new(node_id("d"), node_id("b")).with_condition("hi"));

        assert_eq!(wf.validate(), Ok(()));
    }

    #[test]
    fn cycle_is_rejected() {
        let wf = linear_workflow().with_edge(Edge::new(node_id("a"), node_id("t")));
        assert_eq!(wf.validate(), Err(WorkflowError::CyclicGraph));
    }

    #[test]
    fn outgoing_preserves_declaration_order() {
        let wf = Workflow::new(WorkflowId::parse("wf").unwrap(), "fan")
            .with_node(NodeDefinition::new(node_id("t"), NodeKind::Trigger))
            .with_node(NodeDefinition::new(node_id("p"), NodeKind::Action))
            .with_node(NodeDefinition::new(node_id("q"), NodeKind::Action))
            .with_edge(Edge::new(node_id("t"), node_id("p")))
            .with_edge(Edge::new(node_id("t"), node_id("q")));

        let t_id = node_id("t");
        let targets: Vec<&NodeId> = wf.outgoing(&t_id).map(|e| &e.target).collect();
        assert_eq!(targets, vec![&node_id("p"), &node_id("q")]);
    }

    #[test]
    fn node_lookup() {
        let wf = linear_workflow();
        assert!(wf.node(&node_id("a")).is_some());
        assert!(wf.node(&node_id("zz")).is_none());
    }

    #[test]
    fn new_workflow_is_active() {
        assert!(linear_workflow().is_active());
        assert!(
            !linear_workflow()
                .with_status(WorkflowStatus::Draft)
                .is_active()
        );
    }

    #[test]
    fn serde_round_trip() {
        let wf = linear_workflow();
        let json = serde_json::to_string(&wf).unwrap();
        let back: Workflow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, wf.id);
        assert_eq!(back.nodes.len(), 2);
        assert_eq!(back.edges.len(), 1);
        assert_eq!(back.status, WorkflowStatus::Active);
    }
}
