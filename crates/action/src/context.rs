//! Context handed to handlers by the engine.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use stratus_core::{ExecutionId, NodeId, WorkflowId};
use stratus_eventbus::EventBus;

use crate::adapters::Adapters;

/// Per-handler timing defaults, owned by the engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct HandlerDefaults {
    /// Default HTTP request timeout.
    pub http_timeout: Duration,
    /// Default human-task approval timeout.
    pub human_task_timeout: Duration,
    /// Timer delays at or above this pause instead of sleeping inline.
    pub inline_timer_threshold: Duration,
}

impl Default for HandlerDefaults {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(15),
            human_task_timeout: Duration::from_secs(60 * 60),
            inline_timer_threshold: Duration::from_secs(60),
        }
    }
}

/// Everything a handler sees besides the node definition.
///
/// The variables are a snapshot: handlers read them for substitution and
/// report changes through their output map, which the engine merges.
#[derive(Clone)]
pub struct HandlerContext {
    /// The execution this step belongs to.
    pub execution_id: ExecutionId,
    /// The workflow being executed.
    pub workflow_id: WorkflowId,
    /// The node being executed.
    pub node_id: NodeId,
    /// Variables snapshot at step start.
    pub variables: Map<String, Value>,
    /// The process-wide event bus.
    pub bus: Arc<EventBus>,
    /// External service adapters.
    pub adapters: Arc<Adapters>,
    /// Timing defaults from the engine configuration.
    pub defaults: HandlerDefaults,
}

impl HandlerContext {
    /// Create a context for one step.
    #[must_use]
    pub fn new(
        execution_id: ExecutionId,
        workflow_id: WorkflowId,
        node_id: NodeId,
        variables: Map<String, Value>,
        bus: Arc<EventBus>,
        adapters: Arc<Adapters>,
        defaults: HandlerDefaults,
    ) -> Self {
        Self {
            execution_id,
            workflow_id,
            node_id,
            variables,
            bus,
            adapters,
            defaults,
        }
    }

    /// Substitute `{{name}}` placeholders from the variables snapshot.
    #[must_use]
    pub fn substitute(&self, template: &str) -> String {
        stratus_expression::substitute(template, &self.variables)
    }

    /// Recursively substitute placeholders in a JSON value.
    #[must_use]
    pub fn substitute_value(&self, value: &Value) -> Value {
        stratus_expression::substitute_value(value, &self.variables)
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("execution_id", &self.execution_id)
            .field("workflow_id", &self.workflow_id)
            .field("node_id", &self.node_id)
            .field("variables", &self.variables.len())
            .finish_non_exhaustive()
    }
}
