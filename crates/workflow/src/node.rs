//! Node definitions and the closed set of node kinds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stratus_core::NodeId;

/// The closed set of node kinds the engine can execute.
///
/// A handler must be registered for every kind a workflow may contain;
/// encountering an unregistered kind fails that execution, not the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Start node; fires with the trigger payload.
    Trigger,
    /// Calls an AI provider chosen by task type.
    AiProcessor,
    /// Evaluates conditions and routes the execution.
    Decision,
    /// Pauses for asynchronous human approval.
    HumanTask,
    /// External side effect: HTTP, email, database or log.
    Action,
    /// Delays inline (short) or via a deferred pause (long).
    Timer,
    /// Delegates file operations to the file adapter.
    FileOperations,
    /// Delegates form operations to the form adapter.
    FormBuilder,
    /// Delegates data reshaping to the transform adapter.
    DataTransform,
    /// Delegates push notifications to the push adapter.
    PushNotification,
    /// Delegates campaign email to the email automation adapter.
    EmailAutomation,
}

impl NodeKind {
    /// Every kind, in a stable order. Used to assert registry coverage.
    pub const ALL: [Self; 11] = [
        Self::Trigger,
        Self::AiProcessor,
        Self::Decision,
        Self::HumanTask,
        Self::Action,
        Self::Timer,
        Self::FileOperations,
        Self::FormBuilder,
        Self::DataTransform,
        Self::PushNotification,
        Self::EmailAutomation,
    ];
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trigger => "trigger",
            Self::AiProcessor => "ai_processor",
            Self::Decision => "decision",
            Self::HumanTask => "human_task",
            Self::Action => "action",
            Self::Timer => "timer",
            Self::FileOperations => "file_operations",
            Self::FormBuilder => "form_builder",
            Self::DataTransform => "data_transform",
            Self::PushNotification => "push_notification",
            Self::EmailAutomation => "email_automation",
        };
        f.write_str(name)
    }
}

/// One node of a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Identifier, unique within the workflow.
    pub id: NodeId,
    /// Which handler executes this node.
    pub kind: NodeKind,
    /// Handler-specific configuration values.
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl NodeDefinition {
    /// Create a node with an empty configuration.
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            config: Map::new(),
        }
    }

    /// Replace the configuration with the fields of a JSON object.
    ///
    /// Non-object values are ignored and leave the configuration empty.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        if let Value::Object(fields) = config {
            self.config = fields;
        }
        self
    }

    /// Fetch a configuration field.
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Fetch a string configuration field.
    #[must_use]
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}
