//! The persisted execution document.
//!
//! Field names here are the store contract and match the wire form
//! consumed by dashboards and the trigger layer (`_id`, `workflowId`,
//! `nodeExecutions`, ...). Changing a rename is a breaking change to
//! every stored execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stratus_core::{ExecutionId, NodeId, WorkflowId};

use crate::metrics::{AggregateMetrics, StepMetrics};
use crate::status::ExecutionStatus;

/// Persisted status of one node execution.
///
/// The persisted vocabulary is deliberately binary: a paused step is
/// stored as `success` with its pause descriptor in `output`, and the
/// document's top-level status says `paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step produced output (or paused).
    Success,
    /// The step failed.
    Failed,
}

/// One persisted node execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExecutionRecord {
    /// The node that ran.
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    /// When the handler was invoked.
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    /// When the handler returned.
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    /// Success or failure.
    pub status: StepStatus,
    /// Error message when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Handler output when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Step-level metrics.
    pub metrics: StepMetrics,
}

/// The single document upserted per execution id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDocument {
    /// Execution identifier.
    #[serde(rename = "_id")]
    pub id: ExecutionId,
    /// The workflow this execution ran.
    #[serde(rename = "workflowId")]
    pub workflow_id: WorkflowId,
    /// Execution status at persist time.
    pub status: ExecutionStatus,
    /// When the execution started.
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    /// When the execution reached a terminal status.
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Ordered step records.
    #[serde(rename = "nodeExecutions")]
    pub node_executions: Vec<NodeExecutionRecord>,
    /// Initial trigger payload.
    pub inputs: Map<String, Value>,
    /// Variables snapshot at persist time.
    pub outputs: Map<String, Value>,
    /// Aggregate metrics.
    pub metrics: AggregateMetrics,
}
