//! Append-only step history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stratus_core::NodeId;

/// How one step of an execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The handler returned output; the execution moved on.
    Success,
    /// The handler paused the execution.
    Paused,
    /// The handler failed; the execution terminated.
    Failed,
}

/// One entry of an execution's history.
///
/// History is append-only: entries are pushed as steps complete and never
/// rewritten. Entry order equals step execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// The node that ran.
    pub node_id: NodeId,
    /// When the handler was invoked.
    pub started_at: DateTime<Utc>,
    /// Handler wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Snapshot of the variables the handler saw.
    pub input: Map<String, Value>,
    /// Handler output (success), or the pause descriptor (paused).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,
    /// How the step ended.
    pub outcome: StepOutcome,
    /// Error message when the step failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Process memory at step completion, in bytes (best effort).
    #[serde(default)]
    pub memory_bytes: u64,
}

impl StepRecord {
    /// When the step finished.
    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.started_at + chrono::Duration::milliseconds(self.duration_ms as i64)
    }

    /// Whether this entry records a pause.
    #[must_use]
    pub fn is_pause(&self) -> bool {
        self.outcome == StepOutcome::Paused
    }
}
