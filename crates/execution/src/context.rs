//! In-flight execution state.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use stratus_core::{ExecutionId, NodeId, WorkflowId};

use crate::document::{ExecutionDocument, NodeExecutionRecord, StepStatus};
use crate::metrics::{AggregateMetrics, StepMetrics};
use crate::status::ExecutionStatus;
use crate::step::{StepOutcome, StepRecord};

/// The in-flight state of one workflow run.
///
/// Mutated only inside the execution's lock-guarded critical sections,
/// persisted (as an [`ExecutionDocument`]) at every transition, and
/// reconstructible from the store at any time.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Process-unique execution identifier.
    pub execution_id: ExecutionId,
    /// The workflow being executed.
    pub workflow_id: WorkflowId,
    /// Cursor: the node the engine is at, if any.
    pub current_node_id: Option<NodeId>,
    /// Variables: the fold of step outputs over the trigger payload.
    pub variables: Map<String, Value>,
    /// Append-only step history.
    pub history: Vec<StepRecord>,
    /// Execution status.
    pub status: ExecutionStatus,
    /// When the execution started.
    pub started_at: DateTime<Utc>,
    /// Set exactly when the status is terminal.
    pub ended_at: Option<DateTime<Utc>>,
    /// The initial trigger payload, kept for the persisted document.
    pub inputs: Map<String, Value>,
    /// Accumulated AI token usage.
    pub ai_tokens_used: u64,
    /// Accumulated AI cost.
    pub ai_cost: f64,
}

impl ExecutionContext {
    /// Create a fresh running context seeded with the trigger payload.
    #[must_use]
    pub fn new(
        execution_id: ExecutionId,
        workflow_id: WorkflowId,
        trigger_data: Map<String, Value>,
    ) -> Self {
        Self {
            execution_id,
            workflow_id,
            current_node_id: None,
            variables: trigger_data.clone(),
            history: Vec::new(),
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
            inputs: trigger_data,
            ai_tokens_used: 0,
            ai_cost: 0.0,
        }
    }

    /// Move the cursor to a node.
    pub fn set_current(&mut self, node_id: NodeId) {
        self.current_node_id = Some(node_id);
    }

    /// Shallow-merge a step output into the variables; later keys
    /// overwrite earlier ones.
    pub fn merge_output(&mut self, output: &Map<String, Value>) {
        for (key, value) in output {
            self.variables.insert(key.clone(), value.clone());
        }
    }

    /// Append a step record. History is append-only.
    pub fn record_step(&mut self, record: StepRecord) {
        self.history.push(record);
    }

    /// Accumulate AI usage reported by a step.
    pub fn note_ai_usage(&mut self, tokens: u64, cost: f64) {
        self.ai_tokens_used += tokens;
        self.ai_cost += cost;
    }

    /// Transition to paused.
    pub fn mark_paused(&mut self) {
        self.status = ExecutionStatus::Paused;
    }

    /// Transition back to running (resume).
    pub fn mark_running(&mut self) {
        self.status = ExecutionStatus::Running;
        self.ended_at = None;
    }

    /// Terminal transition: completed.
    pub fn mark_completed(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.ended_at = Some(Utc::now());
    }

    /// Terminal transition: failed.
    pub fn mark_failed(&mut self) {
        self.status = ExecutionStatus::Failed;
        self.ended_at = Some(Utc::now());
    }

    /// Terminal transition: cancelled.
    pub fn mark_cancelled(&mut self) {
        self.status = ExecutionStatus::Cancelled;
        self.ended_at = Some(Utc::now());
    }

    /// The pause record for the current node, if this context is paused
    /// where its history says it should be.
    #[must_use]
    pub fn pause_record(&self) -> Option<&StepRecord> {
        let current = self.current_node_id.as_ref()?;
        self.history
            .iter()
            .rev()
            .find(|rec| rec.is_pause() && &rec.node_id == current)
    }

    /// Build the persisted document for this context.
    #[must_use]
    pub fn to_document(&self) -> ExecutionDocument {
        let node_executions: Vec<NodeExecutionRecord> = self
            .history
            .iter()
            .map(|rec| NodeExecutionRecord {
                node_id: rec.node_id.clone(),
                start_time: rec.started_at,
                end_time: rec.ended_at(),
                status: match rec.outcome {
                    StepOutcome::Failed => StepStatus::Failed,
                    StepOutcome::Success | StepOutcome::Paused => StepStatus::Success,
                },
                error: rec.error.clone(),
                output: rec.output.clone().map(Value::Object),
                metrics: StepMetrics {
                    duration: rec.duration_ms,
                    memory_usage: rec.memory_bytes,
                },
            })
            .collect();

        let total_duration = self.ended_at.map_or_else(
            || self.history.iter().map(|rec| rec.duration_ms).sum(),
            |ended| (ended - self.started_at).num_milliseconds().max(0) as u64,
        );

        let metrics = AggregateMetrics {
            total_duration,
            total_cost: self.ai_cost,
            ai_tokens_used: self.ai_tokens_used,
            peak_memory_usage: self
                .history
                .iter()
                .map(|rec| rec.memory_bytes)
                .max()
                .unwrap_or(0),
            node_count: self.history.len() as u64,
            successful_nodes: self
                .history
                .iter()
                .filter(|rec| rec.outcome != StepOutcome::Failed)
                .count() as u64,
            failed_nodes: self
                .history
                .iter()
                .filter(|rec| rec.outcome == StepOutcome::Failed)
                .count() as u64,
        };

        ExecutionDocument {
            id: self.execution_id.clone(),
            workflow_id: self.workflow_id.clone(),
            status: self.status,
            start_time: self.started_at,
            end_time: self.ended_at,
            node_executions,
            inputs: self.inputs.clone(),
            outputs: self.variables.clone(),
            metrics,
        }
    }

    /// Rebuild a context from its persisted document.
    ///
    /// Reconstruction is best effort where the document lost detail: the
    /// cursor is the last step's node, per-step inputs are approximated
    /// with the persisted initial `inputs`, and a pause marker does not
    /// survive (the document's binary step vocabulary folds pauses into
    /// `success`).
    #[must_use]
    pub fn from_document(doc: ExecutionDocument) -> Self {
        let history: Vec<StepRecord> = doc
            .node_executions
            .iter()
            .map(|rec| StepRecord {
                node_id: rec.node_id.clone(),
                started_at: rec.start_time,
                duration_ms: rec.metrics.duration,
                input: doc.inputs.clone(),
                output: rec.output.as_ref().and_then(|v| v.as_object().cloned()),
                outcome: match rec.status {
                    StepStatus::Success => StepOutcome::Success,
                    StepStatus::Failed => StepOutcome::Failed,
                },
                error: rec.error.clone(),
                memory_bytes: rec.metrics.memory_usage,
            })
            .collect();

        Self {
            current_node_id: history.last().map(|rec| rec.node_id.clone()),
            execution_id: doc.id,
            workflow_id: doc.workflow_id,
            variables: doc.outputs,
            history,
            status: doc.status,
            started_at: doc.start_time,
            ended_at: doc.end_time,
            inputs: doc.inputs,
            ai_tokens_used: doc.metrics.ai_tokens_used,
            ai_cost: doc.metrics.total_cost,
        }
    }
}
