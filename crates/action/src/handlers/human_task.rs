//! Human task node handler.

use async_trait::async_trait;
use serde_json::{Value, json};
use stratus_eventbus::EventName;
use stratus_workflow::NodeDefinition;

use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// Pause reason reported for every human task.
pub const PAUSE_REASON: &str = "Waiting for human approval";

/// Publishes an approval request and pauses the execution.
///
/// Resume is driven externally: `human:approved` resumes the execution
/// with the approval data merged into its variables, `human:rejected`
/// terminates it as failed. Both subscriptions belong to the engine.
#[derive(Debug, Default)]
pub struct HumanTaskHandler;

#[async_trait]
impl NodeHandler for HumanTaskHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let assignee = node
            .config_str("assignee")
            .ok_or_else(|| HandlerError::configuration("human task requires an assignee"))?;

        let title = ctx.substitute(node.config_str("title").unwrap_or("Approval required"));
        let description = node
            .config_str("description")
            .map(|template| ctx.substitute(template));
        let approval_type = node.config_str("approvalType").unwrap_or("approve_reject");
        let timeout_ms = node
            .config_value("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(ctx.defaults.human_task_timeout.as_millis() as u64);
        let link = node.config_str("link").map(|template| ctx.substitute(template));

        let request = json!({
            "executionId": ctx.execution_id,
            "nodeId": ctx.node_id,
            "title": title,
            "description": description,
            "assignee": assignee,
            "approvalType": approval_type,
            "timeoutMs": timeout_ms,
            "link": link,
            "variables": Value::Object(ctx.variables.clone()),
        });

        ctx.bus
            .publish(EventName::HumanApprovalRequested, request.clone());

        Ok(NodeOutcome::pause(PAUSE_REASON, request))
    }
}
