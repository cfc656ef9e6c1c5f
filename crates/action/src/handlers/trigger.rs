//! Trigger node handler.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use stratus_workflow::NodeDefinition;

use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// Start-node handler. Echoes the trigger payload and stamps the start
/// time. Never fails.
#[derive(Debug, Default)]
pub struct TriggerHandler;

#[async_trait]
impl NodeHandler for TriggerHandler {
    async fn execute(
        &self,
        _node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let mut output = Map::new();
        output.insert("trigger".into(), Value::Object(ctx.variables.clone()));
        output.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
        Ok(NodeOutcome::success(output))
    }
}
