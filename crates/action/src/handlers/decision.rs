//! Decision node handler.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use stratus_expression::evaluate_condition;
use stratus_workflow::NodeDefinition;
use tracing::warn;

use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// The branch key reported when no condition evaluates true.
pub const DEFAULT_PATH: &str = "default";

/// Evaluates the node's named conditions and reports the chosen path.
///
/// The output feeds the engine's edge routing: `decisionPath` is the
/// first condition (in declaration order) that evaluated true, or
/// `"default"`; `conditionResults` carries every individual verdict.
#[derive(Debug, Default)]
pub struct DecisionHandler;

#[async_trait]
impl NodeHandler for DecisionHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let conditions = node
            .config_value("conditions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Map::new();
        let mut decision_path: Option<String> = None;

        for entry in &conditions {
            let (Some(name), Some(expression)) = (
                entry.get("name").and_then(Value::as_str),
                entry.get("expression").and_then(Value::as_str),
            ) else {
                warn!(node_id = %node.id, "skipping malformed decision condition");
                continue;
            };

            let verdict = evaluate_condition(expression, &ctx.variables);
            results.insert(name.to_owned(), Value::Bool(verdict));
            if verdict && decision_path.is_none() {
                decision_path = Some(name.to_owned());
            }
        }

        let mut output = Map::new();
        output.insert("conditionResults".into(), Value::Object(results));
        output.insert(
            "decisionPath".into(),
            json!(decision_path.as_deref().unwrap_or(DEFAULT_PATH)),
        );
        Ok(NodeOutcome::success(output))
    }
}
