//! AI processor node handler.

use async_trait::async_trait;
use serde_json::{Value, json};
use stratus_eventbus::EventName;
use stratus_workflow::NodeDefinition;

use crate::ai::{AiRequest, TaskType};
use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// Calls an AI provider chosen by task type.
///
/// The prompt is substituted, the task type read from configuration or
/// detected from the prompt, and the request routed through the provider
/// directory (policy table, quotas, fallback chains). `ai:request` is
/// published before the call, `ai:response` after a success, `ai:error`
/// when the whole chain failed.
#[derive(Debug, Default)]
pub struct AiProcessorHandler;

#[async_trait]
impl NodeHandler for AiProcessorHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let prompt_template = node
            .config_str("prompt")
            .ok_or_else(|| HandlerError::configuration("ai processor requires a prompt"))?;
        let mut prompt = ctx.substitute(prompt_template);
        if let Some(extra) = node.config_str("context") {
            let extra = ctx.substitute(extra);
            prompt = format!("{prompt}\n\nContext: {extra}");
        }

        let task = node
            .config_str("taskType")
            .and_then(TaskType::parse)
            .unwrap_or_else(|| TaskType::detect(&prompt));

        let request = AiRequest {
            prompt,
            model: node.config_str("model").map(str::to_owned),
            temperature: node.config_value("temperature").and_then(Value::as_f64),
            max_tokens: node
                .config_value("maxTokens")
                .and_then(Value::as_u64)
                .map(|n| n as u32),
        };

        let directory = &ctx.adapters.ai;
        let provider = node
            .config_str("aiProvider")
            .map(str::to_owned)
            .or_else(|| directory.task_provider(task).map(str::to_owned))
            .ok_or_else(|| HandlerError::configuration("no AI provider registered"))?;

        ctx.bus.publish(
            EventName::AiRequest,
            json!({
                "executionId": ctx.execution_id,
                "nodeId": ctx.node_id,
                "taskType": task,
                "provider": provider,
            }),
        );

        match directory.complete(&provider, task, &request).await {
            Ok(completion) => {
                let response = if node
                    .config_value("parseJson")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    // Keep the raw text when it is not valid JSON.
                    serde_json::from_str(&completion.text)
                        .unwrap_or(Value::String(completion.text.clone()))
                } else {
                    Value::String(completion.text.clone())
                };

                ctx.bus.publish(
                    EventName::AiResponse,
                    json!({
                        "executionId": ctx.execution_id,
                        "nodeId": ctx.node_id,
                        "provider": completion.provider,
                        "tokensUsed": completion.tokens_used,
                    }),
                );

                Ok(NodeOutcome::success_object(json!({
                    "ai_response": response,
                    "ai_provider": completion.provider,
                    "ai_task_type": task,
                    "ai_tokens_used": completion.tokens_used,
                    "ai_cost": completion.cost,
                })))
            }
            Err(err) => {
                ctx.bus.publish(
                    EventName::AiError,
                    json!({
                        "executionId": ctx.execution_id,
                        "nodeId": ctx.node_id,
                        "taskType": task,
                        "error": err.to_string(),
                    }),
                );
                Err(err)
            }
        }
    }
}
