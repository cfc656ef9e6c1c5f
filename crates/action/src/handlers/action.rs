//! Action node handler: http_request, email, database, log.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use stratus_eventbus::EventName;
use stratus_workflow::NodeDefinition;
use tracing::{debug, error, info, warn};

use crate::adapters::HttpRequest;
use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// Side-effect handler dispatching on the node's `actionType`.
///
/// - `http_request` — substituted URL/body through the HTTP adapter; a
///   served non-2xx status fails the step
/// - `email` — substituted to/subject/body through the email adapter
/// - `database` — `insert`/`update` through the database adapter; other
///   operations log and succeed as no-ops
/// - `log` — prints at the requested level
///
/// Anything else is an unknown action type and fails the step.
#[derive(Debug, Default)]
pub struct ActionHandler;

#[async_trait]
impl NodeHandler for ActionHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let action_type = node
            .config_str("actionType")
            .ok_or_else(|| HandlerError::configuration("action requires an actionType"))?;

        match action_type {
            "http_request" => http_request(node, ctx).await,
            "email" => email(node, ctx).await,
            "database" => database(node, ctx).await,
            "log" => log(node, ctx),
            other => Err(HandlerError::UnknownActionType(other.to_owned())),
        }
    }
}

async fn http_request(
    node: &NodeDefinition,
    ctx: &HandlerContext,
) -> Result<NodeOutcome, HandlerError> {
    let url = node
        .config_str("url")
        .ok_or_else(|| HandlerError::configuration("http_request requires a url"))?;
    let url = ctx.substitute(url);
    let method = node.config_str("method").unwrap_or("GET").to_owned();

    let mut headers = BTreeMap::new();
    if let Some(Value::Object(fields)) = node
        .config_value("headers")
        .map(|value| ctx.substitute_value(value))
        .as_ref()
    {
        for (name, value) in fields {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            headers.insert(name.clone(), rendered);
        }
    }

    let body = node
        .config_value("body")
        .map(|value| ctx.substitute_value(value));
    let timeout = node
        .config_value("timeout")
        .and_then(Value::as_u64)
        .map_or(ctx.defaults.http_timeout, Duration::from_millis);

    let response = ctx
        .adapters
        .http
        .request(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        })
        .await?;

    if !response.is_success() {
        return Err(HandlerError::adapter(format!(
            "http request returned status {}",
            response.status
        )));
    }

    let headers: Map<String, Value> = response
        .headers
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();

    Ok(NodeOutcome::success_object(json!({
        "response": response.body,
        "status": response.status,
        "headers": headers,
    })))
}

async fn email(node: &NodeDefinition, ctx: &HandlerContext) -> Result<NodeOutcome, HandlerError> {
    let to = node
        .config_str("to")
        .ok_or_else(|| HandlerError::configuration("email requires a recipient"))?;
    let to = ctx.substitute(to);
    let subject = ctx.substitute(node.config_str("subject").unwrap_or_default());
    let body = ctx.substitute(node.config_str("body").unwrap_or_default());

    let sent = ctx.adapters.email.send(&to, &subject, &body).await?;
    if sent {
        ctx.bus.publish(
            EventName::Email("sent".into()),
            json!({"executionId": ctx.execution_id, "to": to}),
        );
    }

    Ok(NodeOutcome::success_object(json!({
        "sent": sent,
        "to": to,
    })))
}

async fn database(node: &NodeDefinition, ctx: &HandlerContext) -> Result<NodeOutcome, HandlerError> {
    let operation = node
        .config_str("operation")
        .ok_or_else(|| HandlerError::configuration("database action requires an operation"))?;

    match operation {
        "insert" => {
            let collection = node
                .config_str("collection")
                .ok_or_else(|| HandlerError::configuration("database insert requires a collection"))?;
            let document = ctx.substitute_value(
                node.config_value("document").unwrap_or(&Value::Object(Map::new())),
            );
            let result = ctx.adapters.database.insert(collection, &document).await?;
            Ok(NodeOutcome::success_object(json!({
                "operation": "insert",
                "success": true,
                "result": result,
            })))
        }
        "update" => {
            let collection = node
                .config_str("collection")
                .ok_or_else(|| HandlerError::configuration("database update requires a collection"))?;
            let filter =
                ctx.substitute_value(node.config_value("filter").unwrap_or(&Value::Object(Map::new())));
            let update =
                ctx.substitute_value(node.config_value("update").unwrap_or(&Value::Object(Map::new())));
            let result = ctx
                .adapters
                .database
                .update(collection, &filter, &update)
                .await?;
            Ok(NodeOutcome::success_object(json!({
                "operation": "update",
                "success": true,
                "result": result,
            })))
        }
        other => {
            // Unsupported operations are logged no-ops with a synthetic
            // success, mirroring the write-only adapter contract.
            warn!(operation = other, "unsupported database operation treated as no-op");
            Ok(NodeOutcome::success_object(json!({
                "operation": other,
                "success": true,
                "skipped": true,
            })))
        }
    }
}

fn log(node: &NodeDefinition, ctx: &HandlerContext) -> Result<NodeOutcome, HandlerError> {
    let level = node.config_str("level").unwrap_or("info");
    let message = ctx.substitute(node.config_str("message").unwrap_or_default());

    match level {
        "debug" => debug!(execution_id = %ctx.execution_id, "{message}"),
        "warn" => warn!(execution_id = %ctx.execution_id, "{message}"),
        "error" => error!(execution_id = %ctx.execution_id, "{message}"),
        _ => info!(execution_id = %ctx.execution_id, "{message}"),
    }

    Ok(NodeOutcome::success_object(json!({
        "logged": true,
        "message": message,
        "level": level,
    })))
}
