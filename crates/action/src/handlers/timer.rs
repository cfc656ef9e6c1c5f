//! Timer node handler.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use stratus_eventbus::EventName;
use stratus_workflow::NodeDefinition;

use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

/// Pause reason reported for deferred timers.
pub const PAUSE_REASON: &str = "Waiting for timer";

/// Delays the execution.
///
/// Short delays (below the engine's inline threshold, 60 s by default)
/// sleep inline and succeed. Longer delays schedule a deferred
/// `timer:expired` event and pause; the engine resumes on receipt. The
/// pause data carries `resumeAt` so boot recovery can re-arm timers that
/// out-lived the process.
#[derive(Debug, Default)]
pub struct TimerHandler;

fn unit_millis(unit: &str) -> Option<f64> {
    match unit {
        "milliseconds" => Some(1.0),
        "seconds" => Some(1_000.0),
        "minutes" => Some(60_000.0),
        "hours" => Some(3_600_000.0),
        _ => None,
    }
}

#[async_trait]
impl NodeHandler for TimerHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        let delay = node
            .config_value("delay")
            .and_then(Value::as_f64)
            .ok_or_else(|| HandlerError::configuration("timer requires a numeric delay"))?;
        if delay <= 0.0 {
            return Err(HandlerError::InvalidDelay(delay as i64));
        }

        let unit = node.config_str("unit").unwrap_or("seconds");
        let factor = unit_millis(unit)
            .ok_or_else(|| HandlerError::configuration(format!("unknown timer unit `{unit}`")))?;
        let delay_ms = (delay * factor) as u64;

        if delay_ms < ctx.defaults.inline_timer_threshold.as_millis() as u64 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            return Ok(NodeOutcome::success_object(json!({
                "waited": true,
                "delayMs": delay_ms,
            })));
        }

        let resume_at = Utc::now() + chrono::Duration::milliseconds(delay_ms as i64);
        let data = json!({
            "executionId": ctx.execution_id,
            "nodeId": ctx.node_id,
            "delayMs": delay_ms,
            "resumeAt": resume_at.to_rfc3339(),
        });

        // Deferred wake-up for the in-process case; recovery re-arms it
        // from `resumeAt` when the process restarts mid-pause.
        let bus = ctx.bus.clone();
        let payload = data.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            bus.publish(EventName::TimerExpired, payload);
        });

        Ok(NodeOutcome::pause(PAUSE_REASON, data))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stratus_core::NodeId;
    use stratus_workflow::NodeKind;

    use super::*;
    use crate::handlers::support::context;

    fn timer_node(config: Value) -> NodeDefinition {
        NodeDefinition::new(NodeId::parse("timer").unwrap(), NodeKind::Timer).with_config(config)
    }

    #[tokio::test]
    async fn short_delay_sleeps_inline() {
        let node = timer_node(json!({"delay": 5, "unit": "milliseconds"}));
        let ctx = context(json!({}));

        let outcome = TimerHandler.execute(&node, &ctx).await.unwrap();
        match outcome {
            NodeOutcome::Success { output } => {
                assert_eq!(output["waited"], json!(true));
                assert_eq!(output["delayMs"], json!(5));
            }
            NodeOutcome::Pause { .. } => panic!("short delay must not pause"),
        }
    }

    #[tokio::test]
    async fn long_delay_pauses_with_resume_at() {
        let node = timer_node(json!({"delay": 120, "unit": "seconds"}));
        let ctx = context(json!({}));

        let outcome = TimerHandler.execute(&node, &ctx).await.unwrap();
        match outcome {
            NodeOutcome::Pause { reason, data } => {
                assert_eq!(reason, PAUSE_REASON);
                assert_eq!(data["delayMs"], json!(120_000));
                assert!(data["resumeAt"].is_string());
            }
            NodeOutcome::Success { .. } => panic!("long delay must pause"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn threshold_is_exclusive_below_inclusive_above() {
        let ctx = context(json!({}));

        // 59 999 ms: inline path (auto-advanced by the paused clock).
        let node = timer_node(json!({"delay": 59_999, "unit": "milliseconds"}));
        let outcome = TimerHandler.execute(&node, &ctx).await.unwrap();
        assert!(outcome.is_success(), "59 999 ms must sleep inline");

        // 60 000 ms exactly: pause path.
        let node = timer_node(json!({"delay": 60_000, "unit": "milliseconds"}));
        let outcome = TimerHandler.execute(&node, &ctx).await.unwrap();
        assert!(outcome.is_pause(), "60 000 ms must pause");
    }

    #[tokio::test]
    async fn zero_delay_is_invalid() {
        let node = timer_node(json!({"delay": 0, "unit": "seconds"}));
        let ctx = context(json!({}));
        let err = TimerHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidDelay(0)));
    }

    #[tokio::test]
    async fn negative_delay_is_invalid() {
        let node = timer_node(json!({"delay": -5, "unit": "seconds"}));
        let ctx = context(json!({}));
        let err = TimerHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidDelay(-5)));
    }

    #[tokio::test]
    async fn unknown_unit_is_a_configuration_error() {
        let node = timer_node(json!({"delay": 5, "unit": "fortnights"}));
        let ctx = context(json!({}));
        let err = TimerHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn missing_delay_is_a_configuration_error() {
        let node = timer_node(json!({"unit": "seconds"}));
        let ctx = context(json!({}));
        let err = TimerHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_timer_publishes_expiry() {
        let node = timer_node(json!({"delay": 90, "unit": "seconds"}));
        let ctx = context(json!({}));

        let outcome = TimerHandler.execute(&node, &ctx).await.unwrap();
        assert!(outcome.is_pause());

        let mut stream = ctx.bus.watch();
        // Let the spawned timer task register its sleep before advancing.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(91)).await;

        let event = tokio::time::timeout(Duration::from_secs(1), async {
            use tokio_stream::StreamExt;
            stream.next().await
        })
        .await
        .expect("timer:expired not published")
        .unwrap()
        .unwrap();
        assert_eq!(event.name, EventName::TimerExpired);
    }
}
