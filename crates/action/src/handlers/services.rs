//! The five delegating handlers.
//!
//! File operations, form builder, data transform, push notification and
//! email automation all share one shape: substitute variables through
//! the node configuration, delegate the named operation to the matching
//! adapter, wrap the result. Form, push and campaign operations also
//! announce themselves on their event family.

use async_trait::async_trait;
use serde_json::{Value, json};
use stratus_eventbus::EventName;
use stratus_workflow::NodeDefinition;

use crate::adapters::ServiceAdapter;
use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::outcome::NodeOutcome;

async fn delegate(
    adapter: &dyn ServiceAdapter,
    family: Option<fn(String) -> EventName>,
    node: &NodeDefinition,
    ctx: &HandlerContext,
) -> Result<NodeOutcome, HandlerError> {
    let operation = node
        .config_str("operation")
        .ok_or_else(|| HandlerError::configuration("service node requires an operation"))?;

    // Nested configuration under `config` when present, otherwise the
    // whole node configuration; substituted recursively either way.
    let raw = node
        .config_value("config")
        .cloned()
        .unwrap_or_else(|| Value::Object(node.config.clone()));
    let config = ctx.substitute_value(&raw);

    let result = adapter.perform(operation, &config).await?;

    if let Some(make_event) = family {
        ctx.bus.publish(
            make_event(operation.to_owned()),
            json!({
                "executionId": ctx.execution_id,
                "nodeId": ctx.node_id,
                "operation": operation,
            }),
        );
    }

    Ok(NodeOutcome::success_object(json!({
        "operation": operation,
        "success": true,
        "result": result,
    })))
}

/// `FileOperations` nodes: delegate to the file service.
#[derive(Debug, Default)]
pub struct FileOperationsHandler;

#[async_trait]
impl NodeHandler for FileOperationsHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        delegate(ctx.adapters.files.as_ref(), None, node, ctx).await
    }
}

/// `FormBuilder` nodes: delegate to the form service, announce on
/// `form:<operation>`.
#[derive(Debug, Default)]
pub struct FormBuilderHandler;

#[async_trait]
impl NodeHandler for FormBuilderHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        delegate(ctx.adapters.forms.as_ref(), Some(EventName::Form), node, ctx).await
    }
}

/// `DataTransform` nodes: delegate to the transform service.
#[derive(Debug, Default)]
pub struct DataTransformHandler;

#[async_trait]
impl NodeHandler for DataTransformHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        delegate(ctx.adapters.transforms.as_ref(), None, node, ctx).await
    }
}

/// `PushNotification` nodes: delegate to the push service, announce on
/// `notification:<operation>`.
#[derive(Debug, Default)]
pub struct PushNotificationHandler;

#[async_trait]
impl NodeHandler for PushNotificationHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        delegate(ctx.adapters.push.as_ref(), Some(EventName::Notification), node, ctx).await
    }
}

/// `EmailAutomation` nodes: delegate to the campaign service, announce
/// on `email:<operation>`.
#[derive(Debug, Default)]
pub struct EmailAutomationHandler;

#[async_trait]
impl NodeHandler for EmailAutomationHandler {
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError> {
        delegate(ctx.adapters.campaigns.as_ref(), Some(EventName::Email), node, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stratus_core::NodeId;
    use stratus_workflow::NodeKind;

    use super::*;
    use crate::adapters::{
        AdapterError, Adapters, FileService, FormService, ServiceAdapter,
    };
    use crate::handlers::support::context_with;

    struct RecordingService {
        calls: Mutex<Vec<(String, Value)>>,
        reply: Value,
    }

    impl RecordingService {
        fn new(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply,
            })
        }
    }

    #[async_trait]
    impl ServiceAdapter for RecordingService {
        async fn perform(&self, operation: &str, config: &Value) -> Result<Value, AdapterError> {
            self.calls.lock().push((operation.into(), config.clone()));
            Ok(self.reply.clone())
        }
    }

    #[async_trait]
    impl FileService for RecordingService {}
    #[async_trait]
    impl FormService for RecordingService {}

    fn node(kind: NodeKind, config: Value) -> NodeDefinition {
        NodeDefinition::new(NodeId::parse("svc").unwrap(), kind).with_config(config)
    }

    #[tokio::test]
    async fn delegates_operation_with_substituted_config() {
        let service = RecordingService::new(json!({"path": "/tmp/report.pdf"}));
        let adapters = Adapters::builder()
            .files(Arc::clone(&service) as Arc<dyn FileService>)
            .build();
        let ctx = context_with(adapters, json!({"name": "report"}));

        let node = node(
            NodeKind::FileOperations,
            json!({
                "operation": "write",
                "config": {"filename": "{{name}}.pdf"},
            }),
        );

        match FileOperationsHandler.execute(&node, &ctx).await.unwrap() {
            NodeOutcome::Success { output } => {
                assert_eq!(output["operation"], json!("write"));
                assert_eq!(output["success"], json!(true));
                assert_eq!(output["result"]["path"], json!("/tmp/report.pdf"));
            }
            NodeOutcome::Pause { .. } => panic!("service node must not pause"),
        }

        let calls = service.calls.lock();
        assert_eq!(calls[0].0, "write");
        assert_eq!(calls[0].1, json!({"filename": "report.pdf"}));
    }

    #[tokio::test]
    async fn whole_config_used_when_no_nested_config() {
        let service = RecordingService::new(json!({}));
        let adapters = Adapters::builder()
            .files(Arc::clone(&service) as Arc<dyn FileService>)
            .build();
        let ctx = context_with(adapters, json!({}));

        let node = node(
            NodeKind::FileOperations,
            json!({"operation": "list", "directory": "/data"}),
        );

        FileOperationsHandler.execute(&node, &ctx).await.unwrap();

        let calls = service.calls.lock();
        assert_eq!(calls[0].1["operation"], json!("list"));
        assert_eq!(calls[0].1["directory"], json!("/data"));
    }

    #[tokio::test]
    async fn form_handler_announces_on_form_family() {
        let service = RecordingService::new(json!({"formId": "f1"}));
        let adapters = Adapters::builder()
            .forms(Arc::clone(&service) as Arc<dyn FormService>)
            .build();
        let ctx = context_with(adapters, json!({}));

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        ctx.bus.subscribe(EventName::Form("create".into()), move |event| {
            assert_eq!(event.payload_str("operation"), Some("create"));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let node = node(NodeKind::FormBuilder, json!({"operation": "create"}));
        FormBuilderHandler.execute(&node, &ctx).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_operation_is_configuration_error() {
        let ctx = context_with(Adapters::builder().build(), json!({}));
        let node = node(NodeKind::DataTransform, json!({"config": {}}));

        let err = DataTransformHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn unconfigured_adapter_fails_the_step() {
        let ctx = context_with(Adapters::builder().build(), json!({}));
        let node = node(NodeKind::PushNotification, json!({"operation": "push"}));

        let err = PushNotificationHandler.execute(&node, &ctx).await.unwrap_err();
        assert!(err.is_adapter());
        assert!(err.to_string().contains("push adapter not configured"));
    }
}
