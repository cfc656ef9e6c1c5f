//! Handler registry keyed by node kind.

use std::collections::HashMap;
use std::sync::Arc;

use stratus_workflow::NodeKind;

use crate::error::HandlerError;
use crate::handler::NodeHandler;
use crate::handlers::{
    ActionHandler, AiProcessorHandler, DataTransformHandler, DecisionHandler,
    EmailAutomationHandler, FileOperationsHandler, FormBuilderHandler, HumanTaskHandler,
    PushNotificationHandler, TimerHandler, TriggerHandler,
};

/// Maps every node kind to its handler.
///
/// The engine populates this at startup and resolves kinds at step time.
/// An unregistered kind is a handler-level error that fails the single
/// execution, never the engine.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeKind, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in handler registered.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NodeKind::Trigger, Arc::new(TriggerHandler));
        registry.register(NodeKind::AiProcessor, Arc::new(AiProcessorHandler));
        registry.register(NodeKind::Decision, Arc::new(DecisionHandler));
        registry.register(NodeKind::HumanTask, Arc::new(HumanTaskHandler));
        registry.register(NodeKind::Action, Arc::new(ActionHandler));
        registry.register(NodeKind::Timer, Arc::new(TimerHandler));
        registry.register(NodeKind::FileOperations, Arc::new(FileOperationsHandler));
        registry.register(NodeKind::FormBuilder, Arc::new(FormBuilderHandler));
        registry.register(NodeKind::DataTransform, Arc::new(DataTransformHandler));
        registry.register(NodeKind::PushNotification, Arc::new(PushNotificationHandler));
        registry.register(NodeKind::EmailAutomation, Arc::new(EmailAutomationHandler));
        registry
    }

    /// Register a handler. Overwrites any existing handler for the kind.
    pub fn register(&mut self, kind: NodeKind, handler: Arc<dyn NodeHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Resolve the handler for a node kind.
    pub fn get(&self, kind: NodeKind) -> Result<Arc<dyn NodeHandler>, HandlerError> {
        self.handlers
            .get(&kind)
            .cloned()
            .ok_or(HandlerError::UnknownNodeKind(kind))
    }

    /// Whether a handler is registered for the kind.
    #[must_use]
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
