//! Built-in handlers, one per node kind.

mod action;
mod ai_processor;
mod decision;
mod human_task;
mod services;
mod timer;
mod trigger;

pub use action::ActionHandler;
pub use ai_processor::AiProcessorHandler;
pub use decision::DecisionHandler;
pub use human_task::HumanTaskHandler;
pub use services::{
    DataTransformHandler, EmailAutomationHandler, FileOperationsHandler, FormBuilderHandler,
    PushNotificationHandler,
};
pub use timer::TimerHandler;
pub use trigger::TriggerHandler;

#[cfg(test)]
pub(crate) mod support {
    //! Shared fixtures for handler tests.

    use std::sync::Arc;

    use serde_json::{Map, Value};
    use stratus_core::{ExecutionId, NodeId, WorkflowId};
    use stratus_eventbus::EventBus;

    use crate::adapters::Adapters;
    use crate::context::{HandlerContext, HandlerDefaults};

    pub fn context_with(adapters: Adapters, variables: Value) -> HandlerContext {
        HandlerContext::new(
            ExecutionId::generate(),
            WorkflowId::parse("wf_test").unwrap(),
            NodeId::parse("node_under_test").unwrap(),
            variables.as_object().cloned().unwrap_or_else(Map::new),
            Arc::new(EventBus::new()),
            Arc::new(adapters),
            HandlerDefaults::default(),
        )
    }

    pub fn context(variables: Value) -> HandlerContext {
        context_with(Adapters::builder().build(), variables)
    }
}
