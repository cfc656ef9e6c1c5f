//! The uniform handler contract.

use async_trait::async_trait;
use stratus_workflow::NodeDefinition;

use crate::context::HandlerContext;
use crate::error::HandlerError;
use crate::outcome::NodeOutcome;

/// Behavior of one node kind.
///
/// Handlers are stateless with respect to each other and between calls;
/// per-execution state lives in the context's variables and in the
/// engine. A handler may call external services but must translate their
/// failures into [`HandlerError`] instead of panicking.
///
/// Object-safe so handlers can be stored as `Arc<dyn NodeHandler>` in the
/// registry.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Execute the node against the step context.
    async fn execute(
        &self,
        node: &NodeDefinition,
        ctx: &HandlerContext,
    ) -> Result<NodeOutcome, HandlerError>;
}
