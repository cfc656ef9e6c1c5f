#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Action
//!
//! The node-dispatch layer of the Stratus workflow engine: one handler
//! per node kind, all speaking the same protocol.
//!
//! A handler implements [`NodeHandler`]:
//!
//! ```text
//! execute(node, context) -> Result<NodeOutcome, HandlerError>
//! ```
//!
//! [`NodeOutcome::Success`] carries the output map merged into the
//! execution's variables; [`NodeOutcome::Pause`] suspends the execution
//! until an external event resumes it; `Err(HandlerError)` fails the
//! execution. Handlers translate adapter failures into errors instead of
//! panicking, and are stateless between calls.
//!
//! External side effects go through the adapter traits in [`adapters`];
//! AI provider selection, quotas and fallback live in [`ai`]. The
//! [`HandlerRegistry`] maps every [`NodeKind`](stratus_workflow::NodeKind)
//! to its handler.

pub mod adapters;
pub mod ai;
pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod outcome;
pub mod registry;

pub use context::{HandlerContext, HandlerDefaults};
pub use error::HandlerError;
pub use handler::NodeHandler;
pub use outcome::NodeOutcome;
pub use registry::HandlerRegistry;
