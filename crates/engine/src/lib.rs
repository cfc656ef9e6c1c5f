#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Engine
//!
//! The workflow execution engine: given a stored workflow graph and a
//! trigger payload, drives the graph to completion while enforcing
//! ordering, handling pauses and resumes, persisting every step, emitting
//! lifecycle events, and isolating concurrent executions.
//!
//! Public operations on [`WorkflowEngine`]:
//!
//! - [`start_workflow`](WorkflowEngine::start_workflow)
//! - [`resume_workflow`](WorkflowEngine::resume_workflow)
//! - [`cancel_execution`](WorkflowEngine::cancel_execution)
//! - [`get_execution_status`](WorkflowEngine::get_execution_status)
//! - [`recover`](WorkflowEngine::recover) — boot step reloading paused
//!   executions and re-arming their wake-ups
//!
//! Steps of one execution are serialised under the `execution:<id>` lock;
//! fan-out over multiple outgoing edges is serialised depth-first in
//! edge-declaration order. Every transition is persisted to the execution
//! store (and best-effort to the cache) before further work is scheduled.

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::WorkflowEngine;
pub use error::EngineError;
