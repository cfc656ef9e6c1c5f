#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Execution
//!
//! Runtime execution state for the Stratus workflow engine. This crate
//! models execution-time concepts; it does not contain the orchestrator.
//!
//! - [`ExecutionStatus`] — the execution-level state machine
//! - [`StepRecord`] and [`StepOutcome`] — the append-only step history
//! - [`ExecutionContext`] — in-flight state of one run (cursor, variables,
//!   history, timestamps)
//! - [`ExecutionDocument`] — the persisted shape, field-for-field the
//!   store contract, convertible to and from a context
//! - [`AggregateMetrics`] / [`StepMetrics`] — per-run and per-step metrics

pub mod context;
pub mod document;
pub mod metrics;
pub mod status;
pub mod step;

pub use context::ExecutionContext;
pub use document::{ExecutionDocument, NodeExecutionRecord, StepStatus};
pub use metrics::{AggregateMetrics, StepMetrics, current_rss_bytes};
pub use status::ExecutionStatus;
pub use step::{StepOutcome, StepRecord};
