#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Core
//!
//! Core identifier types for the Stratus workflow engine. This crate
//! provides the strongly-typed string identifiers shared by every other
//! Stratus crate:
//!
//! - [`WorkflowId`] — identifies a stored workflow definition
//! - [`NodeId`] — identifies a node within a workflow graph
//! - [`ExecutionId`] — identifies one run of a workflow; generated ids
//!   follow the `exec_<millis>_<random>` format and are process-unique
//!
//! Each type is a distinct newtype, so mixing identifiers is a compile
//! error rather than a runtime surprise.

pub mod id;

pub use id::{ExecutionId, IdParseError, NodeId, WorkflowId};
