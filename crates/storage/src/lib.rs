#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Storage
//!
//! Storage ports for the Stratus workflow engine:
//!
//! - [`ExecutionStore`] — durable upsert/lookup of execution documents,
//!   with an in-memory backend for tests and single-process deployments
//! - [`CacheStore`] — short-TTL key/value cache for hot execution
//!   contexts; writes are best effort and misses fall through to the
//!   execution store
//! - [`LockService`] — named mutually-exclusive critical sections with a
//!   bounded acquisition wait; the engine serialises steps of one
//!   execution under `execution:<id>`
//!
//! External backends (Redis, Postgres, S3) plug in behind the same
//! traits; only the in-memory implementations live in this crate.

mod cache;
mod execution_store;
mod lock;

pub use cache::{CacheStore, MemoryCache};
pub use execution_store::{ExecutionStore, ExecutionStoreError, MemoryExecutionStore};
pub use lock::{LockError, LockService};
