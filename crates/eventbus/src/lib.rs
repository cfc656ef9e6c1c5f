#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Event Bus
//!
//! Process-wide notification channel for workflow lifecycle events.
//!
//! The bus carries [`Event`]s: a typed [`EventName`] plus a JSON payload.
//! Delivery to callback subscribers is synchronous relative to
//! [`EventBus::publish`], and a failing subscriber never propagates to the
//! publisher. Components that prefer awaiting events use
//! [`EventBus::watch`], a broadcast-backed stream of the same events.
//!
//! The bus is created once at server start and passed by reference into
//! the components that need it; there is no global instance.

mod bus;
mod event;

pub use bus::{EventBus, EventStream};
pub use event::{Event, EventName, EventNameParseError};
