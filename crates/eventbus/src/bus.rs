//! The bus itself: callback subscriptions plus a broadcast stream.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::event::{Event, EventName};

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Capacity of the broadcast channel behind [`EventBus::watch`].
///
/// Slow watchers lag and drop old events rather than block publishers.
const WATCH_CAPACITY: usize = 256;

/// A stream of events for async consumers, obtained from
/// [`EventBus::watch`].
pub type EventStream = BroadcastStream<Event>;

/// Process-wide event bus.
///
/// Callback subscribers run inline with [`publish`](Self::publish); a
/// subscriber that panics is isolated, logged and skipped, so publishers
/// never observe subscriber failures. Async consumers use
/// [`watch`](Self::watch) instead and receive the same events through a
/// broadcast channel.
pub struct EventBus {
    by_name: RwLock<HashMap<EventName, Vec<Callback>>>,
    all: RwLock<Vec<Callback>>,
    watch_tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (watch_tx, _) = broadcast::channel(WATCH_CAPACITY);
        Self {
            by_name: RwLock::new(HashMap::new()),
            all: RwLock::new(Vec::new()),
            watch_tx,
        }
    }

    /// Publish an event to every matching subscriber.
    ///
    /// Delivery is synchronous: all callback subscribers have run by the
    /// time this returns. Watch streams receive the event asynchronously.
    pub fn publish(&self, name: EventName, payload: Value) {
        let event = Event::new(name, payload);

        let exact: Vec<Callback> = self
            .by_name
            .read()
            .get(&event.name)
            .map(|subs| subs.to_vec())
            .unwrap_or_default();
        let all: Vec<Callback> = self.all.read().to_vec();

        for callback in exact.iter().chain(all.iter()) {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| callback(&event)));
            if outcome.is_err() {
                warn!(event = %event.name, "event subscriber panicked; skipping");
            }
        }

        // No receivers is fine; watch streams are optional.
        let _ = self.watch_tx.send(event);
    }

    /// Subscribe a callback to one event name.
    pub fn subscribe(&self, name: EventName, callback: impl Fn(&Event) + Send + Sync + 'static) {
        self.by_name
            .write()
            .entry(name)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Subscribe a callback to every event.
    pub fn subscribe_all(&self, callback: impl Fn(&Event) + Send + Sync + 'static) {
        self.all.write().push(Arc::new(callback));
    }

    /// Open an async stream over all published events.
    ///
    /// The stream starts at the current position; events published before
    /// the call are not replayed.
    #[must_use]
    pub fn watch(&self) -> EventStream {
        BroadcastStream::new(self.watch_tx.subscribe())
    }

    /// Number of callback subscriptions (exact-name plus catch-all).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let exact: usize = self.by_name.read().values().map(Vec::len).sum();
        exact + self.all.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
