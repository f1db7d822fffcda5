use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use gridline_types::NodeId;

use crate::event::{EventKind, GridEvent};

/// Filter for subscribing to a subset of the notification stream.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only events pertaining to these nodes are delivered.
    pub nodes: Option<Vec<NodeId>>,
}

impl EventFilter {
    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &GridEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }
        if let Some(ref nodes) = self.nodes {
            match event.node() {
                Some(node) if nodes.contains(&node) => {}
                _ => return false,
            }
        }
        true
    }
}

/// A broadcast channel receiver for grid events.
pub type EventStream = broadcast::Receiver<GridEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<GridEvent>,
}

/// Fan-out bus that delivers events to matching subscribers.
///
/// Emission never fails and never blocks: slow consumers lag on their own
/// broadcast channel, and subscribers whose channels are closed are pruned
/// on the next delivery.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    channel_capacity: usize,
}

impl EventBus {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            channel_capacity,
        }
    }

    /// Register a new subscriber with the given filter.
    /// Returns a broadcast receiver for the matching events.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        self.subscribers
            .write()
            .expect("bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Deliver an event to all matching subscribers.
    pub fn emit(&self, event: GridEvent) {
        debug!(kind = %event.kind(), "event emitted");
        let mut subs = self.subscribers.write().expect("bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(event.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future
                // events. Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("bus lock poisoned").len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
