//! Event fan-out.

use super::{CommandGuard, Event, Verdict};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast channel for [`Event`]s plus the ordered guard list.
///
/// Each subscriber gets its own buffer of `capacity` events; a subscriber
/// that falls further behind sees `RecvError::Lagged` and skips ahead.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    guards: RwLock<Vec<Arc<dyn CommandGuard>>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            guards: RwLock::new(Vec::new()),
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) {
        // No subscribers is fine.
        if self.sender.send(event).is_err() {
            trace!("Event dropped: no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Append a guard; it runs after every guard added before it.
    pub fn add_guard(&self, guard: Arc<dyn CommandGuard>) {
        self.guards.write().push(guard);
    }

    /// Run the guards against an outbound line. `Err` carries the reason of
    /// the first denial.
    pub fn check(&self, line: &str) -> Result<(), String> {
        // Clone the list so guards run without the lock held.
        let guards: Vec<Arc<dyn CommandGuard>> = self.guards.read().clone();
        for guard in guards {
            if let Verdict::Deny(reason) = guard.check(line) {
                return Err(reason);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .field("guards", &self.guards.read().len())
            .finish()
    }
}
