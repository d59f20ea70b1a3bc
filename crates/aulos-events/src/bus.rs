use tokio::sync::broadcast;

use crate::ClientEvent;

/// Default channel capacity; enough to absorb a full connect sequence
/// before a subscriber catches up.
pub const DEFAULT_CAPACITY: usize = 64;

/// Broadcast bus carrying every client event.
///
/// The controller holds one bus and publishes from its owner task; any
/// number of consumers subscribe independently. `publish()` is a sync call
/// and never blocks. With no subscribers, events are dropped on the floor,
/// and a subscriber that falls behind sees `RecvError::Lagged` instead of
/// slowing the controller down.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to all current subscribers. Accepts anything converting
    /// `Into<ClientEvent>`, so sub-enum values can be passed directly.
    pub fn publish<E: Into<ClientEvent>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    /// Subscribe to all events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
