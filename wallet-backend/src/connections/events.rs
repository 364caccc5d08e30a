use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::{ConnectionState, ConnectionStatus};

/// Emitted whenever a connection record changes lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStateChangedEvent {
    pub connection_id: String,
    pub state: ConnectionState,
    pub status: ConnectionStatus,
}

/// Broadcasts state-changed events to all registered subscribers.
///
/// Delivery is fire-and-forget and at-most-once: there is no buffering and
/// no replay, so a subscriber registered after an event fired never sees it.
pub struct ConnectionEvents {
    subscribers: DashMap<String, mpsc::Sender<ConnectionStateChangedEvent>>,
}

impl ConnectionEvents {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Register a new subscriber and return (subscriber_id, receiver).
    pub fn subscribe(&self) -> (String, mpsc::Receiver<ConnectionStateChangedEvent>) {
        let subscriber_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(32);
        self.subscribers.insert(subscriber_id.clone(), tx);
        log::debug!("Subscriber {} registered for connection events", subscriber_id);
        (subscriber_id, rx)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, subscriber_id: &str) {
        self.subscribers.remove(subscriber_id);
        log::debug!("Subscriber {} removed", subscriber_id);
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ConnectionStateChangedEvent) {
        let mut dead = Vec::new();

        for entry in self.subscribers.iter() {
            if entry.value().try_send(event.clone()).is_err() {
                // Subscriber channel full or closed
                dead.push(entry.key().clone());
            }
        }

        for subscriber_id in dead {
            self.subscribers.remove(&subscriber_id);
            log::debug!("Removed dead subscriber {}", subscriber_id);
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for ConnectionEvents {
    fn default() -> Self {
        Self::new()
    }
}
