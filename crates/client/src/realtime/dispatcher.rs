//! Fan-out of decoded realtime events to registered handlers

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::events::RealtimeEvent;

/// Handler invoked for every decoded realtime event
///
/// Handlers are fire-and-forget refresh triggers; they must not block for
/// long and their errors are logged, never propagated to the channel.
#[async_trait]
pub trait RealtimeHandler: Send + Sync {
    async fn handle(&self, event: &RealtimeEvent);
}

/// Dispatches raw channel events to all registered handlers
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn RealtimeHandler>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for all future events
    pub async fn register(&self, handler: Arc<dyn RealtimeHandler>) {
        self.handlers.write().await.push(handler);
    }

    /// Decode a raw channel event and fan it out
    ///
    /// Unknown event names are logged at debug level and dropped; malformed
    /// payloads of known events are logged at warn level and dropped. The
    /// channel keeps flowing either way.
    pub async fn dispatch_raw(&self, event_name: &str, payload: &serde_json::Value) {
        match RealtimeEvent::decode(event_name, payload) {
            Ok(Some(event)) => self.dispatch(&event).await,
            Ok(None) => debug!(event = %event_name, "Ignoring unknown realtime event"),
            Err(err) => {
                warn!(event = %event_name, error = %err, "Dropping malformed realtime event");
            }
        }
    }

    /// Fan a decoded event out to every registered handler, in order
    pub async fn dispatch(&self, event: &RealtimeEvent) {
        let handlers = self.handlers.read().await;
        debug!(event = ?event, handlers = handlers.len(), "Dispatching realtime event");
        for handler in handlers.iter() {
            handler.handle(event).await;
        }
    }
}
