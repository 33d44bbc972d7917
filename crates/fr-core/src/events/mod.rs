//! Coarse lifecycle events, separate from the per-row cursor fan-out

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::warn;

type SharedHandler = Arc<Mutex<Box<dyn EventHandler>>>;

/// Session-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<SharedHandler>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events emitted by the telemetry session
pub mod events {
    use super::Event;

    /// A flight finished loading, possibly with degraded analysis
    #[derive(Debug, Clone)]
    pub struct FlightLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub channel_count: usize,
        pub phases_detected: bool,
    }

    /// A load was rejected; the session is now empty
    #[derive(Debug, Clone)]
    pub struct LoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// Playback started or stopped
    #[derive(Debug, Clone)]
    pub struct PlaybackStateChanged {
        pub playing: bool,
        pub index: usize,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(FlightLoaded, LoadFailed, PlaybackStateChanged);
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers
            .entry(type_id)
            .or_insert_with(Vec::new)
            .push(Arc::new(Mutex::new(handler)));
    }

    /// Publish an event to every handler registered for its type.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or
    /// publish on this bus; new subscriptions apply from the next publish.
    /// A handler already running further up the stack is skipped.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let snapshot: Vec<SharedHandler> = match self.handlers.lock().get(&type_id) {
            Some(event_handlers) => event_handlers.clone(),
            None => return,
        };

        for handler in snapshot {
            match handler.try_lock() {
                Some(mut handler) => handler.handle(&event),
                None => warn!("Skipping re-entrant delivery of {}", std::any::type_name::<E>()),
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler backed by a closure
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
