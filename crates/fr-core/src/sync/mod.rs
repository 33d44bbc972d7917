//! Synchronous cursor fan-out to every registered view

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{trace, warn};

mod subscriber;
mod update;

pub use subscriber::{subscriber_from_fn, CursorSubscriber, FnSubscriber, ViewError};
pub use update::{ChannelReading, CursorUpdate};

/// Handle returned by [`SyncBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A view that failed while handling an update
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
    pub subscription: SubscriptionId,
    pub reason: String,
}

/// Outcome of one publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    /// Row index that was published
    pub index: usize,
    /// Views that handled the update without error
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Registration {
    id: SubscriptionId,
    view: Weak<dyn CursorSubscriber>,
}

/// Fan-out notifier between the scrub timeline and the views.
///
/// Holds views weakly; a dropped view simply stops receiving updates and is
/// pruned on the next publish.
pub struct SyncBus {
    subscribers: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl SyncBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a view. The bus keeps only a weak reference.
    pub fn subscribe(&self, view: Arc<dyn CursorSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Registration {
            id,
            view: Arc::downgrade(&view),
        });
        id
    }

    /// Remove a view; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|registration| registration.id != id);
        subscribers.len() != before
    }

    /// Number of registered views that are still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|registration| registration.view.strong_count() > 0)
            .count()
    }

    /// Deliver an update to every live view in registration order.
    ///
    /// Views run outside the lock, so they may subscribe or unsubscribe from
    /// inside the callback; such changes apply from the next publish. An error
    /// or panic in one view is recorded and delivery continues.
    pub(crate) fn publish(&self, update: &CursorUpdate) -> PublishReport {
        let live: Vec<(SubscriptionId, Arc<dyn CursorSubscriber>)> = {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|registration| registration.view.strong_count() > 0);
            subscribers
                .iter()
                .filter_map(|registration| {
                    registration.view.upgrade().map(|view| (registration.id, view))
                })
                .collect()
        };

        let mut report = PublishReport {
            index: update.index,
            delivered: 0,
            failures: Vec::new(),
        };

        for (id, view) in live {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| view.on_cursor_change(update)));
            let reason = match outcome {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    continue;
                }
                Ok(Err(error)) => error.to_string(),
                Err(payload) => format!("view panicked: {}", panic_message(payload.as_ref())),
            };
            warn!("View {:?} failed on row {}: {}", id, update.index, reason);
            report.failures.push(DeliveryFailure {
                subscription: id,
                reason,
            });
        }

        trace!(
            "Published row {} to {} views ({} failed)",
            update.index,
            report.delivered,
            report.failures.len()
        );
        report
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
