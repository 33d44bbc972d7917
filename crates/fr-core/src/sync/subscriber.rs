//! Cursor subscriber trait

use thiserror::Error;

use super::CursorUpdate;

/// Failure reported by a view while handling a cursor change
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct ViewError(pub String);

impl ViewError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Trait for views that redraw when the scrub cursor moves
pub trait CursorSubscriber: Send + Sync {
    /// Called synchronously on every cursor change
    fn on_cursor_change(&self, update: &CursorUpdate) -> Result<(), ViewError>;
}

/// Subscriber backed by a closure
pub struct FnSubscriber<F> {
    handler: F,
}

impl<F> CursorSubscriber for FnSubscriber<F>
where
    F: Fn(&CursorUpdate) -> Result<(), ViewError> + Send + Sync,
{
    fn on_cursor_change(&self, update: &CursorUpdate) -> Result<(), ViewError> {
        (self.handler)(update)
    }
}

/// Create a subscriber from a closure
pub fn subscriber_from_fn<F>(f: F) -> FnSubscriber<F>
where
    F: Fn(&CursorUpdate) -> Result<(), ViewError> + Send + Sync + 'static,
{
    FnSubscriber { handler: f }
}
