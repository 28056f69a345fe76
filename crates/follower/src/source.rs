//! Pointer event sources.
//!
//! The follower never listens to a document directly; hosts implement
//! [`PointerSource`] and the live driver polls it. This keeps the engine
//! testable without a real input stack and lets multiple followers run
//! against isolated sources.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glidecursor_common::error::GlideResult;
use glidecursor_pointer_model::event::PointerEvent;

/// A pollable stream of pointer events.
pub trait PointerSource: Send {
    /// Poll for the next event. Returns `None` when no event is pending.
    fn poll(&mut self) -> GlideResult<Option<PointerEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Shared push handle for a [`QueueSource`].
#[derive(Debug, Clone, Default)]
pub struct QueueHandle {
    queue: Arc<Mutex<VecDeque<PointerEvent>>>,
}

impl QueueHandle {
    fn lock(&self) -> MutexGuard<'_, VecDeque<PointerEvent>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue an event for the source to deliver.
    pub fn push(&self, event: PointerEvent) {
        self.lock().push_back(event);
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }
}

/// An in-memory source fed by a [`QueueHandle`].
///
/// Hosts translate their native input callbacks into pushes; the driver
/// drains the queue in delivery order.
#[derive(Debug, Default)]
pub struct QueueSource {
    handle: QueueHandle,
}

impl QueueSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A push handle connected to this source.
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }
}

impl PointerSource for QueueSource {
    fn poll(&mut self) -> GlideResult<Option<PointerEvent>> {
        Ok(self.handle.lock().pop_front())
    }

    fn name(&self) -> &str {
        "queue"
    }
}
