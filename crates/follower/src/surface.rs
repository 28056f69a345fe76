//! The visual surface a follower renders onto.
//!
//! The engine owns exactly one surface: created on `create()`, removed on
//! `destroy()`. Implementations draw the synthetic cursor however the host
//! renders (a DOM node, an overlay window, a composited sprite).

use glidecursor_common::error::GlideResult;
use glidecursor_pointer_model::geometry::Point2D;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::state::StyleClasses;

/// Host-side rendering target for the synthetic cursor.
///
/// Contract for implementations:
/// - The surface must never intercept pointer input (pass-through only);
///   otherwise the cursor would occlude the elements it follows.
/// - `attach` is idempotent: attaching an attached surface is a no-op.
/// - `apply_position` is a translation-only transform; sizing, opacity, and
///   all other styling belong to the host's stylesheet, keyed off the
///   classes from `apply_classes`.
pub trait CursorSurface: Send {
    /// Ensure the surface exists and is attached to the host document.
    fn attach(&mut self) -> GlideResult<()>;

    /// Remove the surface from the host document. No-op when not attached.
    fn detach(&mut self);

    /// Whether the surface is currently attached.
    fn is_attached(&self) -> bool;

    /// Move the surface to the given position.
    fn apply_position(&mut self, position: Point2D);

    /// Update the class toggle set.
    fn apply_classes(&mut self, classes: StyleClasses);
}

#[derive(Debug, Default)]
struct RecordingInner {
    attached: bool,
    attach_count: u32,
    detach_count: u32,
    positions: Vec<Point2D>,
    class_changes: Vec<StyleClasses>,
}

/// A surface that records everything applied to it.
///
/// Used by the replay driver and the drift report to inspect the rendered
/// path, and by tests to assert on surface effects. Clones share state, so
/// a caller can keep a handle while the follower owns the boxed surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<RecordingInner>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Positions applied so far, in order.
    pub fn positions(&self) -> Vec<Point2D> {
        self.lock().positions.clone()
    }

    /// The most recently applied position, if any.
    pub fn last_position(&self) -> Option<Point2D> {
        self.lock().positions.last().copied()
    }

    /// Class sets applied so far, in order.
    pub fn class_changes(&self) -> Vec<StyleClasses> {
        self.lock().class_changes.clone()
    }

    /// The most recently applied class set.
    pub fn last_classes(&self) -> Option<StyleClasses> {
        self.lock().class_changes.last().copied()
    }

    pub fn attach_count(&self) -> u32 {
        self.lock().attach_count
    }

    pub fn detach_count(&self) -> u32 {
        self.lock().detach_count
    }
}

impl CursorSurface for RecordingSurface {
    fn attach(&mut self) -> GlideResult<()> {
        let mut inner = self.lock();
        if !inner.attached {
            inner.attached = true;
            inner.attach_count += 1;
        }
        Ok(())
    }

    fn detach(&mut self) {
        let mut inner = self.lock();
        if inner.attached {
            inner.attached = false;
            inner.detach_count += 1;
        }
    }

    fn is_attached(&self) -> bool {
        self.lock().attached
    }

    fn apply_position(&mut self, position: Point2D) {
        self.lock().positions.push(position);
    }

    fn apply_classes(&mut self, classes: StyleClasses) {
        self.lock().class_changes.push(classes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_is_idempotent() {
        let mut surface = RecordingSurface::new();
        surface.attach().unwrap();
        surface.attach().unwrap();
        assert!(surface.is_attached());
        assert_eq!(surface.attach_count(), 1);
    }

    #[test]
    fn test_detach_when_not_attached_is_noop() {
        let mut surface = RecordingSurface::new();
        surface.detach();
        assert_eq!(surface.detach_count(), 0);

        surface.attach().unwrap();
        surface.detach();
        surface.detach();
        assert_eq!(surface.detach_count(), 1);
        assert!(!surface.is_attached());
    }

    #[test]
    fn test_clones_share_recordings() {
        let handle = RecordingSurface::new();
        let mut owned = handle.clone();
        owned.apply_position(Point2D::new(5.0, 6.0));
        assert_eq!(handle.last_position(), Some(Point2D::new(5.0, 6.0)));
    }
}
