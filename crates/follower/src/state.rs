//! Follower state and pure event transitions.
//!
//! The state is a plain struct updated by [`FollowerState::apply`]; no
//! transition suspends or fails. The three interaction flags are mutually
//! independent: each is set and cleared by its own pair of events.

use glidecursor_pointer_model::event::{ButtonState, PointerEventKind};
use glidecursor_pointer_model::geometry::Point2D;
use glidecursor_pointer_model::node::NodeId;

/// Mutable state owned by one follower instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowerState {
    /// Latest observed pointer position. Overwritten by every move event;
    /// `None` until the first move arrives.
    pub target: Option<Point2D>,

    /// Smoothed position currently applied to the surface. Overwritten by
    /// every render tick; `None` until the first tick with a target.
    pub rendered: Option<Point2D>,

    /// Pointer is inside the viewport and has moved at least once.
    pub visible: bool,

    /// Pointer is over an interactive element.
    pub hovering: bool,

    /// A pointer button is held down.
    pub active: bool,
}

/// The class toggle set external stylesheets interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleClasses {
    pub hidden: bool,
    pub hover: bool,
    pub active: bool,
}

impl StyleClasses {
    /// Render as a space-separated class string (empty when no class is set).
    pub fn to_class_string(self) -> String {
        let mut classes: Vec<&str> = Vec::new();
        if self.hidden {
            classes.push("hidden");
        }
        if self.hover {
            classes.push("hover");
        }
        if self.active {
            classes.push("active");
        }
        classes.join(" ")
    }
}

impl FollowerState {
    /// The class set derived from the current flags.
    pub fn classes(&self) -> StyleClasses {
        StyleClasses {
            hidden: !self.visible,
            hover: self.hovering,
            active: self.active,
        }
    }

    /// Apply one event to the state.
    ///
    /// `is_interactive` answers whether a target node (or an ancestor)
    /// counts as interactive; over/out on non-interactive targets leave the
    /// hover flag unchanged.
    pub fn apply<F>(&mut self, kind: &PointerEventKind, is_interactive: F)
    where
        F: FnOnce(NodeId) -> bool,
    {
        match kind {
            PointerEventKind::Move { x, y } => {
                self.target = Some(Point2D::new(*x, *y));
                self.visible = true;
            }
            PointerEventKind::Button { state, .. } => {
                self.active = matches!(state, ButtonState::Down);
            }
            PointerEventKind::Over { target } => {
                if is_interactive(*target) {
                    self.hovering = true;
                }
            }
            PointerEventKind::Out { target } => {
                if is_interactive(*target) {
                    self.hovering = false;
                }
            }
            PointerEventKind::EnterViewport => {
                self.visible = true;
            }
            PointerEventKind::LeaveViewport => {
                self.visible = false;
            }
        }
    }
}
