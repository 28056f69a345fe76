//! Glidecursor Follower Engine
//!
//! An event-driven cursor follower: it tracks the latest pointer position,
//! eases a rendered position toward it with per-frame exponential smoothing,
//! and mirrors visibility/hover/active state onto an owned visual surface.
//!
//! The engine is host-independent. Hosts inject:
//! - a [`PointerSource`] delivering pointer events,
//! - a [`CursorSurface`] receiving position transforms and style classes,
//! - an element tree ([`glidecursor_pointer_model::NodeTree`]) that the
//!   interactivity matcher walks.
//!
//! Two drivers run the loop: [`driver::replay`] executes a recorded trace in
//! deterministic virtual time; [`driver::LiveDriver`] polls a source against
//! the wall clock.

pub mod cancel;
pub mod driver;
pub mod follower;
pub mod matcher;
pub mod source;
pub mod state;
pub mod surface;

pub use cancel::CancelToken;
pub use follower::{CursorFollower, FollowerConfig};
pub use matcher::Matcher;
pub use source::{PointerSource, QueueHandle, QueueSource};
pub use state::{FollowerState, StyleClasses};
pub use surface::{CursorSurface, RecordingSurface};
