//! Glidecursor Pointer Model
//!
//! Pure data types shared by the follower engine and its tooling:
//! - **Events:** timestamped pointer events and the JSONL trace format
//! - **Geometry:** points, smoothing steps, and viewport bounds
//! - **Element tree:** the minimal document model interactivity tests walk
//!
//! This crate is pure data — no I/O, no platform dependencies.

pub mod event;
pub mod geometry;
pub mod node;

pub use event::{PointerEvent, PointerEventKind, TraceHeader};
pub use geometry::{Bounds, Point2D};
pub use node::{ElementKind, Node, NodeId, NodeTree};
