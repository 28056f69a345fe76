//! The cursor follower: lifecycle, event handling, and the render tick.

use glidecursor_common::config::{FollowerDefaults, DEFAULT_INTERACTIVE_SELECTOR};
use glidecursor_common::error::GlideResult;
use glidecursor_pointer_model::event::PointerEvent;
use glidecursor_pointer_model::geometry::Point2D;
use glidecursor_pointer_model::node::NodeTree;

use crate::cancel::CancelToken;
use crate::matcher::Matcher;
use crate::state::{FollowerState, StyleClasses};
use crate::surface::CursorSurface;

/// Smoothing factors outside this range are clamped. The reference values
/// sit at 0.15–0.18; 1.0 would disable smoothing and 0.0 would freeze the
/// cursor, so neither endpoint is allowed.
const MIN_SMOOTHING: f64 = 0.01;
const MAX_SMOOTHING: f64 = 0.99;

/// Construction-time follower configuration.
#[derive(Debug, Clone)]
pub struct FollowerConfig {
    /// Per-frame smoothing factor in (0, 1). Larger values track tighter.
    pub smoothing_factor: f64,

    /// Selector list deciding which elements count as interactive.
    pub interactive_selector: String,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.18,
            interactive_selector: DEFAULT_INTERACTIVE_SELECTOR.to_string(),
        }
    }
}

impl FollowerConfig {
    /// Build from app-level defaults.
    pub fn from_defaults(defaults: &FollowerDefaults) -> Self {
        Self {
            smoothing_factor: defaults.smoothing_factor,
            interactive_selector: defaults.interactive_selector.clone(),
        }
    }
}

/// A cursor follower instance.
///
/// Owns its state, its matcher, a snapshot of the element tree, and exactly
/// one visual surface. Event handling and ticking are synchronous; a driver
/// supplies the loop.
pub struct CursorFollower {
    factor: f64,
    matcher: Matcher,
    tree: NodeTree,
    surface: Box<dyn CursorSurface>,
    state: FollowerState,
    cancel: Option<CancelToken>,
    applied_classes: Option<StyleClasses>,
}

impl CursorFollower {
    /// Build a follower.
    ///
    /// A malformed selector degrades to a matcher that never reports
    /// interactive (hover stays off, tracking keeps working); an
    /// out-of-range smoothing factor is clamped. Both degradations are
    /// logged once here, never from the per-event paths.
    pub fn new(config: FollowerConfig, tree: NodeTree, surface: Box<dyn CursorSurface>) -> Self {
        let matcher = match Matcher::compile(&config.interactive_selector) {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!(error = %e, "invalid interactive selector, hover disabled");
                Matcher::never()
            }
        };

        let factor = config.smoothing_factor;
        if !(MIN_SMOOTHING..=MAX_SMOOTHING).contains(&factor) {
            tracing::warn!(factor, "smoothing factor out of range, clamping");
        }

        Self {
            factor: factor.clamp(MIN_SMOOTHING, MAX_SMOOTHING),
            matcher,
            tree,
            surface,
            state: FollowerState::default(),
            cancel: None,
            applied_classes: None,
        }
    }

    /// Idempotently ensure the visual surface is attached.
    pub fn create(&mut self) -> GlideResult<()> {
        if !self.surface.is_attached() {
            self.surface.attach()?;
        }
        Ok(())
    }

    /// Attach the surface, push the initial class set, and arm the render
    /// loop. Returns the cancellation handle a driver should watch.
    /// Starting a running follower returns the existing handle.
    pub fn start(&mut self) -> GlideResult<CancelToken> {
        if let Some(token) = &self.cancel {
            if !token.is_cancelled() {
                return Ok(token.clone());
            }
        }

        self.create()?;

        // The cursor starts hidden until the pointer first moves.
        let classes = self.state.classes();
        self.surface.apply_classes(classes);
        self.applied_classes = Some(classes);

        let token = CancelToken::new();
        self.cancel = Some(token.clone());
        tracing::info!(smoothing = self.factor, "cursor follower started");
        Ok(token)
    }

    /// Whether the render loop is armed and not cancelled.
    pub fn is_running(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|token| !token.is_cancelled())
            .unwrap_or(false)
    }

    /// Apply one pointer event: a pure state transition plus an immediate
    /// class sync to the surface when the derived class set changed.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        let matcher = &self.matcher;
        let tree = &self.tree;
        self.state
            .apply(&event.kind, |target| matcher.is_interactive(tree, target));
        self.sync_classes();
    }

    /// Run one render frame.
    ///
    /// Returns whether the loop should reschedule: `false` only once the
    /// follower is cancelled (or was never started). A frame with no target
    /// yet is a no-op that still reschedules; the first frame with a target
    /// snaps directly to it; every later frame eases the rendered position
    /// a fixed fraction of the remaining distance.
    pub fn tick(&mut self) -> bool {
        match &self.cancel {
            None => return false,
            Some(token) if token.is_cancelled() => return false,
            Some(_) => {}
        }

        let Some(target) = self.state.target else {
            return true;
        };

        let rendered = match self.state.rendered {
            Some(prev) => prev.step_toward(&target, self.factor),
            None => target,
        };
        self.state.rendered = Some(rendered);
        self.surface.apply_position(rendered);
        true
    }

    /// Cancel the render loop. Safe before `start()`, safe to repeat.
    pub fn stop(&mut self) {
        if let Some(token) = &self.cancel {
            if !token.is_cancelled() {
                token.cancel();
                tracing::info!("cursor follower stopped");
            }
        }
    }

    /// Stop the loop, remove the surface, and clear all state. Idempotent,
    /// and a no-op on a follower that was never started.
    pub fn destroy(&mut self) {
        self.stop();
        self.surface.detach();
        self.state = FollowerState::default();
        self.applied_classes = None;
        self.cancel = None;
    }

    /// Tear down and re-initialize (used after external style changes).
    /// All smoothing state is reset: no stale position carries over.
    pub fn refresh(&mut self) -> GlideResult<CancelToken> {
        self.destroy();
        self.start()
    }

    /// Current state snapshot.
    pub fn state(&self) -> &FollowerState {
        &self.state
    }

    /// The smoothed position currently applied, if any.
    pub fn rendered(&self) -> Option<Point2D> {
        self.state.rendered
    }

    /// The effective (clamped) smoothing factor.
    pub fn smoothing_factor(&self) -> f64 {
        self.factor
    }

    fn sync_classes(&mut self) {
        let classes = self.state.classes();
        if self.applied_classes != Some(classes) && self.surface.is_attached() {
            self.surface.apply_classes(classes);
            self.applied_classes = Some(classes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use glidecursor_pointer_model::event::PointerEvent;
    use glidecursor_pointer_model::node::{ElementKind, Node, NodeId};

    fn link_tree() -> NodeTree {
        NodeTree::from_nodes(vec![
            Node::new(NodeId(1), ElementKind::Div),
            Node::new(NodeId(2), ElementKind::Anchor)
                .with_parent(NodeId(1))
                .with_attr("href", "/"),
            Node::new(NodeId(3), ElementKind::Span).with_parent(NodeId(2)),
            Node::new(NodeId(4), ElementKind::Paragraph).with_parent(NodeId(1)),
        ])
        .unwrap()
    }

    fn follower_with_surface(config: FollowerConfig) -> (CursorFollower, RecordingSurface) {
        let surface = RecordingSurface::new();
        let follower = CursorFollower::new(config, link_tree(), Box::new(surface.clone()));
        (follower, surface)
    }

    #[test]
    fn test_first_tick_snaps_to_target() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();

        follower.handle_event(&PointerEvent::moved(0, 250.0, 125.0));
        assert!(follower.tick());

        assert_eq!(follower.rendered(), Some(Point2D::new(250.0, 125.0)));
        assert_eq!(surface.last_position(), Some(Point2D::new(250.0, 125.0)));
    }

    #[test]
    fn test_smoothing_worked_example() {
        let (mut follower, _surface) = follower_with_surface(FollowerConfig {
            smoothing_factor: 0.2,
            ..Default::default()
        });
        follower.start().unwrap();

        follower.handle_event(&PointerEvent::moved(0, 0.0, 0.0));
        follower.tick(); // snap to (0, 0)

        follower.handle_event(&PointerEvent::moved(1, 100.0, 0.0));
        follower.tick();
        assert!((follower.rendered().unwrap().x - 20.0).abs() < 1e-9);

        follower.tick();
        assert!((follower.rendered().unwrap().x - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_without_target_is_noop_but_reschedules() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();

        assert!(follower.tick());
        assert!(follower.rendered().is_none());
        assert!(surface.positions().is_empty());
    }

    #[test]
    fn test_tick_before_start_does_not_run() {
        let (mut follower, _surface) = follower_with_surface(FollowerConfig::default());
        assert!(!follower.tick());
    }

    #[test]
    fn test_stop_before_start_is_safe() {
        let (mut follower, _surface) = follower_with_surface(FollowerConfig::default());
        follower.stop();
        follower.stop();
        assert!(!follower.is_running());
    }

    #[test]
    fn test_destroy_twice_is_idempotent() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();
        assert!(surface.is_attached());

        follower.destroy();
        follower.destroy();

        assert!(!surface.is_attached());
        assert_eq!(surface.detach_count(), 1);
        assert!(!follower.tick());
    }

    #[test]
    fn test_destroy_never_started_is_noop() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.destroy();
        assert_eq!(surface.detach_count(), 0);
        assert_eq!(surface.attach_count(), 0);
    }

    #[test]
    fn test_refresh_resets_smoothing_state() {
        let (mut follower, _surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();

        follower.handle_event(&PointerEvent::moved(0, 500.0, 500.0));
        follower.tick();
        assert!(follower.rendered().is_some());

        follower.refresh().unwrap();
        assert!(follower.rendered().is_none());
        assert!(follower.state().target.is_none());

        // After refresh the next move snaps again, with no pull toward the
        // pre-refresh position.
        follower.handle_event(&PointerEvent::moved(1, 10.0, 10.0));
        follower.tick();
        assert_eq!(follower.rendered(), Some(Point2D::new(10.0, 10.0)));
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        let first = follower.start().unwrap();
        let second = follower.start().unwrap();

        follower.handle_event(&PointerEvent::moved(0, 1.0, 1.0));
        assert!(follower.tick());

        first.cancel();
        assert!(second.is_cancelled());
        assert!(!follower.tick());
        assert_eq!(surface.attach_count(), 1);
    }

    #[test]
    fn test_hover_classes_follow_interactivity() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();

        // Over a span nested in a link: hover goes on.
        follower.handle_event(&PointerEvent::over(0, NodeId(3)));
        assert!(surface.last_classes().unwrap().hover);

        // Out through the same link: hover goes off.
        follower.handle_event(&PointerEvent::out(1, NodeId(3)));
        assert!(!surface.last_classes().unwrap().hover);

        // Over a plain paragraph: no class change at all.
        let changes_before = surface.class_changes().len();
        follower.handle_event(&PointerEvent::over(2, NodeId(4)));
        assert_eq!(surface.class_changes().len(), changes_before);
    }

    #[test]
    fn test_malformed_selector_keeps_tracking_without_hover() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig {
            interactive_selector: "[unclosed".to_string(),
            ..Default::default()
        });
        follower.start().unwrap();

        follower.handle_event(&PointerEvent::over(0, NodeId(3)));
        assert!(!follower.state().hovering);

        follower.handle_event(&PointerEvent::moved(1, 40.0, 40.0));
        assert!(follower.tick());
        assert_eq!(surface.last_position(), Some(Point2D::new(40.0, 40.0)));
    }

    #[test]
    fn test_visibility_classes() {
        let (mut follower, surface) = follower_with_surface(FollowerConfig::default());
        follower.start().unwrap();

        // Initial class set is hidden.
        assert!(surface.last_classes().unwrap().hidden);

        follower.handle_event(&PointerEvent::moved(0, 5.0, 5.0));
        assert!(!surface.last_classes().unwrap().hidden);

        follower.handle_event(&PointerEvent::leave_viewport(1));
        assert!(surface.last_classes().unwrap().hidden);

        follower.handle_event(&PointerEvent::moved(2, 6.0, 6.0));
        assert!(!surface.last_classes().unwrap().hidden);
    }

    #[test]
    fn test_out_of_range_factor_is_clamped() {
        let (follower, _surface) = follower_with_surface(FollowerConfig {
            smoothing_factor: 7.5,
            ..Default::default()
        });
        assert!(follower.smoothing_factor() <= MAX_SMOOTHING);
    }
}
