//! Drivers for the follower render loop.
//!
//! The follower itself is synchronous; these drivers supply the loop.
//! [`replay`] executes a recorded trace in virtual time and is fully
//! deterministic. [`LiveDriver`] polls a [`PointerSource`] against the wall
//! clock at a fixed frame rate.

use glidecursor_common::clock::{FramePacer, SessionClock};
use glidecursor_common::error::GlideResult;
use glidecursor_pointer_model::event::PointerEvent;
use glidecursor_pointer_model::geometry::Point2D;

use crate::cancel::CancelToken;
use crate::follower::CursorFollower;
use crate::source::PointerSource;
use crate::state::StyleClasses;

/// Replay parameters.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Virtual frame rate (Hz).
    pub frame_rate_hz: u32,

    /// Extra frames to run after the last event, letting the rendered
    /// position settle onto the final target.
    pub tail_frames: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            tail_frames: 120,
        }
    }
}

/// What one render frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Virtual time of the frame (ns since replay start).
    pub timestamp_ns: u64,

    /// Rendered position after the frame.
    pub position: Point2D,

    /// Class set in effect at the frame.
    pub classes: StyleClasses,
}

/// Summary of a completed replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// One sample per frame that rendered a position. Frames before the
    /// first move event render nothing and produce no sample.
    pub samples: Vec<FrameSample>,

    /// Total frames run, including no-op frames.
    pub frames: u64,

    /// Events delivered to the follower.
    pub events_applied: usize,
}

impl ReplayReport {
    /// The final rendered position, if any frame rendered one.
    pub fn final_position(&self) -> Option<Point2D> {
        self.samples.last().map(|sample| sample.position)
    }
}

/// Replay a trace through a follower in deterministic virtual time.
///
/// Events are applied in order once their timestamp is due; events sharing
/// a frame window are all applied before that frame ticks, so the frame
/// observes only the latest target (last write wins). The loop runs until
/// the trace is exhausted plus `tail_frames`, or until the follower is
/// cancelled.
pub fn replay(
    follower: &mut CursorFollower,
    events: &[PointerEvent],
    config: &ReplayConfig,
) -> GlideResult<ReplayReport> {
    let interval_ns = FramePacer::new(config.frame_rate_hz).interval_ns();
    follower.start()?;

    let mut samples = Vec::new();
    let mut frames = 0u64;
    let mut events_applied = 0usize;
    let mut next_event = 0usize;
    let mut tail_remaining = config.tail_frames;
    let mut now_ns = 0u64;

    loop {
        while next_event < events.len() && events[next_event].timestamp_ns <= now_ns {
            follower.handle_event(&events[next_event]);
            next_event += 1;
            events_applied += 1;
        }

        if !follower.tick() {
            break;
        }
        frames += 1;

        if let Some(position) = follower.rendered() {
            samples.push(FrameSample {
                timestamp_ns: now_ns,
                position,
                classes: follower.state().classes(),
            });
        }

        if next_event >= events.len() {
            if tail_remaining == 0 {
                break;
            }
            tail_remaining -= 1;
        }

        now_ns += interval_ns;
    }

    follower.stop();
    tracing::debug!(events = events_applied, frames, "trace replay complete");

    Ok(ReplayReport {
        samples,
        frames,
        events_applied,
    })
}

/// Wall-clock driver polling a pointer source.
pub struct LiveDriver {
    follower: CursorFollower,
    source: Box<dyn PointerSource>,
    frame_rate_hz: u32,
    stop_flag: CancelToken,
    frames: u64,
    events: u64,
}

impl LiveDriver {
    /// Create a driver over a follower and an event source.
    pub fn new(follower: CursorFollower, source: Box<dyn PointerSource>, frame_rate_hz: u32) -> Self {
        Self {
            follower,
            source,
            frame_rate_hz,
            stop_flag: CancelToken::new(),
            frames: 0,
            events: 0,
        }
    }

    /// A handle that stops the loop from another task.
    pub fn stop_handle(&self) -> CancelToken {
        self.stop_flag.clone()
    }

    pub fn follower(&self) -> &CursorFollower {
        &self.follower
    }

    pub fn follower_mut(&mut self) -> &mut CursorFollower {
        &mut self.follower
    }

    /// Run until the stop handle fires or the follower is torn down.
    /// Returns the number of frames run.
    pub async fn run(&mut self) -> GlideResult<u64> {
        self.follower.start()?;
        let clock = SessionClock::start();
        let mut pacer = FramePacer::new(self.frame_rate_hz);

        tracing::info!(
            source = %self.source.name(),
            fps = self.frame_rate_hz,
            "live follower started"
        );

        while !self.stop_flag.is_cancelled() {
            match self.source.poll() {
                Ok(Some(event)) => {
                    self.follower.handle_event(&event);
                    self.events += 1;
                    // Drain the source before spending time on a frame.
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "pointer source error");
                }
            }

            if pacer.frame_due(clock.elapsed_ns()) {
                if !self.follower.tick() {
                    break;
                }
                self.frames += 1;
            } else {
                // Idle until the next event or frame is plausible.
                tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
            }
        }

        self.follower.stop();
        tracing::info!(frames = self.frames, events = self.events, "live follower stopped");
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::follower::FollowerConfig;
    use crate::source::QueueSource;
    use crate::surface::RecordingSurface;
    use glidecursor_pointer_model::node::NodeTree;

    fn fresh_follower(factor: f64) -> (CursorFollower, RecordingSurface) {
        let surface = RecordingSurface::new();
        let follower = CursorFollower::new(
            FollowerConfig {
                smoothing_factor: factor,
                ..Default::default()
            },
            NodeTree::new(),
            Box::new(surface.clone()),
        );
        (follower, surface)
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = vec![
            PointerEvent::moved(0, 0.0, 0.0),
            PointerEvent::moved(50_000_000, 300.0, 200.0),
            PointerEvent::moved(120_000_000, 500.0, 100.0),
        ];
        let config = ReplayConfig::default();

        let (mut first, _) = fresh_follower(0.18);
        let (mut second, _) = fresh_follower(0.18);
        let report_a = replay(&mut first, &events, &config).unwrap();
        let report_b = replay(&mut second, &events, &config).unwrap();

        assert_eq!(report_a.samples, report_b.samples);
        assert_eq!(report_a.frames, report_b.frames);
    }

    #[test]
    fn test_replay_applies_due_events_before_frame() {
        // Two moves are due at the same frame: the frame must only observe
        // the later one.
        let events = vec![
            PointerEvent::moved(0, 10.0, 10.0),
            PointerEvent::moved(0, 900.0, 900.0),
        ];
        let (mut follower, _) = fresh_follower(0.18);
        let report = replay(
            &mut follower,
            &events,
            &ReplayConfig {
                tail_frames: 0,
                ..Default::default()
            },
        )
        .unwrap();

        // First frame snaps straight to the latest target.
        assert_eq!(report.samples[0].position, Point2D::new(900.0, 900.0));
    }

    #[test]
    fn test_replay_settles_on_final_target() {
        let events = vec![
            PointerEvent::moved(0, 0.0, 0.0),
            PointerEvent::moved(100_000_000, 640.0, 360.0),
        ];
        let (mut follower, _) = fresh_follower(0.18);
        let report = replay(&mut follower, &events, &ReplayConfig::default()).unwrap();

        let last = report.final_position().unwrap();
        assert!(last.within(&Point2D::new(640.0, 360.0), 0.5));
    }

    #[test]
    fn test_replay_empty_trace_renders_nothing() {
        let (mut follower, surface) = fresh_follower(0.18);
        let report = replay(&mut follower, &[], &ReplayConfig::default()).unwrap();
        assert!(report.samples.is_empty());
        assert!(report.frames > 0);
        assert!(surface.positions().is_empty());
    }

    #[tokio::test]
    async fn test_live_driver_stops_on_handle() {
        let (follower, surface) = fresh_follower(0.5);
        let source = QueueSource::new();
        let events = source.handle();
        let mut driver = LiveDriver::new(follower, Box::new(source), 240);
        let stop = driver.stop_handle();

        events.push(PointerEvent::moved(0, 50.0, 80.0));
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            stop.cancel();
        });

        let frames = driver.run().await.unwrap();
        assert!(frames >= 1);
        let rendered = surface.last_position().unwrap();
        // Enough frames at factor 0.5 to be effectively on target.
        assert!(rendered.within(&Point2D::new(50.0, 80.0), 1.0));
    }
}
