//! Report lag and convergence statistics for a trace.

use std::path::PathBuf;

use glidecursor_follower::driver::{replay, ReplayConfig};
use glidecursor_follower::follower::{CursorFollower, FollowerConfig};
use glidecursor_follower::surface::RecordingSurface;
use glidecursor_pointer_model::event::{parse_trace, PointerEventKind};
use glidecursor_pointer_model::geometry::Point2D;
use glidecursor_pointer_model::node::NodeTree;

/// Frames to run past the end of input when measuring convergence.
const SETTLE_FRAMES: u32 = 600;

pub fn run(trace: PathBuf, fps: u32, factor: f64, epsilon: f64) -> anyhow::Result<()> {
    println!("Analyzing trace: {}", trace.display());

    let content = std::fs::read_to_string(&trace)
        .map_err(|_| anyhow::anyhow!("Trace file not found: {}", trace.display()))?;
    let events =
        parse_trace(&content).map_err(|e| anyhow::anyhow!("Failed to parse trace: {e}"))?;

    let targets: Vec<(u64, Point2D)> = events
        .iter()
        .filter_map(|event| match &event.kind {
            PointerEventKind::Move { x, y } => Some((event.timestamp_ns, Point2D::new(*x, *y))),
            _ => None,
        })
        .collect();

    let Some(&(last_input_ns, final_target)) = targets.last() else {
        println!("  No pointer movement in trace; nothing to measure.");
        return Ok(());
    };

    let surface = RecordingSurface::new();
    let mut follower = CursorFollower::new(
        FollowerConfig {
            smoothing_factor: factor,
            ..Default::default()
        },
        NodeTree::new(),
        Box::new(surface.clone()),
    );

    let report = replay(
        &mut follower,
        &events,
        &ReplayConfig {
            frame_rate_hz: fps,
            tail_frames: SETTLE_FRAMES,
        },
    )
    .map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;

    // Lag while input is live: distance from the rendered position to the
    // target current at each frame.
    let mut target_index = 0usize;
    let mut live_lags: Vec<f64> = Vec::new();
    let mut settle_frames: Option<u64> = None;
    let mut frames_past_input = 0u64;

    for sample in &report.samples {
        while target_index + 1 < targets.len() && targets[target_index + 1].0 <= sample.timestamp_ns
        {
            target_index += 1;
        }
        let target = targets[target_index].1;

        if sample.timestamp_ns <= last_input_ns {
            live_lags.push(sample.position.distance_to(&target));
        } else {
            frames_past_input += 1;
            if settle_frames.is_none() && sample.position.within(&final_target, epsilon) {
                settle_frames = Some(frames_past_input);
            }
        }
    }

    let mean_lag = live_lags.iter().sum::<f64>() / live_lags.len().max(1) as f64;
    let max_lag = live_lags.iter().copied().fold(0.0_f64, f64::max);

    println!("  Events: {} ({} moves)", events.len(), targets.len());
    println!("  Frames: {} at {fps} Hz, smoothing {factor}", report.frames);
    println!("  Live lag: mean {mean_lag:.2} px, max {max_lag:.2} px");

    match settle_frames {
        Some(frames) => {
            let millis = frames as f64 * 1000.0 / fps as f64;
            println!("  Converged to within {epsilon} px after {frames} quiet frames ({millis:.0} ms)");
        }
        None => {
            println!(
                "  Did not converge to within {epsilon} px in {SETTLE_FRAMES} quiet frames"
            );
        }
    }

    Ok(())
}
