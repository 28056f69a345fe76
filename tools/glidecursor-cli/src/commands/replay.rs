//! Replay a trace through the follower and write the smoothed path.

use std::path::PathBuf;

use glidecursor_common::clock::SessionClock;
use glidecursor_follower::driver::{replay, ReplayConfig};
use glidecursor_follower::follower::{CursorFollower, FollowerConfig};
use glidecursor_follower::surface::RecordingSurface;
use glidecursor_pointer_model::event::{
    parse_trace, parse_trace_header, serialize_trace, PointerEvent, TraceHeader,
};
use glidecursor_pointer_model::geometry::Point2D;
use glidecursor_pointer_model::node::NodeTree;

pub fn run(
    trace: PathBuf,
    output: Option<PathBuf>,
    nodes: Option<PathBuf>,
    fps: u32,
    factor: f64,
    selector: String,
    tail: u32,
) -> anyhow::Result<()> {
    println!("Replaying trace: {}", trace.display());

    let content = std::fs::read_to_string(&trace)
        .map_err(|_| anyhow::anyhow!("Trace file not found: {}", trace.display()))?;
    let header = parse_trace_header(&content);
    let events =
        parse_trace(&content).map_err(|e| anyhow::anyhow!("Failed to parse trace: {e}"))?;
    println!("  Loaded {} events", events.len());

    let tree = match nodes {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|_| anyhow::anyhow!("Element tree not found: {}", path.display()))?;
            let tree: NodeTree = serde_json::from_str(&json)
                .map_err(|e| anyhow::anyhow!("Failed to parse element tree: {e}"))?;
            println!("  Loaded element tree with {} nodes", tree.len());
            tree
        }
        None => NodeTree::new(),
    };

    let surface = RecordingSurface::new();
    let mut follower = CursorFollower::new(
        FollowerConfig {
            smoothing_factor: factor,
            interactive_selector: selector,
        },
        tree,
        Box::new(surface.clone()),
    );

    let report = replay(
        &mut follower,
        &events,
        &ReplayConfig {
            frame_rate_hz: fps,
            tail_frames: tail,
        },
    )
    .map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;

    println!(
        "  Ran {} frames at {fps} Hz, applied {} events",
        report.frames, report.events_applied
    );

    let last_target = events.iter().rev().find_map(|event| event.position());
    if let (Some(final_position), Some((x, y))) = (report.final_position(), last_target) {
        println!(
            "  Final lag: {:.3} px",
            final_position.distance_to(&Point2D::new(x, y))
        );
    }

    // Write the smoothed path as a move-event trace.
    let smoothed: Vec<PointerEvent> = report
        .samples
        .iter()
        .map(|sample| PointerEvent::moved(sample.timestamp_ns, sample.position.x, sample.position.y))
        .collect();

    let out_header = header.unwrap_or_else(|| {
        let clock = SessionClock::start();
        TraceHeader::new(clock.epoch_wall(), 0.0, 0.0)
    });

    let out_path = output.unwrap_or_else(|| trace.with_extension("smoothed.jsonl"));
    std::fs::write(&out_path, serialize_trace(&out_header, &smoothed)?)?;
    println!("  Smoothed trace written to: {}", out_path.display());

    Ok(())
}
