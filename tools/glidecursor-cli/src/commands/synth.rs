//! Generate a synthetic pointer trace.

use std::path::PathBuf;

use glidecursor_common::clock::SessionClock;
use glidecursor_pointer_model::event::{
    serialize_trace, ButtonState, PointerButton, PointerEvent, TraceHeader,
};
use glidecursor_pointer_model::geometry::{Bounds, Point2D};

/// Waypoints touring the viewport: corners, center, edge midpoints, and
/// quadrants, ending back at the center.
fn tour_waypoints(bounds: &Bounds) -> Vec<Point2D> {
    let margin = 50.0_f64.min(bounds.width / 4.0).min(bounds.height / 4.0);
    let (w, h) = (bounds.width, bounds.height);
    vec![
        Point2D::new(margin, margin),
        Point2D::new(w - margin, margin),
        Point2D::new(w - margin, h - margin),
        Point2D::new(margin, h - margin),
        bounds.center(),
        Point2D::new(w / 2.0, margin),
        Point2D::new(w - margin, h / 2.0),
        Point2D::new(w / 2.0, h - margin),
        Point2D::new(margin, h / 2.0),
        Point2D::new(w / 4.0, h / 4.0),
        Point2D::new(3.0 * w / 4.0, h / 4.0),
        Point2D::new(3.0 * w / 4.0, 3.0 * h / 4.0),
        Point2D::new(w / 4.0, 3.0 * h / 4.0),
        bounds.center(),
    ]
}

pub fn run(
    output: PathBuf,
    width: f64,
    height: f64,
    sample_rate: u32,
    dwell_ms: u64,
    travel_ms: u64,
    clicks: bool,
) -> anyhow::Result<()> {
    let bounds = Bounds::new(width, height);
    let waypoints = tour_waypoints(&bounds);

    let sample_interval_ns = 1_000_000_000 / sample_rate.max(1) as u64;
    let dwell_ns = dwell_ms * 1_000_000;
    let travel_ns = travel_ms.max(1) * 1_000_000;

    let mut events = Vec::new();
    let mut now_ns = 0u64;

    events.push(PointerEvent::moved(now_ns, waypoints[0].x, waypoints[0].y));

    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);

        // Dwell: hold position, optionally click.
        if clicks {
            events.push(PointerEvent::button(
                now_ns + dwell_ns / 4,
                PointerButton::Primary,
                ButtonState::Down,
                from.x,
                from.y,
            ));
            events.push(PointerEvent::button(
                now_ns + dwell_ns / 2,
                PointerButton::Primary,
                ButtonState::Up,
                from.x,
                from.y,
            ));
        }
        now_ns += dwell_ns;

        // Travel: sample linear motion toward the next waypoint.
        let steps = (travel_ns / sample_interval_ns).max(1);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let position = Point2D::lerp(&from, &to, t);
            events.push(PointerEvent::moved(
                now_ns + step * sample_interval_ns,
                position.x,
                position.y,
            ));
        }
        now_ns += travel_ns;
    }

    let clock = SessionClock::start();
    let mut header = TraceHeader::new(clock.epoch_wall(), bounds.width, bounds.height);
    header.pointer_sample_rate_hz = sample_rate;

    let jsonl = serialize_trace(&header, &events)?;
    std::fs::write(&output, jsonl)?;

    println!("Synthetic trace written to: {}", output.display());
    println!(
        "  {} events over {:.1}s ({} waypoints)",
        events.len(),
        now_ns as f64 / 1e9,
        waypoints.len()
    );

    Ok(())
}
