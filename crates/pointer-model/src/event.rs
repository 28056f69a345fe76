//! Pointer event types for the Glidecursor trace stream.
//!
//! Traces are stored as JSONL: a `#`-prefixed header line followed by one
//! event object per line. Coordinates are viewport pixels with the origin at
//! the top-left corner.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// A single timestamped pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: PointerEventKind,
}

/// Discriminated union of pointer event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer position update.
    Move {
        /// X coordinate in viewport pixels.
        x: f64,
        /// Y coordinate in viewport pixels.
        y: f64,
    },

    /// Pointer button press or release.
    Button {
        /// Which button changed state.
        button: PointerButton,
        /// Press or release.
        state: ButtonState,
        /// Pointer position at the time of the change.
        x: f64,
        y: f64,
    },

    /// The pointer moved onto an element (or one of its descendants).
    Over {
        /// Element the pointer is now over.
        target: NodeId,
    },

    /// The pointer moved off an element.
    Out {
        /// Element the pointer left.
        target: NodeId,
    },

    /// The pointer entered the viewport.
    EnterViewport,

    /// The pointer left the viewport entirely.
    LeaveViewport,
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    Down,
    Up,
}

/// Trace metadata, written as the first line of a JSONL trace
/// (prefixed with `# `).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (ISO 8601).
    pub epoch_wall: String,

    /// Viewport dimensions in pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// Nominal sampling rate for pointer movement (Hz).
    #[serde(default = "default_sample_rate")]
    pub pointer_sample_rate_hz: u32,
}

fn default_sample_rate() -> u32 {
    60
}

impl TraceHeader {
    /// Current trace schema version.
    pub const SCHEMA_VERSION: &'static str = "1.0";

    pub fn new(epoch_wall: impl Into<String>, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            epoch_wall: epoch_wall.into(),
            viewport_width,
            viewport_height,
            pointer_sample_rate_hz: default_sample_rate(),
        }
    }
}

impl PointerEvent {
    /// Create a move event.
    pub fn moved(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::Move { x, y },
        }
    }

    /// Create a button event.
    pub fn button(
        timestamp_ns: TimestampNs,
        button: PointerButton,
        state: ButtonState,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::Button {
                button,
                state,
                x,
                y,
            },
        }
    }

    /// Create an over event targeting the given element.
    pub fn over(timestamp_ns: TimestampNs, target: NodeId) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::Over { target },
        }
    }

    /// Create an out event for the given element.
    pub fn out(timestamp_ns: TimestampNs, target: NodeId) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::Out { target },
        }
    }

    /// Create a viewport-enter event.
    pub fn enter_viewport(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::EnterViewport,
        }
    }

    /// Create a viewport-leave event.
    pub fn leave_viewport(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: PointerEventKind::LeaveViewport,
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Extract the pointer position if this event carries one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match &self.kind {
            PointerEventKind::Move { x, y } => Some((*x, *y)),
            PointerEventKind::Button { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
/// Header lines (`#`-prefixed) and blank lines are skipped.
pub fn parse_trace(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse the header from the first `# `-prefixed line of a trace, if present.
pub fn parse_trace_header(jsonl: &str) -> Option<TraceHeader> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let payload = first.strip_prefix('#')?.trim();
    serde_json::from_str(payload).ok()
}

/// Serialize a trace to JSONL, with the header as a `# `-prefixed first line.
pub fn serialize_trace(
    header: &TraceHeader,
    events: &[PointerEvent],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&serde_json::to_string(header)?);
    output.push('\n');
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_event_roundtrip() {
        let event = PointerEvent::moved(1_000_000_000, 640.0, 360.0);
        let json = serde_json::to_string(&event).unwrap();
        let parsed: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_button_event_roundtrip() {
        let event = PointerEvent::button(
            2_000_000_000,
            PointerButton::Primary,
            ButtonState::Down,
            100.0,
            200.0,
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_over_out_roundtrip() {
        let over = PointerEvent::over(0, NodeId(7));
        let out = PointerEvent::out(1, NodeId(7));
        for event in [over, out] {
            let json = serde_json::to_string(&event).unwrap();
            let parsed: PointerEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, parsed);
        }
    }

    #[test]
    fn test_json_wire_format() {
        let event = PointerEvent::moved(1234567890123, 12.5, 0.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":1234567890123"));
        assert!(json.contains("\"type\":\"move\""));
        assert!(json.contains("\"x\":12.5"));
    }

    #[test]
    fn test_trace_roundtrip_with_header() {
        let header = TraceHeader::new("2026-01-01T00:00:00Z", 1280.0, 720.0);
        let events = vec![
            PointerEvent::moved(0, 0.0, 0.0),
            PointerEvent::over(50_000_000, NodeId(3)),
            PointerEvent::button(
                100_000_000,
                PointerButton::Primary,
                ButtonState::Down,
                10.0,
                10.0,
            ),
            PointerEvent::leave_viewport(200_000_000),
        ];

        let jsonl = serialize_trace(&header, &events).unwrap();
        assert!(jsonl.starts_with("# "));

        let parsed_header = parse_trace_header(&jsonl).unwrap();
        assert_eq!(parsed_header.viewport_width, 1280.0);
        assert_eq!(parsed_header.schema_version, TraceHeader::SCHEMA_VERSION);

        let parsed = parse_trace(&jsonl).unwrap();
        assert_eq!(parsed, events);
    }

    #[test]
    fn test_parse_trace_skips_header_and_blanks() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"epoch_wall\":\"x\",\
                     \"viewport_width\":800.0,\"viewport_height\":600.0}\n\n\
                     {\"t\":0,\"type\":\"move\",\"x\":1.0,\"y\":2.0}\n";
        let parsed = parse_trace(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].position(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_header_defaults_sample_rate() {
        let raw = r#"{
            "schema_version":"1.0",
            "epoch_wall":"2026-01-01T00:00:00Z",
            "viewport_width":1920.0,
            "viewport_height":1080.0
        }"#;
        let parsed: TraceHeader = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.pointer_sample_rate_hz, 60);
    }

    #[test]
    fn test_position_extraction() {
        let moved = PointerEvent::moved(0, 3.0, 7.0);
        assert_eq!(moved.position(), Some((3.0, 7.0)));

        let over = PointerEvent::over(0, NodeId(1));
        assert_eq!(over.position(), None);

        let leave = PointerEvent::leave_viewport(0);
        assert_eq!(leave.position(), None);
    }

    #[test]
    fn test_timestamp_secs() {
        let event = PointerEvent::moved(1_500_000_000, 0.0, 0.0);
        assert!((event.timestamp_secs() - 1.5).abs() < 1e-9);
    }
}
