//! Session clock and frame pacing.
//!
//! The follower render loop and trace playback are both anchored to a
//! monotonic epoch captured when a session starts. This module provides:
//! - The session epoch and elapsed-time queries
//! - A frame pacer that decides when the next render tick is due

use std::time::Instant;

/// Monotonic clock anchored to the moment a follower session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string), recorded for trace headers.
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * 1_000_000_000.0) as u64
    }
}

/// Decides when the next render frame is due for a target refresh rate.
///
/// The pacer is time-base agnostic: callers feed it timestamps, so the same
/// pacer drives both virtual-time replay and live wall-clock loops.
#[derive(Debug)]
pub struct FramePacer {
    frame_interval_ns: u64,
    last_frame_ns: Option<u64>,
}

impl FramePacer {
    /// Create a pacer targeting the given refresh rate in Hz.
    ///
    /// A zero rate is treated as 60 Hz rather than dividing by zero.
    pub fn new(target_hz: u32) -> Self {
        let hz = if target_hz == 0 { 60 } else { target_hz };
        Self {
            frame_interval_ns: 1_000_000_000 / hz as u64,
            last_frame_ns: None,
        }
    }

    /// Whether a frame is due at `now_ns`. Advances internal state when it is.
    /// The very first call always fires.
    pub fn frame_due(&mut self, now_ns: u64) -> bool {
        match self.last_frame_ns {
            None => {
                self.last_frame_ns = Some(now_ns);
                true
            }
            Some(last) if now_ns >= last + self.frame_interval_ns => {
                self.last_frame_ns = Some(now_ns);
                true
            }
            _ => false,
        }
    }

    /// Timestamp of the next due frame, given the pacer's current state.
    /// Before the first frame this is "immediately", i.e. `now_ns` itself.
    pub fn next_frame_ns(&self, now_ns: u64) -> u64 {
        match self.last_frame_ns {
            None => now_ns,
            Some(last) => last + self.frame_interval_ns,
        }
    }

    /// Frame interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.frame_interval_ns
    }

    /// Forget pacing state so the next `frame_due` call fires immediately.
    pub fn reset(&mut self) {
        self.last_frame_ns = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed_is_fresh() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000); // less than 1 second
    }

    #[test]
    fn test_ns_secs_conversions() {
        assert!((SessionClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(SessionClock::secs_to_ns(2.0), 2_000_000_000);
    }

    #[test]
    fn test_pacer_first_frame_fires_immediately() {
        let mut pacer = FramePacer::new(60);
        assert!(pacer.frame_due(0));
        assert!(!pacer.frame_due(1_000_000)); // 1ms later, too soon
        assert!(pacer.frame_due(17_000_000)); // 60Hz interval is ~16.67ms
    }

    #[test]
    fn test_pacer_next_frame() {
        let mut pacer = FramePacer::new(100);
        assert_eq!(pacer.next_frame_ns(5), 5);
        assert!(pacer.frame_due(0));
        assert_eq!(pacer.next_frame_ns(0), 10_000_000);
    }

    #[test]
    fn test_pacer_reset_rearms_first_frame() {
        let mut pacer = FramePacer::new(60);
        assert!(pacer.frame_due(0));
        assert!(!pacer.frame_due(1));
        pacer.reset();
        assert!(pacer.frame_due(2));
    }

    #[test]
    fn test_pacer_zero_hz_falls_back() {
        let pacer = FramePacer::new(0);
        assert_eq!(pacer.interval_ns(), 1_000_000_000 / 60);
    }
}
