//! Phase model and rotation tracking.
//!
//! The phase angle is a pure function of elapsed simulated time and the
//! frequency differential, so every sample is reproducible from
//! `(elapsed, Δf)` alone. Wrap events (the vector completing a full
//! revolution) are detected from consecutive samples with a high→low
//! crossing heuristic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::zones;
use crate::engine::SimTime;

/// Rotation direction of the generator vector relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Generator runs fast: vector rotates clockwise.
    Fast,
    /// Generator runs slow: vector rotates counter-clockwise.
    Slow,
    /// Frequencies match: vector stands still.
    InSync,
}

impl Direction {
    /// Derive the direction from a frequency differential in Hz.
    #[must_use]
    pub fn from_freq_diff(freq_diff_hz: f64) -> Self {
        if freq_diff_hz > 0.0 {
            Self::Fast
        } else if freq_diff_hz < 0.0 {
            Self::Slow
        } else {
            Self::InSync
        }
    }

    /// Sign of the rotation: +1 fast, -1 slow, 0 in sync.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Fast => 1,
            Self::Slow => -1,
            Self::InSync => 0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "Fast (Clockwise)"),
            Self::Slow => write!(f, "Slow (Counter-Clockwise)"),
            Self::InSync => write!(f, "In Sync"),
        }
    }
}

/// One instantaneous phase sample, recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSample {
    /// Phase angle in degrees, always in `[0, 360)`.
    pub phase_deg: f64,
    /// Shortest angular distance to the grid reference, in `[0, 180]`.
    pub phase_error_deg: f64,
    /// Frequency differential (generator minus grid) in Hz.
    pub freq_diff_hz: f64,
    /// Rotation direction derived from the differential.
    pub direction: Direction,
}

/// Compute the instantaneous phase sample.
///
/// `phase = 2π · Δf · t`, reduced to `[0, 360)` degrees. Pure: no hidden
/// state, so phase is reproducible from `(elapsed, Δf)` after a reset or
/// scrub.
#[must_use]
pub fn compute_phase(elapsed: SimTime, grid_freq_hz: f64, gen_freq_hz: f64) -> PhaseSample {
    let freq_diff_hz = gen_freq_hz - grid_freq_hz;
    let phase_rad = 2.0 * std::f64::consts::PI * freq_diff_hz * elapsed.as_secs_f64();
    let phase_deg = phase_rad.to_degrees().rem_euclid(360.0);

    PhaseSample {
        phase_deg,
        phase_error_deg: zones::angular_distance(phase_deg, 0.0),
        freq_diff_hz,
        direction: Direction::from_freq_diff(freq_diff_hz),
    }
}

/// Wrap detection threshold: previous sample must be above this angle.
const WRAP_HIGH_DEG: f64 = 300.0;
/// Wrap detection threshold: new sample must be below this angle.
const WRAP_LOW_DEG: f64 = 60.0;

/// Tracks consecutive phase samples and records full-rotation wrap events.
///
/// The heuristic (`prev > 300° ∧ new < 60°`) tolerates discrete tick
/// sampling as long as the per-tick phase advance stays well under 240°.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotationTracker {
    /// Phase of the previous sample in degrees, `[0, 360)`.
    prev_phase_deg: f64,
    /// Timestamps (seconds, 2 decimals) of completed revolutions.
    log: Vec<f64>,
}

impl RotationTracker {
    /// Create a tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a new sample, recording a wrap if one occurred.
    ///
    /// Returns `true` when a full rotation was detected. The wrap timestamp
    /// is the elapsed time rounded to 2 decimal places; the log stays
    /// strictly increasing.
    pub fn observe(&mut self, phase_deg: f64, elapsed: SimTime) -> bool {
        let wrapped = self.prev_phase_deg > WRAP_HIGH_DEG && phase_deg < WRAP_LOW_DEG;
        self.prev_phase_deg = phase_deg;

        if wrapped {
            let stamp = (elapsed.as_secs_f64() * 100.0).round() / 100.0;
            if self.log.last().map_or(true, |&t| stamp > t) {
                debug!(at_secs = stamp, "full rotation");
                self.log.push(stamp);
                return true;
            }
        }

        false
    }

    /// Full rotation log, oldest first.
    #[must_use]
    pub fn log(&self) -> &[f64] {
        &self.log
    }

    /// The last `n` wrap timestamps, oldest first.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }

    /// Phase of the previously observed sample.
    #[must_use]
    pub const fn prev_phase_deg(&self) -> f64 {
        self.prev_phase_deg
    }

    /// Clear the rotation log, keeping the previous-phase cursor.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Reset both the log and the previous-phase cursor.
    pub fn reset(&mut self) {
        self.prev_phase_deg = 0.0;
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_phase_in_sync() {
        let sample = compute_phase(SimTime::from_secs(10.0), 50.0, 50.0);
        assert!(sample.phase_deg.abs() < f64::EPSILON);
        assert!(sample.phase_error_deg.abs() < f64::EPSILON);
        assert_eq!(sample.direction, Direction::InSync);
        assert_eq!(sample.direction.sign(), 0);
    }

    #[test]
    fn test_compute_phase_half_turn() {
        // Δf = 0.1 Hz over 5 s: phase = 2π·0.1·5 = π = 180°
        let sample = compute_phase(SimTime::from_secs(5.0), 50.0, 50.1);
        assert!((sample.phase_deg - 180.0).abs() < 1e-6);
        assert!((sample.phase_error_deg - 180.0).abs() < 1e-6);
        assert_eq!(sample.direction, Direction::Fast);
    }

    #[test]
    fn test_compute_phase_slow_generator() {
        let sample = compute_phase(SimTime::from_secs(1.0), 50.0, 49.5);
        assert_eq!(sample.direction, Direction::Slow);
        assert_eq!(sample.direction.sign(), -1);
        // -0.5 Hz for 1 s is -180°, reduced to 180°
        assert!((sample.phase_deg - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_compute_phase_range() {
        // A long run stays reduced to [0, 360)
        let sample = compute_phase(SimTime::from_secs(1234.5), 50.0, 50.7);
        assert!(sample.phase_deg >= 0.0);
        assert!(sample.phase_deg < 360.0);
    }

    #[test]
    fn test_compute_phase_zero_elapsed() {
        let sample = compute_phase(SimTime::ZERO, 50.0, 50.9);
        assert!(sample.phase_deg.abs() < f64::EPSILON);
        assert_eq!(sample.direction, Direction::Fast);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Fast.to_string(), "Fast (Clockwise)");
        assert_eq!(Direction::Slow.to_string(), "Slow (Counter-Clockwise)");
        assert_eq!(Direction::InSync.to_string(), "In Sync");
    }

    #[test]
    fn test_tracker_detects_wrap() {
        let mut tracker = RotationTracker::new();

        assert!(!tracker.observe(350.0, SimTime::from_secs(9.7)));
        assert!(tracker.observe(10.0, SimTime::from_secs(10.0)));
        assert_eq!(tracker.log(), &[10.0]);
    }

    #[test]
    fn test_tracker_no_wrap_on_small_advance() {
        let mut tracker = RotationTracker::new();

        assert!(!tracker.observe(100.0, SimTime::from_secs(1.0)));
        assert!(!tracker.observe(110.0, SimTime::from_secs(2.0)));
        assert!(tracker.log().is_empty());
    }

    #[test]
    fn test_tracker_wrap_timestamp_rounded() {
        let mut tracker = RotationTracker::new();

        tracker.observe(350.0, SimTime::from_secs(1.0));
        tracker.observe(5.0, SimTime::from_secs(1.23456));
        assert_eq!(tracker.log(), &[1.23]);
    }

    #[test]
    fn test_tracker_fires_once_per_revolution() {
        // Δf = 0.5 Hz, 50 ms ticks: one revolution every 2 s
        let mut tracker = RotationTracker::new();
        let mut wraps = 0;

        for frame in 0..=405u64 {
            let elapsed = SimTime::from_secs(frame as f64 * 0.05);
            let sample = compute_phase(elapsed, 50.0, 50.5);
            if tracker.observe(sample.phase_deg, elapsed) {
                wraps += 1;
            }
        }

        // Just over 20 s at 0.5 Hz differential: 10 revolutions
        assert_eq!(wraps, 10);
        assert_eq!(tracker.log().len(), 10);
    }

    #[test]
    fn test_tracker_log_strictly_increasing() {
        let mut tracker = RotationTracker::new();

        for frame in 0..=1000u64 {
            let elapsed = SimTime::from_secs(frame as f64 * 0.05);
            let sample = compute_phase(elapsed, 50.0, 50.9);
            tracker.observe(sample.phase_deg, elapsed);
        }

        let log = tracker.log();
        assert!(!log.is_empty());
        for pair in log.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_tracker_tail() {
        let mut tracker = RotationTracker::new();

        for i in 1..=8 {
            tracker.observe(350.0, SimTime::from_secs(f64::from(i) * 2.0 - 0.1));
            tracker.observe(5.0, SimTime::from_secs(f64::from(i) * 2.0));
        }

        assert_eq!(tracker.log().len(), 8);
        assert_eq!(tracker.tail(5).len(), 5);
        assert_eq!(tracker.tail(5), &[8.0, 10.0, 12.0, 14.0, 16.0]);
        // Tail larger than the log returns everything
        assert_eq!(tracker.tail(100).len(), 8);
    }

    #[test]
    fn test_tracker_clear_log_keeps_cursor() {
        let mut tracker = RotationTracker::new();

        tracker.observe(350.0, SimTime::from_secs(1.9));
        tracker.observe(10.0, SimTime::from_secs(2.0));
        tracker.clear_log();

        assert!(tracker.log().is_empty());
        assert!((tracker.prev_phase_deg() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = RotationTracker::new();

        tracker.observe(350.0, SimTime::from_secs(1.9));
        tracker.observe(10.0, SimTime::from_secs(2.0));
        tracker.reset();

        assert!(tracker.log().is_empty());
        assert!(tracker.prev_phase_deg().abs() < f64::EPSILON);
    }
}
