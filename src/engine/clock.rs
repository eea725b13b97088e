//! Simulation clock management.
//!
//! Owns logical elapsed time and the run/pause/reset state machine. Time is
//! frame-indexed: each tick sets `elapsed = frame_index · interval`, so the
//! clock has no cumulative drift and scrubbing the frame sequence is exact.

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;

/// Simulation clock.
///
/// The animation driver keeps ticking while paused; `tick` simply becomes a
/// no-op, so elapsed time is frozen rather than the scheduler cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Tick interval in milliseconds.
    interval_ms: f64,
    /// Elapsed simulated time.
    elapsed: SimTime,
    /// Whether ticks are currently no-ops.
    paused: bool,
}

impl SimClock {
    /// Create a clock with the given tick interval in milliseconds.
    ///
    /// # Panics
    ///
    /// Panics if the interval is not positive and finite.
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        assert!(interval_ms > 0.0, "tick interval must be positive");
        assert!(interval_ms.is_finite(), "tick interval must be finite");

        Self {
            interval_ms,
            elapsed: SimTime::ZERO,
            paused: false,
        }
    }

    /// Advance to the given frame index.
    ///
    /// Returns the new elapsed time, or `None` while paused (the frame is
    /// ignored and elapsed time stays frozen).
    pub fn tick(&mut self, frame_index: u64) -> Option<SimTime> {
        if self.paused {
            return None;
        }

        self.elapsed = SimTime::from_secs(frame_index as f64 * self.interval_ms / 1000.0);
        Some(self.elapsed)
    }

    /// Current elapsed simulated time.
    #[must_use]
    pub const fn elapsed(&self) -> SimTime {
        self.elapsed
    }

    /// Tick interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether the clock is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze elapsed time. Idempotent.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreeze elapsed time. Idempotent.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Reset logical time to zero and leave the clock running.
    ///
    /// Restarting the frame sequence of the animation driver is the
    /// caller's concern; the clock only resets its own state.
    pub fn reset(&mut self) {
        self.elapsed = SimTime::ZERO;
        self.paused = false;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        // 50 ms frame interval, as the reference synchroscope runs
        Self::new(50.0)
    }
}
