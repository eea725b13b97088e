//! Core synchronization engine.
//!
//! Coordinates the simulation clock, phase model, zone classifier, and
//! breaker timer behind a single mutex. Two writers exist: the periodic
//! tick path and the one-shot breaker delay thread; everything else reads
//! snapshots.

pub mod breaker;
pub mod clock;
pub mod phase;
pub mod quantize;
pub mod zones;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

pub use breaker::{BreakerCommand, BreakerTimer, CommandOutcome};
pub use clock::SimClock;
pub use phase::{compute_phase, Direction, PhaseSample, RotationTracker};
pub use quantize::{quantize, ClosingTimeSetting};
pub use zones::{angular_distance, classify, SyncZoneState};

use crate::config::ScopeConfig;
use crate::error::SyncResult;

/// Simulation time representation.
///
/// Fixed-point nanoseconds from simulation start, for reproducibility
/// across platforms. Non-negative by construction: the clock derives it
/// from frame index and interval, neither of which can be negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime {
    /// Time in nanoseconds from simulation start.
    nanos: u64,
}

impl SimTime {
    /// Zero time (simulation start).
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from seconds.
    ///
    /// # Panics
    ///
    /// Panics if seconds is negative or not finite.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        assert!(secs >= 0.0, "SimTime cannot be negative");
        assert!(secs.is_finite(), "SimTime must be finite");
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (secs * 1_000_000_000.0) as u64;
        Self { nanos }
    }

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Get time as seconds (f64).
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Get time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s", self.as_secs_f64())
    }
}

/// Discrete operator commands, one per control on the panel.
///
/// The UI layer translates raw input events into these; nothing else
/// mutates engine state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OperatorCommand {
    /// Set the generator frequency, clamped to the configured range.
    SetGeneratorFrequency(f64),
    /// Set the breaker closing-time slider percent, clamped to `[0, 100]`.
    SetClosingPercent(f64),
    /// Freeze simulated time.
    Pause,
    /// Unfreeze simulated time.
    Resume,
    /// Flip between paused and running.
    TogglePause,
    /// Zero elapsed time, clear the rotation log, restore operator inputs
    /// to their initial values, and cancel any pending breaker command.
    Reset,
    /// Clear the rotation log only.
    ClearRotations,
    /// Issue a breaker-close command; resolves after the closing delay of
    /// wall-clock time.
    CloseBreaker,
}

/// Read-only view of the engine for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeSnapshot {
    /// Elapsed simulated time.
    pub elapsed: SimTime,
    /// Whether the clock is paused.
    pub paused: bool,
    /// Fixed grid frequency in Hz.
    pub grid_freq_hz: f64,
    /// Current generator frequency in Hz.
    pub gen_freq_hz: f64,
    /// Most recent phase sample.
    pub phase: PhaseSample,
    /// Sync-zone memberships for the most recent sample.
    pub zones: SyncZoneState,
    /// Most recent full-rotation timestamps, oldest first.
    pub rotations: Vec<f64>,
    /// Current breaker closing-time setting.
    pub closing: ClosingTimeSetting,
    /// Most recent breaker command, if any.
    pub breaker: Option<BreakerCommand>,
}

/// Everything behind the mutex.
#[derive(Debug)]
struct ScopeInner {
    config: ScopeConfig,
    clock: SimClock,
    tracker: RotationTracker,
    timer: BreakerTimer,
    gen_freq_hz: f64,
    closing: ClosingTimeSetting,
    phase: PhaseSample,
    zones: SyncZoneState,
}

impl ScopeInner {
    fn new(config: ScopeConfig) -> Self {
        let clock = SimClock::new(config.tick.interval_ms);
        let gen_freq_hz = config.generator.initial_hz;
        let closing = quantize(config.breaker.initial_percent);
        let phase = compute_phase(SimTime::ZERO, config.grid.frequency_hz, gen_freq_hz);
        let zones = classify(phase.phase_deg);

        Self {
            config,
            clock,
            tracker: RotationTracker::new(),
            timer: BreakerTimer::new(),
            gen_freq_hz,
            closing,
            phase,
            zones,
        }
    }

    /// Recompute phase and zones at the current elapsed time.
    fn sample_now(&self) -> (PhaseSample, SyncZoneState) {
        let sample = compute_phase(
            self.clock.elapsed(),
            self.config.grid.frequency_hz,
            self.gen_freq_hz,
        );
        (sample, classify(sample.phase_deg))
    }

    fn advance(&mut self, frame_index: u64) {
        if let Some(elapsed) = self.clock.tick(frame_index) {
            let (sample, zones) = self.sample_now();
            self.tracker.observe(sample.phase_deg, elapsed);
            self.phase = sample;
            self.zones = zones;
        }
    }

    /// Resolve the breaker command for `epoch` at the phase it finds now.
    fn fire_breaker(&mut self, epoch: u64) {
        let (sample, zones) = self.sample_now();
        let success = zones.within_5;

        if self.timer.resolve(epoch, success) {
            self.clock.pause();
            self.phase = sample;
            self.zones = zones;
            info!(
                phase_deg = sample.phase_deg,
                phase_error_deg = sample.phase_error_deg,
                success,
                "breaker command fired"
            );
        } else {
            debug!(epoch, "stale breaker firing ignored");
        }
    }

    fn reset(&mut self) {
        self.clock.reset();
        self.tracker.reset();
        self.timer.cancel();
        self.gen_freq_hz = self.config.generator.initial_hz;
        self.closing = quantize(self.config.breaker.initial_percent);
        let (sample, zones) = self.sample_now();
        self.phase = sample;
        self.zones = zones;
        info!("simulation reset");
    }

    fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            elapsed: self.clock.elapsed(),
            paused: self.clock.is_paused(),
            grid_freq_hz: self.config.grid.frequency_hz,
            gen_freq_hz: self.gen_freq_hz,
            phase: self.phase,
            zones: self.zones,
            rotations: self.tracker.tail(self.config.rotation_tail).to_vec(),
            closing: self.closing,
            breaker: self.timer.command().copied(),
        }
    }
}

/// The synchroscope engine.
///
/// Cheap to clone; clones share the same state. The breaker delay thread
/// holds only a weak handle, so dropping every `Synchroscope` lets an
/// in-flight firing lapse harmlessly.
#[derive(Debug, Clone)]
pub struct Synchroscope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl Synchroscope {
    /// Create an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: ScopeConfig) -> SyncResult<Self> {
        config.validate()?;
        config.validate_semantic()?;

        Ok(Self {
            inner: Arc::new(Mutex::new(ScopeInner::new(config))),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ScopeInner> {
        // A poisoned lock only means a panicking test thread; the state
        // itself is a plain value, safe to keep using.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance the simulation to the given animation frame.
    ///
    /// No-op while paused. Returns the post-tick snapshot either way.
    pub fn tick(&self, frame_index: u64) -> ScopeSnapshot {
        let mut inner = self.lock();
        inner.advance(frame_index);
        inner.snapshot()
    }

    /// Apply an operator command.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SyncError::CommandPending`] when `CloseBreaker` is
    /// issued while a previous close command is still in flight. All other
    /// commands are infallible; out-of-range inputs are clamped.
    pub fn apply(&self, command: OperatorCommand) -> SyncResult<()> {
        match command {
            OperatorCommand::SetGeneratorFrequency(hz) => {
                let mut inner = self.lock();
                let (min, max) = (inner.config.generator.min_hz, inner.config.generator.max_hz);
                inner.gen_freq_hz = hz.clamp(min, max);
            }
            OperatorCommand::SetClosingPercent(percent) => {
                let mut inner = self.lock();
                inner.closing = quantize(percent.clamp(0.0, 100.0));
            }
            OperatorCommand::Pause => self.lock().clock.pause(),
            OperatorCommand::Resume => self.lock().clock.resume(),
            OperatorCommand::TogglePause => self.lock().clock.toggle_pause(),
            OperatorCommand::Reset => self.lock().reset(),
            OperatorCommand::ClearRotations => self.lock().tracker.clear_log(),
            OperatorCommand::CloseBreaker => self.issue_breaker_command()?,
        }
        Ok(())
    }

    /// Read the current state without advancing it.
    #[must_use]
    pub fn snapshot(&self) -> ScopeSnapshot {
        self.lock().snapshot()
    }

    /// Issue the breaker-close command and start its wall-clock delay.
    fn issue_breaker_command(&self) -> SyncResult<()> {
        let (epoch, delay) = {
            let mut inner = self.lock();
            let issued_at = inner.clock.elapsed();
            let closing_ms = inner.closing.closing_time_ms;
            let epoch = inner.timer.issue(issued_at, closing_ms)?;
            info!(closing_ms, epoch, "breaker close command issued");
            (epoch, Duration::from_secs_f64(closing_ms / 1000.0))
        };

        let weak: Weak<Mutex<ScopeInner>> = Arc::downgrade(&self.inner);
        std::thread::spawn(move || {
            // Real time, deliberately decoupled from the simulation clock:
            // the delay elapses even while the simulation is paused.
            std::thread::sleep(delay);
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .fire_breaker(epoch);
            }
        });

        Ok(())
    }
}
