//! Breaker-close command bookkeeping.
//!
//! A close command resolves a fixed wall-clock delay after it is issued,
//! independent of simulated time and of pause state. This module tracks the
//! single in-flight command; the actual delay thread lives in the engine
//! façade. Every issued command carries an epoch so that a firing whose
//! epoch no longer matches (reset happened in between) is ignored instead
//! of mutating state it no longer owns.

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;
use crate::error::{SyncError, SyncResult};

/// Outcome of a breaker-close command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The closing delay has not elapsed yet.
    Pending,
    /// The breaker closed inside the narrow sync window.
    Success,
    /// The breaker closed out of sync.
    Failure,
}

impl std::fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A breaker-close command, at most one in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakerCommand {
    /// Simulated time at which the command was issued.
    pub issued_at: SimTime,
    /// Wall-clock delay before the breaker contacts close, in ms.
    pub closing_time_ms: f64,
    /// Current outcome.
    pub outcome: CommandOutcome,
    /// Epoch the command belongs to; stale firings carry an older epoch.
    epoch: u64,
}

impl BreakerCommand {
    /// Epoch the command was issued under.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Tracks the in-flight breaker command and its cancellation epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakerTimer {
    /// Monotonic epoch counter; bumped on every issue and every cancel.
    epoch: u64,
    /// The most recent command, if any. Stays visible after resolution so
    /// the operator can read the verdict.
    command: Option<BreakerCommand>,
}

impl BreakerTimer {
    /// Create a timer with no command history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new close command.
    ///
    /// Returns the epoch the delay thread must present when it fires.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::CommandPending`] if a command is still awaiting
    /// its delay; a close command is committed once issued and cannot be
    /// replaced.
    pub fn issue(&mut self, issued_at: SimTime, closing_time_ms: f64) -> SyncResult<u64> {
        if let Some(cmd) = &self.command {
            if cmd.outcome == CommandOutcome::Pending {
                return Err(SyncError::CommandPending {
                    issued_at_secs: cmd.issued_at.as_secs_f64(),
                });
            }
        }

        self.epoch += 1;
        self.command = Some(BreakerCommand {
            issued_at,
            closing_time_ms,
            outcome: CommandOutcome::Pending,
            epoch: self.epoch,
        });

        Ok(self.epoch)
    }

    /// Resolve the pending command for the given epoch.
    ///
    /// Returns `true` if the command was resolved, `false` if the firing
    /// was stale (epoch mismatch or nothing pending).
    pub fn resolve(&mut self, epoch: u64, success: bool) -> bool {
        match &mut self.command {
            Some(cmd) if cmd.epoch == epoch && cmd.outcome == CommandOutcome::Pending => {
                cmd.outcome = if success {
                    CommandOutcome::Success
                } else {
                    CommandOutcome::Failure
                };
                true
            }
            _ => false,
        }
    }

    /// Cancel any in-flight command and invalidate its epoch.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.command = None;
    }

    /// Whether a command is awaiting its closing delay.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.command
            .as_ref()
            .is_some_and(|cmd| cmd.outcome == CommandOutcome::Pending)
    }

    /// The most recent command, resolved or not.
    #[must_use]
    pub const fn command(&self) -> Option<&BreakerCommand> {
        self.command.as_ref()
    }
}
