//! # synchroscope
//!
//! Phase-synchronization simulation engine for paralleling a rotating
//! generator with a fixed grid reference.
//!
//! The engine advances simulated time frame by frame, computes the
//! instantaneous phase error between the generator vector and the grid,
//! classifies it into nested sync windows (±5°/±10°/±20°), logs full
//! rotations of the vector, and executes deferred breaker-close commands
//! on a wall-clock delay. Rendering is a caller concern: the engine only
//! hands out read-only snapshots.
//!
//! ## Example
//!
//! ```rust
//! use synchroscope::prelude::*;
//!
//! let config = ScopeConfig::builder()
//!     .generator_frequency(50.1)
//!     .build();
//! let scope = Synchroscope::new(config).expect("default config is valid");
//!
//! // Frame 100 at 50 ms per frame: 5 s of simulated time, 180° of phase
//! let snap = scope.tick(100);
//! assert!((snap.phase.phase_deg - 180.0).abs() < 1e-6);
//! assert!(!snap.zones.within_20);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::float_cmp              // Exact comparisons are intentional at step boundaries
)]

pub mod config;
pub mod engine;
pub mod error;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ScopeConfig, ScopeConfigBuilder};
    pub use crate::engine::{
        ClosingTimeSetting, CommandOutcome, Direction, OperatorCommand, PhaseSample,
        ScopeSnapshot, SimTime, SyncZoneState, Synchroscope,
    };
    pub use crate::error::{SyncError, SyncResult};
}

/// Re-export for public API
pub use error::{SyncError, SyncResult};
