//! Sync-zone classification.
//!
//! Converts a phase angle into membership of the nested synchronization
//! windows (±5°, ±10°, ±20°) used to judge whether closing the breaker is
//! acceptable. Thresholds are fixed; the nesting `within_5 ⇒ within_10 ⇒
//! within_20` holds by construction.

use serde::{Deserialize, Serialize};

/// Narrow window threshold in degrees. Closing inside this band succeeds.
pub const ZONE_NARROW_DEG: f64 = 5.0;
/// Middle window threshold in degrees.
pub const ZONE_MIDDLE_DEG: f64 = 10.0;
/// Wide window threshold in degrees.
pub const ZONE_WIDE_DEG: f64 = 20.0;

/// Membership of the nested sync windows for one phase sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncZoneState {
    /// Phase error within ±5°.
    pub within_5: bool,
    /// Phase error within ±10°.
    pub within_10: bool,
    /// Phase error within ±20°.
    pub within_20: bool,
}

/// Shortest angular distance between two angles in degrees.
///
/// Symmetric in its arguments and bounded to `[0, 180]`.
#[must_use]
pub fn angular_distance(a_deg: f64, b_deg: f64) -> f64 {
    let d = (a_deg - b_deg).abs() % 360.0;
    if d <= 180.0 {
        d
    } else {
        360.0 - d
    }
}

/// Classify a phase angle into sync-zone memberships.
///
/// The error is measured against the fixed grid reference at 0°.
#[must_use]
pub fn classify(phase_deg: f64) -> SyncZoneState {
    let error = angular_distance(phase_deg, 0.0);

    SyncZoneState {
        within_5: error <= ZONE_NARROW_DEG,
        within_10: error <= ZONE_MIDDLE_DEG,
        within_20: error <= ZONE_WIDE_DEG,
    }
}
