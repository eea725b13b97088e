//! Quantized breaker closing-time control.
//!
//! Maps the continuous closing-time slider (0–100 %) onto a two-segment
//! stepped range of physical closing times. The lower half of the slider
//! snaps in fine 10 ms steps (0–100 ms), the upper half in coarse 100 ms
//! steps (100–1000 ms), giving fine control near fast closing times. The
//! percent shown to the operator is deliberately decoupled from the
//! physical milliseconds through this non-uniform snap.

use serde::{Deserialize, Serialize};

/// Number of steps in the fine segment (0–50 %).
const FAST_STEPS: f64 = 10.0;
/// Number of steps in the coarse segment (50–100 %).
const SLOW_STEPS: f64 = 9.0;

/// A snapped closing-time setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosingTimeSetting {
    /// The raw slider percent the setting was derived from.
    pub raw_percent: f64,
    /// The percent after snapping to the nearest step.
    pub snapped_percent: f64,
    /// Breaker closing time in milliseconds.
    pub closing_time_ms: f64,
}

impl Default for ClosingTimeSetting {
    fn default() -> Self {
        // Slider midpoint: 100 ms
        quantize(50.0)
    }
}

/// Snap a slider percent to the stepped closing-time scale.
///
/// Input is expected to be pre-clamped to `[0, 100]`. Idempotent on its own
/// output: re-snapping a snapped percent yields the same setting.
#[must_use]
pub fn quantize(raw_percent: f64) -> ClosingTimeSetting {
    if raw_percent <= 50.0 {
        // Multiply before dividing so half-step inputs round exactly
        let snapped_step = (raw_percent * FAST_STEPS / 50.0).round();
        ClosingTimeSetting {
            raw_percent,
            snapped_percent: snapped_step * (50.0 / FAST_STEPS),
            closing_time_ms: snapped_step * 10.0,
        }
    } else {
        let snapped_step = ((raw_percent - 50.0) * SLOW_STEPS / 50.0).round();
        ClosingTimeSetting {
            raw_percent,
            snapped_percent: 50.0 + snapped_step * (50.0 / SLOW_STEPS),
            closing_time_ms: 100.0 + snapped_step * 100.0,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: re-snapping a snapped percent is a no-op.
        #[test]
        fn prop_quantize_idempotent(percent in 0.0f64..=100.0) {
            let first = quantize(percent);
            let second = quantize(first.snapped_percent);

            prop_assert!((first.snapped_percent - second.snapped_percent).abs() < 1e-9);
            prop_assert!((first.closing_time_ms - second.closing_time_ms).abs() < 1e-9);
        }

        /// Falsification: closing time stays within the physical range.
        #[test]
        fn prop_quantize_range(percent in 0.0f64..=100.0) {
            let setting = quantize(percent);
            prop_assert!(setting.closing_time_ms >= 0.0);
            prop_assert!(setting.closing_time_ms <= 1000.0);
        }

        /// Falsification: fine segment only produces 10 ms multiples,
        /// coarse segment only 100 ms multiples above 100 ms.
        #[test]
        fn prop_quantize_step_grid(percent in 0.0f64..=100.0) {
            let setting = quantize(percent);
            if percent <= 50.0 {
                let steps = setting.closing_time_ms / 10.0;
                prop_assert!((steps - steps.round()).abs() < 1e-9);
            } else {
                let steps = (setting.closing_time_ms - 100.0) / 100.0;
                prop_assert!((steps - steps.round()).abs() < 1e-9);
            }
        }
    }
}
