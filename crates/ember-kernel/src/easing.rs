//! Easing curves for label tweens.

use serde::{Deserialize, Serialize};

/// Overshoot constant for [`Easing::EaseOutBack`].
const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing function applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Ease in (slow start).
    EaseIn,
    /// Ease out (slow end).
    #[default]
    EaseOut,
    /// Ease in and out (slow start and end).
    EaseInOut,
    /// Smooth step (Hermite interpolation).
    SmoothStep,
    /// Ease out with a small overshoot past the end value.
    EaseOutBack,
}

impl Easing {
    /// Applies the easing function to a normalized time value.
    ///
    /// Input is clamped to `[0, 1]`. Every curve maps 0 to 0 and 1 to 1.
    #[must_use]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            },
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseOutBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + BACK_OVERSHOOT * u.powi(2)
            },
        }
    }
}
