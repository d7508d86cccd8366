//! Easing curves
//!
//! Maps a progress ratio in `[0, 1]` to an eased ratio. Named presets clamp
//! their input; `Custom` functions receive the raw ratio and may return
//! values outside `[0, 1]` (anticipation/overshoot curves).

/// Easing function applied to a segment's progress ratio before blending
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// Identity mapping (constant velocity)
    #[default]
    Linear,
    /// Quadratic acceleration from zero velocity
    EaseInQuad,
    /// Quadratic deceleration to zero velocity
    EaseOutQuad,
    /// Quadratic acceleration then deceleration
    EaseInOutQuad,
    /// Cubic acceleration from zero velocity
    EaseInCubic,
    /// Cubic deceleration to zero velocity
    EaseOutCubic,
    /// Cubic acceleration then deceleration
    EaseInOutCubic,
    /// Hermite smooth-step
    SmoothStep,
    /// Caller-supplied curve; input is not clamped
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Apply the curve to a progress ratio
    pub fn apply(&self, t: f32) -> f32 {
        if let Easing::Custom(f) = self {
            return f(t);
        }

        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::Custom(_) => unreachable!(),
        }
    }
}
