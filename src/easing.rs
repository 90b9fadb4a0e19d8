use serde::{Deserialize, Serialize};

/// Easing curves used by the splash choreography.
///
/// `Power2*` follow the tween-library naming where `power2` is a cubic curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    Power2Out,
    Power2InOut,
    /// Overshooting ease-out; the payload is the overshoot amount.
    BackOut(f32),
}

impl Ease {
    pub const BACK_OUT_DEFAULT: Self = Self::BackOut(1.7);

    /// Maps linear progress in `[0, 1]` to eased progress. Input is clamped;
    /// `BackOut` may exceed 1 mid-curve but lands exactly on 1.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
