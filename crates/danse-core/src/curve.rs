//! Charge response curves.
//!
//! A curve maps normalized hold time to normalized eject distance. Only the
//! rate at which distance grows changes between shapes; both ends are pinned
//! to [0, 1].

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseCurve {
    #[default]
    Linear,
    /// `t^exponent`: slow start, fast finish for exponents above 1.
    EaseIn { exponent: f32 },
    /// `1 - (1 - t)^exponent`: fast start, slow finish.
    EaseOut { exponent: f32 },
    /// Hermite `3t² - 2t³`.
    SmoothStep,
    /// Piecewise linear through `[x, y]` points sorted by x.
    Keyframes { points: Vec<[f32; 2]> },
}

impl ResponseCurve {
    /// Evaluate at `t`. Input and output are both clamped to [0, 1].
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let y = match self {
            ResponseCurve::Linear => t,
            ResponseCurve::EaseIn { exponent } => t.powf(*exponent),
            ResponseCurve::EaseOut { exponent } => 1.0 - (1.0 - t).powf(*exponent),
            ResponseCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
            ResponseCurve::Keyframes { points } => evaluate_keyframes(points, t),
        };
        y.clamp(0.0, 1.0)
    }

    /// Reject shapes that are not monotonic non-decreasing on [0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ResponseCurve::Linear | ResponseCurve::SmoothStep => Ok(()),
            ResponseCurve::EaseIn { exponent } | ResponseCurve::EaseOut { exponent } => {
                if exponent.is_finite() && *exponent > 0.0 {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidCurve(format!(
                        "exponent must be positive, got {exponent}"
                    )))
                }
            }
            ResponseCurve::Keyframes { points } => {
                if points.is_empty() {
                    return Err(ConfigError::InvalidCurve("no keyframes".into()));
                }
                for pair in points.windows(2) {
                    let ([x0, y0], [x1, y1]) = (pair[0], pair[1]);
                    if x1 <= x0 {
                        return Err(ConfigError::InvalidCurve(format!(
                            "keyframes not sorted by x at {x0} -> {x1}"
                        )));
                    }
                    if y1 < y0 {
                        return Err(ConfigError::InvalidCurve(format!(
                            "keyframes decrease at x = {x1}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

fn evaluate_keyframes(points: &[[f32; 2]], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first[0] {
        return first[1];
    }
    if t >= last[0] {
        return last[1];
    }
    for pair in points.windows(2) {
        let ([x0, y0], [x1, y1]) = (pair[0], pair[1]);
        if t <= x1 {
            let span = x1 - x0;
            if span <= f32::EPSILON {
                return y1;
            }
            return y0 + (y1 - y0) * (t - x0) / span;
        }
    }
    last[1]
}
