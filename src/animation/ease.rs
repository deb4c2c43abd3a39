use crate::foundation::error::{MotionError, MotionResult};

/// Exponent used by [`ease_out`] and [`ease_in_out`] when no power is given.
pub const DEFAULT_EASE_POWER: f64 = 3.0;

/// Overshoot amount used by [`Easing::back`].
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;

/// Easing functions used to map normalized segment progress.
///
/// Base curves are "in" curves: they start slow and accelerate. Wrap them with
/// [`Easing::out`] or [`Easing::in_out`] to get the decelerating and symmetric variants.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Identity mapping.
    #[default]
    Linear,
    /// Inertial ease, a cubic bezier through `(0.42, 0)` and `(1, 1)`.
    Ease,
    /// `t^2`.
    Quad,
    /// `t^3`.
    Cubic,
    /// `t^n` for a positive exponent `n`.
    Poly(f64),
    /// Quarter cosine wave.
    Sin,
    /// Quarter circle.
    Circle,
    /// Base-2 exponential.
    Exp,
    /// Pulls back before moving forward; the parameter is the overshoot amount.
    Back(f64),
    /// Damped oscillation; the parameter scales how many times it bounces.
    Elastic(f64),
    /// Bouncing-ball curve.
    Bounce,
    /// CSS-style cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    Bezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Run the inner curve as-is.
    In(Box<Easing>),
    /// Mirror the inner curve in time and value.
    Out(Box<Easing>),
    /// Inner curve for the first half, mirrored curve for the second half.
    InOut(Box<Easing>),
}

impl Easing {
    /// Cubic bezier curve helper.
    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Bezier { x1, y1, x2, y2 }
    }

    /// Back curve with the conventional overshoot.
    pub fn back() -> Self {
        Self::Back(DEFAULT_BACK_OVERSHOOT)
    }

    /// Wrap `self` as an "in" curve.
    pub fn ease_in(self) -> Self {
        Self::In(Box::new(self))
    }

    /// Wrap `self` as an "out" curve.
    pub fn out(self) -> Self {
        Self::Out(Box::new(self))
    }

    /// Wrap `self` as an "in-out" curve.
    pub fn in_out(self) -> Self {
        Self::InOut(Box::new(self))
    }

    /// Reject parameters that would produce NaN or a non-function curve.
    pub fn validate(&self) -> MotionResult<()> {
        match self {
            Self::Linear
            | Self::Ease
            | Self::Quad
            | Self::Cubic
            | Self::Sin
            | Self::Circle
            | Self::Exp
            | Self::Bounce => Ok(()),
            Self::Poly(n) => {
                if !n.is_finite() || *n <= 0.0 {
                    return Err(MotionError::validation("Poly exponent must be finite and > 0"));
                }
                Ok(())
            }
            Self::Back(s) => {
                if !s.is_finite() {
                    return Err(MotionError::validation("Back overshoot must be finite"));
                }
                Ok(())
            }
            Self::Elastic(b) => {
                if !b.is_finite() || *b < 0.0 {
                    return Err(MotionError::validation(
                        "Elastic bounciness must be finite and >= 0",
                    ));
                }
                Ok(())
            }
            Self::Bezier { x1, y1, x2, y2 } => {
                if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                    return Err(MotionError::validation("Bezier control points must be finite"));
                }
                if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                    return Err(MotionError::validation(
                        "Bezier x control points must lie in [0, 1]",
                    ));
                }
                Ok(())
            }
            Self::In(inner) | Self::Out(inner) | Self::InOut(inner) => inner.validate(),
        }
    }

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(t, 0.42, 0.0, 1.0, 1.0),
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Poly(n) => t.powf(*n),
            Self::Sin => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Self::Circle => 1.0 - (1.0 - t * t).sqrt(),
            Self::Exp => 2f64.powf(10.0 * (t - 1.0)),
            Self::Back(s) => t * t * ((s + 1.0) * t - s),
            Self::Elastic(bounciness) => {
                let p = bounciness * std::f64::consts::PI;
                1.0 - (t * std::f64::consts::FRAC_PI_2).cos().powi(3) * (t * p).cos()
            }
            Self::Bounce => bounce(t),
            Self::Bezier { x1, y1, x2, y2 } => cubic_bezier(t, *x1, *y1, *x2, *y2),
            Self::In(inner) => inner.apply(t),
            Self::Out(inner) => 1.0 - inner.apply(1.0 - t),
            Self::InOut(inner) => {
                if t < 0.5 {
                    inner.apply(t * 2.0) / 2.0
                } else {
                    1.0 - inner.apply((1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

/// Identity easing.
pub fn linear(t: f64) -> f64 {
    t
}

/// Decelerating power curve `1 - (1 - t)^power`; `None` uses [`DEFAULT_EASE_POWER`].
pub fn ease_out(power: impl Into<Option<f64>>) -> Easing {
    Easing::Poly(power.into().unwrap_or(DEFAULT_EASE_POWER)).out()
}

/// Symmetric accelerate-then-decelerate power curve with `f(0.5) = 0.5`; `None` uses
/// [`DEFAULT_EASE_POWER`].
pub fn ease_in_out(power: impl Into<Option<f64>>) -> Easing {
    Easing::Poly(power.into().unwrap_or(DEFAULT_EASE_POWER)).in_out()
}

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t2 = t - 1.5 / D;
        N * t2 * t2 + 0.75
    } else if t < 2.5 / D {
        let t2 = t - 2.25 / D;
        N * t2 * t2 + 0.9375
    } else {
        let t2 = t - 2.625 / D;
        N * t2 * t2 + 0.984375
    }
}

// Solve x(p) = t for the curve parameter with Newton steps, then bisection when the
// slope flattens out, and evaluate y(p).
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    if x1 == y1 && x2 == y2 {
        return t;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..40 {
        let val = bezier_sample(p, x1, x2);
        if (val - t).abs() < 1e-7 {
            break;
        }
        if val < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
