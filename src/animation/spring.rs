//! Closed-form damped harmonic oscillator.
//!
//! A spring is released from rest at `from` and pulled toward `to`. With displacement
//! `x0 = from - to`, natural frequency `w0 = sqrt(k / m)` and damping ratio
//! `z = c / (2 * sqrt(k * m))`, the position after `t` seconds is:
//!
//! - underdamped (`z < 1`): `to + x0 * e^(-z*w0*t) * (cos(wd*t) + (z*w0/wd) * sin(wd*t))`
//!   with `wd = w0 * sqrt(1 - z^2)`
//! - critically damped (`z == 1`): `to + x0 * e^(-w0*t) * (1 + w0*t)`
//! - overdamped (`z > 1`): `to + x0 * (r2*e^(r1*t) - r1*e^(r2*t)) / (r2 - r1)`
//!   with `r1,2 = -w0 * (z -/+ sqrt(z^2 - 1))`
//!
//! Every value is recomputed from `(frame, fps, from, to, config)`, so frames can be sampled
//! in any order.

use crate::foundation::{
    error::{MotionError, MotionResult},
    math::approx_eq,
};

/// Default damping coefficient.
pub const DEFAULT_DAMPING: f64 = 10.0;
/// Default stiffness.
pub const DEFAULT_STIFFNESS: f64 = 100.0;
/// Default mass.
pub const DEFAULT_MASS: f64 = 1.0;
/// Distance from the target (relative to a unit move) that counts as settled.
pub const DEFAULT_REST_THRESHOLD: f64 = 0.005;

const CRITICAL_EPS: f64 = 1e-9;
const MAX_MEASURED_FRAMES: u64 = 1 << 53;

/// Physical parameters of a spring.
///
/// The defaults (`damping = 10`, `stiffness = 100`, `mass = 1`) give a damping ratio of `0.5`:
/// a quick settle with a visible overshoot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Viscous damping coefficient, `> 0`.
    pub damping: f64,
    /// Spring constant, `> 0`.
    pub stiffness: f64,
    /// Moving mass, `> 0`.
    pub mass: f64,
    /// Stop at the target instead of overshooting it.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            stiffness: DEFAULT_STIFFNESS,
            mass: DEFAULT_MASS,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Config with the given damping and stiffness and default mass.
    pub fn new(damping: f64, stiffness: f64) -> Self {
        Self {
            damping,
            stiffness,
            ..Self::default()
        }
    }

    /// Replace the mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Enable or disable overshoot clamping.
    pub fn with_overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    /// Reject non-positive or non-finite physical parameters.
    pub fn validate(&self) -> MotionResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("stiffness", self.stiffness),
            ("mass", self.mass),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(MotionError::invalid_spring(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Response shape of a spring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DampingRegime {
    /// Oscillates around the target with a decaying envelope.
    Underdamped,
    /// Fastest approach without oscillation.
    Critical,
    /// Slow exponential approach without oscillation.
    Overdamped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Solution {
    Underdamped { decay: f64, wd: f64, sin_coef: f64 },
    Critical { w0: f64 },
    Overdamped { r1: f64, r2: f64 },
}

/// A validated spring trajectory from `from` to `to`, parametrized by seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    from: f64,
    to: f64,
    w0: f64,
    zeta: f64,
    overshoot_clamping: bool,
    solution: Solution,
}

impl Spring {
    /// Solve the oscillator for `config`.
    pub fn new(from: f64, to: f64, config: &SpringConfig) -> MotionResult<Self> {
        config.validate()?;
        if !from.is_finite() || !to.is_finite() {
            return Err(MotionError::invalid_spring(format!(
                "from/to must be finite, got {from} -> {to}"
            )));
        }

        let w0 = (config.stiffness / config.mass).sqrt();
        let zeta = config.damping / (2.0 * (config.stiffness * config.mass).sqrt());
        let solution = if approx_eq(zeta, 1.0, CRITICAL_EPS) {
            Solution::Critical { w0 }
        } else if zeta < 1.0 {
            let decay = zeta * w0;
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            Solution::Underdamped {
                decay,
                wd,
                sin_coef: decay / wd,
            }
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            // r1 = -w0 (z - root) rewritten to avoid cancellation for large z.
            let r1 = -w0 / (zeta + root);
            let r2 = -w0 * (zeta + root);
            Solution::Overdamped { r1, r2 }
        };

        Ok(Self {
            from,
            to,
            w0,
            zeta,
            overshoot_clamping: config.overshoot_clamping,
            solution,
        })
    }

    /// Start value.
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Rest value.
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Undamped angular frequency `sqrt(k / m)` in rad/s.
    pub fn angular_frequency(&self) -> f64 {
        self.w0
    }

    /// Dimensionless damping ratio `c / (2 sqrt(k m))`.
    pub fn damping_ratio(&self) -> f64 {
        self.zeta
    }

    /// Which closed form this spring uses.
    pub fn regime(&self) -> DampingRegime {
        match self.solution {
            Solution::Underdamped { .. } => DampingRegime::Underdamped,
            Solution::Critical { .. } => DampingRegime::Critical,
            Solution::Overdamped { .. } => DampingRegime::Overdamped,
        }
    }

    /// Position after `t` seconds. `t <= 0` is exactly `from`.
    pub fn position_at(&self, t: f64) -> f64 {
        if t <= 0.0 || self.from == self.to {
            return self.from;
        }
        let x0 = self.from - self.to;
        let value = self.to + x0 * self.unit_displacement(t);
        if self.overshoot_clamping {
            if self.to >= self.from {
                value.min(self.to)
            } else {
                value.max(self.to)
            }
        } else {
            value
        }
    }

    /// Velocity (units per second) after `t` seconds.
    pub fn velocity_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let x0 = self.from - self.to;
        let v = match self.solution {
            Solution::Underdamped { decay, wd, .. } => {
                -x0 * (-decay * t).exp() * (wd * t).sin() * (self.w0 * self.w0) / wd
            }
            Solution::Critical { w0 } => -x0 * w0 * w0 * t * (-w0 * t).exp(),
            Solution::Overdamped { r1, r2 } => {
                x0 * r1 * r2 * ((r1 * t).exp() - (r2 * t).exp()) / (r2 - r1)
            }
        };
        if self.overshoot_clamping && self.position_at(t) == self.to {
            0.0
        } else {
            v
        }
    }

    // Normalized displacement: 1 at t = 0, tending to 0.
    fn unit_displacement(&self, t: f64) -> f64 {
        match self.solution {
            Solution::Underdamped {
                decay,
                wd,
                sin_coef,
            } => (-decay * t).exp() * ((wd * t).cos() + sin_coef * (wd * t).sin()),
            Solution::Critical { w0 } => (-w0 * t).exp() * (1.0 + w0 * t),
            Solution::Overdamped { r1, r2 } => {
                (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
            }
        }
    }

    // `scale * e^(-rate * t)` bounds |unit_displacement(s)| for every s >= t.
    fn envelope(&self) -> (f64, f64) {
        match self.solution {
            Solution::Underdamped {
                decay, sin_coef, ..
            } => ((1.0 + sin_coef * sin_coef).sqrt(), decay),
            // (1 + u) e^(-u/2) peaks at 2/sqrt(e) < 1.25.
            Solution::Critical { w0 } => (1.25, 0.5 * w0),
            Solution::Overdamped { r1, r2 } => ((r2.abs() + r1.abs()) / (r2 - r1).abs(), -r1),
        }
    }

    // Seconds after which the envelope stays within `threshold`.
    fn envelope_crossing(&self, threshold: f64) -> f64 {
        let (scale, rate) = self.envelope();
        (scale / threshold).ln().max(0.0) / rate
    }
}

/// Arguments of [`spring`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringParams {
    /// Frames elapsed since the spring's own start; subtract delays before calling.
    pub frame: f64,
    /// Frames per second used to turn frames into seconds.
    pub fps: f64,
    /// Start value.
    #[serde(default)]
    pub from: f64,
    /// Rest value.
    #[serde(default = "default_to")]
    pub to: f64,
    /// Physical parameters.
    #[serde(default)]
    pub config: SpringConfig,
    /// Stretch time so the spring settles after this many frames.
    #[serde(default)]
    pub duration_in_frames: Option<f64>,
}

fn default_to() -> f64 {
    1.0
}

impl SpringParams {
    /// Unit spring (`0 -> 1`, default config) at `frame`.
    pub fn new(frame: f64, fps: f64) -> Self {
        Self {
            frame,
            fps,
            from: 0.0,
            to: default_to(),
            config: SpringConfig::default(),
            duration_in_frames: None,
        }
    }

    /// Replace the start and rest values.
    pub fn range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Replace the physical parameters.
    pub fn config(mut self, config: SpringConfig) -> Self {
        self.config = config;
        self
    }

    /// Stretch the spring to settle after `frames` frames.
    pub fn duration_in_frames(mut self, frames: f64) -> Self {
        self.duration_in_frames = Some(frames);
        self
    }
}

/// A spring bound to a frame rate, sampled by frame number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSpring {
    spring: Spring,
    fps: f64,
    frame_scale: f64,
}

impl FrameSpring {
    /// Validate and bind a spring to `fps`.
    ///
    /// With `duration_in_frames`, frames are rescaled so [`measure_spring`]'s natural settle
    /// frame lands on the requested duration.
    pub fn new(
        fps: f64,
        from: f64,
        to: f64,
        config: &SpringConfig,
        duration_in_frames: Option<f64>,
    ) -> MotionResult<Self> {
        validate_fps(fps)?;
        let spring = Spring::new(from, to, config)?;
        let frame_scale = match duration_in_frames {
            None => 1.0,
            Some(d) => {
                if !d.is_finite() || d <= 0.0 {
                    return Err(MotionError::invalid_spring(format!(
                        "duration_in_frames must be finite and > 0, got {d}"
                    )));
                }
                let natural = settle_frame(&spring, fps, DEFAULT_REST_THRESHOLD)?;
                if natural == 0 { 1.0 } else { natural as f64 / d }
            }
        };
        Ok(Self {
            spring,
            fps,
            frame_scale,
        })
    }

    /// Underlying time-parametrized spring.
    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Value at `frame` frames after the spring's start.
    pub fn sample(&self, frame: f64) -> f64 {
        self.spring.position_at(frame * self.frame_scale / self.fps)
    }
}

/// Evaluate a spring animation at `params.frame`.
pub fn spring(params: &SpringParams) -> MotionResult<f64> {
    let s = FrameSpring::new(
        params.fps,
        params.from,
        params.to,
        &params.config,
        params.duration_in_frames,
    )?;
    Ok(s.sample(params.frame))
}

/// Number of frames a `0 -> 1` spring takes to settle within `threshold` of `1` for good.
pub fn measure_spring(fps: f64, config: &SpringConfig, threshold: f64) -> MotionResult<u64> {
    validate_fps(fps)?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(MotionError::invalid_spring(format!(
            "threshold must be finite and > 0, got {threshold}"
        )));
    }
    let spring = Spring::new(0.0, 1.0, config)?;
    settle_frame(&spring, fps, threshold)
}

fn settle_frame(spring: &Spring, fps: f64, threshold: f64) -> MotionResult<u64> {
    let span = (spring.to - spring.from).abs();
    if span == 0.0 {
        return Ok(0);
    }

    // Past `limit` the envelope alone keeps the spring inside the threshold.
    let limit = (spring.envelope_crossing(threshold) * fps).ceil();
    if !limit.is_finite() || limit > MAX_MEASURED_FRAMES as f64 {
        return Err(MotionError::invalid_spring(format!(
            "spring settles after {limit} frames, beyond the measurable {MAX_MEASURED_FRAMES}"
        )));
    }
    let limit = limit as u64;

    let outside =
        |f: u64| (spring.position_at(f as f64 / fps) - spring.to).abs() > threshold * span;
    let settled = if spring.regime() == DampingRegime::Underdamped {
        // Scan back from `limit` to the last excursion.
        (0..=limit).rev().find(|&f| outside(f)).map_or(0, |f| f + 1)
    } else {
        // Without oscillation the distance to the target only shrinks.
        let (mut lo, mut hi) = (0u64, limit.saturating_add(1));
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if outside(mid) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    };
    tracing::trace!(frames = settled, fps, "measured spring");
    Ok(settled)
}

fn validate_fps(fps: f64) -> MotionResult<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(MotionError::invalid_spring(format!(
            "fps must be finite and > 0, got {fps}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
