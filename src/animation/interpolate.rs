use crate::{
    animation::ease::Easing,
    foundation::core::Vec2,
    foundation::error::{MotionError, MotionResult},
};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Blend from `a` to `b` with factor `t`.
    ///
    /// `t` outside `[0, 1]` extrapolates along the same line.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Behavior for inputs outside the breakpoint domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolate {
    /// Continue the boundary segment's slope.
    #[default]
    Extend,
    /// Hold the boundary output value.
    Clamp,
}

/// Per-call interpolation options.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InterpolateOptions {
    /// Behavior below the first breakpoint.
    pub extrapolate_left: Extrapolate,
    /// Behavior above the last breakpoint.
    pub extrapolate_right: Extrapolate,
    /// Shaping applied to segment progress inside the domain.
    pub easing: Easing,
}

impl InterpolateOptions {
    /// Clamp on both sides.
    pub fn clamp() -> Self {
        Self {
            extrapolate_left: Extrapolate::Clamp,
            extrapolate_right: Extrapolate::Clamp,
            easing: Easing::Linear,
        }
    }

    /// Clamp below the domain, extend above it.
    pub fn clamp_left() -> Self {
        Self {
            extrapolate_left: Extrapolate::Clamp,
            ..Self::default()
        }
    }

    /// Extend below the domain, clamp above it.
    pub fn clamp_right() -> Self {
        Self {
            extrapolate_right: Extrapolate::Clamp,
            ..Self::default()
        }
    }

    /// Replace the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Validated piecewise curve mapping a scalar input to `T`.
///
/// Construction checks the breakpoint table once; [`Interpolator::sample`] is then an
/// infallible pure function, so the same table can be sampled any number of times per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolator<T = f64> {
    input: Vec<f64>,
    output: Vec<T>,
    opts: InterpolateOptions,
}

impl<T> Interpolator<T>
where
    T: Lerp + Clone,
{
    /// Build a curve from parallel breakpoint tables.
    pub fn new(input: Vec<f64>, output: Vec<T>, opts: InterpolateOptions) -> MotionResult<Self> {
        validate_ranges(&input, output.len())?;
        opts.easing.validate()?;
        Ok(Self {
            input,
            output,
            opts,
        })
    }

    /// Input breakpoints, strictly increasing.
    pub fn input_range(&self) -> &[f64] {
        &self.input
    }

    /// Output values paired with [`Interpolator::input_range`].
    pub fn output_range(&self) -> &[T] {
        &self.output
    }

    /// Options this curve was built with.
    pub fn options(&self) -> &InterpolateOptions {
        &self.opts
    }

    /// Evaluate the curve at `x`.
    pub fn sample(&self, x: f64) -> T {
        let n = self.input.len();
        let first = self.input[0];
        let last = self.input[n - 1];

        if x < first {
            return match self.opts.extrapolate_left {
                Extrapolate::Clamp => self.output[0].clone(),
                Extrapolate::Extend => self.extend(0, x),
            };
        }
        if x > last {
            return match self.opts.extrapolate_right {
                Extrapolate::Clamp => self.output[n - 1].clone(),
                Extrapolate::Extend => self.extend(n - 2, x),
            };
        }
        if x == last {
            return self.output[n - 1].clone();
        }
        if x.is_nan() {
            // Propagates through the blend below for scalar outputs.
            return self.extend(0, x);
        }

        // Segment that starts at the greatest breakpoint <= x.
        let i = self.input.partition_point(|b| *b <= x) - 1;
        let lo = self.input[i];
        if x == lo {
            return self.output[i].clone();
        }
        let hi = self.input[i + 1];
        let t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
        let te = self.opts.easing.apply(t);
        T::lerp(&self.output[i], &self.output[i + 1], te)
    }

    fn extend(&self, seg: usize, x: f64) -> T {
        let lo = self.input[seg];
        let hi = self.input[seg + 1];
        let t = (x - lo) / (hi - lo);
        T::lerp(&self.output[seg], &self.output[seg + 1], t)
    }
}

/// Map `x` through the piecewise curve defined by `input_range` and `output_range`.
///
/// Tables are validated on every call; build an [`Interpolator`] to validate once.
pub fn interpolate(
    x: f64,
    input_range: &[f64],
    output_range: &[f64],
    opts: &InterpolateOptions,
) -> MotionResult<f64> {
    let curve = Interpolator::new(input_range.to_vec(), output_range.to_vec(), opts.clone())?;
    Ok(curve.sample(x))
}

fn validate_ranges(input: &[f64], output_len: usize) -> MotionResult<()> {
    if input.len() < 2 {
        return Err(MotionError::invalid_range(format!(
            "input range needs at least 2 breakpoints, got {}",
            input.len()
        )));
    }
    if input.len() != output_len {
        return Err(MotionError::invalid_range(format!(
            "input range has {} breakpoints but output range has {}",
            input.len(),
            output_len
        )));
    }
    if let Some(bad) = input.iter().position(|v| !v.is_finite()) {
        return Err(MotionError::invalid_range(format!(
            "input breakpoint {bad} is not finite"
        )));
    }
    if let Some(i) = input.windows(2).position(|w| w[0] >= w[1]) {
        return Err(MotionError::invalid_range(format!(
            "input range must be strictly increasing ({} at index {} then {})",
            input[i],
            i,
            input[i + 1]
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
