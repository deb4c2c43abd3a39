use crate::{
    animation::ease::Easing,
    animation::interpolate::{Extrapolate, InterpolateOptions, Interpolator},
    animation::ops::{delay, stagger_delay},
    animation::spring::{FrameSpring, SpringConfig},
    foundation::core::Fps,
    foundation::error::{MotionError, MotionResult},
};

fn default_to() -> f64 {
    1.0
}

/// JSON-facing description of one animated scalar property.
///
/// Every variant reads the property's local frame; nothing here keeps state between samples.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimDef {
    /// Fixed value.
    Constant {
        /// Value at every frame.
        value: f64,
    },
    /// Piecewise curve over frame breakpoints.
    Interpolate {
        /// Frame breakpoints, strictly increasing.
        input: Vec<f64>,
        /// Values at each breakpoint.
        output: Vec<f64>,
        /// Behavior before the first breakpoint.
        #[serde(default)]
        extrapolate_left: Extrapolate,
        /// Behavior after the last breakpoint.
        #[serde(default)]
        extrapolate_right: Extrapolate,
        /// Segment easing.
        #[serde(default)]
        easing: Easing,
    },
    /// Spring released at local frame 0.
    Spring {
        /// Start value.
        #[serde(default)]
        from: f64,
        /// Rest value.
        #[serde(default = "default_to")]
        to: f64,
        /// Physical parameters.
        #[serde(default)]
        config: SpringConfig,
        /// Stretch the spring to settle after this many frames.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_in_frames: Option<f64>,
    },
    /// Inner animation started `by` frames later.
    Delay {
        /// Offset in frames.
        by: f64,
        /// Delayed animation.
        inner: Box<AnimDef>,
    },
    /// Product of all factors, e.g. an entrance scale times a pulse.
    Product {
        /// Multiplied animations.
        factors: Vec<AnimDef>,
    },
    /// Sum of all terms, e.g. a base offset plus a slide.
    Sum {
        /// Added animations.
        terms: Vec<AnimDef>,
    },
    /// Smallest value, e.g. an entrance fade capped by an exit fade.
    Min {
        /// Compared animations.
        of: Vec<AnimDef>,
    },
    /// Largest value.
    Max {
        /// Compared animations.
        of: Vec<AnimDef>,
    },
}

impl AnimDef {
    /// Fixed value.
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    /// Piecewise curve with the given options.
    pub fn interpolate(
        input: impl Into<Vec<f64>>,
        output: impl Into<Vec<f64>>,
        opts: InterpolateOptions,
    ) -> Self {
        Self::Interpolate {
            input: input.into(),
            output: output.into(),
            extrapolate_left: opts.extrapolate_left,
            extrapolate_right: opts.extrapolate_right,
            easing: opts.easing,
        }
    }

    /// Spring from `from` to `to`.
    pub fn spring(from: f64, to: f64, config: SpringConfig) -> Self {
        Self::Spring {
            from,
            to,
            config,
            duration_in_frames: None,
        }
    }

    /// Start `self` `by` frames later.
    pub fn delayed(self, by: f64) -> Self {
        Self::Delay {
            by,
            inner: Box::new(self),
        }
    }

    /// Multiply with `other`, flattening nested products.
    pub fn times(self, other: AnimDef) -> Self {
        match self {
            Self::Product { mut factors } => {
                factors.push(other);
                Self::Product { factors }
            }
            first => Self::Product {
                factors: vec![first, other],
            },
        }
    }

    /// Add `other`, flattening nested sums.
    pub fn plus(self, other: AnimDef) -> Self {
        match self {
            Self::Sum { mut terms } => {
                terms.push(other);
                Self::Sum { terms }
            }
            first => Self::Sum {
                terms: vec![first, other],
            },
        }
    }

    /// Smaller of `self` and `other` at every frame.
    pub fn min(self, other: AnimDef) -> Self {
        match self {
            Self::Min { mut of } => {
                of.push(other);
                Self::Min { of }
            }
            first => Self::Min {
                of: vec![first, other],
            },
        }
    }

    /// Larger of `self` and `other` at every frame.
    pub fn max(self, other: AnimDef) -> Self {
        match self {
            Self::Max { mut of } => {
                of.push(other);
                Self::Max { of }
            }
            first => Self::Max {
                of: vec![first, other],
            },
        }
    }

    /// Delay each animation by `base + step * index`.
    pub fn staggered(items: impl IntoIterator<Item = AnimDef>, base: f64, step: f64) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, a)| a.delayed(stagger_delay(i, base, step)))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Constant(f64),
    Interpolate(Interpolator<f64>),
    Spring(FrameSpring),
    Delay { by: f64, inner: Box<Node> },
    Product(Vec<Node>),
    Sum(Vec<Node>),
    Min(Vec<Node>),
    Max(Vec<Node>),
}

/// A compiled [`AnimDef`]: validated once, sampled many times.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    root: Node,
}

impl Track {
    /// Validate `def` and precompute its curves and springs for `fps`.
    pub fn compile(def: &AnimDef, fps: Fps) -> MotionResult<Self> {
        fps.validate()?;
        Ok(Self {
            root: compile_node(def, fps)?,
        })
    }

    /// Value at `frame`, measured from the track's own start.
    pub fn sample(&self, frame: f64) -> f64 {
        sample_node(&self.root, frame)
    }
}

fn compile_node(def: &AnimDef, fps: Fps) -> MotionResult<Node> {
    match def {
        AnimDef::Constant { value } => {
            if !value.is_finite() {
                return Err(MotionError::validation("constant value must be finite"));
            }
            Ok(Node::Constant(*value))
        }
        AnimDef::Interpolate {
            input,
            output,
            extrapolate_left,
            extrapolate_right,
            easing,
        } => {
            let opts = InterpolateOptions {
                extrapolate_left: *extrapolate_left,
                extrapolate_right: *extrapolate_right,
                easing: easing.clone(),
            };
            Ok(Node::Interpolate(Interpolator::new(
                input.clone(),
                output.clone(),
                opts,
            )?))
        }
        AnimDef::Spring {
            from,
            to,
            config,
            duration_in_frames,
        } => Ok(Node::Spring(FrameSpring::new(
            fps.as_f64(),
            *from,
            *to,
            config,
            *duration_in_frames,
        )?)),
        AnimDef::Delay { by, inner } => {
            if !by.is_finite() {
                return Err(MotionError::validation("delay must be finite"));
            }
            Ok(Node::Delay {
                by: *by,
                inner: Box::new(compile_node(inner, fps)?),
            })
        }
        AnimDef::Product { factors } => Ok(Node::Product(compile_all(factors, fps, "product")?)),
        AnimDef::Sum { terms } => Ok(Node::Sum(compile_all(terms, fps, "sum")?)),
        AnimDef::Min { of } => Ok(Node::Min(compile_all(of, fps, "min")?)),
        AnimDef::Max { of } => Ok(Node::Max(compile_all(of, fps, "max")?)),
    }
}

fn compile_all(defs: &[AnimDef], fps: Fps, what: &str) -> MotionResult<Vec<Node>> {
    if defs.is_empty() {
        return Err(MotionError::validation(format!(
            "{what} needs at least one operand"
        )));
    }
    defs.iter().map(|d| compile_node(d, fps)).collect()
}

fn sample_node(node: &Node, frame: f64) -> f64 {
    match node {
        Node::Constant(v) => *v,
        Node::Interpolate(curve) => curve.sample(frame),
        Node::Spring(spring) => spring.sample(frame),
        Node::Delay { by, inner } => sample_node(inner, delay(frame, *by)),
        Node::Product(factors) => factors.iter().map(|f| sample_node(f, frame)).product(),
        Node::Sum(terms) => terms.iter().map(|t| sample_node(t, frame)).sum(),
        Node::Min(of) => of
            .iter()
            .map(|n| sample_node(n, frame))
            .fold(f64::INFINITY, f64::min),
        Node::Max(of) => of
            .iter()
            .map(|n| sample_node(n, frame))
            .fold(f64::NEG_INFINITY, f64::max),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/track.rs"]
mod tests;
