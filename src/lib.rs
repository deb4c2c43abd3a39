//! motionframe is the animation timing core of a frame-driven video pipeline.
//!
//! Every visual property is a pure function of the current frame number:
//!
//! - [`interpolate`] maps a frame through piecewise breakpoints with optional [`Easing`]
//! - [`spring`] evaluates a closed-form damped oscillator from `from` to `to`
//! - [`Scene`] composes both into named, time-shifted properties loaded from JSON
//!
//! Nothing keeps state between calls, so frames can be sampled backwards, skipped, repeated,
//! or spread across threads with bit-identical results.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod animation;
pub mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, Vec2};
pub use crate::foundation::error::{MotionError, MotionResult};

pub use crate::animation::ease::{Easing, ease_in_out, ease_out, linear};
pub use crate::animation::interpolate::{
    Extrapolate, InterpolateOptions, Interpolator, Lerp, interpolate,
};
pub use crate::animation::ops::{delay, sequence_local, stagger_delay};
pub use crate::animation::spring::{
    DampingRegime, FrameSpring, Spring, SpringConfig, SpringParams, measure_spring, spring,
};
pub use crate::timeline::scene::{Scene, SceneDef, SceneFrame, SequenceDef};
pub use crate::timeline::track::{AnimDef, Track};
