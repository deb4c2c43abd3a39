//! Pure animation primitives sampled by frame number.

/// Easing curves applied to normalized segment progress.
pub mod ease;
/// Piecewise breakpoint interpolation.
pub mod interpolate;
/// Frame offset helpers for staggering and sequencing.
pub mod ops;
pub mod spring;
