use crate::foundation::core::FrameIndex;

/// Shift a frame so an animation starts `by` frames later.
///
/// The result goes negative before the delayed start; both primitives treat that as
/// "not started yet".
pub fn delay(frame: f64, by: f64) -> f64 {
    frame - by
}

/// Start offset of the `index`-th element in a staggered entrance.
pub fn stagger_delay(index: usize, base: f64, step: f64) -> f64 {
    base + step * index as f64
}

/// Frame as seen by content placed on the timeline at `from`.
pub fn sequence_local(frame: FrameIndex, from: u64) -> f64 {
    frame.0 as f64 - from as f64
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ops.rs"]
mod tests;
