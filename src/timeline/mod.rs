//! Declarative scenes built from the animation primitives.
//!
//! A [`scene::SceneDef`] is plain data (usually JSON). Compiling it validates every curve and
//! spring up front, so sampling a frame cannot fail except for an out-of-bounds frame index.

/// Scenes, sequences, and per-frame sampling.
pub mod scene;
/// Animated scalar properties.
pub mod track;
