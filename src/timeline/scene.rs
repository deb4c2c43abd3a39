use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    animation::ops::sequence_local,
    foundation::core::{Fps, FrameIndex, FrameRange},
    foundation::error::{MotionError, MotionResult},
    foundation::math::Fnv1a64,
    timeline::track::{AnimDef, Track},
};

/// JSON-facing scene: a fixed-length timeline of sequences with animated properties.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDef {
    /// Scene name, used in logs and error messages.
    pub name: String,
    /// Playback frame rate.
    pub fps: Fps,
    /// Length in frames; valid frames are `0..duration`.
    pub duration: u64,
    /// Time-shifted groups of properties.
    #[serde(default)]
    pub sequences: Vec<SequenceDef>,
}

/// Properties placed on the scene timeline at `from`.
///
/// Properties see `frame - from`, and the sequence contributes nothing outside
/// `[from, from + duration)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDef {
    /// Unique name within the scene; prefixes every property key.
    pub name: String,
    /// First frame on the scene timeline.
    #[serde(default)]
    pub from: u64,
    /// Active length in frames; open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Animated properties by name.
    #[serde(default)]
    pub properties: BTreeMap<String, AnimDef>,
}

impl SceneDef {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MotionResult<Self> {
        serde_json::from_reader(r).map_err(|e| MotionError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> MotionResult<Self> {
        serde_json::from_str(s).map_err(|e| MotionError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open scene JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> MotionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MotionError::serde(format!("serialize scene JSON: {e}")))
    }
}

#[derive(Clone, Debug)]
struct CompiledSequence {
    from: u64,
    end: Option<u64>, // exclusive
    tracks: Vec<(String, Track)>,
}

impl CompiledSequence {
    fn is_active(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.from && self.end.is_none_or(|end| frame.0 < end)
    }
}

/// Values of every active property at one frame, keyed `"<sequence>.<property>"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneFrame {
    /// Sampled frame.
    pub frame: FrameIndex,
    /// Property values.
    pub values: BTreeMap<String, f64>,
}

impl SceneFrame {
    /// Value of `key`, if its sequence is active at this frame.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// A compiled scene. Sampling any frame is a pure function of the frame index.
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    fps: Fps,
    duration: u64,
    sequences: Vec<CompiledSequence>,
}

impl Scene {
    /// Validate `def` and compile all of its tracks.
    pub fn compile(def: &SceneDef) -> MotionResult<Self> {
        if def.name.trim().is_empty() {
            return Err(MotionError::validation("scene name must be non-empty"));
        }
        def.fps.validate()?;
        if def.duration == 0 {
            return Err(MotionError::validation(format!(
                "scene '{}' duration must be > 0",
                def.name
            )));
        }

        let mut seen = BTreeSet::new();
        let mut sequences = Vec::with_capacity(def.sequences.len());
        for seq in &def.sequences {
            let scope = format!("scene '{}' sequence '{}'", def.name, seq.name);
            if seq.name.is_empty() || seq.name.contains('.') {
                return Err(MotionError::validation(format!(
                    "{scope}: name must be non-empty and contain no '.'"
                )));
            }
            if !seen.insert(seq.name.as_str()) {
                return Err(MotionError::validation(format!("{scope}: duplicate name")));
            }
            if seq.from >= def.duration {
                return Err(MotionError::validation(format!(
                    "{scope}: starts at {} but the scene ends at {}",
                    seq.from, def.duration
                )));
            }
            if seq.duration == Some(0) {
                return Err(MotionError::validation(format!(
                    "{scope}: duration must be > 0"
                )));
            }

            let mut tracks = Vec::with_capacity(seq.properties.len());
            for (prop, anim) in &seq.properties {
                if prop.is_empty() {
                    return Err(MotionError::validation(format!(
                        "{scope}: property name must be non-empty"
                    )));
                }
                let track = Track::compile(anim, def.fps)
                    .map_err(|e| e.with_context(format!("{scope} property '{prop}'")))?;
                tracks.push((format!("{}.{prop}", seq.name), track));
            }

            sequences.push(CompiledSequence {
                from: seq.from,
                end: seq.duration.map(|d| seq.from.saturating_add(d)),
                tracks,
            });
        }

        tracing::debug!(
            scene = %def.name,
            sequences = sequences.len(),
            tracks = sequences.iter().map(|s| s.tracks.len()).sum::<usize>(),
            "compiled scene"
        );

        Ok(Self {
            name: def.name.clone(),
            fps: def.fps,
            duration: def.duration,
            sequences,
        })
    }

    /// Scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Length in frames.
    pub fn duration_frames(&self) -> u64 {
        self.duration
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration)
    }

    /// Every frame of the scene.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration),
        }
    }

    /// Sample every active property at `frame`.
    pub fn sample(&self, frame: FrameIndex) -> MotionResult<SceneFrame> {
        if frame.0 >= self.duration {
            return Err(MotionError::evaluation(format!(
                "frame {} is out of bounds for scene '{}' ({} frames)",
                frame.0, self.name, self.duration
            )));
        }

        let mut values = BTreeMap::new();
        for seq in self.sequences.iter().filter(|s| s.is_active(frame)) {
            let local = sequence_local(frame, seq.from);
            for (key, track) in &seq.tracks {
                values.insert(key.clone(), track.sample(local));
            }
        }
        Ok(SceneFrame { frame, values })
    }

    /// Sample a range of frames in timeline order.
    #[tracing::instrument(skip(self), fields(scene = %self.name))]
    pub fn sample_range(&self, range: FrameRange) -> MotionResult<Vec<SceneFrame>> {
        self.check_range(range)?;
        range.frames().map(|f| self.sample(f)).collect()
    }

    /// Sample a range of frames on the rayon pool.
    ///
    /// Output is identical to [`Scene::sample_range`], in timeline order.
    #[tracing::instrument(skip(self), fields(scene = %self.name))]
    pub fn sample_range_par(&self, range: FrameRange) -> MotionResult<Vec<SceneFrame>> {
        self.check_range(range)?;
        let frames: Vec<FrameIndex> = range.frames().collect();
        frames.par_iter().map(|f| self.sample(*f)).collect()
    }

    /// Hash of every sampled value in `range`, bit-exact.
    pub fn fingerprint(&self, range: FrameRange) -> MotionResult<u64> {
        let mut h = Fnv1a64::new_default();
        for frame in self.sample_range(range)? {
            h.write_u64(frame.frame.0);
            for (key, value) in &frame.values {
                h.write_bytes(key.as_bytes());
                h.write_f64(*value);
            }
        }
        Ok(h.finish())
    }

    fn check_range(&self, range: FrameRange) -> MotionResult<()> {
        if range.start.0 > range.end.0 || range.end.0 > self.duration {
            return Err(MotionError::evaluation(format!(
                "range {}..{} is out of bounds for scene '{}' ({} frames)",
                range.start.0, range.end.0, self.name, self.duration
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scene.rs"]
mod tests;
