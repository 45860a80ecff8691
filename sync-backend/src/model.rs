//! Entity rows held by the store
//!
//! Projects own tracks, tracks own clips and an effect chain. All time values
//! are sample counts at the project's sample rate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sample count on the project timeline (or into a source file)
pub type Samples = i64;

/// Default project sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Kind of entity a row or mutation refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Project,
    Track,
    Clip,
    Effect,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Track => "track",
            EntityKind::Clip => "clip",
            EntityKind::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// A project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Sample rate all sample counts are expressed in
    pub sample_rate: u32,

    /// Total duration in samples
    pub duration: Samples,
}

impl Project {
    /// Create a new project at the default sample rate
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: 0,
        }
    }
}

/// A track row
///
/// `order` is the vertical sort key. Only relative order matters; gaps are allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub muted: bool,
    pub solo: bool,
    /// Track gain in dB
    pub gain_db: f64,
    /// Stereo pan, -1.0 (left) to 1.0 (right)
    pub pan: f64,
}

impl Track {
    /// Create a new track with a fresh id
    pub fn new(project_id: Uuid, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            order,
            color: None,
            muted: false,
            solo: false,
            gain_db: 0.0,
            pan: 0.0,
        }
    }
}

/// A clip row: a trimmed, placed window onto a source audio file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: Uuid,
    pub project_id: Uuid,
    pub track_id: Uuid,
    /// Decoded audio resource this clip plays from
    pub audio_file_id: Uuid,
    pub name: String,
    /// Position on the project timeline
    pub start_time: Samples,
    /// Visible/playing length, at least one sample
    pub duration: Samples,
    /// Offset into the source audio
    pub audio_start_time: Samples,
    /// Clip gain in dB
    pub gain_db: f64,
}

impl Clip {
    /// Create a new clip with a fresh id, playing from the start of its source
    pub fn new(
        project_id: Uuid,
        track_id: Uuid,
        audio_file_id: Uuid,
        name: impl Into<String>,
        start_time: Samples,
        duration: Samples,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            track_id,
            audio_file_id,
            name: name.into(),
            start_time,
            duration,
            audio_start_time: 0,
            gain_db: 0.0,
        }
    }

    /// Timeline position one past the last sample of the clip
    pub fn end_time(&self) -> Samples {
        self.start_time + self.duration
    }

    /// Whether `time` falls strictly inside the clip (boundaries excluded)
    pub fn contains_exclusive(&self, time: Samples) -> bool {
        time > self.start_time && time < self.end_time()
    }
}

/// Filter response shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    LowPass,
    HighPass,
    BandPass,
}

/// Effect payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectKind {
    Filter {
        cutoff_hz: f64,
        resonance: f64,
        mode: FilterMode,
    },
    Eq {
        low_db: f64,
        mid_db: f64,
        high_db: f64,
    },
}

/// An effect in a track's chain
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackEffect {
    pub id: Uuid,
    pub track_id: Uuid,
    pub order: i32,
    pub enabled: bool,
    pub effect: EffectKind,
}

impl TrackEffect {
    pub fn new(track_id: Uuid, order: i32, effect: EffectKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            track_id,
            order,
            enabled: true,
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_bounds() {
        let clip = Clip::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "Kick", 0, 1000);
        assert_eq!(clip.end_time(), 1000);
        assert!(!clip.contains_exclusive(0));
        assert!(clip.contains_exclusive(400));
        assert!(!clip.contains_exclusive(1000));
    }

    #[test]
    fn test_effect_serializes_with_tag() {
        let effect = EffectKind::Filter {
            cutoff_hz: 800.0,
            resonance: 0.7,
            mode: FilterMode::LowPass,
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"type\":\"Filter\""));
        let back: EffectKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }
}
