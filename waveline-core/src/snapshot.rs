//! Entity snapshots
//!
//! Immutable captures of the persisted fields an edit touches. Actions store a
//! before/after pair and turn either side into the mutation that restores it.

use sync_backend::{
    Clip, ClipMutation, ClipPatch, EffectKind, EffectMutation, EffectPatch, Mutation, Samples,
    Track, TrackEffect, TrackMutation, TrackPatch,
};
use uuid::Uuid;

/// A before/after pair of snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPair<T> {
    pub before: T,
    pub after: T,
}

impl<T: PartialEq> SnapshotPair<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }

    /// Whether applying `after` would change nothing
    pub fn is_unchanged(&self) -> bool {
        self.before == self.after
    }
}

/// Where a clip sits on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPlacement {
    pub track_id: Uuid,
    pub start_time: Samples,
}

impl ClipPlacement {
    pub fn of(clip: &Clip) -> Self {
        Self {
            track_id: clip.track_id,
            start_time: clip.start_time,
        }
    }

    /// Mutation that moves `clip_id` from `from` to this placement
    pub fn mutation_from(&self, clip_id: Uuid, from: &ClipPlacement) -> Mutation {
        if self.track_id == from.track_id {
            Mutation::Clip(ClipMutation::Move {
                id: clip_id,
                start_time: self.start_time,
            })
        } else {
            Mutation::Clip(ClipMutation::MoveToTrack {
                id: clip_id,
                track_id: self.track_id,
                start_time: self.start_time,
            })
        }
    }
}

/// The trim window of a clip
///
/// Always stored as the full triple: a left-edge trim moves all three values,
/// a right-edge trim only the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimWindow {
    pub start_time: Samples,
    pub audio_start_time: Samples,
    pub duration: Samples,
}

impl TrimWindow {
    pub fn of(clip: &Clip) -> Self {
        Self {
            start_time: clip.start_time,
            audio_start_time: clip.audio_start_time,
            duration: clip.duration,
        }
    }

    pub fn end_time(&self) -> Samples {
        self.start_time + self.duration
    }

    pub fn to_mutation(&self, clip_id: Uuid) -> Mutation {
        Mutation::Clip(ClipMutation::Update {
            id: clip_id,
            patch: ClipPatch {
                start_time: Some(self.start_time),
                duration: Some(self.duration),
                audio_start_time: Some(self.audio_start_time),
                ..Default::default()
            },
        })
    }
}

/// User-editable clip properties outside the trim window
#[derive(Debug, Clone, PartialEq)]
pub struct ClipProperties {
    pub name: String,
    pub gain_db: f64,
}

impl ClipProperties {
    pub fn of(clip: &Clip) -> Self {
        Self {
            name: clip.name.clone(),
            gain_db: clip.gain_db,
        }
    }

    pub fn to_mutation(&self, clip_id: Uuid) -> Mutation {
        Mutation::Clip(ClipMutation::Update {
            id: clip_id,
            patch: ClipPatch {
                name: Some(self.name.clone()),
                gain_db: Some(self.gain_db),
                ..Default::default()
            },
        })
    }
}

/// Mixer and header properties of a track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackProperties {
    pub name: String,
    pub color: Option<String>,
    pub muted: bool,
    pub solo: bool,
    pub gain_db: f64,
    pub pan: f64,
}

impl TrackProperties {
    pub fn of(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            color: track.color.clone(),
            muted: track.muted,
            solo: track.solo,
            gain_db: track.gain_db,
            pan: track.pan,
        }
    }

    pub fn to_mutation(&self, track_id: Uuid) -> Mutation {
        Mutation::Track(TrackMutation::Update {
            id: track_id,
            patch: TrackPatch {
                name: Some(self.name.clone()),
                color: Some(self.color.clone()),
                muted: Some(self.muted),
                solo: Some(self.solo),
                gain_db: Some(self.gain_db),
                pan: Some(self.pan),
            },
        })
    }
}

/// State of an effect slot
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    pub enabled: bool,
    pub effect: EffectKind,
}

impl EffectSettings {
    pub fn of(effect: &TrackEffect) -> Self {
        Self {
            enabled: effect.enabled,
            effect: effect.effect.clone(),
        }
    }

    pub fn to_mutation(&self, effect_id: Uuid) -> Mutation {
        Mutation::Effect(EffectMutation::Update {
            id: effect_id,
            patch: EffectPatch {
                enabled: Some(self.enabled),
                effect: Some(self.effect.clone()),
            },
        })
    }
}
