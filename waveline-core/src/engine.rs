//! Audio engine bridge
//!
//! The editor hands the audio engine plain state lists whenever committed
//! entity state changes, plus direct gain/pan updates while a fader is being
//! dragged. The engine may attach after the project has loaded, so the bridge
//! keeps the last published state and flushes it on attach.

use sync_backend::{Clip, EffectKind, EntityTables, Samples, Track, TrackEffect};
use uuid::Uuid;

/// Mixer state of one track as the engine sees it
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    pub id: Uuid,
    pub order: i32,
    pub muted: bool,
    pub solo: bool,
    pub gain_db: f64,
    pub pan: f64,
}

impl From<&Track> for TrackState {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            order: track.order,
            muted: track.muted,
            solo: track.solo,
            gain_db: track.gain_db,
            pan: track.pan,
        }
    }
}

/// Placement of one clip as the engine sees it
#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub id: Uuid,
    pub track_id: Uuid,
    pub audio_file_id: Uuid,
    pub start_time: Samples,
    pub duration: Samples,
    pub audio_start_time: Samples,
    pub gain_db: f64,
}

impl From<&Clip> for ClipState {
    fn from(clip: &Clip) -> Self {
        Self {
            id: clip.id,
            track_id: clip.track_id,
            audio_file_id: clip.audio_file_id,
            start_time: clip.start_time,
            duration: clip.duration,
            audio_start_time: clip.audio_start_time,
            gain_db: clip.gain_db,
        }
    }
}

/// One effect slot as the engine sees it
#[derive(Debug, Clone, PartialEq)]
pub struct EffectState {
    pub id: Uuid,
    pub track_id: Uuid,
    pub order: i32,
    pub enabled: bool,
    pub effect: EffectKind,
}

impl From<&TrackEffect> for EffectState {
    fn from(effect: &TrackEffect) -> Self {
        Self {
            id: effect.id,
            track_id: effect.track_id,
            order: effect.order,
            enabled: effect.enabled,
            effect: effect.effect.clone(),
        }
    }
}

/// Consumer of committed editor state
///
/// Every call replaces the previous value, so repeating one is harmless.
pub trait AudioEngine: Send {
    fn set_tracks(&mut self, tracks: &[TrackState]);
    fn set_clips(&mut self, clips: &[ClipState]);
    fn set_effects(&mut self, effects: &[EffectState]);
    fn set_track_gain(&mut self, track_id: Uuid, gain_db: f64);
    fn set_track_pan(&mut self, track_id: Uuid, pan: f64);
}

/// Buffers state for an engine that may not be attached yet
#[derive(Default)]
pub struct EngineBridge {
    engine: Option<Box<dyn AudioEngine>>,
    tracks: Vec<TrackState>,
    clips: Vec<ClipState>,
    effects: Vec<EffectState>,
}

impl EngineBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an engine and send it everything published so far
    pub fn attach(&mut self, mut engine: Box<dyn AudioEngine>) {
        engine.set_tracks(&self.tracks);
        engine.set_clips(&self.clips);
        engine.set_effects(&self.effects);
        log::info!(
            "audio engine attached ({} tracks, {} clips, {} effects)",
            self.tracks.len(),
            self.clips.len(),
            self.effects.len()
        );
        self.engine = Some(engine);
    }

    /// Detach the engine; published state keeps buffering
    pub fn detach(&mut self) -> Option<Box<dyn AudioEngine>> {
        self.engine.take()
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_some()
    }

    /// Publish the tracks, clips and effects of `project_id` from `view`
    ///
    /// Lists that did not change since the last publish are not resent.
    pub fn publish(&mut self, view: &EntityTables, project_id: &Uuid) {
        let tracks: Vec<&Track> = view.tracks_in_order(project_id);
        let track_states: Vec<TrackState> = tracks.iter().map(|t| TrackState::from(*t)).collect();

        let mut clip_states = Vec::new();
        let mut effect_states = Vec::new();
        for track in &tracks {
            clip_states.extend(view.clips_on_track(&track.id).into_iter().map(ClipState::from));
            effect_states.extend(
                view.effects_in_order(&track.id)
                    .into_iter()
                    .map(EffectState::from),
            );
        }

        if track_states != self.tracks {
            self.tracks = track_states;
            if let Some(engine) = self.engine.as_mut() {
                engine.set_tracks(&self.tracks);
            }
        }
        if clip_states != self.clips {
            self.clips = clip_states;
            if let Some(engine) = self.engine.as_mut() {
                engine.set_clips(&self.clips);
            }
        }
        if effect_states != self.effects {
            self.effects = effect_states;
            if let Some(engine) = self.engine.as_mut() {
                engine.set_effects(&self.effects);
            }
        }
    }

    /// Live gain update during a fader drag; dropped without an engine
    pub fn preview_gain(&mut self, track_id: Uuid, gain_db: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_track_gain(track_id, gain_db);
        }
    }

    /// Live pan update during a fader drag; dropped without an engine
    pub fn preview_pan(&mut self, track_id: Uuid, pan: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_track_pan(track_id, pan);
        }
    }

    pub fn tracks(&self) -> &[TrackState] {
        &self.tracks
    }

    pub fn clips(&self) -> &[ClipState] {
        &self.clips
    }

    pub fn effects(&self) -> &[EffectState] {
        &self.effects
    }
}


#[cfg(test)]
mod tests {
    use super::test_engine::RecordingEngine;
    use super::*;
    use sync_backend::{Project, TrackMutation, Mutation};

    fn tables_with_track() -> (EntityTables, Uuid, Uuid) {
        let project = Project::new("Test");
        let project_id = project.id;
        let mut tables = EntityTables::new();
        tables.insert_project(project);
        let track = Track::new(project_id, "Drums", 0);
        let track_id = track.id;
        tables
            .apply(&Mutation::Track(TrackMutation::Create(track)))
            .unwrap();
        (tables, project_id, track_id)
    }

    #[test]
    fn test_state_buffered_until_attach() {
        let (tables, project_id, _) = tables_with_track();
        let mut bridge = EngineBridge::new();
        bridge.publish(&tables, &project_id);
        assert_eq!(bridge.tracks().len(), 1);

        let engine = RecordingEngine::default();
        bridge.attach(Box::new(engine.clone()));

        assert_eq!(engine.calls(), vec!["tracks:1", "clips:0", "effects:0"]);
    }

    #[test]
    fn test_unchanged_lists_are_not_resent() {
        let (mut tables, project_id, track_id) = tables_with_track();
        let engine = RecordingEngine::default();
        let mut bridge = EngineBridge::new();
        bridge.attach(Box::new(engine.clone()));
        bridge.publish(&tables, &project_id);
        bridge.publish(&tables, &project_id);

        let clip = Clip::new(project_id, track_id, Uuid::new_v4(), "Kick", 0, 100);
        tables
            .apply(&Mutation::Clip(sync_backend::ClipMutation::Create(clip)))
            .unwrap();
        bridge.publish(&tables, &project_id);

        assert_eq!(
            engine.calls(),
            vec!["tracks:0", "clips:0", "effects:0", "tracks:1", "clips:1"]
        );
    }

    #[test]
    fn test_previews_dropped_without_engine() {
        let mut bridge = EngineBridge::new();
        bridge.preview_gain(Uuid::new_v4(), -3.0);

        let engine = RecordingEngine::default();
        bridge.attach(Box::new(engine.clone()));
        bridge.preview_pan(Uuid::new_v4(), 0.5);

        assert_eq!(engine.calls(), vec!["tracks:0", "clips:0", "effects:0", "pan:0.5"]);
    }
}
