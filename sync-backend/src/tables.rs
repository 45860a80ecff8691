//! Row tables and mutation application
//!
//! `EntityTables` is the plain data a store (or a local view of one) holds.
//! Applying a mutation either changes the tables completely or leaves them
//! untouched and reports why.

use crate::command::{
    ClipMutation, ClipPatch, EffectMutation, EffectPatch, Mutation, Query, QueryResponse,
    TrackMutation, TrackPatch,
};
use crate::model::{Clip, EntityKind, Project, Samples, Track, TrackEffect};
use crate::store::Rejection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// All rows of one or more projects
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityTables {
    pub projects: HashMap<Uuid, Project>,
    pub tracks: HashMap<Uuid, Track>,
    pub clips: HashMap<Uuid, Clip>,
    pub effects: HashMap<Uuid, TrackEffect>,
}

fn not_found(kind: EntityKind, id: Uuid) -> Rejection {
    Rejection::NotFound { kind, id }
}

impl EntityTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a project row directly (projects are not edited through mutations)
    pub fn insert_project(&mut self, project: Project) {
        self.projects.insert(project.id, project);
    }

    pub fn track(&self, id: &Uuid) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn clip(&self, id: &Uuid) -> Option<&Clip> {
        self.clips.get(id)
    }

    pub fn effect(&self, id: &Uuid) -> Option<&TrackEffect> {
        self.effects.get(id)
    }

    /// Tracks of a project in layout order
    pub fn tracks_in_order(&self, project_id: &Uuid) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self
            .tracks
            .values()
            .filter(|t| &t.project_id == project_id)
            .collect();
        tracks.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        tracks
    }

    /// Clips on a track, sorted by start time
    pub fn clips_on_track(&self, track_id: &Uuid) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .values()
            .filter(|c| &c.track_id == track_id)
            .collect();
        clips.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        clips
    }

    /// Effects of a track in chain order
    pub fn effects_in_order(&self, track_id: &Uuid) -> Vec<&TrackEffect> {
        let mut effects: Vec<&TrackEffect> = self
            .effects
            .values()
            .filter(|e| &e.track_id == track_id)
            .collect();
        effects.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        effects
    }

    /// Answer a query from the rows held here
    pub fn answer(&self, query: &Query) -> Result<QueryResponse, Rejection> {
        let response = match query {
            Query::Project(id) => QueryResponse::Project(
                self.projects
                    .get(id)
                    .cloned()
                    .ok_or_else(|| not_found(EntityKind::Project, *id))?,
            ),
            Query::TracksByProject(project_id) => QueryResponse::Tracks(
                self.tracks_in_order(project_id).into_iter().cloned().collect(),
            ),
            Query::ClipsByProject(project_id) => {
                let mut clips: Vec<Clip> = self
                    .clips
                    .values()
                    .filter(|c| &c.project_id == project_id)
                    .cloned()
                    .collect();
                clips.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
                QueryResponse::Clips(clips)
            }
            Query::ClipsByTrack(track_id) => QueryResponse::Clips(
                self.clips_on_track(track_id).into_iter().cloned().collect(),
            ),
            Query::EffectsByProject(project_id) => {
                let track_ids: HashSet<Uuid> = self
                    .tracks
                    .values()
                    .filter(|t| &t.project_id == project_id)
                    .map(|t| t.id)
                    .collect();
                let mut effects: Vec<TrackEffect> = self
                    .effects
                    .values()
                    .filter(|e| track_ids.contains(&e.track_id))
                    .cloned()
                    .collect();
                effects.sort_by(|a, b| {
                    a.track_id
                        .cmp(&b.track_id)
                        .then(a.order.cmp(&b.order))
                        .then(a.id.cmp(&b.id))
                });
                QueryResponse::Effects(effects)
            }
            Query::EffectsByTrack(track_id) => QueryResponse::Effects(
                self.effects_in_order(track_id).into_iter().cloned().collect(),
            ),
        };
        Ok(response)
    }

    /// Apply a mutation, all or nothing
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), Rejection> {
        match mutation {
            Mutation::Track(m) => self.apply_track(m),
            Mutation::Clip(m) => self.apply_clip(m),
            Mutation::Effect(m) => self.apply_effect(m),
        }
    }

    /// Check whether a mutation would apply, without changing anything
    pub fn check(&self, mutation: &Mutation) -> Result<(), Rejection> {
        let mut scratch = self.clone();
        scratch.apply(mutation)
    }

    fn apply_track(&mut self, mutation: &TrackMutation) -> Result<(), Rejection> {
        match mutation {
            TrackMutation::Create(track) => {
                if self.tracks.contains_key(&track.id) {
                    return Err(Rejection::Conflict(format!("track {} already exists", track.id)));
                }
                self.tracks.insert(track.id, track.clone());
            }
            TrackMutation::Update { id, patch } => {
                let track = self
                    .tracks
                    .get_mut(id)
                    .ok_or_else(|| not_found(EntityKind::Track, *id))?;
                apply_track_patch(track, patch);
            }
            TrackMutation::Delete { id } => {
                if self.tracks.remove(id).is_none() {
                    return Err(not_found(EntityKind::Track, *id));
                }
                self.clips.retain(|_, c| &c.track_id != id);
                self.effects.retain(|_, e| &e.track_id != id);
            }
            TrackMutation::Reorder {
                project_id,
                ordered_ids,
            } => {
                let current: HashSet<Uuid> = self
                    .tracks
                    .values()
                    .filter(|t| &t.project_id == project_id)
                    .map(|t| t.id)
                    .collect();
                check_permutation(&current, ordered_ids, "track")?;
                for (index, id) in ordered_ids.iter().enumerate() {
                    if let Some(track) = self.tracks.get_mut(id) {
                        track.order = index as i32;
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_clip(&mut self, mutation: &ClipMutation) -> Result<(), Rejection> {
        match mutation {
            ClipMutation::Create(clip) => {
                if self.clips.contains_key(&clip.id) {
                    return Err(Rejection::Conflict(format!("clip {} already exists", clip.id)));
                }
                if !self.tracks.contains_key(&clip.track_id) {
                    return Err(not_found(EntityKind::Track, clip.track_id));
                }
                validate_clip_window(clip.start_time, clip.duration, clip.audio_start_time)?;
                self.clips.insert(clip.id, clip.clone());
            }
            ClipMutation::Update { id, patch } => {
                let clip = self
                    .clips
                    .get(id)
                    .ok_or_else(|| not_found(EntityKind::Clip, *id))?;
                let mut updated = clip.clone();
                apply_clip_patch(&mut updated, patch);
                validate_clip_window(
                    updated.start_time,
                    updated.duration,
                    updated.audio_start_time,
                )?;
                self.clips.insert(*id, updated);
            }
            ClipMutation::Move { id, start_time } => {
                if *start_time < 0 {
                    return Err(Rejection::Invalid(format!("negative start time {}", start_time)));
                }
                let clip = self
                    .clips
                    .get_mut(id)
                    .ok_or_else(|| not_found(EntityKind::Clip, *id))?;
                clip.start_time = *start_time;
            }
            ClipMutation::MoveToTrack {
                id,
                track_id,
                start_time,
            } => {
                if *start_time < 0 {
                    return Err(Rejection::Invalid(format!("negative start time {}", start_time)));
                }
                if !self.tracks.contains_key(track_id) {
                    return Err(not_found(EntityKind::Track, *track_id));
                }
                let clip = self
                    .clips
                    .get_mut(id)
                    .ok_or_else(|| not_found(EntityKind::Clip, *id))?;
                clip.track_id = *track_id;
                clip.start_time = *start_time;
            }
            ClipMutation::Delete { id } => {
                if self.clips.remove(id).is_none() {
                    return Err(not_found(EntityKind::Clip, *id));
                }
            }
        }
        Ok(())
    }

    fn apply_effect(&mut self, mutation: &EffectMutation) -> Result<(), Rejection> {
        match mutation {
            EffectMutation::Create(effect) => {
                if self.effects.contains_key(&effect.id) {
                    return Err(Rejection::Conflict(format!(
                        "effect {} already exists",
                        effect.id
                    )));
                }
                if !self.tracks.contains_key(&effect.track_id) {
                    return Err(not_found(EntityKind::Track, effect.track_id));
                }
                self.effects.insert(effect.id, effect.clone());
            }
            EffectMutation::Update { id, patch } => {
                let effect = self
                    .effects
                    .get_mut(id)
                    .ok_or_else(|| not_found(EntityKind::Effect, *id))?;
                apply_effect_patch(effect, patch);
            }
            EffectMutation::Delete { id } => {
                if self.effects.remove(id).is_none() {
                    return Err(not_found(EntityKind::Effect, *id));
                }
            }
            EffectMutation::Reorder {
                track_id,
                ordered_ids,
            } => {
                let current: HashSet<Uuid> = self
                    .effects
                    .values()
                    .filter(|e| &e.track_id == track_id)
                    .map(|e| e.id)
                    .collect();
                check_permutation(&current, ordered_ids, "effect")?;
                for (index, id) in ordered_ids.iter().enumerate() {
                    if let Some(effect) = self.effects.get_mut(id) {
                        effect.order = index as i32;
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_permutation(
    current: &HashSet<Uuid>,
    ordered_ids: &[Uuid],
    what: &str,
) -> Result<(), Rejection> {
    let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();
    if requested.len() != ordered_ids.len() || &requested != current {
        return Err(Rejection::Invalid(format!(
            "{} order must list every {} exactly once ({} given, {} present)",
            what,
            what,
            ordered_ids.len(),
            current.len()
        )));
    }
    Ok(())
}

fn validate_clip_window(
    start_time: Samples,
    duration: Samples,
    audio_start_time: Samples,
) -> Result<(), Rejection> {
    if start_time < 0 || audio_start_time < 0 || duration < 1 {
        return Err(Rejection::Invalid(format!(
            "clip window out of range (start {}, duration {}, offset {})",
            start_time, duration, audio_start_time
        )));
    }
    Ok(())
}

fn apply_track_patch(track: &mut Track, patch: &TrackPatch) {
    if let Some(name) = &patch.name {
        track.name = name.clone();
    }
    if let Some(color) = &patch.color {
        track.color = color.clone();
    }
    if let Some(muted) = patch.muted {
        track.muted = muted;
    }
    if let Some(solo) = patch.solo {
        track.solo = solo;
    }
    if let Some(gain_db) = patch.gain_db {
        track.gain_db = gain_db;
    }
    if let Some(pan) = patch.pan {
        track.pan = pan;
    }
}

fn apply_clip_patch(clip: &mut Clip, patch: &ClipPatch) {
    if let Some(name) = &patch.name {
        clip.name = name.clone();
    }
    if let Some(start_time) = patch.start_time {
        clip.start_time = start_time;
    }
    if let Some(duration) = patch.duration {
        clip.duration = duration;
    }
    if let Some(audio_start_time) = patch.audio_start_time {
        clip.audio_start_time = audio_start_time;
    }
    if let Some(gain_db) = patch.gain_db {
        clip.gain_db = gain_db;
    }
}

fn apply_effect_patch(effect: &mut TrackEffect, patch: &EffectPatch) {
    if let Some(enabled) = patch.enabled {
        effect.enabled = enabled;
    }
    if let Some(kind) = &patch.effect {
        effect.effect = kind.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EntityTables, Uuid, Uuid, Uuid) {
        let mut tables = EntityTables::new();
        let project = Project::new("Test");
        let project_id = project.id;
        tables.insert_project(project);
        let track = Track::new(project_id, "Drums", 0);
        let track_id = track.id;
        tables
            .apply(&Mutation::Track(TrackMutation::Create(track)))
            .unwrap();
        let clip = Clip::new(project_id, track_id, Uuid::new_v4(), "Kick", 0, 1000);
        let clip_id = clip.id;
        tables.apply(&Mutation::Clip(ClipMutation::Create(clip))).unwrap();
        (tables, project_id, track_id, clip_id)
    }

    #[test]
    fn test_delete_track_cascades_to_clips() {
        let (mut tables, _project_id, track_id, clip_id) = setup();
        tables
            .apply(&Mutation::Track(TrackMutation::Delete { id: track_id }))
            .unwrap();
        assert!(tables.clip(&clip_id).is_none());
    }

    #[test]
    fn test_update_missing_clip_is_not_found() {
        let (mut tables, ..) = setup();
        let id = Uuid::new_v4();
        let err = tables
            .apply(&Mutation::Clip(ClipMutation::Delete { id }))
            .unwrap_err();
        assert_eq!(
            err,
            Rejection::NotFound {
                kind: EntityKind::Clip,
                id
            }
        );
    }

    #[test]
    fn test_invalid_update_leaves_row_untouched() {
        let (mut tables, _, _, clip_id) = setup();
        let patch = ClipPatch {
            duration: Some(0),
            ..Default::default()
        };
        assert!(tables
            .apply(&Mutation::Clip(ClipMutation::Update { id: clip_id, patch }))
            .is_err());
        assert_eq!(tables.clip(&clip_id).unwrap().duration, 1000);
    }

    #[test]
    fn test_reorder_requires_full_permutation() {
        let (mut tables, project_id, track_id, _) = setup();
        let second = Track::new(project_id, "Bass", 1);
        let second_id = second.id;
        tables
            .apply(&Mutation::Track(TrackMutation::Create(second)))
            .unwrap();

        let partial = Mutation::Track(TrackMutation::Reorder {
            project_id,
            ordered_ids: vec![second_id],
        });
        assert!(matches!(tables.apply(&partial), Err(Rejection::Invalid(_))));

        let full = Mutation::Track(TrackMutation::Reorder {
            project_id,
            ordered_ids: vec![second_id, track_id],
        });
        tables.apply(&full).unwrap();
        let order: Vec<Uuid> = tables
            .tracks_in_order(&project_id)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(order, vec![second_id, track_id]);
    }

    #[test]
    fn test_move_to_missing_track_rejected() {
        let (mut tables, _, _, clip_id) = setup();
        let err = tables
            .apply(&Mutation::Clip(ClipMutation::MoveToTrack {
                id: clip_id,
                track_id: Uuid::new_v4(),
                start_time: 0,
            }))
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
