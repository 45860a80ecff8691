use crate::model::{Clip, EffectKind, EntityKind, Samples, Track, TrackEffect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mutations sent from the editor to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    Track(TrackMutation),
    Clip(ClipMutation),
    Effect(EffectMutation),
}

/// Track mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackMutation {
    /// Insert a full track row (id is client-generated)
    Create(Track),
    /// Overwrite the listed fields of a track
    Update { id: Uuid, patch: TrackPatch },
    /// Delete a track together with its clips and effects
    Delete { id: Uuid },
    /// Set the full track order of a project
    Reorder { project_id: Uuid, ordered_ids: Vec<Uuid> },
}

/// Clip mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClipMutation {
    /// Insert a full clip row (id is client-generated)
    Create(Clip),
    /// Overwrite the listed fields of a clip
    Update { id: Uuid, patch: ClipPatch },
    /// Move a clip along its own track
    Move { id: Uuid, start_time: Samples },
    /// Move a clip onto another track
    MoveToTrack { id: Uuid, track_id: Uuid, start_time: Samples },
    /// Delete a clip
    Delete { id: Uuid },
}

/// Track effect mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectMutation {
    Create(TrackEffect),
    Update { id: Uuid, patch: EffectPatch },
    Delete { id: Uuid },
    /// Set the full effect order of a track
    Reorder { track_id: Uuid, ordered_ids: Vec<Uuid> },
}

/// Partial track update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the color
    pub color: Option<Option<String>>,
    pub muted: Option<bool>,
    pub solo: Option<bool>,
    pub gain_db: Option<f64>,
    pub pan: Option<f64>,
}

/// Partial clip update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub start_time: Option<Samples>,
    pub duration: Option<Samples>,
    pub audio_start_time: Option<Samples>,
    pub gain_db: Option<f64>,
}

/// Partial effect update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectPatch {
    pub enabled: Option<bool>,
    pub effect: Option<EffectKind>,
}

impl Mutation {
    /// Kind of entity this mutation targets
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Mutation::Track(_) => EntityKind::Track,
            Mutation::Clip(_) => EntityKind::Clip,
            Mutation::Effect(_) => EntityKind::Effect,
        }
    }

    /// Id of the targeted entity (the parent for reorders)
    pub fn target_id(&self) -> Uuid {
        match self {
            Mutation::Track(m) => match m {
                TrackMutation::Create(track) => track.id,
                TrackMutation::Update { id, .. } | TrackMutation::Delete { id } => *id,
                TrackMutation::Reorder { project_id, .. } => *project_id,
            },
            Mutation::Clip(m) => match m {
                ClipMutation::Create(clip) => clip.id,
                ClipMutation::Update { id, .. }
                | ClipMutation::Move { id, .. }
                | ClipMutation::MoveToTrack { id, .. }
                | ClipMutation::Delete { id } => *id,
            },
            Mutation::Effect(m) => match m {
                EffectMutation::Create(effect) => effect.id,
                EffectMutation::Update { id, .. } | EffectMutation::Delete { id } => *id,
                EffectMutation::Reorder { track_id, .. } => *track_id,
            },
        }
    }

    /// Remote operation name, as the store logs it
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Track(TrackMutation::Create(_)) => "tracks.create",
            Mutation::Track(TrackMutation::Update { .. }) => "tracks.update",
            Mutation::Track(TrackMutation::Delete { .. }) => "tracks.remove",
            Mutation::Track(TrackMutation::Reorder { .. }) => "tracks.reorder",
            Mutation::Clip(ClipMutation::Create(_)) => "clips.create",
            Mutation::Clip(ClipMutation::Update { .. }) => "clips.update",
            Mutation::Clip(ClipMutation::Move { .. }) => "clips.move",
            Mutation::Clip(ClipMutation::MoveToTrack { .. }) => "clips.moveToTrack",
            Mutation::Clip(ClipMutation::Delete { .. }) => "clips.remove",
            Mutation::Effect(EffectMutation::Create(_)) => "effects.create",
            Mutation::Effect(EffectMutation::Update { .. }) => "effects.update",
            Mutation::Effect(EffectMutation::Delete { .. }) => "effects.remove",
            Mutation::Effect(EffectMutation::Reorder { .. }) => "effects.reorder",
        }
    }
}

/// Read requests against the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Project(Uuid),
    TracksByProject(Uuid),
    ClipsByProject(Uuid),
    ClipsByTrack(Uuid),
    EffectsByProject(Uuid),
    EffectsByTrack(Uuid),
}

/// Responses to queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryResponse {
    Project(crate::model::Project),
    Tracks(Vec<Track>),
    Clips(Vec<Clip>),
    Effects(Vec<TrackEffect>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_for_reorder_is_parent() {
        let project_id = Uuid::new_v4();
        let mutation = Mutation::Track(TrackMutation::Reorder {
            project_id,
            ordered_ids: vec![Uuid::new_v4()],
        });
        assert_eq!(mutation.target_id(), project_id);
        assert_eq!(mutation.entity_kind(), EntityKind::Track);
        assert_eq!(mutation.name(), "tracks.reorder");
    }

    #[test]
    fn test_move_names_differ_by_track_change() {
        let id = Uuid::new_v4();
        let same = Mutation::Clip(ClipMutation::Move { id, start_time: 10 });
        let cross = Mutation::Clip(ClipMutation::MoveToTrack {
            id,
            track_id: Uuid::new_v4(),
            start_time: 10,
        });
        assert_ne!(same.name(), cross.name());
        assert_eq!(same.target_id(), cross.target_id());
    }
}
