//! Action implementations for timeline editing
//!
//! This module contains all the concrete action types that can be executed
//! through the action system.

pub mod add_clip;
pub mod add_track;
pub mod delete_clip;
pub mod delete_track;
pub mod effects;
pub mod move_clip;
pub mod reorder;
pub mod set_clip_properties;
pub mod set_track_properties;
pub mod split_clip;
pub mod trim_clip;

pub use add_clip::AddClipAction;
pub use add_track::AddTrackAction;
pub use delete_clip::DeleteClipAction;
pub use delete_track::DeleteTrackAction;
pub use effects::{AddEffectAction, DeleteEffectAction, SetEffectAction};
pub use move_clip::MoveClipAction;
pub use reorder::{ReorderEffectsAction, ReorderTracksAction};
pub use set_clip_properties::SetClipPropertiesAction;
pub use set_track_properties::{
    truncate_name, SetTrackPropertiesAction, TrackProperty, MAX_TRACK_NAME_LEN,
};
pub use split_clip::{split_clip, split_parts};
pub use trim_clip::TrimClipAction;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::optimistic::OptimisticStore;
    use std::sync::Arc;
    use sync_backend::{Clip, MemoryStore, Project, Track};
    use uuid::Uuid;

    /// A loaded store holding one project, two tracks and one clip on the first track
    pub struct Fixture {
        pub remote: Arc<MemoryStore>,
        pub store: OptimisticStore,
        pub project_id: Uuid,
        pub track_a: Uuid,
        pub track_b: Uuid,
        pub clip_id: Uuid,
    }

    pub async fn fixture() -> Fixture {
        let project = Project::new("Test");
        let project_id = project.id;
        let remote = Arc::new(MemoryStore::with_project(project));
        let track_a = Track::new(project_id, "Drums", 0);
        let track_b = Track::new(project_id, "Bass", 1);
        let mut clip = Clip::new(project_id, track_a.id, Uuid::new_v4(), "Kick", 1000, 2000);
        clip.audio_start_time = 500;
        let fixture_ids = (track_a.id, track_b.id, clip.id);
        remote.seed(vec![track_a, track_b], vec![clip], vec![]);
        let store = OptimisticStore::new(remote.clone());
        store.load(project_id).await.expect("fixture project loads");
        Fixture {
            remote,
            store,
            project_id,
            track_a: fixture_ids.0,
            track_b: fixture_ids.1,
            clip_id: fixture_ids.2,
        }
    }
}
