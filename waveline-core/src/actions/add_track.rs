//! Add track action
//!
//! Handles appending a new track below the existing ones.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use sync_backend::{Mutation, Track, TrackMutation};
use uuid::Uuid;

/// Action that adds a new track to the project
pub struct AddTrackAction {
    track: Track,
}

impl AddTrackAction {
    pub fn new(track: Track) -> Self {
        Self { track }
    }

    /// A new track placed after every track in `existing`
    pub fn append(project_id: Uuid, name: impl Into<String>, existing: &[Track]) -> Self {
        let order = existing
            .iter()
            .map(|t| t.order)
            .max()
            .map_or(0, |max| max + 1);
        Self::new(Track::new(project_id, name, order))
    }

    /// Get the ID of the track that will be/was created
    pub fn track_id(&self) -> Uuid {
        self.track.id
    }
}

#[async_trait]
impl Action for AddTrackAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Track(TrackMutation::Create(self.track.clone())))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Track(TrackMutation::Delete { id: self.track.id }))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Add track".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fixture;

    #[tokio::test]
    async fn test_append_goes_last() {
        let f = fixture().await;
        let original = f.store.view();
        let mut action = AddTrackAction::append(f.project_id, "Vocals", &f.store.tracks());

        action.execute(&f.store).await.unwrap();
        let tracks = f.store.tracks();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[2].id, action.track_id());
        assert_eq!(tracks[2].order, 2);

        action.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), original);
    }

    #[test]
    fn test_first_track_gets_order_zero() {
        let action = AddTrackAction::append(Uuid::new_v4(), "Track 1", &[]);
        assert_eq!(action.track.order, 0);
    }
}
