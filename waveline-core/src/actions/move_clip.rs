//! Move clip action
//!
//! Handles moving a clip along the timeline, optionally onto another track.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use crate::snapshot::{ClipPlacement, SnapshotPair};
use async_trait::async_trait;
use uuid::Uuid;

/// Action that moves a clip to a new (track, start time)
pub struct MoveClipAction {
    clip_id: Uuid,
    placement: SnapshotPair<ClipPlacement>,
}

impl MoveClipAction {
    /// Create a new move clip action
    ///
    /// # Arguments
    ///
    /// * `clip_id` - The clip to move
    /// * `before` - Where the clip sits now
    /// * `after` - Where the clip should end up
    pub fn new(clip_id: Uuid, before: ClipPlacement, after: ClipPlacement) -> Self {
        Self {
            clip_id,
            placement: SnapshotPair::new(before, after),
        }
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip_id
    }

    /// Whether the move changes track
    pub fn is_cross_track(&self) -> bool {
        self.placement.before.track_id != self.placement.after.track_id
    }
}

#[async_trait]
impl Action for MoveClipAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        let mutation = self
            .placement
            .after
            .mutation_from(self.clip_id, &self.placement.before);
        store.mutate(mutation).await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        let mutation = self
            .placement
            .before
            .mutation_from(self.clip_id, &self.placement.after);
        store.mutate(mutation).await?;
        Ok(())
    }

    fn description(&self) -> String {
        if self.is_cross_track() {
            "Move clip to track".to_string()
        } else {
            "Move clip".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fixture;

    #[tokio::test]
    async fn test_move_clip_same_track() {
        let f = fixture().await;
        let before = f.store.view();
        let mut action = MoveClipAction::new(
            f.clip_id,
            ClipPlacement {
                track_id: f.track_a,
                start_time: 1000,
            },
            ClipPlacement {
                track_id: f.track_a,
                start_time: 5000,
            },
        );

        action.execute(&f.store).await.unwrap();
        assert_eq!(f.store.clip(&f.clip_id).unwrap().start_time, 5000);
        assert_eq!(action.description(), "Move clip");

        action.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), before);
    }

    #[tokio::test]
    async fn test_move_clip_across_tracks() {
        let f = fixture().await;
        let before = f.store.view();
        let mut action = MoveClipAction::new(
            f.clip_id,
            ClipPlacement {
                track_id: f.track_a,
                start_time: 1000,
            },
            ClipPlacement {
                track_id: f.track_b,
                start_time: 0,
            },
        );

        action.execute(&f.store).await.unwrap();
        let moved = f.store.clip(&f.clip_id).unwrap();
        assert_eq!(moved.track_id, f.track_b);
        assert_eq!(moved.start_time, 0);
        assert_eq!(f.remote.mutation_log()[0].name(), "clips.moveToTrack");

        action.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), before);
        assert_eq!(f.remote.snapshot(), f.store.confirmed());
    }
}
