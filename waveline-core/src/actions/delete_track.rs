//! Delete track action
//!
//! Deleting a track removes its clips and effects with it. The action keeps
//! all three so undo can rebuild the track with the same ids.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use sync_backend::{
    Clip, ClipMutation, EffectMutation, EntityKind, Mutation, Track, TrackEffect, TrackMutation,
};
use uuid::Uuid;

/// Action that deletes a track together with everything on it
pub struct DeleteTrackAction {
    track: Track,
    clips: Vec<Clip>,
    effects: Vec<TrackEffect>,
}

impl DeleteTrackAction {
    /// Capture the track and its contents from the current view
    pub fn capture(store: &OptimisticStore, track_id: Uuid) -> Result<Self, EditorError> {
        let track = store
            .track(&track_id)
            .ok_or(EditorError::NotFound(EntityKind::Track, track_id))?;
        Ok(Self {
            track,
            clips: store.clips_on_track(&track_id),
            effects: store.effects_on_track(&track_id),
        })
    }

    pub fn track_id(&self) -> Uuid {
        self.track.id
    }

    async fn restore_contents(&self, store: &OptimisticStore) -> Result<(), EditorError> {
        for effect in &self.effects {
            store
                .mutate(Mutation::Effect(EffectMutation::Create(effect.clone())))
                .await?;
        }
        for clip in &self.clips {
            store
                .mutate(Mutation::Clip(ClipMutation::Create(clip.clone())))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Action for DeleteTrackAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Track(TrackMutation::Delete { id: self.track.id }))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Track(TrackMutation::Create(self.track.clone())))
            .await?;
        if let Err(e) = self.restore_contents(store).await {
            // Deleting the track again takes the partly restored contents with it.
            if let Err(unwind_err) = store
                .mutate(Mutation::Track(TrackMutation::Delete { id: self.track.id }))
                .await
            {
                log::error!(
                    "could not unwind partly restored track {}: {}",
                    self.track.id,
                    unwind_err
                );
            }
            return Err(e);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete track \"{}\"", self.track.name)
    }
}
