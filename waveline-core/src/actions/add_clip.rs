//! Add clip action
//!
//! Handles inserting a clip. The clip carries its client-generated id, which
//! the store keeps, so later actions can refer to it across undo/redo.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use sync_backend::{Clip, ClipMutation, Mutation};
use uuid::Uuid;

/// Action that adds a clip to a track
pub struct AddClipAction {
    /// The full clip row to insert
    clip: Clip,
}

impl AddClipAction {
    pub fn new(clip: Clip) -> Self {
        Self { clip }
    }

    /// Get the ID of the clip that will be/was added
    pub fn clip_id(&self) -> Uuid {
        self.clip.id
    }

    pub fn clip(&self) -> &Clip {
        &self.clip
    }
}

#[async_trait]
impl Action for AddClipAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Clip(ClipMutation::Create(self.clip.clone())))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Clip(ClipMutation::Delete { id: self.clip.id }))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Add clip".to_string()
    }
}
