//! Trim clip action
//!
//! Handles trimming a clip from either edge. Both sides store the full
//! (start, offset, duration) window, so the inverse is exact whichever edge
//! was dragged.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use crate::snapshot::{SnapshotPair, TrimWindow};
use async_trait::async_trait;
use uuid::Uuid;

/// Action that trims a clip
pub struct TrimClipAction {
    clip_id: Uuid,
    window: SnapshotPair<TrimWindow>,
}

impl TrimClipAction {
    pub fn new(clip_id: Uuid, before: TrimWindow, after: TrimWindow) -> Self {
        Self {
            clip_id,
            window: SnapshotPair::new(before, after),
        }
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip_id
    }

    pub fn before(&self) -> TrimWindow {
        self.window.before
    }

    pub fn after(&self) -> TrimWindow {
        self.window.after
    }
}

#[async_trait]
impl Action for TrimClipAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.window.after.to_mutation(self.clip_id)).await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.window.before.to_mutation(self.clip_id)).await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Trim clip".to_string()
    }
}
