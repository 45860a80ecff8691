//! Set clip properties action (name, gain)

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use crate::snapshot::{ClipProperties, SnapshotPair};
use async_trait::async_trait;
use uuid::Uuid;

pub struct SetClipPropertiesAction {
    clip_id: Uuid,
    properties: SnapshotPair<ClipProperties>,
}

impl SetClipPropertiesAction {
    pub fn new(clip_id: Uuid, before: ClipProperties, after: ClipProperties) -> Self {
        Self {
            clip_id,
            properties: SnapshotPair::new(before, after),
        }
    }
}

#[async_trait]
impl Action for SetClipPropertiesAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(self.properties.after.to_mutation(self.clip_id))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(self.properties.before.to_mutation(self.clip_id))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        if self.properties.before.name != self.properties.after.name {
            "Rename clip".to_string()
        } else {
            "Change clip gain".to_string()
        }
    }
}
