//! Delete clip action

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use sync_backend::{Clip, ClipMutation, Mutation};
use uuid::Uuid;

/// Action that deletes a clip, re-inserting the captured row (same id) on undo
pub struct DeleteClipAction {
    clip: Clip,
}

impl DeleteClipAction {
    /// `clip` is the row as it is right before deletion
    pub fn new(clip: Clip) -> Self {
        Self { clip }
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip.id
    }
}

#[async_trait]
impl Action for DeleteClipAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Clip(ClipMutation::Delete { id: self.clip.id }))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Clip(ClipMutation::Create(self.clip.clone())))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Delete clip".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fixture;

    #[tokio::test]
    async fn test_delete_restores_full_row() {
        let f = fixture().await;
        let original = f.store.view();
        let clip = f.store.clip(&f.clip_id).unwrap();
        let mut action = DeleteClipAction::new(clip);

        action.execute(&f.store).await.unwrap();
        assert!(f.store.clip(&f.clip_id).is_none());

        action.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), original);
    }

    #[tokio::test]
    async fn test_delete_of_concurrently_removed_clip_fails() {
        let f = fixture().await;
        let clip = f.store.clip(&f.clip_id).unwrap();
        // Another collaborator removes the clip first.
        sync_backend::RemoteStore::mutate(
            f.remote.as_ref(),
            Mutation::Clip(ClipMutation::Delete { id: f.clip_id }),
        )
        .await
        .unwrap();

        let err = DeleteClipAction::new(clip).execute(&f.store).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(f.store.clip(&f.clip_id).is_some());
    }
}
