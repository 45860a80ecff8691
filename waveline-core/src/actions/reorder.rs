//! Reorder actions
//!
//! Track and effect ordering is always sent as the full id list, both ways.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use std::collections::HashSet;
use sync_backend::{EffectMutation, Mutation, TrackMutation};
use uuid::Uuid;

/// Check that `requested` lists every id of `current` exactly once
fn validate_permutation(what: &str, current: &[Uuid], requested: &[Uuid]) -> Result<(), EditorError> {
    let current_set: HashSet<&Uuid> = current.iter().collect();
    let requested_set: HashSet<&Uuid> = requested.iter().collect();
    if requested_set.len() != requested.len() || current_set != requested_set {
        let message = format!(
            "{} order must contain each of the {} {} ids exactly once, got {} ids",
            what,
            current.len(),
            what,
            requested.len()
        );
        log::error!("{}", message);
        return Err(EditorError::InvariantViolation(message));
    }
    Ok(())
}

/// `ids` with the entry `id` moved to `new_index` (clamped to the end)
fn moved(ids: &[Uuid], id: Uuid, new_index: usize) -> Option<Vec<Uuid>> {
    let from = ids.iter().position(|i| *i == id)?;
    let mut reordered = ids.to_vec();
    let item = reordered.remove(from);
    reordered.insert(new_index.min(reordered.len()), item);
    Some(reordered)
}

/// Action that sets the full track order of a project
pub struct ReorderTracksAction {
    project_id: Uuid,
    before: Vec<Uuid>,
    after: Vec<Uuid>,
}

impl ReorderTracksAction {
    /// `ordered_ids` must be a permutation of the project's current tracks
    pub fn new(store: &OptimisticStore, ordered_ids: Vec<Uuid>) -> Result<Self, EditorError> {
        let project_id = store.project_id().ok_or(EditorError::NoProject)?;
        let before: Vec<Uuid> = store.tracks().iter().map(|t| t.id).collect();
        validate_permutation("track", &before, &ordered_ids)?;
        Ok(Self {
            project_id,
            before,
            after: ordered_ids,
        })
    }

    /// Move one track to `new_index` in the layout
    pub fn move_track(
        store: &OptimisticStore,
        track_id: Uuid,
        new_index: usize,
    ) -> Result<Self, EditorError> {
        let current: Vec<Uuid> = store.tracks().iter().map(|t| t.id).collect();
        let ordered = moved(&current, track_id, new_index).ok_or(EditorError::NotFound(
            sync_backend::EntityKind::Track,
            track_id,
        ))?;
        Self::new(store, ordered)
    }

    fn mutation(&self, ordered_ids: &[Uuid]) -> Mutation {
        Mutation::Track(TrackMutation::Reorder {
            project_id: self.project_id,
            ordered_ids: ordered_ids.to_vec(),
        })
    }
}

#[async_trait]
impl Action for ReorderTracksAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.mutation(&self.after)).await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.mutation(&self.before)).await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Reorder tracks".to_string()
    }
}

/// Action that sets the full effect order of one track
pub struct ReorderEffectsAction {
    track_id: Uuid,
    before: Vec<Uuid>,
    after: Vec<Uuid>,
}

impl ReorderEffectsAction {
    pub fn new(
        store: &OptimisticStore,
        track_id: Uuid,
        ordered_ids: Vec<Uuid>,
    ) -> Result<Self, EditorError> {
        let before: Vec<Uuid> = store.effects_on_track(&track_id).iter().map(|e| e.id).collect();
        validate_permutation("effect", &before, &ordered_ids)?;
        Ok(Self {
            track_id,
            before,
            after: ordered_ids,
        })
    }

    pub fn move_effect(
        store: &OptimisticStore,
        track_id: Uuid,
        effect_id: Uuid,
        new_index: usize,
    ) -> Result<Self, EditorError> {
        let current: Vec<Uuid> = store.effects_on_track(&track_id).iter().map(|e| e.id).collect();
        let ordered = moved(&current, effect_id, new_index).ok_or(EditorError::NotFound(
            sync_backend::EntityKind::Effect,
            effect_id,
        ))?;
        Self::new(store, track_id, ordered)
    }

    fn mutation(&self, ordered_ids: &[Uuid]) -> Mutation {
        Mutation::Effect(EffectMutation::Reorder {
            track_id: self.track_id,
            ordered_ids: ordered_ids.to_vec(),
        })
    }
}

#[async_trait]
impl Action for ReorderEffectsAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.mutation(&self.after)).await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store.mutate(self.mutation(&self.before)).await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Reorder effects".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fixture;

    #[tokio::test]
    async fn test_reorder_tracks_round_trip() {
        let f = fixture().await;
        let original = f.store.view();
        let mut action = ReorderTracksAction::new(&f.store, vec![f.track_b, f.track_a]).unwrap();

        action.execute(&f.store).await.unwrap();
        let ids: Vec<Uuid> = f.store.tracks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![f.track_b, f.track_a]);

        action.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), original);
    }

    #[tokio::test]
    async fn test_reorder_with_missing_id_is_invariant_violation() {
        let f = fixture().await;
        let result = ReorderTracksAction::new(&f.store, vec![f.track_b]);
        assert!(matches!(result, Err(EditorError::InvariantViolation(_))));

        let duplicated = ReorderTracksAction::new(&f.store, vec![f.track_a, f.track_a]);
        assert!(matches!(duplicated, Err(EditorError::InvariantViolation(_))));
    }

    #[tokio::test]
    async fn test_move_track_to_front() {
        let f = fixture().await;
        let mut action = ReorderTracksAction::move_track(&f.store, f.track_b, 0).unwrap();
        action.execute(&f.store).await.unwrap();
        assert_eq!(f.store.tracks()[0].id, f.track_b);
    }

    #[test]
    fn test_moved_clamps_index() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let result = moved(&ids, ids[0], 10).unwrap();
        assert_eq!(result, vec![ids[1], ids[2], ids[0]]);
        assert!(moved(&ids, Uuid::new_v4(), 0).is_none());
    }
}
