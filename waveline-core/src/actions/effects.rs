//! Effect chain actions

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use crate::snapshot::{EffectSettings, SnapshotPair};
use async_trait::async_trait;
use sync_backend::{EffectKind, EffectMutation, Mutation, Track, TrackEffect};
use uuid::Uuid;

/// Action that appends an effect to a track's chain
pub struct AddEffectAction {
    effect: TrackEffect,
}

impl AddEffectAction {
    pub fn new(effect: TrackEffect) -> Self {
        Self { effect }
    }

    /// A new effect placed at the end of the chain `existing`
    pub fn append(track: &Track, effect: EffectKind, existing: &[TrackEffect]) -> Self {
        let order = existing
            .iter()
            .map(|e| e.order)
            .max()
            .map_or(0, |max| max + 1);
        Self::new(TrackEffect::new(track.id, order, effect))
    }

    pub fn effect_id(&self) -> Uuid {
        self.effect.id
    }
}

#[async_trait]
impl Action for AddEffectAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Effect(EffectMutation::Create(self.effect.clone())))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Effect(EffectMutation::Delete { id: self.effect.id }))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Add effect".to_string()
    }
}

/// Action that removes an effect, re-inserting the same row on undo
pub struct DeleteEffectAction {
    effect: TrackEffect,
}

impl DeleteEffectAction {
    pub fn new(effect: TrackEffect) -> Self {
        Self { effect }
    }
}

#[async_trait]
impl Action for DeleteEffectAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Effect(EffectMutation::Delete { id: self.effect.id }))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(Mutation::Effect(EffectMutation::Create(self.effect.clone())))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Delete effect".to_string()
    }
}

/// Action that changes an effect's enabled flag and parameters
pub struct SetEffectAction {
    effect_id: Uuid,
    settings: SnapshotPair<EffectSettings>,
}

impl SetEffectAction {
    pub fn new(effect: &TrackEffect, after: EffectSettings) -> Self {
        Self {
            effect_id: effect.id,
            settings: SnapshotPair::new(EffectSettings::of(effect), after),
        }
    }

    /// Toggle bypass on an effect
    pub fn toggle_enabled(effect: &TrackEffect) -> Self {
        let after = EffectSettings {
            enabled: !effect.enabled,
            effect: effect.effect.clone(),
        };
        Self::new(effect, after)
    }
}

#[async_trait]
impl Action for SetEffectAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(self.settings.after.to_mutation(self.effect_id))
            .await?;
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        store
            .mutate(self.settings.before.to_mutation(self.effect_id))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        if self.settings.before.enabled != self.settings.after.enabled {
            if self.settings.after.enabled {
                "Enable effect".to_string()
            } else {
                "Bypass effect".to_string()
            }
        } else {
            "Change effect".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::fixture;
    use sync_backend::FilterMode;

    fn low_pass() -> EffectKind {
        EffectKind::Filter {
            cutoff_hz: 1200.0,
            resonance: 0.5,
            mode: FilterMode::LowPass,
        }
    }

    #[tokio::test]
    async fn test_effect_chain_lifecycle() {
        let f = fixture().await;
        let original = f.store.view();
        let track = f.store.track(&f.track_a).unwrap();

        let mut add = AddEffectAction::append(&track, low_pass(), &[]);
        add.execute(&f.store).await.unwrap();
        let effect = f.store.effect(&add.effect_id()).unwrap();
        assert!(effect.enabled);

        let mut bypass = SetEffectAction::toggle_enabled(&effect);
        assert_eq!(bypass.description(), "Bypass effect");
        bypass.execute(&f.store).await.unwrap();
        assert!(!f.store.effect(&effect.id).unwrap().enabled);
        bypass.rollback(&f.store).await.unwrap();

        let mut delete = DeleteEffectAction::new(f.store.effect(&effect.id).unwrap());
        delete.execute(&f.store).await.unwrap();
        assert!(f.store.effect(&effect.id).is_none());
        delete.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.effect(&effect.id), Some(effect));

        add.rollback(&f.store).await.unwrap();
        assert_eq!(f.store.view(), original);
    }

    #[tokio::test]
    async fn test_change_effect_parameters() {
        let f = fixture().await;
        let track = f.store.track(&f.track_a).unwrap();
        let mut add = AddEffectAction::append(&track, low_pass(), &[]);
        add.execute(&f.store).await.unwrap();
        let effect = f.store.effect(&add.effect_id()).unwrap();

        let eq = EffectKind::Eq {
            low_db: 3.0,
            mid_db: 0.0,
            high_db: -2.0,
        };
        let mut change = SetEffectAction::new(
            &effect,
            EffectSettings {
                enabled: true,
                effect: eq.clone(),
            },
        );
        change.execute(&f.store).await.unwrap();
        assert_eq!(f.store.effect(&effect.id).unwrap().effect, eq);
        assert_eq!(change.description(), "Change effect");
    }
}
