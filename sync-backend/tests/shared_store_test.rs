//! Integration tests for a store shared by several clients

use std::sync::Arc;
use sync_backend::{
    Clip, ClipMutation, EffectKind, FilterMode, MemoryStore, Mutation, Project, Query,
    QueryResponse, Rejection, RemoteStore, Track, TrackEffect, TrackMutation,
};
use uuid::Uuid;

fn shared_project() -> (Arc<MemoryStore>, Uuid, Track, Clip) {
    let project = Project::new("Shared");
    let project_id = project.id;
    let store = Arc::new(MemoryStore::with_project(project));
    let track = Track::new(project_id, "Vocals", 0);
    let clip = Clip::new(project_id, track.id, Uuid::new_v4(), "Take 1", 0, 48_000);
    store.seed(vec![track.clone()], vec![clip.clone()], vec![]);
    (store, project_id, track, clip)
}

#[tokio::test]
async fn test_stale_edit_after_collaborator_delete_is_conflict() {
    let (store, _, _, clip) = shared_project();
    let alice: Arc<dyn RemoteStore> = store.clone();
    let bob: Arc<dyn RemoteStore> = store.clone();

    alice
        .mutate(Mutation::Clip(ClipMutation::Delete { id: clip.id }))
        .await
        .unwrap();
    let err = bob
        .mutate(Mutation::Clip(ClipMutation::Move {
            id: clip.id,
            start_time: 96_000,
        }))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(store.mutation_log().len(), 1);
}

#[tokio::test]
async fn test_track_delete_cascades_to_clips_and_effects() {
    let (store, project_id, track, _) = shared_project();
    let effect = TrackEffect::new(
        track.id,
        0,
        EffectKind::Filter {
            cutoff_hz: 800.0,
            resonance: 0.7,
            mode: FilterMode::LowPass,
        },
    );
    store.seed(vec![], vec![], vec![effect]);

    store
        .mutate(Mutation::Track(TrackMutation::Delete { id: track.id }))
        .await
        .unwrap();

    match store.query(Query::ClipsByProject(project_id)).await.unwrap() {
        QueryResponse::Clips(clips) => assert!(clips.is_empty()),
        other => panic!("unexpected response {:?}", other),
    }
    match store.query(Query::EffectsByTrack(track.id)).await.unwrap() {
        QueryResponse::Effects(effects) => assert!(effects.is_empty()),
        other => panic!("unexpected response {:?}", other),
    }
}

#[tokio::test]
async fn test_reorder_requires_every_track() {
    let (store, project_id, track, _) = shared_project();
    let second = Track::new(project_id, "Guitar", 1);
    store
        .mutate(Mutation::Track(TrackMutation::Create(second.clone())))
        .await
        .unwrap();

    let partial = store
        .mutate(Mutation::Track(TrackMutation::Reorder {
            project_id,
            ordered_ids: vec![second.id],
        }))
        .await;
    assert!(matches!(partial, Err(Rejection::Invalid(_))));

    store
        .mutate(Mutation::Track(TrackMutation::Reorder {
            project_id,
            ordered_ids: vec![second.id, track.id],
        }))
        .await
        .unwrap();
    match store.query(Query::TracksByProject(project_id)).await.unwrap() {
        QueryResponse::Tracks(tracks) => {
            let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["Guitar", "Vocals"]);
        }
        other => panic!("unexpected response {:?}", other),
    }
}

#[test]
fn test_effect_payload_is_tagged_on_the_wire() {
    let effect = EffectKind::Eq {
        low_db: 2.0,
        mid_db: 0.0,
        high_db: -3.0,
    };
    let json = serde_json::to_value(&effect).unwrap();
    assert_eq!(json["type"], "Eq");
    assert_eq!(json["high_db"], -3.0);
}
