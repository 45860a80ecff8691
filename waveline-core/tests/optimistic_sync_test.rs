//! Integration tests for optimistic sync
//!
//! Holds mutations at the remote boundary to observe the editor's view while
//! a round-trip is still in flight.

use async_trait::async_trait;
use std::sync::Arc;
use sync_backend::{
    Clip, ClipMutation, MemoryStore, Mutation, Project, Query, QueryResponse, Rejection,
    RemoteStore, Track, TrackMutation,
};
use tokio::sync::Semaphore;
use uuid::Uuid;
use waveline_core::{OptimisticStore, Selection};

/// Remote store that holds every mutation until released
struct GatedStore {
    inner: MemoryStore,
    gate: Semaphore,
}

impl GatedStore {
    /// Let one held (or future) mutation through
    fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl RemoteStore for GatedStore {
    async fn mutate(&self, mutation: Mutation) -> Result<(), Rejection> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Rejection::Unavailable(e.to_string()))?;
        permit.forget();
        self.inner.mutate(mutation).await
    }

    async fn query(&self, query: Query) -> Result<QueryResponse, Rejection> {
        self.inner.query(query).await
    }
}

struct Setup {
    remote: Arc<GatedStore>,
    store: OptimisticStore,
    project_id: Uuid,
    track: Track,
    clip: Clip,
}

async fn setup() -> Setup {
    let project = Project::new("Sync");
    let project_id = project.id;
    let inner = MemoryStore::with_project(project);
    let track = Track::new(project_id, "Track 1", 0);
    let clip = Clip::new(project_id, track.id, Uuid::new_v4(), "Take", 1_000, 4_000);
    inner.seed(vec![track.clone()], vec![clip.clone()], vec![]);

    let remote = Arc::new(GatedStore {
        inner,
        gate: Semaphore::new(0),
    });
    let store = OptimisticStore::new(remote.clone());
    store.load(project_id).await.unwrap();
    Setup {
        remote,
        store,
        project_id,
        track,
        clip,
    }
}

async fn wait_for_flight(store: &OptimisticStore) {
    while store.in_flight_count() == 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_create_visible_before_confirmation() {
    let s = setup().await;
    let new_clip = Clip::new(s.project_id, s.track.id, Uuid::new_v4(), "New", 8_000, 2_000);

    let create = s
        .store
        .mutate(Mutation::Clip(ClipMutation::Create(new_clip.clone())));
    let observe = async {
        wait_for_flight(&s.store).await;
        assert_eq!(s.store.clip(&new_clip.id), Some(new_clip.clone()));
        assert!(s.store.is_pending(&new_clip.id));
        assert!(s.store.confirmed().clip(&new_clip.id).is_none());
        assert!(s.remote.inner.snapshot().clip(&new_clip.id).is_none());
        s.remote.release();
    };
    let (result, ()) = tokio::join!(create, observe);

    result.unwrap();
    assert!(!s.store.is_pending(&new_clip.id));
    assert!(s.store.confirmed().clip(&new_clip.id).is_some());
    assert_eq!(s.store.in_flight_count(), 0);
}

#[tokio::test]
async fn test_pending_clip_cannot_be_selected() {
    let s = setup().await;
    let new_clip = Clip::new(s.project_id, s.track.id, Uuid::new_v4(), "New", 8_000, 2_000);
    let mut selection = Selection::new();

    let create = s
        .store
        .mutate(Mutation::Clip(ClipMutation::Create(new_clip.clone())));
    let observe = async {
        wait_for_flight(&s.store).await;
        selection.select(new_clip.id, new_clip.track_id, s.store.is_pending(&new_clip.id));
        assert!(selection.is_empty());
        s.remote.release();
    };
    let (result, ()) = tokio::join!(create, observe);
    result.unwrap();

    selection.select(new_clip.id, new_clip.track_id, s.store.is_pending(&new_clip.id));
    assert_eq!(selection.clip_ids(), &[new_clip.id]);
}

#[tokio::test]
async fn test_rejected_move_rolls_back() {
    let s = setup().await;
    s.remote
        .inner
        .fail_next(Rejection::Conflict("clip changed".into()));

    let mv = s.store.mutate(Mutation::Clip(ClipMutation::Move {
        id: s.clip.id,
        start_time: 20_000,
    }));
    let observe = async {
        wait_for_flight(&s.store).await;
        assert_eq!(s.store.clip(&s.clip.id).unwrap().start_time, 20_000);
        s.remote.release();
    };
    let (result, ()) = tokio::join!(mv, observe);

    assert!(matches!(result, Err(Rejection::Conflict(_))));
    assert_eq!(s.store.clip(&s.clip.id).unwrap().start_time, 1_000);
    assert_eq!(s.store.in_flight_count(), 0);
    assert!(s.remote.inner.mutation_log().is_empty());
}

#[tokio::test]
async fn test_refresh_keeps_in_flight_patch() {
    let s = setup().await;

    let mv = s.store.mutate(Mutation::Clip(ClipMutation::Move {
        id: s.clip.id,
        start_time: 6_000,
    }));
    let observe = async {
        wait_for_flight(&s.store).await;
        s.store.refresh().await.unwrap();
        assert_eq!(s.store.clip(&s.clip.id).unwrap().start_time, 6_000);
        assert_eq!(s.store.confirmed().clip(&s.clip.id).unwrap().start_time, 1_000);
        s.remote.release();
    };
    let (result, ()) = tokio::join!(mv, observe);

    result.unwrap();
    assert_eq!(s.store.confirmed().clip(&s.clip.id).unwrap().start_time, 6_000);
}

#[tokio::test]
async fn test_invalid_mutation_never_reaches_remote() {
    let s = setup().await;

    let result = s
        .store
        .mutate(Mutation::Clip(ClipMutation::MoveToTrack {
            id: s.clip.id,
            track_id: Uuid::new_v4(),
            start_time: 0,
        }))
        .await;

    assert!(matches!(result, Err(Rejection::NotFound { .. })));
    assert_eq!(s.store.in_flight_count(), 0);
    assert!(s.remote.inner.mutation_log().is_empty());
}

#[tokio::test]
async fn test_mutations_reach_remote_by_name() {
    let s = setup().await;
    let other = Track::new(s.project_id, "Track 2", 1);

    for _ in 0..3 {
        s.remote.release();
    }
    s.store
        .mutate(Mutation::Track(TrackMutation::Create(other.clone())))
        .await
        .unwrap();
    s.store
        .mutate(Mutation::Clip(ClipMutation::MoveToTrack {
            id: s.clip.id,
            track_id: other.id,
            start_time: 0,
        }))
        .await
        .unwrap();
    s.store
        .mutate(Mutation::Clip(ClipMutation::Delete { id: s.clip.id }))
        .await
        .unwrap();

    let names: Vec<&str> = s
        .remote
        .inner
        .mutation_log()
        .iter()
        .map(|m| m.name())
        .collect();
    assert_eq!(names, vec!["tracks.create", "clips.moveToTrack", "clips.remove"]);
}
