//! Optimistic store
//!
//! Two-layer view over a remote store: the rows the remote has confirmed,
//! plus an ordered list of in-flight patches. Reads replay the patches over
//! the confirmed rows, so a mutation is visible locally before its round-trip
//! finishes. A confirmed patch is folded into the confirmed layer; a rejected
//! one is simply dropped, which rolls it back.

use parking_lot::Mutex;
use std::sync::Arc;
use sync_backend::{
    Clip, ClipMutation, EntityKind, EntityTables, Mutation, Project, Query, QueryResponse,
    Rejection, RemoteStore, Track, TrackEffect,
};
use uuid::Uuid;

/// Identifier of an in-flight patch
pub type PatchId = u64;

#[derive(Debug, Clone)]
struct Patch {
    id: PatchId,
    mutation: Mutation,
}

#[derive(Default)]
struct OverlayState {
    project_id: Option<Uuid>,
    confirmed: EntityTables,
    in_flight: Vec<Patch>,
    next_patch_id: PatchId,
}

impl OverlayState {
    fn merged(&self) -> EntityTables {
        let mut view = self.confirmed.clone();
        for patch in &self.in_flight {
            if let Err(e) = view.apply(&patch.mutation) {
                log::debug!("patch {} no longer applies locally: {}", patch.id, e);
            }
        }
        view
    }

    fn take_patch(&mut self, id: PatchId) -> Option<Patch> {
        let index = self.in_flight.iter().position(|p| p.id == id)?;
        Some(self.in_flight.remove(index))
    }
}

/// Local, immediately consistent view of a remote store
pub struct OptimisticStore {
    remote: Arc<dyn RemoteStore>,
    state: Mutex<OverlayState>,
}

impl OptimisticStore {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote,
            state: Mutex::new(OverlayState::default()),
        }
    }

    /// The remote this store forwards to
    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    /// Load a project's rows into the confirmed layer, dropping anything held before
    pub async fn load(&self, project_id: Uuid) -> Result<Project, Rejection> {
        let tables = self.fetch(project_id).await?;
        let project = tables
            .projects
            .get(&project_id)
            .cloned()
            .ok_or(Rejection::NotFound {
                kind: EntityKind::Project,
                id: project_id,
            })?;
        let mut state = self.state.lock();
        state.project_id = Some(project_id);
        state.confirmed = tables;
        state.in_flight.clear();
        log::info!("loaded project {} ({})", project.name, project_id);
        Ok(project)
    }

    /// Re-read the confirmed layer (picks up collaborators' edits); in-flight patches are kept
    pub async fn refresh(&self) -> Result<(), Rejection> {
        let Some(project_id) = self.project_id() else {
            return Ok(());
        };
        let tables = self.fetch(project_id).await?;
        self.state.lock().confirmed = tables;
        Ok(())
    }

    async fn fetch(&self, project_id: Uuid) -> Result<EntityTables, Rejection> {
        let mut tables = EntityTables::new();
        if let QueryResponse::Project(project) = self.remote.query(Query::Project(project_id)).await? {
            tables.insert_project(project);
        }
        if let QueryResponse::Tracks(tracks) =
            self.remote.query(Query::TracksByProject(project_id)).await?
        {
            tables.tracks = tracks.into_iter().map(|t| (t.id, t)).collect();
        }
        if let QueryResponse::Clips(clips) =
            self.remote.query(Query::ClipsByProject(project_id)).await?
        {
            tables.clips = clips.into_iter().map(|c| (c.id, c)).collect();
        }
        if let QueryResponse::Effects(effects) =
            self.remote.query(Query::EffectsByProject(project_id)).await?
        {
            tables.effects = effects.into_iter().map(|e| (e.id, e)).collect();
        }
        Ok(tables)
    }

    /// Apply a mutation locally, forward it, and settle the patch with the result
    ///
    /// A mutation that cannot apply to the current local view is refused
    /// without contacting the remote.
    pub async fn mutate(&self, mutation: Mutation) -> Result<(), Rejection> {
        let patch_id = {
            let mut state = self.state.lock();
            state.merged().check(&mutation)?;
            let id = state.next_patch_id;
            state.next_patch_id += 1;
            state.in_flight.push(Patch {
                id,
                mutation: mutation.clone(),
            });
            id
        };

        let result = self.remote.mutate(mutation.clone()).await;

        let mut state = self.state.lock();
        let patch = state.take_patch(patch_id);
        match result {
            Ok(()) => {
                if let Err(e) = state.confirmed.apply(&mutation) {
                    // The remote accepted it, so our confirmed rows are stale.
                    log::warn!(
                        "confirmed {} on {} does not apply to local rows: {}",
                        mutation.name(),
                        mutation.target_id(),
                        e
                    );
                }
                log::debug!("confirmed patch {} ({})", patch_id, mutation.name());
                Ok(())
            }
            Err(rejection) => {
                if patch.is_some() {
                    log::warn!(
                        "rolled back patch {} ({} on {}): {}",
                        patch_id,
                        mutation.name(),
                        mutation.target_id(),
                        rejection
                    );
                }
                Err(rejection)
            }
        }
    }

    /// Id of the loaded project
    pub fn project_id(&self) -> Option<Uuid> {
        self.state.lock().project_id
    }

    /// Confirmed rows merged with in-flight patches
    pub fn view(&self) -> EntityTables {
        self.state.lock().merged()
    }

    /// Rows the remote has confirmed, without in-flight patches
    pub fn confirmed(&self) -> EntityTables {
        self.state.lock().confirmed.clone()
    }

    pub fn clip(&self, id: &Uuid) -> Option<Clip> {
        self.view().clip(id).cloned()
    }

    pub fn track(&self, id: &Uuid) -> Option<Track> {
        self.view().track(id).cloned()
    }

    pub fn effect(&self, id: &Uuid) -> Option<TrackEffect> {
        self.view().effect(id).cloned()
    }

    /// Tracks of the loaded project in layout order
    pub fn tracks(&self) -> Vec<Track> {
        let state = self.state.lock();
        let Some(project_id) = state.project_id else {
            return Vec::new();
        };
        state
            .merged()
            .tracks_in_order(&project_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Clips on a track, sorted by start time
    pub fn clips_on_track(&self, track_id: &Uuid) -> Vec<Clip> {
        self.view()
            .clips_on_track(track_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Effects of a track in chain order
    pub fn effects_on_track(&self, track_id: &Uuid) -> Vec<TrackEffect> {
        self.view()
            .effects_in_order(track_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether a clip's create mutation is still awaiting confirmation
    pub fn is_pending(&self, clip_id: &Uuid) -> bool {
        self.state.lock().in_flight.iter().any(|patch| {
            matches!(&patch.mutation, Mutation::Clip(ClipMutation::Create(clip)) if &clip.id == clip_id)
        })
    }

    /// Number of patches awaiting the remote
    pub fn in_flight_count(&self) -> usize {
        self.state.lock().in_flight.len()
    }
}
