//! In-process authoritative store
//!
//! Holds the rows behind a lock and accepts mutations from any number of
//! clients sharing it through an `Arc`. Failures can be queued up front to
//! exercise rejection paths, and every accepted mutation is logged in order.

use crate::command::{Mutation, Query, QueryResponse};
use crate::model::{Clip, Project, Track, TrackEffect};
use crate::store::{RemoteStore, Rejection};
use crate::tables::EntityTables;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Default)]
struct MemoryState {
    tables: EntityTables,
    /// Accepted mutations in arrival order
    log: Vec<Mutation>,
    /// Outcomes handed to the next `mutate` calls, front first; `None` lets one through
    queued_failures: VecDeque<Option<Rejection>>,
    revision: u64,
}

/// Authoritative store living in this process
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a project
    pub fn with_project(project: Project) -> Self {
        let store = Self::new();
        store.state.lock().tables.insert_project(project);
        store
    }

    /// Insert rows directly, bypassing the mutation log
    pub fn seed(&self, tracks: Vec<Track>, clips: Vec<Clip>, effects: Vec<TrackEffect>) {
        let mut state = self.state.lock();
        for track in tracks {
            state.tables.tracks.insert(track.id, track);
        }
        for clip in clips {
            state.tables.clips.insert(clip.id, clip);
        }
        for effect in effects {
            state.tables.effects.insert(effect.id, effect);
        }
        state.revision += 1;
    }

    /// Make the next `mutate` call fail with `rejection`
    pub fn fail_next(&self, rejection: Rejection) {
        self.state.lock().queued_failures.push_back(Some(rejection));
    }

    /// Let `allowed` more `mutate` calls through, then fail the next one with `rejection`
    pub fn fail_after(&self, allowed: usize, rejection: Rejection) {
        let mut state = self.state.lock();
        state
            .queued_failures
            .extend(std::iter::repeat(None).take(allowed));
        state.queued_failures.push_back(Some(rejection));
    }

    /// Copy of the current rows
    pub fn snapshot(&self) -> EntityTables {
        self.state.lock().tables.clone()
    }

    /// Accepted mutations, oldest first
    pub fn mutation_log(&self) -> Vec<Mutation> {
        self.state.lock().log.clone()
    }

    /// Bumped by every accepted mutation and every seed
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    fn mutate_now(&self, mutation: Mutation) -> Result<(), Rejection> {
        let mut state = self.state.lock();
        if let Some(Some(rejection)) = state.queued_failures.pop_front() {
            log::warn!("store: refusing {} ({})", mutation.name(), rejection);
            return Err(rejection);
        }
        state.tables.apply(&mutation).inspect_err(|rejection| {
            log::debug!(
                "store: {} on {} rejected: {}",
                mutation.name(),
                mutation.target_id(),
                rejection
            );
        })?;
        log::debug!("store: {} on {}", mutation.name(), mutation.target_id());
        state.log.push(mutation);
        state.revision += 1;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn mutate(&self, mutation: Mutation) -> Result<(), Rejection> {
        self.mutate_now(mutation)
    }

    async fn query(&self, query: Query) -> Result<QueryResponse, Rejection> {
        self.state.lock().tables.answer(&query)
    }
}
