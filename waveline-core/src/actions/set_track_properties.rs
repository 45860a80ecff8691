//! Set track properties action
//!
//! Handles changing track properties (name, color, mute, solo, gain, pan)
//! with undo/redo support.

use crate::action::Action;
use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use crate::snapshot::{SnapshotPair, TrackProperties};
use async_trait::async_trait;
use sync_backend::Track;
use uuid::Uuid;

/// Longest track name the store accepts, in characters
pub const MAX_TRACK_NAME_LEN: usize = 50;

/// Property that can be set on a track
#[derive(Clone, Debug, PartialEq)]
pub enum TrackProperty {
    Name(String),
    Color(Option<String>),
    Muted(bool),
    Solo(bool),
    GainDb(f64),
    Pan(f64),
}

impl TrackProperty {
    /// Write this property into a snapshot, normalising out-of-range values
    fn apply_to(&self, props: &mut TrackProperties) {
        match self {
            TrackProperty::Name(name) => props.name = truncate_name(name, MAX_TRACK_NAME_LEN),
            TrackProperty::Color(color) => props.color = color.clone(),
            TrackProperty::Muted(muted) => props.muted = *muted,
            TrackProperty::Solo(solo) => props.solo = *solo,
            TrackProperty::GainDb(gain_db) => props.gain_db = *gain_db,
            TrackProperty::Pan(pan) => props.pan = pan.clamp(-1.0, 1.0),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            TrackProperty::Name(_) => "Rename track",
            TrackProperty::Color(_) => "Change track color",
            TrackProperty::Muted(true) => "Mute track",
            TrackProperty::Muted(false) => "Unmute track",
            TrackProperty::Solo(true) => "Solo track",
            TrackProperty::Solo(false) => "Unsolo track",
            TrackProperty::GainDb(_) => "Change track gain",
            TrackProperty::Pan(_) => "Change track pan",
        }
    }
}

/// Truncate a name to at most `max_len` characters
pub fn truncate_name(name: &str, max_len: usize) -> String {
    name.chars().take(max_len).collect()
}

/// Action that sets a property on one or more tracks
pub struct SetTrackPropertiesAction {
    /// Before/after snapshot per track, in the order given
    changes: Vec<(Uuid, SnapshotPair<TrackProperties>)>,
    description: String,
}

impl SetTrackPropertiesAction {
    /// Create a new action to set a property on a single track
    pub fn new(track: &Track, property: TrackProperty) -> Self {
        Self::new_batch(std::slice::from_ref(track), property)
    }

    /// Create a new action to set a property on multiple tracks
    pub fn new_batch(tracks: &[Track], property: TrackProperty) -> Self {
        let changes = tracks
            .iter()
            .map(|track| {
                let before = TrackProperties::of(track);
                let mut after = before.clone();
                property.apply_to(&mut after);
                (track.id, SnapshotPair::new(before, after))
            })
            .collect();
        Self {
            changes,
            description: property.description().to_string(),
        }
    }

    /// Build from explicit snapshots, e.g. a fader's start and release values
    pub fn from_snapshots(
        track_id: Uuid,
        before: TrackProperties,
        after: TrackProperties,
        description: impl Into<String>,
    ) -> Self {
        Self {
            changes: vec![(track_id, SnapshotPair::new(before, after))],
            description: description.into(),
        }
    }

    /// Whether executing would leave every track as it is
    pub fn is_noop(&self) -> bool {
        self.changes.iter().all(|(_, pair)| pair.is_unchanged())
    }
}

#[async_trait]
impl Action for SetTrackPropertiesAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        for (index, (track_id, pair)) in self.changes.iter().enumerate() {
            if let Err(e) = store.mutate(pair.after.to_mutation(*track_id)).await {
                // Put the tracks already changed back before reporting
                for (applied_id, applied) in self.changes[..index].iter().rev() {
                    if let Err(undo_err) = store.mutate(applied.before.to_mutation(*applied_id)).await {
                        log::warn!("could not restore track {}: {}", applied_id, undo_err);
                    }
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        for (track_id, pair) in self.changes.iter().rev() {
            store.mutate(pair.before.to_mutation(*track_id)).await?;
        }
        Ok(())
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}
