//! Selection state management
//!
//! Tracks the selected clips and the focused track. A selection never spans
//! more than one track, and clips whose creation is still awaiting the store
//! cannot be selected.

use sync_backend::Clip;
use uuid::Uuid;

/// Selection state for the timeline
///
/// This is separate from the store to make it easy to pass around for
/// rendering without needing access to entity rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Currently selected clips, in the order they were selected
    selected_clips: Vec<Uuid>,

    /// Track the selection is confined to
    focused_track: Option<Uuid>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click: select only this clip and focus its track
    pub fn select(&mut self, clip_id: Uuid, track_id: Uuid, pending: bool) {
        if pending {
            log::debug!("ignoring click on pending clip {}", clip_id);
            return;
        }
        self.focused_track = Some(track_id);
        self.selected_clips.clear();
        self.selected_clips.push(clip_id);
    }

    /// Modifier click: add or remove this clip
    ///
    /// A clip on a different track than the focused one replaces the selection.
    pub fn toggle(&mut self, clip_id: Uuid, track_id: Uuid, pending: bool) {
        if pending {
            log::debug!("ignoring toggle on pending clip {}", clip_id);
            return;
        }
        if self.focused_track != Some(track_id) {
            self.select(clip_id, track_id, pending);
            return;
        }
        if self.contains(&clip_id) {
            self.selected_clips.retain(|id| *id != clip_id);
        } else {
            self.selected_clips.push(clip_id);
        }
    }

    /// Select every non-pending clip on the focused track
    ///
    /// `clips` may hold clips from any track; only those on the focused track are taken.
    pub fn select_all_on_focused_track(&mut self, clips: &[Clip], is_pending: impl Fn(&Uuid) -> bool) {
        let Some(track_id) = self.focused_track else {
            return;
        };
        self.selected_clips = clips
            .iter()
            .filter(|clip| clip.track_id == track_id && !is_pending(&clip.id))
            .map(|clip| clip.id)
            .collect();
    }

    /// Focus a track (e.g. by clicking its header); clears a selection on another track
    pub fn focus_track(&mut self, track_id: Uuid) {
        if self.focused_track != Some(track_id) {
            self.selected_clips.clear();
        }
        self.focused_track = Some(track_id);
    }

    /// Clear the selected clips, keeping the focused track
    pub fn clear(&mut self) {
        self.selected_clips.clear();
    }

    /// Forget everything, e.g. when switching projects
    pub fn reset(&mut self) {
        self.selected_clips.clear();
        self.focused_track = None;
    }

    /// Drop selected ids that no longer exist; forget focus on a deleted track
    pub fn retain_existing(
        &mut self,
        clip_exists: impl Fn(&Uuid) -> bool,
        track_exists: impl Fn(&Uuid) -> bool,
    ) {
        self.selected_clips.retain(|id| clip_exists(id));
        if let Some(track_id) = self.focused_track {
            if !track_exists(&track_id) {
                self.focused_track = None;
                self.selected_clips.clear();
            }
        }
    }

    /// Check if a clip is selected
    pub fn contains(&self, clip_id: &Uuid) -> bool {
        self.selected_clips.contains(clip_id)
    }

    pub fn clip_ids(&self) -> &[Uuid] {
        &self.selected_clips
    }

    pub fn focused_track(&self) -> Option<Uuid> {
        self.focused_track
    }

    pub fn is_empty(&self) -> bool {
        self.selected_clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected_clips.len()
    }
}
