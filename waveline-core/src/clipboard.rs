//! In-memory clip clipboard
//!
//! Copy keeps each clip's audio reference and trim window plus its offset from
//! the earliest copied clip. Paste recreates the clips at the playhead with
//! fresh ids, sharing the original audio files.

use crate::action::{Action, CompoundAction};
use crate::actions::AddClipAction;
use serde::{Deserialize, Serialize};
use sync_backend::{Clip, Samples};
use uuid::Uuid;

/// One copied clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub audio_file_id: Uuid,
    pub name: String,
    pub duration: Samples,
    pub audio_start_time: Samples,
    pub gain_db: f64,
    /// Start time relative to the earliest copied clip
    pub offset_from_first: Samples,
}

/// Clipboard contents
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    entries: Vec<ClipboardEntry>,
    source_track_id: Option<Uuid>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `clips`; an empty slice leaves the clipboard as it was
    pub fn copy(&mut self, clips: &[Clip]) {
        let mut sorted: Vec<&Clip> = clips.iter().collect();
        sorted.sort_by_key(|clip| clip.start_time);
        let Some(first) = sorted.first() else {
            return;
        };
        let first_start = first.start_time;
        self.source_track_id = Some(first.track_id);
        self.entries = sorted
            .iter()
            .map(|clip| ClipboardEntry {
                audio_file_id: clip.audio_file_id,
                name: clip.name.clone(),
                duration: clip.duration,
                audio_start_time: clip.audio_start_time,
                gain_db: clip.gain_db,
                offset_from_first: clip.start_time - first_start,
            })
            .collect();
        log::debug!("copied {} clip(s)", self.entries.len());
    }

    /// The clips a paste at `anchor` would create, each with a fresh id
    pub fn pasted_clips(&self, project_id: Uuid, anchor: Samples) -> Vec<Clip> {
        let Some(track_id) = self.source_track_id else {
            return Vec::new();
        };
        self.entries
            .iter()
            .map(|entry| {
                let mut clip = Clip::new(
                    project_id,
                    track_id,
                    entry.audio_file_id,
                    entry.name.clone(),
                    anchor + entry.offset_from_first,
                    entry.duration,
                );
                clip.audio_start_time = entry.audio_start_time;
                clip.gain_db = entry.gain_db;
                clip
            })
            .collect()
    }

    /// Build the paste as one undo step, or `None` when the clipboard is empty
    pub fn paste(&self, project_id: Uuid, anchor: Samples) -> Option<CompoundAction> {
        let clips = self.pasted_clips(project_id, anchor);
        if clips.is_empty() {
            return None;
        }
        let description = if clips.len() == 1 {
            "Paste clip".to_string()
        } else {
            format!("Paste {} clips", clips.len())
        };
        let actions: Vec<Box<dyn Action>> = clips
            .into_iter()
            .map(|clip| Box::new(AddClipAction::new(clip)) as Box<dyn Action>)
            .collect();
        Some(CompoundAction::new(description, actions))
    }

    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    pub fn source_track_id(&self) -> Option<Uuid> {
        self.source_track_id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.source_track_id = None;
    }

    /// Serialize the contents, e.g. to hand them to another editor window
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
