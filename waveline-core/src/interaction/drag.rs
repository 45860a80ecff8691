//! Drag gesture (move or duplicate)
//!
//! The gesture only tracks where the clip would land. Nothing reaches the
//! store until `finish` turns it into an action.

use crate::action::{Action, CompoundAction};
use crate::actions::{AddClipAction, MoveClipAction};
use crate::coords::TrackRow;
use crate::snapshot::ClipPlacement;
use sync_backend::{Clip, Samples, Track};
use uuid::Uuid;

/// What releasing the drag does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Move the dragged clip
    Move,
    /// Leave the originals and create copies at the drop position
    Duplicate,
}

/// A move or duplicate drag in progress
#[derive(Debug, Clone)]
pub struct DragGesture {
    clip: Clip,
    mode: DragMode,
    /// Other selected clips, copied along with `clip` in duplicate mode
    companions: Vec<Clip>,
    origin_row: usize,
    /// Pointer time minus clip start at pointer-down
    grab_offset: Samples,
    target_row: usize,
    target_start: Samples,
}

impl DragGesture {
    /// Start dragging `clip`, which sits on layout row `origin_row`
    pub fn start(
        clip: Clip,
        origin_row: usize,
        pointer: Samples,
        mode: DragMode,
        companions: Vec<Clip>,
    ) -> Self {
        let companions = match mode {
            DragMode::Move => Vec::new(),
            DragMode::Duplicate => companions.into_iter().filter(|c| c.id != clip.id).collect(),
        };
        Self {
            grab_offset: pointer - clip.start_time,
            target_start: clip.start_time,
            target_row: origin_row,
            origin_row,
            companions,
            mode,
            clip,
        }
    }

    /// Follow the pointer; the row is clamped to existing tracks
    ///
    /// Above the first track the last valid row is kept.
    pub fn update(&mut self, pointer: Samples, row: TrackRow, track_count: usize) {
        self.target_start = (pointer - self.grab_offset).max(0);
        if let TrackRow::Index(index) = row {
            if track_count > 0 {
                self.target_row = index.min(track_count - 1);
            }
        }
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip.id
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Row and start time to draw the dragged clip at
    pub fn preview(&self) -> (usize, Samples) {
        (self.target_row, self.target_start)
    }

    fn time_delta(&self) -> Samples {
        self.target_start - self.clip.start_time
    }

    fn row_delta(&self) -> isize {
        self.target_row as isize - self.origin_row as isize
    }

    /// Finish the drag against the current track layout
    ///
    /// Returns `None` when the pointer ended where it started (a plain click)
    /// or the target track no longer exists.
    pub fn finish(self, tracks: &[Track]) -> Option<Box<dyn Action>> {
        if self.time_delta() == 0 && self.row_delta() == 0 {
            return None;
        }
        match self.mode {
            DragMode::Move => {
                let target_track = tracks.get(self.target_row)?;
                let action = MoveClipAction::new(
                    self.clip.id,
                    ClipPlacement::of(&self.clip),
                    ClipPlacement {
                        track_id: target_track.id,
                        start_time: self.target_start,
                    },
                );
                Some(Box::new(action))
            }
            DragMode::Duplicate => {
                let (time_delta, row_delta) = (self.time_delta(), self.row_delta());
                let actions: Vec<Box<dyn Action>> = std::iter::once(&self.clip)
                    .chain(self.companions.iter())
                    .filter_map(|clip| duplicate_of(clip, tracks, time_delta, row_delta))
                    .map(|copy| Box::new(AddClipAction::new(copy)) as Box<dyn Action>)
                    .collect();
                let description = if actions.len() == 1 {
                    "Duplicate clip".to_string()
                } else {
                    format!("Duplicate {} clips", actions.len())
                };
                CompoundAction::group(description, actions)
            }
        }
    }
}

/// A copy of `clip` shifted by the drag offsets, clamped on its own
fn duplicate_of(clip: &Clip, tracks: &[Track], time_delta: Samples, row_delta: isize) -> Option<Clip> {
    let row = tracks.iter().position(|t| t.id == clip.track_id)?;
    let last_row = tracks.len().checked_sub(1)? as isize;
    let target_row = (row as isize + row_delta).clamp(0, last_row) as usize;

    let mut copy = clip.clone();
    copy.id = Uuid::new_v4();
    copy.track_id = tracks[target_row].id;
    copy.start_time = (clip.start_time + time_delta).max(0);
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(count: usize) -> (Uuid, Vec<Track>) {
        let project_id = Uuid::new_v4();
        let tracks = (0..count)
            .map(|i| Track::new(project_id, format!("Track {}", i + 1), i as i32))
            .collect();
        (project_id, tracks)
    }

    fn clip_on(project_id: Uuid, track: &Track, start: Samples) -> Clip {
        Clip::new(project_id, track.id, Uuid::new_v4(), "Take", start, 1000)
    }

    #[test]
    fn test_drag_clamps_start_and_row() {
        let (project_id, tracks) = layout(2);
        let clip = clip_on(project_id, &tracks[0], 500);
        let mut drag = DragGesture::start(clip, 0, 700, DragMode::Move, Vec::new());

        drag.update(100, TrackRow::Index(7), tracks.len());
        assert_eq!(drag.preview(), (1, 0));

        drag.update(900, TrackRow::AboveTracks, tracks.len());
        assert_eq!(drag.preview(), (1, 700));
    }

    #[test]
    fn test_click_without_motion_builds_nothing() {
        let (project_id, tracks) = layout(1);
        let clip = clip_on(project_id, &tracks[0], 500);
        let mut drag = DragGesture::start(clip, 0, 700, DragMode::Move, Vec::new());
        drag.update(700, TrackRow::Index(0), 1);
        assert!(drag.finish(&tracks).is_none());
    }

    #[test]
    fn test_move_builds_single_action() {
        let (project_id, tracks) = layout(2);
        let clip = clip_on(project_id, &tracks[0], 500);
        let companion = clip_on(project_id, &tracks[0], 3000);
        let mut drag = DragGesture::start(clip, 0, 500, DragMode::Move, vec![companion]);

        drag.update(800, TrackRow::Index(1), 2);
        let action = drag.finish(&tracks).unwrap();
        assert_eq!(action.description(), "Move clip to track");
    }

    #[test]
    fn test_duplicate_offsets_companions_independently() {
        let (project_id, tracks) = layout(3);
        let primary = clip_on(project_id, &tracks[1], 1000);
        let near_zero = clip_on(project_id, &tracks[1], 200);
        let copy = duplicate_of(&near_zero, &tracks, -500, 1).unwrap();
        assert_eq!(copy.start_time, 0);
        assert_eq!(copy.track_id, tracks[2].id);
        assert_ne!(copy.id, near_zero.id);

        let clamped = duplicate_of(&primary, &tracks, 0, 5).unwrap();
        assert_eq!(clamped.track_id, tracks[2].id);

        let mut drag =
            DragGesture::start(primary, 1, 1000, DragMode::Duplicate, vec![near_zero]);
        drag.update(1500, TrackRow::Index(2), 3);
        let action = drag.finish(&tracks).unwrap();
        assert_eq!(action.description(), "Duplicate 2 clips");
    }
}
