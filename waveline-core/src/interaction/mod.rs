//! Pointer interaction state machines
//!
//! Each gesture holds only ephemeral state between pointer-down and
//! pointer-up, and produces at most one action when it finishes.

pub mod drag;
pub mod fader;
pub mod trim;

pub use drag::{DragGesture, DragMode};
pub use fader::{FaderDrag, FaderParameter};
pub use trim::{compute_trim, TrimEdge, TrimGesture};

use crate::coords::{TrackRow, Viewport};
use sync_backend::{Clip, EntityTables, Track};

/// Modifier keys held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Modifier that toggles a clip in the selection
    pub fn toggles_selection(&self) -> bool {
        self.ctrl
    }

    /// Modifier that turns a drag into a duplicate
    pub fn duplicates(&self) -> bool {
        self.alt
    }
}

/// Part of a clip under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipZone {
    Body,
    LeftEdge,
    RightEdge,
}

/// A clip found under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct ClipHit {
    pub clip: Clip,
    /// Layout row of the clip's track
    pub row: usize,
    pub zone: ClipZone,
}

/// Find the clip under `(x, y)` and which part of it was hit
///
/// `tracks` is the layout order. Points within `edge_px` of either end,
/// inside or just outside the clip, count as that edge.
pub fn hit_test(
    viewport: &Viewport,
    tracks: &[Track],
    view: &EntityTables,
    x: f64,
    y: f64,
    edge_px: f64,
) -> Option<ClipHit> {
    let TrackRow::Index(row) = viewport.row_at(y) else {
        return None;
    };
    let track = tracks.get(row)?;

    // Last clip wins where clips overlap, matching draw order
    view.clips_on_track(&track.id)
        .into_iter()
        .rev()
        .find_map(|clip| {
            let start_x = viewport.x_for_samples(clip.start_time);
            let end_x = viewport.x_for_samples(clip.end_time());
            if x < start_x - edge_px || x > end_x + edge_px {
                return None;
            }
            let zone = if (x - start_x).abs() <= edge_px {
                ClipZone::LeftEdge
            } else if (end_x - x).abs() <= edge_px {
                ClipZone::RightEdge
            } else {
                ClipZone::Body
            };
            Some(ClipHit {
                clip: clip.clone(),
                row,
                zone,
            })
        })
}

/// The gesture currently driven by the pointer
#[derive(Debug, Clone)]
pub enum Gesture {
    Drag(DragGesture),
    Trim(TrimGesture),
    Fader(FaderDrag),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_backend::{ClipMutation, Mutation, Project, TrackMutation};
    use uuid::Uuid;

    /// 100 px per second at 1000 Hz: one pixel is ten samples
    fn scene() -> (Viewport, Vec<Track>, EntityTables, Clip) {
        let viewport = Viewport::new(100.0, 30.0, 60.0, 1000);
        let project = Project::new("Test");
        let track = Track::new(project.id, "Drums", 0);
        let clip = Clip::new(project.id, track.id, Uuid::new_v4(), "Kick", 1000, 1000);
        let mut view = EntityTables::new();
        view.apply(&Mutation::Track(TrackMutation::Create(track.clone())))
            .unwrap();
        view.apply(&Mutation::Clip(ClipMutation::Create(clip.clone())))
            .unwrap();
        view.insert_project(project);
        (viewport, vec![track], view, clip)
    }

    #[test]
    fn test_hit_zones() {
        let (viewport, tracks, view, clip) = scene();
        // Clip spans x = 100..200 on the row starting at y = 30
        let body = hit_test(&viewport, &tracks, &view, 150.0, 50.0, 8.0).unwrap();
        assert_eq!(body.zone, ClipZone::Body);
        assert_eq!(body.clip.id, clip.id);
        assert_eq!(body.row, 0);

        let left = hit_test(&viewport, &tracks, &view, 95.0, 50.0, 8.0).unwrap();
        assert_eq!(left.zone, ClipZone::LeftEdge);

        let right = hit_test(&viewport, &tracks, &view, 205.0, 50.0, 8.0).unwrap();
        assert_eq!(right.zone, ClipZone::RightEdge);
    }

    #[test]
    fn test_misses() {
        let (viewport, tracks, view, _) = scene();
        assert!(hit_test(&viewport, &tracks, &view, 50.0, 50.0, 8.0).is_none());
        assert!(hit_test(&viewport, &tracks, &view, 150.0, 10.0, 8.0).is_none());
        assert!(hit_test(&viewport, &tracks, &view, 150.0, 95.0, 8.0).is_none());
    }
}
