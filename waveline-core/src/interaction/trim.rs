//! Trim gesture
//!
//! Dragging a clip edge. The left edge moves the start and the source offset
//! together, so the audio under the remaining part stays put; the right edge
//! only changes the duration.

use crate::actions::TrimClipAction;
use crate::snapshot::TrimWindow;
use sync_backend::{Clip, Samples};
use uuid::Uuid;

/// Which edge of the clip is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// Compute the trim window after dragging `edge` by `delta` samples
///
/// Left edge: the delta is reduced so neither the source offset nor the
/// start time goes negative, then so at least one sample remains.
/// Right edge: the duration is clamped to `[1, source_duration - audio_start_time]`.
pub fn compute_trim(
    original: TrimWindow,
    edge: TrimEdge,
    delta: Samples,
    source_duration: Samples,
) -> TrimWindow {
    match edge {
        TrimEdge::Left => {
            let mut delta = delta;
            if original.audio_start_time + delta < 0 {
                delta = -original.audio_start_time;
            }
            if original.start_time + delta < 0 {
                delta = -original.start_time;
            }
            if original.duration - delta < 1 {
                delta = original.duration - 1;
            }
            TrimWindow {
                start_time: original.start_time + delta,
                audio_start_time: original.audio_start_time + delta,
                duration: original.duration - delta,
            }
        }
        TrimEdge::Right => {
            let max_duration = (source_duration - original.audio_start_time).max(1);
            TrimWindow {
                duration: (original.duration + delta).clamp(1, max_duration),
                ..original
            }
        }
    }
}

/// A trim in progress
#[derive(Debug, Clone)]
pub struct TrimGesture {
    clip_id: Uuid,
    edge: TrimEdge,
    original: TrimWindow,
    source_duration: Samples,
    /// Pointer position when the trim started
    anchor: Samples,
    current: TrimWindow,
}

impl TrimGesture {
    /// Start trimming `clip`
    ///
    /// Without a known source length the source is taken to end at
    /// `audio_start_time + duration`, not at `duration`: the clip may shrink
    /// but never grow past the end of the audio it currently plays, and a
    /// clip with an offset keeps its full visible length.
    pub fn start(clip: &Clip, edge: TrimEdge, pointer: Samples, source_duration: Option<Samples>) -> Self {
        let original = TrimWindow::of(clip);
        let source_duration =
            source_duration.unwrap_or(original.audio_start_time + original.duration);
        Self {
            clip_id: clip.id,
            edge,
            original,
            source_duration,
            anchor: pointer,
            current: original,
        }
    }

    /// Recompute the window for the pointer's new position; local state only
    pub fn update(&mut self, pointer: Samples) {
        self.current = compute_trim(
            self.original,
            self.edge,
            pointer - self.anchor,
            self.source_duration,
        );
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip_id
    }

    pub fn edge(&self) -> TrimEdge {
        self.edge
    }

    /// The window to draw while trimming
    pub fn preview(&self) -> TrimWindow {
        self.current
    }

    /// Finish the trim; an unchanged window still produces an action
    pub fn finish(self) -> TrimClipAction {
        TrimClipAction::new(self.clip_id, self.original, self.current)
    }
}
