//! Split clip
//!
//! A split is a compound of "trim the original to the left part" followed by
//! "create the right part". Undo runs in reverse, so the remainder is deleted
//! before the original gets its duration back.

use crate::action::{Action, CompoundAction};
use crate::actions::{AddClipAction, TrimClipAction};
use crate::snapshot::TrimWindow;
use sync_backend::{Clip, Samples};
use uuid::Uuid;

/// Compute the two halves of splitting `clip` at timeline position `at`
///
/// Returns the trim window for the left part and the new right-hand clip, or
/// `None` when `at` is not strictly inside the clip.
pub fn split_parts(clip: &Clip, at: Samples) -> Option<(TrimWindow, Clip)> {
    if !clip.contains_exclusive(at) {
        return None;
    }

    let left_duration = at - clip.start_time;
    let left = TrimWindow {
        start_time: clip.start_time,
        audio_start_time: clip.audio_start_time,
        duration: left_duration,
    };

    let mut right = clip.clone();
    right.id = Uuid::new_v4();
    right.start_time = at;
    right.duration = clip.end_time() - at;
    right.audio_start_time = clip.audio_start_time + left_duration;

    Some((left, right))
}

/// Build the split action for `clip` at `at`, or `None` at or outside the clip edges
pub fn split_clip(clip: &Clip, at: Samples) -> Option<CompoundAction> {
    let (left, right) = split_parts(clip, at)?;
    let actions: Vec<Box<dyn Action>> = vec![
        Box::new(TrimClipAction::new(clip.id, TrimWindow::of(clip), left)),
        Box::new(AddClipAction::new(right)),
    ];
    Some(CompoundAction::new("Split clip", actions))
}
