//! Editing session
//!
//! One `EditorSession` per open editor. It owns the optimistic store, the undo
//! history, selection, clipboard, transport and engine bridge, and is the
//! single entry point the UI drives with pointer events and commands.
//! Methods that touch history take `&mut self`, so an undo can never overlap
//! another commit.

use crate::action::{Action, ActionExecutor, CompoundAction};
use crate::actions::{
    split_clip, truncate_name, AddClipAction, AddEffectAction, AddTrackAction,
    DeleteClipAction, DeleteEffectAction, DeleteTrackAction, ReorderEffectsAction,
    ReorderTracksAction, SetClipPropertiesAction, SetEffectAction, SetTrackPropertiesAction,
    TrackProperty,
};
use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::coords::{TrackRow, Viewport};
use crate::engine::{AudioEngine, EngineBridge};
use crate::error::{EditorError, Notice};
use crate::interaction::{
    hit_test, ClipZone, DragGesture, DragMode, FaderDrag, FaderParameter, Gesture, Modifiers,
    TrimEdge, TrimGesture,
};
use crate::optimistic::OptimisticStore;
use crate::selection::Selection;
use crate::shortcuts::{command_for, default_bindings, EditorCommand, Shortcut};
use crate::snapshot::{ClipProperties, EffectSettings};
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use sync_backend::{Clip, EffectKind, EntityKind, Project, RemoteStore, Samples};
use uuid::Uuid;

/// Which way through history a step goes, for notices
#[derive(Clone, Copy)]
enum HistoryStep {
    Undo,
    Redo,
}

impl HistoryStep {
    fn verb(self) -> &'static str {
        match self {
            HistoryStep::Undo => "undo",
            HistoryStep::Redo => "redo",
        }
    }
}

/// A timeline editing session
pub struct EditorSession {
    config: EditorConfig,
    store: OptimisticStore,
    history: ActionExecutor,
    selection: Selection,
    clipboard: Clipboard,
    transport: Transport,
    engine: EngineBridge,
    viewport: Viewport,
    gesture: Option<Gesture>,
    /// Known source lengths, by audio file
    source_durations: HashMap<Uuid, Samples>,
    bindings: Vec<(Shortcut, EditorCommand)>,
    notices: Vec<Notice>,
}

impl EditorSession {
    pub fn new(remote: Arc<dyn RemoteStore>, config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            history: ActionExecutor::with_max_undo_depth(config.max_undo_depth),
            viewport: config.viewport(config.default_sample_rate),
            store: OptimisticStore::new(remote),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            transport: Transport::new(),
            engine: EngineBridge::new(),
            gesture: None,
            source_durations: HashMap::new(),
            bindings: default_bindings(),
            notices: Vec::new(),
            config,
        })
    }

    /// Open a project, resetting history, selection and transport
    pub async fn open_project(&mut self, project_id: Uuid) -> Result<Project, EditorError> {
        let project = self.store.load(project_id).await?;
        self.history.clear();
        self.selection.reset();
        self.gesture = None;
        self.transport.stop();
        self.transport.seek(0);
        self.viewport = self.config.viewport(project.sample_rate);
        self.publish();
        Ok(project)
    }

    /// Re-read the store to pick up collaborators' edits
    pub async fn refresh(&mut self) -> Result<(), EditorError> {
        self.store.refresh().await?;
        self.settle();
        Ok(())
    }

    pub fn store(&self) -> &OptimisticStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn history(&self) -> &ActionExecutor {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn engine(&self) -> &EngineBridge {
        &self.engine
    }

    /// Attach the audio engine; it receives the current state immediately
    pub fn attach_engine(&mut self, engine: Box<dyn AudioEngine>) {
        self.engine.attach(engine);
    }

    /// Record the length of a decoded source file, used to bound right-edge trims
    pub fn set_source_duration(&mut self, audio_file_id: Uuid, duration: Samples) {
        self.source_durations.insert(audio_file_id, duration);
    }

    /// Take the notices raised since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn project_id(&self) -> Result<Uuid, EditorError> {
        self.store.project_id().ok_or(EditorError::NoProject)
    }

    fn publish(&mut self) {
        if let Some(project_id) = self.store.project_id() {
            self.engine.publish(&self.store.view(), &project_id);
        }
    }

    /// Bring derived state in line with the store after anything settled
    fn settle(&mut self) {
        let view = self.store.view();
        self.selection.retain_existing(
            |id| view.clip(id).is_some(),
            |id| view.track(id).is_some(),
        );
        self.publish();
    }

    // ----- history -------------------------------------------------------

    /// Execute an action and record it for undo
    ///
    /// A failure is also raised as a notice; the store has already rolled the
    /// optimistic change back.
    pub async fn perform(&mut self, action: Box<dyn Action>) -> Result<(), EditorError> {
        let description = action.description();
        let result = self.history.execute(action, &self.store).await;
        if let Err(e) = &result {
            log::warn!("\"{}\" failed: {}", description, e);
            self.notices
                .push(Notice::error(format!("{} failed: {}", description, e)));
        }
        self.settle();
        result
    }

    pub async fn undo(&mut self) -> Result<bool, EditorError> {
        let description = self.history.undo_description();
        let result = self.history.undo(&self.store).await;
        self.finish_history_step(HistoryStep::Undo, description, result)
    }

    pub async fn redo(&mut self) -> Result<bool, EditorError> {
        let description = self.history.redo_description();
        let result = self.history.redo(&self.store).await;
        self.finish_history_step(HistoryStep::Redo, description, result)
    }

    fn finish_history_step(
        &mut self,
        step: HistoryStep,
        description: Option<String>,
        result: Result<bool, EditorError>,
    ) -> Result<bool, EditorError> {
        if let Err(e) = &result {
            let description = description.unwrap_or_default();
            let message = if e.is_conflict() {
                format!(
                    "Can't {} \"{}\": modified by another collaborator",
                    step.verb(),
                    description
                )
            } else {
                format!("Can't {} \"{}\": {}", step.verb(), description, e)
            };
            self.notices.push(Notice::warning(message));
        }
        self.settle();
        result
    }

    // ----- pointer -------------------------------------------------------

    /// Pointer pressed at `(x, y)` in timeline coordinates
    ///
    /// Returns whether a gesture started.
    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) -> bool {
        self.abandon_gesture();
        let tracks = self.store.tracks();
        let view = self.store.view();
        let hit = hit_test(
            &self.viewport,
            &tracks,
            &view,
            x,
            y,
            self.config.edge_detection_px,
        );

        let Some(hit) = hit else {
            match self.viewport.row_at(y) {
                TrackRow::AboveTracks => self.transport.seek(self.viewport.samples_at(x)),
                TrackRow::Index(row) => {
                    if let Some(track) = tracks.get(row) {
                        self.selection.focus_track(track.id);
                        self.selection.clear();
                    }
                }
            }
            return false;
        };

        let clip = hit.clip;
        if self.store.is_pending(&clip.id) {
            log::debug!("clip {} is still being created, ignoring pointer", clip.id);
            return false;
        }

        if modifiers.toggles_selection() {
            self.selection.toggle(clip.id, clip.track_id, false);
        } else if !(modifiers.duplicates() && self.selection.contains(&clip.id)) {
            // Only a duplicate drag carries the rest of the selection along
            self.selection.select(clip.id, clip.track_id, false);
        }
        if !self.selection.contains(&clip.id) {
            return false;
        }

        let pointer = self.viewport.samples_at(x);
        let gesture = match hit.zone {
            ClipZone::LeftEdge | ClipZone::RightEdge => {
                let edge = if hit.zone == ClipZone::LeftEdge {
                    TrimEdge::Left
                } else {
                    TrimEdge::Right
                };
                let source = self.source_durations.get(&clip.audio_file_id).copied();
                Gesture::Trim(TrimGesture::start(&clip, edge, pointer, source))
            }
            ClipZone::Body => {
                let (mode, companions) = if modifiers.duplicates() {
                    let companions = self
                        .selection
                        .clip_ids()
                        .iter()
                        .filter_map(|id| view.clip(id).cloned())
                        .collect();
                    (DragMode::Duplicate, companions)
                } else {
                    (DragMode::Move, Vec::new())
                };
                Gesture::Drag(DragGesture::start(clip, hit.row, pointer, mode, companions))
            }
        };
        self.gesture = Some(gesture);
        true
    }

    /// Pointer moved; updates the active gesture's local state only
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let pointer = self.viewport.samples_at(x);
        let row = self.viewport.row_at(y);
        match self.gesture.as_mut() {
            Some(Gesture::Drag(drag)) => {
                let track_count = self.store.tracks().len();
                drag.update(pointer, row, track_count);
            }
            Some(Gesture::Trim(trim)) => trim.update(pointer),
            Some(Gesture::Fader(_)) | None => {}
        }
    }

    /// Pointer released; commits the active gesture
    pub async fn pointer_up(&mut self) -> Result<(), EditorError> {
        match self.gesture.take() {
            Some(Gesture::Drag(drag)) => match drag.finish(&self.store.tracks()) {
                Some(action) => self.perform(action).await,
                None => Ok(()),
            },
            Some(Gesture::Trim(trim)) => self.perform(Box::new(trim.finish())).await,
            Some(Gesture::Fader(fader)) => {
                let Some(action) = fader.clone().finish() else {
                    return Ok(());
                };
                let result = self.perform(Box::new(action)).await;
                if result.is_err() {
                    // The engine still plays the last previewed value
                    fader.revert(&mut self.engine);
                }
                result
            }
            None => Ok(()),
        }
    }

    /// Drop the active gesture without committing it
    fn abandon_gesture(&mut self) {
        if let Some(Gesture::Fader(fader)) = self.gesture.take() {
            fader.revert(&mut self.engine);
        }
    }

    /// Start dragging a track's gain or pan fader
    pub fn begin_fader(&mut self, track_id: Uuid, parameter: FaderParameter) -> Result<(), EditorError> {
        let track = self
            .store
            .track(&track_id)
            .ok_or(EditorError::NotFound(EntityKind::Track, track_id))?;
        self.abandon_gesture();
        self.gesture = Some(Gesture::Fader(FaderDrag::start(&track, parameter)));
        Ok(())
    }

    /// Move the active fader; the engine hears it immediately
    pub fn fader_move(&mut self, value: f64) {
        if let Some(Gesture::Fader(fader)) = self.gesture.as_mut() {
            fader.update(value, &mut self.engine);
        }
    }

    // ----- keyboard ------------------------------------------------------

    /// Dispatch a key press; returns whether it was bound
    pub async fn handle_key(&mut self, pressed: Shortcut) -> Result<bool, EditorError> {
        let Some(command) = command_for(&self.bindings, pressed) else {
            return Ok(false);
        };
        self.handle_command(command).await?;
        Ok(true)
    }

    pub async fn handle_command(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        log::debug!("command {:?}", command);
        match command {
            EditorCommand::TogglePlayback => {
                self.transport.toggle();
            }
            EditorCommand::AddTrack => {
                self.add_track(None).await?;
            }
            EditorCommand::ClearSelection => self.selection.clear(),
            EditorCommand::SelectAllOnTrack => self.select_all_on_focused_track(),
            EditorCommand::DeleteSelected => self.delete_selected().await?,
            EditorCommand::Copy => self.copy_selection(),
            EditorCommand::Paste => self.paste().await?,
            EditorCommand::SplitAtPlayhead => self.split_at_playhead().await?,
            EditorCommand::Undo => {
                self.undo().await?;
            }
            EditorCommand::Redo => {
                self.redo().await?;
            }
        }
        Ok(())
    }

    // ----- selection and clipboard ---------------------------------------

    pub fn select_clip(&mut self, clip_id: Uuid, modifiers: Modifiers) -> Result<(), EditorError> {
        let clip = self
            .store
            .clip(&clip_id)
            .ok_or(EditorError::NotFound(EntityKind::Clip, clip_id))?;
        let pending = self.store.is_pending(&clip_id);
        if modifiers.toggles_selection() {
            self.selection.toggle(clip.id, clip.track_id, pending);
        } else {
            self.selection.select(clip.id, clip.track_id, pending);
        }
        Ok(())
    }

    pub fn focus_track(&mut self, track_id: Uuid) {
        self.selection.focus_track(track_id);
    }

    pub fn select_all_on_focused_track(&mut self) {
        let Some(track_id) = self.selection.focused_track() else {
            return;
        };
        let clips = self.store.clips_on_track(&track_id);
        let store = &self.store;
        self.selection
            .select_all_on_focused_track(&clips, |id| store.is_pending(id));
    }

    /// Selected clips as they are now, in selection order
    pub fn selected_clips(&self) -> Vec<Clip> {
        let view = self.store.view();
        self.selection
            .clip_ids()
            .iter()
            .filter_map(|id| view.clip(id).cloned())
            .collect()
    }

    pub fn copy_selection(&mut self) {
        let clips = self.selected_clips();
        self.clipboard.copy(&clips);
    }

    /// Paste the clipboard at the playhead as one undo step
    pub async fn paste(&mut self) -> Result<(), EditorError> {
        let project_id = self.project_id()?;
        let Some(paste) = self.clipboard.paste(project_id, self.transport.position()) else {
            return Ok(());
        };
        self.perform(Box::new(paste)).await
    }

    pub async fn delete_selected(&mut self) -> Result<(), EditorError> {
        let actions: Vec<Box<dyn Action>> = self
            .selected_clips()
            .into_iter()
            .map(|clip| Box::new(DeleteClipAction::new(clip)) as Box<dyn Action>)
            .collect();
        let count = actions.len();
        let Some(action) = CompoundAction::group(format!("Delete {} clips", count), actions) else {
            return Ok(());
        };
        self.perform(action).await?;
        self.selection.clear();
        Ok(())
    }

    /// Split the selected clips under the playhead, or the focused track's clips when nothing is selected
    pub async fn split_at_playhead(&mut self) -> Result<(), EditorError> {
        let at = self.transport.position();
        let candidates = if self.selection.is_empty() {
            match self.selection.focused_track() {
                Some(track_id) => self.store.clips_on_track(&track_id),
                None => Vec::new(),
            }
        } else {
            self.selected_clips()
        };
        let actions: Vec<Box<dyn Action>> = candidates
            .iter()
            .filter_map(|clip| split_clip(clip, at))
            .map(|split| Box::new(split) as Box<dyn Action>)
            .collect();
        let count = actions.len();
        match CompoundAction::group(format!("Split {} clips", count), actions) {
            Some(action) => self.perform(action).await,
            None => Ok(()),
        }
    }

    // ----- tracks, clips, effects ----------------------------------------

    /// Append a track; `None` names it after its position
    pub async fn add_track(&mut self, name: Option<String>) -> Result<Uuid, EditorError> {
        let project_id = self.project_id()?;
        let tracks = self.store.tracks();
        let name = name.unwrap_or_else(|| format!("Track {}", tracks.len() + 1));
        let name = truncate_name(&name, self.config.max_track_name_len);
        let action = AddTrackAction::append(project_id, name, &tracks);
        let track_id = action.track_id();
        self.perform(Box::new(action)).await?;
        Ok(track_id)
    }

    pub async fn delete_track(&mut self, track_id: Uuid) -> Result<(), EditorError> {
        let action = DeleteTrackAction::capture(&self.store, track_id)?;
        self.perform(Box::new(action)).await
    }

    pub async fn set_track_property(
        &mut self,
        track_id: Uuid,
        property: TrackProperty,
    ) -> Result<(), EditorError> {
        let track = self
            .store
            .track(&track_id)
            .ok_or(EditorError::NotFound(EntityKind::Track, track_id))?;
        let property = match property {
            TrackProperty::Name(name) => {
                TrackProperty::Name(truncate_name(&name, self.config.max_track_name_len))
            }
            other => other,
        };
        self.perform(Box::new(SetTrackPropertiesAction::new(&track, property)))
            .await
    }

    /// Reorder tracks; the list must name every track exactly once
    pub async fn reorder_tracks(&mut self, ordered_ids: Vec<Uuid>) -> Result<(), EditorError> {
        let action = ReorderTracksAction::new(&self.store, ordered_ids)?;
        self.perform(Box::new(action)).await
    }

    /// Place a clip of a decoded audio file on a track
    pub async fn add_clip(
        &mut self,
        track_id: Uuid,
        audio_file_id: Uuid,
        name: impl Into<String>,
        start_time: Samples,
        duration: Samples,
    ) -> Result<Uuid, EditorError> {
        let project_id = self.project_id()?;
        let clip = Clip::new(
            project_id,
            track_id,
            audio_file_id,
            name,
            start_time.max(0),
            duration.max(1),
        );
        let clip_id = clip.id;
        self.perform(Box::new(AddClipAction::new(clip))).await?;
        Ok(clip_id)
    }

    pub async fn set_clip_properties(
        &mut self,
        clip_id: Uuid,
        after: ClipProperties,
    ) -> Result<(), EditorError> {
        let clip = self
            .store
            .clip(&clip_id)
            .ok_or(EditorError::NotFound(EntityKind::Clip, clip_id))?;
        let action = SetClipPropertiesAction::new(clip_id, ClipProperties::of(&clip), after);
        self.perform(Box::new(action)).await
    }

    pub async fn add_effect(&mut self, track_id: Uuid, effect: EffectKind) -> Result<Uuid, EditorError> {
        let track = self
            .store
            .track(&track_id)
            .ok_or(EditorError::NotFound(EntityKind::Track, track_id))?;
        let action = AddEffectAction::append(&track, effect, &self.store.effects_on_track(&track_id));
        let effect_id = action.effect_id();
        self.perform(Box::new(action)).await?;
        Ok(effect_id)
    }

    pub async fn delete_effect(&mut self, effect_id: Uuid) -> Result<(), EditorError> {
        let effect = self
            .store
            .effect(&effect_id)
            .ok_or(EditorError::NotFound(EntityKind::Effect, effect_id))?;
        self.perform(Box::new(DeleteEffectAction::new(effect))).await
    }

    pub async fn set_effect(&mut self, effect_id: Uuid, after: EffectSettings) -> Result<(), EditorError> {
        let effect = self
            .store
            .effect(&effect_id)
            .ok_or(EditorError::NotFound(EntityKind::Effect, effect_id))?;
        self.perform(Box::new(SetEffectAction::new(&effect, after))).await
    }

    pub async fn reorder_effects(
        &mut self,
        track_id: Uuid,
        ordered_ids: Vec<Uuid>,
    ) -> Result<(), EditorError> {
        let action = ReorderEffectsAction::new(&self.store, track_id, ordered_ids)?;
        self.perform(Box::new(action)).await
    }
}
