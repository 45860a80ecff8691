//! Action system for undo/redo functionality
//!
//! Every edit to the timeline is an `Action`: a forward step and its exact
//! inverse, both awaited against the optimistic store. The `ActionExecutor`
//! owns the undo and redo stacks.
//!
//! ## Architecture
//!
//! - `Action` trait: defines `execute()` and `rollback()`
//! - `CompoundAction`: an ordered list of actions run front-to-back and
//!   rolled back back-to-front, so later steps may depend on earlier ones
//! - `ActionExecutor`: bounded undo stack plus redo stack; its methods take
//!   `&mut self`, which serializes push/undo/redo for the session
//!
//! ## Failure model
//!
//! An action that fails to execute is never pushed. An action that fails to
//! undo or redo is dropped from history: the state it assumed is gone, so
//! retrying it is unsafe. The drop is logged with the action's description.

use crate::error::EditorError;
use crate::optimistic::OptimisticStore;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Default number of actions kept on the undo stack
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 50;

/// Action trait for undo/redo operations
///
/// `execute` followed directly by `rollback` must leave the store exactly as
/// it was, and re-executing after a rollback must reproduce the same state.
#[async_trait]
pub trait Action: Send {
    /// Apply this action
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError>;

    /// Undo this action
    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError>;

    /// Get a human-readable description of this action (for UI display)
    fn description(&self) -> String;
}

/// Several actions undone and redone as one step
pub struct CompoundAction {
    description: String,
    actions: Vec<Box<dyn Action>>,
}

impl CompoundAction {
    pub fn new(description: impl Into<String>, actions: Vec<Box<dyn Action>>) -> Self {
        Self {
            description: description.into(),
            actions,
        }
    }

    /// Group actions into one undo step; a single action is returned as-is
    pub fn group(description: impl Into<String>, mut actions: Vec<Box<dyn Action>>) -> Option<Box<dyn Action>> {
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(Box::new(Self::new(description, actions))),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[async_trait]
impl Action for CompoundAction {
    async fn execute(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        for index in 0..self.actions.len() {
            if let Err(e) = self.actions[index].execute(store).await {
                // Unwind the steps that did apply so the group has no net effect.
                for done in self.actions[..index].iter_mut().rev() {
                    if let Err(undo_err) = done.rollback(store).await {
                        log::error!(
                            "could not unwind \"{}\" after failed \"{}\": {}",
                            done.description(),
                            self.description,
                            undo_err
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn rollback(&mut self, store: &OptimisticStore) -> Result<(), EditorError> {
        let count = self.actions.len();
        for index in (0..count).rev() {
            if let Err(e) = self.actions[index].rollback(store).await {
                for undone in self.actions[index + 1..].iter_mut() {
                    if let Err(redo_err) = undone.execute(store).await {
                        log::error!(
                            "could not reapply \"{}\" after failed undo of \"{}\": {}",
                            undone.description(),
                            self.description,
                            redo_err
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Action executor that manages the undo/redo stacks
pub struct ActionExecutor {
    /// Stack of executed actions (for undo), oldest at the front
    undo_stack: VecDeque<Box<dyn Action>>,

    /// Stack of undone actions (for redo)
    redo_stack: Vec<Box<dyn Action>>,

    /// Maximum number of actions to keep in undo stack
    max_undo_depth: usize,
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self::with_max_undo_depth(DEFAULT_MAX_UNDO_DEPTH)
    }

    pub fn with_max_undo_depth(max_undo_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo_depth,
        }
    }

    /// Execute an action and, if it succeeds, push it onto the undo stack
    pub async fn execute(
        &mut self,
        mut action: Box<dyn Action>,
        store: &OptimisticStore,
    ) -> Result<(), EditorError> {
        action.execute(store).await?;
        log::debug!("executed \"{}\"", action.description());
        self.push(action);
        Ok(())
    }

    /// Push an already-executed action
    ///
    /// This clears the redo stack since we're creating a new timeline branch.
    pub fn push(&mut self, action: Box<dyn Action>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(action);

        while self.undo_stack.len() > self.max_undo_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("undo history full, evicted \"{}\"", evicted.description());
            }
        }
    }

    /// Undo the last action
    ///
    /// Returns `Ok(false)` if the undo stack is empty. On failure the action is
    /// dropped from history.
    pub async fn undo(&mut self, store: &OptimisticStore) -> Result<bool, EditorError> {
        let Some(mut action) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        match action.rollback(store).await {
            Ok(()) => {
                log::debug!("undid \"{}\"", action.description());
                self.redo_stack.push(action);
                Ok(true)
            }
            Err(e) => {
                log::warn!("dropping \"{}\" from history, undo failed: {}", action.description(), e);
                Err(e)
            }
        }
    }

    /// Redo the last undone action
    ///
    /// Returns `Ok(false)` if the redo stack is empty. On failure the action is
    /// dropped from history.
    pub async fn redo(&mut self, store: &OptimisticStore) -> Result<bool, EditorError> {
        let Some(mut action) = self.redo_stack.pop() else {
            return Ok(false);
        };

        match action.execute(store).await {
            Ok(()) => {
                log::debug!("redid \"{}\"", action.description());
                self.undo_stack.push_back(action);
                Ok(true)
            }
            Err(e) => {
                log::warn!("dropping \"{}\" from history, redo failed: {}", action.description(), e);
                Err(e)
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the next action to undo
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|a| a.description())
    }

    /// Get the description of the next action to redo
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|a| a.description())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn max_undo_depth(&self) -> usize {
        self.max_undo_depth
    }
}
