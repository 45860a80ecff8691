// Waveline Core - Timeline Editing Engine
//
// Turns pointer and keyboard input into sample-accurate, undoable edits of
// tracks and clips. Edits apply locally at once through an optimistic store
// and are confirmed or rolled back by the remote store behind it.

pub mod action;
pub mod actions;
pub mod clipboard;
pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod optimistic;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod snapshot;
pub mod transport;

// Re-export commonly used types
pub use action::{Action, ActionExecutor, CompoundAction, DEFAULT_MAX_UNDO_DEPTH};
pub use clipboard::{Clipboard, ClipboardEntry};
pub use config::EditorConfig;
pub use coords::{TrackRow, Viewport};
pub use engine::{AudioEngine, ClipState, EffectState, EngineBridge, TrackState};
pub use error::{EditorError, Notice, NoticeLevel};
pub use interaction::{Gesture, Modifiers};
pub use optimistic::OptimisticStore;
pub use selection::Selection;
pub use session::EditorSession;
pub use shortcuts::{default_bindings, EditorCommand, Shortcut, ShortcutKey};
pub use snapshot::{ClipPlacement, SnapshotPair, TrimWindow};
pub use transport::{PlayheadState, Transport};
