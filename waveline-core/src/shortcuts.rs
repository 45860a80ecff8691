//! Keyboard shortcut surface
//!
//! Shortcut definitions are centralized so the UI layer can both render menu
//! accelerators and dispatch key presses from a single table.

/// Keyboard shortcut definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: ShortcutKey,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Keys that can be used in shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    // Letters
    A, C, S, T, V, Y, Z,
    // Special
    Space, Escape, Delete, Backspace,
}

impl Shortcut {
    pub const fn new(key: ShortcutKey, ctrl: bool, shift: bool, alt: bool) -> Self {
        Self { key, ctrl, shift, alt }
    }

    pub const fn plain(key: ShortcutKey) -> Self {
        Self::new(key, false, false, false)
    }

    pub const fn ctrl(key: ShortcutKey) -> Self {
        Self::new(key, true, false, false)
    }
}

/// Editor commands reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    TogglePlayback,
    AddTrack,
    ClearSelection,
    SelectAllOnTrack,
    DeleteSelected,
    Copy,
    Paste,
    SplitAtPlayhead,
    Undo,
    Redo,
}

impl EditorCommand {
    /// Label for menus and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            EditorCommand::TogglePlayback => "Play/Stop",
            EditorCommand::AddTrack => "Add Track",
            EditorCommand::ClearSelection => "Clear Selection",
            EditorCommand::SelectAllOnTrack => "Select All on Track",
            EditorCommand::DeleteSelected => "Delete",
            EditorCommand::Copy => "Copy",
            EditorCommand::Paste => "Paste",
            EditorCommand::SplitAtPlayhead => "Split at Playhead",
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
        }
    }
}

/// Default key bindings; a command may have more than one
pub fn default_bindings() -> Vec<(Shortcut, EditorCommand)> {
    use ShortcutKey::*;
    vec![
        (Shortcut::plain(Space), EditorCommand::TogglePlayback),
        (Shortcut::ctrl(T), EditorCommand::AddTrack),
        (Shortcut::plain(Escape), EditorCommand::ClearSelection),
        (Shortcut::ctrl(A), EditorCommand::SelectAllOnTrack),
        (Shortcut::plain(Delete), EditorCommand::DeleteSelected),
        (Shortcut::plain(Backspace), EditorCommand::DeleteSelected),
        (Shortcut::ctrl(C), EditorCommand::Copy),
        (Shortcut::ctrl(V), EditorCommand::Paste),
        (Shortcut::plain(S), EditorCommand::SplitAtPlayhead),
        (Shortcut::ctrl(Z), EditorCommand::Undo),
        (Shortcut::new(Z, true, true, false), EditorCommand::Redo),
        (Shortcut::ctrl(Y), EditorCommand::Redo),
    ]
}

/// Look up the command bound to a key press
pub fn command_for(bindings: &[(Shortcut, EditorCommand)], pressed: Shortcut) -> Option<EditorCommand> {
    bindings
        .iter()
        .find(|(shortcut, _)| *shortcut == pressed)
        .map(|(_, command)| *command)
}
