//! Input model: interaction modes, modifier keys, mouse buttons, UI state and
//! the gesture state machine.
//!
//! `UiState` is the single value holding everything the controller knows about
//! the user's intent between events: mode, selection, the pending connector
//! source, the open text-edit session, and whether panning is armed.
//! `InputState` is the active pointer gesture tracked between pointer-down and
//! pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ObjectId;

/// Which interaction mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Click to select, drag to move (default).
    #[default]
    Select,
    /// Click a source note, then a target note, to link them.
    Connect,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.0.as_str(), " " | "Spacebar")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        matches!(self.0.as_str(), "Escape" | "Esc")
    }

    /// Delete or Backspace.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    /// Case-insensitive match against a single-character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer and the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Current interaction mode.
    pub mode: Mode,
    /// The selected note, if any. Mutually exclusive with `selected_connector`.
    pub selected_note: Option<ObjectId>,
    /// The selected connector, if any.
    pub selected_connector: Option<ObjectId>,
    /// First note picked in connect mode. Always `None` in select mode.
    pub pending_source: Option<ObjectId>,
    /// Note whose text is open in the edit overlay.
    pub editing: Option<ObjectId>,
    /// Space is held; pointer drags pan the view.
    pub pan_armed: bool,
}

impl UiState {
    /// Clear both note and connector selection.
    pub fn clear_selection(&mut self) {
        self.selected_note = None;
        self.selected_connector = None;
    }

    /// Back to select mode with nothing selected and nothing pending.
    pub fn return_to_select(&mut self) {
        self.mode = Mode::Select;
        self.pending_source = None;
        self.clear_selection();
    }

    /// Whether a note should be drawn as selected: it is the selection or the pending source.
    #[must_use]
    pub fn is_note_highlighted(&self, id: &ObjectId) -> bool {
        self.selected_note.as_ref() == Some(id) || self.pending_source.as_ref() == Some(id)
    }
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to compute deltas and emit
/// final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the view with space held.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving a note.
    DraggingNote {
        id: ObjectId,
        /// World-space position of the pointer at the previous event.
        last_world: Point,
        /// Note position at the start of the drag; a drop here is not a change.
        orig_x: f64,
        orig_y: f64,
        /// Connect mode: the press counts as a note click only if the note
        /// is released where it started.
        click_on_release: bool,
    },
    /// The user is dragging the bottom-right resize handle of a note.
    ResizingNote {
        id: ObjectId,
        /// World-space pointer position at the start of the resize.
        start_world: Point,
        orig_w: f64,
        orig_h: f64,
    },
}
