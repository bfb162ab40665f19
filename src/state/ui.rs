//! Local UI chrome state: the board command queue and the webcam dialog.
//!
//! DESIGN
//! ======
//! Toolbar and HUD buttons never touch the engine directly. They queue a
//! [`BoardCommand`] and bump `command_seq`; `CanvasHost` watches the sequence,
//! drains the queue and applies each command to the engine.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use board::doc::BackgroundImage;

/// Message shown in the webcam dialog when the camera can't be opened.
pub const WEBCAM_ERROR: &str = "Could not access webcam. Please allow camera permissions.";

/// A request from the chrome for the canvas engine.
#[derive(Clone, Debug, PartialEq)]
pub enum BoardCommand {
    AddNote,
    StartConnect,
    /// Replace the background; `None` clears it.
    SetBackground(Option<BackgroundImage>),
    /// Starter notes, no links, no background, default view.
    Reset,
}

/// UI state for the toolbar, HUD and webcam dialog.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pending_commands: Vec<BoardCommand>,
    pub command_seq: u64,
    pub webcam_open: bool,
    /// Bumped each time the dialog opens so a late camera grant from an
    /// earlier session can tell it is stale.
    pub webcam_session: u64,
    pub capture_error: Option<String>,
}

impl UiState {
    /// Queue a command for the canvas host.
    pub fn issue(&mut self, command: BoardCommand) {
        self.pending_commands.push(command);
        self.command_seq = self.command_seq.saturating_add(1);
    }

    /// Take every queued command, oldest first.
    pub fn take_commands(&mut self) -> Vec<BoardCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    #[must_use]
    pub fn has_pending_commands(&self) -> bool {
        !self.pending_commands.is_empty()
    }

    /// Open the webcam dialog and return its session number.
    pub fn open_webcam(&mut self) -> u64 {
        self.webcam_open = true;
        self.webcam_session = self.webcam_session.saturating_add(1);
        self.capture_error = None;
        self.webcam_session
    }

    pub fn close_webcam(&mut self) {
        self.webcam_open = false;
        self.capture_error = None;
    }

    /// Whether `session` is the dialog that is currently open.
    #[must_use]
    pub fn is_live_session(&self, session: u64) -> bool {
        self.webcam_open && self.webcam_session == session
    }
}
