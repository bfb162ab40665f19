//! Canvas view snapshot used by non-canvas UI surfaces.
//!
//! ARCHITECTURE
//! ============
//! `CanvasHost` owns the engine and publishes a snapshot of the bits the
//! chrome renders (mode, pending link, zoom, cursor, the text overlay) after
//! every event, so the HUD and overlay never borrow the engine.

#[cfg(test)]
#[path = "canvas_view_test.rs"]
mod canvas_view_test;

use board::camera::Rect;
use board::doc::ObjectId;
use board::engine::EngineCore;
use board::input::Mode;

/// Hint shown while a link is waiting for its target.
pub const PENDING_LINK_HINT: &str = "Pick a target note…";

/// Position of the open text-edit overlay, in CSS pixels relative to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct EditOverlay {
    pub id: ObjectId,
    pub rect: Rect,
}

impl EditOverlay {
    /// Inline style placing a textarea over the note.
    #[must_use]
    pub fn style(&self) -> String {
        let Rect { x, y, width, height } = self.rect;
        format!("left: {x}px; top: {y}px; width: {width}px; height: {height}px;")
    }
}

/// Live canvas state consumed by chrome (HUD, edit overlay).
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasViewState {
    pub mode: Mode,
    pub has_pending_source: bool,
    pub zoom: f64,
    pub cursor: String,
    pub edit: Option<EditOverlay>,
}

impl Default for CanvasViewState {
    fn default() -> Self {
        Self {
            mode: Mode::Select,
            has_pending_source: false,
            zoom: 1.0,
            cursor: "default".to_owned(),
            edit: None,
        }
    }
}

impl CanvasViewState {
    /// Snapshot the engine, keeping the current cursor.
    #[must_use]
    pub fn capture(core: &EngineCore, cursor: &str) -> Self {
        let edit = core
            .editing()
            .cloned()
            .zip(core.edit_overlay_rect())
            .map(|(id, rect)| EditOverlay { id, rect });
        Self {
            mode: core.mode(),
            has_pending_source: core.pending_source().is_some(),
            zoom: core.camera().zoom,
            cursor: cursor.to_owned(),
            edit,
        }
    }

    #[must_use]
    pub fn is_connecting(&self) -> bool {
        self.mode == Mode::Connect
    }

    #[must_use]
    pub fn pending_hint(&self) -> Option<&'static str> {
        self.has_pending_source.then_some(PENDING_LINK_HINT)
    }

    /// Zoom as a whole percentage, for the HUD.
    #[must_use]
    pub fn zoom_label(&self) -> String {
        format!("{:.0}%", self.zoom * 100.0)
    }
}
