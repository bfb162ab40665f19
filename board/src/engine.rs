use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Camera, Point, Rect};
use crate::config::BoardConfig;
use crate::consts::NOTE_TEXT_INSET;
use crate::doc::{BackgroundImage, Connector, DocStore, Note, ObjectId, Snapshot};
use crate::hit::{self, HitPart};
use crate::input::{Button, InputState, Key, Mode, Modifiers, UiState, WheelDelta};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Drops smaller than this are treated as "did not move".
const MOVE_EPSILON: f64 = 1e-6;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NoteCreated(Note),
    /// A note's position, size or text changed and should be persisted.
    NoteUpdated(Note),
    /// A note was deleted along with the listed connectors.
    NoteDeleted { id: ObjectId, connectors: Vec<ObjectId> },
    ConnectorCreated(Connector),
    ConnectorDeleted { id: ObjectId },
    BackgroundChanged(Option<BackgroundImage>),
    /// Notes, connectors and background were all replaced by the starter scene.
    BoardReset,
    /// Open the text overlay for a note at the given screen rectangle.
    EditTextRequested { id: ObjectId, text: String, rect: Rect },
    SetCursor(String),
    RenderNeeded,
}

impl Action {
    /// Whether this action changes the persisted note list.
    #[must_use]
    pub fn touches_notes(&self) -> bool {
        matches!(self, Self::NoteCreated(_) | Self::NoteUpdated(_) | Self::NoteDeleted { .. } | Self::BoardReset)
    }

    /// Whether this action changes the persisted connector list.
    #[must_use]
    pub fn touches_connectors(&self) -> bool {
        match self {
            Self::ConnectorCreated(_) | Self::ConnectorDeleted { .. } | Self::BoardReset => true,
            Self::NoteDeleted { connectors, .. } => !connectors.is_empty(),
            _ => false,
        }
    }

    /// Whether this action changes the persisted background.
    #[must_use]
    pub fn touches_background(&self) -> bool {
        matches!(self, Self::BackgroundChanged(_) | Self::BoardReset)
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub config: BoardConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    rng: StdRng,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(BoardConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine core seeded from the OS random source.
    #[must_use]
    pub fn with_config(config: BoardConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an engine core with deterministic note placement and colors.
    #[must_use]
    pub fn with_seed(config: BoardConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BoardConfig, rng: StdRng) -> Self {
        Self {
            doc: DocStore::with_config(config.notes.clone()),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            config,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            rng,
        }
    }

    // --- Data inputs ---

    /// Hydrate the scene from storage. Missing notes fall back to the starter set.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.doc.load(snapshot, &mut self.rng);
        self.ui = UiState::default();
        self.input = InputState::Idle;
    }

    /// Replace or clear the background image.
    pub fn set_background(&mut self, background: Option<BackgroundImage>) -> Vec<Action> {
        self.doc.set_background(background.clone());
        vec![Action::BackgroundChanged(background), Action::RenderNeeded]
    }

    /// Restore the starter notes, drop connectors and background, and reset the view.
    pub fn reset(&mut self) -> Vec<Action> {
        self.doc.reset(&mut self.rng);
        self.camera = Camera::default();
        self.ui = UiState::default();
        self.input = InputState::Idle;
        log::debug!("engine: board reset");
        vec![Action::BoardReset, Action::RenderNeeded]
    }

    // --- Commands ---

    /// Add a note at a random spot near the top-left and return to select mode.
    pub fn add_note(&mut self) -> Vec<Action> {
        let note = self.doc.add_note(&mut self.rng);
        self.ui.mode = Mode::Select;
        self.ui.pending_source = None;
        self.ui.selected_connector = None;
        vec![Action::NoteCreated(note), Action::RenderNeeded]
    }

    /// Enter connect mode with nothing selected.
    pub fn start_connect(&mut self) -> Vec<Action> {
        self.ui.return_to_select();
        self.ui.mode = Mode::Connect;
        log::debug!("engine: connect mode");
        vec![Action::RenderNeeded]
    }

    /// Back to select mode, dropping selection and any pending source.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.ui.return_to_select();
        vec![Action::RenderNeeded]
    }

    /// Delete the selected connector, else the selected note and its connectors.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if let Some(id) = self.ui.selected_connector.take() {
            return match self.doc.remove_connector(&id) {
                Ok(_) => vec![Action::ConnectorDeleted { id }, Action::RenderNeeded],
                Err(e) => {
                    log::warn!("engine: {e}");
                    vec![Action::RenderNeeded]
                }
            };
        }

        let Some(id) = self.ui.selected_note.take() else {
            return Vec::new();
        };
        let Some(removed) = self.doc.remove_note(&id) else {
            return vec![Action::RenderNeeded];
        };
        if self.ui.pending_source.as_ref() == Some(&id) {
            self.ui.pending_source = None;
        }
        if self.ui.editing.as_ref() == Some(&id) {
            self.ui.editing = None;
        }
        let connectors = removed.connectors.into_iter().map(|c| c.id).collect();
        vec![Action::NoteDeleted { id, connectors }, Action::RenderNeeded]
    }

    // --- Clicks ---

    /// Handle a click on a note body in the current mode.
    pub fn click_note(&mut self, id: &ObjectId) -> Vec<Action> {
        if self.ui.mode == Mode::Select {
            self.ui.selected_note = Some(id.clone());
            self.ui.selected_connector = None;
            return vec![Action::RenderNeeded];
        }

        match self.ui.pending_source.clone() {
            None => {
                self.ui.pending_source = Some(id.clone());
                self.ui.selected_note = Some(id.clone());
                self.ui.selected_connector = None;
                vec![Action::RenderNeeded]
            }
            Some(source) if source == *id => Vec::new(),
            Some(source) => match self.doc.add_connector(&source, id) {
                Ok(connector) => {
                    self.ui.return_to_select();
                    self.ui.selected_note = Some(id.clone());
                    log::debug!("engine: linked {source} -> {id}");
                    vec![Action::ConnectorCreated(connector), Action::RenderNeeded]
                }
                Err(e) => {
                    log::warn!("engine: {e}");
                    self.ui.return_to_select();
                    vec![Action::RenderNeeded]
                }
            },
        }
    }

    /// Select a connector. In connect mode this also abandons the pending link.
    pub fn click_connector(&mut self, id: &ObjectId) -> Vec<Action> {
        self.ui.return_to_select();
        self.ui.selected_connector = Some(id.clone());
        vec![Action::RenderNeeded]
    }

    /// Click on empty canvas: clear selection and leave connect mode.
    pub fn click_empty(&mut self) -> Vec<Action> {
        self.ui.return_to_select();
        vec![Action::RenderNeeded]
    }

    // --- Text editing ---

    /// Open a text-edit session for a note.
    ///
    /// Ignored while another session is open or if the note doesn't exist.
    pub fn begin_edit(&mut self, id: &ObjectId) -> Vec<Action> {
        if self.ui.editing.is_some() {
            return Vec::new();
        }
        let Some(note) = self.doc.note(id) else {
            return Vec::new();
        };
        let text = note.text.clone();
        self.ui.editing = Some(id.clone());
        self.input = InputState::Idle;
        match self.edit_overlay_rect() {
            Some(rect) => vec![Action::EditTextRequested { id: id.clone(), text, rect }],
            None => Vec::new(),
        }
    }

    /// Screen rectangle of the open edit overlay under the current camera.
    #[must_use]
    pub fn edit_overlay_rect(&self) -> Option<Rect> {
        let note = self.doc.note(self.ui.editing.as_ref()?)?;
        Some(self.camera.world_rect_to_screen(note.rect().inset(NOTE_TEXT_INSET)))
    }

    /// Commit the overlay's text into the note being edited and close the session.
    pub fn commit_text(&mut self, text: String) -> Vec<Action> {
        let Some(id) = self.ui.editing.take() else {
            return Vec::new();
        };
        self.set_note_text(&id, text)
    }

    /// Replace a note's text.
    pub fn set_note_text(&mut self, id: &ObjectId, text: String) -> Vec<Action> {
        match self.doc.set_note_text(id, text) {
            Ok(note) => vec![Action::NoteUpdated(note.clone()), Action::RenderNeeded],
            Err(e) => {
                log::warn!("engine: {e}");
                Vec::new()
            }
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio. Camera is unchanged.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if self.ui.pan_armed {
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::SetCursor("grabbing".to_owned())];
        }

        let world = self.camera.screen_to_world(screen_pt);
        let handle_owner = if self.ui.mode == Mode::Select { self.ui.selected_note.as_ref() } else { None };
        let Some(hit) = hit::hit_test(world, &self.doc, &self.camera, handle_owner) else {
            return self.click_empty();
        };

        match hit.part {
            HitPart::NoteResizeHandle => {
                if let Some(note) = self.doc.note(&hit.object_id) {
                    self.input = InputState::ResizingNote {
                        id: hit.object_id,
                        start_world: world,
                        orig_w: note.width,
                        orig_h: note.height,
                    };
                }
                Vec::new()
            }
            HitPart::NoteBody => {
                // Select mode selects on press; connect mode waits to see
                // whether the press turns into a drag.
                let connecting = self.ui.mode == Mode::Connect;
                let actions = if connecting { Vec::new() } else { self.click_note(&hit.object_id) };
                if let Some(note) = self.doc.note(&hit.object_id) {
                    self.input = InputState::DraggingNote {
                        id: hit.object_id,
                        last_world: world,
                        orig_x: note.x,
                        orig_y: note.y,
                        click_on_release: connecting,
                    };
                }
                actions
            }
            HitPart::Connector => self.click_connector(&hit.object_id),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                self.camera.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingNote { id, last_world, .. } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                *last_world = world;
                let Some(note) = self.doc.note(id) else {
                    return Vec::new();
                };
                let (x, y) = (note.x + dx, note.y + dy);
                if let Err(e) = self.doc.move_note(id, x, y) {
                    log::warn!("engine: {e}");
                }
                vec![Action::RenderNeeded]
            }
            InputState::ResizingNote { id, start_world, orig_w, orig_h } => {
                let width = *orig_w + (world.x - start_world.x);
                let height = *orig_h + (world.y - start_world.y);
                if let Err(e) = self.doc.resize_note(id, width, height) {
                    log::warn!("engine: {e}");
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => {
                let cursor = if self.ui.pan_armed { "grab" } else { "default" };
                vec![Action::SetCursor(cursor.to_owned())]
            }
            InputState::DraggingNote { id, orig_x, orig_y, click_on_release, .. } => match self.doc.note(&id) {
                Some(note) if moved(note.x, orig_x) || moved(note.y, orig_y) => {
                    vec![Action::NoteUpdated(note.clone())]
                }
                Some(_) if click_on_release => self.click_note(&id),
                _ => Vec::new(),
            },
            InputState::ResizingNote { id, orig_w, orig_h, .. } => match self.doc.note(&id) {
                Some(note) if moved(note.width, orig_w) || moved(note.height, orig_h) => {
                    vec![Action::NoteUpdated(note.clone()), Action::RenderNeeded]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Double-click on a note opens its text overlay.
    pub fn on_double_click(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.editing.is_some() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match hit::hit_test(world, &self.doc, &self.camera, None) {
            Some(hit) if hit.part == HitPart::NoteBody => self.begin_edit(&hit.object_id),
            _ => Vec::new(),
        }
    }

    /// Zoom one step about the pointer. `dy < 0` zooms in; `dy == 0` is ignored.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        let zoom = self.config.zoom;
        let requested = if delta.dy < 0.0 { self.camera.zoom * zoom.step } else { self.camera.zoom / zoom.step };
        self.camera.zoom_about(screen_pt, requested, zoom.min, zoom.max);
        vec![Action::RenderNeeded]
    }

    /// Keyboard shortcuts. Suppressed while a text-edit session is open.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.editing.is_some() {
            return Vec::new();
        }
        if key.is_space() {
            if self.ui.pan_armed {
                return Vec::new();
            }
            self.ui.pan_armed = true;
            return vec![Action::SetCursor("grab".to_owned())];
        }
        if key.is_escape() {
            return self.cancel();
        }
        if modifiers.command() && key.is_char('n') {
            return self.add_note();
        }
        if modifiers.command() && key.is_char('l') {
            return self.start_connect();
        }
        if key.is_delete() {
            return self.delete_selection();
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if !key.is_space() || !self.ui.pan_armed {
            return Vec::new();
        }
        self.ui.pan_armed = false;
        if matches!(self.input, InputState::Panning { .. }) {
            self.input = InputState::Idle;
        }
        vec![Action::SetCursor("default".to_owned())]
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ui.mode
    }

    /// The currently selected note, if any.
    #[must_use]
    pub fn selected_note(&self) -> Option<&ObjectId> {
        self.ui.selected_note.as_ref()
    }

    #[must_use]
    pub fn selected_connector(&self) -> Option<&ObjectId> {
        self.ui.selected_connector.as_ref()
    }

    #[must_use]
    pub fn pending_source(&self) -> Option<&ObjectId> {
        self.ui.pending_source.as_ref()
    }

    /// The note whose text overlay is open, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&ObjectId> {
        self.ui.editing.as_ref()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn note(&self, id: &ObjectId) -> Option<&Note> {
        self.doc.note(id)
    }
}

fn moved(now: f64, before: f64) -> bool {
    (now - before).abs() > MOVE_EPSILON
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    background: Option<HtmlImageElement>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::with_config(canvas, BoardConfig::default())
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: BoardConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config), background: None }
    }

    /// Attach the decoded image for the current background, or detach it.
    pub fn set_background_element(&mut self, image: Option<HtmlImageElement>) {
        self.background = image;
    }

    // --- Delegated data inputs ---

    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.core.load_snapshot(snapshot);
    }

    pub fn set_background(&mut self, background: Option<BackgroundImage>) -> Vec<Action> {
        self.core.set_background(background)
    }

    pub fn reset(&mut self) -> Vec<Action> {
        self.core.reset()
    }

    pub fn add_note(&mut self) -> Vec<Action> {
        self.core.add_note()
    }

    pub fn start_connect(&mut self) -> Vec<Action> {
        self.core.start_connect()
    }

    pub fn commit_text(&mut self, text: String) -> Vec<Action> {
        self.core.commit_text(text)
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_double_click(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_double_click(screen_pt, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the 2D context is unavailable or a canvas call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(
            &ctx,
            &self.core.doc,
            &self.core.camera,
            &self.core.ui,
            self.background.as_ref(),
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.core.doc
    }
}
