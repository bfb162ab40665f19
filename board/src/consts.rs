//! Shared numeric constants for the board crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed camera scale.
pub const ZOOM_MIN: f64 = 0.3;

/// Largest allowed camera scale.
pub const ZOOM_MAX: f64 = 3.0;

/// Scale ratio applied per wheel tick.
pub const ZOOM_STEP: f64 = 1.05;

// ── Notes ───────────────────────────────────────────────────────

/// Width of a freshly added note, in world units.
pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;

/// Height of a freshly added note, in world units.
pub const DEFAULT_NOTE_HEIGHT: f64 = 120.0;

/// Notes can't be resized narrower than this.
pub const MIN_NOTE_WIDTH: f64 = 80.0;

/// Notes can't be resized shorter than this.
pub const MIN_NOTE_HEIGHT: f64 = 60.0;

/// New notes land at `origin + random * spread` on both axes.
pub const NOTE_PLACEMENT_ORIGIN: f64 = 80.0;
pub const NOTE_PLACEMENT_SPREAD: f64 = 200.0;

/// Inset between a note's edge and its text, in world units.
pub const NOTE_TEXT_INSET: f64 = 8.0;

pub const NOTE_CORNER_RADIUS: f64 = 12.0;
pub const NOTE_FONT_SIZE: f64 = 16.0;

/// Line height as a multiple of the font size.
pub const NOTE_LINE_HEIGHT: f64 = 1.2;

pub const DEFAULT_NOTE_TEXT: &str = "New note";

/// Swatches a new note picks its color from.
pub const NOTE_PALETTE: [&str; 6] = ["#FEF3C7", "#E0F2FE", "#FCE7F3", "#DCFCE7", "#FFE4E6", "#EDE9FE"];

// ── Connectors ──────────────────────────────────────────────────

/// Arrowhead length along the connector, in world units.
pub const ARROW_POINTER_LENGTH: f64 = 10.0;

/// Arrowhead base width, in world units.
pub const ARROW_POINTER_WIDTH: f64 = 8.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for the resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Clickable stroke width around a connector, in world units.
pub const CONNECTOR_HIT_WIDTH: f64 = 12.0;

// ── Storage ─────────────────────────────────────────────────────

pub const NOTES_STORAGE_KEY: &str = "stickyDigitizer_notes";
pub const CONNECTORS_STORAGE_KEY: &str = "stickyDigitizer_connectors";
pub const BACKGROUND_STORAGE_KEY: &str = "stickyDigitizer_bg";
