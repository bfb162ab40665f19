//! Document model: notes, connectors, the background image and the in-memory store.
//!
//! This module defines the data that describes what is on the board (`Note`,
//! `Connector`, `BackgroundImage`), the snapshot type used to hydrate from
//! storage (`Snapshot`), and the runtime store that owns the live scene
//! (`DocStore`).
//!
//! Notes keep their insertion order, which is also their draw order. Connectors
//! reference notes by id only; `DocStore` keeps an explicit id→index map so
//! lookups and cascade deletes never chase embedded references.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Rect};
use crate::config::NoteConfig;
use crate::consts::{DEFAULT_NOTE_TEXT, NOTE_PALETTE, NOTE_PLACEMENT_ORIGIN, NOTE_PLACEMENT_SPREAD};

/// Error returned by scene mutations that would break an invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    /// A connector's source and target are the same note.
    #[error("connector source and target are the same note: {0}")]
    SelfLoop(ObjectId),
    /// No note with this id exists.
    #[error("unknown note: {0}")]
    UnknownNote(ObjectId),
    /// No connector with this id exists.
    #[error("unknown connector: {0}")]
    UnknownConnector(ObjectId),
    /// A background reference that is not an image data URI.
    #[error("background must be an image data URI")]
    InvalidBackground,
}

/// Unique identifier for a note or connector.
///
/// Stored as a plain string so boards saved with short ids (`"n1"`) load
/// alongside generated UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A fresh random (v4 UUID) id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A sticky note as stored in the scene and in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: ObjectId,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    /// CSS color of the note body.
    pub color: String,
}

impl Note {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// A directed link from one note to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: ObjectId,
    pub from_id: ObjectId,
    pub to_id: ObjectId,
}

impl Connector {
    /// Whether either end of this connector is `note_id`.
    #[must_use]
    pub fn touches(&self, note_id: &ObjectId) -> bool {
        self.from_id == *note_id || self.to_id == *note_id
    }
}

/// Background image reference, held as a `data:image/...` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundImage(String);

impl BackgroundImage {
    /// Wrap an image data URI.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::InvalidBackground`] unless `uri` starts with `data:image/`.
    pub fn from_data_uri(uri: impl Into<String>) -> Result<Self, DocError> {
        let uri = uri.into();
        if uri.starts_with("data:image/") {
            Ok(Self(uri))
        } else {
            Err(DocError::InvalidBackground)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Scene contents read back from storage.
///
/// `notes` is `None` when no usable note list was found, in which case the
/// starter notes are used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub notes: Option<Vec<Note>>,
    pub connectors: Vec<Connector>,
    pub background: Option<BackgroundImage>,
}

/// A note removed from the scene together with the connectors that went with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNote {
    pub note: Note,
    pub connectors: Vec<Connector>,
}

/// The two notes a fresh or reset board starts with.
pub fn starter_notes<R: Rng + ?Sized>(rng: &mut R, palette: &[String]) -> Vec<Note> {
    vec![
        Note {
            id: ObjectId::new("n1"),
            x: 120.0,
            y: 120.0,
            width: 180.0,
            height: 120.0,
            text: "Double-click to edit".to_owned(),
            color: pick_color(rng, palette),
        },
        Note {
            id: ObjectId::new("n2"),
            x: 420.0,
            y: 260.0,
            width: 200.0,
            height: 120.0,
            text: "Drag me around".to_owned(),
            color: pick_color(rng, palette),
        },
    ]
}

/// A random swatch from `palette`, or the first built-in swatch when it is empty.
pub fn pick_color<R: Rng + ?Sized>(rng: &mut R, palette: &[String]) -> String {
    if palette.is_empty() {
        return NOTE_PALETTE[0].to_owned();
    }
    palette[rng.random_range(0..palette.len())].clone()
}

/// In-memory scene: ordered notes, connectors, and the optional background.
pub struct DocStore {
    notes: Vec<Note>,
    index: HashMap<ObjectId, usize>,
    connectors: Vec<Connector>,
    background: Option<BackgroundImage>,
    config: NoteConfig,
}

impl DocStore {
    /// Create an empty store with default note settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(NoteConfig::default())
    }

    /// Create an empty store that sizes and colors new notes from `config`.
    #[must_use]
    pub fn with_config(config: NoteConfig) -> Self {
        Self { notes: Vec::new(), index: HashMap::new(), connectors: Vec::new(), background: None, config }
    }

    // --- Notes ---

    /// Create a note with a fresh id, default size and text, a random color,
    /// and a random position near the top-left of the board.
    pub fn add_note<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Note {
        let note = Note {
            id: ObjectId::generate(),
            x: NOTE_PLACEMENT_ORIGIN + rng.random::<f64>() * NOTE_PLACEMENT_SPREAD,
            y: NOTE_PLACEMENT_ORIGIN + rng.random::<f64>() * NOTE_PLACEMENT_SPREAD,
            width: self.config.default_width,
            height: self.config.default_height,
            text: DEFAULT_NOTE_TEXT.to_owned(),
            color: pick_color(rng, &self.config.palette),
        };
        self.insert_note(note.clone());
        note
    }

    /// Insert a note, replacing any existing note with the same id in place.
    pub fn insert_note(&mut self, note: Note) {
        if let Some(&idx) = self.index.get(&note.id) {
            self.notes[idx] = note;
            return;
        }
        self.index.insert(note.id.clone(), self.notes.len());
        self.notes.push(note);
    }

    /// Move a note's top-left corner to `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownNote`] if no such note exists.
    pub fn move_note(&mut self, id: &ObjectId, x: f64, y: f64) -> Result<&Note, DocError> {
        let note = self.note_mut(id)?;
        note.x = x;
        note.y = y;
        Ok(note)
    }

    /// Resize a note, clamping to the configured minimum size.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownNote`] if no such note exists.
    pub fn resize_note(&mut self, id: &ObjectId, width: f64, height: f64) -> Result<&Note, DocError> {
        let (min_w, min_h) = (self.config.min_width, self.config.min_height);
        let note = self.note_mut(id)?;
        note.width = width.max(min_w);
        note.height = height.max(min_h);
        Ok(note)
    }

    /// Replace a note's text.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownNote`] if no such note exists.
    pub fn set_note_text(&mut self, id: &ObjectId, text: String) -> Result<&Note, DocError> {
        let note = self.note_mut(id)?;
        note.text = text;
        Ok(note)
    }

    /// Remove a note and every connector that starts or ends at it.
    pub fn remove_note(&mut self, id: &ObjectId) -> Option<RemovedNote> {
        let idx = self.index.remove(id)?;
        let note = self.notes.remove(idx);
        self.reindex();

        let (removed, kept): (Vec<Connector>, Vec<Connector>) =
            std::mem::take(&mut self.connectors).into_iter().partition(|c| c.touches(id));
        self.connectors = kept;
        Some(RemovedNote { note, connectors: removed })
    }

    // --- Connectors ---

    /// Link `from` to `to`. Duplicate links between the same pair are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::SelfLoop`] when `from == to` and
    /// [`DocError::UnknownNote`] when either end is missing.
    pub fn add_connector(&mut self, from: &ObjectId, to: &ObjectId) -> Result<Connector, DocError> {
        if from == to {
            return Err(DocError::SelfLoop(from.clone()));
        }
        for end in [from, to] {
            if !self.index.contains_key(end) {
                return Err(DocError::UnknownNote(end.clone()));
            }
        }
        let connector = Connector { id: ObjectId::generate(), from_id: from.clone(), to_id: to.clone() };
        self.connectors.push(connector.clone());
        Ok(connector)
    }

    /// Remove a connector by id.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownConnector`] if no such connector exists.
    pub fn remove_connector(&mut self, id: &ObjectId) -> Result<Connector, DocError> {
        let pos = self
            .connectors
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| DocError::UnknownConnector(id.clone()))?;
        Ok(self.connectors.remove(pos))
    }

    // --- Background ---

    /// Replace the background image; `None` clears it.
    pub fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
    }

    // --- Whole-scene ---

    /// Replace the scene with the starter notes, no connectors and no background.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.notes = starter_notes(rng, &self.config.palette);
        self.connectors.clear();
        self.background = None;
        self.reindex();
    }

    /// Replace the scene with a snapshot read from storage.
    ///
    /// Duplicate note ids keep their first occurrence; connectors that are
    /// self-loops or reference missing notes are dropped.
    pub fn load<R: Rng + ?Sized>(&mut self, snapshot: Snapshot, rng: &mut R) {
        self.notes.clear();
        self.index.clear();
        let notes = snapshot
            .notes
            .unwrap_or_else(|| starter_notes(rng, &self.config.palette));
        for note in notes {
            if self.index.contains_key(&note.id) {
                log::warn!("doc: dropping duplicate note {}", note.id);
                continue;
            }
            self.insert_note(note);
        }

        let total = snapshot.connectors.len();
        self.connectors = snapshot
            .connectors
            .into_iter()
            .filter(|c| c.from_id != c.to_id && self.index.contains_key(&c.from_id) && self.index.contains_key(&c.to_id))
            .collect();
        if self.connectors.len() < total {
            log::warn!("doc: pruned {} dangling connectors", total - self.connectors.len());
        }

        self.background = snapshot.background;
    }

    // --- Queries ---

    /// All notes in draw order (bottom first).
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    #[must_use]
    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    #[must_use]
    pub fn note(&self, id: &ObjectId) -> Option<&Note> {
        self.index.get(id).map(|&idx| &self.notes[idx])
    }

    #[must_use]
    pub fn connector(&self, id: &ObjectId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == *id)
    }

    /// Center of a note in world coordinates.
    #[must_use]
    pub fn note_center(&self, id: &ObjectId) -> Option<Point> {
        self.note(id).map(Note::center)
    }

    /// Connectors that start or end at `note_id`.
    #[must_use]
    pub fn connectors_touching(&self, note_id: &ObjectId) -> Vec<&Connector> {
        self.connectors.iter().filter(|c| c.touches(note_id)).collect()
    }

    #[must_use]
    pub fn note_config(&self) -> &NoteConfig {
        &self.config
    }

    /// Number of notes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns `true` if the store contains no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn note_mut(&mut self, id: &ObjectId) -> Result<&mut Note, DocError> {
        let idx = *self.index.get(id).ok_or_else(|| DocError::UnknownNote(id.clone()))?;
        Ok(&mut self.notes[idx])
    }

    fn reindex(&mut self) {
        self.index = self
            .notes
            .iter()
            .enumerate()
            .map(|(idx, note)| (note.id.clone(), idx))
            .collect();
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
