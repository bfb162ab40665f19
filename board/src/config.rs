//! Board configuration with defaults from [`crate::consts`].
//!
//! The host may embed a partial JSON document to override any field; missing
//! fields keep their defaults. Overrides are validated before use.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BACKGROUND_STORAGE_KEY, CONNECTORS_STORAGE_KEY, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, MIN_NOTE_HEIGHT,
    MIN_NOTE_WIDTH, NOTE_PALETTE, NOTES_STORAGE_KEY, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

/// Error returned by [`BoardConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The override document is not valid JSON for [`BoardConfig`].
    #[error("failed to parse board config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but a value is out of range.
    #[error("invalid board config: {0}")]
    Invalid(String),
}

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage: StorageKeys,
    pub zoom: ZoomConfig,
    pub notes: NoteConfig,
}

/// Local storage slot names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub notes: String,
    pub connectors: String,
    pub background: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            notes: NOTES_STORAGE_KEY.to_owned(),
            connectors: CONNECTORS_STORAGE_KEY.to_owned(),
            background: BACKGROUND_STORAGE_KEY.to_owned(),
        }
    }
}

/// Zoom bounds and per-tick step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self { min: ZOOM_MIN, max: ZOOM_MAX, step: ZOOM_STEP }
    }
}

/// Sizing and coloring for new notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteConfig {
    pub default_width: f64,
    pub default_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub palette: Vec<String>,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_NOTE_WIDTH,
            default_height: DEFAULT_NOTE_HEIGHT,
            min_width: MIN_NOTE_WIDTH,
            min_height: MIN_NOTE_HEIGHT,
            palette: NOTE_PALETTE.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl BoardConfig {
    /// Build a config from an optional JSON override document.
    ///
    /// `None` or a blank document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value fails [`BoardConfig::validate`].
    pub fn from_json(raw: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(Self::default());
        };
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.max) {
            return Err(invalid(format!("zoom bounds [{}, {}] must satisfy 0 < min <= max", zoom.min, zoom.max)));
        }
        if zoom.step <= 1.0 {
            return Err(invalid(format!("zoom step {} must be greater than 1", zoom.step)));
        }

        let notes = &self.notes;
        if notes.min_width <= 0.0 || notes.min_height <= 0.0 {
            return Err(invalid("minimum note size must be positive".to_owned()));
        }
        if notes.default_width < notes.min_width || notes.default_height < notes.min_height {
            return Err(invalid("default note size must not be below the minimum".to_owned()));
        }
        if notes.palette.iter().all(|c| c.trim().is_empty()) {
            return Err(invalid("note palette must contain at least one color".to_owned()));
        }

        let keys = &self.storage;
        let names = [&keys.notes, &keys.connectors, &keys.background];
        if names.iter().any(|k| k.is_empty()) {
            return Err(invalid("storage keys must not be empty".to_owned()));
        }
        if keys.notes == keys.connectors || keys.notes == keys.background || keys.connectors == keys.background {
            return Err(invalid("storage keys must be distinct".to_owned()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
