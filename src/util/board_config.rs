//! Board configuration embedded in the host page.
//!
//! The page may carry `<script id="board-config" type="application/json">`
//! with a partial [`BoardConfig`]; anything missing keeps its default.

#[cfg(test)]
#[path = "board_config_test.rs"]
mod board_config_test;

use board::config::BoardConfig;

/// Element id of the embedded config block.
pub const CONFIG_ELEMENT_ID: &str = "board-config";

/// Parse an embedded config document, falling back to defaults on error.
#[must_use]
pub fn resolve_board_config(raw: Option<&str>) -> BoardConfig {
    match BoardConfig::from_json(raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("board config ignored: {e}");
            BoardConfig::default()
        }
    }
}

/// Read the config block from the current document.
#[cfg(feature = "csr")]
pub fn read_board_config() -> BoardConfig {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    resolve_board_config(raw.as_deref())
}
