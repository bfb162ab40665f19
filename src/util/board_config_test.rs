#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn missing_block_uses_defaults() {
    assert_eq!(resolve_board_config(None), BoardConfig::default());
    assert_eq!(resolve_board_config(Some("  \n")), BoardConfig::default());
}

#[test]
fn partial_block_overrides_fields() {
    let config = resolve_board_config(Some(r#"{"zoom":{"max":2.0},"storage":{"notes":"my_notes"}}"#));
    assert_eq!(config.zoom.max, 2.0);
    assert_eq!(config.zoom.min, 0.3);
    assert_eq!(config.storage.notes, "my_notes");
    assert_eq!(config.storage.connectors, "stickyDigitizer_connectors");
}

#[test]
fn malformed_block_falls_back_to_defaults() {
    assert_eq!(resolve_board_config(Some("{zoom")), BoardConfig::default());
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    assert_eq!(resolve_board_config(Some(r#"{"zoom":{"min":5.0,"max":1.0}}"#)), BoardConfig::default());
}
