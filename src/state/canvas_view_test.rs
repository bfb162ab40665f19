#![allow(clippy::float_cmp)]

use super::*;
use board::camera::{Camera, Point};
use board::config::BoardConfig;
use board::doc::{Note, Snapshot};
use board::input::Modifiers;

fn core_with_note() -> EngineCore {
    let mut core = EngineCore::with_seed(BoardConfig::default(), 5);
    core.load_snapshot(Snapshot {
        notes: Some(vec![Note {
            id: ObjectId::new("a"),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            text: "hi".to_owned(),
            color: "#FEF3C7".to_owned(),
        }]),
        ..Default::default()
    });
    core
}

#[test]
fn canvas_view_state_defaults_are_neutral() {
    let state = CanvasViewState::default();
    assert_eq!(state.mode, Mode::Select);
    assert!(!state.has_pending_source);
    assert_eq!(state.zoom, 1.0);
    assert_eq!(state.cursor, "default");
    assert!(state.edit.is_none());
    assert!(state.pending_hint().is_none());
}

#[test]
fn capture_reflects_connect_mode_and_pending_source() {
    let mut core = core_with_note();
    core.start_connect();
    let state = CanvasViewState::capture(&core, "default");
    assert!(state.is_connecting());
    assert!(state.pending_hint().is_none());

    core.click_note(&ObjectId::new("a"));
    let state = CanvasViewState::capture(&core, "default");
    assert_eq!(state.pending_hint(), Some("Pick a target note…"));
}

#[test]
fn capture_includes_edit_overlay() {
    let mut core = core_with_note();
    core.camera = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 2.0 };
    core.on_double_click(Point::new(50.0, 50.0), Modifiers::default());

    let state = CanvasViewState::capture(&core, "grab");

    let edit = state.edit.unwrap();
    assert_eq!(edit.id, ObjectId::new("a"));
    assert_eq!(edit.rect, Rect::new(26.0, 36.0, 168.0, 168.0));
    assert_eq!(state.cursor, "grab");
    assert_eq!(state.zoom, 2.0);
}

#[test]
fn edit_overlay_style_uses_pixels() {
    let overlay = EditOverlay { id: ObjectId::new("a"), rect: Rect::new(26.0, 36.5, 168.0, 84.0) };
    assert_eq!(overlay.style(), "left: 26px; top: 36.5px; width: 168px; height: 84px;");
}

#[test]
fn zoom_label_rounds_to_percent() {
    let state = CanvasViewState { zoom: 1.1025, ..Default::default() };
    assert_eq!(state.zoom_label(), "110%");
}
