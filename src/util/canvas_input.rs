//! Canvas input mapping and pointer helper utilities.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

use board::input::{Button, Key, Modifiers};

#[cfg(feature = "csr")]
use board::camera::Point;

/// Map a DOM `MouseEvent.button` code to an engine button.
#[must_use]
pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

#[must_use]
pub fn map_modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

/// Whether keyboard focus sits in a text-entry element, where board
/// shortcuts must not fire.
#[must_use]
pub fn is_form_control(tag_name: &str, content_editable: bool) -> bool {
    content_editable || matches!(tag_name.to_ascii_uppercase().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

/// Ctrl/Cmd+Enter, which commits the text overlay.
#[must_use]
pub fn is_commit_chord(key: &str, modifiers: Modifiers) -> bool {
    key == "Enter" && modifiers.command()
}

/// Whether a window keydown should have its browser default suppressed.
///
/// Space is always claimed outside the text overlay, including auto-repeats
/// the engine ignores, so the page never scrolls under the board.
#[must_use]
pub fn claims_key_default(key: &Key, handled: bool, editing: bool) -> bool {
    handled || (key.is_space() && !editing)
}

/// Canvas-relative position of a mouse, pointer or wheel event.
#[cfg(feature = "csr")]
pub fn event_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

/// Whether a keyboard event originates from a form control.
#[cfg(feature = "csr")]
pub fn event_targets_form_control(ev: &web_sys::KeyboardEvent) -> bool {
    use wasm_bindgen::JsCast;

    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        .is_some_and(|el| is_form_control(&el.tag_name(), el.is_content_editable()))
}
