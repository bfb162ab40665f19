use super::*;

#[test]
fn map_button_codes() {
    assert_eq!(map_button(0), Button::Primary);
    assert_eq!(map_button(1), Button::Middle);
    assert_eq!(map_button(2), Button::Secondary);
    assert_eq!(map_button(4), Button::Primary);
}

#[test]
fn map_modifiers_copies_flags() {
    let m = map_modifiers(true, false, true, false);
    assert!(m.shift && m.alt);
    assert!(!m.ctrl && !m.meta);
}

#[test]
fn form_controls_are_detected() {
    assert!(is_form_control("INPUT", false));
    assert!(is_form_control("textarea", false));
    assert!(is_form_control("SELECT", false));
    assert!(is_form_control("DIV", true));
}

#[test]
fn canvas_and_buttons_are_not_form_controls() {
    assert!(!is_form_control("CANVAS", false));
    assert!(!is_form_control("BUTTON", false));
    assert!(!is_form_control("BODY", false));
}

#[test]
fn commit_chord_needs_command_modifier() {
    assert!(is_commit_chord("Enter", map_modifiers(false, true, false, false)));
    assert!(is_commit_chord("Enter", map_modifiers(false, false, false, true)));
    assert!(!is_commit_chord("Enter", map_modifiers(true, false, false, false)));
    assert!(!is_commit_chord("n", map_modifiers(false, true, false, false)));
}

#[test]
fn space_default_is_claimed_even_when_unhandled() {
    let space = Key(" ".to_owned());
    assert!(claims_key_default(&space, false, false));
    assert!(claims_key_default(&space, true, false));
}

#[test]
fn space_default_is_left_to_the_text_overlay() {
    assert!(!claims_key_default(&Key(" ".to_owned()), false, true));
}

#[test]
fn other_keys_are_claimed_only_when_handled() {
    let delete = Key("Delete".to_owned());
    assert!(claims_key_default(&delete, true, false));
    assert!(!claims_key_default(&delete, false, false));
    assert!(!claims_key_default(&Key("a".to_owned()), false, false));
}
