#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::Note;

fn note(id: &str, x: f64, y: f64, w: f64, h: f64) -> Note {
    Note {
        id: ObjectId::new(id),
        x,
        y,
        width: w,
        height: h,
        text: String::new(),
        color: "#FEF3C7".to_owned(),
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn oid(raw: &str) -> ObjectId {
    ObjectId::new(raw)
}

/// Two notes side by side with a connector a→b.
fn linked_pair() -> (DocStore, ObjectId) {
    let mut doc = DocStore::new();
    doc.insert_note(note("a", 0.0, 0.0, 100.0, 100.0));
    doc.insert_note(note("b", 300.0, 0.0, 100.0, 100.0));
    let c = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    (doc, c.id)
}

// =============================================================
// distance_to_segment
// =============================================================

#[test]
fn distance_perpendicular_to_segment() {
    assert_eq!(distance_to_segment(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0);
}

#[test]
fn distance_beyond_endpoint_uses_endpoint() {
    assert_eq!(distance_to_segment(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
}

#[test]
fn distance_to_degenerate_segment() {
    assert_eq!(distance_to_segment(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0)), 5.0);
}

// =============================================================
// connector_segment
// =============================================================

#[test]
fn segment_stops_at_target_edge() {
    let (doc, id) = linked_pair();
    let conn = doc.connector(&id).unwrap();
    let (a, b) = connector_segment(conn, &doc).unwrap();
    assert_eq!(a, pt(50.0, 50.0));
    assert_eq!(b, pt(300.0, 50.0));
}

#[test]
fn segment_stops_at_target_edge_diagonally() {
    let mut doc = DocStore::new();
    doc.insert_note(note("a", 0.0, 0.0, 100.0, 100.0));
    doc.insert_note(note("b", 200.0, 200.0, 100.0, 100.0));
    let c = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    let (_, end) = connector_segment(&c, &doc).unwrap();
    assert!((end.x - 200.0).abs() < 1e-9);
    assert!((end.y - 200.0).abs() < 1e-9);
}

#[test]
fn segment_missing_note_is_none() {
    let (mut doc, id) = linked_pair();
    let conn = doc.connector(&id).unwrap().clone();
    doc.remove_note(&oid("b"));
    assert!(connector_segment(&conn, &doc).is_none());
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_space_hits_nothing() {
    let (doc, _) = linked_pair();
    assert!(hit_test(pt(150.0, 400.0), &doc, &Camera::default(), None).is_none());
}

#[test]
fn note_body_hit() {
    let (doc, _) = linked_pair();
    let hit = hit_test(pt(20.0, 20.0), &doc, &Camera::default(), None).unwrap();
    assert_eq!(hit, Hit { object_id: oid("a"), part: HitPart::NoteBody });
}

#[test]
fn topmost_note_wins() {
    let mut doc = DocStore::new();
    doc.insert_note(note("under", 0.0, 0.0, 100.0, 100.0));
    doc.insert_note(note("over", 50.0, 50.0, 100.0, 100.0));
    let hit = hit_test(pt(75.0, 75.0), &doc, &Camera::default(), None).unwrap();
    assert_eq!(hit.object_id, oid("over"));
}

#[test]
fn connector_hit_within_stroke_slop() {
    let (doc, id) = linked_pair();
    let hit = hit_test(pt(200.0, 55.0), &doc, &Camera::default(), None).unwrap();
    assert_eq!(hit, Hit { object_id: id, part: HitPart::Connector });
}

#[test]
fn connector_miss_outside_stroke_slop() {
    let (doc, _) = linked_pair();
    assert!(hit_test(pt(200.0, 57.0), &doc, &Camera::default(), None).is_none());
}

#[test]
fn notes_take_priority_over_connectors() {
    let (doc, _) = linked_pair();
    // Source center lies on the connector but inside note a.
    let hit = hit_test(pt(50.0, 50.0), &doc, &Camera::default(), None).unwrap();
    assert_eq!(hit.part, HitPart::NoteBody);
}

#[test]
fn resize_handle_only_for_selected_note() {
    let (doc, _) = linked_pair();
    let corner = pt(99.0, 99.0);
    let unselected = hit_test(corner, &doc, &Camera::default(), None).unwrap();
    assert_eq!(unselected.part, HitPart::NoteBody);

    let selected = hit_test(corner, &doc, &Camera::default(), Some(&oid("a"))).unwrap();
    assert_eq!(selected, Hit { object_id: oid("a"), part: HitPart::NoteResizeHandle });
}

#[test]
fn resize_handle_slop_scales_with_zoom() {
    let (doc, _) = linked_pair();
    let zoomed_in = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    // 6 world units outside the corner is 24 screen px at zoom 4: too far.
    let hit = hit_test(pt(106.0, 106.0), &doc, &zoomed_in, Some(&oid("a")));
    assert!(hit.is_none());
    // At zoom 1 the same point is within 8 px.
    let hit = hit_test(pt(106.0, 106.0), &doc, &Camera::default(), Some(&oid("a"))).unwrap();
    assert_eq!(hit.part, HitPart::NoteResizeHandle);
}

#[test]
fn resize_handle_is_bottom_right_corner() {
    let n = note("a", 10.0, 20.0, 100.0, 50.0);
    assert_eq!(resize_handle_position(&n), pt(110.0, 70.0));
}
