#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn note(id: &str, x: f64, y: f64) -> Note {
    Note {
        id: ObjectId::new(id),
        x,
        y,
        width: 100.0,
        height: 80.0,
        text: format!("note {id}"),
        color: "#FEF3C7".to_owned(),
    }
}

fn store_with(ids: &[&str]) -> DocStore {
    let mut doc = DocStore::new();
    for (i, id) in ids.iter().enumerate() {
        doc.insert_note(note(id, i as f64 * 150.0, 0.0));
    }
    doc
}

fn oid(raw: &str) -> ObjectId {
    ObjectId::new(raw)
}

// =============================================================
// ObjectId / serde
// =============================================================

#[test]
fn object_id_serializes_as_plain_string() {
    let json = serde_json::to_string(&oid("n1")).unwrap();
    assert_eq!(json, "\"n1\"");
}

#[test]
fn generated_ids_are_distinct() {
    assert_ne!(ObjectId::generate(), ObjectId::generate());
}

#[test]
fn connector_uses_camel_case_fields() {
    let conn = Connector { id: oid("c1"), from_id: oid("a"), to_id: oid("b") };
    let value = serde_json::to_value(&conn).unwrap();
    assert_eq!(value, serde_json::json!({ "id": "c1", "fromId": "a", "toId": "b" }));
}

#[test]
fn note_list_parses_saved_shape() {
    let raw = r##"[{"id":"n1","x":120,"y":120,"width":180,"height":120,"text":"Double-click to edit","color":"#FEF3C7"}]"##;
    let notes: Vec<Note> = serde_json::from_str(raw).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, oid("n1"));
    assert_eq!(notes[0].width, 180.0);
}

#[test]
fn background_requires_image_data_uri() {
    assert!(BackgroundImage::from_data_uri("data:image/png;base64,AAAA").is_ok());
    assert_eq!(
        BackgroundImage::from_data_uri("data:text/plain;base64,AAAA"),
        Err(DocError::InvalidBackground)
    );
    assert_eq!(BackgroundImage::from_data_uri("https://x/y.png"), Err(DocError::InvalidBackground));
}

// =============================================================
// add_note / insert_note
// =============================================================

#[test]
fn add_note_twice_yields_distinct_default_notes() {
    let mut doc = DocStore::new();
    let mut rng = rng();
    let a = doc.add_note(&mut rng);
    let b = doc.add_note(&mut rng);
    assert_ne!(a.id, b.id);
    assert_eq!(a.text, "New note");
    assert_eq!(b.text, "New note");
    assert_eq!(doc.len(), 2);
}

#[test]
fn add_note_uses_default_size_and_palette() {
    let mut doc = DocStore::new();
    let n = doc.add_note(&mut rng());
    assert_eq!(n.width, 200.0);
    assert_eq!(n.height, 120.0);
    assert!(crate::consts::NOTE_PALETTE.contains(&n.color.as_str()));
}

#[test]
fn add_note_places_within_spread() {
    let mut doc = DocStore::new();
    let mut rng = rng();
    for _ in 0..50 {
        let n = doc.add_note(&mut rng);
        assert!((80.0..=280.0).contains(&n.x));
        assert!((80.0..=280.0).contains(&n.y));
    }
}

#[test]
fn insert_note_replaces_in_place() {
    let mut doc = store_with(&["a", "b"]);
    let mut updated = note("a", 999.0, 0.0);
    updated.text = "changed".to_owned();
    doc.insert_note(updated);
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.notes()[0].text, "changed");
}

// =============================================================
// move / resize / text
// =============================================================

#[test]
fn move_note_updates_position() {
    let mut doc = store_with(&["a"]);
    doc.move_note(&oid("a"), 42.0, 24.0).unwrap();
    let n = doc.note(&oid("a")).unwrap();
    assert_eq!((n.x, n.y), (42.0, 24.0));
}

#[test]
fn move_unknown_note_errors() {
    let mut doc = DocStore::new();
    assert_eq!(doc.move_note(&oid("zz"), 1.0, 1.0).unwrap_err(), DocError::UnknownNote(oid("zz")));
}

#[test]
fn resize_note_clamps_to_minimum() {
    let mut doc = store_with(&["a"]);
    let n = doc.resize_note(&oid("a"), 10.0, 5.0).unwrap();
    assert_eq!(n.width, 80.0);
    assert_eq!(n.height, 60.0);
}

#[test]
fn set_note_text_replaces_text() {
    let mut doc = store_with(&["a"]);
    doc.set_note_text(&oid("a"), "hello\nworld".to_owned()).unwrap();
    assert_eq!(doc.note(&oid("a")).unwrap().text, "hello\nworld");
}

// =============================================================
// Connectors
// =============================================================

#[test]
fn add_connector_links_notes() {
    let mut doc = store_with(&["a", "b"]);
    let c = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    assert_eq!(c.from_id, oid("a"));
    assert_eq!(c.to_id, oid("b"));
    assert_eq!(doc.connectors().len(), 1);
}

#[test]
fn self_loop_rejected() {
    let mut doc = store_with(&["a"]);
    assert_eq!(doc.add_connector(&oid("a"), &oid("a")).unwrap_err(), DocError::SelfLoop(oid("a")));
    assert!(doc.connectors().is_empty());
}

#[test]
fn connector_to_unknown_note_rejected() {
    let mut doc = store_with(&["a"]);
    assert_eq!(doc.add_connector(&oid("a"), &oid("ghost")).unwrap_err(), DocError::UnknownNote(oid("ghost")));
    assert!(doc.connectors().is_empty());
}

#[test]
fn duplicate_connectors_allowed() {
    let mut doc = store_with(&["a", "b"]);
    let first = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    let second = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(doc.connectors().len(), 2);
}

#[test]
fn remove_connector_by_id() {
    let mut doc = store_with(&["a", "b"]);
    let c = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    let removed = doc.remove_connector(&c.id).unwrap();
    assert_eq!(removed, c);
    assert!(doc.connectors().is_empty());
    assert!(matches!(doc.remove_connector(&c.id), Err(DocError::UnknownConnector(_))));
}

// =============================================================
// remove_note cascade
// =============================================================

#[test]
fn remove_note_cascades_only_touching_connectors() {
    let mut doc = store_with(&["a", "b", "c"]);
    let ab = doc.add_connector(&oid("a"), &oid("b")).unwrap();
    let ca = doc.add_connector(&oid("c"), &oid("a")).unwrap();
    let bc = doc.add_connector(&oid("b"), &oid("c")).unwrap();

    let removed = doc.remove_note(&oid("a")).unwrap();
    assert_eq!(removed.note.id, oid("a"));
    let removed_ids: Vec<_> = removed.connectors.iter().map(|c| c.id.clone()).collect();
    assert_eq!(removed_ids, vec![ab.id, ca.id]);
    assert_eq!(doc.connectors(), &[bc]);
}

#[test]
fn remove_note_keeps_index_consistent() {
    let mut doc = store_with(&["a", "b", "c"]);
    doc.remove_note(&oid("a")).unwrap();
    assert!(doc.note(&oid("a")).is_none());
    assert_eq!(doc.note(&oid("b")).unwrap().id, oid("b"));
    assert_eq!(doc.note(&oid("c")).unwrap().id, oid("c"));
    doc.move_note(&oid("c"), 5.0, 5.0).unwrap();
    assert_eq!(doc.notes()[1].x, 5.0);
}

#[test]
fn remove_missing_note_is_none() {
    let mut doc = store_with(&["a"]);
    assert!(doc.remove_note(&oid("b")).is_none());
    assert_eq!(doc.len(), 1);
}

#[test]
fn add_twice_connect_delete_first_leaves_one_note() {
    let mut doc = DocStore::new();
    let mut rng = rng();
    let a = doc.add_note(&mut rng);
    let b = doc.add_note(&mut rng);
    doc.add_connector(&a.id, &b.id).unwrap();
    doc.remove_note(&a.id).unwrap();
    assert!(doc.connectors().is_empty());
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.notes()[0].id, b.id);
}

#[test]
fn connectors_touching_finds_both_directions() {
    let mut doc = store_with(&["a", "b", "c"]);
    doc.add_connector(&oid("a"), &oid("b")).unwrap();
    doc.add_connector(&oid("c"), &oid("b")).unwrap();
    doc.add_connector(&oid("a"), &oid("c")).unwrap();
    assert_eq!(doc.connectors_touching(&oid("b")).len(), 2);
}

#[test]
fn note_center_is_rect_center() {
    let doc = store_with(&["a"]);
    let c = doc.note_center(&oid("a")).unwrap();
    assert_eq!((c.x, c.y), (50.0, 40.0));
}

// =============================================================
// reset / load
// =============================================================

#[test]
fn reset_restores_starter_scene() {
    let mut doc = store_with(&["a", "b"]);
    doc.add_connector(&oid("a"), &oid("b")).unwrap();
    doc.set_background(Some(BackgroundImage::from_data_uri("data:image/png;base64,AA").unwrap()));

    doc.reset(&mut rng());

    let ids: Vec<_> = doc.notes().iter().map(|n| n.id.as_str().to_owned()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
    assert_eq!(doc.notes()[0].text, "Double-click to edit");
    assert_eq!(doc.notes()[1].text, "Drag me around");
    assert_eq!((doc.notes()[1].x, doc.notes()[1].y), (420.0, 260.0));
    assert!(doc.connectors().is_empty());
    assert!(doc.background().is_none());
    assert!(doc.note(&oid("n2")).is_some());
}

#[test]
fn load_without_notes_uses_starters() {
    let mut doc = DocStore::new();
    doc.load(Snapshot::default(), &mut rng());
    assert_eq!(doc.len(), 2);
    assert!(doc.note(&oid("n1")).is_some());
}

#[test]
fn load_empty_note_list_is_empty_board() {
    let mut doc = DocStore::new();
    doc.load(Snapshot { notes: Some(Vec::new()), ..Snapshot::default() }, &mut rng());
    assert!(doc.is_empty());
}

#[test]
fn load_prunes_dangling_and_self_loop_connectors() {
    let mut doc = DocStore::new();
    let snapshot = Snapshot {
        notes: Some(vec![note("a", 0.0, 0.0), note("b", 200.0, 0.0)]),
        connectors: vec![
            Connector { id: oid("ok"), from_id: oid("a"), to_id: oid("b") },
            Connector { id: oid("dangling"), from_id: oid("a"), to_id: oid("gone") },
            Connector { id: oid("loop"), from_id: oid("b"), to_id: oid("b") },
        ],
        background: None,
    };
    doc.load(snapshot, &mut rng());
    assert_eq!(doc.connectors().len(), 1);
    assert_eq!(doc.connectors()[0].id, oid("ok"));
}

#[test]
fn load_drops_duplicate_note_ids() {
    let mut doc = DocStore::new();
    let snapshot = Snapshot { notes: Some(vec![note("a", 0.0, 0.0), note("a", 50.0, 0.0)]), ..Snapshot::default() };
    doc.load(snapshot, &mut rng());
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.notes()[0].x, 0.0);
}

#[test]
fn serialized_scene_reloads_identically() {
    let mut doc = DocStore::new();
    let mut rng = rng();
    let a = doc.add_note(&mut rng);
    let b = doc.add_note(&mut rng);
    doc.set_note_text(&b.id, "edited".to_owned()).unwrap();
    doc.move_note(&a.id, -30.5, 12.25).unwrap();
    doc.add_connector(&a.id, &b.id).unwrap();
    doc.add_connector(&b.id, &a.id).unwrap();

    let notes_json = serde_json::to_string(doc.notes()).unwrap();
    let connectors_json = serde_json::to_string(doc.connectors()).unwrap();

    let mut reloaded = DocStore::new();
    let snapshot = Snapshot {
        notes: Some(serde_json::from_str(&notes_json).unwrap()),
        connectors: serde_json::from_str(&connectors_json).unwrap(),
        background: None,
    };
    reloaded.load(snapshot, &mut StdRng::seed_from_u64(99));

    assert_eq!(reloaded.notes(), doc.notes());
    assert_eq!(reloaded.connectors(), doc.connectors());
}
