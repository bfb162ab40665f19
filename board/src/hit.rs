#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{CONNECTOR_HIT_WIDTH, HANDLE_RADIUS_PX};
use crate::doc::{Connector, DocStore, Note, ObjectId};

/// Which part of the scene was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    NoteBody,
    /// Bottom-right resize handle of the selected note.
    NoteResizeHandle,
    Connector,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Test what is under `world_pt`.
///
/// Order matches draw order reversed: the selected note's resize handle, then
/// notes from topmost down, then connectors.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera, selected_note: Option<&ObjectId>) -> Option<Hit> {
    if let Some(note) = selected_note.and_then(|id| doc.note(id)) {
        let handle = resize_handle_position(note);
        let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
        if (world_pt.x - handle.x).abs() <= slop && (world_pt.y - handle.y).abs() <= slop {
            return Some(Hit { object_id: note.id.clone(), part: HitPart::NoteResizeHandle });
        }
    }

    if let Some(note) = doc.notes().iter().rev().find(|n| n.rect().contains(world_pt)) {
        return Some(Hit { object_id: note.id.clone(), part: HitPart::NoteBody });
    }

    let half_width = CONNECTOR_HIT_WIDTH / 2.0;
    doc.connectors()
        .iter()
        .rev()
        .find(|c| {
            connector_segment(c, doc).is_some_and(|(a, b)| distance_to_segment(world_pt, a, b) <= half_width)
        })
        .map(|c| Hit { object_id: c.id.clone(), part: HitPart::Connector })
}

/// World position of a note's resize handle (its bottom-right corner).
#[must_use]
pub fn resize_handle_position(note: &Note) -> Point {
    Point::new(note.x + note.width, note.y + note.height)
}

/// Visible segment of a connector.
///
/// Starts at the source center and runs toward the target center, stopping
/// where it enters the target's rectangle so the arrowhead stays visible
/// above the target note. `None` if either end is missing.
#[must_use]
pub fn connector_segment(connector: &Connector, doc: &DocStore) -> Option<(Point, Point)> {
    let from = doc.note(&connector.from_id)?;
    let to = doc.note(&connector.to_id)?;
    let start = from.center();
    let target = to.center();

    let dx = target.x - start.x;
    let dy = target.y - start.y;
    let half_w = to.width / 2.0;
    let half_h = to.height / 2.0;

    // Fraction of (dx, dy) that lies inside the target rectangle.
    let tx = if dx.abs() > f64::EPSILON { half_w / dx.abs() } else { f64::INFINITY };
    let ty = if dy.abs() > f64::EPSILON { half_h / dy.abs() } else { f64::INFINITY };
    let t = tx.min(ty).min(1.0);

    Some((start, Point::new(target.x - dx * t, target.y - dy * t)))
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    (p.x - cx).hypot(p.y - cy)
}
