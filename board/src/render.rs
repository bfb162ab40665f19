//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of document, camera and UI state and produces
//! pixels. It does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::camera::{Camera, Point, Rect};
use crate::consts::{
    ARROW_POINTER_LENGTH, ARROW_POINTER_WIDTH, HANDLE_RADIUS_PX, NOTE_CORNER_RADIUS, NOTE_FONT_SIZE,
    NOTE_LINE_HEIGHT, NOTE_TEXT_INSET,
};
use crate::doc::{Connector, DocStore, Note};
use crate::hit;
use crate::input::{Mode, UiState};

const INK: &str = "#111827";
const ACCENT: &str = "#2563EB";
const NOTE_OUTLINE: &str = "#000000";
const SHADOW: &str = "rgba(0, 0, 0, 0.2)";

/// Draw the full scene: background, connectors, notes, then selection UI.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
#[allow(clippy::too_many_arguments)]
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    camera: &Camera,
    ui: &UiState,
    background: Option<&HtmlImageElement>,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: background image.
    if let Some(image) = background {
        draw_background(ctx, image, viewport_w, viewport_h)?;
    }

    // Layer 3: connectors beneath notes.
    for connector in doc.connectors() {
        let selected = ui.selected_connector.as_ref() == Some(&connector.id);
        draw_connector(ctx, connector, doc, selected);
    }

    // Layer 4: notes in insertion order.
    for note in doc.notes() {
        let editing = ui.editing.as_ref() == Some(&note.id);
        draw_note(ctx, note, ui.is_note_highlighted(&note.id), editing)?;
    }

    // Layer 5: resize handle.
    if ui.mode == Mode::Select {
        if let Some(note) = ui.selected_note.as_ref().and_then(|id| doc.note(id)) {
            draw_resize_handle(ctx, note, camera.zoom);
        }
    }

    Ok(())
}

// =============================================================
// Background
// =============================================================

/// Fit the image inside the viewport rectangle, centered, in world space.
fn draw_background(
    ctx: &CanvasRenderingContext2d,
    image: &HtmlImageElement,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), JsValue> {
    // Not decoded yet; the host re-renders on load.
    if !image.complete() || image.natural_width() == 0 || image.natural_height() == 0 {
        return Ok(());
    }
    let image_w = f64::from(image.natural_width());
    let image_h = f64::from(image.natural_height());
    let scale = (viewport_w / image_w).min(viewport_h / image_h);
    if scale <= 0.0 {
        return Ok(());
    }
    let fit = fit_contain(image_w * scale, image_h * scale, viewport_w, viewport_h);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, fit.x, fit.y, fit.width, fit.height)
}

fn fit_contain(width: f64, height: f64, viewport_w: f64, viewport_h: f64) -> Rect {
    Rect::new((viewport_w - width) / 2.0, (viewport_h - height) / 2.0, width, height)
}

// =============================================================
// Connectors
// =============================================================

fn draw_connector(ctx: &CanvasRenderingContext2d, connector: &Connector, doc: &DocStore, selected: bool) {
    let Some((a, b)) = hit::connector_segment(connector, doc) else {
        return;
    };
    let color = if selected { ACCENT } else { INK };

    ctx.save();
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(if selected { 4.0 } else { 2.0 });
    ctx.set_line_cap("round");

    ctx.begin_path();
    ctx.move_to(a.x, a.y);
    ctx.line_to(b.x, b.y);
    ctx.stroke();

    draw_arrowhead(ctx, a, b);
    ctx.restore();
}

/// Filled triangle with its tip at `tip`, pointing away from `tail`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tail: Point, tip: Point) {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let (sin, cos) = angle.sin_cos();
    let base_x = tip.x - ARROW_POINTER_LENGTH * cos;
    let base_y = tip.y - ARROW_POINTER_LENGTH * sin;
    let half = ARROW_POINTER_WIDTH / 2.0;

    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(base_x - half * sin, base_y + half * cos);
    ctx.line_to(base_x + half * sin, base_y - half * cos);
    ctx.close_path();
    ctx.fill();
}

// =============================================================
// Notes
// =============================================================

fn draw_note(ctx: &CanvasRenderingContext2d, note: &Note, highlighted: bool, editing: bool) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_shadow_color(SHADOW);
    ctx.set_shadow_blur(if highlighted { 12.0 } else { 6.0 });
    ctx.set_shadow_offset_x(0.0);
    ctx.set_shadow_offset_y(0.0);

    rounded_rect_path(ctx, note.rect(), NOTE_CORNER_RADIUS)?;
    ctx.set_fill_style_str(&note.color);
    ctx.fill();

    // Outline and text without the shadow.
    ctx.set_shadow_color("transparent");
    if highlighted {
        ctx.set_stroke_style_str(INK);
        ctx.set_line_width(1.8);
    } else {
        ctx.set_stroke_style_str(NOTE_OUTLINE);
        ctx.set_line_width(0.6);
    }
    ctx.stroke();

    // The overlay shows the text while it is being edited.
    if !editing {
        draw_note_text(ctx, note)?;
    }

    ctx.restore();
    Ok(())
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, radius: f64) -> Result<(), JsValue> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.x + rect.width, rect.y + rect.height);

    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(right, y, right, bottom, r)?;
    ctx.arc_to(right, bottom, x, bottom, r)?;
    ctx.arc_to(x, bottom, x, y, r)?;
    ctx.arc_to(x, y, right, y, r)?;
    ctx.close_path();
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn draw_note_text(ctx: &CanvasRenderingContext2d, note: &Note) -> Result<(), JsValue> {
    if note.text.trim().is_empty() {
        return Ok(());
    }
    let area = note.rect().inset(NOTE_TEXT_INSET);
    if area.width <= 0.0 || area.height <= 0.0 {
        return Ok(());
    }

    ctx.set_fill_style_str(INK);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.set_font(&format!("{NOTE_FONT_SIZE}px sans-serif"));

    let line_height = NOTE_FONT_SIZE * NOTE_LINE_HEIGHT;
    let max_lines = ((area.height / line_height).floor() as usize).max(1);
    let mut lines = wrap_text_lines(ctx, &note.text, area.width);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = fit_text_with_ellipsis(ctx, &format!("{last}..."), area.width);
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        ctx.fill_text(line, area.x, area.y + idx as f64 * line_height)?;
    }
    Ok(())
}

fn wrap_text_lines(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> Vec<String> {
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let words: Vec<&str> = raw_line.split_whitespace().collect();
        if words.is_empty() {
            out.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in words {
            let candidate = if current.is_empty() { word.to_owned() } else { format!("{current} {word}") };
            if measured_text_width(ctx, &candidate) <= max_w {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if measured_text_width(ctx, word) <= max_w {
                current = word.to_owned();
            } else {
                let mut chunks = break_long_word(ctx, word, max_w);
                current = chunks.pop().unwrap_or_default();
                out.extend(chunks);
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn break_long_word(ctx: &CanvasRenderingContext2d, word: &str, max_w: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if !current.is_empty() && measured_text_width(ctx, &candidate) > max_w {
            lines.push(current);
            current = ch.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn fit_text_with_ellipsis(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    let trimmed = text.trim();
    if measured_text_width(ctx, trimmed) <= max_w {
        return trimmed.to_owned();
    }

    let ellipsis = "...";
    let mut chars: Vec<char> = trimmed.trim_end_matches(ellipsis).chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ellipsis);
        if measured_text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    ellipsis.to_owned()
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}

// =============================================================
// Selection UI
// =============================================================

/// Square handle at the bottom-right corner, constant size on screen.
fn draw_resize_handle(ctx: &CanvasRenderingContext2d, note: &Note, zoom: f64) {
    let pos = hit::resize_handle_position(note);
    let half = HANDLE_RADIUS_PX / 2.0 / zoom;

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.5 / zoom);
    ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
    ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
    ctx.restore();
}
