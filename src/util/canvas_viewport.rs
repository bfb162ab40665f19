//! Canvas viewport synchronization helpers shared by the canvas host.
//!
//! These bridge the Leptos reactive world and the imperative board engine and
//! depend on `web_sys`, so they only exist under the `csr` feature.

#[cfg(feature = "csr")]
use leptos::prelude::*;

#[cfg(feature = "csr")]
use board::engine::Engine;

/// Read the canvas element's CSS size and device pixel ratio, then push them to the engine.
///
/// Must be called on every resize so coordinate transforms stay accurate. The
/// engine sizes the backing store as CSS size times DPR.
#[cfg(feature = "csr")]
pub fn sync_viewport(engine: &mut Engine, canvas_ref: &NodeRef<leptos::html::Canvas>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(canvas) = canvas_ref.get_untracked() else {
        return;
    };
    let width = f64::from(canvas.client_width()).max(1.0);
    let height = f64::from(canvas.client_height()).max(1.0);
    let dpr = window.device_pixel_ratio().max(1.0);
    engine.set_viewport(width, height, dpr);
}

/// Redraw, logging canvas failures instead of surfacing them.
#[cfg(feature = "csr")]
pub fn render(engine: &Engine) {
    if let Err(e) = engine.render() {
        log::warn!("render failed: {e:?}");
    }
}
