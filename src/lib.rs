//! # sticky-digitizer
//!
//! Leptos + WASM frontend for a single-user sticky-note whiteboard. Notes and
//! connectors live on a pannable, zoomable canvas drawn by the `board` crate;
//! an optional background image comes from a file upload or a webcam
//! snapshot. Everything persists to the browser's local storage.
//!
//! This crate holds the Leptos components, the reactive UI state shared
//! between them, and the browser glue (input mapping, capture, config). The
//! `CanvasHost` component bridges it to the imperative `board::engine::Engine`.

pub mod app;
pub mod components;
pub mod state;
pub mod util;

/// WASM entry point: install logging and the panic hook, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("logger already installed: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
