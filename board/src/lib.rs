//! Scene, interaction and rendering engine for the sticky-note whiteboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but
//! everything except [`render`] and the browser halves of [`engine`] and
//! [`storage`] is plain Rust and is tested natively. It owns the note and
//! connector scene, the select/connect state machine, the pan/zoom camera,
//! hit-testing, and write-through persistence. The host UI is responsible
//! only for wiring DOM events to the engine and reacting to the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Notes, connectors, background and the in-memory [`doc::DocStore`] |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types, UI state and the gesture state machine |
//! | [`hit`] | Hit-testing against notes, handles and connectors |
//! | [`render`] | Scene rendering onto a 2D canvas context |
//! | [`storage`] | Key-value persistence and action write-through |
//! | [`config`] | Board configuration with validated JSON overrides |
//! | [`consts`] | Shared numeric constants (zoom limits, note sizes, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod storage;
