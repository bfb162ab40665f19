//! Bridge component between the chrome and the imperative `board::engine::Engine`.
//!
//! ARCHITECTURE
//! ============
//! The host owns the engine and the local-storage adapter. Every DOM event
//! (pointer, wheel, keyboard, resize, text overlay) and every queued
//! [`BoardCommand`] becomes one engine call; the returned actions are written
//! through to storage, mirrored into [`CanvasViewState`] for the HUD and the
//! overlay, and followed by a redraw.

use leptos::prelude::*;

use crate::state::canvas_view::{CanvasViewState, EditOverlay, PENDING_LINK_HINT};
use crate::state::ui::{BoardCommand, UiState};

#[cfg(feature = "csr")]
use std::cell::RefCell;
#[cfg(feature = "csr")]
use std::rc::Rc;

#[cfg(feature = "csr")]
use board::engine::{Action, Engine};
#[cfg(feature = "csr")]
use board::input::{Key, WheelDelta};
#[cfg(feature = "csr")]
use board::storage::{BoardStorage, LocalStorage};
#[cfg(feature = "csr")]
use wasm_bindgen::JsCast;
#[cfg(feature = "csr")]
use wasm_bindgen::closure::Closure;

#[cfg(feature = "csr")]
use crate::util::board_config::read_board_config;
#[cfg(feature = "csr")]
use crate::util::canvas_input::{
    claims_key_default, event_point, event_targets_form_control, is_commit_chord, map_button, map_modifiers,
};
#[cfg(feature = "csr")]
use crate::util::canvas_viewport::{render, sync_viewport};

/// Shared handles used by every event handler.
#[cfg(feature = "csr")]
#[derive(Clone)]
struct Host {
    engine: Rc<RefCell<Option<Engine>>>,
    storage: Rc<RefCell<Option<BoardStorage<LocalStorage>>>>,
    canvas_ref: NodeRef<leptos::html::Canvas>,
    canvas_view: RwSignal<CanvasViewState>,
    draft: RwSignal<String>,
}

#[cfg(feature = "csr")]
impl Host {
    /// Run one engine call and apply its actions. Returns whether the engine
    /// reacted at all.
    fn dispatch(&self, f: impl FnOnce(&mut Engine) -> Vec<Action>) -> bool {
        let Ok(mut guard) = self.engine.try_borrow_mut() else {
            log::warn!("canvas host: engine busy, event dropped");
            return false;
        };
        let Some(engine) = guard.as_mut() else {
            return false;
        };
        let actions = f(engine);
        self.apply(engine, &actions);
        !actions.is_empty()
    }

    fn apply(&self, engine: &mut Engine, actions: &[Action]) {
        if let Some(storage) = self.storage.borrow_mut().as_mut() {
            storage.write_through(actions, engine.doc());
        }

        let mut cursor = self.canvas_view.with_untracked(|v| v.cursor.clone());
        for action in actions {
            match action {
                Action::BackgroundChanged(_) | Action::BoardReset => self.load_background(engine),
                Action::EditTextRequested { text, .. } => self.draft.set(text.clone()),
                Action::SetCursor(next) => cursor.clone_from(next),
                _ => {}
            }
        }

        self.canvas_view.set(CanvasViewState::capture(&engine.core, &cursor));
        if !actions.is_empty() {
            render(engine);
        }
    }

    /// Decode the scene's background into an image element. The scene is
    /// redrawn once the image has loaded.
    fn load_background(&self, engine: &mut Engine) {
        let Some(uri) = engine.doc().background().map(|bg| bg.as_str().to_owned()) else {
            engine.set_background_element(None);
            return;
        };
        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("canvas host: cannot create background image: {e:?}");
                return;
            }
        };

        let shared = Rc::clone(&self.engine);
        let on_load = Closure::once_into_js(move || {
            if let Ok(guard) = shared.try_borrow() {
                if let Some(engine) = guard.as_ref() {
                    render(engine);
                }
            }
        });
        image.set_onload(Some(on_load.unchecked_ref()));
        image.set_src(&uri);
        engine.set_background_element(Some(image));
    }

    fn resize(&self) {
        let Ok(mut guard) = self.engine.try_borrow_mut() else {
            return;
        };
        if let Some(engine) = guard.as_mut() {
            sync_viewport(engine, &self.canvas_ref);
            let cursor = self.canvas_view.with_untracked(|v| v.cursor.clone());
            self.canvas_view.set(CanvasViewState::capture(&engine.core, &cursor));
            render(engine);
        }
    }

    fn commit_draft(&self) {
        let text = self.draft.get_untracked();
        self.dispatch(move |engine| engine.commit_text(text));
    }

    fn run_command(&self, command: BoardCommand) {
        self.dispatch(|engine| match command {
            BoardCommand::AddNote => engine.add_note(),
            BoardCommand::StartConnect => engine.start_connect(),
            BoardCommand::SetBackground(background) => engine.set_background(background),
            BoardCommand::Reset => engine.reset(),
        });
    }
}

/// Canvas host: the board canvas, its HUD and the text-edit overlay.
#[component]
pub fn CanvasHost() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let canvas_view = expect_context::<RwSignal<CanvasViewState>>();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let editor_ref = NodeRef::<leptos::html::Textarea>::new();
    let draft = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let host = Host {
        engine: Rc::new(RefCell::new(None)),
        storage: Rc::new(RefCell::new(None)),
        canvas_ref,
        canvas_view,
        draft,
    };

    // Mount: restore the saved board and draw it.
    #[cfg(feature = "csr")]
    {
        let host = host.clone();
        Effect::new(move || {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if host.engine.borrow().is_some() {
                return;
            }

            let config = read_board_config();
            let storage = match LocalStorage::open() {
                Ok(store) => Some(BoardStorage::new(store, config.storage.clone())),
                Err(e) => {
                    log::warn!("canvas host: board will not persist: {e}");
                    None
                }
            };
            let snapshot = storage.as_ref().map(BoardStorage::load).unwrap_or_default();

            let mut instance = Engine::with_config(canvas, config);
            instance.load_snapshot(snapshot);
            sync_viewport(&mut instance, &canvas_ref);
            host.load_background(&mut instance);
            canvas_view.set(CanvasViewState::capture(&instance.core, "default"));
            render(&instance);

            *host.storage.borrow_mut() = storage;
            *host.engine.borrow_mut() = Some(instance);
        });
    }

    // Drain toolbar and HUD commands.
    #[cfg(feature = "csr")]
    {
        let host = host.clone();
        Effect::new(move || {
            ui.track();
            if host.engine.borrow().is_none() || !ui.with_untracked(UiState::has_pending_commands) {
                return;
            }
            let mut commands = Vec::new();
            ui.update_untracked(|u| commands = u.take_commands());
            for command in commands {
                host.run_command(command);
            }
        });
    }

    // Window-level keyboard shortcuts and resize.
    #[cfg(feature = "csr")]
    {
        let keys = host.clone();
        let _key_down = window_event_listener(leptos::ev::keydown, move |ev: web_sys::KeyboardEvent| {
            if event_targets_form_control(&ev) {
                return;
            }
            let key = Key(ev.key());
            let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
            let mut editing = false;
            let handled = keys.dispatch(|engine| {
                editing = engine.core.editing().is_some();
                engine.on_key_down(&key, modifiers)
            });
            if claims_key_default(&key, handled, editing) {
                ev.prevent_default();
            }
        });

        let keys = host.clone();
        let _key_up = window_event_listener(leptos::ev::keyup, move |ev: web_sys::KeyboardEvent| {
            let key = Key(ev.key());
            let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
            keys.dispatch(|engine| engine.on_key_up(&key, modifiers));
        });

        let resizer = host.clone();
        let _resize = window_event_listener(leptos::ev::resize, move |_ev: web_sys::UiEvent| {
            resizer.resize();
        });
    }

    // Focus the overlay once it is shown for a new note.
    #[cfg(feature = "csr")]
    {
        let editing = Memo::new(move |_| canvas_view.with(|v| v.edit.as_ref().map(|e| e.id.clone())));
        Effect::new(move || {
            if editing.get().is_none() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            // Defer until the overlay's style update has been applied.
            let focus = Closure::once_into_js(move || {
                if let Some(el) = editor_ref.get_untracked() {
                    let _ = el.focus();
                }
            });
            if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(focus.unchecked_ref(), 0) {
                log::warn!("canvas host: cannot focus editor: {e:?}");
            }
        });
    }

    let on_pointer_down = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                ev.prevent_default();
                // Focusing the canvas blurs an open overlay, which commits it
                // before the press is handled.
                if let Some(canvas) = canvas_ref.get() {
                    let _ = canvas.focus();
                    let _ = canvas.set_pointer_capture(ev.pointer_id());
                }
                let point = event_point(&ev);
                let button = map_button(ev.button());
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                host.dispatch(|engine| engine.on_pointer_down(point, button, modifiers));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                let point = event_point(&ev);
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                host.dispatch(|engine| engine.on_pointer_move(point, modifiers));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::PointerEvent| {
                if let Some(canvas) = canvas_ref.get() {
                    let _ = canvas.release_pointer_capture(ev.pointer_id());
                }
                let point = event_point(&ev);
                let button = map_button(ev.button());
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                host.dispatch(|engine| engine.on_pointer_up(point, button, modifiers));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_double_click = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::MouseEvent| {
                if ev.button() != 0 {
                    return;
                }
                let point = event_point(&ev);
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                host.dispatch(|engine| engine.on_double_click(point, modifiers));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_wheel = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::WheelEvent| {
                ev.prevent_default();
                let point = event_point(&ev);
                let delta = WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() };
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                host.dispatch(|engine| engine.on_wheel(point, delta, modifiers));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::WheelEvent| {}
        }
    };

    let on_editor_blur = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |_ev: leptos::ev::FocusEvent| host.commit_draft()
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::FocusEvent| {}
        }
    };

    let on_editor_key = {
        #[cfg(feature = "csr")]
        {
            let host = host.clone();
            move |ev: leptos::ev::KeyboardEvent| {
                let modifiers = map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key());
                if is_commit_chord(&ev.key(), modifiers) {
                    ev.prevent_default();
                    host.commit_draft();
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::KeyboardEvent| {}
        }
    };

    let editor_style = move || {
        canvas_view.with(|v| v.edit.as_ref().map_or_else(|| "display: none;".to_owned(), EditOverlay::style))
    };

    view! {
        <div class="board">
            <canvas
                node_ref=canvas_ref
                class="board__canvas"
                tabindex="0"
                style:cursor=move || canvas_view.with(|v| v.cursor.clone())
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up.clone()
                on:pointercancel=on_pointer_up
                on:dblclick=on_double_click
                on:wheel=on_wheel
            >
                "Your browser does not support canvas."
            </canvas>

            <textarea
                node_ref=editor_ref
                class="note-editor"
                style=editor_style
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
                on:blur=on_editor_blur
                on:keydown=on_editor_key
            ></textarea>

            <div class="hud">
                <button class="btn" on:click=move |_| ui.update(|u| u.issue(BoardCommand::AddNote))>
                    "+ Note"
                </button>
                <button
                    class=move || {
                        if canvas_view.with(CanvasViewState::is_connecting) { "btn btn--active" } else { "btn" }
                    }
                    on:click=move |_| ui.update(|u| u.issue(BoardCommand::StartConnect))
                >
                    "Link"
                </button>
                <Show when=move || canvas_view.with(|v| v.pending_hint().is_some())>
                    <span class="hud__hint hud__hint--pending">{PENDING_LINK_HINT}</span>
                </Show>
                <span class="hud__hint">"Click arrow to select • Delete to remove"</span>
                <span class="hud__zoom">{move || canvas_view.with(CanvasViewState::zoom_label)}</span>
            </div>
        </div>
    }
}
