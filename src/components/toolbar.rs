//! Top toolbar: background sources, board reset and the shortcut tip.

use leptos::prelude::*;

use crate::state::ui::{BoardCommand, UiState};
#[cfg(feature = "csr")]
use crate::util::capture::{read_file_as_data_url, to_background};

/// Keyboard and mouse cheat sheet shown under the title.
pub const SHORTCUT_TIP: &str =
    "Space to pan • Scroll to zoom • Double-click note to edit • Ctrl/Cmd + N add note • Delete removes";

/// Toolbar with upload, webcam, clear-background and reset controls.
///
/// Buttons only queue [`BoardCommand`]s; the canvas host applies them.
#[component]
pub fn Toolbar() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let file_ref = NodeRef::<leptos::html::Input>::new();

    let on_upload = move |_| {
        if let Some(input) = file_ref.get() {
            input.click();
        }
    };

    let on_file_change = {
        #[cfg(feature = "csr")]
        {
            move |_ev: leptos::ev::Event| {
                let Some(input) = file_ref.get() else {
                    return;
                };
                let Some(file) = input.files().and_then(|files| files.get(0)) else {
                    return;
                };
                // Clear so picking the same file again still fires `change`.
                input.set_value("");
                leptos::task::spawn_local(async move {
                    match read_file_as_data_url(&file).await.and_then(to_background) {
                        Ok(image) => ui.update(|u| u.issue(BoardCommand::SetBackground(Some(image)))),
                        Err(e) => log::warn!("background upload rejected: {e}"),
                    }
                });
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::Event| {}
        }
    };

    let on_webcam = move |_| {
        ui.update(|u| {
            u.open_webcam();
        });
    };

    let on_clear_background = move |_| {
        ui.update(|u| u.issue(BoardCommand::SetBackground(None)));
    };

    let on_reset = move |_| {
        ui.update(|u| u.issue(BoardCommand::Reset));
    };

    view! {
        <header class="toolbar">
            <div class="toolbar__title">
                <h1>"Sticky Digitizer"</h1>
                <p class="toolbar__tip">{SHORTCUT_TIP}</p>
            </div>

            <span class="toolbar__spacer"></span>

            <input
                node_ref=file_ref
                class="toolbar__file"
                type="file"
                accept="image/*"
                on:change=on_file_change
            />
            <button class="btn" on:click=on_upload title="Use an image file as the board background">
                "Upload Image"
            </button>
            <button class="btn" on:click=on_webcam title="Use a webcam snapshot as the board background">
                "Webcam Snapshot"
            </button>
            <button class="btn" on:click=on_clear_background title="Remove the background image">
                "Clear BG"
            </button>
            <button class="btn btn--danger" on:click=on_reset title="Restore the starter notes and clear everything else">
                "Reset Board"
            </button>
        </header>
    }
}
