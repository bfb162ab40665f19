//! Root application component and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::canvas_host::CanvasHost;
use crate::components::toolbar::Toolbar;
use crate::components::webcam_capture::WebcamCapture;
use crate::state::canvas_view::CanvasViewState;
use crate::state::ui::UiState;

/// Root application component.
///
/// Provides the shared UI and canvas-view signals, then lays out the toolbar,
/// the board and, while open, the webcam dialog.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ui = RwSignal::new(UiState::default());
    let canvas_view = RwSignal::new(CanvasViewState::default());

    provide_context(ui);
    provide_context(canvas_view);

    view! {
        <Title text="Sticky Digitizer"/>

        <main class="app">
            <Toolbar/>
            <CanvasHost/>
            <Show when=move || ui.with(|u| u.webcam_open)>
                <WebcamCapture/>
            </Show>
        </main>
    }
}
