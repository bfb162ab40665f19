//! Webcam snapshot dialog.
//!
//! Mounted while `UiState::webcam_open` is set. Camera access is requested on
//! mount; the stream is stopped when the dialog is cancelled, after a capture,
//! or when a grant arrives for a dialog that has already been closed.

use leptos::prelude::*;

use crate::state::ui::UiState;

#[cfg(feature = "csr")]
use std::cell::RefCell;
#[cfg(feature = "csr")]
use std::rc::Rc;

#[cfg(feature = "csr")]
use web_sys::MediaStream;

#[cfg(feature = "csr")]
use crate::state::ui::BoardCommand;
#[cfg(feature = "csr")]
use crate::util::capture::{CaptureError, attach_stream, request_camera, snapshot, stop_stream, to_background};

#[cfg(feature = "csr")]
fn release(stream: &Rc<RefCell<Option<MediaStream>>>) {
    if let Some(stream) = stream.borrow_mut().take() {
        stop_stream(&stream);
    }
}

/// Modal with a live camera preview and Cancel / Capture buttons.
#[component]
pub fn WebcamCapture() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let video_ref = NodeRef::<leptos::html::Video>::new();

    #[cfg(feature = "csr")]
    let stream = Rc::new(RefCell::new(None::<MediaStream>));

    #[cfg(feature = "csr")]
    {
        let stream = Rc::clone(&stream);
        let session = ui.with_untracked(|u| u.webcam_session);
        leptos::task::spawn_local(async move {
            let media = match request_camera().await {
                Ok(media) => media,
                Err(e) => {
                    log::warn!("webcam: {e}");
                    ui.update(|u| {
                        if u.is_live_session(session) {
                            u.capture_error = Some(e.user_message().to_owned());
                        }
                    });
                    return;
                }
            };

            let live = ui.try_with_untracked(|u| u.is_live_session(session)).unwrap_or(false);
            let Some(video) = video_ref.get_untracked().filter(|_| live) else {
                // The dialog closed while the permission prompt was up.
                stop_stream(&media);
                return;
            };
            *stream.borrow_mut() = Some(media.clone());
            if let Err(e) = attach_stream(&video, &media).await {
                log::warn!("webcam: preview failed: {e}");
            }
        });
    }

    let on_cancel = {
        #[cfg(feature = "csr")]
        {
            let stream = Rc::clone(&stream);
            move |_| {
                release(&stream);
                ui.update(UiState::close_webcam);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_| ui.update(UiState::close_webcam)
        }
    };

    let on_capture = {
        #[cfg(feature = "csr")]
        {
            move |_| {
                let Some(video) = video_ref.get_untracked() else {
                    return;
                };
                match snapshot(&video).and_then(to_background) {
                    Ok(image) => {
                        release(&stream);
                        ui.update(|u| {
                            u.issue(BoardCommand::SetBackground(Some(image)));
                            u.close_webcam();
                        });
                    }
                    // Keep the dialog open; the next frame may work.
                    Err(CaptureError::NoFrame) => log::debug!("webcam: no frame yet"),
                    Err(e) => {
                        log::warn!("webcam: capture failed: {e}");
                        ui.update(|u| u.capture_error = Some(e.user_message().to_owned()));
                    }
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_| {}
        }
    };

    let capture_error = move || ui.with(|u| u.capture_error.clone());

    view! {
        <div class="dialog-backdrop">
            <div class="dialog" role="dialog" aria-label="Webcam Snapshot">
                <h2 class="dialog__title">"Webcam Snapshot"</h2>
                <video node_ref=video_ref class="dialog__preview" autoplay=true muted=true></video>
                <Show when=move || capture_error().is_some()>
                    <p class="dialog__error">{capture_error}</p>
                </Show>
                <div class="dialog__actions">
                    <button class="btn" on:click=on_cancel>
                        "Cancel"
                    </button>
                    <button
                        class="btn btn--primary"
                        disabled=move || capture_error().is_some()
                        on:click=on_capture
                    >
                        "Capture"
                    </button>
                </div>
            </div>
        </div>
    }
}
