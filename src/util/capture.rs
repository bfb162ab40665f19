//! Background capture: image files via `FileReader` and webcam frames via
//! `getUserMedia`.
//!
//! Both paths end in a `data:image/...` URI that becomes the board's
//! [`BackgroundImage`]. The browser halves are `csr`-only; the error type and
//! URI validation are plain Rust.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use board::doc::BackgroundImage;

use crate::state::ui::WEBCAM_ERROR;

/// Error returned by the capture paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// Camera access was denied or no camera exists.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("failed to read file: {0}")]
    ReadFailed(String),
    /// The file or frame did not produce an image data URI.
    #[error("not an image")]
    NotAnImage,
    /// The video element has no decoded frame yet.
    #[error("camera has not produced a frame yet")]
    NoFrame,
    #[error("browser call failed: {0}")]
    Js(String),
}

impl CaptureError {
    /// Text shown to the user in the webcam dialog.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CameraUnavailable(_) => WEBCAM_ERROR,
            Self::NoFrame => "The camera is still starting. Try again in a moment.",
            Self::ReadFailed(_) | Self::NotAnImage | Self::Js(_) => "Could not capture an image.",
        }
    }
}

/// Accept a data URI as a background if it holds an image.
///
/// # Errors
///
/// Returns [`CaptureError::NotAnImage`] for anything but `data:image/...`.
pub fn to_background(uri: String) -> Result<BackgroundImage, CaptureError> {
    BackgroundImage::from_data_uri(uri).map_err(|_| CaptureError::NotAnImage)
}

#[cfg(feature = "csr")]
pub use browser::{attach_stream, read_file_as_data_url, request_camera, snapshot, stop_stream};

#[cfg(feature = "csr")]
mod browser {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, File, FileReader, HtmlCanvasElement, HtmlVideoElement, MediaStream,
        MediaStreamConstraints, MediaStreamTrack,
    };

    use super::CaptureError;

    fn js_message(value: &JsValue) -> String {
        value
            .as_string()
            .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
            .unwrap_or_else(|| format!("{value:?}"))
    }

    fn js_error(value: JsValue) -> CaptureError {
        CaptureError::Js(js_message(&value))
    }

    fn unavailable(value: JsValue) -> CaptureError {
        CaptureError::CameraUnavailable(js_message(&value))
    }

    fn read_failed(value: JsValue) -> CaptureError {
        CaptureError::ReadFailed(js_message(&value))
    }

    /// Read a file into a data URI.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::ReadFailed`] if the reader errors or yields no string.
    pub async fn read_file_as_data_url(file: &File) -> Result<String, CaptureError> {
        let reader = FileReader::new().map_err(read_failed)?;
        let done = js_sys::Promise::new(&mut |resolve, reject| {
            reader.set_onload(Some(&resolve));
            reader.set_onerror(Some(&reject));
        });
        reader.read_as_data_url(file).map_err(read_failed)?;
        JsFuture::from(done).await.map_err(read_failed)?;

        reader
            .result()
            .map_err(read_failed)?
            .as_string()
            .ok_or_else(|| CaptureError::ReadFailed("reader produced no text".to_owned()))
    }

    /// Ask for video-only camera access.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CameraUnavailable`] when access is denied or
    /// the browser has no media devices.
    pub async fn request_camera() -> Result<MediaStream, CaptureError> {
        let window =
            web_sys::window().ok_or_else(|| CaptureError::CameraUnavailable("no window".to_owned()))?;
        let devices = window.navigator().media_devices().map_err(unavailable)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices.get_user_media_with_constraints(&constraints).map_err(unavailable)?;
        let stream = JsFuture::from(promise).await.map_err(unavailable)?;
        stream.dyn_into::<MediaStream>().map_err(unavailable)
    }

    /// Show a stream in a video element and start playback.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Js`] if playback can't start.
    pub async fn attach_stream(video: &HtmlVideoElement, stream: &MediaStream) -> Result<(), CaptureError> {
        video.set_muted(true);
        video.set_src_object(Some(stream));
        let playing = video.play().map_err(js_error)?;
        JsFuture::from(playing).await.map_err(js_error)?;
        Ok(())
    }

    /// Stop every track so the camera light goes off.
    pub fn stop_stream(stream: &MediaStream) {
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }

    /// Rasterize the current video frame at native resolution to a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoFrame`] before the first frame is decoded and
    /// [`CaptureError::Js`] if an offscreen canvas can't be used.
    pub fn snapshot(video: &HtmlVideoElement) -> Result<String, CaptureError> {
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(CaptureError::NoFrame);
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CaptureError::Js("no document".to_owned()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CaptureError::Js("created element is not a canvas".to_owned()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| CaptureError::Js("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CaptureError::Js("context is not 2d".to_owned()))?;
        ctx.draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        )
        .map_err(js_error)?;

        canvas.to_data_url_with_type("image/png").map_err(js_error)
    }
}
