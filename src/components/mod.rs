pub mod canvas_host;
pub mod toolbar;
pub mod webcam_capture;
