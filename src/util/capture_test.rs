use super::*;

#[test]
fn image_data_uri_becomes_background() {
    let bg = to_background("data:image/png;base64,iVBORw0KGgo=".to_owned()).unwrap();
    assert_eq!(bg.as_str(), "data:image/png;base64,iVBORw0KGgo=");
}

#[test]
fn non_image_data_uri_is_rejected() {
    assert_eq!(
        to_background("data:application/pdf;base64,JVBERi0=".to_owned()),
        Err(CaptureError::NotAnImage)
    );
    assert_eq!(to_background(String::new()), Err(CaptureError::NotAnImage));
}

#[test]
fn camera_failure_shows_permission_hint() {
    let err = CaptureError::CameraUnavailable("NotAllowedError".to_owned());
    assert_eq!(err.user_message(), "Could not access webcam. Please allow camera permissions.");
    assert_eq!(err.to_string(), "camera unavailable: NotAllowedError");
}

#[test]
fn other_failures_have_generic_message() {
    assert_eq!(CaptureError::NotAnImage.user_message(), "Could not capture an image.");
    assert_ne!(CaptureError::NoFrame.user_message(), CaptureError::NotAnImage.user_message());
}
