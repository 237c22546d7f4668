use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    EnumerationError(String),
    InitializationError(String),
    ControlError(String),
    StreamError(String),
    CaptureError(String),
    DisplayError(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraError::EnumerationError(msg) => write!(f, "Device enumeration error: {}", msg),
            CameraError::InitializationError(msg) => {
                write!(f, "Camera initialization error: {}", msg)
            }
            CameraError::ControlError(msg) => write!(f, "Camera control error: {}", msg),
            CameraError::StreamError(msg) => write!(f, "Stream error: {}", msg),
            CameraError::CaptureError(msg) => write!(f, "Capture error: {}", msg),
            CameraError::DisplayError(msg) => write!(f, "Display error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
