use thiserror::Error;

/// Review pipeline error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("pose log could not be read: {0}")]
    InputNotFound(String),

    #[error("camera table could not be read: {0}")]
    InvalidCameraTable(String),

    #[error("camera {0}: rotation matrix is not invertible")]
    InvalidCalibration(u8),

    #[error("delta analysis needs at least 2 pose samples, got {0}")]
    InsufficientData(usize),

    #[error("non-finite local statistics in window around delta frame {0}")]
    NumericalInstability(usize),

    #[error("uncertainty signal has zero dynamic range")]
    DegenerateSignal,

    #[error("triangulation needs at least 2 camera observations, got {0}")]
    InsufficientViews(usize),
}

/// Result type for review pipeline operations
pub type ReviewResult<T> = Result<T, ReviewError>;
