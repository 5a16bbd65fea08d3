//! Error types for camera operations.

/// Errors that can occur while configuring, opening, or reading a camera.
///
/// Construction-time and direct-read errors propagate synchronously.
/// Errors raised inside the background capture thread are stored in the
/// camera's last-error slot and surfaced by [`crate::Camera::stop`];
/// `Clone` lets callers peek at that slot without draining it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CameraError {
    /// A configuration value is out of range (all dimensions and the
    /// frame rate must be nonzero).
    #[error("invalid camera configuration: {0}")]
    InvalidConfig(String),

    /// The backend could not open a capture session for the pipeline.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),

    /// The backend produced no frame for a single read attempt.
    #[error("failed to capture frame: {0}")]
    ReadFailed(String),

    /// The device was released (or never opened) and cannot serve reads.
    #[error("camera is not open")]
    NotOpen,

    /// An operation is not allowed in the current capture state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}
