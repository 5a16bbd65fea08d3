//! Device handle: owns the backend session and normalizes its frames.

use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::frame::{resize, Frame};
use crate::source::VideoSource;

/// An open capture session.
///
/// Wraps a [`VideoSource`] together with the configuration it was opened
/// with. Every frame leaving the handle has the configured output shape,
/// regardless of the geometry the backend delivers.
///
/// The handle is owned by exactly one thread at a time: the controller
/// moves it into the capture thread on `start()` and recovers it through
/// the join handle on `stop()`, so no lock guards the read path.
pub struct CaptureDevice {
    source: Box<dyn VideoSource>,
    config: CameraConfig,
}

impl CaptureDevice {
    /// Validate the configuration and open a capture session on `source`.
    ///
    /// # Errors
    /// * `CameraError::InvalidConfig` - a dimension or the frame rate is zero
    /// * `CameraError::OpenFailed` - the backend rejected the pipeline
    pub fn open(
        config: CameraConfig,
        mut source: Box<dyn VideoSource>,
    ) -> Result<Self, CameraError> {
        config.validate()?;
        source.open(&config.pipeline())?;
        Ok(Self { source, config })
    }

    /// Block until one frame is available, scaled to the output shape.
    ///
    /// # Errors
    /// * `CameraError::NotOpen` - called after `release()`
    /// * `CameraError::ReadFailed` - the backend produced no frame
    pub fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.source.is_open() {
            return Err(CameraError::NotOpen);
        }
        let raw = self.source.read_frame()?;
        Ok(resize(raw, self.config.width, self.config.height))
    }

    /// Relinquish backend resources. Idempotent.
    pub fn release(&mut self) {
        self.source.release();
    }

    /// Whether the backend session is still open.
    pub fn is_open(&self) -> bool {
        self.source.is_open()
    }

    /// The configuration this device was opened with.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}
