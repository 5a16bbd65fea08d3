//! Camera configuration and capture pipeline description.

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Camera configuration.
///
/// Immutable after construction: the values are baked into the pipeline
/// description when the device opens, so changing a config has no effect
/// on an already-open camera.
///
/// All fields have serde defaults, so the struct can be embedded in a host
/// application's TOML/JSON configuration with only the overridden keys
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Output frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Requested sensor frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Sensor capture width in pixels.
    #[serde(default = "default_capture_width")]
    pub capture_width: u32,
    /// Sensor capture height in pixels.
    #[serde(default = "default_capture_height")]
    pub capture_height: u32,
    /// Rotation/flip applied by the video converter (0 = none).
    #[serde(default)]
    pub flip_method: u32,
}

fn default_width() -> u32 {
    224
}

fn default_height() -> u32 {
    224
}

fn default_fps() -> u32 {
    30
}

fn default_capture_width() -> u32 {
    1920
}

fn default_capture_height() -> u32 {
    1080
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            capture_width: default_capture_width(),
            capture_height: default_capture_height(),
            flip_method: 0,
        }
    }
}

impl CameraConfig {
    /// Check that every dimension and the frame rate are nonzero.
    pub fn validate(&self) -> Result<(), CameraError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("fps", self.fps),
            ("capture_width", self.capture_width),
            ("capture_height", self.capture_height),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(CameraError::InvalidConfig(format!(
                    "{} must be nonzero",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Build the GStreamer pipeline description handed to the backend at
    /// open time.
    ///
    /// The sensor is captured at `capture_width` x `capture_height` in NV12,
    /// converted (with the configured flip) and scaled to the output
    /// geometry, and delivered as packed BGR.
    pub fn pipeline(&self) -> String {
        format!(
            "nvarguscamerasrc ! \
             video/x-raw(memory:NVMM), width=(int){}, height=(int){}, \
             format=(string)NV12, framerate=(fraction){}/1 ! \
             nvvidconv flip-method={} ! \
             video/x-raw, width=(int){}, height=(int){}, format=(string)BGRx ! \
             videoconvert ! video/x-raw, format=(string)BGR ! appsink",
            self.capture_width, self.capture_height, self.fps, self.flip_method, self.width,
            self.height
        )
    }
}
