//! csicam: a camera's video stream as a continuously updated in-memory
//! frame buffer.
//!
//! The crate is built around a small capture state machine. A [`Camera`]
//! is either Idle, where [`Camera::read`] performs a single blocking
//! device read, or Capturing, where a dedicated background thread keeps
//! the latest frame available through [`Camera::value`] without the caller
//! managing acquisition timing. The hardware pipeline sits behind the
//! [`VideoSource`] trait; [`PatternSource`] is a built-in synthetic
//! backend for machines without a camera.
//!
//! ```no_run
//! use csicam::{Camera, CameraConfig, PatternSource};
//!
//! # fn main() -> Result<(), csicam::CameraError> {
//! let config = CameraConfig { width: 64, height: 48, ..CameraConfig::default() };
//! let source = Box::new(PatternSource::new(config.capture_width, config.capture_height, config.fps));
//! let camera = Camera::open(config, source)?;
//!
//! let frame = camera.read()?; // single-shot, Idle mode
//!
//! camera.start()?; // continuous capture
//! let latest = camera.value(); // never blocks
//! camera.stop()?; // joins the capture thread
//! camera.shutdown();
//! # Ok(())
//! # }
//! ```

mod buffer;
mod camera;
mod config;
mod device;
mod error;
mod frame;
mod lifecycle;
mod source;
mod worker;

pub use buffer::FrameBuffer;
pub use camera::Camera;
pub use config::CameraConfig;
pub use device::CaptureDevice;
pub use error::CameraError;
pub use frame::{resize, Frame, FrameFormat};
pub use source::{PatternSource, VideoSource};
