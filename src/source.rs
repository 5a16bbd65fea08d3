//! Video backend seam.
//!
//! The capture core treats the hardware pipeline as an opaque source with
//! `open`, `read_frame`, and `release`. Format negotiation, colour-space
//! conversion, and frame decoding all live behind this trait; the crate
//! ships [`PatternSource`] so the capture machinery can run (and be tested)
//! without a camera attached.

use std::time::{Duration, Instant};

use crate::error::CameraError;
use crate::frame::{Frame, FrameFormat};

/// A capture backend that yields raw frames for a pipeline description.
///
/// Implementations must be [`Send`]: the source travels into the background
/// capture thread on `start()` and back out on `stop()`.
pub trait VideoSource: Send {
    /// Initialize the capture session for the given pipeline description.
    fn open(&mut self, pipeline: &str) -> Result<(), CameraError>;

    /// Block until one frame is available and return it.
    ///
    /// The frame may be at sensor resolution; the device handle scales it
    /// to the configured output shape.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Whether the session is currently open.
    fn is_open(&self) -> bool;

    /// Relinquish backend resources. Idempotent; safe when never opened.
    fn release(&mut self);
}

/// Synthetic backend producing a moving gradient at sensor resolution.
///
/// Pixels are always nonzero, so anything downstream can tell a pattern
/// frame from the initial zero-filled buffer. Reads are paced to the
/// configured frame rate to behave like real hardware.
pub struct PatternSource {
    width: u32,
    height: u32,
    frame_interval: Duration,
    open: bool,
    tick: u64,
}

impl PatternSource {
    /// Create a source emitting `width` x `height` frames at roughly `fps`.
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            frame_interval: Duration::from_secs(1) / fps.max(1),
            open: false,
            tick: 0,
        }
    }
}

impl VideoSource for PatternSource {
    fn open(&mut self, _pipeline: &str) -> Result<(), CameraError> {
        self.open = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        std::thread::sleep(self.frame_interval);
        self.tick += 1;

        let w = self.width as usize;
        let h = self.height as usize;
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                // Diagonal gradient drifting one step per frame; +1 keeps
                // every byte nonzero.
                let v = ((x + y + self.tick as usize) % 255 + 1) as u8;
                data.extend_from_slice(&[v, v.wrapping_add(85), v.wrapping_add(170)]);
            }
        }

        Ok(Frame {
            data,
            width: self.width,
            height: self.height,
            format: FrameFormat::Bgr,
            timestamp: Instant::now(),
        })
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn release(&mut self) {
        self.open = false;
    }
}
