//! Frame type and geometry conversion.

use std::time::Instant;

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Packed BGR, 3 bytes per pixel, as delivered by the capture pipeline.
    Bgr,
}

/// A single decoded image sample.
///
/// Pixel data is dense and row-major, `width * height * 3` bytes. Every
/// successful read produces a fresh frame; frames are moved into the
/// [`crate::FrameBuffer`], never shared between slots.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: FrameFormat,
    /// When the frame was captured.
    pub timestamp: Instant,
}

impl Frame {
    /// Bytes per pixel (3 for BGR).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Bgr => 3,
        }
    }

    /// A zero-filled frame of the given shape, used as the initial value
    /// of a frame buffer before any capture has completed.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * 3],
            width,
            height,
            format: FrameFormat::Bgr,
            timestamp: Instant::now(),
        }
    }

    /// Whether every byte is zero, i.e. the frame is indistinguishable from
    /// the initial buffer value.
    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

/// Scale a frame to the given shape with nearest-neighbour sampling.
///
/// Returns the input unchanged when the shape already matches. This is the
/// single geometry-conversion step applied between the backend and the
/// frame buffer; anything fancier belongs downstream.
pub fn resize(frame: Frame, width: u32, height: u32) -> Frame {
    if frame.width == width && frame.height == height {
        return frame;
    }

    let bpp = frame.bytes_per_pixel();
    let src_w = frame.width as usize;
    let dst_w = width as usize;
    let dst_h = height as usize;
    let mut data = Vec::with_capacity(dst_w * dst_h * bpp);

    for y in 0..dst_h {
        let src_y = y * frame.height as usize / dst_h;
        let row = src_y * src_w * bpp;
        for x in 0..dst_w {
            let src_x = x * src_w / dst_w;
            let px = row + src_x * bpp;
            data.extend_from_slice(&frame.data[px..px + bpp]);
        }
    }

    Frame {
        data,
        width,
        height,
        format: frame.format,
        timestamp: frame.timestamp,
    }
}
