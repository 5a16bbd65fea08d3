//! Camera handle and capture state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::buffer::FrameBuffer;
use crate::config::CameraConfig;
use crate::device::CaptureDevice;
use crate::error::CameraError;
use crate::frame::Frame;
use crate::lifecycle;
use crate::source::VideoSource;
use crate::worker::run_capture_loop;

/// State shared between the camera handle, the capture thread, and the
/// process-exit hook.
pub(crate) struct Shared {
    pub(crate) config: CameraConfig,
    pub(crate) buffer: FrameBuffer,
    /// The Idle/Capturing flag. Set by the controller on start/stop,
    /// cleared by the worker when a read fails.
    pub(crate) running: AtomicBool,
    /// Terminal error from the capture thread, surfaced by `stop()`.
    pub(crate) last_error: Mutex<Option<CameraError>>,
    control: Mutex<Control>,
}

/// Controller bookkeeping. The device lives here while Idle and travels
/// into the capture thread while Capturing; the two `Option`s are never
/// both `Some`.
struct Control {
    device: Option<CaptureDevice>,
    worker: Option<JoinHandle<CaptureDevice>>,
}

/// A camera exposed as a continuously updated latest-frame buffer.
///
/// Two read modes, mutually exclusive by state:
///
/// * **Idle** (initial): [`read`](Camera::read) performs one blocking
///   device read and returns the frame.
/// * **Capturing**: after [`start`](Camera::start), a background thread
///   repeatedly reads the device and republishes into the frame buffer;
///   [`value`](Camera::value) returns the latest frame without blocking.
///
/// [`stop`](Camera::stop) joins the capture thread before returning, so a
/// `read` issued after `stop` never races with a still-running worker.
/// Dropping the camera (or a Ctrl+C with the exit hook installed) stops
/// capture and releases the device.
pub struct Camera {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("config", &self.shared.config)
            .field("running", &self.running())
            .finish_non_exhaustive()
    }
}

impl Camera {
    /// Open a camera on the given backend source.
    ///
    /// Builds the pipeline description from `config`, opens the backend,
    /// initializes the frame buffer to a zero-filled `height` x `width`
    /// frame, and registers the process-exit hook for this instance.
    ///
    /// # Errors
    /// * `CameraError::InvalidConfig` - a dimension or the frame rate is zero
    /// * `CameraError::OpenFailed` - the backend could not be initialized
    pub fn open(config: CameraConfig, source: Box<dyn VideoSource>) -> Result<Self, CameraError> {
        let device = CaptureDevice::open(config.clone(), source)?;
        let buffer = FrameBuffer::new(config.width, config.height);
        let shared = Arc::new(Shared {
            config,
            buffer,
            running: AtomicBool::new(false),
            last_error: Mutex::new(None),
            control: Mutex::new(Control {
                device: Some(device),
                worker: None,
            }),
        });
        lifecycle::register(&shared);
        Ok(Self { shared })
    }

    /// Perform one synchronous read and publish the frame to the buffer.
    ///
    /// Valid only while Idle; direct reads and continuous capture share
    /// the device, so this fails without side effects while Capturing.
    ///
    /// # Errors
    /// * `CameraError::InvalidState` - continuous capture is running
    /// * `CameraError::NotOpen` - the device was released
    /// * `CameraError::ReadFailed` - the backend produced no frame
    pub fn read(&self) -> Result<Frame, CameraError> {
        let mut control = self.shared.lock_control();
        if self.shared.running.load(Ordering::SeqCst) {
            return Err(CameraError::InvalidState(
                "cannot read directly while capturing",
            ));
        }
        self.shared.reap_worker(&mut control);

        let device = control.device.as_mut().ok_or(CameraError::NotOpen)?;
        let frame = device.read_frame()?;
        self.shared.buffer.set(frame.clone());
        Ok(frame)
    }

    /// Begin continuous capture on a background thread.
    ///
    /// Returns as soon as the thread is spawned, without waiting for the
    /// first frame. Calling `start` while already Capturing is a no-op:
    /// state transitions only on an actual edge, so no second thread is
    /// ever spawned.
    ///
    /// # Errors
    /// * `CameraError::NotOpen` - the device was released
    pub fn start(&self) -> Result<(), CameraError> {
        let mut control = self.shared.lock_control();
        if self.shared.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.shared.reap_worker(&mut control);

        let device = control.device.take().ok_or(CameraError::NotOpen)?;
        if !device.is_open() {
            control.device = Some(device);
            return Err(CameraError::NotOpen);
        }

        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        control.worker = Some(std::thread::spawn(move || {
            run_capture_loop(device, shared)
        }));
        Ok(())
    }

    /// Stop continuous capture and wait for the worker to exit.
    ///
    /// Blocks until the capture thread has observed the stop request and
    /// finished its in-flight read; once `stop` returns, no worker is
    /// alive. A no-op while Idle.
    ///
    /// # Errors
    /// Returns (and clears) the terminal error if the capture thread died
    /// on a failed read since the last inspection.
    pub fn stop(&self) -> Result<(), CameraError> {
        let mut control = self.shared.lock_control();
        self.shared.request_stop(&mut control);
        match self.shared.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether continuous capture is active.
    ///
    /// Turns false on `stop()` and also when the capture thread terminates
    /// on a read failure (see [`last_error`](Camera::last_error)).
    pub fn running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The latest complete frame. Never blocks on the capture thread.
    pub fn value(&self) -> Frame {
        self.shared.buffer.get()
    }

    /// Number of frames published to the buffer since construction.
    pub fn frames(&self) -> u64 {
        self.shared.buffer.seq()
    }

    /// Register a callback invoked with each newly captured frame.
    pub fn observe<F>(&self, callback: F)
    where
        F: Fn(&Frame) + Send + 'static,
    {
        self.shared.buffer.observe(callback);
    }

    /// Peek at the terminal capture-thread error, if any, without
    /// clearing it.
    pub fn last_error(&self) -> Option<CameraError> {
        self.shared
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The configuration this camera was opened with.
    pub fn config(&self) -> &CameraConfig {
        &self.shared.config
    }

    /// Stop capture and release the device.
    ///
    /// Idempotent and infallible: this can run during process teardown,
    /// so failures are logged and swallowed rather than surfaced.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    #[cfg(test)]
    pub(crate) fn shared_weak(&self) -> std::sync::Weak<Shared> {
        Arc::downgrade(&self.shared)
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join a worker that already exited (read failure) and recover the
    /// device so Idle-mode reads and restarts can proceed.
    fn reap_worker(&self, control: &mut Control) {
        if !self.running.load(Ordering::SeqCst) {
            if let Some(handle) = control.worker.take() {
                match handle.join() {
                    Ok(device) => control.device = Some(device),
                    Err(_) => log::error!("capture thread panicked; device lost"),
                }
            }
        }
    }

    /// Clear the running flag and join the worker. The caller holds the
    /// control lock, so no new worker can appear in between.
    fn request_stop(&self, control: &mut Control) {
        self.running.store(false, Ordering::SeqCst);
        self.reap_worker(control);
    }

    fn take_error(&self) -> Option<CameraError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) fn shutdown(&self) {
        let mut control = self.lock_control();
        self.request_stop(&mut control);
        if let Some(e) = self.take_error() {
            log::warn!("capture stopped with error during shutdown: {}", e);
        }
        if let Some(device) = control.device.as_mut() {
            device.release();
        }
    }
}
