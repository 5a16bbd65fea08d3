//! Background capture loop.

use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError};

use crate::camera::Shared;
use crate::device::CaptureDevice;
use crate::error::CameraError;

/// Run the continuous-capture loop until the running flag clears or a read
/// fails.
///
/// The device is owned by this thread for the duration of the loop and
/// handed back through the join handle, so the controller regains exclusive
/// access the moment `join` returns.
///
/// A read failure is terminal for the loop: the error goes into the shared
/// last-error slot, the running flag is cleared (the camera is Idle again
/// from the caller's perspective), and the thread exits. The controller
/// surfaces the stored error on the next `stop()`.
pub(crate) fn run_capture_loop(mut device: CaptureDevice, shared: Arc<Shared>) -> CaptureDevice {
    while shared.running.load(Ordering::SeqCst) {
        match device.read_frame() {
            Ok(frame) => shared.buffer.set(frame),
            Err(e) => {
                log::error!("capture loop terminated: {}", e);
                store_error(&shared, e);
                shared.running.store(false, Ordering::SeqCst);
                break;
            }
        }
    }
    device
}

fn store_error(shared: &Shared, error: CameraError) {
    let mut slot = shared
        .last_error
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = Some(error);
}
