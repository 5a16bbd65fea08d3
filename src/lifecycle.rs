//! Process-exit cleanup for open cameras.
//!
//! Dropping a [`crate::Camera`] already stops capture and releases the
//! device, which covers normal scope exit. This module covers the abnormal
//! path: every camera registers itself here at open time, and the first
//! registration installs a Ctrl+C handler that force-releases whatever is
//! still alive before the process exits. The hook is best-effort: it must
//! never panic or abort the exit sequence, whatever state the cameras are
//! in.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use crate::camera::Shared;

static REGISTRY: Mutex<Vec<Weak<Shared>>> = Mutex::new(Vec::new());
static EXIT_HOOK: OnceLock<()> = OnceLock::new();

/// Register a camera for forced release on Ctrl+C.
///
/// Holds only a weak handle, so a camera that is dropped (and thus already
/// cleaned up by `Drop`) is skipped by the hook.
pub(crate) fn register(shared: &Arc<Shared>) {
    {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.retain(|weak| weak.strong_count() > 0);
        registry.push(Arc::downgrade(shared));
    }

    EXIT_HOOK.get_or_init(|| {
        // The process may already own a signal handler; a camera library
        // should not fight it, so failure here is logged and tolerated.
        let result = ctrlc::set_handler(|| {
            release_registered();
            std::process::exit(130);
        });
        if let Err(e) = result {
            log::warn!("camera exit hook not installed: {}", e);
        }
    });
}

/// Shut down every still-live registered camera.
fn release_registered() {
    let entries = {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *registry)
    };
    release_entries(entries);
}

fn release_entries(entries: Vec<Weak<Shared>>) {
    for weak in entries {
        if let Some(shared) = weak.upgrade() {
            shared.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::error::CameraError;
    use crate::source::PatternSource;
    use crate::Camera;

    fn open_camera() -> Camera {
        let config = CameraConfig {
            width: 8,
            height: 6,
            fps: 500,
            capture_width: 16,
            capture_height: 12,
            flip_method: 0,
        };
        let source = Box::new(PatternSource::new(16, 12, 500));
        Camera::open(config, source).unwrap()
    }

    #[test]
    fn test_release_entries_shuts_down_live_cameras() {
        let camera = open_camera();
        camera.start().unwrap();

        release_entries(vec![camera.shared_weak()]);

        assert!(!camera.running());
        assert!(matches!(camera.read(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_release_entries_skips_dropped_cameras() {
        let weak = {
            let camera = open_camera();
            camera.shared_weak()
        };
        // Must not panic on an already-dropped entry.
        release_entries(vec![weak]);
    }

    #[test]
    fn test_release_entries_safe_after_shutdown() {
        let camera = open_camera();
        camera.shutdown();
        release_entries(vec![camera.shared_weak()]);
        assert!(!camera.running());
    }
}
