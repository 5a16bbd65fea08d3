//! End-to-end tests for camera capture.
//!
//! These run against the built-in pattern source, so they exercise the full
//! open / read / start / stop / shutdown lifecycle without camera hardware.

use csicam::{Camera, CameraConfig, CameraError, PatternSource};
use std::thread;
use std::time::{Duration, Instant};

fn open_camera(config: CameraConfig) -> Camera {
    let source = Box::new(PatternSource::new(
        config.capture_width,
        config.capture_height,
        config.fps,
    ));
    Camera::open(config, source).expect("camera should open on the pattern source")
}

fn small_config() -> CameraConfig {
    CameraConfig {
        width: 64,
        height: 48,
        fps: 120,
        capture_width: 128,
        capture_height: 96,
        flip_method: 0,
    }
}

/// Single-shot read, then a full capture cycle, then single-shot again.
#[test]
fn test_read_capture_read_cycle() {
    let camera = open_camera(small_config());

    let frame = camera.read().expect("idle read should succeed");
    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 48);
    assert_eq!(frame.data.len(), 64 * 48 * 3);

    camera.start().expect("start should succeed");
    assert!(camera.running());
    thread::sleep(Duration::from_millis(100));
    camera.stop().expect("stop should succeed");
    assert!(!camera.running());

    let frame = camera.read().expect("read after stop should succeed");
    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 48);
    assert_eq!(frame.data.len(), 64 * 48 * 3);
}

/// The buffer leaves its zero-filled initial state within a bounded window.
#[test]
fn test_continuous_capture_liveness() {
    let camera = open_camera(small_config());
    assert!(camera.value().is_zeroed());

    camera.start().expect("start should succeed");

    let deadline = Instant::now() + Duration::from_secs(2);
    while camera.frames() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    assert!(
        camera.frames() > 0,
        "no frame captured within the liveness window"
    );
    assert!(!camera.value().is_zeroed());
    camera.stop().expect("stop should succeed");
}

/// Frames keep arriving while capturing; `value()` never blocks.
#[test]
fn test_capture_rate_progresses() {
    let camera = open_camera(small_config());
    camera.start().expect("start should succeed");

    let deadline = Instant::now() + Duration::from_secs(2);
    while camera.frames() < 5 && Instant::now() < deadline {
        let _ = camera.value();
        thread::sleep(Duration::from_millis(5));
    }
    camera.stop().expect("stop should succeed");

    assert!(
        camera.frames() >= 5,
        "expected at least 5 frames, got {}",
        camera.frames()
    );
}

/// Direct reads are rejected while the capture thread owns the device.
#[test]
fn test_direct_read_rejected_while_capturing() {
    let camera = open_camera(small_config());
    camera.start().expect("start should succeed");

    match camera.read() {
        Err(CameraError::InvalidState(_)) => {}
        other => panic!("Expected InvalidState, got {:?}", other.map(|_| ())),
    }

    camera.stop().expect("stop should succeed");
}

/// Repeated shutdown calls converge on the same released end state.
#[test]
fn test_shutdown_idempotent_end_to_end() {
    let camera = open_camera(small_config());
    camera.start().expect("start should succeed");
    thread::sleep(Duration::from_millis(50));

    for _ in 0..3 {
        camera.shutdown();
        assert!(!camera.running());
    }
    assert!(matches!(camera.read(), Err(CameraError::NotOpen)));
}

/// Dropping the camera mid-capture must not hang or panic.
#[test]
fn test_drop_while_capturing() {
    let camera = open_camera(small_config());
    camera.start().expect("start should succeed");
    thread::sleep(Duration::from_millis(50));
    drop(camera);
}

/// Defaults match the documented construction parameters.
#[test]
fn test_default_construction_parameters() {
    let config = CameraConfig::default();
    assert_eq!(
        (config.width, config.height, config.fps),
        (224, 224, 30)
    );
    assert_eq!(
        (config.capture_width, config.capture_height),
        (1920, 1080)
    );

    let camera = open_camera(config);
    let frame = camera.value();
    assert_eq!(frame.data.len(), 224 * 224 * 3);
}
