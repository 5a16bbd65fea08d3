//! Shared latest-frame buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::frame::Frame;

type Observer = Box<dyn Fn(&Frame) + Send>;

/// The externally visible "current frame".
///
/// Holds exactly one frame, initialized to a zero-filled buffer of the
/// configured shape. `set` and `get` are safe to call from different
/// threads: a reader always sees a complete frame, either the old one or
/// the new one, never a mix. No history is retained.
///
/// Cloning the buffer clones the handle, not the frame; all clones share
/// one slot.
#[derive(Clone)]
pub struct FrameBuffer {
    inner: Arc<Inner>,
}

struct Inner {
    slot: Mutex<Frame>,
    seq: AtomicU64,
    observers: Mutex<Vec<Observer>>,
}

impl FrameBuffer {
    /// Create a buffer holding a zero-filled `width` x `height` frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Frame::zeroed(width, height)),
                seq: AtomicU64::new(0),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Atomically replace the stored frame, then notify observers.
    ///
    /// The slot lock is released before observers run, so an observer may
    /// call `get()` freely.
    pub fn set(&self, frame: Frame) {
        {
            let mut slot = self
                .inner
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *slot = frame;
        }
        self.inner.seq.fetch_add(1, Ordering::SeqCst);

        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !observers.is_empty() {
            let current = self.get();
            for observer in observers.iter() {
                observer(&current);
            }
        }
    }

    /// The most recent complete frame. Never blocks on an in-progress
    /// `set` beyond the slot swap itself.
    pub fn get(&self) -> Frame {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of completed `set` calls. Zero means the buffer still holds
    /// the initial zero frame.
    pub fn seq(&self) -> u64 {
        self.inner.seq.load(Ordering::SeqCst)
    }

    /// Register a callback invoked with each newly stored frame.
    ///
    /// Observers run on whichever thread performed the `set`, so they
    /// should be quick; a slow observer delays the capture loop.
    pub fn observe<F>(&self, callback: F)
    where
        F: Fn(&Frame) + Send + 'static,
    {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }
}
