//! Frame scheduling
//!
//! The runtime asks its `FrameClock` for one "next frame" at a time and gets
//! a `FrameHandle` back. When the host's frame arrives it calls
//! `Runtime::on_frame` with that handle; handles that are not the one the
//! runtime is waiting for are ignored, so a cancelled frame can never run.

use std::cell::RefCell;
use std::rc::Rc;

use super::Runtime;

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host-provided "request next frame" service
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ManualQueue {
    next_id: u64,
    queued: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

/// Clock driven by explicit `advance` calls (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ManualQueue>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not yet delivered or cancelled
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.inner.borrow().queued.clone()
    }

    pub fn requested_count(&self) -> usize {
        self.inner.borrow().requested
    }

    pub fn cancelled_count(&self) -> usize {
        self.inner.borrow().cancelled
    }

    /// One host tick: deliver every frame requested before this call.
    /// Returns how many were delivered.
    pub fn advance(&self, runtime: &mut Runtime, timestamp: f64) -> usize {
        let due = std::mem::take(&mut self.inner.borrow_mut().queued);
        for handle in &due {
            runtime.on_frame(*handle, timestamp);
        }
        due.len()
    }

    /// Run `ticks` host ticks spaced `step_ms` apart starting at `start_ms`
    pub fn run(&self, runtime: &mut Runtime, ticks: usize, start_ms: f64, step_ms: f64) -> usize {
        (0..ticks)
            .map(|i| self.advance(runtime, start_ms + i as f64 * step_ms))
            .sum()
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.requested += 1;
        let handle = FrameHandle(inner.next_id);
        inner.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.queued.len();
        inner.queued.retain(|h| *h != handle);
        if inner.queued.len() != before {
            inner.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_cancel() {
        let mut clock = ManualClock::new();
        let a = clock.request_frame();
        let b = clock.request_frame();
        assert_ne!(a, b);
        clock.cancel_frame(a);
        assert_eq!(clock.pending(), vec![b]);
        assert_eq!(clock.cancelled_count(), 1);

        // Cancelling twice is harmless
        clock.cancel_frame(a);
        assert_eq!(clock.cancelled_count(), 1);
        assert_eq!(clock.requested_count(), 2);
    }
}
