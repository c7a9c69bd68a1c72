use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    foundation::core::Viewport,
    host::{FrameCallback, FrameHandle, FrameHost, ResizeCallback, ResizeSubscription},
};

/// Nominal frame period of the fake clock.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Deterministic, manually pumped host.
///
/// Frames only run when [`ManualHost::advance_frame`] is called, which makes lifecycle and
/// cancellation observable without a display. Cloning yields another handle to the same host.
#[derive(Clone)]
pub struct ManualHost {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    next_id: u64,
    now_ms: f64,
    viewport: Viewport,
    device_pixel_ratio: f64,
    queued: BTreeMap<u64, FrameCallback>,
    // Callbacks of the frame currently being pumped; still cancellable until they run.
    in_flight: BTreeMap<u64, FrameCallback>,
    // `None` while the callback is being invoked.
    resize: BTreeMap<u64, Option<ResizeCallback>>,
    frames_fired: u64,
}

impl Inner {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl std::fmt::Debug for ManualHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualHost")
            .field("now_ms", &inner.now_ms)
            .field("viewport", &inner.viewport)
            .field("device_pixel_ratio", &inner.device_pixel_ratio)
            .field("pending_frames", &(inner.queued.len() + inner.in_flight.len()))
            .field("resize_listeners", &inner.resize.len())
            .finish()
    }
}

impl ManualHost {
    pub fn new(viewport: Viewport, device_pixel_ratio: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                now_ms: 0.0,
                viewport,
                device_pixel_ratio,
                queued: BTreeMap::new(),
                in_flight: BTreeMap::new(),
                resize: BTreeMap::new(),
                frames_fired: 0,
            })),
        }
    }

    /// Run every callback that was pending when this call started. Callbacks scheduled while
    /// pumping wait for the next call. Returns the number of callbacks fired.
    pub fn advance_frame(&self) -> usize {
        let now = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms += FRAME_MS;
            let batch = std::mem::take(&mut inner.queued);
            inner.in_flight = batch;
            inner.now_ms
        };

        let mut fired = 0;
        loop {
            let next = self.inner.borrow_mut().in_flight.pop_first();
            let Some((_, callback)) = next else { break };
            callback(now);
            fired += 1;
        }
        self.inner.borrow_mut().frames_fired += fired as u64;
        fired
    }

    /// Pump `n` frames; returns the total number of callbacks fired.
    pub fn run_frames(&self, n: usize) -> usize {
        (0..n).map(|_| self.advance_frame()).sum()
    }

    /// Change the viewport and notify every resize subscriber.
    pub fn set_viewport(&self, viewport: Viewport) {
        let ids: Vec<u64> = {
            let mut inner = self.inner.borrow_mut();
            inner.viewport = viewport;
            inner.resize.keys().copied().collect()
        };

        for id in ids {
            let taken = self
                .inner
                .borrow_mut()
                .resize
                .get_mut(&id)
                .and_then(Option::take);
            let Some(mut callback) = taken else { continue };
            callback(viewport);
            // Unsubscribing from inside the callback removes the slot; only restore live ones.
            if let Some(slot) = self.inner.borrow_mut().resize.get_mut(&id) {
                *slot = Some(callback);
            }
        }
    }

    pub fn set_device_pixel_ratio(&self, device_pixel_ratio: f64) {
        self.inner.borrow_mut().device_pixel_ratio = device_pixel_ratio;
    }

    pub fn pending_frames(&self) -> usize {
        let inner = self.inner.borrow();
        inner.queued.len() + inner.in_flight.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.inner.borrow().resize.len()
    }

    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    pub fn frames_fired(&self) -> u64 {
        self.inner.borrow().frames_fired
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.alloc_id();
        inner.queued.insert(id, callback);
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.queued.remove(&handle.0).is_some() || inner.in_flight.remove(&handle.0).is_some()
    }

    fn subscribe_resize(&self, callback: ResizeCallback) -> ResizeSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.alloc_id();
        inner.resize.insert(id, Some(callback));
        ResizeSubscription(id)
    }

    fn unsubscribe_resize(&self, subscription: ResizeSubscription) -> bool {
        self.inner
            .borrow_mut()
            .resize
            .remove(&subscription.0)
            .is_some()
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.inner.borrow().device_pixel_ratio
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/manual.rs"]
mod tests;
