//! Frame scheduling and viewport notifications.
//!
//! A [`FrameHost`] plays the role of the browser window: it hands out animation frames and
//! resize notifications. Hosts are single-threaded and take `&self`; implementations must not hold
//! an internal borrow while invoking callbacks so a callback can request its successor frame.
use crate::foundation::core::Viewport;

pub mod manual;

/// One-shot callback fired with the host timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

pub type ResizeCallback = Box<dyn FnMut(Viewport)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResizeSubscription(pub u64);

pub trait FrameHost {
    /// Schedule `callback` for the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending frame. Returns `false` if it already ran or was never scheduled.
    fn cancel_frame(&self, handle: FrameHandle) -> bool;

    fn subscribe_resize(&self, callback: ResizeCallback) -> ResizeSubscription;

    fn unsubscribe_resize(&self, subscription: ResizeSubscription) -> bool;

    fn viewport(&self) -> Viewport;

    fn device_pixel_ratio(&self) -> f64;
}
