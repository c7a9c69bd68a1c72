use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    field::{config::FieldConfig, engine::ParticleField},
    host::{FrameHandle, FrameHost, ResizeSubscription},
    surface::DrawSurface,
};

struct LoopState<S> {
    field: Option<ParticleField<S>>,
    running: bool,
    pending: Option<FrameHandle>,
}

/// A particle field attached to a [`FrameHost`].
///
/// Mounting starts a self-rescheduling frame loop and subscribes to viewport resizes. Stopping
/// cancels the pending frame synchronously; unmounting (or dropping) also detaches the resize
/// subscription. Once stopped, no frame callback touches the field, even one the host delivers
/// late.
pub struct MountedField<S, H>
where
    S: DrawSurface + 'static,
    H: FrameHost + Clone + 'static,
{
    shared: Rc<RefCell<LoopState<S>>>,
    host: H,
    resize_sub: Option<ResizeSubscription>,
}

impl<S, H> MountedField<S, H>
where
    S: DrawSurface + 'static,
    H: FrameHost + Clone + 'static,
{
    /// Build a field on `surface` sized to the host viewport and start animating.
    ///
    /// Returns `None` without error when there is no surface or it cannot be sized: the
    /// background is decorative and its absence must not break the page.
    #[tracing::instrument(skip(surface, host, cfg))]
    pub fn mount(surface: Option<S>, host: H, cfg: FieldConfig, seed: u64) -> Option<Self> {
        let Some(surface) = surface else {
            tracing::debug!("no drawing surface, particle field not mounted");
            return None;
        };

        let field = match ParticleField::new(
            surface,
            host.viewport(),
            host.device_pixel_ratio(),
            cfg,
            seed,
        ) {
            Ok(field) => field,
            Err(err) => {
                tracing::warn!(%err, "particle field disabled");
                return None;
            }
        };

        let shared = Rc::new(RefCell::new(LoopState {
            field: Some(field),
            running: false,
            pending: None,
        }));

        let weak = Rc::downgrade(&shared);
        let resize_host = host.clone();
        let resize_sub = host.subscribe_resize(Box::new(move |viewport| {
            let Some(shared) = weak.upgrade() else { return };
            let ratio = resize_host.device_pixel_ratio();
            let mut state = shared.borrow_mut();
            if let Some(field) = state.field.as_mut()
                && let Err(err) = field.resize(viewport, ratio)
            {
                tracing::warn!(%err, "particle field resize failed");
            }
        }));

        let mut mounted = Self {
            shared,
            host,
            resize_sub: Some(resize_sub),
        };
        mounted.start();
        tracing::debug!("particle field mounted");
        Some(mounted)
    }

    /// Resume the frame loop. No-op while already running.
    pub fn start(&mut self) {
        {
            let mut state = self.shared.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
        }
        schedule_next(&self.shared, &self.host);
    }

    /// Halt the frame loop and cancel the pending frame.
    pub fn stop(&mut self) {
        let pending = {
            let mut state = self.shared.borrow_mut();
            state.running = false;
            state.pending.take()
        };
        if let Some(handle) = pending {
            self.host.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().running
    }

    pub fn has_pending_frame(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }

    /// Inspect the field.
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField<S>) -> R) -> Option<R> {
        self.shared.borrow().field.as_ref().map(f)
    }

    pub fn frames(&self) -> u64 {
        self.with_field(ParticleField::frames).unwrap_or(0)
    }

    /// Tear down and hand the surface back.
    pub fn unmount(mut self) -> Option<S> {
        self.teardown();
        let field = self.shared.borrow_mut().field.take();
        field.map(ParticleField::into_surface)
    }

    fn teardown(&mut self) {
        self.stop();
        if let Some(sub) = self.resize_sub.take() {
            self.host.unsubscribe_resize(sub);
            tracing::debug!("particle field unmounted");
        }
    }
}

impl<S, H> Drop for MountedField<S, H>
where
    S: DrawSurface + 'static,
    H: FrameHost + Clone + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

fn schedule_next<S, H>(shared: &Rc<RefCell<LoopState<S>>>, host: &H)
where
    S: DrawSurface + 'static,
    H: FrameHost + Clone + 'static,
{
    let weak: Weak<RefCell<LoopState<S>>> = Rc::downgrade(shared);
    let frame_host = host.clone();
    let handle = host.request_frame(Box::new(move |_timestamp_ms| {
        let Some(shared) = weak.upgrade() else { return };
        run_frame(&shared, &frame_host);
    }));
    shared.borrow_mut().pending = Some(handle);
}

fn run_frame<S, H>(shared: &Rc<RefCell<LoopState<S>>>, host: &H)
where
    S: DrawSurface + 'static,
    H: FrameHost + Clone + 'static,
{
    {
        let mut state = shared.borrow_mut();
        state.pending = None;
        if !state.running {
            return;
        }
        let Some(field) = state.field.as_mut() else {
            return;
        };
        if let Err(err) = field.tick() {
            tracing::warn!(%err, "particle field frame failed");
        }
    }
    schedule_next(shared, host);
}

#[cfg(test)]
#[path = "../../tests/unit/field/mount.rs"]
mod tests;
