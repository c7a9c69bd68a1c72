use super::*;
use crate::{
    foundation::core::{PixelSize, Viewport},
    host::{FrameCallback, ResizeCallback, manual::ManualHost},
    surface::recording::{DrawCmd, RecordingSurface},
};

fn vp(w: f64, h: f64) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn small_config() -> FieldConfig {
    FieldConfig {
        star_count: 8,
        orb_count: 1,
        ..FieldConfig::default()
    }
}

fn mounted(host: &ManualHost) -> MountedField<RecordingSurface, ManualHost> {
    MountedField::mount(Some(RecordingSurface::new()), host.clone(), small_config(), 3)
        .expect("mounts")
}

/// Host that ignores cancellation, so stale callbacks still get delivered.
#[derive(Clone)]
struct LeakyHost(ManualHost);

impl FrameHost for LeakyHost {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.0.request_frame(callback)
    }

    fn cancel_frame(&self, _handle: FrameHandle) -> bool {
        false
    }

    fn subscribe_resize(&self, callback: ResizeCallback) -> ResizeSubscription {
        self.0.subscribe_resize(callback)
    }

    fn unsubscribe_resize(&self, subscription: ResizeSubscription) -> bool {
        self.0.unsubscribe_resize(subscription)
    }

    fn viewport(&self) -> Viewport {
        self.0.viewport()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.0.device_pixel_ratio()
    }
}

#[test]
fn missing_surface_is_a_silent_no_op() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let m = MountedField::<RecordingSurface, _>::mount(None, host.clone(), small_config(), 1);
    assert!(m.is_none());
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.resize_listeners(), 0);
}

#[test]
fn unsizable_surface_is_a_silent_no_op() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let surface = RecordingSurface::new().with_max_pixels(16);
    let m = MountedField::mount(Some(surface), host.clone(), small_config(), 1);
    assert!(m.is_none());
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.resize_listeners(), 0);
}

#[test]
fn mount_starts_the_loop() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let m = mounted(&host);
    assert!(m.is_running());
    assert!(m.has_pending_frame());
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(host.resize_listeners(), 1);

    host.run_frames(5);
    assert_eq!(m.frames(), 5);
    // Exactly one frame is ever outstanding.
    assert_eq!(host.pending_frames(), 1);
}

#[test]
fn stop_cancels_pending_frame_and_start_resumes() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let mut m = mounted(&host);
    host.run_frames(3);

    m.stop();
    assert!(!m.is_running());
    assert_eq!(host.pending_frames(), 0);
    host.run_frames(10);
    assert_eq!(m.frames(), 3);

    m.start();
    m.start();
    assert_eq!(host.pending_frames(), 1);
    host.run_frames(2);
    assert_eq!(m.frames(), 5);
}

#[test]
fn drop_tears_everything_down() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    {
        let _m = mounted(&host);
        host.run_frames(2);
    }
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.resize_listeners(), 0);
    assert_eq!(host.run_frames(5), 0);
}

#[test]
fn unmount_returns_surface_with_no_further_draws() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let m = mounted(&host);
    host.run_frames(4);

    let surface = m.unmount().expect("surface handed back");
    assert_eq!(surface.frames_presented(), 4);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.resize_listeners(), 0);
    assert_eq!(host.run_frames(3), 0);
    assert_eq!(surface.frames_presented(), 4);
}

#[test]
fn stale_frame_after_stop_does_not_touch_field() {
    let inner = ManualHost::new(vp(200.0, 100.0), 1.0);
    let host = LeakyHost(inner.clone());
    let mut m = MountedField::mount(Some(RecordingSurface::new()), host, small_config(), 9)
        .expect("mounts");
    inner.run_frames(2);
    let before = m.with_field(|f| f.stars().to_vec()).unwrap();

    m.stop();
    // The host failed to cancel, so the old callback still fires.
    assert_eq!(inner.pending_frames(), 1);
    assert_eq!(inner.advance_frame(), 1);

    assert_eq!(m.frames(), 2);
    assert_eq!(m.with_field(|f| f.stars().to_vec()).unwrap(), before);
    // And it did not reschedule itself.
    assert_eq!(inner.pending_frames(), 0);
}

#[test]
fn stale_frame_after_drop_is_inert() {
    let inner = ManualHost::new(vp(200.0, 100.0), 1.0);
    {
        let _m = MountedField::mount(
            Some(RecordingSurface::new()),
            LeakyHost(inner.clone()),
            small_config(),
            9,
        )
        .expect("mounts");
    }
    assert_eq!(inner.resize_listeners(), 0);
    assert_eq!(inner.advance_frame(), 1);
    assert_eq!(inner.pending_frames(), 0);
}

#[test]
fn host_resize_refits_surface() {
    let host = ManualHost::new(vp(200.0, 100.0), 1.0);
    let m = mounted(&host);
    host.run_frames(1);

    host.set_device_pixel_ratio(2.0);
    host.set_viewport(vp(300.0, 150.0));

    let (viewport, ratio) = m
        .with_field(|f| (f.viewport(), f.device_pixel_ratio()))
        .unwrap();
    assert_eq!(viewport, vp(300.0, 150.0));
    assert_eq!(ratio, 2.0);
    let size = m.with_field(|f| f.surface().pixel_size()).unwrap();
    assert_eq!(
        size,
        Some(PixelSize {
            width: 600,
            height: 300
        })
    );

    // The loop keeps running against the new size.
    host.run_frames(1);
    let clear = m
        .with_field(|f| {
            f.surface()
                .commands()
                .iter()
                .rev()
                .find(|c| matches!(c, DrawCmd::Clear(_)))
                .cloned()
        })
        .flatten();
    assert_eq!(
        clear,
        Some(DrawCmd::Clear(crate::foundation::core::Rect::new(
            0.0, 0.0, 300.0, 150.0
        )))
    );
}
