use super::*;
use std::cell::Cell;

fn host() -> ManualHost {
    ManualHost::new(Viewport::new(320.0, 200.0).unwrap(), 1.0)
}

#[test]
fn frames_requested_while_pumping_run_next_pump() {
    let host = host();
    let count = Rc::new(Cell::new(0u32));

    fn schedule(host: &ManualHost, count: Rc<Cell<u32>>) {
        let h = host.clone();
        host.request_frame(Box::new(move |_| {
            count.set(count.get() + 1);
            schedule(&h, count);
        }));
    }
    schedule(&host, count.clone());

    assert_eq!(host.advance_frame(), 1);
    assert_eq!(count.get(), 1);
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(host.run_frames(3), 3);
    assert_eq!(count.get(), 4);
    assert_eq!(host.frames_fired(), 4);
}

#[test]
fn cancelled_frame_never_fires() {
    let host = host();
    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    let handle = host.request_frame(Box::new(move |_| f.set(true)));

    assert!(host.cancel_frame(handle));
    assert!(!host.cancel_frame(handle));
    assert_eq!(host.advance_frame(), 0);
    assert!(!fired.get());
}

#[test]
fn callback_can_cancel_a_sibling_in_the_same_batch() {
    let host = host();
    let fired = Rc::new(Cell::new(false));

    let sibling = Rc::new(Cell::new(None));
    let h = host.clone();
    let s = sibling.clone();
    host.request_frame(Box::new(move |_| {
        if let Some(handle) = s.get() {
            assert!(h.cancel_frame(handle));
        }
    }));
    let f = fired.clone();
    sibling.set(Some(host.request_frame(Box::new(move |_| f.set(true)))));

    assert_eq!(host.advance_frame(), 1);
    assert!(!fired.get());
}

#[test]
fn clock_advances_per_frame() {
    let host = host();
    let seen = Rc::new(Cell::new(0.0));
    let s = seen.clone();
    host.request_frame(Box::new(move |t| s.set(t)));
    host.advance_frame();
    host.advance_frame();
    assert!((seen.get() - FRAME_MS).abs() < 1e-9);
    assert!((host.now_ms() - 2.0 * FRAME_MS).abs() < 1e-9);
}

#[test]
fn resize_notifies_until_unsubscribed() {
    let host = host();
    let widths = Rc::new(RefCell::new(Vec::new()));
    let w = widths.clone();
    let sub = host.subscribe_resize(Box::new(move |v| w.borrow_mut().push(v.width)));
    assert_eq!(host.resize_listeners(), 1);

    host.set_viewport(Viewport::new(640.0, 480.0).unwrap());
    assert_eq!(host.viewport().width, 640.0);
    assert!(host.unsubscribe_resize(sub));
    assert!(!host.unsubscribe_resize(sub));
    host.set_viewport(Viewport::new(100.0, 100.0).unwrap());

    assert_eq!(*widths.borrow(), vec![640.0]);
    assert_eq!(host.resize_listeners(), 0);
}

#[test]
fn resize_listener_may_unsubscribe_itself() {
    let host = host();
    let calls = Rc::new(Cell::new(0));
    let own = Rc::new(Cell::new(None));

    let h = host.clone();
    let c = calls.clone();
    let o = own.clone();
    let sub = host.subscribe_resize(Box::new(move |_| {
        c.set(c.get() + 1);
        if let Some(sub) = o.get() {
            h.unsubscribe_resize(sub);
        }
    }));
    own.set(Some(sub));

    host.set_viewport(Viewport::new(10.0, 10.0).unwrap());
    host.set_viewport(Viewport::new(20.0, 20.0).unwrap());
    assert_eq!(calls.get(), 1);
    assert_eq!(host.resize_listeners(), 0);
}
