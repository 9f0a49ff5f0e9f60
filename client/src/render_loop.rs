use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Coalesces repaint requests into at most one `requestAnimationFrame` per vsync.
///
/// The render function returns `true` to ask for another frame right away.
pub struct RenderScheduler {
    frame: Rc<FrameState>,
}

struct FrameState {
    window: Option<web_sys::Window>,
    dirty: Cell<bool>,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameState {
    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            self.pending.set(Some(id));
        }
    }
}

impl RenderScheduler {
    pub fn new(render_fn: impl Fn() -> bool + 'static) -> Self {
        let frame = Rc::new(FrameState {
            window: web_sys::window(),
            dirty: Cell::new(false),
            pending: Cell::new(None),
            callback: RefCell::new(None),
        });

        let frame_cb = frame.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            frame_cb.pending.set(None);
            if !frame_cb.dirty.replace(false) {
                return;
            }
            if render_fn() {
                frame_cb.dirty.set(true);
                frame_cb.request();
            }
        });
        *frame.callback.borrow_mut() = Some(cb);

        Self { frame }
    }

    pub fn mark_dirty(&self) {
        self.frame.dirty.set(true);
        self.frame.request();
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        if let Some(id) = self.frame.pending.take()
            && let Some(window) = self.frame.window.as_ref()
        {
            let _ = window.cancel_animation_frame(id);
        }
        self.frame.dirty.set(false);
        // The closure holds an Rc to the frame state; break the cycle.
        self.frame.callback.borrow_mut().take();
    }
}
