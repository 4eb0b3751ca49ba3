use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_render::{request_animation_frame, AnimationFrame};

/// Pending flag that lets at most one frame be requested at a time.
#[derive(Default, Debug)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// True when the caller should request a frame; false while one is already pending.
    pub fn try_claim(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    pub fn release(&mut self) {
        self.pending = false;
    }
}

/// Ignores triggers that land within `interval_ms` of the last accepted one.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last: None }
    }

    pub fn allow(&mut self, now_ms: f64) -> bool {
        match self.last {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last = Some(now_ms);
                true
            }
        }
    }
}

pub fn now_ms() -> f64 {
    web_sys::js_sys::Date::now()
}

/// Runs `work` on the next animation frame, however many times `request`
/// is called before that frame arrives.
pub struct FrameCoalescer {
    state: Rc<CoalescerState>,
}

struct CoalescerState {
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    work: RefCell<Box<dyn FnMut()>>,
}

impl FrameCoalescer {
    pub fn new<F>(work: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            state: Rc::new(CoalescerState {
                gate: RefCell::new(FrameGate::default()),
                frame: RefCell::new(None),
                work: RefCell::new(Box::new(work)),
            }),
        }
    }

    pub fn request(&self) {
        if !self.state.gate.borrow_mut().try_claim() {
            return;
        }
        let weak = Rc::downgrade(&self.state);
        let frame = request_animation_frame(move |_| {
            if let Some(state) = weak.upgrade() {
                state.frame.borrow_mut().take();
                state.gate.borrow_mut().release();
                (state.work.borrow_mut())();
            }
        });
        *self.state.frame.borrow_mut() = Some(frame);
    }
}

struct LoopState {
    running: Cell<bool>,
    frame: RefCell<Option<AnimationFrame>>,
    tick: RefCell<Box<dyn FnMut(f64)>>,
}

impl LoopState {
    fn schedule(self: &Rc<Self>) {
        if !self.running.get() {
            return;
        }
        let weak: Weak<LoopState> = Rc::downgrade(self);
        let frame = request_animation_frame(move |timestamp| {
            if let Some(state) = weak.upgrade() {
                state.frame.borrow_mut().take();
                if state.running.get() {
                    (state.tick.borrow_mut())(timestamp);
                    state.schedule();
                }
            }
        });
        *self.frame.borrow_mut() = Some(frame);
    }
}

/// A per-frame task that keeps rescheduling itself until stopped or dropped.
pub struct AnimationLoop {
    state: Rc<LoopState>,
}

impl AnimationLoop {
    pub fn start<F>(tick: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let state = Rc::new(LoopState {
            running: Cell::new(true),
            frame: RefCell::new(None),
            tick: RefCell::new(Box::new(tick)),
        });
        state.schedule();
        Self { state }
    }

    pub fn stop(&self) {
        self.state.running.set(false);
        // Dropping the pending frame cancels it
        self.state.frame.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_coalesces_until_released() {
        let mut gate = FrameGate::default();
        assert!(gate.try_claim());
        assert!(!gate.try_claim());
        assert!(!gate.try_claim());

        gate.release();
        assert!(gate.try_claim());
    }

    #[test]
    fn throttle_suppresses_inside_the_bucket() {
        let mut throttle = Throttle::new(500.0);
        assert!(throttle.allow(1_000.0));
        assert!(!throttle.allow(1_200.0));
        assert!(!throttle.allow(1_499.0));
        assert!(throttle.allow(1_500.0));
        assert!(!throttle.allow(1_700.0));
    }

    #[test]
    fn suppressed_triggers_do_not_extend_the_bucket() {
        let mut throttle = Throttle::new(100.0);
        assert!(throttle.allow(0.0));
        assert!(!throttle.allow(90.0));
        assert!(throttle.allow(100.0));
    }
}
