//! Render-loop subscriptions.
//!
//! A [`FrameScheduler`] hands out one handle per subscription; dropping the
//! handle ends the subscription. In the browser that is
//! `requestAnimationFrame`, cancelled on drop. Host-side tests plug in a fake.

use crate::error::SiteError;
use crate::monitor::FpsSampler;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Per-frame callback driver. Dropping a handle must stop its callbacks.
pub trait FrameScheduler {
    type Handle;

    /// Call `on_frame` with a monotonic millisecond timestamp once per frame
    /// until the returned handle is dropped.
    fn subscribe(&self, on_frame: Box<dyn FnMut(f64)>) -> Self::Handle;
}

/// `requestAnimationFrame` scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    type Handle = Option<AnimationFrameLoop>;

    fn subscribe(&self, on_frame: Box<dyn FnMut(f64)>) -> Self::Handle {
        AnimationFrameLoop::start(on_frame)
            .map_err(|e| warn!("Frame loop not started: {}", e))
            .ok()
    }
}

struct LoopState {
    window: web_sys::Window,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<Option<i32>>,
    cancelled: Cell<bool>,
}

impl LoopState {
    fn request(&self) {
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some(id)),
            Err(e) => warn!("requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// Self-rescheduling animation-frame callback. Cancelled when dropped.
pub struct AnimationFrameLoop {
    state: Rc<LoopState>,
}

impl std::fmt::Debug for AnimationFrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationFrameLoop")
            .field("pending", &self.state.pending.get())
            .field("cancelled", &self.state.cancelled.get())
            .finish()
    }
}

impl AnimationFrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::NoWindow)?;
        let state = Rc::new(LoopState {
            window,
            callback: RefCell::new(None),
            pending: Cell::new(None),
            cancelled: Cell::new(false),
        });

        let weak = Rc::downgrade(&state);
        let tick = Closure::wrap(Box::new(move |now: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.pending.set(None);
            if state.cancelled.get() {
                return;
            }
            on_frame(now);
            // on_frame may have torn the loop down
            if !state.cancelled.get() {
                state.request();
            }
        }) as Box<dyn FnMut(f64)>);

        *state.callback.borrow_mut() = Some(tick);
        state.request();
        Ok(Self { state })
    }
}

impl Drop for AnimationFrameLoop {
    fn drop(&mut self) {
        self.state.cancelled.set(true);
        if let Some(id) = self.state.pending.take() {
            if let Err(e) = self.state.window.cancel_animation_frame(id) {
                warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        // Teardown can be triggered from inside the callback itself, so the
        // closure is released on the next task instead of under its own frame.
        if let Ok(mut slot) = self.state.callback.try_borrow_mut() {
            if let Some(tick) = slot.take() {
                wasm_bindgen_futures::spawn_local(async move { drop(tick) });
            }
        }
    }
}

/// Owns at most one FPS-sampling subscription.
pub struct WatchdogRunner<S: FrameScheduler> {
    scheduler: S,
    handle: Option<S::Handle>,
}

impl<S: FrameScheduler> WatchdogRunner<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start sampling; `on_window` receives one FPS value per closed window.
    /// Returns `false` without subscribing again if already running.
    pub fn start(&mut self, on_window: impl Fn(u32) + 'static) -> bool {
        if self.handle.is_some() {
            return false;
        }
        let mut sampler = FpsSampler::default();
        let handle = self.scheduler.subscribe(Box::new(move |now| {
            if let Some(fps) = sampler.record_frame(now) {
                on_window(fps);
            }
        }));
        self.handle = Some(handle);
        debug!("Watchdog sampling started");
        true
    }

    /// Release the subscription. No window is reported afterwards.
    pub fn stop(&mut self) {
        if self.handle.take().is_some() {
            debug!("Watchdog sampling stopped");
        }
    }

    pub fn set_enabled(&mut self, enabled: bool, on_window: impl Fn(u32) + 'static) {
        if enabled {
            self.start(on_window);
        } else {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Weak;

    type Slot = Rc<RefCell<Box<dyn FnMut(f64)>>>;

    #[derive(Default, Clone)]
    struct FakeScheduler {
        subscribers: Rc<RefCell<Vec<Weak<RefCell<Box<dyn FnMut(f64)>>>>>>,
    }

    impl FakeScheduler {
        fn frame(&self, now: f64) {
            let live: Vec<Slot> = self
                .subscribers
                .borrow()
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            for slot in live {
                (&mut *slot.borrow_mut())(now);
            }
        }

        fn subscriptions(&self) -> usize {
            self.subscribers.borrow().len()
        }
    }

    impl FrameScheduler for FakeScheduler {
        type Handle = Slot;

        fn subscribe(&self, on_frame: Box<dyn FnMut(f64)>) -> Slot {
            let slot = Rc::new(RefCell::new(on_frame));
            self.subscribers.borrow_mut().push(Rc::downgrade(&slot));
            slot
        }
    }

    fn run_seconds(scheduler: &FakeScheduler, from_s: f64, seconds: u32, fps: u32) {
        for i in 0..=(seconds * fps) {
            scheduler.frame(from_s * 1000.0 + i as f64 * 1000.0 / fps as f64);
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let scheduler = FakeScheduler::default();
        let mut runner = WatchdogRunner::new(scheduler.clone());
        assert!(runner.start(|_| {}));
        assert!(!runner.start(|_| {}));
        assert!(runner.is_running());
        assert_eq!(scheduler.subscriptions(), 1);
    }

    #[test]
    fn test_windows_are_reported() {
        let scheduler = FakeScheduler::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut runner = WatchdogRunner::new(scheduler.clone());
        let sink = seen.clone();
        runner.start(move |fps| sink.borrow_mut().push(fps));

        run_seconds(&scheduler, 0.0, 2, 50);
        assert_eq!(*seen.borrow(), vec![50, 50]);
    }

    #[test]
    fn test_stop_releases_subscription() {
        let scheduler = FakeScheduler::default();
        let seen = Rc::new(Cell::new(0u32));
        let mut runner = WatchdogRunner::new(scheduler.clone());
        let sink = seen.clone();
        runner.start(move |fps| sink.set(fps));

        run_seconds(&scheduler, 0.0, 1, 60);
        assert_eq!(seen.get(), 60);

        runner.set_enabled(false, |_| {});
        assert!(!runner.is_running());
        run_seconds(&scheduler, 2.0, 3, 20);
        assert_eq!(seen.get(), 60);
    }

    #[test]
    fn test_dropping_runner_stops_sampling() {
        let scheduler = FakeScheduler::default();
        let seen = Rc::new(Cell::new(0u32));
        {
            let mut runner = WatchdogRunner::new(scheduler.clone());
            let sink = seen.clone();
            runner.start(move |fps| sink.set(fps));
            run_seconds(&scheduler, 0.0, 1, 30);
        }
        run_seconds(&scheduler, 2.0, 2, 90);
        assert_eq!(seen.get(), 30);
    }
}
