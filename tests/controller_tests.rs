//! End-to-end controller scenarios: hardware signals in, frames through the
//! watchdog runner, tier decisions out.

use folio::frame_loop::{FrameScheduler, WatchdogRunner};
use folio::hardware::{FormFactor, Platform};
use folio::{classify, HardwareSignals, PerformanceAction, PerformanceState, Tier, WatchdogState};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use yew::functional::Reducible;

type Slot = Rc<RefCell<Box<dyn FnMut(f64)>>>;

/// Drives subscribers by hand instead of requestAnimationFrame.
#[derive(Default, Clone)]
struct ManualClock {
    subscribers: Rc<RefCell<Vec<Weak<RefCell<Box<dyn FnMut(f64)>>>>>>,
    now_ms: Rc<RefCell<f64>>,
}

impl ManualClock {
    fn tick(&self, now: f64) {
        *self.now_ms.borrow_mut() = now;
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

    /// Emit `seconds` worth of frames at a steady `fps`, continuing from the
    /// last tick.
    fn run(&self, seconds: u32, fps: u32) {
        let start = *self.now_ms.borrow();
        for i in 1..=(seconds * fps) {
            self.tick(start + i as f64 * 1000.0 / fps as f64);
        }
    }
}

impl FrameScheduler for ManualClock {
    type Handle = Slot;

    fn subscribe(&self, on_frame: Box<dyn FnMut(f64)>) -> Slot {
        let slot = Rc::new(RefCell::new(on_frame));
        self.subscribers.borrow_mut().push(Rc::downgrade(&slot));
        slot
    }
}

/// Controller plus a running watchdog, wired the way the provider wires them.
struct Harness {
    clock: ManualClock,
    state: Rc<RefCell<PerformanceState>>,
    runner: WatchdogRunner<ManualClock>,
}

impl Harness {
    fn new(signals: HardwareSignals) -> Self {
        let clock = ManualClock::default();
        let state = Rc::new(RefCell::new(PerformanceState::detected(signals)));
        let mut runner = WatchdogRunner::new(clock.clone());
        let sink = state.clone();
        runner.start(move |fps| {
            sink.borrow_mut()
                .apply(PerformanceAction::WindowSampled(fps))
        });
        clock.tick(0.0);
        Self {
            clock,
            state,
            runner,
        }
    }

    fn dispatch(&self, action: PerformanceAction) {
        self.state.borrow_mut().apply(action);
    }

    fn active(&self) -> Tier {
        self.state.borrow().active_tier()
    }

    fn detected(&self) -> Tier {
        self.state.borrow().detected_tier()
    }
}

fn workstation() -> HardwareSignals {
    HardwareSignals {
        cores: 16,
        memory_gb: Some(32.0),
        ..HardwareSignals::default()
    }
}

#[test]
fn test_reference_devices() {
    let budget_phone = HardwareSignals {
        cores: 8,
        memory_gb: Some(3.0),
        platform: Platform::Android,
        form_factor: FormFactor::Phone,
        touch_primary: true,
    };
    let iphone = HardwareSignals {
        cores: 6,
        memory_gb: None,
        platform: Platform::Ios,
        form_factor: FormFactor::Phone,
        touch_primary: true,
    };
    let laptop = HardwareSignals {
        cores: 8,
        memory_gb: Some(8.0),
        ..HardwareSignals::default()
    };

    assert_eq!(classify(&budget_phone), Tier::Low);
    assert_eq!(classify(&iphone), Tier::Balanced);
    assert_eq!(classify(&laptop), Tier::High);
    assert_eq!(classify(&workstation()), Tier::Ultra);
}

#[test]
fn test_sustained_jank_steps_down_one_tier_per_three_windows() {
    let h = Harness::new(workstation());
    h.clock.run(2, 20);
    assert_eq!(h.detected(), Tier::Ultra);
    assert_eq!(h.state.borrow().watchdog_state(), WatchdogState::Struggling);

    h.clock.run(1, 20);
    assert_eq!(h.detected(), Tier::High);
    assert_eq!(h.state.borrow().current_fps(), 20);

    h.clock.run(3, 20);
    assert_eq!(h.detected(), Tier::Balanced);
}

#[test]
fn test_recovery_does_not_upgrade() {
    let h = Harness::new(workstation());
    h.clock.run(3, 20);
    assert_eq!(h.detected(), Tier::High);

    h.clock.run(5, 60);
    assert_eq!(h.state.borrow().watchdog_state(), WatchdogState::Nominal);
    assert_eq!(h.detected(), Tier::High);
}

#[test]
fn test_manual_override_holds_and_clears_without_backlog() {
    let h = Harness::new(workstation());
    h.dispatch(PerformanceAction::SetManualOverride(Some(Tier::Ultra)));

    h.clock.run(9, 12);
    assert_eq!(h.active(), Tier::Ultra);
    assert_eq!(h.detected(), Tier::Ultra);
    assert_eq!(h.state.borrow().current_fps(), 12);

    h.dispatch(PerformanceAction::SetManualOverride(None));
    assert_eq!(h.active(), Tier::Ultra);

    // Misses only count again once automatic control is back.
    h.clock.run(2, 12);
    assert_eq!(h.active(), Tier::Ultra);
    h.clock.run(1, 12);
    assert_eq!(h.active(), Tier::High);
}

#[test]
fn test_initialize_is_ignored_after_first_classification() {
    let h = Harness::new(workstation());
    h.dispatch(PerformanceAction::Initialize(HardwareSignals {
        cores: 2,
        memory_gb: Some(1.0),
        ..HardwareSignals::default()
    }));
    assert_eq!(h.detected(), Tier::Ultra);
}

#[test]
fn test_mount_initialize_classifies_default_state() {
    let state = Rc::new(PerformanceState::default());
    assert!(!state.is_initialized());
    assert_eq!(state.active_tier(), Tier::Balanced);

    let state = state.reduce(PerformanceAction::Initialize(workstation()));
    assert!(state.is_initialized());
    assert_eq!(state.active_tier(), Tier::Ultra);

    // A remount dispatches again with fresh signals; the first result stands.
    let again = state.clone().reduce(PerformanceAction::Initialize(HardwareSignals::default()));
    assert!(Rc::ptr_eq(&state, &again));
}

#[test]
fn test_reset_detection_undoes_downgrades() {
    let h = Harness::new(workstation());
    h.clock.run(6, 15);
    assert_eq!(h.detected(), Tier::Balanced);

    h.dispatch(PerformanceAction::ResetDetection);
    assert_eq!(h.detected(), Tier::Ultra);
    assert_eq!(h.state.borrow().watchdog_state(), WatchdogState::Nominal);
}

#[test]
fn test_stopped_watchdog_reports_nothing() {
    let mut h = Harness::new(workstation());
    h.clock.run(1, 60);
    assert_eq!(h.state.borrow().current_fps(), 60);

    h.runner.stop();
    assert!(!h.runner.is_running());
    h.clock.run(6, 10);
    assert_eq!(h.state.borrow().current_fps(), 60);
    assert_eq!(h.detected(), Tier::Ultra);
}

#[test]
fn test_disabling_watchdog_freezes_tier() {
    let h = Harness::new(workstation());
    h.dispatch(PerformanceAction::SetWatchdogEnabled(false));
    h.clock.run(6, 10);
    assert_eq!(h.detected(), Tier::Ultra);
    assert_eq!(h.state.borrow().current_fps(), 0);
}
