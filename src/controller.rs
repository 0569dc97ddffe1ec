//! The performance controller: single source of truth for the active tier.
//!
//! [`PerformanceState`] is created once at the application root and shared
//! through a Yew context as a reducer handle. Actions are the only write
//! path; consumers read `active_tier()` / `active_config()` and never keep a
//! copy of their own.

use crate::hardware::{classify, HardwareSignals};
use crate::monitor::{Watchdog, WatchdogPolicy, WatchdogState};
use crate::tier::Tier;
use crate::tier_config::{lookup, TierConfig};
use log::{debug, info, warn};
use std::rc::Rc;
use yew::functional::Reducible;

#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceAction {
    /// Classify the hardware; sent by the provider when it mounts. Ignored
    /// once the controller is initialized.
    Initialize(HardwareSignals),
    /// Pin a tier, or `None` to go back to automatic.
    SetManualOverride(Option<Tier>),
    SetWatchdogEnabled(bool),
    /// One closed FPS window from the frame loop.
    WindowSampled(u32),
    /// Re-run classification from the captured signals, undoing downgrades.
    ResetDetection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceState {
    signals: Option<HardwareSignals>,
    detected_tier: Tier,
    manual_override: Option<Tier>,
    current_fps: u32,
    watchdog_enabled: bool,
    watchdog: Watchdog,
}

impl Default for PerformanceState {
    fn default() -> Self {
        Self::new(WatchdogPolicy::default())
    }
}

impl PerformanceState {
    pub fn new(policy: WatchdogPolicy) -> Self {
        Self {
            signals: None,
            detected_tier: Tier::Balanced,
            manual_override: None,
            current_fps: 0,
            watchdog_enabled: true,
            watchdog: Watchdog::new(policy),
        }
    }

    /// Controller already initialized from `signals`.
    pub fn detected(signals: HardwareSignals) -> Self {
        let mut state = Self::default();
        state.initialize(signals);
        state
    }

    pub fn is_initialized(&self) -> bool {
        self.signals.is_some()
    }

    pub fn signals(&self) -> Option<&HardwareSignals> {
        self.signals.as_ref()
    }

    pub fn detected_tier(&self) -> Tier {
        self.detected_tier
    }

    pub fn manual_override(&self) -> Option<Tier> {
        self.manual_override
    }

    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.watchdog_enabled
    }

    pub fn watchdog_state(&self) -> WatchdogState {
        self.watchdog.state()
    }

    /// The override if set, otherwise the detected tier.
    pub fn active_tier(&self) -> Tier {
        self.manual_override.unwrap_or(self.detected_tier)
    }

    pub fn active_config(&self) -> &'static TierConfig {
        lookup(self.active_tier())
    }

    /// Classify once. Returns `false` if already initialized.
    pub fn initialize(&mut self, signals: HardwareSignals) -> bool {
        if self.signals.is_some() {
            debug!("Performance controller already initialized");
            return false;
        }
        self.detected_tier = classify(&signals);
        info!(
            "Detected tier {} ({} cores, {:?} GiB, {:?}/{:?})",
            self.detected_tier,
            signals.cores,
            signals.memory_gb,
            signals.platform,
            signals.form_factor
        );
        self.signals = Some(signals);
        true
    }

    pub fn set_manual_override(&mut self, tier: Option<Tier>) {
        if self.manual_override == tier {
            return;
        }
        match tier {
            Some(t) => info!("Tier pinned to {}", t),
            None => info!("Tier back to automatic ({})", self.detected_tier),
        }
        self.manual_override = tier;
    }

    pub fn set_watchdog_enabled(&mut self, enabled: bool) {
        if self.watchdog_enabled == enabled {
            return;
        }
        self.watchdog_enabled = enabled;
        self.watchdog.reset();
        info!("Watchdog {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Feed one FPS window. Only `detected_tier` can move, and only down.
    pub fn record_window(&mut self, fps: u32) {
        if !self.watchdog_enabled {
            return;
        }
        self.current_fps = fps;

        let verdict = self.watchdog.observe(fps, self.manual_override.is_none());
        if verdict.state_changed {
            info!("Watchdog {:?} at {} FPS", verdict.state, fps);
        }
        if verdict.downgrade {
            let next = self.detected_tier.step_down();
            if next != self.detected_tier {
                warn!(
                    "Sustained low frame rate ({} FPS), tier {} -> {}",
                    fps, self.detected_tier, next
                );
                self.detected_tier = next;
            }
        }
    }

    /// Manual reset after downgrades.
    pub fn reset_detection(&mut self) {
        if let Some(signals) = &self.signals {
            self.detected_tier = classify(signals);
            self.watchdog.reset();
            info!("Tier re-detected as {}", self.detected_tier);
        }
    }

    pub fn apply(&mut self, action: PerformanceAction) {
        match action {
            PerformanceAction::Initialize(signals) => {
                self.initialize(signals);
            }
            PerformanceAction::SetManualOverride(tier) => self.set_manual_override(tier),
            PerformanceAction::SetWatchdogEnabled(enabled) => self.set_watchdog_enabled(enabled),
            PerformanceAction::WindowSampled(fps) => self.record_window(fps),
            PerformanceAction::ResetDetection => self.reset_detection(),
        }
    }
}

impl Reducible for PerformanceState {
    type Action = PerformanceAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        if next == *self {
            // Unchanged state keeps the same Rc so consumers skip re-rendering.
            return self;
        }
        Rc::new(next)
    }
}
