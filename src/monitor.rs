//! Frame-rate sampling and the watchdog state machine.
//!
//! [`FpsSampler`] turns per-frame timestamps into one FPS value per window of
//! wall-clock time. [`Watchdog`] consumes those window values: it tracks the
//! `Nominal`/`Struggling` signal with asymmetric hysteresis and, separately,
//! counts hard-floor misses to request tier downgrades.

use crate::config::{
    DOWNGRADE_EVERY_N_WINDOWS, DOWNGRADE_FPS_FLOOR, FPS_WINDOW_MS, RECOVER_ABOVE_FPS,
    RECOVER_AFTER_WINDOWS, STRUGGLE_AFTER_WINDOWS, STRUGGLE_BELOW_FPS,
};
use serde::Serialize;

/// Counts frames and emits a rounded FPS figure once per window.
#[derive(Debug, Clone, PartialEq)]
pub struct FpsSampler {
    window_ms: f64,
    frames: u32,
    window_start: Option<f64>,
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self::new(FPS_WINDOW_MS)
    }
}

impl FpsSampler {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            frames: 0,
            window_start: None,
        }
    }

    /// Record one rendered frame at `now_ms` (a monotonic timestamp such as
    /// `performance.now()`). Returns the FPS of the window that just closed.
    ///
    /// The first call only anchors the window boundary.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now_ms);
            return None;
        };

        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed < self.window_ms {
            return None;
        }

        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = Some(now_ms);
        Some(fps)
    }

    /// Forget the current window, e.g. after the loop was paused.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.window_start = None;
    }
}

/// Thresholds for the watchdog. `Default` is the reference policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogPolicy {
    /// A window below this FPS counts towards `Struggling`
    pub struggle_below: u32,
    /// Consecutive low windows needed to flip to `Struggling`
    pub struggle_after: u32,
    /// A window above this FPS counts towards `Nominal`
    pub recover_above: u32,
    /// Consecutive high windows needed to flip back to `Nominal`
    pub recover_after: u32,
    /// A window below this FPS counts towards a tier downgrade
    pub downgrade_floor: u32,
    /// Number of floor misses per downgrade request
    pub downgrade_every: u32,
}

impl Default for WatchdogPolicy {
    fn default() -> Self {
        Self {
            struggle_below: STRUGGLE_BELOW_FPS,
            struggle_after: STRUGGLE_AFTER_WINDOWS,
            recover_above: RECOVER_ABOVE_FPS,
            recover_after: RECOVER_AFTER_WINDOWS,
            downgrade_floor: DOWNGRADE_FPS_FLOOR,
            downgrade_every: DOWNGRADE_EVERY_N_WINDOWS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WatchdogState {
    #[default]
    Nominal,
    Struggling,
}

/// Outcome of feeding one window into the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowVerdict {
    pub state: WatchdogState,
    pub state_changed: bool,
    pub downgrade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Watchdog {
    policy: WatchdogPolicy,
    state: WatchdogState,
    low_streak: u32,
    high_streak: u32,
    floor_misses: u32,
}

impl Watchdog {
    pub fn new(policy: WatchdogPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn policy(&self) -> WatchdogPolicy {
        self.policy
    }

    /// Feed one window's FPS.
    ///
    /// `downgrade_armed` is false while a manual override is active; floor
    /// misses seen then are dropped rather than queued.
    pub fn observe(&mut self, fps: u32, downgrade_armed: bool) -> WindowVerdict {
        let previous = self.state;

        if fps < self.policy.struggle_below {
            self.low_streak += 1;
            self.high_streak = 0;
        } else if fps > self.policy.recover_above {
            self.high_streak += 1;
            self.low_streak = 0;
        } else {
            self.low_streak = 0;
            self.high_streak = 0;
        }

        match self.state {
            WatchdogState::Nominal if self.low_streak >= self.policy.struggle_after => {
                self.state = WatchdogState::Struggling;
                self.low_streak = 0;
            }
            WatchdogState::Struggling if self.high_streak >= self.policy.recover_after => {
                self.state = WatchdogState::Nominal;
                self.high_streak = 0;
            }
            _ => {}
        }

        let mut downgrade = false;
        if !downgrade_armed {
            self.floor_misses = 0;
        } else if fps < self.policy.downgrade_floor {
            self.floor_misses += 1;
            if self.floor_misses >= self.policy.downgrade_every.max(1) {
                self.floor_misses = 0;
                downgrade = true;
            }
        }

        WindowVerdict {
            state: self.state,
            state_changed: self.state != previous,
            downgrade,
        }
    }

    /// Back to `Nominal` with all counters cleared.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(watchdog: &mut Watchdog, samples: &[u32]) -> Vec<WindowVerdict> {
        samples.iter().map(|&fps| watchdog.observe(fps, true)).collect()
    }

    #[test]
    fn test_sampler_first_frame_anchors_window() {
        let mut sampler = FpsSampler::default();
        assert_eq!(sampler.record_frame(0.0), None);
        for i in 1..60 {
            assert_eq!(sampler.record_frame(i as f64 * 1000.0 / 60.0), None);
        }
        assert_eq!(sampler.record_frame(1000.0), Some(60));
    }

    #[test]
    fn test_sampler_uses_elapsed_time_not_frame_count() {
        let mut sampler = FpsSampler::default();
        sampler.record_frame(0.0);
        // 144 Hz display
        let mut last = None;
        for i in 1..=144 {
            last = sampler.record_frame(i as f64 * 1000.0 / 144.0);
        }
        assert_eq!(last, Some(144));

        // A long stall: 10 frames over 2 seconds
        let base = 1000.0;
        let mut out = None;
        for i in 1..=10 {
            out = out.or(sampler.record_frame(base + i as f64 * 200.0));
        }
        assert_eq!(out, Some(5));
    }

    #[test]
    fn test_sampler_reset() {
        let mut sampler = FpsSampler::default();
        sampler.record_frame(0.0);
        sampler.record_frame(500.0);
        sampler.reset();
        assert_eq!(sampler.record_frame(5000.0), None);
        assert_eq!(sampler.record_frame(6000.0), Some(1));
    }

    #[test]
    fn test_two_low_windows_flip_to_struggling() {
        let mut watchdog = Watchdog::default();
        let verdicts = feed(&mut watchdog, &[60, 20, 20]);
        assert_eq!(verdicts[1].state, WatchdogState::Nominal);
        assert_eq!(verdicts[2].state, WatchdogState::Struggling);
        assert!(verdicts[2].state_changed);
    }

    #[test]
    fn test_single_low_window_never_flips() {
        let mut watchdog = Watchdog::new(WatchdogPolicy::default());
        let verdicts = feed(&mut watchdog, &[60, 60, 12, 60, 60, 12, 60]);
        assert!(verdicts.iter().all(|v| v.state == WatchdogState::Nominal));
    }

    #[test]
    fn test_recovery_needs_longer_run() {
        let mut watchdog = Watchdog::new(WatchdogPolicy::default());
        feed(&mut watchdog, &[20, 20]);
        assert_eq!(watchdog.state(), WatchdogState::Struggling);

        let verdicts = feed(&mut watchdog, &[60, 60, 60, 60]);
        assert!(verdicts.iter().all(|v| v.state == WatchdogState::Struggling));
        let last = watchdog.observe(60, true);
        assert_eq!(last.state, WatchdogState::Nominal);
        assert!(last.state_changed);
    }

    #[test]
    fn test_hovering_between_thresholds_resets_streaks() {
        let mut watchdog = Watchdog::new(WatchdogPolicy::default());
        feed(&mut watchdog, &[20, 40, 20, 40, 20]);
        assert_eq!(watchdog.state(), WatchdogState::Nominal);

        feed(&mut watchdog, &[20, 20]);
        feed(&mut watchdog, &[60, 60, 60, 40, 60, 60, 60]);
        assert_eq!(watchdog.state(), WatchdogState::Struggling);
    }

    #[test]
    fn test_every_third_floor_miss_requests_downgrade() {
        let mut watchdog = Watchdog::new(WatchdogPolicy::default());
        let verdicts = feed(&mut watchdog, &[10, 60, 10, 60, 10, 10, 10, 10]);
        let downgrades: Vec<usize> = verdicts
            .iter()
            .enumerate()
            .filter(|(_, v)| v.downgrade)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(downgrades, vec![4, 7]);
    }

    #[test]
    fn test_disarmed_windows_are_not_queued() {
        let mut watchdog = Watchdog::new(WatchdogPolicy::default());
        assert!(!watchdog.observe(10, true).downgrade);
        assert!(!watchdog.observe(10, true).downgrade);
        // Override pinned: misses are dropped, and the partial count too.
        for _ in 0..10 {
            assert!(!watchdog.observe(10, false).downgrade);
        }
        assert!(!watchdog.observe(10, true).downgrade);
        assert!(!watchdog.observe(10, true).downgrade);
        assert!(watchdog.observe(10, true).downgrade);
    }

    #[test]
    fn test_reset_keeps_policy() {
        let policy = WatchdogPolicy {
            struggle_after: 1,
            ..WatchdogPolicy::default()
        };
        let mut watchdog = Watchdog::new(policy);
        watchdog.observe(5, true);
        assert_eq!(watchdog.state(), WatchdogState::Struggling);
        watchdog.reset();
        assert_eq!(watchdog.state(), WatchdogState::Nominal);
        assert_eq!(watchdog.policy(), policy);
    }
}
