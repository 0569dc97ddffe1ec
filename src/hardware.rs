//! Hardware capability signals and the tier classifier.
//!
//! [`HardwareSignals::capture`] is the only place that touches browser
//! globals; [`classify`] is a pure function over the captured snapshot.

use crate::tier::Tier;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Core count assumed when the browser does not report one.
pub const DEFAULT_CORES: u32 = 4;

static ANDROID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bandroid\b").unwrap());
static IOS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(iphone|ipad|ipod)\b").unwrap());
static TABLET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(ipad|tablet|kindle|silk|playbook)\b").unwrap());
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmobi(le)?\b").unwrap());
static MACINTOSH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmacintosh\b").unwrap());

/// Operating-system family, as far as the user agent tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    #[default]
    Desktop,
    Phone,
    Tablet,
}

/// Read-only snapshot of the client's hardware, taken once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareSignals {
    /// Logical cores; never zero.
    pub cores: u32,
    /// Approximate device memory in GiB. Absent on Safari and Firefox.
    pub memory_gb: Option<f64>,
    pub platform: Platform,
    pub form_factor: FormFactor,
    pub touch_primary: bool,
}

impl Default for HardwareSignals {
    fn default() -> Self {
        Self {
            cores: DEFAULT_CORES,
            memory_gb: None,
            platform: Platform::Other,
            form_factor: FormFactor::Desktop,
            touch_primary: false,
        }
    }
}

impl HardwareSignals {
    /// Build signals from raw navigator values, applying defaults for anything
    /// missing or nonsensical.
    pub fn from_raw(
        hardware_concurrency: Option<f64>,
        device_memory: Option<f64>,
        user_agent: &str,
        max_touch_points: i32,
    ) -> Self {
        let cores = hardware_concurrency
            .filter(|c| c.is_finite() && *c >= 1.0)
            .map(|c| c.round() as u32)
            .unwrap_or(DEFAULT_CORES);
        let memory_gb = device_memory.filter(|m| m.is_finite() && *m > 0.0);

        // iPadOS reports a desktop Safari user agent; touch support gives it away.
        let desktop_class_ipad = MACINTOSH_REGEX.is_match(user_agent) && max_touch_points > 1;

        let platform = if ANDROID_REGEX.is_match(user_agent) {
            Platform::Android
        } else if IOS_REGEX.is_match(user_agent) || desktop_class_ipad {
            Platform::Ios
        } else {
            Platform::Other
        };

        let tablet = TABLET_REGEX.is_match(user_agent)
            || desktop_class_ipad
            || (platform == Platform::Android && !MOBILE_REGEX.is_match(user_agent));
        let form_factor = if tablet {
            FormFactor::Tablet
        } else if platform != Platform::Other || MOBILE_REGEX.is_match(user_agent) {
            FormFactor::Phone
        } else {
            FormFactor::Desktop
        };

        Self {
            cores,
            memory_gb,
            platform,
            form_factor,
            touch_primary: form_factor != FormFactor::Desktop && max_touch_points > 0,
        }
    }

    /// Read the signals from `window.navigator`. Falls back to defaults when
    /// there is no window (e.g. a worker or a host-side test).
    pub fn capture() -> Self {
        let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
            log::warn!("No window available, using default hardware signals");
            return Self::default();
        };

        let concurrency = Some(navigator.hardware_concurrency());
        // Chromium-only; web-sys has no binding for it.
        let memory = js_sys::Reflect::get(&navigator, &"deviceMemory".into())
            .ok()
            .and_then(|v| v.as_f64());
        let user_agent = navigator.user_agent().unwrap_or_default();

        Self::from_raw(
            concurrency,
            memory,
            &user_agent,
            navigator.max_touch_points(),
        )
    }

    pub fn is_mobile(&self) -> bool {
        self.form_factor != FormFactor::Desktop
    }

    pub fn is_tablet(&self) -> bool {
        self.form_factor == FormFactor::Tablet
    }

    fn memory_at_least(&self, gb: f64) -> bool {
        self.memory_gb.is_some_and(|m| m >= gb)
    }

    fn memory_at_most(&self, gb: f64) -> bool {
        self.memory_gb.is_some_and(|m| m <= gb)
    }
}

/// Classify a hardware snapshot into a tier. First matching rule wins.
///
/// Absent memory never satisfies a memory comparison, so phones that hide
/// it fall through to the core-count checks.
pub fn classify(signals: &HardwareSignals) -> Tier {
    let cores = signals.cores.max(1);

    if signals.memory_at_least(16.0) && cores >= 12 {
        return Tier::Ultra;
    }
    if signals.memory_at_least(8.0) && cores >= 8 {
        return Tier::High;
    }
    if signals.is_mobile() {
        let weak_android = signals.platform == Platform::Android
            && (signals.memory_at_most(4.0) || cores <= 4);
        return if weak_android { Tier::Low } else { Tier::Balanced };
    }
    if signals.memory_at_most(2.0) || cores <= 4 {
        return Tier::Minimal;
    }
    if signals.memory_at_most(4.0) {
        return Tier::Low;
    }
    Tier::Balanced
}
