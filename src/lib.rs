//! Adaptive-performance portfolio site.
//!
//! Hardware signals pick a starting [`Tier`]; a frame-rate watchdog steps it
//! down when the device keeps dropping frames. Every visual component reads
//! the active [`TierConfig`] from the shared [`PerformanceState`] and branches
//! on its flags.

use log::warn;
use wasm_bindgen::prelude::*;

pub mod activity;
pub mod cache;
pub mod chat;
pub mod components;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod frame_loop;
pub mod hardware;
pub mod hooks;
pub mod monitor;
pub mod particles;
pub mod tier;
pub mod tier_config;
pub mod utils;

pub use config::SiteConfig;
pub use controller::{PerformanceAction, PerformanceState};
pub use error::SiteError;
pub use hardware::{classify, HardwareSignals};
pub use monitor::{FpsSampler, Watchdog, WatchdogPolicy, WatchdogState};
pub use tier::Tier;
pub use tier_config::{lookup, TierConfig};

/// Classify a plain JS object of hardware signals.
///
/// # Arguments
/// * `signals_js` - `{ cores, memory_gb, platform, form_factor, touch_primary }`,
///   any field may be missing
///
/// # Returns
/// Tier level 1..=5. Unreadable input is classified as if every signal were
/// absent.
#[wasm_bindgen]
pub fn classify_hardware(signals_js: JsValue) -> u8 {
    let signals: HardwareSignals = match serde_wasm_bindgen::from_value(signals_js) {
        Ok(s) => s,
        Err(e) => {
            warn!("Unreadable hardware signals, using defaults: {}", e);
            HardwareSignals::default()
        }
    };
    classify(&signals).level()
}

/// Configuration bundle for a tier level, or `null` outside 1..=5.
#[wasm_bindgen]
pub fn tier_config(level: u8) -> JsValue {
    match tier_config::lookup_level(level) {
        Some(config) => serde_wasm_bindgen::to_value(config).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}
