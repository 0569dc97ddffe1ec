//! Static tier → configuration bundle table.
//!
//! Every visual consumer branches on the [`TierConfig`] of the active tier.
//! The table is ordered as a quality ladder: anything enabled at tier N stays
//! enabled at tier N + 1.

use crate::tier::Tier;
use serde::Serialize;

/// How the project modal opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalPreset {
    Instant,
    Tween,
    SpringSimple,
    SpringFull,
    SpringEnhanced,
}

impl ModalPreset {
    pub fn css_class(self) -> &'static str {
        match self {
            ModalPreset::Instant => "modal--instant",
            ModalPreset::Tween => "modal--tween",
            ModalPreset::SpringSimple => "modal--spring-simple",
            ModalPreset::SpringFull => "modal--spring-full",
            ModalPreset::SpringEnhanced => "modal--spring-enhanced",
        }
    }
}

/// How project cards appear when scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealPreset {
    Fade,
    Slide,
    Spring,
}

impl RevealPreset {
    pub fn css_class(self) -> &'static str {
        match self {
            RevealPreset::Fade => "reveal--fade",
            RevealPreset::Slide => "reveal--slide",
            RevealPreset::Spring => "reveal--spring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// Motion parameters shared by modal and card transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Motion {
    Tween { duration_s: f32, easing: Easing },
    Spring { stiffness: f32, damping: f32 },
}

impl Motion {
    /// Approximate settle time of the motion in seconds.
    ///
    /// Springs use unit mass: the envelope decays as `exp(-damping / 2 * t)`,
    /// settled once it drops under 1%.
    pub fn settle_time_s(&self) -> f32 {
        match *self {
            Motion::Tween { duration_s, .. } => duration_s,
            Motion::Spring { damping, .. } => {
                if damping <= 0.0 {
                    return 1.0;
                }
                ((2.0 * 4.6 / damping).min(1.2) * 100.0).round() / 100.0
            }
        }
    }

    /// CSS `transition` value for the given property list.
    pub fn css_transition(&self, properties: &str) -> String {
        let duration = self.settle_time_s();
        let timing = match *self {
            Motion::Tween { easing, .. } => easing.css().to_string(),
            Motion::Spring { stiffness, damping } => {
                // Underdamped springs overshoot; express that as a y1 > 1 bezier.
                let ratio = damping / (2.0 * stiffness.max(1.0).sqrt());
                let overshoot = (1.0 + (1.0 - ratio).clamp(0.0, 1.0) * 0.6).min(1.6);
                format!("cubic-bezier(0.34, {:.2}, 0.64, 1)", overshoot)
            }
        };
        properties
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("{} {:.2}s {}", p, duration, timing))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Feature flags and animation presets for one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierConfig {
    pub tier: Tier,
    pub name: &'static str,
    pub icon: &'static str,
    pub particle_budget: u32,
    pub blur: bool,
    pub video_autoplay: bool,
    pub particle_lines: bool,
    pub shared_layout: bool,
    pub scan_lines: bool,
    pub modal: ModalPreset,
    pub reveal: RevealPreset,
    pub motion: Motion,
}

impl TierConfig {
    /// Boolean feature flags in a fixed order, for ladder checks and display.
    pub fn flags(&self) -> [(&'static str, bool); 5] {
        [
            ("blur", self.blur),
            ("video", self.video_autoplay),
            ("lines", self.particle_lines),
            ("layout", self.shared_layout),
            ("scanlines", self.scan_lines),
        ]
    }
}

static TIER_TABLE: [TierConfig; 5] = [
    TierConfig {
        tier: Tier::Minimal,
        name: "Minimal",
        icon: "🔋",
        particle_budget: 0,
        blur: false,
        video_autoplay: false,
        particle_lines: false,
        shared_layout: false,
        scan_lines: false,
        modal: ModalPreset::Instant,
        reveal: RevealPreset::Fade,
        motion: Motion::Tween {
            duration_s: 0.15,
            easing: Easing::Linear,
        },
    },
    TierConfig {
        tier: Tier::Low,
        name: "Low",
        icon: "🌱",
        particle_budget: 20,
        blur: false,
        video_autoplay: false,
        particle_lines: false,
        shared_layout: false,
        scan_lines: false,
        modal: ModalPreset::Tween,
        reveal: RevealPreset::Fade,
        motion: Motion::Tween {
            duration_s: 0.25,
            easing: Easing::EaseOut,
        },
    },
    TierConfig {
        tier: Tier::Balanced,
        name: "Balanced",
        icon: "⚖️",
        particle_budget: 45,
        blur: true,
        video_autoplay: false,
        particle_lines: true,
        shared_layout: false,
        scan_lines: false,
        modal: ModalPreset::SpringSimple,
        reveal: RevealPreset::Slide,
        motion: Motion::Tween {
            duration_s: 0.35,
            easing: Easing::EaseInOut,
        },
    },
    TierConfig {
        tier: Tier::High,
        name: "High",
        icon: "🚀",
        particle_budget: 70,
        blur: true,
        video_autoplay: true,
        particle_lines: true,
        shared_layout: true,
        scan_lines: false,
        modal: ModalPreset::SpringFull,
        reveal: RevealPreset::Spring,
        motion: Motion::Spring {
            stiffness: 300.0,
            damping: 30.0,
        },
    },
    TierConfig {
        tier: Tier::Ultra,
        name: "Ultra",
        icon: "💎",
        particle_budget: 100,
        blur: true,
        video_autoplay: true,
        particle_lines: true,
        shared_layout: true,
        scan_lines: true,
        modal: ModalPreset::SpringEnhanced,
        reveal: RevealPreset::Spring,
        motion: Motion::Spring {
            stiffness: 400.0,
            damping: 25.0,
        },
    },
];

/// Configuration bundle for a tier. Total: every `Tier` has an entry.
pub fn lookup(tier: Tier) -> &'static TierConfig {
    &TIER_TABLE[(tier.level() - 1) as usize]
}

/// Lookup by raw level; `None` for anything outside 1..=5.
pub fn lookup_level(level: u8) -> Option<&'static TierConfig> {
    Tier::try_from(level).ok().map(lookup)
}
