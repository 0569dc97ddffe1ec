//! Visual-quality tier classification.
//!
//! A tier is an ordinal rank from 1 (lowest quality) to 5 (highest). It is a
//! plain `Copy` value used as the key into the tier configuration table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordinal visual-quality rank. `Minimal < Low < Balanced < High < Ultra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Tier {
    /// Static page, no particles, instant transitions
    Minimal = 1,
    /// A few particles, tweened transitions
    Low = 2,
    /// Mid-range default when signals are inconclusive
    Balanced = 3,
    /// Autoplaying media and shared-layout transitions
    High = 4,
    /// Everything on, including the scan-line effect
    Ultra = 5,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 5] = [
        Tier::Minimal,
        Tier::Low,
        Tier::Balanced,
        Tier::High,
        Tier::Ultra,
    ];

    pub const LOWEST: Tier = Tier::Minimal;
    pub const HIGHEST: Tier = Tier::Ultra;

    /// Numeric rank, 1..=5.
    #[inline]
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Map any integer onto a tier, clamping into 1..=5.
    pub fn clamped(level: i64) -> Tier {
        match level {
            i64::MIN..=1 => Tier::Minimal,
            2 => Tier::Low,
            3 => Tier::Balanced,
            4 => Tier::High,
            _ => Tier::Ultra,
        }
    }

    /// One step down the ladder, floored at `Minimal`.
    pub fn step_down(self) -> Tier {
        Tier::clamped(self.level() as i64 - 1)
    }
}

/// Error for integer levels outside 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tier level {0} is outside 1..=5")]
pub struct InvalidTier(pub u8);

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Tier::Minimal),
            2 => Ok(Tier::Low),
            3 => Ok(Tier::Balanced),
            4 => Ok(Tier::High),
            5 => Ok(Tier::Ultra),
            other => Err(InvalidTier(other)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.level()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.level())
    }
}
