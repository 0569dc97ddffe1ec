//! Decorative particle field simulation.
//!
//! Positions and velocities only; drawing lives in the `ParticleField`
//! component. The particle count comes from the active tier's budget.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Mean drift speed in px/s and its spread.
const SPEED_MEAN: f64 = 14.0;
const SPEED_STD_DEV: f64 = 6.0;
const RADIUS_RANGE: (f64, f64) = (1.0, 2.6);

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    pub width: f64,
    pub height: f64,
    pub particles: Vec<Particle>,
}

impl ParticleField {
    /// Scatter `count` particles uniformly over a `width` × `height` area.
    pub fn spawn<R: Rng + ?Sized>(count: u32, width: f64, height: f64, rng: &mut R) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let speed = Normal::new(SPEED_MEAN, SPEED_STD_DEV).ok();

        let particles = (0..count)
            .map(|_| {
                let heading = rng.random_range(0.0..std::f64::consts::TAU);
                let v = speed.map_or(SPEED_MEAN, |d| d.sample(rng)).abs();
                Particle {
                    x: rng.random_range(0.0..width),
                    y: rng.random_range(0.0..height),
                    vx: heading.cos() * v,
                    vy: heading.sin() * v,
                    radius: rng.random_range(RADIUS_RANGE.0..RADIUS_RANGE.1),
                }
            })
            .collect();

        Self {
            width,
            height,
            particles,
        }
    }

    /// Advance by `dt_s` seconds, wrapping around the edges.
    pub fn step(&mut self, dt_s: f64) {
        // Tab switches produce huge deltas; don't teleport.
        let dt = dt_s.clamp(0.0, 0.1);
        for p in &mut self.particles {
            p.x = (p.x + p.vx * dt).rem_euclid(self.width);
            p.y = (p.y + p.vy * dt).rem_euclid(self.height);
        }
    }

    /// Fit the field to a new viewport, scaling positions proportionally.
    pub fn resize(&mut self, width: f64, height: f64) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let (sx, sy) = (width / self.width, height / self.height);
        for p in &mut self.particles {
            p.x = (p.x * sx).min(width - f64::EPSILON).max(0.0);
            p.y = (p.y * sy).min(height - f64::EPSILON).max(0.0);
        }
        self.width = width;
        self.height = height;
    }

    /// Index pairs closer than `max_distance`, with a 0..1 closeness weight
    /// used as line opacity.
    pub fn links(&self, max_distance: f64) -> Vec<(usize, usize, f64)> {
        let max_sq = max_distance * max_distance;
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let d_sq = dx * dx + dy * dy;
                if d_sq < max_sq {
                    out.push((i, j, 1.0 - d_sq.sqrt() / max_distance));
                }
            }
        }
        out
    }
}
