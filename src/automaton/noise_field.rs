//! Continuous 2D noise sampling and the rotating edge-supply points that
//! ride on top of it.
//!
//! The mantle updater needs a continuous `n(x, y)` noise function
//! (`spec.md §4.2` step 1). `fastnoise-lite` gives us that directly; we use
//! a single `OpenSimplex2` octave (no fractal stacking) since the spec
//! already pre-scales coordinates by `0.1` itself.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use std::f64::consts::{PI, TAU};

use crate::rng::EngineRng;

pub struct NoiseField {
    noise: FastNoiseLite,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Sample `n(x*0.1 + offsetX, y*0.1 + offsetY)`, per `spec.md §4.2`.
    pub fn sample(&self, x: u16, y: u16) -> f64 {
        let sx = x as f64 * 0.1 + self.offset_x;
        let sy = y as f64 * 0.1 + self.offset_y;
        self.noise.get_noise_2d(sx as f32, sy as f32) as f64
    }

    pub fn advance(&mut self, distortion_speed: f64) {
        self.offset_x += distortion_speed;
        self.offset_y += distortion_speed;
    }
}

/// A rotating angular source injecting energy into the land's radial edge
/// band (`spec.md §3`, `§4.2` step 5).
#[derive(Debug, Clone, Copy)]
pub struct SupplyPoint {
    pub angle: f64,
    pub speed: f64,
    /// Current oscillation phase, advanced by `frequency` each tick.
    pub phase: f64,
    pub frequency: f64,
}

/// Amplitude of the oscillation term layered on top of `speed`.
const OSCILLATION_AMPLITUDE: f64 = 0.01;

impl SupplyPoint {
    pub fn new(angle: f64, speed: f64, frequency: f64, rng: &mut EngineRng) -> Self {
        Self {
            angle,
            speed,
            phase: rng.range(0.0, TAU),
            frequency,
        }
    }

    /// `angle += speed + small_random_oscillation(phase, frequency)`,
    /// wrapped to `[0, 2π)`.
    pub fn advance(&mut self, rng: &mut EngineRng) {
        let oscillation = OSCILLATION_AMPLITUDE * self.phase.sin() * rng.range(0.5, 1.5);
        self.phase += self.frequency;
        self.angle = (self.angle + self.speed + oscillation).rem_euclid(TAU);
    }
}

/// Signed circular distance from `angle` to `target`, in `[0, π]`.
pub fn circular_distance(angle: f64, target: f64) -> f64 {
    let diff = (angle - target).rem_euclid(TAU);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_deterministic_for_a_given_seed() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        assert_eq!(a.sample(10, 20), b.sample(10, 20));
    }

    #[test]
    fn advance_shifts_the_sampled_domain() {
        let mut a = NoiseField::new(7);
        let before = a.sample(10, 20);
        a.advance(5.0);
        let after = a.sample(10, 20);
        assert_ne!(before, after);
    }

    #[test]
    fn circular_distance_wraps_around_zero() {
        assert!((circular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn circular_distance_is_symmetric_and_bounded() {
        let d = circular_distance(1.0, 4.5);
        assert!(d <= PI + 1e-9);
        assert!((d - circular_distance(4.5, 1.0)).abs() < 1e-9);
    }
}
