//! Screen shake
//!
//! Intensity in [0, 1] decays geometrically each frame and snaps to zero
//! once it gets small, so it always ends in a bounded number of frames.

use rand::Rng;

use crate::geometry::Point;
use crate::util::signed_unit;

/// Fraction of intensity kept per frame
pub const DECAY: f32 = 0.9;
/// Below this the shake stops outright
pub const EPSILON: f32 = 0.02;
/// Largest offset in logical units, at full intensity
pub const MAGNITUDE: f32 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shake {
    intensity: f32,
}

impl Shake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn is_active(&self) -> bool {
        self.intensity > 0.0
    }

    /// Start (or restart) a shake; values are clamped to [0, 1]
    pub fn trigger(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn stop(&mut self) {
        self.intensity = 0.0;
    }

    /// Offset for this frame, then decay. Returns the origin when idle.
    pub fn advance(&mut self, rng: &mut impl Rng) -> Point {
        if !self.is_active() {
            return Point::default();
        }
        let mag = self.intensity * MAGNITUDE;
        let offset = Point::new(signed_unit(rng) * mag, signed_unit(rng) * mag);
        self.intensity *= DECAY;
        if self.intensity < EPSILON {
            self.intensity = 0.0;
        }
        offset
    }
}
