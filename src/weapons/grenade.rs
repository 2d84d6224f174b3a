use serde::{Deserialize, Serialize};

use super::{Burst, Jitter, Target, BRIGHT_DEBRIS, SCORCH_STOPS};
use crate::audio::Cue;
use crate::geometry::Point;

/// Blast with a crater, nested burn rings, bright debris and a shake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeParams {
    /// Blast radius
    pub radius: Jitter,
    /// Crater radius as a fraction of the blast radius
    pub crater_ratio: f32,
    /// Number of burn rings
    pub rings: u32,
    /// Each ring grows the blast radius by this fraction
    pub ring_step: f32,
    pub burst: Burst,
    /// Shake intensity in [0, 1]
    pub shake: f32,
}

impl Default for GrenadeParams {
    fn default() -> Self {
        Self {
            radius: Jitter::new(60.0, 30.0),
            crater_ratio: 0.85,
            rings: 4,
            ring_step: 0.25,
            burst: Burst::new(40, 7.0, BRIGHT_DEBRIS),
            shake: 1.0,
        }
    }
}

pub(super) fn detonate(params: &GrenadeParams, target: &mut Target<'_>, at: Point) -> Cue {
    let radius = params.radius.sample(&mut *target.rng);
    for ring in 0..params.rings {
        let ring_radius = radius * (1.0 + ring as f32 * params.ring_step);
        target.layers.scorch_gradient(at, ring_radius, &SCORCH_STOPS);
    }
    target.layers.cut_circle(at, radius * params.crater_ratio);
    target.burst(at, &params.burst);
    target.shake.trigger(params.shake);
    Cue::Explosion
}
