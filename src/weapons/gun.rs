use serde::{Deserialize, Serialize};

use super::{Burst, Jitter, Target, NEUTRAL_DEBRIS};
use crate::audio::Cue;
use crate::geometry::Point;

/// A single bullet hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunParams {
    /// Hole radius
    pub radius: Jitter,
    pub burst: Burst,
}

impl Default for GunParams {
    fn default() -> Self {
        Self {
            radius: Jitter::new(8.0, 5.0),
            burst: Burst::new(10, 3.0, NEUTRAL_DEBRIS),
        }
    }
}

pub(super) fn fire(params: &GunParams, target: &mut Target<'_>, at: Point) -> Cue {
    let radius = params.radius.sample(&mut *target.rng);
    target.layers.cut_circle(at, radius);
    target.burst(at, &params.burst);
    Cue::Gunshot
}
