use serde::{Deserialize, Deserializer, Serialize};

use super::{Burst, Jitter, Target, NEUTRAL_DEBRIS};
use crate::audio::Cue;
use crate::geometry::Point;

/// A cutting stroke that follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BladeParams {
    /// Stroke width
    pub width: Jitter,
    /// Debris thrown from the leading end of each stroke segment
    pub burst: Burst,
}

impl BladeParams {
    /// Narrow cut, light debris
    pub fn knife() -> Self {
        Self {
            width: Jitter::new(5.5, 1.0),
            burst: Burst::new(6, 2.0, NEUTRAL_DEBRIS),
        }
    }

    /// Wide hack, heavier debris
    pub fn machete() -> Self {
        Self {
            width: Jitter::new(13.5, 1.0),
            burst: Burst::new(10, 3.0, NEUTRAL_DEBRIS),
        }
    }
}

/// Blade settings as written in a config file, any field may be missing
#[derive(Deserialize)]
struct PartialBlade {
    width: Option<Jitter>,
    burst: Option<Burst>,
}

impl PartialBlade {
    fn or(self, defaults: BladeParams) -> BladeParams {
        BladeParams {
            width: self.width.unwrap_or(defaults.width),
            burst: self.burst.unwrap_or(defaults.burst),
        }
    }
}

pub(super) fn knife_with_defaults<'de, D: Deserializer<'de>>(de: D) -> Result<BladeParams, D::Error> {
    Ok(PartialBlade::deserialize(de)?.or(BladeParams::knife()))
}

pub(super) fn machete_with_defaults<'de, D: Deserializer<'de>>(de: D) -> Result<BladeParams, D::Error> {
    Ok(PartialBlade::deserialize(de)?.or(BladeParams::machete()))
}

pub(super) fn slash(params: &BladeParams, target: &mut Target<'_>, from: Point, to: Point, cue: Cue) -> Cue {
    let width = params.width.sample(&mut *target.rng);
    target.layers.cut_stroke(from, to, width);
    target.burst(to, &params.burst);
    cue
}
