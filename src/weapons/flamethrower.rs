use serde::{Deserialize, Serialize};

use super::{Jitter, Target, SCORCH_STOPS};
use crate::audio::Cue;
use crate::geometry::Point;
use crate::util::signed_unit;

/// A jet of flame: wide burn with a small hole near its core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameParams {
    /// Jet radius; also the spacing of dabs along a drag
    pub radius: Jitter,
    /// Hole radius as a fraction of the jet radius
    pub hole_ratio: f32,
    /// Burn radius as a fraction of the jet radius
    pub scorch_ratio: f32,
    /// Largest offset of the hole from the jet centre, per axis
    pub center_jitter: f32,
}

impl Default for FlameParams {
    fn default() -> Self {
        Self {
            radius: Jitter::new(18.0, 8.0),
            hole_ratio: 0.25,
            scorch_ratio: 1.2,
            center_jitter: 3.0,
        }
    }
}

pub(super) fn burn(params: &FlameParams, target: &mut Target<'_>, at: Point) -> Cue {
    dab(params, target, at);
    Cue::Flame
}

/// Dab along `from -> to`, one per jet radius of travel, ending on `to`.
/// Steps outside the target bounds are skipped.
pub(super) fn sweep(params: &FlameParams, target: &mut Target<'_>, from: Point, to: Point) -> Cue {
    let spacing = params.radius.base.max(1.0);
    let steps = (from.distance_to(&to) / spacing).ceil().max(1.0) as usize;
    for i in 1..=steps {
        let at = from.lerp(&to, i as f32 / steps as f32);
        if target.bounds.contains(at) {
            dab(params, target, at);
        }
    }
    Cue::Flame
}

fn dab(params: &FlameParams, target: &mut Target<'_>, at: Point) {
    let radius = params.radius.sample(&mut *target.rng);
    target
        .layers
        .scorch_gradient(at, radius * params.scorch_ratio, &SCORCH_STOPS);

    let spread = params.center_jitter.max(0.0);
    let hole = Point::new(
        at.x + signed_unit(&mut *target.rng) * spread,
        at.y + signed_unit(&mut *target.rng) * spread,
    );
    target.layers.cut_circle(hole, radius * params.hole_ratio);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Bench;
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_burn_scorches_wide_and_cuts_small() {
        let mut bench = Bench::new(100.0, 100.0);
        let at = Point::new(50.0, 50.0);
        let cue = burn(&FlameParams::default(), &mut bench.target(), at);
        assert_eq!(cue, Cue::Flame);

        assert!(bench.layers.scorch_at(at) > 0.4);
        // Burn radius is at least 21.6
        assert!(bench.layers.scorch_at(Point::new(65.0, 50.0)) > 0.0);
        // ...and below 31.2
        assert_eq!(bench.layers.scorch_at(Point::new(83.0, 50.0)), 0.0);

        // Hole radius in [4.5, 6.5), centre within 3 per axis
        assert!(bench.layers.damage_at(at) > 0.0);
        let area = bench.layers.damage_coverage();
        assert!(area > 40.0 && area < 160.0, "area {}", area);
        assert_eq!(bench.layers.damage_at(Point::new(62.0, 50.0)), 0.0);

        assert!(bench.particles.is_empty());
        assert!(!bench.shake.is_active());
    }

    #[test]
    fn test_sweep_leaves_dabs_up_to_current_point() {
        let mut bench = Bench::new(100.0, 100.0);
        let (from, to) = (Point::new(10.0, 50.0), Point::new(90.0, 50.0));
        sweep(&FlameParams::default(), &mut bench.target(), from, to);

        // 80 units at 18 per dab: five dabs at x = 26, 42, 58, 74, 90
        for x in [26.0, 42.0, 58.0, 74.0, 90.0] {
            assert!(bench.layers.damage_at(Point::new(x, 50.0)) > 0.0, "no dab at x={}", x);
        }
        assert!(bench.layers.scorch_at(from) > 0.0);
        assert!(bench.layers.scorch_at(to) > 0.0);
        // Nothing burns well off the path
        assert_eq!(bench.layers.scorch_at(Point::new(50.0, 5.0)), 0.0);
    }

    #[test]
    fn test_sweep_skips_steps_outside_bounds() {
        let mut bench = Bench::new(200.0, 100.0);
        bench.bounds = Rect::new(100.0, 0.0, 100.0, 100.0);
        let (from, to) = (Point::new(0.0, 50.0), Point::new(120.0, 50.0));
        sweep(&FlameParams::default(), &mut bench.target(), from, to);

        assert!(bench.layers.damage_at(to) > 0.0);
        assert_eq!(bench.layers.scorch_at(Point::new(20.0, 50.0)), 0.0);
        assert_eq!(bench.layers.damage_at(Point::new(60.0, 50.0)), 0.0);
    }

    #[test]
    fn test_short_sweep_places_one_dab() {
        let mut one = Bench::new(60.0, 60.0);
        let mut burned = Bench::new(60.0, 60.0);
        let p = Point::new(30.0, 30.0);
        sweep(&FlameParams::default(), &mut one.target(), p, p);
        burn(&FlameParams::default(), &mut burned.target(), p);
        // Same seed, same single dab
        assert_eq!(one.layers.damage_coverage(), burned.layers.damage_coverage());
        assert_eq!(one.layers.scorch_coverage(), burned.layers.scorch_coverage());
    }
}
