//! Single-channel coverage raster used as a cutout mask

use crate::geometry::{distance_to_segment, Point};

/// Per-pixel coverage in [0, 255]. Shapes are unioned source-over, so
/// painting can only ever add coverage.
#[derive(Clone, Default)]
pub struct CoverageMask {
    coverage: Vec<u8>,
    width: u32,
    height: u32,
}

impl CoverageMask {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            coverage: vec![0; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::with_size(width, height);
    }

    pub fn clear(&mut self) {
        self.coverage.fill(0);
    }

    /// Coverage at (x, y); 0 outside the mask
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.coverage[(y as usize) * (self.width as usize) + x as usize]
        } else {
            0
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: i32, y: i32, value: u8) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.coverage[(y as usize) * (self.width as usize) + x as usize] = value;
        }
    }

    /// Opaque disc, antialiased over one pixel at the rim
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let center = Point::new(cx, cy);
        self.paint(cx - radius, cy - radius, cx + radius, cy + radius, |p| {
            radius + 0.5 - p.distance_to(&center)
        });
    }

    /// Opaque stroke from `a` to `b` with round caps and joins
    pub fn stroke_line(&mut self, a: Point, b: Point, width: f32) {
        let half = width * 0.5;
        if half <= 0.0 {
            return;
        }
        self.paint(
            a.x.min(b.x) - half,
            a.y.min(b.y) - half,
            a.x.max(b.x) + half,
            a.y.max(b.y) + half,
            |p| half + 0.5 - distance_to_segment(p, a, b),
        );
    }

    /// Visit every pixel in the bounding box, asking `coverage_at` how much of
    /// the pixel centre the shape covers, and union it in.
    fn paint(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32, coverage_at: impl Fn(Point) -> f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x_start = (min_x.floor() as i32).max(0);
        let y_start = (min_y.floor() as i32).max(0);
        let x_end = (max_x.ceil() as i32).min(self.width as i32 - 1);
        let y_end = (max_y.ceil() as i32).min(self.height as i32 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                let cov = coverage_at(Point::new(x as f32 + 0.5, y as f32 + 0.5)).clamp(0.0, 1.0);
                if cov <= 0.0 {
                    continue;
                }
                let idx = (y as usize) * (self.width as usize) + x as usize;
                let old = self.coverage[idx] as f32 / 255.0;
                let merged = cov + old * (1.0 - cov);
                self.coverage[idx] = ((merged * 255.0).round() as u8).max(self.coverage[idx]);
            }
        }
    }

    /// Total coverage in pixel units
    pub fn coverage_sum(&self) -> f64 {
        self.coverage.iter().map(|&c| f64::from(c) / 255.0).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_circle_area_close_to_analytic() {
        let mut mask = CoverageMask::with_size(64, 64);
        mask.fill_circle(32.0, 32.0, 10.0);
        let area = mask.coverage_sum();
        let expected = PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05, "area {}", area);
        assert_eq!(mask.get(32, 32), 255);
        assert_eq!(mask.get(32, 50), 0);
    }

    #[test]
    fn test_overlap_stays_opaque() {
        let mut mask = CoverageMask::with_size(32, 32);
        mask.fill_circle(16.0, 16.0, 6.0);
        mask.fill_circle(18.0, 16.0, 6.0);
        assert_eq!(mask.get(17, 16), 255);
    }

    #[test]
    fn test_painting_never_reduces_coverage() {
        let mut mask = CoverageMask::with_size(40, 40);
        mask.fill_circle(10.0, 10.0, 5.3);
        let before: Vec<u8> = (0..40).flat_map(|y| (0..40).map(move |x| (x, y))).map(|(x, y)| mask.get(x, y)).collect();
        mask.stroke_line(Point::new(0.0, 12.0), Point::new(39.0, 12.0), 3.0);
        for (i, old) in before.iter().enumerate() {
            let (x, y) = ((i % 40) as i32, (i / 40) as i32);
            assert!(mask.get(x, y) >= *old);
        }
    }

    #[test]
    fn test_stroke_has_round_caps() {
        let mut mask = CoverageMask::with_size(40, 20);
        mask.stroke_line(Point::new(10.0, 10.0), Point::new(30.0, 10.0), 6.0);
        assert_eq!(mask.get(20, 10), 255);
        // Within the cap radius beyond the endpoint
        assert_eq!(mask.get(31, 10), 255);
        assert_eq!(mask.get(35, 10), 0);
        assert_eq!(mask.get(20, 15), 0);
    }

    #[test]
    fn test_shapes_clip_to_mask() {
        let mut mask = CoverageMask::with_size(10, 10);
        mask.fill_circle(-5.0, -5.0, 8.0);
        mask.stroke_line(Point::new(-20.0, 50.0), Point::new(50.0, 50.0), 4.0);
        assert!(mask.get(0, 0) > 0);
        assert_eq!(mask.get(-1, 0), 0);
    }

    #[test]
    fn test_clear_empties() {
        let mut mask = CoverageMask::with_size(10, 10);
        mask.fill_circle(5.0, 5.0, 3.0);
        assert!(!mask.is_empty());
        mask.clear();
        assert!(mask.is_empty());
        assert_eq!(mask.coverage_sum(), 0.0);
    }
}
