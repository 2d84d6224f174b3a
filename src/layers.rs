//! Damage and scorch layers
//!
//! Both layers cover the whole surface at device resolution and are always
//! reallocated and cleared together. Drawing methods take logical
//! coordinates.

use crate::display::{CoverageMask, GradientStop, PixelBuffer};
use crate::geometry::{Point, Surface};

pub struct LayerBuffers {
    damage: CoverageMask,
    scorch: PixelBuffer,
    scale: f32,
}

impl LayerBuffers {
    pub fn new(surface: &Surface) -> Self {
        Self {
            damage: CoverageMask::with_size(surface.pixel_width(), surface.pixel_height()),
            scorch: PixelBuffer::with_size(surface.pixel_width(), surface.pixel_height()),
            scale: surface.scale,
        }
    }

    /// Reallocate both layers for `surface`; all accumulated marks are lost
    pub fn resize(&mut self, surface: &Surface) {
        self.damage.resize(surface.pixel_width(), surface.pixel_height());
        self.scorch.resize(surface.pixel_width(), surface.pixel_height());
        self.scale = surface.scale;
    }

    /// Wipe both layers back to intact and untinted
    pub fn clear(&mut self) {
        self.damage.clear();
        self.scorch.clear_transparent();
    }

    pub fn damage(&self) -> &CoverageMask {
        &self.damage
    }

    pub fn scorch(&self) -> &PixelBuffer {
        &self.scorch
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    // ========================================================================
    // Painting
    // ========================================================================

    /// Punch a round hole
    pub fn cut_circle(&mut self, center: Point, radius: f32) {
        let c = center.scaled(self.scale);
        self.damage.fill_circle(c.x, c.y, radius * self.scale);
    }

    /// Slash from `from` to `to` with round ends
    pub fn cut_stroke(&mut self, from: Point, to: Point, width: f32) {
        self.damage
            .stroke_line(from.scaled(self.scale), to.scaled(self.scale), width * self.scale);
    }

    /// Lay down a burn mark
    pub fn scorch_gradient(&mut self, center: Point, radius: f32, stops: &[GradientStop]) {
        let c = center.scaled(self.scale);
        self.scorch.fill_radial_gradient(c.x, c.y, radius * self.scale, stops);
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Total removed coverage, in device pixels
    pub fn damage_coverage(&self) -> f64 {
        self.damage.coverage_sum()
    }

    /// Total scorch opacity, in device pixels
    pub fn scorch_coverage(&self) -> f64 {
        self.scorch.alpha_sum()
    }

    /// Damage coverage in [0, 1] at a logical point
    pub fn damage_at(&self, p: Point) -> f32 {
        let (x, y) = self.to_pixel(p);
        f32::from(self.damage.get(x, y)) / 255.0
    }

    /// Scorch opacity in [0, 1] at a logical point
    pub fn scorch_at(&self, p: Point) -> f32 {
        let (x, y) = self.to_pixel(p);
        self.scorch
            .get_pixel_rgba(x, y)
            .map_or(0.0, |(_, _, _, a)| f32::from(a) / 255.0)
    }

    pub fn is_clear(&self) -> bool {
        self.damage.is_empty() && self.scorch.alpha_sum() == 0.0
    }

    fn to_pixel(&self, p: Point) -> (i32, i32) {
        let s = p.scaled(self.scale);
        (s.x.floor() as i32, s.y.floor() as i32)
    }
}
