//! Geometry for the drawing surface: points, rectangles, image fitting
//!
//! Everything here is in logical units. Device pixels only appear through
//! `Surface::pixel_width` / `pixel_height`.

use serde::{Deserialize, Serialize};

/// Smallest and largest device-pixel ratio the surface honours
pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 2.0;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at parameter `t` along the segment self -> other
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn scaled(&self, factor: f32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned rectangle (x, y, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive on all four edges
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.w && p.y <= self.y + self.h
    }


    pub fn scaled(&self, factor: f32) -> Rect {
        Rect::new(self.x * factor, self.y * factor, self.w * factor, self.h * factor)
    }
}

/// Distance from `p` to the segment a-b
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ex = b.x - a.x;
    let ey = b.y - a.y;
    let len_sq = ex * ex + ey * ey;
    if len_sq < 1e-6 {
        return p.distance_to(&a);
    }
    // Project onto the segment and clamp to its ends
    let t = (((p.x - a.x) * ex + (p.y - a.y) * ey) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&a.lerp(&b, t))
}

/// The visible drawing target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Logical size
    pub width: f32,
    pub height: f32,
    /// Device pixels per logical unit, clamped to [1, 2]
    pub scale: f32,
    /// On-screen position of the surface's top-left corner
    pub origin: Point,
}

impl Surface {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale: clamp_scale(scale),
            origin: Point::default(),
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Backing raster width in device pixels
    pub fn pixel_width(&self) -> u32 {
        (self.width * self.scale).floor() as u32
    }

    /// Backing raster height in device pixels
    pub fn pixel_height(&self) -> u32 {
        (self.height * self.scale).floor() as u32
    }

    /// Whether the backing raster would differ from `other`'s
    pub fn same_raster(&self, other: &Surface) -> bool {
        self.pixel_width() == other.pixel_width()
            && self.pixel_height() == other.pixel_height()
            && self.scale == other.scale
    }
}

/// Clamp a device-pixel ratio to what the surface supports. Non-finite or
/// non-positive ratios fall back to 1.
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        MIN_SCALE
    }
}

/// Where the loaded image sits on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub rect: Rect,
}

impl ImagePlacement {
    /// Fit an `image_w` x `image_h` image inside the surface, preserving aspect
    /// ratio and centring it. Returns `None` for an empty image or surface.
    pub fn fit(surface: &Surface, image_w: u32, image_h: u32) -> Option<Self> {
        if image_w == 0 || image_h == 0 || surface.width <= 0.0 || surface.height <= 0.0 {
            return None;
        }
        let iw = image_w as f32;
        let ih = image_h as f32;
        let scale = (surface.width / iw).min(surface.height / ih);
        let w = iw * scale;
        let h = ih * scale;
        Some(Self {
            rect: Rect::new((surface.width - w) / 2.0, (surface.height - h) / 2.0, w, h),
        })
    }

    pub fn contains(&self, p: Point) -> bool {
        self.rect.contains(p)
    }
}
