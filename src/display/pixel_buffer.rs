use crate::texture::Texture;
use crate::util::lerp_rgba;

use super::mask::CoverageMask;

// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing blend mode for `composite()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over alpha blending
    Normal,
    /// Source-over with the multiply blend function; never lightens an
    /// opaque destination
    Multiply,
}

/// One colour stop of a radial gradient. `alpha` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: (u8, u8, u8),
    pub alpha: f32,
}

impl GradientStop {
    pub const fn new(offset: f32, color: (u8, u8, u8), alpha: f32) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

#[inline]
fn unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Composite straight-alpha `src` over the straight-alpha pixel `dst`.
///
/// Uses the separable blend formula: the blend function only applies where
/// both source and destination have coverage; elsewhere the plain colour of
/// whichever side is present shows through.
#[inline]
fn blend_over(dst: &mut [u8], src: [u8; 4], mode: BlendMode) {
    let sa = unit(src[3]);
    if sa <= 0.0 {
        return;
    }
    let da = unit(dst[3]);
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return;
    }

    for c in 0..3 {
        let cs = unit(src[c]);
        let cb = unit(dst[c]);
        let mixed = match mode {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cs * cb,
        };
        let premul = sa * (1.0 - da) * cs + sa * da * mixed + (1.0 - sa) * da * cb;
        dst[c] = to_byte(premul / oa);
    }
    dst[3] = to_byte(oa);
}

/// Interpolated colour and alpha at `t` in [0, 1]. Stops must be sorted.
fn gradient_at(stops: &[GradientStop], t: f32) -> ((u8, u8, u8), f32) {
    let Some(first) = stops.first() else {
        return ((0, 0, 0), 0.0);
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return lerp_rgba(a.color, a.alpha, b.color, b.alpha, local);
        }
    }
    let last = stops[stops.len() - 1];
    (last.color, last.alpha)
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Straight-alpha RGBA raster, byte order R, G, B, A.
///
/// The frame, the scorch overlay and the pre-scaled base image are all
/// PixelBuffers. Coordinates taken by drawing methods are device pixels.
#[derive(Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a fully transparent buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width as usize) * (height as usize) * 4],
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

    /// Reallocate to a new size; contents become transparent
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::with_size(width, height);
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Wipe to fully transparent
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(0);
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ))
        } else {
            None
        }
    }

    /// Overwrite a pixel, alpha included (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Source-over a single pixel (bounds checked)
    #[cfg(test)]
    fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            blend_over(&mut self.pixels[idx..idx + 4], [r, g, b, a], BlendMode::Normal);
        }
    }

    /// Fill an axis-aligned rectangle with a translucent colour.
    /// Edges snap to the nearest pixel boundary.
    pub fn fill_rect_blend(&mut self, x: f32, y: f32, w: f32, h: f32, color: (u8, u8, u8), alpha: f32) {
        let a = to_byte(alpha.clamp(0.0, 1.0));
        if a == 0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = (x.round() as i32).max(0);
        let y0 = (y.round() as i32).max(0);
        let x1 = ((x + w).round() as i32).min(self.width as i32);
        let y1 = ((y + h).round() as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = self.pixel_index(px as u32, py as u32);
                blend_over(
                    &mut self.pixels[idx..idx + 4],
                    [color.0, color.1, color.2, a],
                    BlendMode::Normal,
                );
            }
        }
    }

    /// Fill a disc with a radial gradient, source-over.
    ///
    /// Stop offsets run from the centre (0) to the rim (1). The rim is
    /// antialiased over one pixel.
    pub fn fill_radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let y_start = ((cy - radius).floor() as i32).max(0);
        let y_end = ((cy + radius).ceil() as i32).min(self.height as i32 - 1);
        let x_start = ((cx - radius).floor() as i32).max(0);
        let x_end = ((cx + radius).ceil() as i32).min(self.width as i32 - 1);

        for y in y_start..=y_end {
            let dy = y as f32 + 0.5 - cy;
            for x in x_start..=x_end {
                let dx = x as f32 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt();
                let edge = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if edge <= 0.0 {
                    continue;
                }
                let (color, alpha) = gradient_at(stops, (dist / radius).min(1.0));
                let a = to_byte(alpha * edge);
                if a == 0 {
                    continue;
                }
                let idx = self.pixel_index(x as u32, y as u32);
                blend_over(
                    &mut self.pixels[idx..idx + 4],
                    [color.0, color.1, color.2, a],
                    BlendMode::Normal,
                );
            }
        }
    }

    /// Draw a texture scaled into the rectangle (x, y, w, h) with bilinear
    /// filtering, source-over.
    pub fn draw_texture(&mut self, tex: &Texture, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 || tex.width() == 0 || tex.height() == 0 {
            return;
        }
        let x_start = (x.floor() as i32).max(0);
        let y_start = (y.floor() as i32).max(0);
        let x_end = ((x + w).ceil() as i32).min(self.width as i32);
        let y_end = ((y + h).ceil() as i32).min(self.height as i32);

        for py in y_start..y_end {
            let v = (py as f32 + 0.5 - y) / h;
            if !(0.0..=1.0).contains(&v) {
                continue;
            }
            for px in x_start..x_end {
                let u = (px as f32 + 0.5 - x) / w;
                if !(0.0..=1.0).contains(&u) {
                    continue;
                }
                let (r, g, b, a) = tex.sample_bilinear(u, v);
                let idx = self.pixel_index(px as u32, py as u32);
                blend_over(&mut self.pixels[idx..idx + 4], [r, g, b, a], BlendMode::Normal);
            }
        }
    }

    /// Composite a source buffer onto this one using per-pixel source alpha.
    /// Skips fully transparent source pixels.
    pub fn composite(&mut self, src: &PixelBuffer, dst_x: i32, dst_y: i32, mode: BlendMode) {
        let src_w = src.width() as i32;
        let src_h = src.height() as i32;
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for sy in 0..src_h {
            let dy = dst_y + sy;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            for sx in 0..src_w {
                let dx = dst_x + sx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }

                let si = src.pixel_index(sx as u32, sy as u32);
                if src.pixels[si + 3] == 0 {
                    continue;
                }
                let sp = [
                    src.pixels[si],
                    src.pixels[si + 1],
                    src.pixels[si + 2],
                    src.pixels[si + 3],
                ];
                let di = self.pixel_index(dx as u32, dy as u32);
                blend_over(&mut self.pixels[di..di + 4], sp, mode);
            }
        }
    }

    /// Destination-out: remove coverage wherever `mask` has it.
    /// Colour is left untouched; only alpha drops.
    pub fn erase(&mut self, mask: &CoverageMask, dst_x: i32, dst_y: i32) {
        let dst_w = self.width as i32;
        let dst_h = self.height as i32;

        for my in 0..mask.height() as i32 {
            let dy = dst_y + my;
            if dy < 0 || dy >= dst_h {
                continue;
            }
            for mx in 0..mask.width() as i32 {
                let dx = dst_x + mx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }
                let m = mask.get(mx, my);
                if m == 0 {
                    continue;
                }
                let di = self.pixel_index(dx as u32, dy as u32) + 3;
                let keep = 1.0 - unit(m);
                self.pixels[di] = to_byte(unit(self.pixels[di]) * keep);
            }
        }
    }

    /// Sum of alpha over all pixels, in pixel units
    pub fn alpha_sum(&self) -> f64 {
        self.pixels
            .chunks_exact(4)
            .map(|px| f64::from(px[3]) / 255.0)
            .sum()
    }

    /// Get the raw pixel data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::with_size(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(width: u32, height: u32, r: u8, g: u8, b: u8) -> PixelBuffer {
        let mut buf = PixelBuffer::with_size(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                buf.set_pixel_rgba(x, y, r, g, b, 255);
            }
        }
        buf
    }

    #[test]
    fn test_new_buffer_is_transparent() {
        let buf = PixelBuffer::with_size(4, 3);
        assert_eq!(buf.as_bytes().len(), 4 * 3 * 4);
        assert_eq!(buf.alpha_sum(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_reads_and_writes() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.set_pixel_rgba(-1, 0, 1, 2, 3, 4);
        buf.blend_pixel(5, 5, 1, 2, 3, 255);
        assert_eq!(buf.get_pixel_rgba(2, 0), None);
        assert_eq!(buf.alpha_sum(), 0.0);
    }

    #[test]
    fn test_normal_blend_onto_transparent_keeps_source() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.blend_pixel(0, 0, 200, 100, 50, 128);
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((200, 100, 50, 128)));
    }

    #[test]
    fn test_normal_blend_accumulates_alpha() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.blend_pixel(0, 0, 40, 20, 0, 89);
        let first = buf.get_pixel_rgba(0, 0).unwrap().3;
        buf.blend_pixel(0, 0, 40, 20, 0, 89);
        let second = buf.get_pixel_rgba(0, 0).unwrap().3;
        assert!(second > first);
        assert!(second < 255);
    }

    #[test]
    fn test_multiply_never_lightens_opaque_destination() {
        let mut base = opaque(1, 1, 120, 200, 90);
        let mut overlay = PixelBuffer::with_size(1, 1);
        overlay.set_pixel_rgba(0, 0, 255, 255, 255, 255);
        base.composite(&overlay, 0, 0, BlendMode::Multiply);
        // White multiply is the identity
        assert_eq!(base.get_pixel_rgba(0, 0), Some((120, 200, 90, 255)));

        overlay.set_pixel_rgba(0, 0, 80, 60, 0, 128);
        base.composite(&overlay, 0, 0, BlendMode::Multiply);
        let (r, g, b, a) = base.get_pixel_rgba(0, 0).unwrap();
        assert!(r < 120 && g < 200 && b < 90);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_multiply_onto_transparent_shows_source() {
        let mut base = PixelBuffer::with_size(1, 1);
        let mut overlay = PixelBuffer::with_size(1, 1);
        overlay.set_pixel_rgba(0, 0, 80, 60, 0, 128);
        base.composite(&overlay, 0, 0, BlendMode::Multiply);
        assert_eq!(base.get_pixel_rgba(0, 0), Some((80, 60, 0, 128)));
    }

    #[test]
    fn test_composite_offset_clips() {
        let mut base = PixelBuffer::with_size(3, 3);
        let src = opaque(2, 2, 9, 9, 9);
        base.composite(&src, 2, 2, BlendMode::Normal);
        assert_eq!(base.get_pixel_rgba(2, 2), Some((9, 9, 9, 255)));
        assert_eq!(base.get_pixel_rgba(1, 1), Some((0, 0, 0, 0)));
        assert_eq!(base.alpha_sum(), 1.0);
    }

    #[test]
    fn test_erase_removes_alpha_only() {
        let mut base = opaque(2, 1, 10, 20, 30);
        let mut mask = CoverageMask::with_size(2, 1);
        mask.set(0, 0, 255);
        mask.set(1, 0, 128);
        base.erase(&mask, 0, 0);
        assert_eq!(base.get_pixel_rgba(0, 0), Some((10, 20, 30, 0)));
        assert_eq!(base.get_pixel_rgba(1, 0), Some((10, 20, 30, 127)));
    }

    #[test]
    fn test_gradient_fades_to_rim() {
        let mut buf = PixelBuffer::with_size(41, 41);
        let stops = [
            GradientStop::new(0.0, (80, 60, 0), 0.5),
            GradientStop::new(0.6, (40, 20, 0), 0.35),
            GradientStop::new(1.0, (0, 0, 0), 0.0),
        ];
        buf.fill_radial_gradient(20.5, 20.5, 20.0, &stops);
        let centre = buf.get_pixel_rgba(20, 20).unwrap();
        let mid = buf.get_pixel_rgba(32, 20).unwrap();
        let outside = buf.get_pixel_rgba(0, 0).unwrap();
        assert_eq!(centre, (80, 60, 0, 128));
        assert!(mid.3 < centre.3 && mid.3 > 0);
        assert_eq!(outside.3, 0);
    }

    #[test]
    fn test_gradient_at_interpolates_between_stops() {
        let stops = [
            GradientStop::new(0.0, (0, 0, 0), 0.0),
            GradientStop::new(1.0, (200, 100, 50), 1.0),
        ];
        let (color, alpha) = gradient_at(&stops, 0.5);
        assert_eq!(color, (100, 50, 25));
        assert!((alpha - 0.5).abs() < 1e-6);
        assert_eq!(gradient_at(&[], 0.5), ((0, 0, 0), 0.0));
    }

    #[test]
    fn test_fill_rect_blend_snaps_to_pixels() {
        let mut buf = PixelBuffer::with_size(10, 10);
        buf.fill_rect_blend(2.2, 3.6, 2.0, 2.0, (255, 0, 0), 1.0);
        assert_eq!(buf.get_pixel_rgba(2, 4), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(3, 5), Some((255, 0, 0, 255)));
        assert_eq!(buf.alpha_sum(), 4.0);
    }

    #[test]
    fn test_draw_texture_scales_into_rect() {
        let tex = Texture::from_rgba(1, 1, vec![10, 200, 30, 255]).unwrap();
        let mut buf = PixelBuffer::with_size(8, 8);
        buf.draw_texture(&tex, 2.0, 2.0, 4.0, 4.0);
        assert_eq!(buf.get_pixel_rgba(2, 2), Some((10, 200, 30, 255)));
        assert_eq!(buf.get_pixel_rgba(5, 5), Some((10, 200, 30, 255)));
        assert_eq!(buf.get_pixel_rgba(6, 6), Some((0, 0, 0, 0)));
        assert_eq!(buf.alpha_sum(), 16.0);
    }
}
