//! Decoded source picture
//!
//! Holds the loaded image as straight-alpha RGBA and samples it for scaled
//! drawing.

use image::RgbaImage;

/// A texture stored as RGBA pixels
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGBA format, 4 bytes per pixel
}

impl Texture {
    /// Create texture from raw RGBA data
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() == (width as usize) * (height as usize) * 4 {
            Some(Self {
                width,
                height,
                pixels: data,
            })
        } else {
            None
        }
    }

    /// Take ownership of a decoded image
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
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

    #[inline]
    fn get_pixel_internal(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Sample with bilinear interpolation, UV in [0, 1], clamped at the edges.
    /// Returns (r, g, b, a); an empty texture samples as transparent.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> (u8, u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0, 0);
        }
        // Texel centres sit at half-integer positions
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let fx_pos = (u.clamp(0.0, 1.0) * self.width as f32 - 0.5).clamp(0.0, max_x);
        let fy_pos = (v.clamp(0.0, 1.0) * self.height as f32 - 0.5).clamp(0.0, max_y);

        let x0 = fx_pos.floor() as u32;
        let y0 = fy_pos.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = fx_pos - x0 as f32;
        let fy = fy_pos - y0 as f32;

        // Sample 4 corners
        let c00 = self.get_pixel_internal(x0, y0);
        let c10 = self.get_pixel_internal(x1, y0);
        let c01 = self.get_pixel_internal(x0, y1);
        let c11 = self.get_pixel_internal(x1, y1);

        // Bilinear interpolation with clamping for numerical stability
        let lerp = |a: u8, b: u8, t: f32| -> f32 { a as f32 + (b as f32 - a as f32) * t };
        let channel = |i: usize| -> u8 {
            let top = lerp(c00[i], c10[i], fx);
            let bottom = lerp(c01[i], c11[i], fx);
            (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8
        };

        (channel(0), channel(1), channel(2), channel(3))
    }
}
