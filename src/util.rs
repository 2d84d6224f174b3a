//! Shared utilities

use rand::Rng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Linear interpolation between two colours with alpha
#[inline]
pub fn lerp_rgba(
    c1: (u8, u8, u8),
    a1: f32,
    c2: (u8, u8, u8),
    a2: f32,
    t: f32,
) -> ((u8, u8, u8), f32) {
    let t = t.clamp(0.0, 1.0);
    let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    ((ch(c1.0, c2.0), ch(c1.1, c2.1), ch(c1.2, c2.2)), a1 + (a2 - a1) * t)
}

/// Parse "#rrggbb" into a colour tuple
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Format a colour tuple as "#rrggbb"
pub fn to_hex_color(color: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Serde adapter storing colours as "#rrggbb" strings
pub mod hex_color {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &(u8, u8, u8), serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(u8, u8, u8), D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_hex_color(&text)
            .ok_or_else(|| de::Error::custom(format!("expected #rrggbb colour, got {:?}", text)))
    }
}

/// Uniform sample in [base, base + spread); a zero spread returns `base`
#[inline]
pub fn jitter(rng: &mut impl Rng, base: f32, spread: f32) -> f32 {
    if spread > 0.0 {
        base + rng.gen::<f32>() * spread
    } else {
        base
    }
}

/// Uniform sample in [-1, 1)
#[inline]
pub fn signed_unit(rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>() * 2.0 - 1.0
}

/// Rolling frame-rate measurement over the last `sample_count` frames
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call once per frame. Returns the average FPS over the window.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.record(dt)
    }

    fn record(&mut self, dt: Duration) -> f32 {
        self.frame_times.push_back(dt.as_secs_f32());
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
        self.average_fps()
    }

    pub fn average_fps(&self) -> f32 {
        let avg_dt = self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }
}
