//! Particle System for impact debris
//!
//! Particles are stepped once per frame (not per second): friction on the
//! horizontal velocity, constant gravity, then one frame of life is spent.

use rand::Rng;
use std::f32::consts::TAU;

use crate::display::PixelBuffer;
use crate::geometry::Point;

/// Horizontal velocity retained each frame
pub const FRICTION: f32 = 0.99;
/// Added to vertical velocity each frame (logical units, +y is down)
pub const GRAVITY: f32 = 0.25;
/// Frames a particle may live; also the denominator of its fade
pub const MAX_LIFE: f32 = 50.0;
/// Shortest spawn life in frames
pub const MIN_LIFE: f32 = 30.0;
pub const MIN_SIZE: f32 = 2.0;
pub const MAX_SIZE: f32 = 4.0;

/// A single particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Point,
    pub vel: Point,
    pub life: f32,
    pub max_life: f32,
    pub color: (u8, u8, u8),
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Point, vel: Point, life: f32, color: (u8, u8, u8)) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: MAX_LIFE,
            color,
            size: MIN_SIZE,
        }
    }

    /// Create a particle with custom size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Opacity in [0, 1], fading linearly with remaining life
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Check if particle is still alive
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Advance one frame
    #[inline]
    fn step(&mut self) {
        self.vel.x *= FRICTION;
        self.vel.y += GRAVITY;
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.life -= 1.0;
    }
}

/// Particle system manager
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(1000),
        }
    }

    /// Emit a single particle
    pub fn emit(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Emit `count` particles from `pos` in uniformly random directions with
    /// speeds uniform in [0, max_speed]
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        pos: Point,
        count: usize,
        max_speed: f32,
        color: (u8, u8, u8),
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.gen::<f32>() * TAU;
            let speed = rng.gen::<f32>() * max_speed.max(0.0);
            let vel = Point::new(angle.cos() * speed, angle.sin() * speed);
            let life = MIN_LIFE + rng.gen::<f32>() * (MAX_LIFE - MIN_LIFE);
            let size = MIN_SIZE + rng.gen::<f32>() * (MAX_SIZE - MIN_SIZE);
            self.emit(Particle::new(pos, vel, life, color).with_size(size));
        }
    }

    /// Advance every particle one frame and drop the ones whose life ran out.
    ///
    /// Walks indices in reverse so swap-removal never skips or revisits an
    /// entry.
    pub fn step(&mut self) {
        for i in (0..self.particles.len()).rev() {
            let p = &mut self.particles[i];
            p.step();
            if !p.is_alive() {
                self.particles.swap_remove(i);
            }
        }
    }

    /// Draw every particle as a filled square of its size, offset by
    /// `offset` logical units and scaled to device pixels
    pub fn render(&self, buffer: &mut PixelBuffer, offset: Point, scale: f32) {
        for p in &self.particles {
            let size = p.size * scale;
            buffer.fill_rect_blend(
                (p.pos.x + offset.x) * scale,
                (p.pos.y + offset.y) * scale,
                size,
                size,
                p.color,
                p.alpha(),
            );
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Get particle count
    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Clear all particles
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_samples_within_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = ParticleSystem::new();
        system.spawn(&mut rng, Point::new(10.0, 20.0), 200, 3.0, (1, 2, 3));
        assert_eq!(system.count(), 200);
        for p in system.particles() {
            assert_eq!(p.pos, Point::new(10.0, 20.0));
            let speed = (p.vel.x * p.vel.x + p.vel.y * p.vel.y).sqrt();
            assert!(speed <= 3.0 + 1e-4);
            assert!(p.life >= MIN_LIFE && p.life < MAX_LIFE);
            assert!(p.size >= MIN_SIZE && p.size < MAX_SIZE);
            assert_eq!(p.max_life, MAX_LIFE);
            assert_eq!(p.color, (1, 2, 3));
        }
    }

    #[test]
    fn test_step_applies_friction_gravity_and_ages() {
        let mut system = ParticleSystem::new();
        system.emit(Particle::new(Point::new(0.0, 0.0), Point::new(2.0, -1.0), 10.0, (0, 0, 0)));
        system.step();
        let p = &system.particles()[0];
        assert_relative_eq!(p.vel.x, 1.98);
        assert_relative_eq!(p.vel.y, -0.75);
        assert_relative_eq!(p.pos.x, 1.98);
        assert_relative_eq!(p.pos.y, -0.75);
        assert_relative_eq!(p.life, 9.0);
    }

    #[test]
    fn test_life_strictly_decreases_until_removed() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut system = ParticleSystem::new();
        system.spawn(&mut rng, Point::new(0.0, 0.0), 1, 1.0, (0, 0, 0));
        let mut last = system.particles()[0].life;
        let mut steps = 0;
        while !system.is_empty() {
            system.step();
            steps += 1;
            if let Some(p) = system.particles().first() {
                assert!(p.life < last);
                assert!(p.life > 0.0);
                last = p.life;
            }
        }
        assert!(steps >= MIN_LIFE as usize && steps <= MAX_LIFE as usize);
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let mut system = ParticleSystem::new();
        // Alternate dying and surviving particles
        for i in 0..10 {
            let life = if i % 2 == 0 { 1.0 } else { 5.0 };
            system.emit(Particle::new(Point::new(i as f32, 0.0), Point::default(), life, (0, 0, 0)));
        }
        system.step();
        assert_eq!(system.count(), 5);
        for p in system.particles() {
            // Every survivor was stepped exactly once
            assert_relative_eq!(p.life, 4.0);
        }
    }

    #[test]
    fn test_render_fades_with_life() {
        let mut system = ParticleSystem::new();
        system.emit(Particle::new(Point::new(1.0, 1.0), Point::default(), 25.0, (255, 0, 0)).with_size(2.0));
        let mut buffer = PixelBuffer::with_size(8, 8);
        system.render(&mut buffer, Point::default(), 1.0);
        let (r, _, _, a) = buffer.get_pixel_rgba(1, 1).unwrap();
        assert_eq!(r, 255);
        assert_eq!(a, 128);
        assert_eq!(buffer.get_pixel_rgba(3, 3).unwrap().3, 0);
    }

    #[test]
    fn test_render_applies_offset_and_scale() {
        let mut system = ParticleSystem::new();
        system.emit(Particle::new(Point::new(1.0, 1.0), Point::default(), 50.0, (9, 9, 9)).with_size(1.0));
        let mut buffer = PixelBuffer::with_size(8, 8);
        system.render(&mut buffer, Point::new(1.0, 0.0), 2.0);
        assert_eq!(buffer.get_pixel_rgba(4, 2).unwrap().3, 255);
        assert_eq!(buffer.get_pixel_rgba(5, 3).unwrap().3, 255);
        assert_eq!(buffer.alpha_sum(), 4.0);
    }

    #[test]
    fn test_clear() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut system = ParticleSystem::default();
        system.spawn(&mut rng, Point::default(), 5, 1.0, (0, 0, 0));
        system.clear();
        assert!(system.is_empty());
    }
}
