//! The destructible image
//!
//! `Simulation` owns everything that changes while the user plays: the
//! picture, both damage layers, debris, shake, the active weapon and the
//! stroke in progress. Input mutates it synchronously and `advance_frame`
//! composites the next frame.

use image::RgbaImage;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{Cue, SoundSink};
use crate::display::{BlendMode, PixelBuffer};
use crate::error::Result;
use crate::export;
use crate::geometry::{ImagePlacement, Point, Surface};
use crate::input::{Gesture, PointerEvent, StrokeState};
use crate::layers::LayerBuffers;
use crate::particles::ParticleSystem;
use crate::shake::Shake;
use crate::texture::Texture;
use crate::weapons::{Arsenal, Target, Trigger, Weapon, WeaponKind};

pub struct Simulation {
    surface: Surface,
    texture: Option<Texture>,
    placement: Option<ImagePlacement>,
    /// The picture drawn into its placement, surface sized
    base: PixelBuffer,
    frame: PixelBuffer,
    layers: LayerBuffers,
    particles: ParticleSystem,
    shake: Shake,
    arsenal: Arsenal,
    weapon: Weapon,
    stroke: StrokeState,
    rng: StdRng,
    sound: Box<dyn SoundSink>,
    frame_count: u64,
}

impl Simulation {
    pub fn new(surface: Surface, arsenal: Arsenal, sound: Box<dyn SoundSink>) -> Self {
        Self::with_rng(surface, arsenal, sound, StdRng::from_entropy())
    }

    /// Same as `new` with reproducible randomness
    pub fn with_seed(surface: Surface, arsenal: Arsenal, sound: Box<dyn SoundSink>, seed: u64) -> Self {
        Self::with_rng(surface, arsenal, sound, StdRng::seed_from_u64(seed))
    }

    fn with_rng(surface: Surface, arsenal: Arsenal, sound: Box<dyn SoundSink>, rng: StdRng) -> Self {
        let weapon = arsenal.weapon(WeaponKind::default());
        Self {
            surface,
            texture: None,
            placement: None,
            base: PixelBuffer::with_size(surface.pixel_width(), surface.pixel_height()),
            frame: PixelBuffer::with_size(surface.pixel_width(), surface.pixel_height()),
            layers: LayerBuffers::new(&surface),
            particles: ParticleSystem::new(),
            shake: Shake::new(),
            arsenal,
            weapon,
            stroke: StrokeState::Idle,
            rng,
            sound,
            frame_count: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn has_image(&self) -> bool {
        self.texture.is_some()
    }

    pub fn placement(&self) -> Option<ImagePlacement> {
        self.placement
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon.kind()
    }

    pub fn layers(&self) -> &LayerBuffers {
        &self.layers
    }

    pub fn particle_count(&self) -> usize {
        self.particles.count()
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake.intensity()
    }

    /// The last composited frame
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Adopt a new surface size, scale or origin. A raster change reallocates
    /// and clears both layers; the image is refitted either way.
    pub fn resize(&mut self, surface: Surface) {
        if self.surface.same_raster(&surface) {
            self.surface = surface;
            self.refit();
            return;
        }
        debug!(
            "surface {}x{} @{}x",
            surface.width, surface.height, surface.scale
        );
        self.surface = surface;
        self.layers.resize(&surface);
        self.frame.resize(surface.pixel_width(), surface.pixel_height());
        self.refit();
    }

    /// Replace the picture; damage and scorch start over
    pub fn load_image(&mut self, image: RgbaImage) {
        info!("image {}x{}", image.width(), image.height());
        self.texture = Some(Texture::from_image(image));
        self.layers.clear();
        self.refit();
    }

    pub fn set_weapon(&mut self, kind: WeaponKind) {
        if kind != self.weapon.kind() {
            debug!("weapon: {}", kind);
        }
        self.weapon = self.arsenal.weapon(kind);
    }

    /// Clear damage, scorch, debris and shake. Returns false (and does
    /// nothing) when no image is loaded.
    pub fn reset(&mut self) -> bool {
        if !self.has_image() {
            return false;
        }
        self.layers.clear();
        self.particles.clear();
        self.shake.stop();
        true
    }

    /// Feed a pointer event; returns the cue played, if the weapon fired
    pub fn pointer(&mut self, event: PointerEvent) -> Option<Cue> {
        let placement = self.placement;
        let gesture = self
            .stroke
            .handle(event, |p| placement.is_some_and(|pl| pl.contains(p)))?;
        let bounds = placement?.rect;

        let mut target = Target {
            bounds,
            layers: &mut self.layers,
            particles: &mut self.particles,
            shake: &mut self.shake,
            rng: &mut self.rng,
        };
        let cue = match (gesture, self.weapon.trigger()) {
            (Gesture::Press(at), _) => self.weapon.press(&mut target, at),
            (Gesture::Drag { from, to }, Trigger::Continuous) => self.weapon.drag(&mut target, from, to),
            (Gesture::Drag { .. }, Trigger::Discrete) => None,
        }?;
        self.sound.play(cue);
        Some(cue)
    }

    /// Step shake and debris, then composite the next frame
    pub fn advance_frame(&mut self) -> &PixelBuffer {
        self.frame_count += 1;
        let offset = self.shake.advance(&mut self.rng);
        self.particles.step();

        let mut frame = std::mem::take(&mut self.frame);
        frame.clear_transparent();
        self.compose_into(&mut frame, offset);
        self.frame = frame;
        &self.frame
    }

    /// PNG of the current state without advancing it, or `None` without an
    /// image
    pub fn export_png(&self) -> Result<Option<Vec<u8>>> {
        if !self.has_image() {
            return Ok(None);
        }
        let mut still = PixelBuffer::with_size(self.surface.pixel_width(), self.surface.pixel_height());
        self.compose_into(&mut still, Point::default());
        export::encode_png(&still).map(Some)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Recompute the placement and redraw the scaled picture
    fn refit(&mut self) {
        let scale = self.surface.scale;
        self.base
            .resize(self.surface.pixel_width(), self.surface.pixel_height());
        self.placement = self
            .texture
            .as_ref()
            .and_then(|tex| ImagePlacement::fit(&self.surface, tex.width(), tex.height()));

        if let (Some(tex), Some(placement)) = (&self.texture, self.placement) {
            let r = placement.rect.scaled(scale);
            self.base.draw_texture(tex, r.x, r.y, r.w, r.h);
        }
    }

    /// Image, scorch (multiply), damage (cut out), then debris, all shifted
    /// by `offset` logical units
    fn compose_into(&self, out: &mut PixelBuffer, offset: Point) {
        let scale = self.surface.scale;
        let dx = (offset.x * scale).round() as i32;
        let dy = (offset.y * scale).round() as i32;

        if self.placement.is_some() {
            out.composite(&self.base, dx, dy, BlendMode::Normal);
            out.composite(self.layers.scorch(), dx, dy, BlendMode::Multiply);
            out.erase(self.layers.damage(), dx, dy);
        }

        let snapped = Point::new(dx as f32 / scale, dy as f32 / scale);
        self.particles.render(out, snapped, scale);
    }
}
