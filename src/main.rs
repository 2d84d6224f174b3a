use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, error, info, warn};
use sdl2::keyboard::Keycode;

use email_destroyer::display::{Display, InputEvent, RenderTarget};
use email_destroyer::geometry::Surface;
use email_destroyer::input::PointerMapper;
use email_destroyer::loader::Loader;
use email_destroyer::util::FpsCounter;
use email_destroyer::{audio, export, logging, Config, Error, Result, Simulation, WeaponKind};

/// Load a picture and wreck it
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to load at startup (or drop one onto the window)
    image: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width
    #[arg(long)]
    width: Option<u32>,

    /// Window height
    #[arg(long)]
    height: Option<u32>,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    no_vsync: bool,

    /// No sound
    #[arg(short, long)]
    mute: bool,

    /// Starting weapon: gun, knife, machete, flamethrower or grenade
    #[arg(long)]
    weapon: Option<WeaponKind>,

    /// Where `S` writes the PNG
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write the effective settings as JSON and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Settings file (or defaults) with command-line overrides applied
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.no_vsync {
            config.vsync = false;
        }
        if self.mute {
            config.mute = true;
        }
        if let Some(weapon) = self.weapon {
            config.weapon = weapon;
        }
        if let Some(path) = &self.export {
            config.export_path = path.clone();
        }
        Ok(config)
    }
}

fn window_title(weapon: WeaponKind) -> String {
    format!("email-destroyer [{}]", weapon)
}

fn current_surface(display: &Display) -> Surface {
    let (w, h) = display.size();
    Surface::new(w as f32, h as f32, display.scale())
}

fn request_load(loader: &Loader, path: &Path) {
    match loader.request(path) {
        Ok(()) => {},
        Err(Error::NotAnImage(path)) => debug!("ignoring {}: not an image", path.display()),
        Err(e) => warn!("{}", e),
    }
}

fn export_frame(sim: &Simulation, path: &Path) {
    match sim.export_png() {
        Ok(Some(png)) => match export::write_png(path, &png) {
            Ok(()) => info!("saved {}", path.display()),
            Err(e) => error!("failed to save {}: {}", path.display(), e),
        },
        Ok(None) => debug!("nothing to export"),
        Err(e) => error!("{}", e),
    }
}

/// A frame goes to the screen only when it fills the render target exactly
fn fits_target(frame: (u32, u32), target: (u32, u32)) -> bool {
    frame.0 > 0 && frame.1 > 0 && frame == target
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = args.config()?;
    if let Some(path) = &args.write_config {
        config.save(path)?;
        info!("settings written to {}", path.display());
        return Ok(());
    }

    let (mut display, texture_creator) = Display::with_options(
        &window_title(config.weapon),
        config.width,
        config.height,
        config.vsync,
    )?;

    let mut surface = current_surface(&display);
    let mut target =
        RenderTarget::with_size(&texture_creator, surface.pixel_width(), surface.pixel_height())?;

    let sound = audio::open_sink(display.sdl(), config.mute);
    let mut sim = Simulation::new(surface, config.arsenal.clone(), sound);
    sim.set_weapon(config.weapon);

    let mut pointer = PointerMapper::new(surface.origin);
    let loader = Loader::new();
    if let Some(path) = &args.image {
        request_load(&loader, path);
    }

    let mut fps_counter = FpsCounter::new(60);

    info!("=== email-destroyer ===");
    info!(
        "{}x{} @{}x, VSync {}",
        config.width,
        config.height,
        surface.scale,
        if config.vsync { "on" } else { "off" }
    );
    info!("Controls:");
    info!("  1-5     - Gun, Knife, Machete, Flamethrower, Grenade");
    info!("  R       - Reset damage");
    info!("  S       - Save PNG to {}", config.export_path.display());
    info!("  F       - Log frame rate");
    info!("  Escape  - Quit");
    info!("Drop an image onto the window to load it.");

    'main: loop {
        let avg_fps = fps_counter.tick();

        for event in display.poll_events() {
            match &event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => {
                    let slot = match *key {
                        Keycode::Escape => break 'main,
                        Keycode::R => {
                            if sim.reset() {
                                info!("reset");
                            }
                            continue;
                        },
                        Keycode::S => {
                            export_frame(&sim, &config.export_path);
                            continue;
                        },
                        Keycode::F => {
                            info!("{:.1} fps", avg_fps);
                            continue;
                        },
                        Keycode::Num1 | Keycode::Kp1 => 1,
                        Keycode::Num2 | Keycode::Kp2 => 2,
                        Keycode::Num3 | Keycode::Kp3 => 3,
                        Keycode::Num4 | Keycode::Kp4 => 4,
                        Keycode::Num5 | Keycode::Kp5 => 5,
                        _ => continue,
                    };
                    if let Some(kind) = WeaponKind::from_slot(slot) {
                        sim.set_weapon(kind);
                        if let Err(e) = display.set_title(&window_title(kind)) {
                            warn!("{}", e);
                        }
                    }
                },
                InputEvent::DropFile(path) => request_load(&loader, path),
                InputEvent::Resized { .. } => {
                    surface = current_surface(&display);
                    sim.resize(surface);
                    pointer.set_origin(surface.origin);
                    if (target.width(), target.height())
                        != (surface.pixel_width(), surface.pixel_height())
                    {
                        // On failure the old target stays; frames skip present until the next resize
                        match RenderTarget::with_size(
                            &texture_creator,
                            surface.pixel_width(),
                            surface.pixel_height(),
                        ) {
                            Ok(resized) => target = resized,
                            Err(e) => error!("{}", e),
                        }
                    }
                },
                _ => {
                    if let Some(p) = pointer.map(&event) {
                        sim.pointer(p);
                    }
                },
            }
        }

        for result in loader.poll() {
            match result {
                Ok(loaded) => {
                    info!("loaded {}", loaded.path.display());
                    sim.load_image(loaded.image);
                },
                Err(e) => warn!("{}", e),
            }
        }

        let frame = sim.advance_frame();
        if !fits_target((frame.width(), frame.height()), (target.width(), target.height())) {
            continue;
        }
        if let Err(e) = display.present(&mut target, frame, config.backdrop) {
            error!("{}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_skip_mismatched_or_empty_targets() {
        assert!(fits_target((800, 600), (800, 600)));
        // Target kept from before a failed resize
        assert!(!fits_target((1600, 1200), (800, 600)));
        assert!(!fits_target((0, 600), (0, 600)));
    }
}
