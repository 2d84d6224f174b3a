mod mask;
mod pixel_buffer;

pub use mask::CoverageMask;
pub use pixel_buffer::{BlendMode, GradientStop, PixelBuffer};

use std::path::PathBuf;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{BlendMode as SdlBlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl};

use crate::error::{Error, Result};

pub const DEFAULT_WIDTH: u32 = 960;
pub const DEFAULT_HEIGHT: u32 = 640;

/// SDL id of the virtual mouse fed by touch events
const TOUCH_MOUSE_ID: u32 = u32::MAX;

/// Texture format whose memory layout is R, G, B, A bytes
#[cfg(target_endian = "little")]
const RGBA_BYTES: PixelFormatEnum = PixelFormatEnum::ABGR8888;
#[cfg(target_endian = "big")]
const RGBA_BYTES: PixelFormatEnum = PixelFormatEnum::RGBA8888;

pub struct Display {
    sdl: Sdl,
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseDown {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    MouseUp {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    /// Touch positions are in window coordinates
    FingerDown {
        finger: i64,
        x: f32,
        y: f32,
    },
    FingerMotion {
        finger: i64,
        x: f32,
        y: f32,
    },
    FingerUp {
        finger: i64,
        x: f32,
        y: f32,
    },
    Resized {
        width: u32,
        height: u32,
    },
    DropFile(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
}

impl Display {
    /// Open a resizable, high-DPI aware window
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl = sdl2::init().map_err(Error::display)?;
        let video_subsystem = sdl.video().map_err(Error::display)?;

        let window = video_subsystem
            .window(title, width.max(1), height.max(1))
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| Error::display(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::display(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(Error::display)?;

        Ok((
            Self {
                sdl,
                canvas,
                event_pump,
            },
            texture_creator,
        ))
    }

    pub fn sdl(&self) -> &Sdl {
        &self.sdl
    }

    /// Window size in logical units
    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    /// Device pixels per logical unit
    pub fn scale(&self) -> f32 {
        let (w, _) = self.canvas.window().size();
        let (dw, _) = self.canvas.window().drawable_size();
        if w == 0 {
            1.0
        } else {
            dw as f32 / w as f32
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| Error::display(e.to_string()))
    }

    /// Clear to `backdrop`, then draw `buffer` over it with its alpha
    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        buffer: &PixelBuffer,
        backdrop: (u8, u8, u8),
    ) -> Result<()> {
        if (buffer.width(), buffer.height()) != (target.width, target.height) {
            return Err(Error::display(format!(
                "frame is {}x{} but render target is {}x{}",
                buffer.width(),
                buffer.height(),
                target.width,
                target.height
            )));
        }

        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| Error::display(e.to_string()))?;

        self.canvas
            .set_draw_color(Color::RGB(backdrop.0, backdrop.1, backdrop.2));
        self.canvas.clear();
        self.canvas
            .copy(&target.texture, None, None)
            .map_err(Error::display)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let (win_w, win_h) = self.size();
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseMotion { which, x, y, .. } if which != TOUCH_MOUSE_ID => {
                    events.push(InputEvent::MouseMove { x, y });
                },
                Event::MouseButtonDown {
                    which,
                    x,
                    y,
                    mouse_btn,
                    ..
                } if which != TOUCH_MOUSE_ID => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        events.push(InputEvent::MouseDown { x, y, button });
                    }
                },
                Event::MouseButtonUp {
                    which,
                    x,
                    y,
                    mouse_btn,
                    ..
                } if which != TOUCH_MOUSE_ID => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        events.push(InputEvent::MouseUp { x, y, button });
                    }
                },
                Event::FingerDown {
                    finger_id, x, y, ..
                } => events.push(InputEvent::FingerDown {
                    finger: finger_id,
                    x: x * win_w as f32,
                    y: y * win_h as f32,
                }),
                Event::FingerMotion {
                    finger_id, x, y, ..
                } => events.push(InputEvent::FingerMotion {
                    finger: finger_id,
                    x: x * win_w as f32,
                    y: y * win_h as f32,
                }),
                Event::FingerUp {
                    finger_id, x, y, ..
                } => events.push(InputEvent::FingerUp {
                    finger: finger_id,
                    x: x * win_w as f32,
                    y: y * win_h as f32,
                }),
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => events.push(InputEvent::Resized {
                    width: w.max(0) as u32,
                    height: h.max(0) as u32,
                }),
                Event::DropFile { filename, .. } => {
                    events.push(InputEvent::DropFile(PathBuf::from(filename)));
                },
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Streaming texture matching a `PixelBuffer` of the given size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let mut texture = texture_creator
            .create_texture_streaming(RGBA_BYTES, width.max(1), height.max(1))
            .map_err(|e| Error::display(e.to_string()))?;
        texture.set_blend_mode(SdlBlendMode::Blend);
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn map_mouse_button(btn: MouseButton) -> Option<MouseButtonKind> {
    match btn {
        MouseButton::Left => Some(MouseButtonKind::Left),
        MouseButton::Right => Some(MouseButtonKind::Right),
        MouseButton::Middle => Some(MouseButtonKind::Middle),
        _ => None,
    }
}
