//! Load a picture and wreck it.
//!
//! Weapons punch holes into a damage mask and burn marks into a scorch
//! overlay; each frame composites the picture with both, then draws debris
//! and applies screen shake. The `email-destroyer` binary drives this with
//! an SDL2 window.
pub mod audio;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod loader;
pub mod logging;
pub mod particles;
pub mod shake;
pub mod sim;
pub mod texture;
pub mod util;
pub mod weapons;

pub use config::Config;
pub use error::{Error, Result};
pub use sim::Simulation;
pub use weapons::WeaponKind;
