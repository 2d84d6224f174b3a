//! Settings file
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::util::hex_color;
use crate::weapons::{Arsenal, WeaponKind};

pub const DEFAULT_EXPORT_PATH: &str = "email-destroyer.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub mute: bool,
    /// Shown behind the image and through its holes
    #[serde(with = "hex_color")]
    pub backdrop: (u8, u8, u8),
    pub export_path: PathBuf,
    /// Weapon selected at startup
    pub weapon: WeaponKind,
    pub arsenal: Arsenal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            mute: false,
            backdrop: (0x0b, 0x0d, 0x12),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            weapon: WeaponKind::default(),
            arsenal: Arsenal::default(),
        }
    }
}

impl Config {
    /// Save config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
