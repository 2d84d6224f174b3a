//! PNG export of the composited frame

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageFormat, RgbaImage};

use crate::display::PixelBuffer;
use crate::error::{Error, Result};

/// Encode `frame` as PNG, keeping transparency
pub fn encode_png(frame: &PixelBuffer) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(frame.width(), frame.height(), frame.as_bytes().to_vec())
        .ok_or_else(|| {
            Error::Encode(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )))
        })?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(bytes)
}

pub fn write_png(path: impl AsRef<Path>, png: &[u8]) -> Result<()> {
    fs::write(path, png)?;
    Ok(())
}
