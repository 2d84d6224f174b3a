//! Crate-wide error type
//!
//! SDL reports failures as plain strings; those are wrapped at the boundary.
//! Everything else carries its source error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Window, renderer or texture setup failed
    #[error("display error: {0}")]
    Display(String),

    /// Audio device could not be opened
    #[error("audio unavailable: {0}")]
    Audio(String),

    /// File does not declare an image type
    #[error("not an image file: {}", .0.display())]
    NotAnImage(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an SDL display-side error string
    pub fn display(message: impl Into<String>) -> Self {
        Self::Display(message.into())
    }

    /// Wrap an SDL audio-side error string
    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = Error::display("no video device");
        assert_eq!(err.to_string(), "display error: no video device");

        let err = Error::NotAnImage(PathBuf::from("notes.txt"));
        assert_eq!(err.to_string(), "not an image file: notes.txt");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
