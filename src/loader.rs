//! Background image decoding
//!
//! Requests go to one worker thread and finished images come back over a
//! channel that the frame loop polls. Results arrive in request order, so
//! applying them in order makes the newest request win.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::{ImageFormat, RgbaImage};
use log::{debug, warn};

use crate::error::{Error, Result};

/// A decoded picture and where it came from
pub struct Loaded {
    pub path: PathBuf,
    pub image: RgbaImage,
}

pub struct Loader {
    requests: Sender<PathBuf>,
    results: Receiver<Result<Loaded>>,
    _worker: thread::JoinHandle<()>,
}

/// True when the extension names an image format we can decode
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| format.reading_enabled())
}

/// Decode `path` into RGBA8 on the calling thread
pub fn decode(path: &Path) -> Result<RgbaImage> {
    if !is_image_path(path) {
        return Err(Error::NotAnImage(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.into_rgba8())
}

impl Loader {
    pub fn new() -> Self {
        let (requests, inbox) = mpsc::channel::<PathBuf>();
        let (outbox, results) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::worker_loop(inbox, outbox);
        });

        Self {
            requests,
            results,
            _worker: handle,
        }
    }

    fn worker_loop(inbox: Receiver<PathBuf>, outbox: Sender<Result<Loaded>>) {
        for path in inbox {
            let result = decode(&path).map(|image| Loaded { path, image });
            if outbox.send(result).is_err() {
                break;
            }
        }
    }

    /// Queue `path` for decoding. Paths that do not name an image are refused
    /// here without touching the file.
    pub fn request(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !is_image_path(&path) {
            return Err(Error::NotAnImage(path));
        }
        debug!("loading {}", path.display());
        if let Err(e) = self.requests.send(path) {
            warn!("loader thread is gone, dropping {}", e.0.display());
        }
        Ok(())
    }

    /// Get any finished loads (non-blocking), oldest first
    pub fn poll(&self) -> Vec<Result<Loaded>> {
        let mut finished = Vec::new();
        while let Ok(result) = self.results.try_recv() {
            finished.push(result);
        }
        finished
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
