//! Camera capture and the scoped camera session.
//!
//! A [`CameraSession`] owns a started camera. The camera is stopped on
//! [`CameraSession::stop`] and, failing that, when the session is dropped.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use petpal_core::Frame;

use crate::mime::image_mime_type;

/// A frame source that must be started before capture and stopped after.
pub trait Camera: Send {
    fn name(&self) -> &str;
    fn start(&mut self) -> Result<()>;
    fn capture(&mut self) -> Result<Frame>;
    /// Release the device. Must be idempotent.
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// A started camera, released when this value goes away.
pub struct CameraSession {
    camera: Box<dyn Camera>,
}

impl CameraSession {
    pub fn open(mut camera: Box<dyn Camera>) -> Result<Self> {
        camera
            .start()
            .with_context(|| format!("Failed to start camera '{}'", camera.name()))?;
        info!(camera = camera.name(), "Camera started");
        Ok(Self { camera })
    }

    pub fn capture(&mut self) -> Result<Frame> {
        self.camera.capture()
    }

    pub fn is_active(&self) -> bool {
        self.camera.is_active()
    }

    /// Explicit stop. Equivalent to dropping the session.
    pub fn stop(self) {}
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.camera.is_active() {
            self.camera.stop();
            info!(camera = self.camera.name(), "Camera stopped");
        }
    }
}

/// Replays image files from a directory, in name order, looping forever.
pub struct DirectoryCamera {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    cursor: usize,
    active: bool,
}

impl DirectoryCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Vec::new(),
            cursor: 0,
            active: false,
        }
    }

    fn scan(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && image_mime_type(p).is_some())
            .collect();
        frames.sort();
        Ok(frames)
    }
}

impl Camera for DirectoryCamera {
    fn name(&self) -> &str {
        "directory"
    }

    fn start(&mut self) -> Result<()> {
        let frames = Self::scan(&self.dir)?;
        if frames.is_empty() {
            bail!("No image frames in {}", self.dir.display());
        }
        debug!(count = frames.len(), dir = %self.dir.display(), "Frames found");
        self.frames = frames;
        self.cursor = 0;
        self.active = true;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame> {
        if !self.active {
            bail!("Camera is not started");
        }
        let path = &self.frames[self.cursor % self.frames.len()];
        self.cursor += 1;
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read frame: {}", path.display()))?;
        let mime = image_mime_type(path).unwrap_or("application/octet-stream");
        Ok(Frame::new(bytes, mime))
    }

    fn stop(&mut self) {
        self.active = false;
        self.frames.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
