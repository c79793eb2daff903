//! Frame sources consumed by the control loop

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{CameraError, VideoFrame};

/// A camera collaborator.
///
/// `None` signals an I/O failure for this capture; it is never a crash
/// condition and callers must degrade to a stopped state.
pub trait FrameSource {
    fn capture_frame(&mut self) -> Option<VideoFrame>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn capture_frame(&mut self) -> Option<VideoFrame> {
        (**self).capture_frame()
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "ppm"];

/// Replays a directory of recorded frames in file-name order
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    position: usize,
    size: Option<(u32, u32)>,
    looping: bool,
    sequence: u32,
}

impl ImageSequenceSource {
    /// Open a directory of frames
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CameraError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(CameraError::Empty(dir.display().to_string()));
        }
        paths.sort();

        info!("Replaying {} frames from {}", paths.len(), dir.display());

        Ok(Self {
            paths,
            position: 0,
            size: None,
            looping: false,
            sequence: 0,
        })
    }

    /// Resize every frame to the configured capture resolution
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Start over after the last frame instead of reporting failure
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

impl FrameSource for ImageSequenceSource {
    fn capture_frame(&mut self) -> Option<VideoFrame> {
        if self.position >= self.paths.len() {
            if !self.looping {
                debug!("Frame sequence exhausted");
                return None;
            }
            self.position = 0;
        }

        let path = &self.paths[self.position];
        self.position += 1;

        let img = match image::open(path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                warn!("Failed to decode {}: {}", path.display(), e);
                return None;
            }
        };

        self.sequence = self.sequence.wrapping_add(1);
        let frame = VideoFrame::from_rgb_image(img, self.sequence);
        Some(match self.size {
            Some((w, h)) if (w, h) != (frame.width, frame.height) => frame.resize(w, h),
            _ => frame,
        })
    }
}
