//! Camera Capture Library for the Line Follower
//!
//! Provides the frame model and the camera collaborators consumed by the
//! control loop:
//! - RGB frames with grayscale and HSV derivation
//! - Frame sources (`FrameSource`), including image-sequence replay
//! - A capture worker thread feeding a single-slot latest-frame handoff

pub mod frame;
pub mod latest;
pub mod source;

pub use frame::{luminance, rgb_to_hsv, VideoFrame};
pub use latest::{CaptureService, LatestFrame};
pub use source::{FrameSource, ImageSequenceSource};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera source: {0}")]
    Open(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("No frames found in {0}")]
    Empty(String),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory of recorded frames to replay (bench runs without a camera)
    pub frames_dir: Option<PathBuf>,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS for the capture worker
    pub fps: u32,
    /// Restart the replay once the last frame has been served
    pub loop_frames: bool,
    /// Run acquisition on a worker thread feeding the latest-frame slot
    pub threaded: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frames_dir: None,
            width: 320,
            height: 180,
            fps: 30,
            loop_frames: false,
            threaded: false,
        }
    }
}
