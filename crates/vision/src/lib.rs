//! Line Follower Vision
//!
//! Per-frame perception for the control loop:
//! - Proportional ROI layout (five zones plus the line strip)
//! - Zone color classification with fixed priority
//! - Line centroid tracking with gap-crossing hysteresis

pub mod line;
pub mod roi;
pub mod zone;

pub use line::{LineReading, LineStatus, LineTrackState, LineTracker, DEFAULT_MAX_GAP_FRAMES};
pub use roi::{Roi, RoiLayout, ZoneId};
pub use zone::{ZoneClassifier, ZoneState, ZoneStates};

use calibration::CalibrationProfile;
use camera_capture::VideoFrame;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Everything the decision stage needs from one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionFrame {
    pub zones: ZoneStates,
    /// Centroid offset of the line strip, `None` when no line is visible
    pub line_offset: Option<i32>,
}

/// Perception stage
pub struct Perception {
    calibration: CalibrationProfile,
    classifier: ZoneClassifier,
    max_gap_frames: u32,
}

impl Perception {
    /// `calibration` must already be validated; it is trusted from here on
    pub fn new(calibration: CalibrationProfile) -> Self {
        Self {
            calibration,
            classifier: ZoneClassifier::new(),
            max_gap_frames: DEFAULT_MAX_GAP_FRAMES,
        }
    }

    pub fn with_max_gap_frames(mut self, frames: u32) -> Self {
        self.max_gap_frames = frames;
        self
    }

    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    /// Classify every zone and measure the line strip
    pub fn analyze(&self, frame: &VideoFrame) -> PerceptionFrame {
        let layout = RoiLayout::for_frame(frame.width, frame.height);

        let mut zones = ZoneStates::default();
        for (id, roi) in layout.zones() {
            zones.set(id, self.classifier.classify(frame, roi, &self.calibration));
        }

        let tracker = LineTracker::new(layout.line_strip(), self.max_gap_frames);
        let line_offset = tracker.centroid_offset(frame, &self.calibration);

        trace!(sequence = frame.sequence, ?zones, ?line_offset, "Frame analyzed");

        PerceptionFrame { zones, line_offset }
    }
}
