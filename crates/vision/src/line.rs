//! Line centroid tracking with gap hysteresis

use calibration::CalibrationProfile;
use camera_capture::{luminance, VideoFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Roi;

/// Frames the line may be missing before the tracker gives up on it
pub const DEFAULT_MAX_GAP_FRAMES: u32 = 15;

/// How the current reading was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStatus {
    /// Centroid found this cycle
    Following,
    /// Line missing, still inside the gap window; error is the last known one
    CrossingGap,
    /// Line missing for too long; error is zero
    Searching,
}

/// Output of one tracking step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReading {
    /// Positive when the line is left of the frame centre
    pub error: i32,
    pub status: LineStatus,
}

impl LineReading {
    pub fn lost(&self) -> bool {
        self.status != LineStatus::Following
    }
}

/// Tracking memory carried across cycles of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTrackState {
    pub last_error: i32,
    pub gap_counter: u32,
}

impl LineTrackState {
    /// Fold one cycle's centroid offset (or its absence) into the state
    pub fn advance(&mut self, offset: Option<i32>, max_gap_frames: u32) -> LineReading {
        match offset {
            Some(error) => {
                self.gap_counter = 0;
                self.last_error = error;
                LineReading {
                    error,
                    status: LineStatus::Following,
                }
            }
            None => {
                self.gap_counter = self.gap_counter.saturating_add(1);
                if self.gap_counter < max_gap_frames {
                    LineReading {
                        error: self.last_error,
                        status: LineStatus::CrossingGap,
                    }
                } else {
                    if self.gap_counter == max_gap_frames {
                        debug!("Line lost for {} frames, searching", self.gap_counter);
                    }
                    LineReading {
                        error: 0,
                        status: LineStatus::Searching,
                    }
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Centroid tracker over a thin horizontal strip
#[derive(Debug, Clone, Copy)]
pub struct LineTracker {
    strip: Roi,
    max_gap_frames: u32,
}

impl LineTracker {
    pub fn new(strip: Roi, max_gap_frames: u32) -> Self {
        Self {
            strip,
            max_gap_frames,
        }
    }

    pub fn strip(&self) -> Roi {
        self.strip
    }

    /// `frame_width / 2 - centroid_x` over the black pixels of the strip,
    /// or `None` when the strip holds no black pixel
    pub fn centroid_offset(&self, frame: &VideoFrame, calib: &CalibrationProfile) -> Option<i32> {
        let (mut mass, mut moment) = (0u64, 0u64);
        for (x, _, rgb) in frame.region(self.strip.x, self.strip.y, self.strip.width, self.strip.height) {
            if calib.is_black(luminance(rgb)) {
                mass += 1;
                moment += x as u64;
            }
        }

        if mass == 0 {
            return None;
        }
        let centroid_x = (moment / mass) as i64;
        Some((frame.width as i64 / 2 - centroid_x) as i32)
    }

    /// Measure the strip and advance `state` in one step.
    ///
    /// Standalone form for callers holding both the frame and the tracking
    /// state. The control loop splits the two: `Perception` measures with
    /// [`LineTracker::centroid_offset`] and the decision engine folds the
    /// offset through [`LineTrackState::advance`] on every cycle.
    pub fn compute_error(
        &self,
        frame: &VideoFrame,
        calib: &CalibrationProfile,
        state: &mut LineTrackState,
    ) -> LineReading {
        state.advance(self.centroid_offset(frame, calib), self.max_gap_frames)
    }
}
