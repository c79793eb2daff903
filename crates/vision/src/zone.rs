//! Zone color classification

use std::ops::{Index, IndexMut};

use calibration::CalibrationProfile;
use camera_capture::{luminance, rgb_to_hsv, VideoFrame};
use serde::{Deserialize, Serialize};

use crate::{Roi, ZoneId};

/// Discrete color state of one zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneState {
    Black,
    #[default]
    White,
    Green,
    Red,
}

/// One state per zone, indexed by `ZoneId`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStates([ZoneState; 5]);

impl ZoneStates {
    pub fn get(&self, id: ZoneId) -> ZoneState {
        self.0[id.index()]
    }

    pub fn set(&mut self, id: ZoneId, state: ZoneState) {
        self.0[id.index()] = state;
    }

    /// Builder form of `set`
    pub fn with(mut self, id: ZoneId, state: ZoneState) -> Self {
        self.set(id, state);
        self
    }

    pub fn any_red(&self) -> bool {
        self.0.contains(&ZoneState::Red)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, ZoneState)> + '_ {
        ZoneId::ALL.iter().map(move |&id| (id, self.get(id)))
    }
}

impl Index<ZoneId> for ZoneStates {
    type Output = ZoneState;

    fn index(&self, id: ZoneId) -> &ZoneState {
        &self.0[id.index()]
    }
}

impl IndexMut<ZoneId> for ZoneStates {
    fn index_mut(&mut self, id: ZoneId) -> &mut ZoneState {
        &mut self.0[id.index()]
    }
}

/// Classifies a region of a frame into a `ZoneState`
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneClassifier;

impl ZoneClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Red beats green beats black; anything else is White.
    ///
    /// Only the part of `roi` inside the frame is counted. A region with no
    /// pixels inside the frame is White.
    pub fn classify(&self, frame: &VideoFrame, roi: Roi, calib: &CalibrationProfile) -> ZoneState {
        let area = frame.clipped_area(roi.x, roi.y, roi.width, roi.height);
        if area == 0 {
            return ZoneState::White;
        }

        let (mut red, mut green, mut black) = (0u64, 0u64, 0u64);
        for (_, _, rgb) in frame.region(roi.x, roi.y, roi.width, roi.height) {
            let hsv = rgb_to_hsv(rgb);
            if calib.is_red(hsv) {
                red += 1;
            }
            if calib.is_green(hsv) {
                green += 1;
            }
            if calib.is_black(luminance(rgb)) {
                black += 1;
            }
        }

        let percent = |count: u64| (count as f64 * 100.0 / area as f64) as f32;
        let thresholds = &calib.percent;

        if percent(red) > thresholds.red {
            ZoneState::Red
        } else if percent(green) > thresholds.green {
            ZoneState::Green
        } else if percent(black) > thresholds.black {
            ZoneState::Black
        } else {
            ZoneState::White
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BLACK: [u8; 3] = [10, 10, 10];
    const WHITE: [u8; 3] = [240, 240, 240];
    const GREEN: [u8; 3] = [0, 200, 0];
    const RED: [u8; 3] = [220, 0, 0];

    fn classify(frame: &VideoFrame, roi: Roi) -> ZoneState {
        ZoneClassifier::new().classify(frame, roi, &CalibrationProfile::default())
    }

    #[test]
    fn test_solid_colors() {
        let roi = Roi::new(0, 0, 10, 10);
        assert_eq!(classify(&VideoFrame::filled(10, 10, BLACK), roi), ZoneState::Black);
        assert_eq!(classify(&VideoFrame::filled(10, 10, WHITE), roi), ZoneState::White);
        assert_eq!(classify(&VideoFrame::filled(10, 10, GREEN), roi), ZoneState::Green);
        assert_eq!(classify(&VideoFrame::filled(10, 10, RED), roi), ZoneState::Red);
    }

    #[test]
    fn test_zero_area_is_white() {
        let frame = VideoFrame::filled(10, 10, BLACK);
        assert_eq!(classify(&frame, Roi::new(0, 0, 0, 5)), ZoneState::White);
        // Entirely outside the frame
        assert_eq!(classify(&frame, Roi::new(20, 20, 5, 5)), ZoneState::White);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly half black: 50% is not above the 50% threshold
        let mut frame = VideoFrame::filled(10, 10, WHITE);
        frame.fill_rect(0, 0, 5, 10, BLACK);
        assert_eq!(classify(&frame, Roi::new(0, 0, 10, 10)), ZoneState::White);

        frame.fill_rect(5, 0, 1, 10, BLACK);
        assert_eq!(classify(&frame, Roi::new(0, 0, 10, 10)), ZoneState::Black);
    }

    #[test]
    fn test_green_beats_black() {
        // 40% green clears its 30% threshold before black at 60% is considered
        let mut frame = VideoFrame::filled(10, 10, BLACK);
        frame.fill_rect(0, 0, 4, 10, GREEN);
        assert_eq!(classify(&frame, Roi::new(0, 0, 10, 10)), ZoneState::Green);
    }

    #[test]
    fn test_overhanging_roi_uses_clipped_area() {
        // Only the 5x5 in-frame corner counts, and it is all black
        let mut frame = VideoFrame::filled(10, 10, WHITE);
        frame.fill_rect(5, 5, 5, 5, BLACK);
        assert_eq!(classify(&frame, Roi::new(5, 5, 20, 20)), ZoneState::Black);
    }

    #[test]
    fn test_zone_states_indexing() {
        let states = ZoneStates::default().with(ZoneId::RearLeft, ZoneState::Green);
        assert_eq!(states[ZoneId::RearLeft], ZoneState::Green);
        assert_eq!(states.get(ZoneId::CenterTop), ZoneState::White);
        assert!(!states.any_red());
        assert!(states.with(ZoneId::CenterTop, ZoneState::Red).any_red());
    }

    proptest! {
        #[test]
        fn test_red_majority_always_wins(
            red_cols in 5u32..=10,
            other in prop::sample::select(vec![BLACK, WHITE, GREEN]),
        ) {
            // Anything above 40% red is Red, whatever fills the rest
            let mut frame = VideoFrame::filled(10, 10, other);
            frame.fill_rect(0, 0, red_cols, 10, RED);
            prop_assert_eq!(classify(&frame, Roi::new(0, 0, 10, 10)), ZoneState::Red);
        }
    }
}
