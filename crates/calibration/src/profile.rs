//! Calibration profile types and validation

use serde::{Deserialize, Serialize};

use crate::CalibrationError;

/// Largest hue value in the 8-bit HSV convention
pub const HUE_MAX: u8 = 180;

/// Inclusive HSV range (H in [0, 180], S and V in [0, 255])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Whether an HSV pixel falls inside the range (bounds included)
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }

    fn validate(&self, field: &'static str) -> Result<(), CalibrationError> {
        for bound in [self.lower[0], self.upper[0]] {
            if bound > HUE_MAX {
                return Err(CalibrationError::OutOfRange {
                    field,
                    value: bound as f64,
                    min: 0.0,
                    max: HUE_MAX as f64,
                });
            }
        }
        for c in 0..3 {
            if self.lower[c] > self.upper[c] {
                return Err(CalibrationError::InvertedRange {
                    field,
                    lower: self.lower[c] as f64,
                    upper: self.upper[c] as f64,
                });
            }
        }
        Ok(())
    }
}

/// Minimum percentage of ROI pixels a color needs before it wins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentThresholds {
    pub black: f32,
    pub green: f32,
    pub white: f32,
    pub red: f32,
}

impl Default for PercentThresholds {
    fn default() -> Self {
        Self {
            black: 50.0,
            green: 30.0,
            white: 50.0,
            red: 40.0,
        }
    }
}

/// Calibration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationProfile {
    /// Gray level at or below which a pixel counts as black
    pub black_cutoff: u8,
    /// Gray level at or above which a pixel counts as white
    pub white_cutoff: u8,
    /// Green signage range
    pub green: HsvRange,
    /// Red range below hue 0 wrap
    pub red_low: HsvRange,
    /// Red range above hue 0 wrap
    pub red_high: HsvRange,
    /// Per-color percentage thresholds
    pub percent: PercentThresholds,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            black_cutoff: 80,
            white_cutoff: 200,
            green: HsvRange::new([40, 50, 50], [80, 255, 255]),
            red_low: HsvRange::new([0, 70, 50], [10, 255, 255]),
            red_high: HsvRange::new([170, 70, 50], [180, 255, 255]),
            percent: PercentThresholds::default(),
        }
    }
}

impl CalibrationProfile {
    /// Whether an HSV pixel is red in either of the two ranges
    #[inline]
    pub fn is_red(&self, hsv: [u8; 3]) -> bool {
        self.red_low.contains(hsv) || self.red_high.contains(hsv)
    }

    /// Whether an HSV pixel is green signage
    #[inline]
    pub fn is_green(&self, hsv: [u8; 3]) -> bool {
        self.green.contains(hsv)
    }

    /// Whether a gray level counts as line black
    #[inline]
    pub fn is_black(&self, gray: u8) -> bool {
        gray <= self.black_cutoff
    }

    /// Check every field once; classification trusts the profile afterwards
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.black_cutoff >= self.white_cutoff {
            return Err(CalibrationError::InvertedRange {
                field: "black_cutoff/white_cutoff",
                lower: self.black_cutoff as f64,
                upper: self.white_cutoff as f64,
            });
        }

        self.green.validate("green")?;
        self.red_low.validate("red_low")?;
        self.red_high.validate("red_high")?;

        let percents = [
            ("percent.black", self.percent.black),
            ("percent.green", self.percent.green),
            ("percent.white", self.percent.white),
            ("percent.red", self.percent.red),
        ];
        for (field, value) in percents {
            if !(0.0..=100.0).contains(&value) {
                return Err(CalibrationError::OutOfRange {
                    field,
                    value: value as f64,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(CalibrationProfile::default().validate().is_ok());
    }

    #[test]
    fn test_hsv_range_bounds_inclusive() {
        let range = HsvRange::new([40, 50, 50], [80, 255, 255]);
        assert!(range.contains([40, 50, 50]));
        assert!(range.contains([80, 255, 255]));
        assert!(!range.contains([39, 200, 200]));
        assert!(!range.contains([60, 49, 200]));
    }

    #[test]
    fn test_red_covers_both_ends_of_hue_circle() {
        let profile = CalibrationProfile::default();
        assert!(profile.is_red([2, 200, 200]));
        assert!(profile.is_red([178, 200, 200]));
        assert!(!profile.is_red([90, 200, 200]));
    }

    #[test]
    fn test_black_cutoff_inclusive() {
        let profile = CalibrationProfile::default();
        assert!(profile.is_black(80));
        assert!(!profile.is_black(81));
    }

    #[test]
    fn test_inverted_cutoffs_rejected() {
        let profile = CalibrationProfile {
            black_cutoff: 210,
            ..Default::default()
        };
        assert!(matches!(profile.validate(), Err(CalibrationError::InvertedRange { .. })));
    }

    #[test]
    fn test_hue_out_of_range_rejected() {
        let profile = CalibrationProfile {
            green: HsvRange::new([40, 50, 50], [200, 255, 255]),
            ..Default::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(CalibrationError::OutOfRange { field: "green", .. })
        ));
    }

    #[test]
    fn test_inverted_channel_rejected() {
        let profile = CalibrationProfile {
            red_low: HsvRange::new([10, 70, 50], [0, 255, 255]),
            ..Default::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(CalibrationError::InvertedRange { field: "red_low", .. })
        ));
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let mut profile = CalibrationProfile::default();
        profile.percent.green = 120.0;
        assert!(matches!(
            profile.validate(),
            Err(CalibrationError::OutOfRange { field: "percent.green", .. })
        ));
    }
}
