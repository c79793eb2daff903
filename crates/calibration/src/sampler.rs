//! Threshold derivation from sampled pixels
//!
//! The calibration step collects pixels the operator marks as black line,
//! green signage, and white floor, then turns them into a profile.

use tracing::info;

use crate::{CalibrationError, CalibrationProfile, HsvRange, HUE_MAX};

/// Margin added above the mean black sample
const BLACK_MARGIN: f64 = 30.0;
/// Margin subtracted below the mean white sample
const WHITE_MARGIN: f64 = 30.0;
/// Hue slack around the sampled green hues
const GREEN_HUE_MARGIN: u8 = 10;
/// Saturation and value floor for green
const GREEN_SV_FLOOR: u8 = 40;

/// Accumulates calibration samples
#[derive(Debug, Clone, Default)]
pub struct CalibrationSampler {
    black: Vec<u8>,
    green: Vec<[u8; 3]>,
    white: Vec<u8>,
}

impl CalibrationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gray level sampled on the line
    pub fn add_black(&mut self, gray: u8) {
        self.black.push(gray);
    }

    /// Add an HSV pixel sampled on green signage
    pub fn add_green(&mut self, hsv: [u8; 3]) {
        self.green.push(hsv);
    }

    /// Add a gray level sampled on the floor
    pub fn add_white(&mut self, gray: u8) {
        self.white.push(gray);
    }

    /// Total samples collected
    pub fn sample_count(&self) -> usize {
        self.black.len() + self.green.len() + self.white.len()
    }

    /// Derive a profile from `base`, replacing only the fields that have samples.
    /// Red ranges are never sampled.
    pub fn apply(&self, base: &CalibrationProfile) -> Result<CalibrationProfile, CalibrationError> {
        let mut profile = base.clone();

        if let Some(mean) = mean(&self.black) {
            profile.black_cutoff = (mean + BLACK_MARGIN).clamp(0.0, 255.0) as u8;
            info!("Black cutoff {} from {} samples", profile.black_cutoff, self.black.len());
        }

        if let Some(mean) = mean(&self.white) {
            profile.white_cutoff = (mean - WHITE_MARGIN).clamp(0.0, 255.0) as u8;
            info!("White cutoff {} from {} samples", profile.white_cutoff, self.white.len());
        }

        let hues = self.green.iter().map(|hsv| hsv[0]);
        if let (Some(h_min), Some(h_max)) = (hues.clone().min(), hues.max()) {
            profile.green = HsvRange::new(
                [h_min.saturating_sub(GREEN_HUE_MARGIN), GREEN_SV_FLOOR, GREEN_SV_FLOOR],
                [h_max.saturating_add(GREEN_HUE_MARGIN).min(HUE_MAX - 1), 255, 255],
            );
            info!("Green range {:?} from {} samples", profile.green, self.green.len());
        }

        profile.validate()?;
        Ok(profile)
    }
}

fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}
