//! Navigation configuration

use serde::{Deserialize, Serialize};

/// Decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Distance below which the avoidance sequence starts (cm)
    pub obstacle_threshold_cm: f32,
    /// Consecutive frames without a line before searching
    pub max_gap_frames: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            obstacle_threshold_cm: 15.0,
            max_gap_frames: vision::DEFAULT_MAX_GAP_FRAMES,
        }
    }
}
