//! Calibration Profile
//!
//! Thresholds and color ranges used by zone classification and line
//! tracking. Profiles are produced by an external calibration step, loaded
//! and validated once, and then treated as read-only for a whole run.

mod error;
mod loader;
mod profile;
mod sampler;

pub use error::CalibrationError;
pub use loader::load_profile;
pub use profile::{CalibrationProfile, HsvRange, PercentThresholds, HUE_MAX};
pub use sampler::CalibrationSampler;
