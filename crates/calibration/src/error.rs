//! Calibration Error Types

use thiserror::Error;

/// Errors raised while loading or validating a calibration profile
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Lower bound above upper bound
    #[error("{field} lower bound {lower} exceeds upper bound {upper}")]
    InvertedRange {
        field: &'static str,
        lower: f64,
        upper: f64,
    },

    /// Profile source could not be read or deserialized
    #[error("Failed to load calibration: {0}")]
    Load(#[from] config::ConfigError),
}
