//! Obstacle Monitor
//!
//! Distance readings for obstacle detection. Every reading is bounded in
//! time and never fails: a missing or implausible echo becomes
//! [`SENTINEL_DISTANCE_CM`], which reads as "no obstacle".

pub mod fixed;
pub mod ultrasonic;

pub use fixed::FixedDistance;
pub use ultrasonic::{distance_from_pulse, EchoPin, ObstacleMonitor};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Distance reported when no reliable echo was measured
pub const SENTINEL_DISTANCE_CM: f32 = 999.0;

/// Sensor error types
///
/// Only raised while setting a sensor up. Once running, failures are
/// absorbed into the sentinel distance.
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor initialization failed: {0}")]
    Init(String),

    #[error("Invalid sensor configuration: {0}")]
    InvalidConfig(String),
}

/// A distance sensor collaborator
pub trait DistanceSensor {
    /// Distance in centimeters; never blocks past its timeout
    fn measure_distance(&mut self) -> f32;
}

impl<S: DistanceSensor + ?Sized> DistanceSensor for Box<S> {
    fn measure_distance(&mut self) -> f32 {
        (**self).measure_distance()
    }
}

/// Ultrasonic sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Trigger pulse width in microseconds
    pub trigger_pulse_us: u64,
    /// Maximum wait for each echo edge in milliseconds
    pub echo_timeout_ms: u64,
    /// Readings at or beyond this distance are discarded
    pub max_plausible_cm: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            trigger_pulse_us: 10,
            echo_timeout_ms: 100,
            max_plausible_cm: 400.0,
        }
    }
}

impl ObstacleConfig {
    pub fn trigger_pulse(&self) -> Duration {
        Duration::from_micros(self.trigger_pulse_us)
    }

    pub fn echo_timeout(&self) -> Duration {
        Duration::from_millis(self.echo_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), SensorError> {
        if self.echo_timeout_ms == 0 {
            return Err(SensorError::InvalidConfig("echo_timeout_ms must be positive".into()));
        }
        if self.max_plausible_cm.is_nan() || self.max_plausible_cm <= 0.0 {
            return Err(SensorError::InvalidConfig(format!(
                "max_plausible_cm must be positive, got {}",
                self.max_plausible_cm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ObstacleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.echo_timeout(), Duration::from_millis(100));
        assert_eq!(config.trigger_pulse(), Duration::from_micros(10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ObstacleConfig {
            echo_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SensorError::InvalidConfig(_))));

        let config = ObstacleConfig {
            max_plausible_cm: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
