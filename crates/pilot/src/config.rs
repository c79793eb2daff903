//! Pilot configuration

use std::path::{Path, PathBuf};

use calibration::CalibrationProfile;
use camera_capture::CameraConfig;
use config::{Config, Environment, File};
use motion::MotionConfig;
use navigation::NavigationConfig;
use obstacle_monitor::{ObstacleConfig, SENTINEL_DISTANCE_CM};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PilotError;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Control cycles per second
    pub tick_hz: u32,
    /// Max log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Calibration profile; defaults are used when unset
    pub calibration_file: Option<PathBuf>,
    /// Distance reported by the bench sensor when no ultrasonic sensor is wired
    pub bench_distance_cm: f32,

    pub camera: CameraConfig,
    pub navigation: NavigationConfig,
    pub motion: MotionConfig,
    pub obstacle: ObstacleConfig,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            log_level: "info".to_string(),
            calibration_file: None,
            bench_distance_cm: SENTINEL_DISTANCE_CM,
            camera: CameraConfig::default(),
            navigation: NavigationConfig::default(),
            motion: MotionConfig::default(),
            obstacle: ObstacleConfig::default(),
        }
    }
}

impl PilotConfig {
    /// Load from an optional file plus `LINEBOT__*` environment overrides
    /// (e.g. `LINEBOT__TICK_HZ=60`)
    pub fn load(path: Option<&Path>) -> Result<Self, PilotError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("LINEBOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: PilotConfig = settings.try_deserialize()?;
        config.validate()?;

        match path {
            Some(path) => info!("Configuration loaded from {}", path.display()),
            None => info!("Using default configuration"),
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PilotError> {
        if self.tick_hz == 0 {
            return Err(PilotError::InvalidConfig("tick_hz must be positive".into()));
        }
        if self.navigation.obstacle_threshold_cm.is_nan() || self.navigation.obstacle_threshold_cm < 0.0 {
            return Err(PilotError::InvalidConfig(format!(
                "navigation.obstacle_threshold_cm must be non-negative, got {}",
                self.navigation.obstacle_threshold_cm
            )));
        }
        self.motion.validate()?;
        self.obstacle.validate()?;
        Ok(())
    }

    /// The calibration profile for this run, validated
    pub fn load_calibration(&self) -> Result<CalibrationProfile, PilotError> {
        match &self.calibration_file {
            Some(path) => Ok(calibration::load_profile(path)?),
            None => {
                let profile = CalibrationProfile::default();
                profile.validate()?;
                info!("Using default calibration");
                Ok(profile)
            }
        }
    }
}
