//! Line Follower Pilot
//!
//! The real-time control loop tying perception, decision and actuation
//! together, plus its configuration, logging and telemetry.

pub mod config;
pub mod control;
pub mod telemetry;

pub use config::PilotConfig;
pub use control::{ControlLoop, RunOutcome};
pub use telemetry::CycleReport;

use std::str::FromStr;

use calibration::CalibrationError;
use camera_capture::CameraError;
use motion::MotorError;
use obstacle_monitor::SensorError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pilot error types
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("Startup failed: {0}")]
    Startup(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Motor error: {0}")]
    Motor(#[from] MotorError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize logging at the given max level
pub fn init_logging(level: &str) -> Result<(), PilotError> {
    let level = Level::from_str(level).map_err(|e| PilotError::Logging(format!("{}: {}", level, e)))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| PilotError::Logging(e.to_string()))
}
