//! Line Follower Motion Control
//!
//! Turns a driving action and the lateral error into wheel speeds:
//! - PID steering with anti-windup for line following
//! - Timed open-loop maneuvers (90 degree turns, U-turn, obstacle phases)
//! - Maneuver debounce
//! - Motor driver interface with simulated and recording drivers

pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod pid;
pub mod plan;
pub mod sim;

pub use command::{MotorCommand, Wheel, MAX_SPEED};
pub use config::{AvoidanceManeuver, MotionConfig, TimedTurn};
pub use controller::MotionController;
pub use driver::MotorDriver;
pub use pid::{PidGains, PidState};
pub use plan::{ManeuverStep, MotionPlan};
pub use sim::{MotorEvent, RecordingMotors, SimulatedMotors};

use thiserror::Error;

/// Motor error types
#[derive(Error, Debug)]
pub enum MotorError {
    #[error("Motor hardware fault: {0}")]
    Hardware(String),

    #[error("Motor driver not initialized")]
    NotInitialized,

    #[error("Invalid motion configuration: {0}")]
    InvalidConfig(String),
}
