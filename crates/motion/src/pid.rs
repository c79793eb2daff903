//! PID state for line following

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Controller gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub integral_limit: f32,
}

/// Memory carried across cycles of one run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Accumulated error, kept within the integral limit
    pub integral: f32,
    pub last_error: i32,
    /// Start of the most recent maneuver
    pub last_action: Option<Instant>,
}

impl PidState {
    /// One PID step on the lateral error
    pub fn update(&mut self, error: i32, gains: &PidGains) -> f32 {
        let limit = gains.integral_limit;
        self.integral = (self.integral + error as f32).clamp(-limit, limit);
        let derivative = (error - self.last_error) as f32;
        self.last_error = error;

        gains.kp * error as f32 + gains.ki * self.integral + gains.kd * derivative
    }

    /// Forget the loop history; the maneuver timestamp is kept
    pub fn reset_loop(&mut self) {
        self.integral = 0.0;
        self.last_error = 0;
    }
}
