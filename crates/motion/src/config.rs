//! Motion configuration
//!
//! Defaults are the values tuned on the course robot.

use std::time::Duration;

use navigation::TurnDirection;
use serde::{Deserialize, Serialize};

use crate::MotorError;

/// Approach-then-spin maneuver timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedTurn {
    /// Forward drive before spinning (ms)
    pub approach_ms: u64,
    /// Spin duration (ms)
    pub turn_ms: u64,
}

impl TimedTurn {
    pub fn approach(&self) -> Duration {
        Duration::from_millis(self.approach_ms)
    }

    pub fn turn(&self) -> Duration {
        Duration::from_millis(self.turn_ms)
    }
}

impl Default for TimedTurn {
    fn default() -> Self {
        Self {
            approach_ms: 250,
            turn_ms: 500,
        }
    }
}

/// Obstacle avoidance primitives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceManeuver {
    pub speed: f32,
    /// Back-off before diverting (ms); zero disables it
    pub reverse_ms: u64,
    pub turn_ms: u64,
    /// Drive alongside the obstacle (ms)
    pub forward_ms: u64,
    /// Advance while looking for the line (ms)
    pub search_ms: u64,
    /// Side to divert to; realigning turns the other way
    pub divert: TurnDirection,
}

impl Default for AvoidanceManeuver {
    fn default() -> Self {
        Self {
            speed: 20.0,
            reverse_ms: 300,
            turn_ms: 500,
            forward_ms: 800,
            search_ms: 500,
            divert: TurnDirection::Right,
        }
    }
}

/// Motion controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Bound on the accumulated integral
    pub integral_limit: f32,

    pub base_speed: f32,
    pub intersection_speed: f32,
    /// Added to the base speed while crossing a gap
    pub gap_speed_boost: f32,
    pub turn_speed: f32,
    pub search_spin_speed: f32,

    /// Minimum spacing between maneuver starts (ms)
    pub action_delay_ms: u64,

    pub turn90: TimedTurn,
    pub u_turn: TimedTurn,
    pub u_turn_direction: TurnDirection,
    pub obstacle: AvoidanceManeuver,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            kp: 0.4,
            ki: 0.0,
            kd: 0.05,
            integral_limit: 200.0,
            base_speed: 15.0,
            intersection_speed: 15.0,
            gap_speed_boost: 5.0,
            turn_speed: 15.0,
            search_spin_speed: 35.0,
            action_delay_ms: 500,
            turn90: TimedTurn::default(),
            u_turn: TimedTurn {
                approach_ms: 200,
                turn_ms: 900,
            },
            u_turn_direction: TurnDirection::Right,
            obstacle: AvoidanceManeuver::default(),
        }
    }
}

impl MotionConfig {
    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }

    pub fn gap_speed(&self) -> f32 {
        self.base_speed + self.gap_speed_boost
    }

    pub fn validate(&self) -> Result<(), MotorError> {
        if self.integral_limit.is_nan() || self.integral_limit < 0.0 {
            return Err(MotorError::InvalidConfig(format!(
                "integral_limit must be non-negative, got {}",
                self.integral_limit
            )));
        }

        let speeds = [
            ("base_speed", self.base_speed),
            ("intersection_speed", self.intersection_speed),
            ("gap_speed", self.gap_speed()),
            ("turn_speed", self.turn_speed),
            ("search_spin_speed", self.search_spin_speed),
            ("obstacle.speed", self.obstacle.speed),
        ];
        for (name, speed) in speeds {
            if !(0.0..=100.0).contains(&speed) {
                return Err(MotorError::InvalidConfig(format!(
                    "{} must be within 0..=100, got {}",
                    name, speed
                )));
            }
        }
        Ok(())
    }
}
