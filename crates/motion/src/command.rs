//! Wheel speed commands

use navigation::TurnDirection;
use serde::{Deserialize, Serialize};

/// Largest speed magnitude, in percent of full power
pub const MAX_SPEED: f32 = 100.0;

/// Drive wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wheel {
    Left,
    Right,
}

/// Signed wheel speeds in percent, always within [-100, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f32,
    pub right: f32,
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand {
        left: 0.0,
        right: 0.0,
    };

    /// Build a command, clamping both speeds
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: clamp_speed(left),
            right: clamp_speed(right),
        }
    }

    pub fn forward(speed: f32) -> Self {
        Self::new(speed, speed)
    }

    pub fn reverse(speed: f32) -> Self {
        Self::new(-speed, -speed)
    }

    /// Spin in place, one wheel forward and the other in reverse
    pub fn turn(direction: TurnDirection, speed: f32) -> Self {
        match direction {
            TurnDirection::Left => Self::new(-speed, speed),
            TurnDirection::Right => Self::new(speed, -speed),
        }
    }

    pub fn speed(&self, wheel: Wheel) -> f32 {
        match wheel {
            Wheel::Left => self.left,
            Wheel::Right => self.right,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return 0.0;
    }
    speed.clamp(-MAX_SPEED, MAX_SPEED)
}
