//! Motor driver interface

use crate::{MotorCommand, MotorError, Wheel};

/// Differential-drive motor collaborator.
///
/// Speeds are signed percentages in [-100, 100]: positive drives forward,
/// negative in reverse, zero stops the wheel.
pub trait MotorDriver {
    /// Set one wheel's speed
    fn set_speed(&mut self, wheel: Wheel, percent: f32) -> Result<(), MotorError>;

    /// Stop both wheels immediately
    fn stop_all(&mut self) -> Result<(), MotorError>;

    /// Release the hardware; the driver must not be used afterwards
    fn cleanup(&mut self) -> Result<(), MotorError>;

    /// Apply a full command, left wheel first
    fn apply(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        for wheel in [Wheel::Left, Wheel::Right] {
            self.set_speed(wheel, command.speed(wheel))?;
        }
        Ok(())
    }
}

impl<M: MotorDriver + ?Sized> MotorDriver for Box<M> {
    fn set_speed(&mut self, wheel: Wheel, percent: f32) -> Result<(), MotorError> {
        (**self).set_speed(wheel, percent)
    }

    fn stop_all(&mut self) -> Result<(), MotorError> {
        (**self).stop_all()
    }

    fn cleanup(&mut self) -> Result<(), MotorError> {
        (**self).cleanup()
    }

    fn apply(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        (**self).apply(command)
    }
}
