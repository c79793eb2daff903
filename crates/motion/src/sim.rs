//! Motor drivers without hardware

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::{MotorCommand, MotorDriver, MotorError, Wheel};

/// Logs every command instead of driving motors
#[derive(Debug, Default)]
pub struct SimulatedMotors {
    current: MotorCommand,
    released: bool,
}

impl SimulatedMotors {
    pub fn new() -> Self {
        info!("Using simulated motors");
        Self::default()
    }

    /// Speeds the motors would currently be running at
    pub fn current(&self) -> MotorCommand {
        self.current
    }

    fn check(&self) -> Result<(), MotorError> {
        if self.released {
            return Err(MotorError::NotInitialized);
        }
        Ok(())
    }
}

impl MotorDriver for SimulatedMotors {
    fn set_speed(&mut self, wheel: Wheel, percent: f32) -> Result<(), MotorError> {
        self.check()?;
        match wheel {
            Wheel::Left => self.current.left = percent,
            Wheel::Right => self.current.right = percent,
        }
        debug!("Motor {:?} -> {:.1}%", wheel, percent);
        Ok(())
    }

    fn stop_all(&mut self) -> Result<(), MotorError> {
        self.check()?;
        self.current = MotorCommand::STOP;
        debug!("Motors stopped");
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), MotorError> {
        self.current = MotorCommand::STOP;
        self.released = true;
        info!("Simulated motors released");
        Ok(())
    }
}

/// Call made on a [`RecordingMotors`] driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorEvent {
    Speed(Wheel, f32),
    StopAll,
    Cleanup,
}

/// Records calls into a log shared by every clone
#[derive(Debug, Clone, Default)]
pub struct RecordingMotors {
    events: Arc<Mutex<Vec<MotorEvent>>>,
    failing: bool,
}

impl RecordingMotors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose every call fails, as if the hardware were missing
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<MotorEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Speeds left on the motors after every recorded call
    pub fn current(&self) -> MotorCommand {
        self.events()
            .into_iter()
            .fold(MotorCommand::STOP, |mut current, event| {
                match event {
                    MotorEvent::Speed(Wheel::Left, speed) => current.left = speed,
                    MotorEvent::Speed(Wheel::Right, speed) => current.right = speed,
                    MotorEvent::StopAll | MotorEvent::Cleanup => current = MotorCommand::STOP,
                }
                current
            })
    }

    fn record(&self, event: MotorEvent) -> Result<(), MotorError> {
        if self.failing {
            return Err(MotorError::Hardware("motor driver not present".into()));
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
        Ok(())
    }
}

impl MotorDriver for RecordingMotors {
    fn set_speed(&mut self, wheel: Wheel, percent: f32) -> Result<(), MotorError> {
        self.record(MotorEvent::Speed(wheel, percent))
    }

    fn stop_all(&mut self) -> Result<(), MotorError> {
        self.record(MotorEvent::StopAll)
    }

    fn cleanup(&mut self) -> Result<(), MotorError> {
        self.record(MotorEvent::Cleanup)
    }
}
