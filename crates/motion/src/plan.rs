//! What the motors should do for one cycle

use std::time::Duration;

use serde::Serialize;

use crate::MotorCommand;

/// One timed step of an open-loop maneuver
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManeuverStep {
    pub command: MotorCommand,
    pub duration: Duration,
}

impl ManeuverStep {
    pub fn new(command: MotorCommand, duration: Duration) -> Self {
        Self { command, duration }
    }
}

/// Motor output for one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MotionPlan {
    /// Hold this command until the next cycle
    Hold(MotorCommand),
    /// Run the steps in order; the last step is always a stop
    Maneuver(Vec<ManeuverStep>),
}

impl MotionPlan {
    pub(crate) fn maneuver(steps: impl IntoIterator<Item = ManeuverStep>) -> Self {
        let mut steps: Vec<_> = steps
            .into_iter()
            .filter(|step| !step.duration.is_zero())
            .collect();
        steps.push(ManeuverStep::new(MotorCommand::STOP, Duration::ZERO));
        MotionPlan::Maneuver(steps)
    }

    /// First command sent to the motors
    pub fn command(&self) -> MotorCommand {
        match self {
            MotionPlan::Hold(command) => *command,
            MotionPlan::Maneuver(steps) => steps
                .first()
                .map(|step| step.command)
                .unwrap_or(MotorCommand::STOP),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            MotionPlan::Hold(_) => Duration::ZERO,
            MotionPlan::Maneuver(steps) => steps.iter().map(|step| step.duration).sum(),
        }
    }

    pub fn is_maneuver(&self) -> bool {
        matches!(self, MotionPlan::Maneuver(_))
    }
}
