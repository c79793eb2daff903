//! The control loop
//!
//! One cycle reads the distance sensor, grabs a frame, classifies it,
//! decides, and drives the motors, in that order. The loop is the only
//! writer of the decision and motion state.

use std::future::Future;
use std::time::Duration;

use calibration::CalibrationProfile;
use camera_capture::FrameSource;
use motion::{MotionController, MotionPlan, MotorCommand, MotorDriver};
use navigation::{ActionKind, DecisionEngine, DecisionOutput};
use obstacle_monitor::DistanceSensor;
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use vision::Perception;

use crate::telemetry::{record_rejected_maneuver, CycleReport};
use crate::{PilotConfig, PilotError};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// End-of-course marker reached
    Finished,
    /// Shutdown requested
    Stopped,
}

/// Control loop over a camera, a distance sensor and the motors.
///
/// The motors are stopped whenever the loop is left, including on errors
/// and when the loop is dropped, before any handle is released.
pub struct ControlLoop<S, D, M>
where
    M: MotorDriver,
{
    source: S,
    sensor: D,
    motors: M,
    perception: Perception,
    engine: DecisionEngine,
    motion: MotionController,
    tick: Duration,
    cycles: u64,
    camera_lost: bool,
    last_report: Option<CycleReport>,
}

impl<S, D, M> ControlLoop<S, D, M>
where
    S: FrameSource,
    D: DistanceSensor,
    M: MotorDriver,
{
    /// Wire the loop up. Fails if the motors do not answer a stop command.
    pub fn new(
        config: &PilotConfig,
        calibration: CalibrationProfile,
        source: S,
        sensor: D,
        mut motors: M,
    ) -> Result<Self, PilotError> {
        motors
            .stop_all()
            .map_err(|e| PilotError::Startup(format!("motor driver unavailable: {}", e)))?;

        Ok(Self {
            source,
            sensor,
            motors,
            perception: Perception::new(calibration)
                .with_max_gap_frames(config.navigation.max_gap_frames),
            engine: DecisionEngine::new(config.navigation.clone()),
            motion: MotionController::new(config.motion.clone()),
            tick: Duration::from_secs_f64(1.0 / config.tick_hz.max(1) as f64),
            cycles: 0,
            camera_lost: false,
            last_report: None,
        })
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    /// Most recent cycle, for display
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Clear all cross-cycle state
    pub fn reset(&mut self) {
        self.engine.reset();
        self.motion.reset();
        self.cycles = 0;
        self.camera_lost = false;
        self.last_report = None;
    }

    /// Run one full cycle
    pub async fn cycle(&mut self) -> Result<CycleReport, PilotError> {
        self.cycles += 1;
        let distance_cm = self.sensor.measure_distance();

        let Some(frame) = self.source.capture_frame() else {
            if !self.camera_lost {
                warn!("Camera disconnected, motors stopped");
                self.camera_lost = true;
            }
            self.motors.stop_all()?;
            let report = CycleReport::new(
                self.cycles,
                DecisionOutput::disconnected(),
                distance_cm,
                None,
                MotorCommand::STOP,
            );
            return Ok(self.finish_cycle(report));
        };
        if self.camera_lost {
            info!("Camera reconnected");
            self.camera_lost = false;
        }

        let seen = self.perception.analyze(&frame);
        let decision = self
            .engine
            .decide(&seen.zones, distance_cm, seen.line_offset);

        let now = tokio::time::Instant::now().into_std();
        let plan = self
            .motion
            .apply(decision.action, decision.lateral_error, now);
        if decision.action.is_maneuver() && !plan.is_maneuver() {
            record_rejected_maneuver();
        }

        let report = CycleReport::new(
            self.cycles,
            decision,
            distance_cm,
            Some(seen.zones),
            plan.command(),
        );

        if decision.action == ActionKind::EndOfCourse {
            self.motors.stop_all()?;
        } else {
            self.execute(&plan).await?;
        }

        Ok(self.finish_cycle(report))
    }

    fn finish_cycle(&mut self, report: CycleReport) -> CycleReport {
        report.publish();
        self.last_report = Some(report.clone());
        report
    }

    /// Drive the motors through a plan; maneuvers hold the cycle until done
    async fn execute(&mut self, plan: &MotionPlan) -> Result<(), PilotError> {
        match plan {
            MotionPlan::Hold(command) => self.motors.apply(*command)?,
            MotionPlan::Maneuver(steps) => {
                for step in steps {
                    if step.command.is_stop() {
                        self.motors.stop_all()?;
                    } else {
                        self.motors.apply(step.command)?;
                    }
                    if !step.duration.is_zero() {
                        tokio::time::sleep(step.duration).await;
                    }
                }
            }
        }
        Ok(())
    }

    /// Cycle at the configured rate until the course ends or a cycle fails
    async fn drive(&mut self) -> Result<RunOutcome, PilotError> {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let report = self.cycle().await?;
            if report.action == ActionKind::EndOfCourse {
                info!("End of course reached after {} cycles", report.cycle);
                return Ok(RunOutcome::Finished);
            }
        }
    }

    /// Run from a clean state until the course ends, a cycle fails, or
    /// `shutdown` resolves. The motors are stopped on every exit.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<RunOutcome, PilotError>
    where
        F: Future<Output = ()>,
    {
        self.reset();
        info!("Run started ({:?} per cycle)", self.tick);

        let result = tokio::select! {
            biased;
            _ = shutdown => {
                info!("Shutdown requested");
                Ok(RunOutcome::Stopped)
            }
            result = self.drive() => result,
        };

        self.halt();
        match &result {
            Ok(outcome) => info!("Run ended: {:?}", outcome),
            Err(e) => error!("Run aborted: {}", e),
        }
        result
    }

    /// Stop the motors, logging rather than failing
    pub fn halt(&mut self) {
        if let Err(e) = self.motors.stop_all() {
            error!("Failed to stop motors: {}", e);
        }
    }
}

impl<S, D, M> Drop for ControlLoop<S, D, M>
where
    M: MotorDriver,
{
    fn drop(&mut self) {
        if let Err(e) = self.motors.stop_all() {
            error!("Failed to stop motors: {}", e);
        }
        if let Err(e) = self.motors.cleanup() {
            error!("Motor cleanup failed: {}", e);
        }
    }
}
