//! Action to motor output

use std::time::Instant;

use navigation::{ActionKind, AvoidancePhase, TurnDirection};
use tracing::{debug, info, warn};

use crate::{ManeuverStep, MotionConfig, MotionPlan, MotorCommand, PidGains, PidState, TimedTurn};

/// Motion controller.
///
/// Line-following actions are steered by PID; turns, the U-turn and the
/// obstacle phases run as timed open-loop maneuvers.
pub struct MotionController {
    config: MotionConfig,
    gains: PidGains,
    pid: PidState,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        let gains = PidGains {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            integral_limit: config.integral_limit,
        };
        Self {
            config,
            gains,
            pid: PidState::default(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn pid_state(&self) -> &PidState {
        &self.pid
    }

    /// Clear all history; call when a run starts
    pub fn reset(&mut self) {
        self.pid = PidState::default();
    }

    /// Motor output for `action` at time `now`
    pub fn apply(&mut self, action: ActionKind, error: i32, now: Instant) -> MotionPlan {
        match action {
            ActionKind::FollowLine => self.follow(error, self.config.base_speed),
            ActionKind::CrossIntersection => self.follow(error, self.config.intersection_speed),
            ActionKind::CrossGap => self.follow(error, self.config.gap_speed()),
            ActionKind::SearchLine => {
                let speed = self.config.search_spin_speed;
                MotionPlan::Hold(MotorCommand::new(speed, -speed))
            }
            ActionKind::Turn90(direction) => {
                if self.debounced(action, now) {
                    return MotionPlan::Hold(MotorCommand::STOP);
                }
                self.begin_maneuver(action, now);
                self.timed_turn(&self.config.turn90, direction)
            }
            ActionKind::UTurn => {
                if self.debounced(action, now) {
                    return MotionPlan::Hold(MotorCommand::STOP);
                }
                self.begin_maneuver(action, now);
                self.timed_turn(&self.config.u_turn, self.config.u_turn_direction)
            }
            ActionKind::AvoidObstacle(phase) => {
                self.begin_maneuver(action, now);
                self.avoidance_step(phase)
            }
            ActionKind::EndOfCourse | ActionKind::Disconnected => MotionPlan::Hold(MotorCommand::STOP),
        }
    }

    fn follow(&mut self, error: i32, base_speed: f32) -> MotionPlan {
        let output = self.pid.update(error, &self.gains);
        let command = MotorCommand::new(base_speed - output, base_speed + output);
        debug!(error, output, left = command.left, right = command.right, "PID");
        MotionPlan::Hold(command)
    }

    /// Whether a maneuver started too recently for `action` to run
    fn debounced(&self, action: ActionKind, now: Instant) -> bool {
        let Some(last) = self.pid.last_action else {
            return false;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.config.action_delay() {
            warn!(
                action = action.label(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Maneuver rejected, previous one too recent"
            );
            return true;
        }
        false
    }

    fn begin_maneuver(&mut self, action: ActionKind, now: Instant) {
        info!("Maneuver: {}", action);
        self.pid.reset_loop();
        self.pid.last_action = Some(now);
    }

    fn timed_turn(&self, timing: &TimedTurn, direction: TurnDirection) -> MotionPlan {
        MotionPlan::maneuver([
            ManeuverStep::new(MotorCommand::forward(self.config.intersection_speed), timing.approach()),
            ManeuverStep::new(MotorCommand::turn(direction, self.config.turn_speed), timing.turn()),
        ])
    }

    fn avoidance_step(&self, phase: AvoidancePhase) -> MotionPlan {
        let obstacle = &self.config.obstacle;
        let ms = std::time::Duration::from_millis;

        match phase {
            AvoidancePhase::Diverting => MotionPlan::maneuver([
                ManeuverStep::new(MotorCommand::reverse(obstacle.speed), ms(obstacle.reverse_ms)),
                ManeuverStep::new(MotorCommand::turn(obstacle.divert, obstacle.speed), ms(obstacle.turn_ms)),
            ]),
            AvoidancePhase::Rounding => MotionPlan::maneuver([ManeuverStep::new(
                MotorCommand::forward(obstacle.speed),
                ms(obstacle.forward_ms),
            )]),
            AvoidancePhase::Realigning => MotionPlan::maneuver([ManeuverStep::new(
                MotorCommand::turn(obstacle.divert.opposite(), obstacle.speed),
                ms(obstacle.turn_ms),
            )]),
            AvoidancePhase::Searching => MotionPlan::maneuver([ManeuverStep::new(
                MotorCommand::forward(obstacle.speed),
                ms(obstacle.search_ms),
            )]),
        }
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
