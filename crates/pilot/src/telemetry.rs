//! Per-cycle observational output

use metrics::{counter, gauge};
use motion::MotorCommand;
use navigation::{ActionKind, DecisionOutput};
use serde::Serialize;
use tracing::debug;
use vision::ZoneStates;

/// What one cycle decided, for display consumers
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub action: ActionKind,
    /// Operator-facing action label
    pub label: &'static str,
    /// Course or obstacle
    pub area: &'static str,
    pub lateral_error: i32,
    pub distance_cm: f32,
    /// `None` when no frame was available
    pub zones: Option<ZoneStates>,
    /// First command sent to the motors
    pub command: MotorCommand,
}

impl CycleReport {
    pub fn new(
        cycle: u64,
        decision: DecisionOutput,
        distance_cm: f32,
        zones: Option<ZoneStates>,
        command: MotorCommand,
    ) -> Self {
        Self {
            cycle,
            action: decision.action,
            label: decision.action.label(),
            area: decision.action.area().label(),
            lateral_error: decision.lateral_error,
            distance_cm,
            zones,
            command,
        }
    }

    /// Record gauges and emit the report as a structured debug event
    pub fn publish(&self) {
        counter!("pilot.cycles").increment(1);
        gauge!("pilot.lateral_error").set(self.lateral_error as f64);
        gauge!("pilot.distance_cm").set(self.distance_cm as f64);

        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string(self) {
                Ok(json) => debug!(report = %json, "Cycle"),
                Err(e) => debug!("Cycle report not serializable: {}", e),
            }
        }
    }
}

/// Count a maneuver replaced by a stop
pub fn record_rejected_maneuver() {
    counter!("pilot.maneuvers_rejected").increment(1);
}
